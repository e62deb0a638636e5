//! Attribute storage and the shared tag registry
//!
//! This crate provides the addressable storage side of the HART
//! interface object: typed attribute cells, the per-channel data objects
//! that hold them, and the process-wide [`Registry`] that maps symbolic
//! tags to attribute keys with lazy, race-safe creation.

pub mod attribute;
pub mod data_object;
pub mod registry;

pub use attribute::Attribute;
pub use data_object::{DATA_CLASS_ID, HartData};
pub use registry::{AttributeKey, Registry};
