//! HART channel objects and request dispatching
//!
//! This crate ties the wire grammars, the service table and the shared
//! attribute registry together into the network-addressable channel
//! object. A [`channel::HartChannel`] decodes a service request, routes
//! or executes it, and always re-encodes a well-formed reply; its
//! routing and fallback collaborators are injected through traits.

pub mod channel;
pub mod fallback;
pub mod module;
pub mod router;

pub use channel::{CHANNEL_CLASS_ID, HartChannel};
pub use fallback::{DefaultFallback, FallbackHandler};
pub use module::{HartModule, ModuleConfig};
pub use router::{NullRouter, RequestTarget, Router};
