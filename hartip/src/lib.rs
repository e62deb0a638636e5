//! HART interface object over EtherNet/IP CIP
//!
//! This library implements the application-layer object of a C*Logix
//! HART interface module: it decodes binary service requests, executes
//! them against lazily-created per-channel attribute storage, and
//! re-encodes bit-exact binary replies, including correct error-status
//! encoding on every failure path.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `hartip-core`: error type, message record, status codes, tag names
//! - `hartip-codec`: CIP scalar codec, remembering byte source, grammar
//!   engine
//! - `hartip-object`: attributes, data objects, the shared tag registry
//! - `hartip-application`: service table, wire grammars, reply encoding
//! - `hartip-server`: channel objects and request dispatching
//!
//! # Usage
//!
//! ```no_run
//! use hartip::{HartChannel, Record, Value, keys};
//! use hartip::object::Registry;
//! use std::sync::Arc;
//!
//! # async fn demo() -> hartip::HartResult<()> {
//! let registry = Arc::new(Registry::new());
//! let channel = HartChannel::new("hart.ch0", 1, registry)?;
//!
//! let mut record = Record::new();
//! record.insert(keys::SERVICE, Value::Usint(0x4B));
//! channel.request(&mut record).await?;
//! let _reply = record.bytes(keys::INPUT);
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use hartip_core::{HartError, HartResult, Record, TagName, Value, keys, status};

// Re-export the channel object API
pub use hartip_server::{HartChannel, HartModule, ModuleConfig};

// Re-export the codec layer
pub mod codec {
    pub use hartip_codec::*;
}

// Re-export attribute storage and the registry
pub mod object {
    pub use hartip_object::*;
}

// Re-export the application layer
pub mod application {
    pub use hartip_application::*;
}

// Re-export the server layer
pub mod server {
    pub use hartip_server::*;
}
