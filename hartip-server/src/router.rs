//! Routing seam
//!
//! A channel does not inherit routing machinery; it holds a [`Router`]
//! that resolves a record's addressed target among the other device
//! objects. The router returns a target only when the request is for
//! some other object; `None` means "handle it here", whether because the
//! request is self-addressed or because resolution failed (a bad tag is
//! not fatal; service logic produces the proper error status).

use async_trait::async_trait;
use hartip_core::{HartResult, Record};
use std::sync::Arc;

/// Another device object that can handle a full request record
#[async_trait]
pub trait RequestTarget: Send + Sync {
    async fn request(&self, record: &mut Record) -> HartResult<bool>;
}

/// Resolves a record's addressed target among other device objects
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Router: Send + Sync {
    async fn route(&self, record: &Record) -> Option<Arc<dyn RequestTarget>>;
}

/// Router that never resolves a target; every request is local
pub struct NullRouter;

#[async_trait]
impl Router for NullRouter {
    async fn route(&self, _record: &Record) -> Option<Arc<dyn RequestTarget>> {
        None
    }
}
