//! Service codes and the service table
//!
//! A service entry maps a one-byte service code to its name, its short
//! context tag, and (for services implemented here) the grammars that
//! parse its request and reply shapes. The table is built once at
//! initialization and read-only afterwards. Only codes with a request
//! grammar are executable; the sibling codes are registered so that
//! routing and diagnostics can recognize them, and execution falls
//! through to the caller's fallback handler.

use crate::parse::{read_var_reply, read_var_request};
use hartip_codec::Grammar;
use hartip_core::{HartResult, Record, keys};

/// Reply form of a service code
pub const REPLY_BIT: u8 = 0x80;

/// Read Dynamic Variable
pub const RD_VAR_REQ: u8 = 0x4B;
pub const RD_VAR_RPY: u8 = RD_VAR_REQ | REPLY_BIT;
pub const RD_VAR_NAM: &str = "Read Dynamic Variable";
pub const RD_VAR_CTX: &str = "read_var";

/// Read Additional Status
pub const RD_STS_REQ: u8 = 0x4C;
pub const RD_STS_RPY: u8 = RD_STS_REQ | REPLY_BIT;
pub const RD_STS_NAM: &str = "Read Additional Status";
pub const RD_STS_CTX: &str = "read_sts";

/// Get Device Info
pub const RD_INF_REQ: u8 = 0x4D;
pub const RD_INF_RPY: u8 = RD_INF_REQ | REPLY_BIT;
pub const RD_INF_NAM: &str = "Get Device Info";
pub const RD_INF_CTX: &str = "get_info";

/// Pass-through Init
pub const PT_INI_REQ: u8 = 0x4E;
pub const PT_INI_RPY: u8 = PT_INI_REQ | REPLY_BIT;
pub const PT_INI_NAM: &str = "Init";
pub const PT_INI_CTX: &str = "init";

/// Pass-through Query
pub const PT_QRY_REQ: u8 = 0x4F;
pub const PT_QRY_RPY: u8 = PT_QRY_REQ | REPLY_BIT;
pub const PT_QRY_NAM: &str = "Query";
pub const PT_QRY_CTX: &str = "query";

/// Pass-through Flush Queue
pub const PT_FLQ_REQ: u8 = 0x50;
pub const PT_FLQ_RPY: u8 = PT_FLQ_REQ | REPLY_BIT;
pub const PT_FLQ_NAM: &str = "Flush Queue";
pub const PT_FLQ_CTX: &str = "flush";

/// Unconnected Send encapsulation
pub const UC_SND_REQ: u8 = 0x52;

/// One service's registration
#[derive(Debug)]
pub struct ServiceEntry {
    pub code: u8,
    pub reply_code: u8,
    pub name: &'static str,
    pub context: &'static str,
    /// Request-shape grammar; present only for services executable here
    pub request: Option<Grammar>,
    /// Reply-shape grammar
    pub reply: Option<Grammar>,
}

impl ServiceEntry {
    /// Whether this object executes the service body itself
    pub fn executable(&self) -> bool {
        self.request.is_some()
    }
}

/// Static, process-lifetime mapping of service codes
#[derive(Debug)]
pub struct ServiceTable {
    entries: Vec<ServiceEntry>,
}

impl ServiceTable {
    /// Build the table; called once at object initialization
    pub fn new() -> HartResult<Self> {
        let mut entries = Vec::new();
        entries.push(ServiceEntry {
            code: RD_VAR_REQ,
            reply_code: RD_VAR_RPY,
            name: RD_VAR_NAM,
            context: RD_VAR_CTX,
            request: Some(read_var_request()?),
            reply: Some(read_var_reply()?),
        });
        for (code, name, context) in [
            (RD_STS_REQ, RD_STS_NAM, RD_STS_CTX),
            (RD_INF_REQ, RD_INF_NAM, RD_INF_CTX),
            (PT_INI_REQ, PT_INI_NAM, PT_INI_CTX),
            (PT_QRY_REQ, PT_QRY_NAM, PT_QRY_CTX),
            (PT_FLQ_REQ, PT_FLQ_NAM, PT_FLQ_CTX),
        ] {
            entries.push(ServiceEntry {
                code,
                reply_code: code | REPLY_BIT,
                name,
                context,
                request: None,
                reply: None,
            });
        }
        Ok(Self { entries })
    }

    /// Find an entry by request or reply code
    pub fn by_code(&self, code: u8) -> Option<&ServiceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.code == code || entry.reply_code == code)
    }

    /// Determine the intended service of a record
    ///
    /// Prefers an explicit `service` field; a partially-built record
    /// without one is recognized by the presence of a service's context
    /// tag.
    pub fn infer(&self, record: &Record) -> Option<&ServiceEntry> {
        if let Some(code) = record.usint(keys::SERVICE) {
            return self.by_code(code);
        }
        self.entries
            .iter()
            .find(|entry| record.contains(entry.context))
    }

    /// Human-readable service name for a code
    pub fn name_of(&self, code: u8) -> &'static str {
        self.by_code(code).map_or("(Unknown)", |entry| entry.name)
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }
}
