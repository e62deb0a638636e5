//! Reply status codes
//!
//! Every reply carries a one-byte status immediately after the service
//! code. A zero status means the full payload follows; any non-zero
//! status terminates the reply at two bytes.

/// Request completed, full payload follows
pub const SUCCESS: u8 = 0x00;

/// More data is available than fits the packet
///
/// A normal (non-error) response to fragmented reads on sibling
/// services. Reserved here; the dynamic-variable service never emits it.
pub const PARTIAL_TRANSFER: u8 = 0x06;

/// Service not supported, or execution failed before a more specific
/// code was chosen
pub const SERVICE_UNSUPPORTED: u8 = 0x08;

/// Human-readable name for a status code
pub fn name(status: u8) -> &'static str {
    match status {
        SUCCESS => "Success",
        PARTIAL_TRANSFER => "Partial Transfer",
        SERVICE_UNSUPPORTED => "Service Unsupported",
        _ => "(Unknown)",
    }
}
