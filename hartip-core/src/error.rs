use thiserror::Error;

/// Main error type for HART interface operations
#[derive(Error, Debug)]
pub enum HartError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Field missing: {0}")]
    FieldMissing(String),

    #[error("Unknown service: 0x{0:02X}")]
    UnknownService(u8),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Registry corrupt: {0}")]
    RegistryCorrupt(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for HART interface operations
pub type HartResult<T> = Result<T, HartError>;
