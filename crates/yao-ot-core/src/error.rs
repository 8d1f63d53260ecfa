use yao_core::bigint::WidthError;

/// Errors that can occur when using the sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("a {modulus_bits}-bit modulus can not carry {msg_len}-byte messages")]
    ModulusTooSmall { modulus_bits: usize, msg_len: usize },
    #[error("invalid message length: expected {expected}, got {actual}")]
    MessageLength { expected: usize, actual: usize },
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("count mismatch: expected {0}, got {1}")]
    CountMismatch(usize, usize),
    #[error("blinded choice is not reduced modulo N")]
    ValueOutOfRange,
}

/// Errors that can occur when using the receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("count mismatch: expected {0}, got {1}")]
    CountMismatch(usize, usize),
    #[error("invalid public parameters: {0}")]
    InvalidParams(String),
    #[error("blinded message is not reduced modulo N")]
    ValueOutOfRange,
    #[error("recovered message is too wide: {0}")]
    MessageWidth(#[from] WidthError),
}
