use yao_circuits::CircuitError;
use yao_garble_core::{EvaluatorError, GarblerError, ResolveError};
use yao_ot_core::{OtConfigBuilderError, ReceiverError, SenderError};

use crate::quantize::QuantizeError;

/// Dot product protocol error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct DotProductError(#[from] ErrorRepr);

/// The kind of a [`DotProductError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid local input or configuration.
    InputValidation,
    /// A message arrived out of order or for an unknown exchange.
    Desync,
    /// Garbling, evaluation or label resolution failed.
    Cryptographic,
    /// Oblivious transfer failed.
    ObliviousTransfer,
    /// The circuit could not be built or is malformed.
    Circuit,
    /// The transport failed.
    Io,
    /// The peer aborted the exchange.
    Aborted,
}

impl DotProductError {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            ErrorRepr::Input(_) | ErrorRepr::Quantize(_) | ErrorRepr::Config(_) => {
                ErrorKind::InputValidation
            }
            ErrorRepr::Desync(_) => ErrorKind::Desync,
            ErrorRepr::Garble(_) | ErrorRepr::Evaluate(_) | ErrorRepr::Resolve(_) => {
                ErrorKind::Cryptographic
            }
            ErrorRepr::OtSender(_) | ErrorRepr::OtReceiver(_) => ErrorKind::ObliviousTransfer,
            ErrorRepr::Circuit(_) => ErrorKind::Circuit,
            ErrorRepr::Io(_) => ErrorKind::Io,
            ErrorRepr::Aborted { .. } => ErrorKind::Aborted,
        }
    }

    /// Returns `true` if restarting the exchange from the first step may
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        match &self.0 {
            ErrorRepr::Aborted { retryable, .. } => *retryable,
            _ => matches!(
                self.kind(),
                ErrorKind::Desync | ErrorKind::Cryptographic | ErrorKind::ObliviousTransfer
            ),
        }
    }

    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::Input(msg.into()))
    }

    pub(crate) fn desync(msg: impl Into<String>) -> Self {
        Self(ErrorRepr::Desync(msg.into()))
    }

    pub(crate) fn aborted(sub_vector: usize, reason: String, retryable: bool) -> Self {
        Self(ErrorRepr::Aborted {
            sub_vector,
            reason,
            retryable,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorRepr {
    #[error("invalid input: {0}")]
    Input(String),
    #[error("quantization error: {0}")]
    Quantize(QuantizeError),
    #[error("config error: {0}")]
    Config(String),
    #[error("circuit error: {0}")]
    Circuit(CircuitError),
    #[error("protocol desynchronized: {0}")]
    Desync(String),
    #[error("garbling error: {0}")]
    Garble(GarblerError),
    #[error("evaluation error: {0}")]
    Evaluate(EvaluatorError),
    #[error("label resolution error: {0}")]
    Resolve(ResolveError),
    #[error("ot sender error: {0}")]
    OtSender(SenderError),
    #[error("ot receiver error: {0}")]
    OtReceiver(ReceiverError),
    #[error("io error: {0}")]
    Io(std::io::Error),
    #[error("sub-vector {sub_vector} aborted by peer: {reason}")]
    Aborted {
        sub_vector: usize,
        reason: String,
        retryable: bool,
    },
}

impl From<QuantizeError> for DotProductError {
    fn from(err: QuantizeError) -> Self {
        Self(ErrorRepr::Quantize(err))
    }
}

impl From<OtConfigBuilderError> for DotProductError {
    fn from(err: OtConfigBuilderError) -> Self {
        Self(ErrorRepr::Config(err.to_string()))
    }
}

impl From<CircuitError> for DotProductError {
    fn from(err: CircuitError) -> Self {
        Self(ErrorRepr::Circuit(err))
    }
}

impl From<GarblerError> for DotProductError {
    fn from(err: GarblerError) -> Self {
        Self(ErrorRepr::Garble(err))
    }
}

impl From<EvaluatorError> for DotProductError {
    fn from(err: EvaluatorError) -> Self {
        Self(ErrorRepr::Evaluate(err))
    }
}

impl From<ResolveError> for DotProductError {
    fn from(err: ResolveError) -> Self {
        Self(ErrorRepr::Resolve(err))
    }
}

impl From<SenderError> for DotProductError {
    fn from(err: SenderError) -> Self {
        Self(ErrorRepr::OtSender(err))
    }
}

impl From<ReceiverError> for DotProductError {
    fn from(err: ReceiverError) -> Self {
        Self(ErrorRepr::OtReceiver(err))
    }
}

impl From<std::io::Error> for DotProductError {
    fn from(err: std::io::Error) -> Self {
        Self(ErrorRepr::Io(err))
    }
}
