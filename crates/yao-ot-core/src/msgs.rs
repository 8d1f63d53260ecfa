//! Messages exchanged between the sender and the receiver.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::rounds::{BlindedPair, PublicParams};

/// Sender setup message, one set of public parameters per transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderSetup {
    /// The public parameters.
    pub params: Vec<PublicParams>,
}

/// Receiver payload containing the blinded choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverPayload {
    /// The blinded choices `v`.
    #[serde(with = "yao_core::bigint::decimal_seq")]
    pub v: Vec<BigUint>,
}

/// Sender payload containing the masked messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderPayload {
    /// The masked message pairs.
    pub blinded: Vec<BlindedPair>,
}
