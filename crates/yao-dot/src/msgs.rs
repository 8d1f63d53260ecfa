//! Messages exchanged between Alice and Bob.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use yao_core::Label;
use yao_garble_core::GarbledCircuit;
use yao_ot_core::msgs::{ReceiverPayload, SenderPayload, SenderSetup};

use crate::DotProductError;

/// A step of a sub-vector exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Alice garbles the circuit and starts the oblivious transfers.
    AliceInit2pc,
    /// Bob blinds his choices.
    BobReceive2pc,
    /// Alice answers the blinded choices.
    AliceReceiveVFromBob,
    /// Bob recovers his input labels and evaluates the circuit.
    BobResolveInputs,
    /// Alice resolves the output labels into a partial sum.
    AliceCalcFinalSum,
    /// Alice aggregates all partial sums.
    AliceSumAllSubEmbeddings,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A protocol message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Message {
    /// Garbled circuit, Alice's input labels and the OT setup for Bob's input
    /// wires.
    Init {
        sub_vector: usize,
        sub_vector_count: usize,
        garbled: GarbledCircuit,
        ot_setup: SenderSetup,
        alice_labels: HashMap<String, Label>,
    },
    /// Bob's blinded choices.
    Choices {
        sub_vector: usize,
        v: ReceiverPayload,
    },
    /// Alice's masked label pairs.
    Blinded {
        sub_vector: usize,
        payload: SenderPayload,
    },
    /// Labels of the circuit outputs computed by Bob.
    OutputLabels {
        sub_vector: usize,
        labels: HashMap<String, Label>,
    },
    /// The aggregated result.
    Total { total: i64 },
    /// The sender failed the exchange.
    Abort {
        sub_vector: usize,
        reason: String,
        retryable: bool,
    },
}

impl Message {
    /// Returns the sub-vector the message belongs to.
    pub fn sub_vector(&self) -> Option<usize> {
        match self {
            Message::Init { sub_vector, .. }
            | Message::Choices { sub_vector, .. }
            | Message::Blinded { sub_vector, .. }
            | Message::OutputLabels { sub_vector, .. }
            | Message::Abort { sub_vector, .. } => Some(*sub_vector),
            Message::Total { .. } => None,
        }
    }

    /// Returns the step the recipient runs on this message.
    pub fn step(&self) -> Option<Step> {
        match self {
            Message::Init { .. } => Some(Step::BobReceive2pc),
            Message::Choices { .. } => Some(Step::AliceReceiveVFromBob),
            Message::Blinded { .. } => Some(Step::BobResolveInputs),
            Message::OutputLabels { .. } => Some(Step::AliceCalcFinalSum),
            Message::Total { .. } | Message::Abort { .. } => None,
        }
    }

    /// Returns the name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Init { .. } => "Init",
            Message::Choices { .. } => "Choices",
            Message::Blinded { .. } => "Blinded",
            Message::OutputLabels { .. } => "OutputLabels",
            Message::Total { .. } => "Total",
            Message::Abort { .. } => "Abort",
        }
    }

    /// Converts a message which arrived where `step` of exchange `sub_vector`
    /// was expected into an error.
    ///
    /// An abort from the peer is reported as such.
    pub(crate) fn into_unexpected(self, step: Step, sub_vector: usize) -> DotProductError {
        match self {
            Message::Abort {
                sub_vector,
                reason,
                retryable,
            } => DotProductError::aborted(sub_vector, reason, retryable),
            msg => {
                let found = match msg.step() {
                    Some(found) => found.to_string(),
                    None => msg.kind().to_string(),
                };

                DotProductError::desync(format!(
                    "expected {step} for sub-vector {sub_vector}, got {found} for {:?}",
                    msg.sub_vector()
                ))
            }
        }
    }
}
