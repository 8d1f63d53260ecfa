use std::collections::{HashMap, HashSet};

use crate::{Gate, GateKind};

/// Errors that can occur when building or evaluating a circuit.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum CircuitError {
    #[error("gate {gate} ({kind}) expects {expected} inputs, got {actual}")]
    InvalidArity {
        gate: usize,
        kind: GateKind,
        expected: usize,
        actual: usize,
    },
    #[error("gate {gate} drives wire {wire} which already has a driver")]
    DuplicateDriver { gate: usize, wire: String },
    #[error("gate {gate} drives wire {wire} which was already used as an input")]
    DrivenAfterUse { gate: usize, wire: String },
    #[error("output wire {0} is not driven by any gate")]
    UnknownOutput(String),
    #[error("missing value for input wire {0}")]
    MissingInput(String),
    #[error("output wire {0} would be a constant")]
    ConstantOutput(String),
    #[error("invalid circuit parameters: {0}")]
    InvalidParameters(String),
}

/// A validated boolean circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    gates: Vec<Gate>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Circuit {
    /// Creates a new circuit.
    ///
    /// # Arguments
    ///
    /// * `gates` - The gates in topological order.
    /// * `outputs` - The names of the output wires.
    pub fn new(gates: Vec<Gate>, outputs: Vec<String>) -> Result<Self, CircuitError> {
        let mut driven = HashSet::new();
        let mut inputs = Vec::new();
        let mut input_set = HashSet::new();

        for (idx, gate) in gates.iter().enumerate() {
            let expected = gate.kind().arity();
            if gate.inputs().len() != expected {
                return Err(CircuitError::InvalidArity {
                    gate: idx,
                    kind: gate.kind(),
                    expected,
                    actual: gate.inputs().len(),
                });
            }

            for input in gate.inputs() {
                if !driven.contains(input.as_str()) && input_set.insert(input.as_str()) {
                    inputs.push(input.clone());
                }
            }

            let output = gate.output();
            if input_set.contains(output) {
                return Err(CircuitError::DrivenAfterUse {
                    gate: idx,
                    wire: output.to_string(),
                });
            }

            if !driven.insert(output) {
                return Err(CircuitError::DuplicateDriver {
                    gate: idx,
                    wire: output.to_string(),
                });
            }
        }

        if let Some(output) = outputs.iter().find(|o| !driven.contains(o.as_str())) {
            return Err(CircuitError::UnknownOutput(output.clone()));
        }

        Ok(Self {
            gates,
            inputs,
            outputs,
        })
    }

    /// Returns the gates in evaluation order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns the names of the input wires, in order of first use.
    #[inline]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Returns the names of the output wires.
    #[inline]
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Evaluates the circuit in the clear.
    ///
    /// Returns the values of the output wires in the order of [`Circuit::outputs`].
    pub fn evaluate(&self, inputs: &HashMap<String, bool>) -> Result<Vec<bool>, CircuitError> {
        let mut wires: HashMap<&str, bool> = HashMap::with_capacity(self.gates.len());

        for input in &self.inputs {
            let value = inputs
                .get(input)
                .ok_or_else(|| CircuitError::MissingInput(input.clone()))?;
            wires.insert(input, *value);
        }

        let mut buf = Vec::with_capacity(2);
        for (idx, gate) in self.gates.iter().enumerate() {
            buf.clear();
            for input in gate.inputs() {
                // Presence is guaranteed by construction.
                buf.push(wires.get(input.as_str()).copied().unwrap_or_default());
            }

            let value = gate
                .kind()
                .eval(&buf)
                .ok_or_else(|| CircuitError::InvalidArity {
                    gate: idx,
                    kind: gate.kind(),
                    expected: gate.kind().arity(),
                    actual: buf.len(),
                })?;

            wires.insert(gate.output(), value);
        }

        Ok(self
            .outputs
            .iter()
            .map(|output| wires.get(output.as_str()).copied().unwrap_or_default())
            .collect())
    }
}
