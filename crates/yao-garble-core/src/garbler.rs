use std::collections::HashMap;

use rand::{seq::SliceRandom, CryptoRng, Rng};
use yao_circuits::Circuit;
use yao_core::Label;

use crate::{
    cipher::{encrypt_row, row_key},
    GarbledCircuit, GarbledTable, LabelledCircuit,
};

/// Errors that can occur during garbling.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum GarblerError {
    #[error("gate {gate} has inputs inconsistent with its kind")]
    InvalidGate { gate: usize },
    #[error("failed to encrypt a row of gate {gate}")]
    Encryption { gate: usize },
}

/// Output of the garbler.
#[derive(Debug)]
pub struct GarblerOutput {
    /// Label pairs of every wire, kept private by the garbler.
    pub labels: LabelledCircuit,
    /// Garbled tables, sent to the evaluator.
    pub circuit: GarbledCircuit,
}

/// Garbles a circuit.
///
/// Fresh label pairs are drawn for every wire, so garbling the same circuit
/// twice yields unrelated garbled circuits.
pub fn garble<R: Rng + CryptoRng>(
    rng: &mut R,
    circ: &Circuit,
) -> Result<GarblerOutput, GarblerError> {
    let mut wires: HashMap<String, [Label; 2]> = HashMap::new();
    let mut tables = Vec::with_capacity(circ.gates().len());

    for (idx, gate) in circ.gates().iter().enumerate() {
        let inputs: Vec<[Label; 2]> = gate
            .inputs()
            .iter()
            .map(|wire| {
                *wires
                    .entry(wire.clone())
                    .or_insert_with(|| Label::random_pair(&mut *rng))
            })
            .collect();
        let output = Label::random_pair(rng);

        let arity = inputs.len();
        let mut rows = Vec::with_capacity(1 << arity);
        for combination in 0..(1usize << arity) {
            // Input 0 is the most significant bit of the combination.
            let values: Vec<bool> = (0..arity)
                .map(|j| (combination >> (arity - 1 - j)) & 1 == 1)
                .collect();

            let value = gate
                .kind()
                .eval(&values)
                .ok_or(GarblerError::InvalidGate { gate: idx })?;

            let labels: Vec<Label> = inputs
                .iter()
                .zip(&values)
                .map(|(pair, value)| pair[*value as usize])
                .collect();
            let lsbs = labels.iter().map(Label::lsb).collect();

            let row = encrypt_row(
                rng,
                &row_key(&labels),
                idx,
                &output[value as usize],
                lsbs,
            )
            .map_err(|_| GarblerError::Encryption { gate: idx })?;

            rows.push(row);
        }

        rows.shuffle(rng);

        wires.insert(gate.output().to_string(), output);
        tables.push(GarbledTable { rows });
    }

    Ok(GarblerOutput {
        labels: LabelledCircuit::new(wires),
        circuit: GarbledCircuit { tables },
    })
}
