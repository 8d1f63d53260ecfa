use std::collections::HashMap;

use yao_circuits::Circuit;
use yao_core::Label;

use crate::{
    cipher::{decrypt_row, row_key},
    GarbledCircuit,
};

/// Errors that can occur during garbled circuit evaluation.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum EvaluatorError {
    #[error("expected {expected} garbled tables, got {actual}")]
    TableCountMismatch { expected: usize, actual: usize },
    #[error("missing label for wire {0}")]
    MissingLabel(String),
    #[error("gate {gate}: expected {expected} rows, got {actual}")]
    RowCount {
        gate: usize,
        expected: usize,
        actual: usize,
    },
    #[error("gate {gate}: no row matches the held labels")]
    NoMatchingRow { gate: usize },
    #[error("gate {gate}: row failed to authenticate")]
    Decryption { gate: usize },
}

/// Output of the evaluator.
#[derive(Debug)]
pub struct EvaluatorOutput {
    /// Labels of the circuit's output wires.
    pub outputs: HashMap<String, Label>,
}

/// Evaluates a garbled circuit.
///
/// # Arguments
///
/// * `circ` - The plaintext circuit.
/// * `garbled` - The garbled tables, one per gate.
/// * `inputs` - One label for every input wire.
pub fn evaluate(
    circ: &Circuit,
    garbled: &GarbledCircuit,
    inputs: HashMap<String, Label>,
) -> Result<EvaluatorOutput, EvaluatorError> {
    if garbled.tables.len() != circ.gates().len() {
        return Err(EvaluatorError::TableCountMismatch {
            expected: circ.gates().len(),
            actual: garbled.tables.len(),
        });
    }

    let mut wires = inputs;
    for (idx, (gate, table)) in circ.gates().iter().zip(&garbled.tables).enumerate() {
        let labels = gate
            .inputs()
            .iter()
            .map(|wire| {
                wires
                    .get(wire)
                    .copied()
                    .ok_or_else(|| EvaluatorError::MissingLabel(wire.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected = 1 << labels.len();
        if table.rows().len() != expected {
            return Err(EvaluatorError::RowCount {
                gate: idx,
                expected,
                actual: table.rows().len(),
            });
        }

        let lsbs: Vec<bool> = labels.iter().map(Label::lsb).collect();
        let row = table
            .rows()
            .iter()
            .find(|row| row.lsbs() == lsbs.as_slice())
            .ok_or(EvaluatorError::NoMatchingRow { gate: idx })?;

        let label = decrypt_row(&row_key(&labels), idx, row)
            .map_err(|_| EvaluatorError::Decryption { gate: idx })?;

        wires.insert(gate.output().to_string(), label);
    }

    let outputs = circ
        .outputs()
        .iter()
        .map(|wire| {
            wires
                .get(wire)
                .map(|label| (wire.clone(), *label))
                .ok_or_else(|| EvaluatorError::MissingLabel(wire.clone()))
        })
        .collect::<Result<_, _>>()?;

    Ok(EvaluatorOutput { outputs })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::*;
    use yao_circuits::{Gate, GateKind};

    use super::*;
    use crate::{garble, GarblerOutput, LabelledCircuit};

    #[fixture]
    fn garbled() -> (Circuit, LabelledCircuit, GarbledCircuit) {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let circ = Circuit::new(
            vec![
                Gate::new(GateKind::And, ["a", "b"], "t"),
                Gate::new(GateKind::Inv, ["t"], "out"),
            ],
            vec!["out".to_string()],
        )
        .unwrap();

        let GarblerOutput { labels, circuit } = garble(&mut rng, &circ).unwrap();

        (circ, labels, circuit)
    }

    fn inputs(labels: &LabelledCircuit, a: bool, b: bool) -> HashMap<String, Label> {
        HashMap::from([
            ("a".to_string(), labels.encode("a", a).unwrap()),
            ("b".to_string(), labels.encode("b", b).unwrap()),
        ])
    }

    #[rstest]
    fn test_tampered_ciphertext(garbled: (Circuit, LabelledCircuit, GarbledCircuit)) {
        let (circ, labels, mut circuit) = garbled;
        for row in circuit.tables[0].rows.iter_mut() {
            row.ciphertext[0] ^= 1;
        }

        assert!(matches!(
            evaluate(&circ, &circuit, inputs(&labels, true, false)),
            Err(EvaluatorError::Decryption { gate: 0 })
        ));
    }

    #[rstest]
    fn test_tampered_tag(garbled: (Circuit, LabelledCircuit, GarbledCircuit)) {
        let (circ, labels, mut circuit) = garbled;
        for row in circuit.tables[1].rows.iter_mut() {
            row.tag[15] ^= 0x80;
        }

        assert!(matches!(
            evaluate(&circ, &circuit, inputs(&labels, true, true)),
            Err(EvaluatorError::Decryption { gate: 1 })
        ));
    }

    #[rstest]
    fn test_swapped_tables(garbled: (Circuit, LabelledCircuit, GarbledCircuit)) {
        let (circ, labels, mut circuit) = garbled;
        circuit.tables.swap(0, 1);

        assert!(evaluate(&circ, &circuit, inputs(&labels, false, true)).is_err());
    }

    #[rstest]
    fn test_missing_label(garbled: (Circuit, LabelledCircuit, GarbledCircuit)) {
        let (circ, labels, circuit) = garbled;
        let mut inputs = inputs(&labels, false, false);
        inputs.remove("b");

        assert!(matches!(
            evaluate(&circ, &circuit, inputs),
            Err(EvaluatorError::MissingLabel(wire)) if wire == "b"
        ));
    }

    #[rstest]
    fn test_table_count_mismatch(garbled: (Circuit, LabelledCircuit, GarbledCircuit)) {
        let (circ, labels, mut circuit) = garbled;
        circuit.tables.pop();

        assert!(matches!(
            evaluate(&circ, &circuit, inputs(&labels, false, false)),
            Err(EvaluatorError::TableCountMismatch { expected: 2, actual: 1 })
        ));
    }
}
