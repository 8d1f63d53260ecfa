//! Core components used to implement Yao's garbled circuit protocol.
//!
//! Every gate is garbled into a table with one row per combination of input
//! values. A row holds the matching output label encrypted with AES-256-GCM
//! under `SHA-256(sorted input labels)`, along with the point-and-permute bits
//! of those input labels so the evaluator can pick its row without trial
//! decryption. Rows are shuffled after garbling.
//!
//! No free-XOR or half-gate optimizations are applied.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod cipher;
pub(crate) mod circuit;
mod evaluator;
mod garbler;
mod labels;

pub use circuit::{EncryptedRow, GarbledCircuit, GarbledTable};
pub use evaluator::{evaluate, EvaluatorError, EvaluatorOutput};
pub use garbler::{garble, GarblerError, GarblerOutput};
pub use labels::{resolve, LabelledCircuit, ResolveError};

pub use yao_circuits::Circuit;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rstest::*;
    use yao_circuits::{circuits, Gate, GateKind};
    use yao_core::Label;

    use super::*;

    /// Garbles and evaluates a circuit, returning the resolved outputs in
    /// output order.
    fn garble_and_evaluate(
        rng: &mut ChaCha12Rng,
        circ: &Circuit,
        inputs: &HashMap<String, bool>,
    ) -> Vec<bool> {
        let GarblerOutput { labels, circuit } = garble(rng, circ).unwrap();

        let input_labels: HashMap<String, Label> = circ
            .inputs()
            .iter()
            .map(|wire| (wire.clone(), labels.encode(wire, inputs[wire]).unwrap()))
            .collect();

        let EvaluatorOutput { outputs } = evaluate(circ, &circuit, input_labels).unwrap();
        let values = resolve(&outputs, circ.outputs(), &labels).unwrap();

        circ.outputs().iter().map(|name| values[name]).collect()
    }

    #[rstest]
    #[case(GateKind::Buf)]
    #[case(GateKind::Inv)]
    #[case(GateKind::And)]
    #[case(GateKind::Or)]
    #[case(GateKind::Xor)]
    #[case(GateKind::Nand)]
    #[case(GateKind::Nor)]
    #[case(GateKind::Xnor)]
    fn test_single_gate(#[case] kind: GateKind) {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let inputs: Vec<_> = ["a", "b"][..kind.arity()].to_vec();
        let circ = Circuit::new(
            vec![Gate::new(kind, inputs.clone(), "out")],
            vec!["out".to_string()],
        )
        .unwrap();

        for combo in 0..(1usize << inputs.len()) {
            let values: HashMap<String, bool> = inputs
                .iter()
                .enumerate()
                .map(|(i, wire)| (wire.to_string(), (combo >> i) & 1 == 1))
                .collect();

            assert_eq!(
                garble_and_evaluate(&mut rng, &circ, &values),
                circ.evaluate(&values).unwrap()
            );
        }
    }

    #[test]
    fn test_shared_input_wire() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let circ = Circuit::new(
            vec![
                Gate::new(GateKind::Xor, ["a", "a"], "z"),
                Gate::new(GateKind::And, ["a", "b"], "t"),
                Gate::new(GateKind::Or, ["t", "z"], "out"),
            ],
            vec!["out".to_string(), "t".to_string()],
        )
        .unwrap();

        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let values = HashMap::from([("a".to_string(), a), ("b".to_string(), b)]);
            assert_eq!(
                garble_and_evaluate(&mut rng, &circ, &values),
                circ.evaluate(&values).unwrap()
            );
        }
    }

    #[test]
    fn test_dot_product_matches_plaintext() {
        let (dims, bits, output_bits) = (4, 4, 12);
        let circ = circuits::dot_product(dims, bits, output_bits).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(2);

        for _ in 0..4 {
            let values: HashMap<String, bool> = circ
                .inputs()
                .iter()
                .map(|wire| (wire.clone(), rng.gen()))
                .collect();

            assert_eq!(
                garble_and_evaluate(&mut rng, &circ, &values),
                circ.evaluate(&values).unwrap()
            );
        }
    }
}
