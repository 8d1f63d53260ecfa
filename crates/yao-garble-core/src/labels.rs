use std::collections::HashMap;

use yao_core::Label;

/// Errors that can occur when encoding or decoding wire labels.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ResolveError {
    #[error("wire {0} is not part of the circuit")]
    UnknownWire(String),
    #[error("no label provided for output wire {0}")]
    MissingOutput(String),
    #[error("label for wire {0} matches neither of its labels")]
    InvalidLabel(String),
}

/// The label pairs of every wire of a garbled circuit.
///
/// The label at index `i` of a pair encodes the value `i`. This must never be
/// revealed to the evaluator.
#[derive(Clone, Default)]
pub struct LabelledCircuit {
    wires: HashMap<String, [Label; 2]>,
}

opaque_debug::implement!(LabelledCircuit);

impl LabelledCircuit {
    pub(crate) fn new(wires: HashMap<String, [Label; 2]>) -> Self {
        Self { wires }
    }

    /// Returns the label pair of a wire.
    pub fn get(&self, wire: &str) -> Option<&[Label; 2]> {
        self.wires.get(wire)
    }

    /// Returns the number of labelled wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if no wire is labelled.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Returns the label encoding `value` on `wire`.
    pub fn encode(&self, wire: &str, value: bool) -> Result<Label, ResolveError> {
        self.wires
            .get(wire)
            .map(|pair| pair[value as usize])
            .ok_or_else(|| ResolveError::UnknownWire(wire.to_string()))
    }

    /// Returns the value encoded by `label` on `wire`.
    pub fn decode(&self, wire: &str, label: &Label) -> Result<bool, ResolveError> {
        let [low, high] = self
            .wires
            .get(wire)
            .ok_or_else(|| ResolveError::UnknownWire(wire.to_string()))?;

        if label == low {
            Ok(false)
        } else if label == high {
            Ok(true)
        } else {
            Err(ResolveError::InvalidLabel(wire.to_string()))
        }
    }
}

/// Resolves output labels to their boolean values.
///
/// # Arguments
///
/// * `output_labels` - The labels held by the evaluator, keyed by wire.
/// * `output_names` - The output wires to resolve.
/// * `labelled` - The garbler's labelled circuit.
pub fn resolve(
    output_labels: &HashMap<String, Label>,
    output_names: &[String],
    labelled: &LabelledCircuit,
) -> Result<HashMap<String, bool>, ResolveError> {
    output_names
        .iter()
        .map(|name| {
            let label = output_labels
                .get(name)
                .ok_or_else(|| ResolveError::MissingOutput(name.clone()))?;

            Ok((name.clone(), labelled.decode(name, label)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn fixture() -> (ChaCha12Rng, LabelledCircuit) {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let pair = Label::random_pair(&mut rng);
        let labelled = LabelledCircuit::new(HashMap::from([("out".to_string(), pair)]));

        (rng, labelled)
    }

    #[test]
    fn test_resolve() {
        let (_, labelled) = fixture();
        let names = ["out".to_string()];

        for value in [false, true] {
            let label = labelled.encode("out", value).unwrap();
            let outputs = HashMap::from([("out".to_string(), label)]);

            assert_eq!(resolve(&outputs, &names, &labelled).unwrap()["out"], value);
        }
    }

    #[test]
    fn test_resolve_rejects_foreign_label() {
        let (mut rng, labelled) = fixture();
        let outputs = HashMap::from([("out".to_string(), Label::random(&mut rng))]);

        assert!(matches!(
            resolve(&outputs, &["out".to_string()], &labelled),
            Err(ResolveError::InvalidLabel(wire)) if wire == "out"
        ));
    }

    #[test]
    fn test_resolve_missing_output() {
        let (_, labelled) = fixture();

        assert!(matches!(
            resolve(&HashMap::new(), &["out".to_string()], &labelled),
            Err(ResolveError::MissingOutput(_))
        ));
        assert!(matches!(
            labelled.encode("other", true),
            Err(ResolveError::UnknownWire(_))
        ));
    }
}
