use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The boolean function computed by a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum GateKind {
    Buf,
    Inv,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

impl GateKind {
    /// Returns the number of inputs of the gate.
    pub const fn arity(&self) -> usize {
        match self {
            GateKind::Buf | GateKind::Inv => 1,
            _ => 2,
        }
    }

    /// Evaluates the gate on the provided inputs.
    ///
    /// Returns `None` if the number of inputs does not match the arity.
    pub fn eval(&self, inputs: &[bool]) -> Option<bool> {
        let out = match (self, inputs) {
            (GateKind::Buf, [a]) => *a,
            (GateKind::Inv, [a]) => !a,
            (GateKind::And, [a, b]) => a & b,
            (GateKind::Or, [a, b]) => a | b,
            (GateKind::Xor, [a, b]) => a ^ b,
            (GateKind::Nand, [a, b]) => !(a & b),
            (GateKind::Nor, [a, b]) => !(a | b),
            (GateKind::Xnor, [a, b]) => !(a ^ b),
            _ => return None,
        };

        Some(out)
    }

    fn as_str(&self) -> &'static str {
        match self {
            GateKind::Buf => "BUF",
            GateKind::Inv => "INV",
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xnor => "XNOR",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown gate name.
#[derive(Debug, thiserror::Error)]
#[error("unknown gate kind: {0}")]
pub struct ParseGateKindError(String);

impl FromStr for GateKind {
    type Err = ParseGateKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "BUF" => GateKind::Buf,
            "INV" | "NOT" => GateKind::Inv,
            "AND" => GateKind::And,
            "OR" => GateKind::Or,
            "XOR" => GateKind::Xor,
            "NAND" => GateKind::Nand,
            "NOR" => GateKind::Nor,
            "XNOR" => GateKind::Xnor,
            _ => return Err(ParseGateKindError(s.to_string())),
        })
    }
}

/// A logic gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    inputs: Vec<String>,
    output: String,
}

impl Gate {
    /// Creates a new gate.
    ///
    /// The gate is not validated until it is added to a [`Circuit`](crate::Circuit).
    pub fn new<I, S>(kind: GateKind, inputs: I, output: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: output.into(),
        }
    }

    /// Returns the kind of the gate.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Returns the names of the input wires.
    #[inline]
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Returns the name of the output wire.
    #[inline]
    pub fn output(&self) -> &str {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case::and(GateKind::And, [false, false, false, true])]
    #[case::or(GateKind::Or, [false, true, true, true])]
    #[case::xor(GateKind::Xor, [false, true, true, false])]
    #[case::nand(GateKind::Nand, [true, true, true, false])]
    #[case::nor(GateKind::Nor, [true, false, false, false])]
    #[case::xnor(GateKind::Xnor, [true, false, false, true])]
    fn test_binary_truth_table(#[case] kind: GateKind, #[case] expected: [bool; 4]) {
        let table = [[false, false], [false, true], [true, false], [true, true]];

        for (inputs, expected) in table.iter().zip(expected) {
            assert_eq!(kind.eval(inputs), Some(expected));
        }
    }

    #[test]
    fn test_unary_truth_table() {
        assert_eq!(GateKind::Buf.eval(&[true]), Some(true));
        assert_eq!(GateKind::Buf.eval(&[false]), Some(false));
        assert_eq!(GateKind::Inv.eval(&[true]), Some(false));
        assert_eq!(GateKind::Inv.eval(&[false]), Some(true));
    }

    #[test]
    fn test_eval_wrong_arity() {
        assert_eq!(GateKind::And.eval(&[true]), None);
        assert_eq!(GateKind::Inv.eval(&[true, false]), None);
    }

    #[test]
    fn test_parse_gate_kind() {
        assert_eq!("xnor".parse::<GateKind>().unwrap(), GateKind::Xnor);
        assert_eq!("NOT".parse::<GateKind>().unwrap(), GateKind::Inv);
        assert_eq!(GateKind::Nand.to_string(), "NAND");
        assert!("MUX".parse::<GateKind>().is_err());
    }
}
