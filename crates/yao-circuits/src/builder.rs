use crate::{Circuit, CircuitError, Gate, GateKind};

/// A value in a circuit under construction.
///
/// Constants are folded away while building, so they never appear as wires in
/// the resulting [`Circuit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Constant `false`.
    Zero,
    /// Constant `true`.
    One,
    /// A named wire.
    Wire(String),
}

impl Node {
    /// Returns a node for the named wire.
    pub fn wire(name: impl Into<String>) -> Self {
        Node::Wire(name.into())
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        if value {
            Node::One
        } else {
            Node::Zero
        }
    }
}

/// Builds a [`Circuit`] gate by gate.
///
/// Intermediate wires are named `w{n}`.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    gates: Vec<Gate>,
    outputs: Vec<String>,
    next_wire: usize,
}

impl CircuitBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: GateKind, inputs: [&str; 2]) -> Node {
        let output = format!("w{}", self.next_wire);
        self.next_wire += 1;

        let inputs = &inputs[..kind.arity()];
        self.gates.push(Gate::new(kind, inputs.iter().copied(), output.clone()));

        Node::Wire(output)
    }

    /// Appends `!a`.
    pub fn inv(&mut self, a: &Node) -> Node {
        match a {
            Node::Zero => Node::One,
            Node::One => Node::Zero,
            Node::Wire(a) => self.push(GateKind::Inv, [a.as_str(), ""]),
        }
    }

    /// Appends `a ^ b`.
    pub fn xor(&mut self, a: &Node, b: &Node) -> Node {
        match (a, b) {
            (Node::Zero, x) | (x, Node::Zero) => x.clone(),
            (Node::One, x) | (x, Node::One) => self.inv(x),
            (Node::Wire(a), Node::Wire(b)) if a == b => Node::Zero,
            (Node::Wire(a), Node::Wire(b)) => self.push(GateKind::Xor, [a.as_str(), b.as_str()]),
        }
    }

    /// Appends `a & b`.
    pub fn and(&mut self, a: &Node, b: &Node) -> Node {
        match (a, b) {
            (Node::Zero, _) | (_, Node::Zero) => Node::Zero,
            (Node::One, x) | (x, Node::One) => x.clone(),
            (Node::Wire(a), Node::Wire(b)) if a == b => Node::Wire(a.clone()),
            (Node::Wire(a), Node::Wire(b)) => self.push(GateKind::And, [a.as_str(), b.as_str()]),
        }
    }

    /// Appends `a | b`.
    pub fn or(&mut self, a: &Node, b: &Node) -> Node {
        match (a, b) {
            (Node::One, _) | (_, Node::One) => Node::One,
            (Node::Zero, x) | (x, Node::Zero) => x.clone(),
            (Node::Wire(a), Node::Wire(b)) if a == b => Node::Wire(a.clone()),
            (Node::Wire(a), Node::Wire(b)) => self.push(GateKind::Or, [a.as_str(), b.as_str()]),
        }
    }

    /// Appends a full adder, returning `(sum, carry)`.
    pub fn full_adder(&mut self, a: &Node, b: &Node, carry: &Node) -> (Node, Node) {
        let t = self.xor(a, b);
        let sum = self.xor(&t, carry);

        let ab = self.and(a, b);
        let tc = self.and(&t, carry);
        let carry = self.or(&ab, &tc);

        (sum, carry)
    }

    /// Appends a ripple-carry adder computing `a + b + carry` modulo
    /// `2^a.len()`.
    ///
    /// Both operands are little-endian and `b` is zero-extended or truncated to
    /// the width of `a`.
    pub fn add(&mut self, a: &[Node], b: &[Node], carry: Node) -> Vec<Node> {
        let mut carry = carry;
        let mut sum = Vec::with_capacity(a.len());

        for (i, a) in a.iter().enumerate() {
            let b = b.get(i).unwrap_or(&Node::Zero);
            let (s, c) = self.full_adder(a, b, &carry);
            sum.push(s);
            carry = c;
        }

        sum
    }

    /// Declares `node` as an output of the circuit under the given name.
    ///
    /// Returns an error if the node is a constant.
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        node: &Node,
    ) -> Result<(), CircuitError> {
        let name = name.into();
        let Node::Wire(wire) = node else {
            return Err(CircuitError::ConstantOutput(name));
        };

        self.gates
            .push(Gate::new(GateKind::Buf, [wire.as_str()], name.clone()));
        self.outputs.push(name);

        Ok(())
    }

    /// Builds the circuit.
    pub fn build(self) -> Result<Circuit, CircuitError> {
        Circuit::new(self.gates, self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_constant_folding() {
        let mut builder = CircuitBuilder::new();
        let a = Node::wire("a");

        assert_eq!(builder.and(&a, &Node::Zero), Node::Zero);
        assert_eq!(builder.and(&Node::One, &a), a);
        assert_eq!(builder.or(&a, &Node::One), Node::One);
        assert_eq!(builder.xor(&a, &Node::Zero), a);
        assert_eq!(builder.xor(&a, &a), Node::Zero);
        assert_eq!(builder.inv(&Node::Zero), Node::One);

        // Only `xor(a, 1)` should emit a gate.
        let _ = builder.xor(&Node::One, &a);
        assert_eq!(builder.gates.len(), 1);
        assert_eq!(builder.gates[0].kind(), GateKind::Inv);
    }

    #[test]
    fn test_constant_output_rejected() {
        let mut builder = CircuitBuilder::new();

        assert!(matches!(
            builder.add_output("out", &Node::One),
            Err(CircuitError::ConstantOutput(name)) if name == "out"
        ));
    }

    #[test]
    fn test_adder() {
        let mut builder = CircuitBuilder::new();
        let a: Vec<_> = (0..4).map(|i| Node::wire(format!("a{i}"))).collect();
        let b: Vec<_> = (0..4).map(|i| Node::wire(format!("b{i}"))).collect();

        let sum = builder.add(&a, &b, Node::Zero);
        for (i, bit) in sum.iter().enumerate() {
            builder.add_output(format!("s{i}"), bit).unwrap();
        }
        let circ = builder.build().unwrap();

        for x in 0u8..16 {
            for y in 0u8..16 {
                let mut inputs = HashMap::new();
                for i in 0..4 {
                    inputs.insert(format!("a{i}"), (x >> i) & 1 == 1);
                    inputs.insert(format!("b{i}"), (y >> i) & 1 == 1);
                }

                let out = circ.evaluate(&inputs).unwrap();
                let value = out
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, bit)| acc | ((*bit as u8) << i));

                assert_eq!(value, x.wrapping_add(y) & 0xf);
            }
        }
    }
}
