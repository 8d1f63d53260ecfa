//! Built-in circuits.

use crate::{Circuit, CircuitBuilder, CircuitError, Node};

/// Returns the name of Alice's magnitude bit `idx`, where
/// `idx = dim * bits + bit`.
pub fn alice_bit(idx: usize) -> String {
    format!("vectorA_{idx}")
}

/// Returns the name of Bob's magnitude bit `idx`, where
/// `idx = dim * bits + bit`.
pub fn bob_bit(idx: usize) -> String {
    format!("vectorB_{idx}")
}

/// Returns the name of Alice's sign bit for dimension `dim`.
pub fn alice_sign(dim: usize) -> String {
    format!("vectorC_{dim}")
}

/// Returns the name of Bob's sign bit for dimension `dim`.
pub fn bob_sign(dim: usize) -> String {
    format!("vectorD_{dim}")
}

/// Returns the name of result bit `idx`, least significant first.
pub fn result_bit(idx: usize) -> String {
    format!("result_{idx}")
}

/// Returns Alice's input wires: all magnitude bits followed by all sign bits.
pub fn alice_input_wires(dims: usize, bits: usize) -> Vec<String> {
    (0..dims * bits)
        .map(alice_bit)
        .chain((0..dims).map(alice_sign))
        .collect()
}

/// Returns Bob's input wires: all magnitude bits followed by all sign bits.
pub fn bob_input_wires(dims: usize, bits: usize) -> Vec<String> {
    (0..dims * bits)
        .map(bob_bit)
        .chain((0..dims).map(bob_sign))
        .collect()
}

/// Builds a signed dot-product circuit.
///
/// Each of the `dims` entries of a vector is given in sign-magnitude form: a
/// `bits` wide unsigned magnitude (least significant bit first) and a sign bit
/// which is `1` for positive values. The circuit outputs
/// `sum(sign(a_i) * |a_i| * sign(b_i) * |b_i|)` as an `output_bits` wide two's
/// complement integer on the wires `result_0..result_{output_bits - 1}`.
///
/// # Arguments
///
/// * `dims` - The number of vector entries.
/// * `bits` - The width of each magnitude.
/// * `output_bits` - The width of the result, must exceed `2 * bits`.
pub fn dot_product(dims: usize, bits: usize, output_bits: usize) -> Result<Circuit, CircuitError> {
    if dims == 0 || bits == 0 {
        return Err(CircuitError::InvalidParameters(format!(
            "dims and bits must be non-zero, got dims={dims}, bits={bits}"
        )));
    }

    if output_bits <= 2 * bits {
        return Err(CircuitError::InvalidParameters(format!(
            "output width {output_bits} must exceed twice the magnitude width {bits}"
        )));
    }

    let mut builder = CircuitBuilder::new();
    let mut total = vec![Node::Zero; output_bits];

    for dim in 0..dims {
        let a: Vec<_> = (0..bits).map(|bit| Node::wire(alice_bit(dim * bits + bit))).collect();
        let b: Vec<_> = (0..bits).map(|bit| Node::wire(bob_bit(dim * bits + bit))).collect();

        // Schoolbook multiplication of the magnitudes.
        let mut product = vec![Node::Zero; 2 * bits];
        for (j, b_j) in b.iter().enumerate() {
            let mut partial = vec![Node::Zero; 2 * bits];
            for (i, a_i) in a.iter().enumerate() {
                partial[i + j] = builder.and(a_i, b_j);
            }
            product = builder.add(&product, &partial, Node::Zero);
        }

        // The product is negative iff exactly one of the signs is positive.
        let negative = builder.xor(
            &Node::wire(alice_sign(dim)),
            &Node::wire(bob_sign(dim)),
        );

        // Conditionally negate: (p ^ n..n) + n, sign extended to the output width.
        let term: Vec<_> = (0..output_bits)
            .map(|i| {
                let bit = product.get(i).unwrap_or(&Node::Zero);
                builder.xor(bit, &negative)
            })
            .collect();
        let term = builder.add(&term, &[], negative);

        total = builder.add(&total, &term, Node::Zero);
    }

    for (i, bit) in total.iter().enumerate() {
        builder.add_output(result_bit(i), bit)?;
    }

    builder.build()
}
