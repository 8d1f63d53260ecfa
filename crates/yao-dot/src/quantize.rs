//! Fixed-point quantization of real valued vectors.

/// Errors that can occur during quantization.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum QuantizeError {
    #[error("value {value} at index {index} is outside [-1, 1]")]
    OutOfRange { index: usize, value: f64 },
}

/// A vector in sign-magnitude form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizedVector {
    magnitudes: Vec<u32>,
    positive: Vec<bool>,
}

/// Quantizes values in `[-1, 1]` to `bits` wide magnitudes and sign bits.
///
/// `x * (2^bits - 1)` is rounded to the nearest integer with halves rounded
/// up, the magnitude is the absolute value of the result. The sign bit is set
/// if `x > 0`.
pub fn quantize(values: &[f64], bits: usize) -> Result<QuantizedVector, QuantizeError> {
    let scale = ((1u64 << bits) - 1) as f64;

    let mut magnitudes = Vec::with_capacity(values.len());
    let mut positive = Vec::with_capacity(values.len());
    for (index, &value) in values.iter().enumerate() {
        if !(-1.0..=1.0).contains(&value) {
            return Err(QuantizeError::OutOfRange { index, value });
        }

        let rounded = (value * scale + 0.5).floor();
        magnitudes.push(rounded.abs() as u32);
        positive.push(value > 0.0);
    }

    Ok(QuantizedVector {
        magnitudes,
        positive,
    })
}

impl QuantizedVector {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Returns `true` if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Returns the magnitudes.
    pub fn magnitudes(&self) -> &[u32] {
        &self.magnitudes
    }

    /// Returns the sign bits, `true` for positive entries.
    pub fn positive(&self) -> &[bool] {
        &self.positive
    }

    /// Returns the signed value of every entry.
    pub fn to_signed(&self) -> Vec<i64> {
        self.magnitudes
            .iter()
            .zip(&self.positive)
            .map(|(&m, &positive)| if positive { m as i64 } else { -(m as i64) })
            .collect()
    }

    /// Returns the number of sub-vectors of length `width`.
    ///
    /// A partial trailing sub-vector counts, an empty vector has none.
    pub fn sub_vector_count(&self, width: usize) -> usize {
        (self.len() + width - 1) / width
    }

    /// Returns sub-vector `idx` of length `width`, padded with zeros.
    pub fn sub_vector(&self, idx: usize, width: usize) -> QuantizedVector {
        let start = (idx * width).min(self.len());
        let end = (start + width).min(self.len());

        let mut magnitudes = self.magnitudes[start..end].to_vec();
        let mut positive = self.positive[start..end].to_vec();
        magnitudes.resize(width, 0);
        positive.resize(width, false);

        QuantizedVector {
            magnitudes,
            positive,
        }
    }

    /// Returns the circuit input bits of this vector.
    ///
    /// All magnitude bits come first, least significant bit first per entry,
    /// followed by all sign bits.
    pub fn to_bits(&self, bits: usize) -> Vec<bool> {
        let magnitude_bits = self
            .magnitudes
            .iter()
            .flat_map(|m| (0..bits).map(move |bit| (m >> bit) & 1 == 1));

        magnitude_bits.chain(self.positive.iter().copied()).collect()
    }
}

/// Computes the dot product of two quantized vectors in the clear.
///
/// The shorter vector is implicitly zero padded.
pub fn quantized_dot(a: &QuantizedVector, b: &QuantizedVector) -> i64 {
    a.to_signed()
        .into_iter()
        .zip(b.to_signed())
        .map(|(a, b)| a * b)
        .sum()
}

/// Decodes little-endian bits as a two's complement integer.
///
/// At most 64 bits are supported.
pub fn decode_twos_complement(bits: &[bool]) -> i64 {
    let Some(&sign) = bits.last() else {
        return 0;
    };

    let raw = bits
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &bit)| acc | ((bit as u64) << i));

    if sign && bits.len() < 64 {
        (raw | (u64::MAX << bits.len())) as i64
    } else {
        raw as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    #[case(1.0, 15, true)]
    #[case(-1.0, 15, false)]
    #[case(0.0, 0, false)]
    #[case(-0.0, 0, false)]
    #[case(0.2, 3, true)]
    #[case(0.5, 8, true)]
    #[case(-0.5, 7, false)]
    #[case(-0.9, 13, false)]
    fn test_quantize(#[case] value: f64, #[case] magnitude: u32, #[case] positive: bool) {
        let q = quantize(&[value], 4).unwrap();

        assert_eq!(q.magnitudes(), [magnitude]);
        assert_eq!(q.positive(), [positive]);
    }

    #[rstest]
    #[case(1.5)]
    #[case(-1.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_quantize_out_of_range(#[case] value: f64) {
        assert!(matches!(
            quantize(&[0.0, value], 4),
            Err(QuantizeError::OutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_quantization_error_is_bounded() {
        let bits = 4;
        let scale = 15.0;
        let values: Vec<f64> = (0..=200).map(|i| -1.0 + i as f64 / 100.0).collect();
        let q = quantize(&values, bits).unwrap();

        for (value, signed) in values.iter().zip(q.to_signed()) {
            assert!((value - signed as f64 / scale).abs() <= 0.5 / scale + 1e-12);
        }
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(20, 2)]
    #[case(21, 3)]
    fn test_sub_vector_count(#[case] len: usize, #[case] count: usize) {
        let q = quantize(&vec![0.5; len], 4).unwrap();

        assert_eq!(q.sub_vector_count(10), count);
    }

    #[test]
    fn test_sub_vector_padding() {
        let q = quantize(&[1.0, -1.0, 0.5], 4).unwrap();

        let first = q.sub_vector(0, 2);
        assert_eq!(first.magnitudes(), [15, 15]);
        assert_eq!(first.positive(), [true, false]);

        let last = q.sub_vector(1, 2);
        assert_eq!(last.magnitudes(), [8, 0]);
        assert_eq!(last.positive(), [true, false]);
    }

    #[test]
    fn test_to_bits_order() {
        let q = quantize(&[1.0, -0.2], 4).unwrap();

        assert_eq!(
            q.to_bits(4),
            [
                true, true, true, true, // 15
                true, true, false, false, // 3
                true, false, // signs
            ]
        );
    }

    #[rstest]
    #[case(&[false, false, false, false], 0)]
    #[case(&[true, false, true, false], 5)]
    #[case(&[true, true, true, true], -1)]
    #[case(&[false, false, false, true], -8)]
    #[case(&[], 0)]
    fn test_decode_twos_complement(#[case] bits: &[bool], #[case] expected: i64) {
        assert_eq!(decode_twos_complement(bits), expected);
    }

    #[test]
    fn test_quantized_dot() {
        let a = quantize(&[1.0, -1.0, 0.0], 4).unwrap();
        let b = quantize(&[1.0, 1.0], 4).unwrap();

        assert_eq!(quantized_dot(&a, &b), 0);
        assert_eq!(quantized_dot(&a, &a), 450);
    }
}
