//! Encoding contract for arbitrary-precision integers.
//!
//! Integers are serialized as decimal strings, see [`decimal`] and
//! [`decimal_seq`]. Byte strings are mapped to integers as fixed-width
//! big-endian values, see [`from_be_bytes`] and [`to_be_bytes_fixed`].

use num_bigint::BigUint;

/// Error returned when an integer does not fit into a fixed width.
#[derive(Debug, thiserror::Error)]
#[error("integer of {actual} bytes does not fit into {width} bytes")]
pub struct WidthError {
    width: usize,
    actual: usize,
}

/// Interprets bytes as a big-endian unsigned integer.
#[inline]
pub fn from_be_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Encodes an integer as exactly `width` big-endian bytes, left-padding with
/// zeros.
pub fn to_be_bytes_fixed(value: &BigUint, width: usize) -> Result<Vec<u8>, WidthError> {
    let bytes = value.to_bytes_be();
    // `to_bytes_be` returns a single zero byte for zero.
    let bytes = if bytes == [0] { &[][..] } else { &bytes[..] };

    if bytes.len() > width {
        return Err(WidthError {
            width,
            actual: bytes.len(),
        });
    }

    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(bytes);

    Ok(out)
}

/// Serde adapter encoding a [`BigUint`] as a decimal string.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes an integer as a decimal string.
    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Deserializes an integer from a decimal string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Serde adapter encoding a sequence of [`BigUint`] as decimal strings.
pub mod decimal_seq {
    use num_bigint::BigUint;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serializes integers as a sequence of decimal strings.
    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|value| value.to_str_radix(10)))
    }

    /// Deserializes integers from a sequence of decimal strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigUint>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| s.parse().map_err(D::Error::custom))
            .collect()
    }
}
