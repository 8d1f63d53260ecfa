use core::fmt;

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// Length of a wire label in bytes.
pub const LABEL_LEN: usize = 32;

/// A 256-bit wire label.
///
/// A label stands in for one boolean value on one wire. The least significant
/// bit of the last byte is the point-and-permute bit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label([u8; LABEL_LEN]);

/// Error returned when converting a byte slice of the wrong length into a
/// [`Label`].
#[derive(Debug, thiserror::Error)]
#[error("invalid label length: expected {LABEL_LEN}, got {0}")]
pub struct LabelLengthError(usize);

impl Label {
    /// Creates a new label from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; LABEL_LEN]) -> Self {
        Self(bytes)
    }

    /// Generates a random label.
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; LABEL_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Generates a label pair whose point-and-permute bits differ.
    ///
    /// The label at index `i` encodes the value `i`.
    pub fn random_pair<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> [Self; 2] {
        let low = Self::random(rng);
        let mut high = Self::random(rng);

        if low.lsb() == high.lsb() {
            high.0[LABEL_LEN - 1] ^= 1;
        }

        [low, high]
    }

    /// Returns the point-and-permute bit.
    #[inline]
    pub fn lsb(&self) -> bool {
        self.0[LABEL_LEN - 1] & 1 == 1
    }

    /// Returns a reference to the label bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }

    /// Returns the label bytes.
    #[inline]
    pub fn to_bytes(self) -> [u8; LABEL_LEN] {
        self.0
    }
}

impl From<[u8; LABEL_LEN]> for Label {
    #[inline]
    fn from(bytes: [u8; LABEL_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Label {
    type Error = LabelLengthError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        <[u8; LABEL_LEN]>::try_from(value)
            .map(Self)
            .map_err(|_| LabelLengthError(value.len()))
    }
}

impl AsRef<[u8]> for Label {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", hex::encode(self.0))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
