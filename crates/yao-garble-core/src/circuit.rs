use serde::{Deserialize, Serialize};
use yao_core::LABEL_LEN;

use crate::cipher::{IV_LEN, TAG_LEN};

/// A row of a garbled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRow {
    pub(crate) ciphertext: [u8; LABEL_LEN],
    pub(crate) iv: [u8; IV_LEN],
    pub(crate) tag: [u8; TAG_LEN],
    /// Point-and-permute bits of the input labels, in input order.
    pub(crate) lsbs: Vec<bool>,
}

impl EncryptedRow {
    /// Returns the encrypted output label.
    #[inline]
    pub fn ciphertext(&self) -> &[u8; LABEL_LEN] {
        &self.ciphertext
    }

    /// Returns the AES-GCM nonce.
    #[inline]
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Returns the AES-GCM authentication tag.
    #[inline]
    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Returns the point-and-permute bits of the input labels which decrypt
    /// this row.
    #[inline]
    pub fn lsbs(&self) -> &[bool] {
        &self.lsbs
    }
}

/// The garbled table of a single gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledTable {
    pub(crate) rows: Vec<EncryptedRow>,
}

impl GarbledTable {
    /// Returns the rows of the table.
    #[inline]
    pub fn rows(&self) -> &[EncryptedRow] {
        &self.rows
    }
}

/// A garbled circuit, one table per gate in gate order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledCircuit {
    /// Garbled tables.
    pub tables: Vec<GarbledTable>,
}
