use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Key, Nonce, Tag,
};
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use yao_core::{Label, LABEL_LEN};

use crate::EncryptedRow;

/// Length of the AES-GCM nonce in bytes.
pub(crate) const IV_LEN: usize = 12;
/// Length of the AES-GCM tag in bytes.
pub(crate) const TAG_LEN: usize = 16;

/// Derives the key of a table row from its input labels.
///
/// The labels are sorted so the key does not depend on the input order.
pub(crate) fn row_key(labels: &[Label]) -> Key<Aes256Gcm> {
    let mut sorted = labels.to_vec();
    sorted.sort();

    let mut hasher = Sha256::new();
    for label in &sorted {
        hasher.update(label.as_bytes());
    }

    hasher.finalize()
}

/// Encrypts an output label into a table row.
pub(crate) fn encrypt_row<R: Rng + CryptoRng>(
    rng: &mut R,
    key: &Key<Aes256Gcm>,
    gate: usize,
    label: &Label,
    lsbs: Vec<bool>,
) -> Result<EncryptedRow, aes_gcm::Error> {
    let iv: [u8; IV_LEN] = rng.gen();
    let mut ciphertext = label.to_bytes();

    let tag = Aes256Gcm::new(key).encrypt_in_place_detached(
        Nonce::from_slice(&iv),
        &aad(gate),
        &mut ciphertext,
    )?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(EncryptedRow {
        ciphertext,
        iv,
        tag: tag_bytes,
        lsbs,
    })
}

/// Decrypts a table row, authenticating it against the gate index.
pub(crate) fn decrypt_row(
    key: &Key<Aes256Gcm>,
    gate: usize,
    row: &EncryptedRow,
) -> Result<Label, aes_gcm::Error> {
    let mut plaintext: [u8; LABEL_LEN] = row.ciphertext;

    Aes256Gcm::new(key).decrypt_in_place_detached(
        Nonce::from_slice(&row.iv),
        &aad(gate),
        &mut plaintext,
        Tag::from_slice(&row.tag),
    )?;

    Ok(Label::new(plaintext))
}

#[inline]
fn aad(gate: usize) -> [u8; 8] {
    (gate as u64).to_be_bytes()
}
