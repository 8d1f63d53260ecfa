//! Round functions of a single transfer.
//!
//! 1. [`sender_round1`]: the sender publishes `(e, N, x0, x1)`.
//! 2. [`receiver_round1`]: the receiver answers with `v = x_b + k^e mod N`.
//! 3. [`sender_round2`]: the sender answers with `m_i + (v - x_i)^d mod N`.
//! 4. [`receiver_round2`]: the receiver recovers `m_b`.

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, Rng};
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    RsaPrivateKey,
};
use serde::{Deserialize, Serialize};
use yao_core::bigint::{self, decimal};

use crate::{ReceiverError, SenderError};

/// Public parameters of a single transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams {
    /// Public exponent.
    #[serde(with = "decimal")]
    pub e: BigUint,
    /// Modulus.
    #[serde(with = "decimal")]
    pub n: BigUint,
    /// Random value associated with message 0.
    #[serde(with = "decimal")]
    pub x0: BigUint,
    /// Random value associated with message 1.
    #[serde(with = "decimal")]
    pub x1: BigUint,
}

impl PublicParams {
    fn validate(&self) -> Result<(), ReceiverError> {
        if self.n <= BigUint::from(1u8) {
            return Err(ReceiverError::InvalidParams("modulus must exceed 1".to_string()));
        }

        if self.x0 >= self.n || self.x1 >= self.n {
            return Err(ReceiverError::InvalidParams(
                "x0 and x1 must be reduced modulo N".to_string(),
            ));
        }

        Ok(())
    }
}

/// The sender's secret state of a single transfer.
pub struct SenderSecrets {
    params: PublicParams,
    d: BigUint,
    msgs: [BigUint; 2],
}

opaque_debug::implement!(SenderSecrets);

/// The receiver's secret state of a single transfer.
pub struct ReceiverSecrets {
    choice: bool,
    k: BigUint,
}

opaque_debug::implement!(ReceiverSecrets);

/// The masked messages `(m0 + k0, m1 + k1) mod N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindedPair {
    /// Masked message 0.
    #[serde(with = "decimal")]
    pub m0k: BigUint,
    /// Masked message 1.
    #[serde(with = "decimal")]
    pub m1k: BigUint,
}

/// Generates an RSA key pair, returning `(e, N, d)`.
///
/// This is CPU intensive and blocks the calling thread.
pub fn generate_keypair<R: Rng + CryptoRng>(
    rng: &mut R,
    modulus_bits: usize,
) -> Result<(BigUint, BigUint, BigUint), SenderError> {
    let key = RsaPrivateKey::new(rng, modulus_bits)
        .map_err(|e| SenderError::KeyGeneration(e.to_string()))?;

    Ok((
        BigUint::from_bytes_be(&key.e().to_bytes_be()),
        BigUint::from_bytes_be(&key.n().to_bytes_be()),
        BigUint::from_bytes_be(&key.d().to_bytes_be()),
    ))
}

/// First sender round.
///
/// Generates a fresh key pair and the values `x0, x1`. The messages are
/// interpreted as big-endian integers and must be exactly `msg_len` bytes.
pub fn sender_round1<R: Rng + CryptoRng>(
    rng: &mut R,
    modulus_bits: usize,
    msg_len: usize,
    msgs: [&[u8]; 2],
) -> Result<(PublicParams, SenderSecrets), SenderError> {
    if msg_len * 8 >= modulus_bits {
        return Err(SenderError::ModulusTooSmall {
            modulus_bits,
            msg_len,
        });
    }

    if let Some(msg) = msgs.iter().find(|msg| msg.len() != msg_len) {
        return Err(SenderError::MessageLength {
            expected: msg_len,
            actual: msg.len(),
        });
    }

    let (e, n, d) = generate_keypair(rng, modulus_bits)?;
    let x0 = rng.gen_biguint_below(&n);
    let x1 = rng.gen_biguint_below(&n);

    let params = PublicParams { e, n, x0, x1 };
    let secrets = SenderSecrets {
        params: params.clone(),
        d,
        msgs: msgs.map(bigint::from_be_bytes),
    };

    Ok((params, secrets))
}

/// First receiver round.
///
/// Returns the blinded choice `v` which is sent to the sender.
pub fn receiver_round1<R: Rng + CryptoRng>(
    rng: &mut R,
    params: &PublicParams,
    choice: bool,
) -> Result<(BigUint, ReceiverSecrets), ReceiverError> {
    params.validate()?;

    let PublicParams { e, n, x0, x1 } = params;
    let x = if choice { x1 } else { x0 };

    let k = rng.gen_biguint_below(n);
    let v = (x + k.modpow(e, n)) % n;

    Ok((v, ReceiverSecrets { choice, k }))
}

/// Second sender round.
///
/// Computes `k_i = (v - x_i)^d mod N` and masks both messages.
pub fn sender_round2(secrets: &SenderSecrets, v: &BigUint) -> Result<BlindedPair, SenderError> {
    let SenderSecrets { params, d, msgs } = secrets;
    let n = &params.n;

    if v >= n {
        return Err(SenderError::ValueOutOfRange);
    }

    let k0 = sub_mod(v, &params.x0, n).modpow(d, n);
    let k1 = sub_mod(v, &params.x1, n).modpow(d, n);

    Ok(BlindedPair {
        m0k: (&msgs[0] + k0) % n,
        m1k: (&msgs[1] + k1) % n,
    })
}

/// Second receiver round.
///
/// Recovers the chosen message as exactly `msg_len` big-endian bytes.
pub fn receiver_round2(
    secrets: &ReceiverSecrets,
    n: &BigUint,
    blinded: &BlindedPair,
    msg_len: usize,
) -> Result<Vec<u8>, ReceiverError> {
    if &blinded.m0k >= n || &blinded.m1k >= n {
        return Err(ReceiverError::ValueOutOfRange);
    }

    let masked = if secrets.choice {
        &blinded.m1k
    } else {
        &blinded.m0k
    };

    let msg = sub_mod(masked, &secrets.k, n);

    Ok(bigint::to_be_bytes_fixed(&msg, msg_len)?)
}

/// Computes `a - b mod n` for `a, b < n`.
fn sub_mod(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    (a + n - b) % n
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::*;

    const MODULUS_BITS: usize = 512;
    const MSG_LEN: usize = 32;

    #[fixture]
    #[once]
    fn keypair() -> (BigUint, BigUint, BigUint) {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        generate_keypair(&mut rng, MODULUS_BITS).unwrap()
    }

    fn transfer(rng: &mut ChaCha12Rng, msgs: [[u8; MSG_LEN]; 2], choice: bool) -> Vec<u8> {
        let (params, sender) =
            sender_round1(rng, MODULUS_BITS, MSG_LEN, [&msgs[0], &msgs[1]]).unwrap();
        let (v, receiver) = receiver_round1(rng, &params, choice).unwrap();
        let blinded = sender_round2(&sender, &v).unwrap();

        receiver_round2(&receiver, &params.n, &blinded, MSG_LEN).unwrap()
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_transfer(#[case] choice: bool) {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let msgs = [[0xa5u8; MSG_LEN], [0x5au8; MSG_LEN]];

        assert_eq!(transfer(&mut rng, msgs, choice), msgs[choice as usize]);
    }

    #[test]
    fn test_transfer_leading_zeros() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let mut msgs = [[0u8; MSG_LEN], [0u8; MSG_LEN]];
        msgs[1][MSG_LEN - 1] = 1;

        assert_eq!(transfer(&mut rng, msgs, false), msgs[0]);
        assert_eq!(transfer(&mut rng, msgs, true), msgs[1]);
    }

    #[test]
    fn test_unchosen_message_is_hidden() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let msgs = [[1u8; MSG_LEN], [2u8; MSG_LEN]];

        let (params, sender) =
            sender_round1(&mut rng, MODULUS_BITS, MSG_LEN, [&msgs[0], &msgs[1]]).unwrap();
        let (v, receiver) = receiver_round1(&mut rng, &params, false).unwrap();
        let blinded = sender_round2(&sender, &v).unwrap();

        // Unmasking the other message with `k` yields garbage.
        let other = sub_mod(&blinded.m1k, &receiver.k, &params.n);
        assert_ne!(other, bigint::from_be_bytes(&msgs[1]));
    }

    #[rstest]
    fn test_blinded_choice_is_uniform(keypair: &(BigUint, BigUint, BigUint)) {
        let mut rng = ChaCha12Rng::seed_from_u64(4);
        let (e, n, _) = keypair.clone();
        let params = PublicParams {
            x0: rng.gen_biguint_below(&n),
            x1: rng.gen_biguint_below(&n),
            e,
            n,
        };
        let half = &params.n >> 1u32;

        let mut low = [0usize; 2];
        let trials = 400;
        for choice in [false, true] {
            for _ in 0..trials {
                let (v, _) = receiver_round1(&mut rng, &params, choice).unwrap();
                if v < half {
                    low[choice as usize] += 1;
                }
            }
        }

        let frac0 = low[0] as f64 / trials as f64;
        let frac1 = low[1] as f64 / trials as f64;

        assert!((frac0 - 0.5).abs() < 0.1, "{frac0}");
        assert!((frac1 - 0.5).abs() < 0.1, "{frac1}");
        assert!((frac0 - frac1).abs() < 0.1, "{frac0} vs {frac1}");
    }

    #[rstest]
    fn test_rejects_unreduced_values(keypair: &(BigUint, BigUint, BigUint)) {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let (e, n, _) = keypair.clone();

        let params = PublicParams {
            x0: n.clone(),
            x1: BigUint::default(),
            e,
            n,
        };
        assert!(matches!(
            receiver_round1(&mut rng, &params, true),
            Err(ReceiverError::InvalidParams(_))
        ));

        let msgs = [[0u8; MSG_LEN], [0u8; MSG_LEN]];
        let (params, sender) =
            sender_round1(&mut rng, MODULUS_BITS, MSG_LEN, [&msgs[0], &msgs[1]]).unwrap();
        assert!(matches!(
            sender_round2(&sender, &params.n),
            Err(SenderError::ValueOutOfRange)
        ));
    }

    #[test]
    fn test_modulus_too_small() {
        let mut rng = ChaCha12Rng::seed_from_u64(6);
        let msgs = [[0u8; MSG_LEN], [0u8; MSG_LEN]];

        assert!(matches!(
            sender_round1(&mut rng, 256, MSG_LEN, [&msgs[0], &msgs[1]]),
            Err(SenderError::ModulusTooSmall { .. })
        ));
    }
}
