//! Low-level 1-out-of-2 oblivious transfer based on RSA blinding.
//!
//! For every transfer the sender generates an RSA key pair `(e, N, d)` and two
//! random values `x0, x1 < N`. The receiver with choice bit `b` blinds `x_b`
//! with a random `k` as `v = x_b + k^e mod N`. The sender unblinds `v` against
//! both `x0` and `x1`, only one of which yields `k`, and masks each message
//! with the respective result. The receiver can then unmask exactly the chosen
//! message.
//!
//! The protocol is secure against semi-honest adversaries only.
//!
//! [`rounds`] contains the per-transfer round functions, [`Sender`] and
//! [`Receiver`] batch them over many transfers.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod config;
mod error;
pub mod msgs;
mod receiver;
pub mod rounds;
mod sender;

pub use config::{OtConfig, OtConfigBuilder, OtConfigBuilderError};
pub use error::{ReceiverError, SenderError};
pub use receiver::{state as receiver_state, Receiver};
pub use sender::{state as sender_state, Sender};

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rstest::*;

    const MSG_LEN: usize = 32;

    #[fixture]
    fn config() -> OtConfig {
        OtConfig::builder()
            .modulus_bits(512)
            .msg_len(MSG_LEN)
            .build()
            .unwrap()
    }

    #[fixture]
    fn choices() -> Vec<bool> {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        (0..16).map(|_| rng.gen()).collect()
    }

    #[fixture]
    fn data() -> Vec<[[u8; MSG_LEN]; 2]> {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        (0..16).map(|_| [rng.gen(), rng.gen()]).collect()
    }

    #[rstest]
    fn test_ot_pass(config: OtConfig, choices: Vec<bool>, mut data: Vec<[[u8; MSG_LEN]; 2]>) {
        let mut rng = ChaCha12Rng::seed_from_u64(2);

        // Leading zero bytes must survive the transfer.
        data[0] = [[0u8; MSG_LEN], [0u8; MSG_LEN]];
        data[1][0][..4].copy_from_slice(&[0, 0, 0, 0]);
        data[1][1][..4].copy_from_slice(&[0, 0, 0, 0]);

        let (setup, sender) = Sender::new(config.clone()).setup(&mut rng, &data).unwrap();
        let (receiver_payload, receiver) = Receiver::new(config)
            .choose(&mut rng, setup, &choices)
            .unwrap();
        let (sender_payload, _) = sender.send(receiver_payload).unwrap();
        let msgs = receiver.receive(sender_payload).unwrap();

        assert_eq!(msgs.len(), data.len());
        for ((msg, pair), choice) in msgs.iter().zip(&data).zip(&choices) {
            assert_eq!(msg.as_slice(), pair[*choice as usize].as_slice());
        }
    }

    #[rstest]
    fn test_sender_count_mismatch(config: OtConfig, data: Vec<[[u8; MSG_LEN]; 2]>) {
        let mut rng = ChaCha12Rng::seed_from_u64(3);

        let (setup, sender) = Sender::new(config.clone())
            .setup(&mut rng, &data[..2])
            .unwrap();
        let (mut payload, _) = Receiver::new(config)
            .choose(&mut rng, setup, &[true, false])
            .unwrap();
        payload.v.pop();

        assert!(matches!(
            sender.send(payload),
            Err(SenderError::CountMismatch(2, 1))
        ));
    }

    #[rstest]
    fn test_receiver_count_mismatch(config: OtConfig, data: Vec<[[u8; MSG_LEN]; 2]>) {
        let mut rng = ChaCha12Rng::seed_from_u64(4);

        let (setup, _) = Sender::new(config.clone())
            .setup(&mut rng, &data[..2])
            .unwrap();

        assert!(matches!(
            Receiver::new(config).choose(&mut rng, setup, &[true]),
            Err(ReceiverError::CountMismatch(2, 1))
        ));
    }

    #[rstest]
    fn test_wrong_message_length(config: OtConfig) {
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let data = vec![[vec![0u8; MSG_LEN], vec![0u8; MSG_LEN + 1]]];

        assert!(matches!(
            Sender::new(config).setup(&mut rng, &data),
            Err(SenderError::MessageLength { .. })
        ));
    }

    #[test]
    fn test_modulus_too_small() {
        assert!(OtConfig::builder()
            .modulus_bits(256)
            .msg_len(32)
            .build()
            .is_err());
    }
}
