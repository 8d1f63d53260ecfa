use crate::{
    msgs::{ReceiverPayload, SenderPayload, SenderSetup},
    rounds::{sender_round1, sender_round2, PublicParams, SenderSecrets},
    OtConfig, SenderError,
};

use rand::{CryptoRng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

type Error = SenderError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// An oblivious transfer sender.
#[derive(Debug)]
pub struct Sender<T: state::State = state::Initialized> {
    config: OtConfig,
    /// Current state
    state: T,
}

impl Sender {
    /// Creates a new Sender
    pub fn new(config: OtConfig) -> Self {
        Sender {
            config,
            state: state::Initialized,
        }
    }

    /// Prepares one transfer per message pair and returns the setup message
    /// to be sent to the receiver.
    ///
    /// A fresh RSA key pair is generated for every transfer, so this is CPU
    /// intensive and blocks the calling thread.
    ///
    /// # Arguments
    ///
    /// * `rng` - The RNG used to seed key generation.
    /// * `msgs` - The message pairs, every message must be exactly
    ///   [`OtConfig::msg_len`] bytes.
    pub fn setup<R, M>(
        self,
        rng: &mut R,
        msgs: &[[M; 2]],
    ) -> Result<(SenderSetup, Sender<state::Setup>)>
    where
        R: Rng + CryptoRng,
        M: AsRef<[u8]> + Sync,
    {
        let modulus_bits = self.config.modulus_bits();
        let msg_len = self.config.msg_len();

        let seeds: Vec<[u8; 32]> = (0..msgs.len()).map(|_| rng.gen()).collect();
        let jobs: Vec<_> = seeds.into_iter().zip(msgs).collect();

        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                let iter = jobs.into_par_iter();
            } else {
                let iter = jobs.into_iter();
            }
        }

        let transfers = iter
            .map(|(seed, [m0, m1])| {
                let mut rng = ChaCha20Rng::from_seed(seed);
                sender_round1(
                    &mut rng,
                    modulus_bits,
                    msg_len,
                    [m0.as_ref(), m1.as_ref()],
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let (params, secrets): (Vec<PublicParams>, Vec<SenderSecrets>) =
            transfers.into_iter().unzip();

        Ok((
            SenderSetup { params },
            Sender {
                config: self.config,
                state: state::Setup { secrets },
            },
        ))
    }
}

impl Sender<state::Setup> {
    /// Returns the number of prepared transfers.
    pub fn count(&self) -> usize {
        self.state.secrets.len()
    }

    /// Obliviously sends the messages to the receiver.
    ///
    /// # Arguments
    ///
    /// * `receiver_payload` - The receiver's blinded choices.
    pub fn send(
        self,
        receiver_payload: ReceiverPayload,
    ) -> Result<(SenderPayload, Sender<state::Complete>)> {
        let state::Setup { secrets } = self.state;
        let ReceiverPayload { v } = receiver_payload;

        // Check that the number of transfers matches the number of choices
        if secrets.len() != v.len() {
            return Err(SenderError::CountMismatch(secrets.len(), v.len()));
        }

        let blinded = secrets
            .iter()
            .zip(&v)
            .map(|(secrets, v)| sender_round2(secrets, v))
            .collect::<Result<Vec<_>>>()?;

        Ok((
            SenderPayload { blinded },
            Sender {
                config: self.config,
                state: state::Complete,
            },
        ))
    }
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Setup {}
        impl Sealed for super::Complete {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    #[derive(Default)]
    pub struct Initialized;

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after setup.
    pub struct Setup {
        /// Secrets of every transfer, in order.
        pub(super) secrets: Vec<SenderSecrets>,
    }

    impl State for Setup {}

    opaque_debug::implement!(Setup);

    /// The sender's state after all messages have been sent.
    pub struct Complete;

    impl State for Complete {}

    opaque_debug::implement!(Complete);
}
