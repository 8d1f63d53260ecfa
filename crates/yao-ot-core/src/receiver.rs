use crate::{
    msgs::{ReceiverPayload, SenderPayload, SenderSetup},
    rounds::{receiver_round1, receiver_round2, PublicParams, ReceiverSecrets},
    OtConfig, ReceiverError,
};

use rand::{CryptoRng, Rng};

type Error = ReceiverError;
type Result<T, E = Error> = core::result::Result<T, E>;

/// An oblivious transfer receiver.
#[derive(Debug)]
pub struct Receiver<T: state::State = state::Initialized> {
    config: OtConfig,
    /// Current state
    state: T,
}

impl Receiver {
    /// Creates a new Receiver
    pub fn new(config: OtConfig) -> Self {
        Receiver {
            config,
            state: state::Initialized,
        }
    }

    /// Blinds the choices and returns the payload to be sent to the sender.
    ///
    /// # Arguments
    ///
    /// * `rng` - The RNG used to sample the blinding factors.
    /// * `sender_setup` - The sender's setup message.
    /// * `choices` - One choice bit per transfer.
    pub fn choose<R: Rng + CryptoRng>(
        self,
        rng: &mut R,
        sender_setup: SenderSetup,
        choices: &[bool],
    ) -> Result<(ReceiverPayload, Receiver<state::Chosen>)> {
        let SenderSetup { params } = sender_setup;

        if params.len() != choices.len() {
            return Err(ReceiverError::CountMismatch(params.len(), choices.len()));
        }

        let (v, secrets): (Vec<_>, Vec<_>) = params
            .iter()
            .zip(choices)
            .map(|(params, choice)| receiver_round1(&mut *rng, params, *choice))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();

        Ok((
            ReceiverPayload { v },
            Receiver {
                config: self.config,
                state: state::Chosen { params, secrets },
            },
        ))
    }
}

impl Receiver<state::Chosen> {
    /// Unmasks the chosen messages.
    ///
    /// # Arguments
    ///
    /// * `sender_payload` - The sender's masked messages.
    pub fn receive(self, sender_payload: SenderPayload) -> Result<Vec<Vec<u8>>> {
        let state::Chosen { params, secrets } = self.state;
        let SenderPayload { blinded } = sender_payload;

        if secrets.len() != blinded.len() {
            return Err(ReceiverError::CountMismatch(secrets.len(), blinded.len()));
        }

        let msg_len = self.config.msg_len();
        secrets
            .iter()
            .zip(&params)
            .zip(&blinded)
            .map(|((secrets, params), blinded)| {
                receiver_round2(secrets, &params.n, blinded, msg_len)
            })
            .collect()
    }
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Chosen {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    pub struct Initialized;

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after the choices were sent.
    pub struct Chosen {
        pub(super) params: Vec<PublicParams>,
        pub(super) secrets: Vec<ReceiverSecrets>,
    }

    impl State for Chosen {}

    opaque_debug::implement!(Chosen);
}
