use std::collections::{BTreeSet, HashMap};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;
use yao_circuits::{circuits, Circuit};
use yao_core::Label;
use yao_garble_core::{evaluate, EvaluatorOutput, GarbledCircuit};
use yao_ot_core::{
    msgs::{SenderPayload, SenderSetup},
    receiver_state, OtConfig, Receiver,
};

use crate::{
    msgs::{Message, Step},
    quantize::{quantize, QuantizedVector},
    DotProductError, ProtocolConfig,
};

type Result<T, E = DotProductError> = core::result::Result<T, E>;

/// Scratch state of a single sub-vector exchange, waiting for the masked
/// labels.
struct Exchange {
    receiver: Receiver<receiver_state::Chosen>,
    garbled: GarbledCircuit,
    alice_labels: HashMap<String, Label>,
}

/// The evaluator.
///
/// Bob obtains the labels of his inputs by oblivious transfer, evaluates the
/// garbled circuit and returns the output labels to Alice.
pub struct Bob {
    config: ProtocolConfig,
    ot_config: OtConfig,
    circuit: Circuit,
    vector: QuantizedVector,
    rng: ChaCha20Rng,
    exchanges: HashMap<usize, Exchange>,
    evaluated: BTreeSet<usize>,
    total: Option<i64>,
}

opaque_debug::implement!(Bob);

impl Bob {
    /// Creates a new Bob.
    ///
    /// # Arguments
    ///
    /// * `config` - The protocol configuration.
    /// * `values` - Bob's vector, every value must lie in `[-1, 1]`.
    pub fn new(config: ProtocolConfig, values: &[f64]) -> Result<Self> {
        Self::with_rng(config, values, ChaCha20Rng::from_entropy())
    }

    /// Creates a new Bob with the provided RNG seed.
    pub fn new_with_seed(
        config: ProtocolConfig,
        values: &[f64],
        seed: [u8; 32],
    ) -> Result<Self> {
        Self::with_rng(config, values, ChaCha20Rng::from_seed(seed))
    }

    fn with_rng(config: ProtocolConfig, values: &[f64], rng: ChaCha20Rng) -> Result<Self> {
        let vector = quantize(values, config.magnitude_bits())?;
        let ot_config = config.ot_config()?;
        let circuit = config.circuit()?;

        Ok(Self {
            config,
            ot_config,
            circuit,
            vector,
            rng,
            exchanges: HashMap::new(),
            evaluated: BTreeSet::new(),
            total: None,
        })
    }

    /// Returns the protocol configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Returns the number of sub-vectors.
    pub fn sub_vector_count(&self) -> usize {
        self.vector.sub_vector_count(self.config.sub_vector_len())
    }

    /// Returns the total shared by Alice, if received.
    pub fn total(&self) -> Option<i64> {
        self.total
    }

    /// Drops the scratch state of an exchange.
    pub fn abort(&mut self, sub_vector: usize) {
        self.exchanges.remove(&sub_vector);
    }

    /// Receives a garbled circuit and blinds the choices for Bob's input
    /// labels.
    ///
    /// Replaces any previous state of the exchange.
    #[tracing::instrument(fields(sub_vector = sub_vector), skip_all, err)]
    pub fn receive_init(
        &mut self,
        sub_vector: usize,
        sub_vector_count: usize,
        garbled: GarbledCircuit,
        ot_setup: SenderSetup,
        alice_labels: HashMap<String, Label>,
    ) -> Result<Message> {
        self.exchanges.remove(&sub_vector);
        self.evaluated.remove(&sub_vector);

        let count = self.sub_vector_count();
        if sub_vector_count != count {
            return Err(DotProductError::input(format!(
                "vector length mismatch: Alice has {sub_vector_count} sub-vectors, Bob has {count}"
            )));
        }

        if sub_vector >= count {
            return Err(DotProductError::desync(format!(
                "sub-vector {sub_vector} out of range, vector has {count}"
            )));
        }

        let width = self.config.sub_vector_len();
        let bits = self.config.magnitude_bits();

        // Alice must label her own inputs only.
        let alice_wires = circuits::alice_input_wires(width, bits);
        if alice_labels.len() != alice_wires.len()
            || !alice_wires.iter().all(|wire| alice_labels.contains_key(wire))
        {
            return Err(DotProductError::desync(
                "Alice's labels do not match her input wires",
            ));
        }

        let choices = self.vector.sub_vector(sub_vector, width).to_bits(bits);
        let (v, receiver) =
            Receiver::new(self.ot_config.clone()).choose(&mut self.rng, ot_setup, &choices)?;

        self.exchanges.insert(
            sub_vector,
            Exchange {
                receiver,
                garbled,
                alice_labels,
            },
        );

        Ok(Message::Choices { sub_vector, v })
    }

    /// Unmasks Bob's input labels, evaluates the garbled circuit and returns
    /// the output labels.
    #[tracing::instrument(fields(sub_vector = sub_vector), skip_all, err)]
    pub fn resolve_inputs(
        &mut self,
        sub_vector: usize,
        payload: SenderPayload,
    ) -> Result<Message> {
        let Some(Exchange {
            receiver,
            garbled,
            alice_labels,
        }) = self.exchanges.remove(&sub_vector)
        else {
            return Err(DotProductError::desync(format!(
                "can not run {}, sub-vector {sub_vector} has no exchange in progress",
                Step::BobResolveInputs
            )));
        };

        let bob_labels = receiver.receive(payload)?;

        let width = self.config.sub_vector_len();
        let bits = self.config.magnitude_bits();

        let mut inputs = alice_labels;
        for (wire, label) in circuits::bob_input_wires(width, bits)
            .into_iter()
            .zip(bob_labels)
        {
            let label = Label::try_from(label.as_slice())
                .map_err(|err| DotProductError::desync(err.to_string()))?;
            inputs.insert(wire, label);
        }

        let EvaluatorOutput { outputs } = evaluate(&self.circuit, &garbled, inputs)?;

        self.evaluated.insert(sub_vector);

        debug!(outputs = outputs.len(), "evaluated");

        Ok(Message::OutputLabels {
            sub_vector,
            labels: outputs,
        })
    }

    /// Records the total shared by Alice.
    ///
    /// Fails unless Bob evaluated a circuit for every sub-vector.
    pub fn receive_total(&mut self, total: i64) -> Result<()> {
        let count = self.sub_vector_count();
        if let Some(missing) = (0..count).find(|idx| !self.evaluated.contains(idx)) {
            return Err(DotProductError::desync(format!(
                "received total before sub-vector {missing} of {count} was evaluated"
            )));
        }

        debug!(total, "received total");
        self.total = Some(total);

        Ok(())
    }

    /// Handles a message from Alice.
    ///
    /// Returns the reply, if any. On error the exchange is dropped, Alice may
    /// restart it with a new [`Message::Init`].
    pub fn handle(&mut self, msg: Message) -> Result<Option<Message>> {
        match msg {
            Message::Init {
                sub_vector,
                sub_vector_count,
                garbled,
                ot_setup,
                alice_labels,
            } => self
                .receive_init(sub_vector, sub_vector_count, garbled, ot_setup, alice_labels)
                .map(Some),
            Message::Blinded {
                sub_vector,
                payload,
            } => self.resolve_inputs(sub_vector, payload).map(Some),
            Message::Total { total } => self.receive_total(total).map(|_| None),
            Message::Abort {
                sub_vector,
                reason,
                retryable,
            } => {
                self.abort(sub_vector);
                Err(DotProductError::aborted(sub_vector, reason, retryable))
            }
            msg => Err(DotProductError::desync(format!(
                "Bob does not handle {} messages",
                msg.kind()
            ))),
        }
    }
}
