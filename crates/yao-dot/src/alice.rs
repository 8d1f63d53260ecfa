use std::collections::{BTreeMap, HashMap};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;
use yao_circuits::{circuits, Circuit};
use yao_core::{Label, LABEL_LEN};
use yao_garble_core::{garble, resolve, GarblerOutput, LabelledCircuit};
use yao_ot_core::{msgs::ReceiverPayload, sender_state, OtConfig, Sender};

use crate::{
    msgs::{Message, Step},
    quantize::{decode_twos_complement, quantize, QuantizedVector},
    DotProductError, ProtocolConfig,
};

type Result<T, E = DotProductError> = core::result::Result<T, E>;

/// Scratch state of a single sub-vector exchange.
enum Exchange {
    /// Waiting for Bob's blinded choices.
    AwaitingChoices {
        labels: LabelledCircuit,
        sender: Sender<sender_state::Setup>,
    },
    /// Waiting for Bob's output labels.
    AwaitingOutputs { labels: LabelledCircuit },
}

impl Exchange {
    fn stage(&self) -> Step {
        match self {
            Exchange::AwaitingChoices { .. } => Step::AliceReceiveVFromBob,
            Exchange::AwaitingOutputs { .. } => Step::AliceCalcFinalSum,
        }
    }
}

/// The garbler.
///
/// Alice garbles one circuit per sub-vector, transfers Bob's input labels
/// obliviously and resolves the output labels Bob returns into partial sums.
/// Exchanges are independent of each other and may be interleaved.
pub struct Alice {
    config: ProtocolConfig,
    ot_config: OtConfig,
    circuit: Circuit,
    vector: QuantizedVector,
    rng: ChaCha20Rng,
    exchanges: HashMap<usize, Exchange>,
    partials: BTreeMap<usize, i64>,
}

opaque_debug::implement!(Alice);

impl Alice {
    /// Creates a new Alice.
    ///
    /// # Arguments
    ///
    /// * `config` - The protocol configuration.
    /// * `values` - Alice's vector, every value must lie in `[-1, 1]`.
    pub fn new(config: ProtocolConfig, values: &[f64]) -> Result<Self> {
        Self::with_rng(config, values, ChaCha20Rng::from_entropy())
    }

    /// Creates a new Alice with the provided RNG seed.
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
            partials: BTreeMap::new(),
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

    /// Returns the partial sums recorded so far.
    pub fn partials(&self) -> &BTreeMap<usize, i64> {
        &self.partials
    }

    /// Returns `true` if a partial sum is recorded for every sub-vector.
    pub fn is_complete(&self) -> bool {
        (0..self.sub_vector_count()).all(|idx| self.partials.contains_key(&idx))
    }

    /// Drops the scratch state of an exchange.
    pub fn abort(&mut self, sub_vector: usize) {
        self.exchanges.remove(&sub_vector);
    }

    /// Starts, or restarts, the exchange of a sub-vector.
    ///
    /// Garbles a fresh circuit and prepares the oblivious transfer of Bob's
    /// input labels. Any previous state of the exchange, including a recorded
    /// partial sum, is discarded.
    ///
    /// This generates one RSA key pair per input wire of Bob and blocks the
    /// calling thread accordingly.
    #[tracing::instrument(fields(sub_vector = sub_vector), skip_all, err)]
    pub fn start(&mut self, sub_vector: usize) -> Result<Message> {
        let count = self.sub_vector_count();
        if sub_vector >= count {
            return Err(DotProductError::input(format!(
                "sub-vector {sub_vector} out of range, vector has {count}"
            )));
        }

        self.exchanges.remove(&sub_vector);
        self.partials.remove(&sub_vector);

        let width = self.config.sub_vector_len();
        let bits = self.config.magnitude_bits();

        let GarblerOutput {
            labels,
            circuit: garbled,
        } = garble(&mut self.rng, &self.circuit)?;

        let inputs = self.vector.sub_vector(sub_vector, width).to_bits(bits);
        let alice_labels = circuits::alice_input_wires(width, bits)
            .into_iter()
            .zip(inputs)
            .map(|(wire, value)| -> Result<_> {
                let label = labels.encode(&wire, value)?;
                Ok((wire, label))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let ot_msgs = circuits::bob_input_wires(width, bits)
            .iter()
            .map(|wire| -> Result<_> {
                Ok([
                    labels.encode(wire, false)?.to_bytes(),
                    labels.encode(wire, true)?.to_bytes(),
                ])
            })
            .collect::<Result<Vec<[[u8; LABEL_LEN]; 2]>>>()?;

        let (ot_setup, sender) =
            Sender::new(self.ot_config.clone()).setup(&mut self.rng, &ot_msgs)?;

        debug!(gates = self.circuit.gates().len(), ots = ot_msgs.len(), "garbled");

        self.exchanges
            .insert(sub_vector, Exchange::AwaitingChoices { labels, sender });

        Ok(Message::Init {
            sub_vector,
            sub_vector_count: count,
            garbled,
            ot_setup,
            alice_labels,
        })
    }

    /// Answers Bob's blinded choices with the masked label pairs.
    #[tracing::instrument(fields(sub_vector = sub_vector), skip_all, err)]
    pub fn receive_choices(
        &mut self,
        sub_vector: usize,
        payload: ReceiverPayload,
    ) -> Result<Message> {
        let (labels, sender) = match self.exchanges.remove(&sub_vector) {
            Some(Exchange::AwaitingChoices { labels, sender }) => (labels, sender),
            other => return Err(unexpected(sub_vector, Step::AliceReceiveVFromBob, other)),
        };

        let (payload, _) = sender.send(payload)?;

        self.exchanges
            .insert(sub_vector, Exchange::AwaitingOutputs { labels });

        Ok(Message::Blinded {
            sub_vector,
            payload,
        })
    }

    /// Resolves Bob's output labels and records the partial sum.
    ///
    /// Returns the partial sum of the sub-vector.
    #[tracing::instrument(fields(sub_vector = sub_vector), skip_all, err)]
    pub fn receive_output_labels(
        &mut self,
        sub_vector: usize,
        output_labels: HashMap<String, Label>,
    ) -> Result<i64> {
        let labels = match self.exchanges.remove(&sub_vector) {
            Some(Exchange::AwaitingOutputs { labels }) => labels,
            other => return Err(unexpected(sub_vector, Step::AliceCalcFinalSum, other)),
        };

        let values = resolve(&output_labels, self.circuit.outputs(), &labels)?;
        let bits: Vec<bool> = self
            .circuit
            .outputs()
            .iter()
            .map(|name| values.get(name).copied().unwrap_or_default())
            .collect();

        let partial = decode_twos_complement(&bits);
        self.partials.insert(sub_vector, partial);

        debug!(partial, "recorded partial sum");

        Ok(partial)
    }

    /// Sums all partial sums.
    ///
    /// Fails unless a partial sum is recorded for every sub-vector.
    #[tracing::instrument(skip_all, err)]
    pub fn sum_all(&self) -> Result<i64> {
        let count = self.sub_vector_count();
        if let Some(missing) = (0..count).find(|idx| !self.partials.contains_key(idx)) {
            return Err(DotProductError::desync(format!(
                "{} can not run, partial sum {missing} of {count} is missing",
                Step::AliceSumAllSubEmbeddings
            )));
        }

        Ok(self.partials.range(..count).map(|(_, partial)| partial).sum())
    }

    /// Handles a message from Bob.
    ///
    /// Returns the reply, if any. Once the last partial sum is recorded the
    /// reply is the [`Message::Total`] to be shared with Bob. On error the
    /// exchange is dropped and must be restarted with [`Alice::start`].
    pub fn handle(&mut self, msg: Message) -> Result<Option<Message>> {
        match msg {
            Message::Choices { sub_vector, v } => self.receive_choices(sub_vector, v).map(Some),
            Message::OutputLabels { sub_vector, labels } => {
                self.receive_output_labels(sub_vector, labels)?;

                if self.is_complete() {
                    Ok(Some(Message::Total {
                        total: self.sum_all()?,
                    }))
                } else {
                    Ok(None)
                }
            }
            Message::Abort {
                sub_vector,
                reason,
                retryable,
            } => {
                self.abort(sub_vector);
                Err(DotProductError::aborted(sub_vector, reason, retryable))
            }
            msg => Err(DotProductError::desync(format!(
                "Alice does not handle {} messages",
                msg.kind()
            ))),
        }
    }
}

fn unexpected(sub_vector: usize, step: Step, found: Option<Exchange>) -> DotProductError {
    match found {
        Some(exchange) => DotProductError::desync(format!(
            "can not run {step} for sub-vector {sub_vector}, exchange is waiting for {}",
            exchange.stage()
        )),
        None => DotProductError::desync(format!(
            "can not run {step}, sub-vector {sub_vector} has no exchange in progress"
        )),
    }
}
