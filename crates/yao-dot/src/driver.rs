use serio::{stream::IoStreamExt, IoSink, IoStream, SinkExt};
use tracing::{debug, warn};

use crate::{
    msgs::{Message, Step},
    Alice, Bob, DotProductError, ErrorKind,
};

type Result<T, E = DotProductError> = core::result::Result<T, E>;

/// Runs the protocol as Alice.
///
/// Exchanges the sub-vectors one after the other, retrying a failed exchange
/// from its first step while the configured attempts last. Returns the dot
/// product, which is also shared with Bob.
///
/// Garbling and key generation block the executor thread.
#[tracing::instrument(skip_all, err)]
pub async fn run_alice<Io>(io: &mut Io, alice: &mut Alice) -> Result<i64>
where
    Io: IoSink + IoStream + Send + Unpin,
{
    let max_attempts = alice.config().max_attempts();

    for sub_vector in 0..alice.sub_vector_count() {
        let mut attempt = 1;
        loop {
            match alice_exchange(io, alice, sub_vector).await {
                Ok(partial) => {
                    debug!(sub_vector, partial, "sub-vector done");
                    break;
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(sub_vector, attempt, %err, "exchange failed, restarting");
                    alice.abort(sub_vector);
                    attempt += 1;
                }
                Err(err) => {
                    alice.abort(sub_vector);
                    if peer_is_waiting(&err) {
                        // Best effort.
                        let _ = io
                            .send(Message::Abort {
                                sub_vector,
                                reason: err.to_string(),
                                retryable: false,
                            })
                            .await;
                    }
                    return Err(err);
                }
            }
        }
    }

    let total = alice.sum_all()?;
    io.send(Message::Total { total }).await?;

    Ok(total)
}

async fn alice_exchange<Io>(io: &mut Io, alice: &mut Alice, sub_vector: usize) -> Result<i64>
where
    Io: IoSink + IoStream + Send + Unpin,
{
    io.send(alice.start(sub_vector)?).await?;

    let blinded = match io.expect_next::<Message>().await? {
        Message::Choices { sub_vector: idx, v } if idx == sub_vector => {
            alice.receive_choices(sub_vector, v)?
        }
        msg => return Err(msg.into_unexpected(Step::AliceReceiveVFromBob, sub_vector)),
    };
    io.send(blinded).await?;

    match io.expect_next::<Message>().await? {
        Message::OutputLabels {
            sub_vector: idx,
            labels,
        } if idx == sub_vector => alice.receive_output_labels(sub_vector, labels),
        msg => Err(msg.into_unexpected(Step::AliceCalcFinalSum, sub_vector)),
    }
}

/// Returns `true` if the peer still expects messages after `err`.
fn peer_is_waiting(err: &DotProductError) -> bool {
    match err.kind() {
        ErrorKind::Io => false,
        ErrorKind::Aborted => err.is_retryable(),
        _ => true,
    }
}

/// Runs the protocol as Bob.
///
/// Answers Alice's messages until she shares the total, which is returned.
/// A failed exchange is reported to Alice, who may restart it if the failure
/// is retryable.
#[tracing::instrument(skip_all, err)]
pub async fn run_bob<Io>(io: &mut Io, bob: &mut Bob) -> Result<i64>
where
    Io: IoSink + IoStream + Send + Unpin,
{
    loop {
        let msg: Message = io.expect_next().await?;
        let sub_vector = msg.sub_vector();

        match bob.handle(msg) {
            Ok(Some(reply)) => io.send(reply).await?,
            Ok(None) => {
                if let Some(total) = bob.total() {
                    return Ok(total);
                }
            }
            Err(err) if err.kind() == ErrorKind::Aborted => {
                if !err.is_retryable() {
                    return Err(err);
                }
                warn!(?sub_vector, %err, "Alice aborted the exchange");
            }
            Err(err) => {
                // Alice is done once she shared the total.
                let Some(sub_vector) = sub_vector else {
                    return Err(err);
                };

                let retryable = err.is_retryable();
                warn!(sub_vector, %err, retryable, "exchange failed");

                io.send(Message::Abort {
                    sub_vector,
                    reason: err.to_string(),
                    retryable,
                })
                .await?;

                if !retryable {
                    return Err(err);
                }
            }
        }
    }
}
