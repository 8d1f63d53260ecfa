//! Secure two-party dot product of quantized vectors.
//!
//! Alice and Bob each hold a vector of reals in `[-1, 1]`. Both vectors are
//! quantized to sign-magnitude form and split into fixed length sub-vectors.
//! For every sub-vector Alice garbles a dot product circuit, Bob obtains the
//! labels of his inputs by oblivious transfer and evaluates the circuit, and
//! Alice resolves the output labels into a partial sum. Alice sums the
//! partial sums and shares the total with Bob.
//!
//! [`Alice`] and [`Bob`] are sans-io state machines driven by [`Message`]s,
//! [`run_alice`] and [`run_bob`] drive them over a `serio` transport.
//!
//! Both parties are assumed to be semi-honest.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod alice;
mod bob;
mod config;
mod driver;
mod error;
pub mod msgs;
pub mod quantize;

pub use alice::Alice;
pub use bob::Bob;
pub use config::{ProtocolConfig, ProtocolConfigBuilder, ProtocolConfigBuilderError};
pub use driver::{run_alice, run_bob};
pub use error::{DotProductError, ErrorKind};
pub use msgs::{Message, Step};
pub use quantize::{quantize, quantized_dot, QuantizeError, QuantizedVector};
