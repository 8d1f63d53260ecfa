//! Boolean circuits for garbling.
//!
//! A [`Circuit`] is an ordered list of [`Gate`]s over named wires together with
//! the names of its output wires. Gates are topologically ordered, every wire
//! has at most one driver, and wires which are never driven are the circuit's
//! inputs.
//!
//! Circuits are usually produced by an external netlist compiler. The
//! [`CircuitBuilder`] and the circuits in [`circuits`] cover what this
//! workspace needs in-tree.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

mod builder;
mod circuit;
pub mod circuits;
mod gate;

pub use builder::{CircuitBuilder, Node};
pub use circuit::{Circuit, CircuitError};
pub use gate::{Gate, GateKind, ParseGateKindError};
