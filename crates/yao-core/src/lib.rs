//! Core types shared by the garbling and oblivious transfer crates.
//!
//! This crate does not implement any protocol, see `yao-garble-core` and
//! `yao-ot-core` for that.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod bigint;
mod label;

pub use label::{Label, LabelLengthError, LABEL_LEN};
