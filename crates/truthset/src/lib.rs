#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
#![doc = include_str!("../README.md")]

mod error;
mod matrix;
mod sized_heap;

pub mod ground_truth;
pub mod vecs;
pub mod verify;

pub use error::{Error, Result};
pub use ground_truth::DEFAULT_K;
pub use matrix::VectorMatrix;
pub use sized_heap::SizedHeap;

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
