//! Completion backends.

pub mod nim;

pub use nim::NimBackend;
