//! Core types and constants for the check-in system

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
