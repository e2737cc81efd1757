//! Utilities shared between the Hiroba server binary and its tests.

pub mod logger;
pub mod time;
