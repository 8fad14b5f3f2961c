//! Shared utilities for the combo editor

pub mod media;

pub use media::*;
