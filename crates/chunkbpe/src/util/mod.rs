//! # Utilities

pub mod validators;
