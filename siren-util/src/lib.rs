//! data-supplier utilities for the SIREN pipeline: synthetic event
//! generation and event-file validation.

pub mod generate;
pub mod validate;
