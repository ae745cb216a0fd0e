//! Repository functions for domain layer.

pub mod automatch;
pub mod matches;
pub mod transfers;
