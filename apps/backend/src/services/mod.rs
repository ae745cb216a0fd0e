//! Application services bridging the HTTP layer with domain logic and the
//! state store.

pub mod automatch;
pub mod match_flow;
pub mod questions;
pub mod transfers;
