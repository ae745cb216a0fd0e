//! Match flow orchestration: creation, joining, the start handshake, and
//! answer play.
//!
//! Every mutation goes through the optimistic-lock update loop in
//! `repos::matches`, so each validation runs against a freshly read record.

mod answers;
mod lifecycle;

/// Match flow service.
#[derive(Default)]
pub struct MatchFlowService;
