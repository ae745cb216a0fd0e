//! Server-sent event channels.
//!
//! Each connection gets its own poll task, byte channel and registry slot.
//! Matches live in the store, never in connection state, so a dropped
//! stream loses nothing: reconnecting replays a fresh snapshot.

pub mod automatch_stream;
pub mod events;
pub mod match_stream;
pub mod registry;
pub mod sse;

pub use events::StreamEvent;
pub use registry::{ChannelKind, StreamRegistry};
pub use sse::{channel, EventSink, SseStream};
