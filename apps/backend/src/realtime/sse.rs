//! SSE channel plumbing.
//!
//! One bounded mpsc byte channel per connection: the poll task writes
//! frames through an [`EventSink`], the HTTP response streams the receiver
//! side. A failed send means the client went away; callers treat that as
//! the disconnect signal.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{BufMut, Bytes, BytesMut};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use super::events::StreamEvent;

/// Frames a slow consumer may lag behind before its sends start blocking.
const CHANNEL_CAPACITY: usize = 32;

/// The client side of the channel has gone away.
#[derive(Debug, PartialEq, Eq)]
pub struct Disconnected;

/// Writer half of one SSE channel.
pub struct EventSink {
    tx: mpsc::Sender<Bytes>,
}

impl EventSink {
    /// Serialize and send one event frame. `Err` means the connection is
    /// gone and the channel should be torn down.
    pub async fn emit(&self, event: &StreamEvent) -> Result<(), Disconnected> {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                error!(kind = event.kind(), error = %err, "failed to encode stream event");
                return Ok(());
            }
        };
        let mut frame = BytesMut::with_capacity(json.len() + 8);
        frame.put_slice(b"data: ");
        frame.put_slice(json.as_bytes());
        frame.put_slice(b"\n\n");
        self.tx.send(frame.freeze()).await.map_err(|_| Disconnected)
    }
}

/// Reader half, shaped for `HttpResponse::streaming`.
pub struct SseStream {
    inner: ReceiverStream<Bytes>,
}

impl Stream for SseStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx).map(|b| b.map(Ok))
    }
}

/// Build one SSE channel pair.
pub fn channel() -> (EventSink, SseStream) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (
        EventSink { tx },
        SseStream {
            inner: ReceiverStream::new(rx),
        },
    )
}
