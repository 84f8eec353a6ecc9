use std::sync::mpsc;

use docflow_logging::{flow_debug, flow_warn};
use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::types::{EngineEvent, UpdateFrame};

/// Receives engine events as they are produced.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink forwarding events over a std mpsc channel.
pub struct SenderSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl SenderSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for SenderSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs one update channel to completion.
///
/// Emits `ChannelOpened` once the connection is live, `FrameReceived` for
/// each parseable frame, and always a final `ChannelClosed`, whether the
/// close came from the server, the transport, or the `shutdown` signal.
/// Malformed frames are logged and skipped without tearing the channel down;
/// transport errors are reported but do not by themselves close the channel.
pub async fn run_progress_channel(
    url: String,
    task_id: String,
    sink: &dyn EventSink,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (stream, _response) = match connect_async(&url).await {
        Ok(connected) => connected,
        Err(err) => {
            flow_warn!("Could not open update channel at {}: {}", url, err);
            sink.emit(EngineEvent::ChannelError {
                message: err.to_string(),
            });
            sink.emit(EngineEvent::ChannelClosed);
            return;
        }
    };
    sink.emit(EngineEvent::ChannelOpened { task_id });

    let (_write, mut read) = stream.split();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<UpdateFrame>(text.as_str()) {
                        Ok(frame) => sink.emit(EngineEvent::FrameReceived { frame }),
                        Err(err) => flow_warn!("Ignoring malformed frame: {}", err),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(other)) => flow_debug!("Ignoring non-text frame: {:?}", other),
                Some(Err(err)) => {
                    flow_warn!("Update channel transport error: {}", err);
                    sink.emit(EngineEvent::ChannelError {
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    sink.emit(EngineEvent::ChannelClosed);
}
