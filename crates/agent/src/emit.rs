//! Frame writer task.
//!
//! All worker progress — assistant text, tool-call argument fragments,
//! status lines, errors — funnels through one `mpsc` channel into this
//! writer, which serializes each frame and flushes immediately. A single
//! writer guarantees frames hit the pipe in exactly the order they were
//! produced, and flushing per frame is what lets the host render text
//! before the turn is over.

use agentwire_core::Frame;
use agentwire_protocol::codec;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::warn;

/// Drain `rx`, writing each frame newline-terminated to `writer`.
///
/// Returns when the channel closes or the writer fails (a failed write
/// means the host is gone; there is nobody left to report to).
pub async fn pump_frames<W: AsyncWrite + Unpin>(mut rx: mpsc::Receiver<Frame>, mut writer: W) {
    while let Some(frame) = rx.recv().await {
        let bytes = codec::encode(&frame);
        if let Err(e) = writer.write_all(&bytes).await {
            warn!(error = %e, "Frame write failed, stopping writer");
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!(error = %e, "Frame flush failed, stopping writer");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentwire_protocol::FrameDecoder;

    #[tokio::test]
    async fn writes_frames_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let mut out: Vec<u8> = Vec::new();

        tx.send(Frame::message("one")).await.unwrap();
        tx.send(Frame::toolcall("respond", "{}")).await.unwrap();
        tx.send(Frame::info("two")).await.unwrap();
        drop(tx);

        pump_frames(rx, &mut out).await;

        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(&out);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].content, "one");
        assert_eq!(frames[1].name.as_deref(), Some("respond"));
        assert_eq!(frames[2].content, "two");
    }

    #[tokio::test]
    async fn each_frame_is_one_line() {
        let (tx, rx) = mpsc::channel(8);
        let mut out: Vec<u8> = Vec::new();

        tx.send(Frame::message("a")).await.unwrap();
        tx.send(Frame::message("b")).await.unwrap();
        drop(tx);

        pump_frames(rx, &mut out).await;

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
