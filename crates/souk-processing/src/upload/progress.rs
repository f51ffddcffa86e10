//! Coarse, checkpoint-based upload progress.
//!
//! The pipeline writes integer percentages into a channel; callers consume them
//! as a [`Stream`] or with [`ProgressReceiver::recv`]. 100 is only ever sent
//! after the object is stored and its public URL resolved.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

pub const AFTER_VALIDATION: u8 = 10;
pub const AFTER_WATERMARK: u8 = 30;
pub const COMPLETE: u8 = 100;

/// Progress reported right before upload attempt `attempt` (0-based): 40, 60, 80, ...
///
/// Capped below 100 so a long retry budget never reports completion early.
pub fn before_attempt(attempt: u32) -> u8 {
    (40 + 20 * attempt.min(3)).min(90) as u8
}

/// Create a connected progress sender/receiver pair.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, ProgressReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<u8>,
}

impl ProgressSender {
    /// Send a percentage. A dropped receiver is not an error.
    pub fn report(&self, percent: u8) {
        let _ = self.tx.send(percent.min(COMPLETE));
    }
}

#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::UnboundedReceiver<u8>,
}

impl ProgressReceiver {
    pub async fn recv(&mut self) -> Option<u8> {
        self.rx.recv().await
    }

    /// Drain everything reported so far without waiting.
    pub fn drain(&mut self) -> Vec<u8> {
        let mut values = Vec::new();
        while let Ok(value) = self.rx.try_recv() {
            values.push(value);
        }
        values
    }
}

impl Stream for ProgressReceiver {
    type Item = u8;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<u8>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn attempt_checkpoints() {
        assert_eq!(before_attempt(0), 40);
        assert_eq!(before_attempt(1), 60);
        assert_eq!(before_attempt(2), 80);
        assert_eq!(before_attempt(7), 90);
    }

    #[tokio::test]
    async fn receiver_streams_reported_values() {
        let (tx, rx) = channel();
        tx.report(AFTER_VALIDATION);
        tx.report(250);
        drop(tx);

        let values: Vec<u8> = rx.collect().await;
        assert_eq!(values, vec![10, 100]);
    }

    #[test]
    fn report_after_receiver_dropped_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        tx.report(COMPLETE);
    }
}
