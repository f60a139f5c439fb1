//! Bounded mailbox between pipeline tasks and the coordinator.

use tokio::sync::mpsc;

use crate::config::BatchConfig;

/// Create a bounded channel pair with the configured buffer size.
///
/// When the buffer is full, finished pipelines wait on `send` until the
/// coordinator drains the mailbox.
pub fn bounded_channel<T>(config: &BatchConfig) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(config.buffer_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_channel() {
        let config = BatchConfig { buffer_size: 1 };
        let (tx, mut rx) = bounded_channel::<i32>(&config);

        tx.send(42).await.unwrap();
        // Full: a second send must not complete immediately
        assert!(tx.try_send(7).is_err());

        assert_eq!(rx.recv().await, Some(42));
        assert!(tx.try_send(7).is_ok());
    }
}
