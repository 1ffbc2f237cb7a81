//! The outgoing command queue.
//!
//! Any number of producers (message handlers, user commands, startup)
//! push commands; exactly one consumer, the send loop, takes them off in
//! the order they went in. The queue is unbounded: pacing happens in the
//! send loop, not by blocking producers.

use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{Command, ProtocolError};

/// Constructor for a connected sender/receiver pair.
pub struct CommandQueue;

impl CommandQueue {
    /// Creates an empty queue and returns both ends.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (CommandSender, CommandReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CommandSender { tx }, CommandReceiver { rx })
    }
}

/// Producer end. Cheap to clone; every handler keeps its own copy.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Appends a command to the back of the queue.
    ///
    /// # Errors
    /// Returns [`ProtocolError::QueueClosed`] if the receiver was dropped.
    pub fn send(&self, command: Command) -> Result<(), ProtocolError> {
        tracing::trace!(message_type = %command.message_type(), "command queued");
        self.tx.send(command).map_err(|_| ProtocolError::QueueClosed)
    }
}

/// Consumer end, owned by the send loop.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandReceiver {
    /// Takes the oldest command if there is one. Never waits.
    ///
    /// Returns `None` both when the queue is empty and when every sender
    /// is gone.
    pub fn try_dequeue(&mut self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageType, channel_message, join_channel, ping};

    #[test]
    fn test_try_dequeue_empty_returns_none() {
        let (_tx, mut rx) = CommandQueue::new();
        assert!(rx.try_dequeue().is_none());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_try_dequeue_preserves_fifo_order() {
        let (tx, mut rx) = CommandQueue::new();
        tx.send(ping()).unwrap();
        tx.send(join_channel("room1").unwrap()).unwrap();
        tx.send(channel_message("room1", "hi", 4096).unwrap()).unwrap();
        assert_eq!(rx.len(), 3);

        let order: Vec<_> = std::iter::from_fn(|| rx.try_dequeue())
            .map(|c| c.message_type())
            .collect();
        assert_eq!(
            order,
            [
                MessageType::Ping,
                MessageType::JoinChannel,
                MessageType::ChannelMessage
            ]
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_returns_queue_closed() {
        let (tx, rx) = CommandQueue::new();
        drop(rx);
        assert!(matches!(tx.send(ping()), Err(ProtocolError::QueueClosed)));
    }

    #[tokio::test]
    async fn test_multiple_producers_each_keep_their_order() {
        let (tx, mut rx) = CommandQueue::new();

        let mut tasks = Vec::new();
        for producer in 0..4 {
            let tx = tx.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..25 {
                    let text = format!("{producer}:{i}");
                    tx.send(channel_message("room1", &text, 4096).unwrap())
                        .unwrap();
                    tokio::task::yield_now().await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let mut next_expected = [0usize; 4];
        let mut total = 0;
        while let Some(command) = rx.try_dequeue() {
            let payload: crate::payloads::ChannelMessagePayload =
                crate::decode_payload(command.payload().unwrap()).unwrap();
            let message = payload.message.unwrap();
            let (producer, i) = message.split_once(':').unwrap();
            let producer: usize = producer.parse().unwrap();
            let i: usize = i.parse().unwrap();
            assert_eq!(i, next_expected[producer], "producer {producer}");
            next_expected[producer] += 1;
            total += 1;
        }
        assert_eq!(total, 100);
    }
}
