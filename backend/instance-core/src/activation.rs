//! Hand-off of activation effects to the context that owns the user interface.
//!
//! The activation server runs on a tokio worker and must never touch UI state
//! itself. It pushes messages into a bounded queue; the UI context drains the
//! queue on its own schedule (awaiting [`ActivationReceiver::recv`] or polling
//! [`ActivationReceiver::try_recv`] from an event loop tick).

use crate::protocol::ActivationMessage;

use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::mpsc::{Receiver, Sender, channel};

/// Pending activations beyond this are dropped: a queued `BringToFront` already covers them.
pub const ACTIVATION_QUEUE_CAPACITY: usize = 4;

/// Result of handing a message to the UI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Queued,
    /// The queue is full; the message was dropped in favour of the ones already pending.
    Coalesced,
    /// The UI context has gone away.
    Closed,
}

/// Producer half, owned by the activation server.
#[derive(Debug, Clone)]
pub struct ActivationSender {
    sender: Sender<ActivationMessage>,
}

impl ActivationSender {
    /// Never blocks, so a stalled UI cannot hold up the server loop.
    pub fn dispatch(&self, message: ActivationMessage) -> DispatchOutcome {
        match self.sender.try_send(message) {
            Ok(()) => DispatchOutcome::Queued,
            Err(TrySendError::Full(_)) => DispatchOutcome::Coalesced,
            Err(TrySendError::Closed(_)) => DispatchOutcome::Closed,
        }
    }
}

/// Consumer half, drained by the UI context.
#[derive(Debug)]
pub struct ActivationReceiver {
    receiver: Receiver<ActivationMessage>,
}

impl ActivationReceiver {
    /// Waits for the next message. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ActivationMessage> {
        self.receiver.recv().await
    }

    /// Next message if one is pending.
    pub fn try_recv(&mut self) -> Option<ActivationMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocking variant for UI threads that are not driven by tokio.
    ///
    /// Panics if called from within an async runtime.
    pub fn blocking_recv(&mut self) -> Option<ActivationMessage> {
        self.receiver.blocking_recv()
    }
}

/// Creates the bounded hand-off queue.
pub fn activation_channel() -> (ActivationSender, ActivationReceiver) {
    let (sender, receiver) = channel(ACTIVATION_QUEUE_CAPACITY);
    (ActivationSender { sender }, ActivationReceiver { receiver })
}
