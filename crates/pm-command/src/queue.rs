//! Inbound command queue.
//!
//! Producers (the network receiver thread, a webhook handler, tests) push
//! either raw text or already-typed commands through a [`CommandSender`].
//! The owning agent drains the queue once per tick on its own thread.  The
//! underlying channel is an unbounded crossbeam MPSC, so producers never
//! block and messages come out in the order they went in.

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::error;

use crate::Command;

/// One queued message.
#[derive(Clone, Debug, PartialEq)]
pub enum Inbound {
    /// Undecoded text as received from the wire.
    Raw(String),
    Command(Command),
}

// ── CommandSender ─────────────────────────────────────────────────────────────

/// Cloneable producer handle.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: Sender<Inbound>,
}

impl CommandSender {
    /// Queue raw text.  Returns `false` once the queue has been dropped.
    pub fn send_raw(&self, text: impl Into<String>) -> bool {
        self.tx.send(Inbound::Raw(text.into())).is_ok()
    }

    /// Queue a typed command.  Returns `false` once the queue has been dropped.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(Inbound::Command(command)).is_ok()
    }
}

// ── CommandQueue ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<Inbound>,
    rx: Receiver<Inbound>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender { tx: self.tx.clone() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Take every message queued so far, decoding raw text.
    ///
    /// Malformed messages, typed or raw, are logged and dropped; the rest
    /// keep their arrival order.
    pub fn drain(&self) -> Vec<Command> {
        self.rx
            .try_iter()
            .filter_map(|msg| {
                let checked = match &msg {
                    Inbound::Command(cmd) => cmd.validate().map(|()| cmd.clone()),
                    Inbound::Raw(text) => Command::decode(text),
                };
                match checked {
                    Ok(cmd) => Some(cmd),
                    Err(e) => {
                        error!(message = ?msg, error = %e, "dropping malformed command");
                        None
                    }
                }
            })
            .collect()
    }
}
