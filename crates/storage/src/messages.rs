// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent message queues.
//!
//! Each recipient has one append-only JSONL log; insertion order is the
//! delivery order. Marking and clearing rewrite the log atomically, so a
//! crashed reader re-reads its pending messages (at-least-once).

use crate::fs;
use crate::paths::DataRoot;
use crate::registry::Registry;
use daedalos_core::{AgentName, IdGen, Message, MessageId, MessageKind, MessageState};
use thiserror::Error;

/// Errors from message operations
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    #[error("message io: {0}")]
    Io(#[from] std::io::Error),
}

/// Which messages to mark as read.
#[derive(Debug, Clone)]
pub enum MarkTarget {
    All,
    One(MessageId),
}

/// The per-agent message queues under `messages/`.
#[derive(Clone)]
pub struct MessageStore {
    root: DataRoot,
}

impl MessageStore {
    pub fn new(root: &DataRoot) -> Self {
        Self { root: root.clone() }
    }

    /// Append a message to the recipient's queue.
    ///
    /// The recipient must have a registry entry; senders are free-form.
    pub fn send(
        &self,
        registry: &Registry,
        to: &AgentName,
        from: &str,
        kind: MessageKind,
        content: &str,
        id_gen: &impl IdGen,
        epoch_ms: u64,
    ) -> Result<MessageId, MessageError> {
        if registry.lookup(to.as_str()).is_none() {
            return Err(MessageError::UnknownRecipient(to.to_string()));
        }
        self.deliver(to, from, kind, content, id_gen, epoch_ms)
    }

    /// Append without a registry check. Used by broadcast (which iterates
    /// registry entries already) and handoff delivery.
    pub(crate) fn deliver(
        &self,
        to: &AgentName,
        from: &str,
        kind: MessageKind,
        content: &str,
        id_gen: &impl IdGen,
        epoch_ms: u64,
    ) -> Result<MessageId, MessageError> {
        let id = MessageId::new(id_gen.next());
        let message = Message {
            id: id.clone(),
            from: from.to_string(),
            to: to.clone(),
            kind,
            content: content.to_string(),
            sent_at_ms: epoch_ms,
            state: MessageState::Pending,
        };
        fs::append_jsonl(&self.root.message_queue(to), &message)?;
        Ok(id)
    }

    /// Read the queue in insertion order.
    pub fn inbox(&self, agent: &AgentName, pending_only: bool) -> Vec<Message> {
        let messages: Vec<Message> = fs::read_jsonl(&self.root.message_queue(agent));
        if pending_only {
            messages.into_iter().filter(Message::is_pending).collect()
        } else {
            messages
        }
    }

    /// Promote messages to `read`. Returns how many changed.
    pub fn mark_read(&self, agent: &AgentName, target: MarkTarget) -> Result<usize, MessageError> {
        let mut messages: Vec<Message> = fs::read_jsonl(&self.root.message_queue(agent));
        let mut changed = 0;
        for message in messages.iter_mut() {
            let matches = match &target {
                MarkTarget::All => true,
                MarkTarget::One(id) => &message.id == id,
            };
            if matches && message.state == MessageState::Pending {
                message.state = MessageState::Read;
                changed += 1;
            }
        }
        if changed > 0 {
            fs::write_jsonl(&self.root.message_queue(agent), &messages)?;
        }
        Ok(changed)
    }

    /// Drop read messages, retaining only still-pending ones. Returns how
    /// many were removed.
    pub fn clear(&self, agent: &AgentName) -> Result<usize, MessageError> {
        let messages: Vec<Message> = fs::read_jsonl(&self.root.message_queue(agent));
        let before = messages.len();
        let pending: Vec<Message> = messages.into_iter().filter(Message::is_pending).collect();
        let removed = before - pending.len();
        if removed > 0 {
            fs::write_jsonl(&self.root.message_queue(agent), &pending)?;
        }
        Ok(removed)
    }

    /// Send to every registered agent except the sender.
    pub fn broadcast(
        &self,
        registry: &Registry,
        from: &str,
        content: &str,
        id_gen: &impl IdGen,
        epoch_ms: u64,
    ) -> Result<Vec<MessageId>, MessageError> {
        let mut ids = Vec::new();
        for record in registry.all() {
            if record.name == *from {
                continue;
            }
            ids.push(self.deliver(
                &record.name,
                from,
                MessageKind::Broadcast,
                content,
                id_gen,
                epoch_ms,
            )?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
