//! Append-only optimistic message log.
//!
//! The log combines history seeded from the backend with locally created
//! entries. Insertion order is chronological and is the only order ever
//! exposed. A user message lands synchronously at send time with Pending
//! delivery; the matching assistant message is appended later as a net
//! addition, never as a mutation of an earlier entry.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Locally unique, monotonic message identifier.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Display timestamp. Seeded entries keep the server's `asked_at`
    /// string; locally created entries use the current UTC time.
    pub timestamp: String,
    pub delivery: DeliveryState,
}

/// A message-to-be without an id; ids are assigned by the store on seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSeed {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl MessageSeed {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Live messages have been appended since the last session reset;
    /// seeding now would interleave history with the live conversation.
    #[error("message log already holds live entries; reset for a new session before seeding")]
    Sealed,
}

/// Ordered message log for one conversation session.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: MessageId,
    sealed: bool,
}

impl MessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the log with history entries.
    ///
    /// Valid only before any live append for the current session; a reload
    /// before the first send may re-seed freely.
    pub fn seed(&mut self, entries: impl IntoIterator<Item = MessageSeed>) -> Result<(), StoreError> {
        if self.sealed {
            return Err(StoreError::Sealed);
        }

        self.messages.clear();
        for entry in entries {
            let id = self.take_id();
            self.messages.push(Message {
                id,
                role: entry.role,
                content: entry.content,
                timestamp: entry.timestamp,
                delivery: DeliveryState::Confirmed,
            });
        }
        Ok(())
    }

    /// Append a user message with Pending delivery and return it
    /// immediately, before any network round trip completes.
    pub fn append_user(&mut self, content: impl Into<String>) -> &Message {
        self.append(Role::User, content.into(), DeliveryState::Pending)
    }

    /// Append a confirmed assistant message.
    pub fn append_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.append(Role::Assistant, content.into(), DeliveryState::Confirmed)
    }

    /// Append an assistant failure placeholder. A net addition like any
    /// other append; earlier messages are never rewritten.
    pub fn append_assistant_failed(&mut self, content: impl Into<String>) -> &Message {
        self.append(Role::Assistant, content.into(), DeliveryState::Failed)
    }

    /// Transition the delivery state of an existing message. Returns false
    /// for unknown ids.
    pub fn mark_delivery(&mut self, id: MessageId, delivery: DeliveryState) -> bool {
        match self.messages.iter_mut().find(|message| message.id == id) {
            Some(message) => {
                message.delivery = delivery;
                true
            }
            None => false,
        }
    }

    /// All messages in insertion (chronological) order.
    #[must_use]
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clear the log for a new session. Ids keep increasing across resets
    /// so they stay collision-free for the store's lifetime.
    pub fn reset_for_session(&mut self) {
        self.messages.clear();
        self.sealed = false;
    }

    fn append(&mut self, role: Role, content: String, delivery: DeliveryState) -> &Message {
        self.sealed = true;
        let id = self.take_id();
        let index = self.messages.len();
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: display_timestamp(),
            delivery,
        });
        &self.messages[index]
    }

    fn take_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Current UTC time as a display string.
pub fn display_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_user_message_is_visible_and_pending_before_any_confirmation() {
        let mut store = MessageStore::new();
        let id = store.append_user("what is chapter two about?").id;

        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].role, Role::User);
        assert_eq!(all[0].delivery, DeliveryState::Pending);
    }

    #[test]
    fn ids_are_monotonic_across_resets() {
        let mut store = MessageStore::new();
        let first = store.append_user("one").id;
        let second = store.append_assistant("two").id;
        assert!(second > first);

        store.reset_for_session();
        let third = store.append_user("three").id;
        assert!(third > second);
    }

    #[test]
    fn seed_replaces_log_and_confirms_entries() {
        let mut store = MessageStore::new();
        store
            .seed(vec![
                MessageSeed::user("q", "2026-08-29T10:00:00"),
                MessageSeed::assistant("a", "2026-08-29T10:00:05"),
            ])
            .expect("seed before any append must succeed");

        assert_eq!(store.len(), 2);
        assert!(store
            .all()
            .iter()
            .all(|message| message.delivery == DeliveryState::Confirmed));

        // A reload before the first send may seed again.
        store
            .seed(vec![MessageSeed::assistant("welcome", "t")])
            .expect("re-seed before any append must succeed");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seed_after_live_append_is_rejected() {
        let mut store = MessageStore::new();
        store.append_user("live question");

        let error = store
            .seed(vec![MessageSeed::assistant("stale history", "t")])
            .expect_err("seeding over live messages must fail");
        assert_eq!(error, StoreError::Sealed);
        assert_eq!(store.len(), 1);

        store.reset_for_session();
        store
            .seed(vec![MessageSeed::assistant("fresh session", "t")])
            .expect("reset re-opens seeding");
    }

    #[test]
    fn failure_placeholder_is_a_net_addition() {
        let mut store = MessageStore::new();
        let user_id = store.append_user("question").id;
        store.append_assistant_failed("could not answer");

        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].id, user_id);
        assert_eq!(store.all()[1].delivery, DeliveryState::Failed);
    }

    #[test]
    fn mark_delivery_transitions_only_the_target() {
        let mut store = MessageStore::new();
        let user_id = store.append_user("question").id;
        store.append_assistant("answer");

        assert!(store.mark_delivery(user_id, DeliveryState::Confirmed));
        assert_eq!(store.all()[0].delivery, DeliveryState::Confirmed);
        assert_eq!(store.all()[1].delivery, DeliveryState::Confirmed);
        assert!(!store.mark_delivery(999, DeliveryState::Failed));
    }
}
