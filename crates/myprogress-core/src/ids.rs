//! # Identifier Generation
//!
//! Identifiers are handed out by an [`IdGenerator`] injected into the
//! [`DocumentStore`](crate::DocumentStore). The default generator is a
//! monotonic counter, so rapid successive creates can never collide.

use crate::{EntityId, Person};

/// Source of fresh entity identifiers.
pub trait IdGenerator: Send + Sync {
    /// Return an identifier never returned before by this generator.
    fn next_id(&mut self) -> EntityId;

    /// Make sure every identifier handed out from now on is greater than
    /// `floor`. Called after a document is loaded.
    fn advance_past(&mut self, floor: EntityId);
}

/// Monotonic counter starting at a configurable value.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Counter starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Counter whose first identifier is `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Counter seeded past every identifier already present in `person`.
    #[must_use]
    pub fn seeded_from(person: &Person) -> Self {
        let mut ids = Self::new();
        ids.advance_past(person.max_id());
        ids
    }

    /// The identifier the next call to `next_id` will return.
    #[must_use]
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    fn advance_past(&mut self, floor: EntityId) {
        if self.next <= floor.value() {
            self.next = floor.value().saturating_add(1);
        }
    }
}
