//! insertion-ordered participant registry
//!
//! Membership set over participant ids that preserves insertion order and
//! supports O(1) amortized insert/remove plus O(1) successor steps. Backed by
//! an arena of doubly-linked nodes addressed by stable slot indices, with an
//! id -> slot map for lookup; removed slots go on a free list and are reused.

use crate::error::{Error, Result};
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Node {
    id: ParticipantId,
    prev: Option<usize>,
    next: Option<usize>,
}

/// ordered membership registry
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    arena: Vec<Option<Node>>,
    free: Vec<usize>,
    slots: HashMap<ParticipantId, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn exists(&self, id: &ParticipantId) -> bool {
        self.slots.contains_key(id)
    }

    /// append `id` at the end of iteration order
    pub fn insert(&mut self, id: ParticipantId) -> Result<()> {
        if self.exists(&id) {
            return Err(Error::AlreadyRegistered(id));
        }

        let node = Node {
            id,
            prev: self.tail,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.arena[slot] = Some(node);
                slot
            }
            None => {
                self.arena.push(Some(node));
                self.arena.len() - 1
            }
        };

        if let Some(tail) = self.tail {
            if let Some(n) = self.arena[tail].as_mut() {
                n.next = Some(slot);
            }
        } else {
            self.head = Some(slot);
        }
        self.tail = Some(slot);
        self.slots.insert(id, slot);
        Ok(())
    }

    /// unlink `id`, preserving the relative order of the rest
    pub fn remove(&mut self, id: &ParticipantId) -> Result<()> {
        let slot = self
            .slots
            .remove(id)
            .ok_or(Error::NotRegistered(*id))?;
        let node = self.arena[slot].take().ok_or(Error::NotRegistered(*id))?;

        match node.prev {
            Some(prev) => {
                if let Some(n) = self.arena[prev].as_mut() {
                    n.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(n) = self.arena[next].as_mut() {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        Ok(())
    }

    /// first id in insertion order
    pub fn first(&self) -> Option<ParticipantId> {
        self.head.and_then(|slot| self.node_id(slot))
    }

    /// successor of `id` in insertion order, or `None` at the end
    pub fn next(&self, id: &ParticipantId) -> Result<Option<ParticipantId>> {
        let slot = *self.slots.get(id).ok_or(Error::NotRegistered(*id))?;
        let next = self.arena[slot].as_ref().and_then(|n| n.next);
        Ok(next.and_then(|slot| self.node_id(slot)))
    }

    /// forward walk starting at the successor of `start`, or at the first
    /// element when `start` is `None`
    pub fn iter_from(
        &self,
        start: Option<&ParticipantId>,
    ) -> Result<impl Iterator<Item = ParticipantId> + '_> {
        let cursor = match start {
            Some(id) => {
                let slot = *self.slots.get(id).ok_or(Error::NotRegistered(*id))?;
                self.arena[slot].as_ref().and_then(|n| n.next)
            }
            None => self.head,
        };
        Ok(Iter {
            registry: self,
            cursor,
        })
    }

    /// full forward walk in insertion order
    pub fn iter(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        Iter {
            registry: self,
            cursor: self.head,
        }
    }

    fn node_id(&self, slot: usize) -> Option<ParticipantId> {
        self.arena[slot].as_ref().map(|n| n.id)
    }
}

struct Iter<'a> {
    registry: &'a Registry,
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = ParticipantId;

    fn next(&mut self) -> Option<ParticipantId> {
        let slot = self.cursor?;
        let node = self.registry.arena[slot].as_ref()?;
        self.cursor = node.next;
        Some(node.id)
    }
}
