//! Record identifiers and allocation.
//!
//! Every record placed in a [`MapEditor`](crate::map::MapEditor) gets a
//! [`RecordId`]: a slot index plus a generation. Deleting a record bumps its
//! slot's generation, so ids held by a stale clipboard, a pick result, or the
//! caller are detected instead of silently aliasing a newer record.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// A generational record identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    index: u32,
    generation: u32,
}

impl RecordId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ---------------------------------------------------------------------------
// RecordAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    live: bool,
}

/// Hands out [`RecordId`]s and recycles released slots oldest-first.
#[derive(Debug, Default)]
pub struct RecordAllocator {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
}

impl RecordAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> RecordId {
        match self.free.pop_front() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.live = true;
                RecordId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    live: true,
                });
                RecordId::new(index, 0)
            }
        }
    }

    /// Release `id`. Returns `false` if it was already stale.
    pub fn release(&mut self, id: RecordId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let slot = &mut self.slots[id.index as usize];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index);
        true
    }

    pub fn is_live(&self, id: RecordId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.live && slot.generation == id.generation)
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.live).count()
    }

    /// Release every id at once.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.live {
                slot.live = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push_back(index as u32);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
