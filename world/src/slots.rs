//! Generational slot storage backing enemies and projectiles.

use std::marker::PhantomData;

use waypoint_defence_core::{EnemyId, ProjectileId};

/// Handle types that address a slot together with the generation it was issued for.
pub(crate) trait Handle: Copy {
    /// Builds a handle from its raw parts.
    fn from_parts(slot: u32, generation: u32) -> Self;

    /// Slot index addressed by the handle.
    fn slot_index(&self) -> u32;

    /// Generation the handle was issued for.
    fn slot_generation(&self) -> u32;
}

impl Handle for EnemyId {
    fn from_parts(slot: u32, generation: u32) -> Self {
        EnemyId::new(slot, generation)
    }

    fn slot_index(&self) -> u32 {
        self.slot()
    }

    fn slot_generation(&self) -> u32 {
        self.generation()
    }
}

impl Handle for ProjectileId {
    fn from_parts(slot: u32, generation: u32) -> Self {
        ProjectileId::new(slot, generation)
    }

    fn slot_index(&self) -> u32 {
        self.slot()
    }

    fn slot_generation(&self) -> u32 {
        self.generation()
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Dense storage whose handles become stale once their slot is vacated.
///
/// Iteration visits occupied slots in index order. Vacated slots are reused
/// lowest index first with a bumped generation.
#[derive(Clone, Debug)]
pub(crate) struct Slots<H, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    marker: PhantomData<H>,
}

impl<H: Handle, T> Slots<H, T> {
    /// Creates empty storage.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            marker: PhantomData,
        }
    }

    /// Stores a value and returns the handle addressing it.
    pub(crate) fn insert(&mut self, value: T) -> H {
        self.len += 1;
        if let Some(position) = lowest_free(&self.free) {
            let index = self.free.swap_remove(position);
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return H::from_parts(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        H::from_parts(index, 0)
    }

    /// Returns the value addressed by a live handle.
    pub(crate) fn get(&self, handle: H) -> Option<&T> {
        self.slots
            .get(handle.slot_index() as usize)
            .filter(|slot| slot.generation == handle.slot_generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Returns the value addressed by a live handle mutably.
    pub(crate) fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.slots
            .get_mut(handle.slot_index() as usize)
            .filter(|slot| slot.generation == handle.slot_generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Vacates the slot addressed by a live handle, returning its value.
    pub(crate) fn remove(&mut self, handle: H) -> Option<T> {
        let index = handle.slot_index();
        let slot = self
            .slots
            .get_mut(index as usize)
            .filter(|slot| slot.generation == handle.slot_generation())?;
        let value = slot.value.take()?;
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    /// Handles of every occupied slot in index order.
    pub(crate) fn handles(&self) -> Vec<H> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Iterates occupied slots in index order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (H::from_parts(index as u32, slot.generation), value))
        })
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Vacates every slot, invalidating all outstanding handles.
    pub(crate) fn clear(&mut self) {
        for index in self.handles() {
            let _ = self.remove(index);
        }
    }
}

fn lowest_free(free: &[u32]) -> Option<usize> {
    free.iter()
        .enumerate()
        .min_by_key(|(_, index)| **index)
        .map(|(position, _)| position)
}
