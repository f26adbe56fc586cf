/// Handle to an entity in an [`Arena`]. Carries the slot generation, so a
/// handle kept past its entity's removal resolves to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage for a session's entities. Iteration by `iter`/`ids` follows
/// insertion order, which is the order games resolve ties in.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<EntityId>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                EntityId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                EntityId {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.order.retain(|live| *live != id);
        Some(value)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drops every entity. All outstanding ids go stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        // reuse low slots first
        self.free.reverse();
        self.order.clear();
    }

    /// Snapshot of live ids in insertion order. Safe to walk while removing.
    pub fn ids(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|value| (id, value)))
    }

    /// Mutable walk in slot order (not insertion order).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.value.as_mut().map(|value| {
                    (
                        EntityId {
                            index: index as u32,
                            generation,
                        },
                        value,
                    )
                })
            })
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stale_id_after_remove_and_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));
        let b = arena.insert("b");
        // same slot, new generation
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn test_iter_follows_insertion_order_across_slot_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        arena.remove(a);
        let _c = arena.insert(3); // lands in a's slot
        let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2, 3]);
    }

    #[test]
    fn test_clear_invalidates_ids() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        arena.clear();
        assert!(arena.is_empty());
        assert!(ids.iter().all(|id| !arena.contains(*id)));
        let fresh = arena.insert(9);
        assert!(arena.contains(fresh));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_removal_during_snapshot_walk() {
        // first, middle and last removed in one pass
        let mut arena = Arena::new();
        for i in 0..5 {
            arena.insert(i);
        }
        let mut visited = Vec::new();
        for id in arena.ids() {
            let v = *arena.get(id).unwrap();
            visited.push(v);
            if v == 0 || v == 2 || v == 4 {
                arena.remove(id);
            }
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 4]);
        let left: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(left, vec![1, 3]);
    }

    #[test]
    fn test_iter_mut_touches_every_live_entity() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.insert(2);
        arena.insert(3);
        arena.remove(a);
        for (_, v) in arena.iter_mut() {
            *v *= 10;
        }
        let mut values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        values.sort();
        assert_eq!(values, vec![20, 30]);
    }

    proptest! {
        #[test]
        fn prop_matches_vec_model(ops in proptest::collection::vec((any::<bool>(), 0usize..8), 0..64)) {
            let mut arena = Arena::new();
            let mut model: Vec<(EntityId, usize)> = Vec::new();
            let mut counter = 0usize;
            for (insert, pick) in ops {
                if insert || model.is_empty() {
                    let id = arena.insert(counter);
                    model.push((id, counter));
                    counter += 1;
                } else {
                    let (id, value) = model.remove(pick % model.len());
                    prop_assert_eq!(arena.remove(id), Some(value));
                    prop_assert!(!arena.contains(id));
                }
                prop_assert_eq!(arena.len(), model.len());
                let live: Vec<usize> = arena.iter().map(|(_, v)| *v).collect();
                let expected: Vec<usize> = model.iter().map(|(_, v)| *v).collect();
                prop_assert_eq!(live, expected);
            }
        }
    }
}
