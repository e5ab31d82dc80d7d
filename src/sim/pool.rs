//! Owning entity collections
//!
//! Each population (enemies, projectiles, power-ups, particles) lives in its
//! own `Pool`. Ids are handed out monotonically and never reused within a
//! run, so they are safe to put in events. Entities stay in spawn order, so
//! the front of a pool is always its oldest entry.

use serde::{Deserialize, Serialize};

/// Unique identifier for an entity within its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Anything stored in a pool carries its own id
pub trait Pooled {
    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    next_id: u32,
    capacity: Option<usize>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            capacity: None,
        }
    }

    /// Pool that evicts its oldest entry once `capacity` is reached
    pub fn bounded(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(4096)),
            next_id: 1,
            capacity: Some(capacity),
        }
    }

    /// Allocate an id and insert the entity built from it.
    /// Returns `None` only for a zero-capacity pool.
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> T) -> Option<EntityId> {
        if let Some(cap) = self.capacity {
            if cap == 0 {
                return None;
            }
            if self.items.len() >= cap {
                self.items.remove(0);
            }
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.items.push(build(id));
        Some(id)
    }

    /// Remove the entity at `index`, keeping spawn order
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// Remove every entity for which `keep` returns false
    pub fn retain(&mut self, keep: impl FnMut(&mut T) -> bool) {
        self.items.retain_mut(keep);
    }

    /// Eviction threshold of a bounded pool
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }
}

impl<T: Pooled> Pool<T> {
    pub fn find(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.iter_mut().find(|e| e.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Pool<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Thing {
        id: EntityId,
        value: i32,
    }

    impl Pooled for Thing {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    #[test]
    fn test_ids_are_monotonic_and_not_reused() {
        let mut pool = Pool::new();
        let a = pool.spawn(|id| Thing { id, value: 1 }).unwrap();
        let b = pool.spawn(|id| Thing { id, value: 2 }).unwrap();
        pool.remove(0);
        let c = pool.spawn(|id| Thing { id, value: 3 }).unwrap();
        assert!(a < b && b < c);
        assert_eq!(pool.len(), 2);
        assert!(pool.find(a).is_none());
        assert_eq!(pool.find(c).map(|t| t.value), Some(3));
    }

    #[test]
    fn test_retain_visits_every_element() {
        let mut pool = Pool::new();
        for v in 0..10 {
            pool.spawn(|id| Thing { id, value: v });
        }
        let mut visited = 0;
        pool.retain(|t| {
            visited += 1;
            t.value % 2 == 0
        });
        assert_eq!(visited, 10);
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|t| t.value % 2 == 0));
    }

    #[test]
    fn test_bounded_pool_evicts() {
        let mut pool = Pool::bounded(3);
        for v in 0..5 {
            pool.spawn(|id| Thing { id, value: v });
        }
        assert_eq!(pool.len(), 3);
        let kept: Vec<i32> = pool.iter().map(|t| t.value).collect();
        assert_eq!(kept, vec![2, 3, 4]);

        // Pruning keeps spawn order, so the next eviction still takes the oldest
        pool.retain(|t| t.value != 3);
        pool.spawn(|id| Thing { id, value: 5 });
        pool.spawn(|id| Thing { id, value: 6 });
        let kept: Vec<i32> = pool.iter().map(|t| t.value).collect();
        assert_eq!(kept, vec![4, 5, 6]);

        let mut empty: Pool<Thing> = Pool::bounded(0);
        assert!(empty.spawn(|id| Thing { id, value: 0 }).is_none());
        assert!(empty.is_empty());
    }
}
