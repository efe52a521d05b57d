//! Chunked slot allocator that owns the nodes of a tree.

use std::collections::TryReserveError;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable address of an object inside an `Arena<T>`.
///
/// Entries are plain indices, so they are `Copy` and never dangle in the memory-safety sense. An
/// entry whose object was freed refers to a vacant slot until a later allocation reuses it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Entry>),
}

/// An allocator for a single type of object.
///
/// Objects are stored in fixed-capacity chunks, so growing the arena never moves objects that are
/// already allocated. Freed slots are threaded onto a free list and handed out again by the next
/// allocation. Dropping the arena drops every live object without walking any links between them.
///
/// # Examples
///
/// ```
/// use splay_collections::arena::Arena;
///
/// let mut arena = Arena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena.free(x), Some(2));
/// assert_eq!(arena.get(x), None);
/// ```
pub struct Arena<T> {
    head: Option<Entry>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>` holding `chunk_size` objects per chunk. A chunk size of
    /// zero is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        Arena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    fn block(&self, entry: Entry) -> Option<&Block<T>> {
        self.chunks
            .get(entry.chunk_index)
            .and_then(|chunk| chunk.get(entry.block_index))
    }

    fn block_mut(&mut self, entry: Entry) -> Option<&mut Block<T>> {
        self.chunks
            .get_mut(entry.chunk_index)
            .and_then(|chunk| chunk.get_mut(entry.block_index))
    }

    fn grow(&mut self) -> Result<(), TryReserveError> {
        self.chunks.try_reserve(1)?;
        let mut chunk = Vec::new();
        chunk.try_reserve_exact(self.chunk_size)?;
        self.chunks.push(chunk);
        self.capacity += self.chunk_size;
        Ok(())
    }

    /// Allocates an object and returns its entry, reporting an error instead of aborting if a new
    /// chunk cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new(16);
    /// let x = arena.try_allocate('a').unwrap();
    /// assert_eq!(arena[x], 'a');
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Entry, TryReserveError> {
        if self.len == self.capacity {
            self.grow()?;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk_index];
                last_chunk.push(Block::Occupied(value));
                Ok(Entry {
                    chunk_index,
                    block_index: last_chunk.len() - 1,
                })
            },
            Some(entry) => {
                let block = &mut self.chunks[entry.chunk_index][entry.block_index];
                match mem::replace(block, Block::Occupied(value)) {
                    Block::Vacant(next) => {
                        self.head = next;
                        Ok(entry)
                    },
                    Block::Occupied(_) => unreachable!("free list points at an occupied block"),
                }
            },
        }
    }

    /// Allocates an object and returns its entry.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk cannot be reserved.
    pub fn allocate(&mut self, value: T) -> Entry {
        match self.try_allocate(value) {
            Ok(entry) => entry,
            Err(error) => panic!("Error: arena allocation failed: {}", error),
        }
    }

    /// Frees the object at `entry` and returns it. Returns `None` if the entry is out of bounds or
    /// already vacant.
    pub fn free(&mut self, entry: Entry) -> Option<T> {
        let head = self.head;
        let block = self.block_mut(entry)?;
        if let Block::Vacant(_) = *block {
            return None;
        }
        match mem::replace(block, Block::Vacant(head)) {
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(entry);
                Some(value)
            },
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to the object at `entry`, or `None` if the slot is vacant or
    /// out of bounds.
    pub fn get(&self, entry: Entry) -> Option<&T> {
        match self.block(entry)? {
            Block::Occupied(value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the object at `entry`, or `None` if the slot is vacant or
    /// out of bounds.
    pub fn get_mut(&mut self, entry: Entry) -> Option<&mut T> {
        match self.block_mut(entry)? {
            Block::Occupied(value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no objects are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object and releases all chunks.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.head = None;
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Entry> for Arena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(entry).expect("Error: entry does not refer to a live object.")
    }
}

impl<T> IndexMut<Entry> for Arena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(entry).expect("Error: entry does not refer to a live object.")
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;
    use super::Entry;

    #[test]
    fn test_allocate() {
        let mut arena = Arena::new(1024);
        assert_eq!(arena.allocate(0), Entry { chunk_index: 0, block_index: 0 });
        assert_eq!(arena.allocate(0), Entry { chunk_index: 0, block_index: 1 });
        assert_eq!(arena.allocate(0), Entry { chunk_index: 0, block_index: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = Arena::new(2);
        assert_eq!(arena.allocate(0), Entry { chunk_index: 0, block_index: 0 });
        assert_eq!(arena.allocate(0), Entry { chunk_index: 0, block_index: 1 });
        assert_eq!(arena.allocate(0), Entry { chunk_index: 1, block_index: 0 });
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut arena = Arena::new(0);
        let x = arena.allocate(1);
        let y = arena.allocate(2);
        assert_eq!(arena[x], 1);
        assert_eq!(arena[y], 2);
    }

    #[test]
    fn test_free_reuses_slot() {
        let mut arena = Arena::new(1024);
        let x = arena.allocate(0);
        arena.allocate(1);
        assert_eq!(arena.free(x), Some(0));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.allocate(2), x);
        assert_eq!(arena[x], 2);
    }

    #[test]
    fn test_free_vacant_block() {
        let mut arena = Arena::new(1024);
        let x = arena.allocate(0);
        assert_eq!(arena.free(x), Some(0));
        assert_eq!(arena.free(x), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_free_invalid_block() {
        let mut arena: Arena<u32> = Arena::new(1024);
        assert_eq!(arena.free(Entry { chunk_index: 3, block_index: 0 }), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new(1024);
        let x = arena.allocate(0);
        *arena.get_mut(x).unwrap() = 1;
        assert_eq!(arena.get(x), Some(&1));
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = Arena::new(1024);
        arena.allocate(0);
        assert_eq!(arena.get(Entry { chunk_index: 0, block_index: 1 }), None);
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::new(2);
        let x = arena.allocate(0);
        arena.allocate(1);
        arena.allocate(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(x), None);
        assert_eq!(arena.allocate(3), x);
    }

    #[test]
    #[should_panic]
    fn test_index_vacant_block() {
        let mut arena = Arena::new(1024);
        let x = arena.allocate(0);
        arena.free(x);
        let _value = arena[x];
    }
}
