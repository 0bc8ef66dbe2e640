#[macro_use]
extern crate log;

mod arena;
pub mod dictionary;
pub mod error;
pub mod hash;
pub mod report;
pub mod scanner;
pub mod tokenizer;

pub use arena::{Entry, EntryAddr};
pub use dictionary::{load_dictionary, DictionaryLoader, LoadOptions};
pub use error::{Error, Result, TableError};
pub use report::Reporter;
pub use scanner::{CountingScanner, ScanOptions};
pub use tokenizer::Tokenizer;

use arena::EntryArena;

/// Outcome of probing a bucket for a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The word is stored, either as the bucket head or in its chain.
    Found(EntryAddr),
    /// The bucket is occupied by other words. Carries the head.
    Collision(EntryAddr),
    /// Nothing is stored in the bucket.
    Vacant,
}

/// Fixed capacity hash table mapping vocabulary words to occurrence counts.
///
/// Collisions are resolved by chaining: the first word hashed to a bucket
/// becomes its head, and later words landing in the same bucket are
/// appended to the head's chain. The number of buckets never changes, so
/// lookups for a crowded bucket are linear in the chain length.
pub struct HashTable {
    slots: Box<[Option<EntryAddr>]>,
    arena: EntryArena,
}

impl HashTable {
    /// Creates a table with `capacity` empty buckets.
    pub fn with_capacity(capacity: usize) -> std::result::Result<HashTable, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::Allocation { what: "dict" })?;
        slots.resize(capacity, None);
        debug!("Created table with {} buckets", capacity);
        Ok(HashTable {
            slots: slots.into_boxed_slice(),
            arena: EntryArena::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_of(&self, word: &[u8]) -> usize {
        hash::bucket_index(word, self.capacity())
    }

    /// Adds `word` with a zero count, unless it is already stored.
    ///
    /// Returns `true` if a new entry was created.
    pub fn insert(&mut self, word: &[u8]) -> std::result::Result<bool, TableError> {
        let index = self.bucket_of(word);
        if index >= self.capacity() {
            return Err(TableError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        match self.lookup(word, index) {
            Lookup::Found(_) => Ok(false),
            Lookup::Vacant => {
                let addr = self.arena.allocate(word)?;
                self.slots[index] = Some(addr);
                Ok(true)
            }
            Lookup::Collision(head) => {
                self.arena.get_mut(head).reserve_chained()?;
                let addr = self.arena.allocate(word)?;
                self.arena.get_mut(head).push_chained(addr);
                Ok(true)
            }
        }
    }

    /// Probes bucket `index` for `word`: the head first, then its chain
    /// in insertion order.
    ///
    /// # Panics
    ///
    /// If `index` is not a bucket of this table.
    pub fn lookup(&self, word: &[u8], index: usize) -> Lookup {
        assert!(
            index < self.capacity(),
            "Bucket index {} out of range, table capacity is {}",
            index,
            self.capacity()
        );
        let head_addr = match self.slots[index] {
            Some(addr) => addr,
            None => return Lookup::Vacant,
        };
        let head = self.arena.get(head_addr);
        if head.word() == word {
            return Lookup::Found(head_addr);
        }
        head.chain()
            .iter()
            .cloned()
            .find(|&addr| self.arena.get(addr).word() == word)
            .map(Lookup::Found)
            .unwrap_or(Lookup::Collision(head_addr))
    }

    /// Increments the count of `word` if it is part of the vocabulary.
    ///
    /// Unknown words are ignored. Returns `true` if a count was incremented.
    pub fn increment_if_present(&mut self, word: &[u8]) -> bool {
        let index = self.bucket_of(word);
        match self.lookup(word, index) {
            Lookup::Found(addr) => {
                self.arena.get_mut(addr).increment();
                true
            }
            Lookup::Collision(_) | Lookup::Vacant => false,
        }
    }

    /// Count of `word`, or `None` if it is not in the vocabulary.
    pub fn get(&self, word: &[u8]) -> Option<u64> {
        match self.lookup(word, self.bucket_of(word)) {
            Lookup::Found(addr) => Some(self.arena.get(addr).count()),
            Lookup::Collision(_) | Lookup::Vacant => None,
        }
    }

    pub fn entry(&self, addr: EntryAddr) -> &Entry {
        self.arena.get(addr)
    }

    /// Number of entries stored in bucket `index`, head included.
    pub fn chain_len(&self, index: usize) -> usize {
        match self.slots.get(index) {
            Some(&Some(head)) => 1 + self.arena.get(head).chain().len(),
            _ => 0,
        }
    }

    /// Iterates over `(word, count)` pairs, bucket by bucket, each head
    /// followed by its chain.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            arena: &self.arena,
            slots: self.slots.iter(),
            chain: [].iter(),
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count).sum()
    }

    /// Releases the table and every entry it owns.
    pub fn destroy(self) {
        debug!(
            "Releasing table with {} entries over {} buckets",
            self.len(),
            self.capacity()
        );
    }
}

impl<'a> IntoIterator for &'a HashTable {
    type Item = (&'a [u8], u64);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Entries<'a> {
        self.iter()
    }
}

pub struct Entries<'a> {
    arena: &'a EntryArena,
    slots: std::slice::Iter<'a, Option<EntryAddr>>,
    chain: std::slice::Iter<'a, EntryAddr>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a [u8], u64);

    fn next(&mut self) -> Option<(&'a [u8], u64)> {
        let arena = self.arena;
        let addr = match self.chain.next() {
            Some(&addr) => addr,
            None => {
                let head = self.slots.by_ref().flatten().next()?;
                self.chain = arena.get(*head).chain().iter();
                *head
            }
        };
        let entry = arena.get(addr);
        Some((entry.word(), entry.count()))
    }
}

#[cfg(test)]
mod test {
    use super::{HashTable, Lookup, TableError};
    use crate::hash::bucket_index;

    fn collect(table: &HashTable) -> Vec<(Vec<u8>, u64)> {
        table
            .iter()
            .map(|(word, count)| (word.to_vec(), count))
            .collect()
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            HashTable::with_capacity(0),
            Err(TableError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_insert_one() {
        let mut table = HashTable::with_capacity(16).unwrap();
        assert_eq!(table.get(b"coucou"), None);
        assert!(table.insert(b"coucou").unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b"coucou"), Some(0));
        assert!(table.increment_if_present(b"coucou"));
        assert_eq!(table.get(b"coucou"), Some(1));
    }

    #[test]
    fn test_insert_same_el_twice() {
        let mut table = HashTable::with_capacity(16).unwrap();
        assert!(table.insert(b"coucou").unwrap());
        assert!(!table.insert(b"coucou").unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(collect(&table), vec![(b"coucou".to_vec(), 0)]);
    }

    #[test]
    fn test_insert_twice_keeps_count() {
        let mut table = HashTable::with_capacity(16).unwrap();
        table.insert(b"coucou").unwrap();
        table.increment_if_present(b"coucou");
        table.insert(b"coucou").unwrap();
        assert_eq!(table.get(b"coucou"), Some(1));
    }

    #[test]
    fn test_collisions_single_bucket() {
        let mut table = HashTable::with_capacity(1).unwrap();
        for word in [&b"coucou"[..], b"coucou2", b"coucou3", b"coucou4"] {
            assert!(table.insert(word).unwrap());
        }
        assert!(!table.insert(b"coucou3").unwrap());
        assert_eq!(table.len(), 4);
        assert_eq!(table.chain_len(0), 4);
        for word in [&b"coucou"[..], b"coucou2", b"coucou3", b"coucou4"] {
            assert_eq!(table.get(word), Some(0));
        }
        table.increment_if_present(b"coucou3");
        assert_eq!(table.get(b"coucou3"), Some(1));
        assert_eq!(table.get(b"coucou"), Some(0));
        // head first, then chain in insertion order
        let words: Vec<Vec<u8>> = collect(&table).into_iter().map(|(w, _)| w).collect();
        assert_eq!(
            words,
            vec![
                b"coucou".to_vec(),
                b"coucou2".to_vec(),
                b"coucou3".to_vec(),
                b"coucou4".to_vec()
            ]
        );
    }

    #[test]
    fn test_lookup_distinguishes_collision_from_vacant() {
        let mut table = HashTable::with_capacity(1).unwrap();
        assert_eq!(table.lookup(b"a", 0), Lookup::Vacant);
        table.insert(b"a").unwrap();
        table.insert(b"b").unwrap();
        let head = match table.lookup(b"a", 0) {
            Lookup::Found(addr) => addr,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(table.lookup(b"zzz", 0), Lookup::Collision(head));
        match table.lookup(b"b", 0) {
            Lookup::Found(addr) => assert_eq!(table.entry(addr).word(), b"b"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_lookup_index_out_of_range() {
        let mut table = HashTable::with_capacity(1).unwrap();
        table.insert(b"a").unwrap();
        table.lookup(b"a", 1);
    }

    #[test]
    fn test_counting() {
        let mut table = HashTable::with_capacity(3).unwrap();
        table.insert(b"a").unwrap();
        table.insert(b"b").unwrap();
        for word in b"a a c b a".split(|&b| b == b' ') {
            table.increment_if_present(word);
        }
        assert_eq!(table.get(b"a"), Some(3));
        assert_eq!(table.get(b"b"), Some(1));
        assert_eq!(table.get(b"c"), None);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_increment_absent_is_noop() {
        let mut table = HashTable::with_capacity(2).unwrap();
        table.insert(b"known").unwrap();
        assert!(!table.increment_if_present(b"unknown"));
        assert!(!table.increment_if_present(b"Known"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.total(), 0);
        assert_eq!(collect(&table), vec![(b"known".to_vec(), 0)]);
    }

    #[test]
    fn test_iter_slot_order() {
        let mut table = HashTable::with_capacity(7).unwrap();
        // "apple" -> 1, "banana" -> 2, "a" -> 6, "ab" -> 4
        for word in [&b"a"[..], b"banana", b"ab", b"apple"] {
            table.insert(word).unwrap();
        }
        let words: Vec<Vec<u8>> = collect(&table).into_iter().map(|(w, _)| w).collect();
        assert_eq!(
            words,
            vec![b"apple".to_vec(), b"banana".to_vec(), b"ab".to_vec(), b"a".to_vec()]
        );
    }

    #[test]
    fn test_insert_thousand() {
        for capacity in [1, 13, 800, 4_096] {
            let mut table = HashTable::with_capacity(capacity).unwrap();
            for i in 0..800 {
                let key = format!("key{}", i);
                assert!(table.insert(key.as_bytes()).unwrap());
            }
            for i in 0..800 {
                let key = format!("key{}", i);
                assert!(!table.insert(key.as_bytes()).unwrap());
                for _ in 0..(i % 3) {
                    assert!(table.increment_if_present(key.as_bytes()));
                }
            }
            assert_eq!(table.len(), 800);
            assert_eq!(table.iter().count(), 800);
            let chained: usize = (0..capacity).map(|index| table.chain_len(index)).sum();
            assert_eq!(chained, 800);
            for i in 0..800 {
                let key = format!("key{}", i);
                assert_eq!(table.get(key.as_bytes()), Some((i % 3) as u64));
                let index = bucket_index(key.as_bytes(), capacity);
                assert!(table.chain_len(index) >= 1);
            }
            let expected_total: u64 = (0..800u64).map(|i| i % 3).sum();
            assert_eq!(table.total(), expected_total);
        }
    }

    #[test]
    fn test_destroy() {
        let table = HashTable::with_capacity(4).unwrap();
        table.destroy();
        let mut table = HashTable::with_capacity(1).unwrap();
        for i in 0..100 {
            table.insert(format!("w{}", i).as_bytes()).unwrap();
        }
        table.destroy();
        let absent: Option<HashTable> = None;
        if let Some(table) = absent {
            table.destroy();
        }
    }
}
