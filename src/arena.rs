use crate::error::TableError;

/// Address of an entry inside the [`EntryArena`].
///
/// Only the table hands out addresses.
///
/// ```compile_fail
/// let addr = dictcount::EntryAddr(3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryAddr(pub(crate) u32);

impl EntryAddr {
    #[inline(always)]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One distinct vocabulary word and its occurrence count.
///
/// A head entry also owns the addresses of the entries that collided
/// with it, in insertion order. Chain members never have a chain of
/// their own.
#[derive(Debug)]
pub struct Entry {
    word: Box<[u8]>,
    count: u64,
    chain: Vec<EntryAddr>,
}

impl Entry {
    fn new(word: &[u8]) -> Result<Entry, TableError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(word.len())
            .map_err(|_| TableError::Allocation { what: "entry word" })?;
        buffer.extend_from_slice(word);
        Ok(Entry {
            word: buffer.into_boxed_slice(),
            count: 0,
            chain: Vec::new(),
        })
    }

    #[inline(always)]
    pub fn word(&self) -> &[u8] {
        &self.word
    }

    #[inline(always)]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline(always)]
    pub fn chain(&self) -> &[EntryAddr] {
        &self.chain
    }

    pub(crate) fn increment(&mut self) {
        self.count += 1;
    }

    /// Makes room for one more chained entry, so that the following
    /// `push_chained` cannot fail.
    pub(crate) fn reserve_chained(&mut self) -> Result<(), TableError> {
        self.chain
            .try_reserve(1)
            .map_err(|_| TableError::Allocation { what: "collision chain" })
    }

    pub(crate) fn push_chained(&mut self, addr: EntryAddr) {
        self.chain.push(addr);
    }
}

/// Flat storage for every entry of a table.
///
/// Entries are only ever appended, so an address stays valid for the
/// whole life of the arena.
#[derive(Debug, Default)]
pub struct EntryArena {
    entries: Vec<Entry>,
}

impl EntryArena {
    pub fn new() -> EntryArena {
        EntryArena::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn allocate(&mut self, word: &[u8]) -> Result<EntryAddr, TableError> {
        let index = self.entries.len();
        let addr = u32::try_from(index)
            .map(EntryAddr)
            .map_err(|_| TableError::Allocation { what: "entry address" })?;
        let entry = Entry::new(word)?;
        self.entries
            .try_reserve(1)
            .map_err(|_| TableError::Allocation { what: "entry" })?;
        self.entries.push(entry);
        Ok(addr)
    }

    #[inline(always)]
    pub fn get(&self, addr: EntryAddr) -> &Entry {
        &self.entries[addr.index()]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, addr: EntryAddr) -> &mut Entry {
        &mut self.entries[addr.index()]
    }
}
