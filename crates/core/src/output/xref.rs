//! Cross-reference entries and the per-write registry.
//!
//! Every written object ends up as an entry here; the registry is then
//! rendered either as the classic 20-byte-record text table or as the
//! packed binary rows of a cross-reference stream.

use std::collections::BTreeMap;

use byteorder::{BigEndian, WriteBytesExt};

/// Generation number that marks the head of the free list.
pub const FREE_GENERATION: u16 = 65535;

/// One cross-reference entry. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XRefEntry {
    /// A free object slot. `next_free` links to the next free object.
    Free {
        objid: u32,
        genno: u16,
        next_free: u32,
    },
    /// An object stored at an absolute byte offset in the file.
    InUse { objid: u32, genno: u16, offset: u64 },
    /// An object packed into an object stream, at `index` within it.
    Compressed {
        objid: u32,
        stream_objid: u32,
        index: u32,
    },
}

impl XRefEntry {
    /// The reserved entry for object number 0: free, generation 65535,
    /// linking to itself.
    pub const fn default_free() -> Self {
        Self::Free {
            objid: 0,
            genno: FREE_GENERATION,
            next_free: 0,
        }
    }

    /// A synthetic free entry used to fill gaps in the classic table.
    pub const fn gap_free(objid: u32) -> Self {
        Self::Free {
            objid,
            genno: FREE_GENERATION,
            next_free: 0,
        }
    }

    /// A regular in-use entry.
    pub const fn in_use(objid: u32, genno: u16, offset: u64) -> Self {
        Self::InUse {
            objid,
            genno,
            offset,
        }
    }

    /// An entry for an object packed into object stream `stream_objid`.
    pub const fn compressed(objid: u32, stream_objid: u32, index: u32) -> Self {
        Self::Compressed {
            objid,
            stream_objid,
            index,
        }
    }

    /// Object number keyed by this entry.
    pub const fn objid(&self) -> u32 {
        match self {
            Self::Free { objid, .. } | Self::InUse { objid, .. } | Self::Compressed { objid, .. } => {
                *objid
            }
        }
    }

    /// Generation number. Compressed entries are implicitly generation 0.
    pub const fn generation(&self) -> u16 {
        match self {
            Self::Free { genno, .. } | Self::InUse { genno, .. } => *genno,
            Self::Compressed { .. } => 0,
        }
    }

    /// Render the fixed 20-byte classic table record.
    ///
    /// `nnnnnnnnnn ggggg n\r\n` for in-use entries, with the 10-digit byte
    /// offset; free entries use the next-free object number and `f`. The
    /// two-byte terminator keeps every record at exactly 20 bytes.
    pub fn to_table_record(&self) -> String {
        match self {
            Self::Free {
                genno, next_free, ..
            } => format!("{next_free:010} {genno:05} f\r\n"),
            Self::InUse { genno, offset, .. } => format!("{offset:010} {genno:05} n\r\n"),
            // Compressed entries cannot be expressed in a classic table;
            // the writer downgrades them to free records after warning.
            Self::Compressed { .. } => XRefEntry::gap_free(self.objid()).to_table_record(),
        }
    }

    /// The three stream-row fields: type, field 2, field 3.
    pub(crate) const fn row_fields(&self) -> (u8, u64, u32) {
        match self {
            Self::Free {
                genno, next_free, ..
            } => (0, *next_free as u64, *genno as u32),
            Self::InUse { genno, offset, .. } => (1, *offset, *genno as u32),
            Self::Compressed {
                stream_objid,
                index,
                ..
            } => (2, *stream_objid as u64, *index),
        }
    }
}

/// Ordered, write-once collection of cross-reference entries keyed by
/// object number.
#[derive(Debug, Default)]
pub struct XRefRegistry {
    entries: BTreeMap<u32, XRefEntry>,
}

impl XRefRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless its object number is already registered.
    ///
    /// Returns `true` when the entry was inserted; a repeated insert for
    /// the same object number is a no-op returning `false`.
    pub fn insert(&mut self, entry: XRefEntry) -> bool {
        match self.entries.entry(entry.objid()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Insert unconditionally, returning the displaced entry if any.
    /// Only the table emitter uses this, to force the object 0 free entry.
    pub(crate) fn insert_replacing(&mut self, entry: XRefEntry) -> Option<XRefEntry> {
        self.entries.insert(entry.objid(), entry)
    }

    /// Whether `objid` has been registered.
    pub fn contains(&self, objid: u32) -> bool {
        self.entries.contains_key(&objid)
    }

    /// Look up the entry for `objid`.
    pub fn get(&self, objid: u32) -> Option<&XRefEntry> {
        self.entries.get(&objid)
    }

    /// Highest registered object number, if any.
    pub fn highest(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in ascending object number order.
    pub fn iter(&self) -> impl Iterator<Item = &XRefEntry> {
        self.entries.values()
    }

    /// Group registered entries into runs of consecutive object numbers,
    /// as `(first object number, entries)` in ascending order. Classic
    /// incremental tables and the xref stream `/Index` are built from this.
    pub(crate) fn contiguous_runs(&self) -> Vec<(u32, Vec<XRefEntry>)> {
        let mut runs: Vec<(u32, Vec<XRefEntry>)> = Vec::new();
        for (&objid, &entry) in &self.entries {
            match runs.last_mut() {
                Some((start, entries)) if *start + entries.len() as u32 == objid => {
                    entries.push(entry);
                }
                _ => runs.push((objid, vec![entry])),
            }
        }
        runs
    }

    /// Column widths `[w1, w2, w3]` for the packed stream rows: one byte
    /// for the type, the smallest width that fits the largest second field,
    /// and at least two bytes for generation/index, widened when an object
    /// stream index does not fit in sixteen bits.
    pub(crate) fn stream_row_widths(&self) -> [usize; 3] {
        let (max_field2, max_field3) = self.iter().fold((0u64, 0u32), |(f2, f3), entry| {
            let (_, field2, field3) = entry.row_fields();
            (f2.max(field2), f3.max(field3))
        });
        [1, byte_width(max_field2), byte_width(u64::from(max_field3)).max(2)]
    }

    /// Pack every entry into binary stream rows using the given widths.
    pub(crate) fn pack_stream_rows(&self, widths: [usize; 3]) -> Vec<u8> {
        let mut rows = Vec::with_capacity(self.len() * (widths[0] + widths[1] + widths[2]));
        for entry in self.iter() {
            let (kind, field2, field3) = entry.row_fields();
            // Widths are derived from the data, so these writes cannot fail.
            let _ = rows.write_uint::<BigEndian>(u64::from(kind), widths[0]);
            let _ = rows.write_uint::<BigEndian>(field2, widths[1]);
            let _ = rows.write_uint::<BigEndian>(u64::from(field3), widths[2]);
        }
        rows
    }
}

/// Smallest number of big-endian bytes that can hold `value`.
fn byte_width(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}
