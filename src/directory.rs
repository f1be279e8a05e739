//! The reference directory: a fixed, read-only table of composite records.
//!
//! The directory is the single source of truth for the whole run. Writers
//! push its entries into the shared register; the verifier resolves every
//! snapshot back against it.

/// Longest first name the directory may hold.
pub const MAX_FIRST_NAME: usize = 19;
/// Longest last name the directory may hold.
pub const MAX_LAST_NAME: usize = 29;
/// Longest department name the directory may hold.
pub const MAX_DEPARTMENT: usize = 29;

/// One composite employee record, the unit that is copied, overwritten,
/// and validated as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// 1-based index of this record in the directory.
    pub identity_number: usize,
    /// 8-digit identifier, unique per directory entry.
    pub id_code: u32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub room_number: u32,
}

/// Immutable table of reference records. Built once at startup, never
/// mutated afterwards, safe to share across threads by reference.
///
/// Invariant: `entries[k].identity_number == k + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<Record>,
}

impl Directory {
    /// Builds a directory from ordered entries. The 1-based numbering
    /// invariant is a construction-time precondition.
    pub fn new(entries: Vec<Record>) -> Self {
        debug_assert!(entries
            .iter()
            .enumerate()
            .all(|(k, e)| e.identity_number == k + 1));
        Directory { entries }
    }

    /// The two-employee reference table used by the demonstration runs.
    pub fn staff() -> Self {
        Directory::new(vec![
            Record {
                identity_number: 1,
                id_code: 12_345_678,
                first_name: "danny".to_owned(),
                last_name: "coresh".to_owned(),
                department: "Accounting".to_owned(),
                room_number: 101,
            },
            Record {
                identity_number: 2,
                id_code: 87_654_321,
                first_name: "misha".to_owned(),
                last_name: "levyn".to_owned(),
                department: "Programmers".to_owned(),
                room_number: 202,
            },
        ])
    }

    /// Looks up a record by its 1-based identity number. Returns `None`
    /// for zero or out-of-range numbers rather than panicking; the
    /// verifier treats that as an inconsistency in its own right.
    pub fn get(&self, identity_number: usize) -> Option<&Record> {
        identity_number
            .checked_sub(1)
            .and_then(|k| self.entries.get(k))
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
