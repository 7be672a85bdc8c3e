//! Precomputed best replies for the first few plies of a game
//!
//! A table holds the positions reached after a fixed number of moves. Each
//! entry is an integer made of the move history (1-indexed column digits)
//! followed by one more digit, the recommended next column. Entries are
//! sorted by history, i.e. by `entry / 10`, so a lookup is a binary search.

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Directory searched for table files by default
pub const DEFAULT_BOOK_DIR: &str = "opening_book";
/// Default number of plies covered by the book
pub const DEFAULT_BOOK_PLIES: usize = 5;

/// The file name holding the table for histories of `ply` moves
pub fn table_file_name(ply: usize) -> String {
    format!("moves_{}.txt", ply)
}

/// A sorted table of (history, next move) entries for one ply count
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpeningTable {
    entries: Vec<u64>,
}

impl OpeningTable {
    /// Builds a table, sorting the entries by their history prefix
    pub fn from_entries(mut entries: Vec<u64>) -> Self {
        if !is_sorted_by_prefix(&entries) {
            entries.sort_by_key(|entry| entry / 10);
        }
        Self { entries }
    }

    /// Parses a table with one integer per line
    ///
    /// Blank lines are ignored. Any other line that is not an unsigned
    /// integer rejects the whole table.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let entry = line
                .parse::<u64>()
                .with_context(|| format!("line {}: could not parse '{}'", line_number + 1, line))?;
            entries.push(entry);
        }
        if !is_sorted_by_prefix(&entries) {
            warn!("opening table is not sorted by move history, sorting in memory");
        }
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the recommended next move (a 1-indexed column digit) for a
    /// history of 1-indexed column digits, or `None` if it is not in the table
    pub fn lookup(&self, sequence: &str) -> Option<u8> {
        if sequence.is_empty() || !sequence.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        // longer histories than a u64 can hold are outside any table
        let target = sequence.parse::<u64>().ok()?;

        self.entries
            .binary_search_by(|entry| (entry / 10).cmp(&target))
            .ok()
            .map(|index| (self.entries[index] % 10) as u8)
    }
}

fn is_sorted_by_prefix(entries: &[u64]) -> bool {
    entries.windows(2).all(|pair| pair[0] / 10 <= pair[1] / 10)
}

/// The tables of an opening book, keyed by ply count
#[derive(Clone, Debug, Default)]
pub struct OpeningBookStorage {
    tables: BTreeMap<usize, OpeningTable>,
}

impl OpeningBookStorage {
    /// Looks up the reply to `sequence` in the table for `ply` moves
    pub fn lookup(&self, ply: usize, sequence: &str) -> Option<u8> {
        self.tables.get(&ply)?.lookup(sequence)
    }

    pub fn table(&self, ply: usize) -> Option<&OpeningTable> {
        self.tables.get(&ply)
    }

    /// The ply counts that have a table
    pub fn plies(&self) -> impl Iterator<Item = usize> + '_ {
        self.tables.keys().copied()
    }
}

/// A cheaply clonable, read-only opening book shared between engines
#[derive(Clone, Debug, Default)]
pub struct OpeningBook(Arc<OpeningBookStorage>);

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables<I: IntoIterator<Item = (usize, OpeningTable)>>(tables: I) -> Self {
        Self(Arc::new(OpeningBookStorage {
            tables: tables.into_iter().collect(),
        }))
    }

    /// Loads `moves_{ply}.txt` from `dir` for every ply in `1..=max_ply`
    ///
    /// Missing files are skipped and malformed tables are logged and left
    /// out, so lookups at those plies fall through to a full search.
    pub fn load<P: AsRef<Path>>(dir: P, max_ply: usize) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tables = BTreeMap::new();

        for ply in 1..=max_ply {
            let path = dir.join(table_file_name(ply));
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!("no opening table at {}", path.display());
                    continue;
                }
                Err(err) => {
                    return Err(anyhow!(err).context(format!("failed to read {}", path.display())))
                }
            };
            match OpeningTable::parse(&text) {
                Ok(table) => {
                    info!(
                        "loaded {} opening entries for ply {} from {}",
                        table.len(),
                        ply,
                        path.display()
                    );
                    tables.insert(ply, table);
                }
                Err(err) => warn!("ignoring malformed opening table {}: {:#}", path.display(), err),
            }
        }
        Ok(Self::from_tables(tables))
    }
}

impl std::ops::Deref for OpeningBook {
    type Target = OpeningBookStorage;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
