//! Generic storage for one entity type in one flat file.
//!
//! Every mutation follows the same shape: read the whole file, compute the
//! new row set in memory, then replace the file in one step. Rewrites go
//! through a temporary file in the same directory that is renamed over the
//! table, so a crash mid-write leaves the previous content in place.
//!
//! Ids come from a high-water mark kept in a `<file>.seq` sidecar next to the
//! table, so an id stays retired after its row is deleted.
//!
//! There is no locking. Two processes saving into the same table race and the
//! last writer wins; the store assumes a single user and a single process,
//! and that scenario is intentionally not covered by tests.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::line_codec::{Row, decode_line, encode_row, is_blank, split_records};
use crate::numeric::lenient_id;
use crate::status::StatusSink;

/// A record that maps onto one table row with its id in column 0.
pub trait Record: Sized {
    /// Column count of the current row shape.
    const COLUMNS: usize;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn to_row(&self) -> Row;
    /// `None` when the row is too short to hold this record.
    fn from_row(row: &[String]) -> Option<Self>;
}

/// What a keyed save did to the table.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<R> {
    Inserted(R),
    Updated { before: R, after: R },
}

impl<R> SaveOutcome<R> {
    #[must_use]
    pub fn record(&self) -> &R {
        match self {
            SaveOutcome::Inserted(r) | SaveOutcome::Updated { after: r, .. } => r,
        }
    }

    #[must_use]
    pub fn into_record(self) -> R {
        match self {
            SaveOutcome::Inserted(r) | SaveOutcome::Updated { after: r, .. } => r,
        }
    }

    #[must_use]
    pub fn was_inserted(&self) -> bool {
        matches!(self, SaveOutcome::Inserted(_))
    }
}

type Seeder = Box<dyn Fn() -> Vec<Row>>;

pub struct Table {
    path: PathBuf,
    sink: Rc<dyn StatusSink>,
    seeder: Option<Seeder>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("path", &self.path)
            .field("seeded", &self.seeder.is_some())
            .finish_non_exhaustive()
    }
}

impl Table {
    pub fn new(path: impl Into<PathBuf>, sink: Rc<dyn StatusSink>) -> Self {
        Self {
            path: path.into(),
            sink,
            seeder: None,
        }
    }

    /// Rows produced by `seeder` are written once, when the file is created.
    #[must_use]
    pub fn with_seeder(mut self, seeder: impl Fn() -> Vec<Row> + 'static) -> Self {
        self.seeder = Some(Box::new(seeder));
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn emit(&self, message: &str) {
        self.sink.emit(message);
    }

    fn ensure_dir(&self) -> Result<()> {
        let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Create the table file (and its directory) when it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        self.ensure_dir()?;
        if self.path.exists() {
            return Ok(());
        }
        let seed = self.seeder.as_ref().map(|s| s()).unwrap_or_default();
        self.replace_contents(&seed)?;
        info!(path = %self.path.display(), seeded_rows = seed.len(), "created table file");
        self.sink
            .emit(&format!("Created new file: {}", self.path.display()));
        Ok(())
    }

    /// Every non-blank line of the file, decoded.
    pub fn read_all(&self) -> Result<Vec<Row>> {
        self.ensure_exists()?;
        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let rows: Vec<Row> = split_records(&text)
            .into_iter()
            .map(decode_line)
            .filter(|row| !is_blank(row))
            .collect();
        debug!(path = %self.path.display(), rows = rows.len(), "read table");
        Ok(rows)
    }

    /// Replace the whole file with `rows`.
    pub fn write_all(&self, rows: &[Row]) -> Result<()> {
        self.ensure_dir()?;
        self.replace_contents(rows)?;
        debug!(path = %self.path.display(), rows = rows.len(), "wrote table");
        Ok(())
    }

    fn replace_contents(&self, rows: &[Row]) -> Result<()> {
        let mut content = String::new();
        for row in rows {
            content.push_str(&encode_row(row));
            content.push('\n');
        }
        persist_atomically(&self.path, content.as_bytes())
    }

    fn seq_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".seq");
        self.path.with_file_name(name)
    }

    /// Highest id this table has handed out, or 0 before the first insert.
    pub fn high_water(&self) -> Result<i64> {
        let path = self.seq_path();
        match fs::read_to_string(&path) {
            Ok(text) => Ok(lenient_id(&text).max(0)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    /// Pick the id for a new row and record it as the high-water mark.
    fn allocate_id(&self, rows: &[Row]) -> Result<i64> {
        let id = Self::next_id(rows).max(self.high_water()?.saturating_add(1));
        self.ensure_dir()?;
        persist_atomically(&self.seq_path(), id.to_string().as_bytes())?;
        Ok(id)
    }

    /// `max(id) + 1` over column 0, or 1 for an empty table. Malformed ids
    /// count as 0; the result saturates at `i64::MAX`.
    #[must_use]
    pub fn next_id(rows: &[Row]) -> i64 {
        rows.iter()
            .map(|r| row_id(r))
            .max()
            .unwrap_or(0)
            .max(0)
            .saturating_add(1)
    }

    /// Decode every row into `R`, skipping rows too short for the shape.
    pub fn load<R: Record>(&self) -> Result<Vec<R>> {
        Ok(decode_rows(&self.read_all()?, &self.path))
    }

    /// First record matching `pred`, or `None`.
    pub fn find<R: Record>(&self, pred: impl Fn(&R) -> bool) -> Result<Option<R>> {
        Ok(self.load::<R>()?.into_iter().find(|r| pred(r)))
    }

    /// Insert `record` under a fresh id, or fold it into the first existing
    /// record with the same key using `merge`. The existing id is kept.
    pub fn upsert<R: Record + Clone>(
        &self,
        rows: Vec<Row>,
        mut record: R,
        same_key: impl Fn(&R) -> bool,
        merge: impl FnOnce(&R, &R) -> R,
    ) -> Result<SaveOutcome<R>> {
        let mut rows = rows;
        let existing = rows
            .iter()
            .enumerate()
            .find_map(|(idx, row)| R::from_row(row).filter(|r| same_key(r)).map(|r| (idx, r)));

        let outcome = match existing {
            Some((idx, before)) if before.id() > 0 => {
                let mut after = merge(&before, &record);
                after.set_id(before.id());
                rows[idx] = after.to_row();
                SaveOutcome::Updated { before, after }
            }
            _ => {
                record.set_id(self.allocate_id(&rows)?);
                rows.push(record.to_row());
                SaveOutcome::Inserted(record)
            }
        };

        self.write_all(&rows)?;
        Ok(outcome)
    }

    /// Append `record` under a fresh id. No key check.
    pub fn insert<R: Record>(&self, rows: Vec<Row>, mut record: R) -> Result<R> {
        let mut rows = rows;
        record.set_id(self.allocate_id(&rows)?);
        rows.push(record.to_row());
        self.write_all(&rows)?;
        Ok(record)
    }

    /// Drop the row whose id column equals `id`. Returns whether one was
    /// removed; the file is only rewritten when something changed.
    pub fn delete_by_id(&self, id: i64, min_columns: usize) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let rows = self.read_all()?;
        let before = rows.len();
        let kept: Vec<Row> = rows
            .into_iter()
            .filter(|r| !(r.len() >= min_columns && row_id(r) == id))
            .collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.write_all(&kept)?;
        Ok(true)
    }

    /// Overwrite one column of the row with `id`.
    pub fn update_column(&self, id: i64, column: usize, value: &str) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let mut rows = self.read_all()?;
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.len() > column && row_id(r) == id)
        else {
            return Ok(false);
        };
        row[column] = value.to_string();
        self.write_all(&rows)?;
        Ok(true)
    }

    /// Keep only rows for which `keep` holds. Returns how many were removed.
    pub fn retain(&self, keep: impl Fn(&Row) -> bool) -> Result<usize> {
        let rows = self.read_all()?;
        let before = rows.len();
        let kept: Vec<Row> = rows.into_iter().filter(|r| keep(r)).collect();
        let removed = before - kept.len();
        self.write_all(&kept)?;
        Ok(removed)
    }
}

/// Write `bytes` to a temporary file beside `path`, then rename it into place.
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Id column of a row; malformed or missing ids read as 0.
#[must_use]
pub fn row_id(row: &[String]) -> i64 {
    row.first().map_or(0, |f| lenient_id(f))
}

pub(crate) fn decode_rows<R: Record>(rows: &[Row], path: &Path) -> Vec<R> {
    rows.iter()
        .filter_map(|row| {
            let decoded = R::from_row(row);
            if decoded.is_none() {
                warn!(path = %path.display(), columns = row.len(), "skipping short row");
            }
            decoded
        })
        .collect()
}
