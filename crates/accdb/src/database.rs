//! # Database
//!
//! A [`Database`] owns every entry of one account file, in file order.
//!
//! ## Indexes
//!
//! - `entries`: identifier to entry. The only owner of entry data.
//! - `order`: iteration order. [`Database::sort`] rearranges it.
//! - `slots`: insertion order, so that item `N` is always `slots[N - 1]`.
//!   Nothing ever reorders or removes a slot, which keeps item numbers stable
//!   across sorting and tombstoning.
//!
//! ## File Layout
//!
//! ```text
//! ; vim: ft=accdb:            header, kept verbatim
//! = first entry
//! 	...
//!
//! = second entry
//! 	...
//!
//! ; dbflags: cache, conceal   database flags, always last
//! ```
//!
//! Both special lines are only recognized at column 0, so entry comments
//! that look like one are written indented. The `conceal` flag
//! makes storage dumps transport-encode confidential values.
//!
//! ## Dirty Tracking
//!
//! Mutations (`add`, `replace`, `sort`, `touch`, `merge`) mark the database
//! dirty; [`Database::flush`] writes it back only then. Loading from text does
//! not count as a modification. Dumps and exports never change any state.

use crate::codec::decode::today;
use crate::codec::{
    dump_entry, parse_entry, split_tags, DumpOptions, FLAGS_PREFIX, MODELINE_PREFIX,
};
use crate::error::{AccdbError, Result};
use crate::fields::{PASSWORD_FIELD, PASSWORD_HISTORY_FIELD};
use crate::filter::Filter;
use crate::model::{Entry, EntryRecord, Value};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Header line written when the file did not bring its own.
pub const DEFAULT_MODELINE: &str = "; vim: ft=accdb:";

/// Flag enabling transport encoding of confidential values on disk.
pub const CONCEAL_FLAG: &str = "conceal";

/// Flag asking for the storage dump to be mirrored to the cache file.
pub const CACHE_FLAG: &str = "cache";

/// What [`Database::flush`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing to write.
    Clean,
    /// Changes were written to the bound path.
    Written,
    /// Changes exist but the database is read-only; they are discarded.
    Discarded,
    /// Changes exist but no path is bound.
    Unbound,
}

/// Result of merging external text into a database.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Entries as stored after the merge, in input order.
    pub applied: Vec<Entry>,
    /// Broken input entries that were not applied.
    pub skipped: Vec<Entry>,
}

#[derive(Debug)]
pub struct Database {
    entries: HashMap<Uuid, Entry>,
    order: Vec<Uuid>,
    slots: Vec<Uuid>,
    path: Option<PathBuf>,
    dirty: bool,
    readonly: bool,
    modeline: Option<String>,
    flags: BTreeSet<String>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            slots: Vec::new(),
            path: None,
            dirty: false,
            readonly: false,
            modeline: Some(DEFAULT_MODELINE.to_string()),
            flags: BTreeSet::new(),
        }
    }

    /// Loads a database and binds it to `path` for later flushes.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut db = Self::parse(&text)?;
        db.path = Some(path.to_path_buf());
        debug!(path = %path.display(), entries = db.len(), "loaded database");
        Ok(db)
    }

    /// Builds an unbound database from text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut db = Self::new();
        db.parse_into(text)?;
        Ok(db)
    }

    /// Parses `text` and appends its entries.
    ///
    /// Fails only when an entry repeats an identifier already present.
    pub fn parse_into(&mut self, text: &str) -> Result<()> {
        let was_dirty = self.dirty;
        let mut block = String::new();
        let mut block_start = 1;
        let mut in_preamble = true;

        for (index, line) in text.split_inclusive('\n').enumerate() {
            let lineno = index + 1;
            if line.starts_with(MODELINE_PREFIX) {
                self.modeline = Some(line.trim().to_string());
            } else if let Some(flags) = line.strip_prefix(FLAGS_PREFIX) {
                self.flags = split_tags(flags).map(str::to_string).collect();
            } else if line.trim_start().starts_with('=') {
                self.add_block(&block, block_start, in_preamble)?;
                in_preamble = false;
                block.clear();
                block.push_str(line);
                block_start = lineno;
            } else {
                block.push_str(line);
            }
        }
        self.add_block(&block, block_start, in_preamble)?;

        self.dirty = was_dirty;
        Ok(())
    }

    fn add_block(&mut self, block: &str, lineno: usize, preamble: bool) -> Result<()> {
        let entry = parse_entry(block, lineno);
        if entry.is_empty() {
            return Ok(());
        }
        if preamble {
            warn!(line = lineno, "keeping content before the first entry as an unnamed entry");
        }
        self.add(entry)?;
        Ok(())
    }

    /// Inserts a new entry, assigning an identifier if it has none and the
    /// next item number.
    pub fn add(&mut self, mut entry: Entry) -> Result<&Entry> {
        let id = match entry.uuid {
            Some(id) if self.entries.contains_key(&id) => {
                return Err(AccdbError::DuplicateId(id));
            }
            Some(id) => id,
            None => Uuid::new_v4(),
        };

        entry.uuid = Some(id);
        entry.itemno = Some(self.slots.len() + 1);

        self.order.push(id);
        self.slots.push(id);
        self.dirty = true;
        Ok(&*self.entries.entry(id).or_insert(entry))
    }

    /// Swaps in a new version of an existing entry.
    ///
    /// The replacement keeps the stored entry's item number, line number and
    /// position. When the password changes, every old password is archived in
    /// the history field with today's date.
    pub fn replace(&mut self, mut entry: Entry) -> Result<&Entry> {
        let id = entry.uuid.ok_or(AccdbError::MissingId)?;
        let old = self.entries.get(&id).ok_or(AccdbError::EntryNotFound(id))?;

        entry.itemno = old.itemno;
        entry.lineno = old.lineno;

        if !entry.attributes.contains_key(PASSWORD_HISTORY_FIELD) {
            if let Some(history) = old.attributes.get(PASSWORD_HISTORY_FIELD) {
                entry
                    .attributes
                    .insert(PASSWORD_HISTORY_FIELD.to_string(), history.clone());
            }
        }

        let old_pass = old.attributes.get(PASSWORD_FIELD);
        let new_pass = entry.attributes.get(PASSWORD_FIELD);
        if let Some(old_pass) = old_pass.filter(|pass| !pass.is_empty()) {
            if Some(old_pass) != new_pass {
                let until = today();
                let archived: Vec<Value> = old_pass
                    .iter()
                    .map(|pass| Value::confidential(format!("{} (until {})", pass.reveal(), until)))
                    .collect();
                for value in archived {
                    entry.push_value(PASSWORD_HISTORY_FIELD, value);
                }
            }
        }

        self.dirty = true;
        self.entries.insert(id, entry);
        self.entries.get(&id).ok_or(AccdbError::EntryNotFound(id))
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Looks up an entry by its 1-based item number.
    pub fn find_by_itemno(&self, itemno: usize) -> Result<&Entry> {
        let out_of_range = || AccdbError::ItemOutOfRange {
            item: itemno,
            count: self.slots.len(),
        };
        let id = itemno
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .ok_or_else(out_of_range)?;
        self.entries.get(id).ok_or(AccdbError::EntryNotFound(*id))
    }

    /// All entries in the current order, tombstones included.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + Clone + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Entries matching `filter`, in the current order.
    pub fn find<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Entry> + Clone + 'a {
        self.iter().filter(move |entry| filter.matches(entry))
    }

    /// Every tag used by any entry.
    pub fn tags(&self) -> BTreeSet<String> {
        self.iter().flat_map(|entry| entry.tags.iter().cloned()).collect()
    }

    /// Reorders entries by normalized name. Item numbers are unaffected.
    pub fn sort(&mut self) {
        let entries = &self.entries;
        self.order.sort_by_cached_key(|id| {
            entries
                .get(id)
                .map(Entry::normalized_name)
                .unwrap_or_default()
        });
        self.dirty = true;
    }

    /// Marks the database for rewriting without changing it.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn modeline(&self) -> Option<&str> {
        self.modeline.as_deref()
    }

    /// Serializes the whole database.
    ///
    /// Storage output carries the header and flags lines and keeps
    /// tombstoned entries. Display output redacts confidential values and
    /// leaves tombstoned entries out.
    pub fn dump(&self, storage: bool) -> String {
        let opts = if storage {
            DumpOptions::storage(self.has_flag(CONCEAL_FLAG))
        } else {
            DumpOptions::display()
        };

        let mut out = String::new();
        if storage {
            if let Some(modeline) = &self.modeline {
                out.push_str(modeline);
                out.push('\n');
            }
        }
        for entry in self.iter() {
            if !storage && entry.is_deleted() {
                continue;
            }
            out.push_str(&dump_entry(entry, opts));
            out.push('\n');
        }
        if storage && !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(String::as_str).collect();
            out.push_str(FLAGS_PREFIX);
            out.push(' ');
            out.push_str(&flags.join(", "));
            out.push('\n');
        }
        out
    }

    /// Structured export of every entry, values revealed.
    pub fn to_structure(&self) -> Vec<EntryRecord> {
        self.iter().map(Entry::to_record).collect()
    }

    /// Writes the storage dump to `path` atomically.
    ///
    /// A symlinked path is written through to its target, and an existing
    /// file keeps its permissions.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let target = match fs::canonicalize(path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(e.into()),
        };
        let permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());

        let name = target
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("accdb");
        let tmp_path = target.with_file_name(format!(".{}-{}.tmp", name, Uuid::new_v4()));

        let written = write_new_file(&tmp_path, &self.dump(true), permissions)
            .and_then(|()| fs::rename(&tmp_path, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Writes pending changes back to the bound path.
    pub fn flush(&mut self) -> Result<FlushOutcome> {
        if !self.dirty {
            return Ok(FlushOutcome::Clean);
        }
        if self.readonly {
            return Ok(FlushOutcome::Discarded);
        }
        let Some(path) = self.path.clone() else {
            return Ok(FlushOutcome::Unbound);
        };
        self.to_file(&path)?;
        self.dirty = false;
        debug!(path = %path.display(), "stored database");
        Ok(FlushOutcome::Written)
    }

    /// Applies entries parsed from `text`.
    ///
    /// Each entry replaces the entry with the same identifier, or is added
    /// when there is none. Broken entries are skipped so that lost
    /// confidential data never overwrites good data.
    pub fn merge(&mut self, text: &str) -> Result<MergeReport> {
        let incoming = Self::parse(text)?;
        let mut report = MergeReport::default();

        for entry in incoming.into_entries() {
            if entry.broken {
                warn!(name = %entry.name, "skipped broken entry");
                report.skipped.push(entry);
                continue;
            }
            let known = entry.uuid.is_some_and(|id| self.contains(&id));
            let stored = if known {
                self.replace(entry)?
            } else {
                self.add(entry)?
            };
            report.applied.push(stored.clone());
        }

        Ok(report)
    }

    /// Consumes the database, yielding entries in the current order.
    pub fn into_entries(self) -> impl Iterator<Item = Entry> {
        let mut entries = self.entries;
        self.order
            .into_iter()
            .filter_map(move |id| entries.remove(&id))
    }
}

/// Creates `path` with `permissions` applied before any content lands.
fn write_new_file(
    path: &Path,
    content: &str,
    permissions: Option<fs::Permissions>,
) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.write_all(content.as_bytes())?;
    file.sync_all()
}
