//! The document store.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::id::{generate_id, wrap_in_sequence, Ids};
use crate::model::{self, ID_FIELD};
use crate::mutation::Update;
use crate::persistence::{self, LoadReport, PersistReport};
use crate::projection::Projection;
use crate::query::Query;
use folio_codec::{Document, Value};
use folio_storage::{FileBackend, StorageBackend};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

/// Liveness of a table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Live,
    Deleted,
}

/// What a `put` changed, enough to revert it.
enum Put {
    Reused { index: usize, previous: Slot },
    Appended { id: String },
}

#[derive(Debug, Clone)]
struct Slot {
    doc: Document,
    state: SlotState,
}

impl Slot {
    fn is_live(&self) -> bool {
        self.state == SlotState::Live
    }
}

/// An embedded document store.
///
/// `Store` keeps its whole table in memory. Every operation validates its
/// arguments before touching the table, so a rejected call leaves the table
/// exactly as it was.
///
/// Deleted documents are tombstoned: they stop matching queries and lookups
/// at once but keep their slot until the table is reloaded or dropped.
/// [`Store::persist`] writes only live documents.
///
/// The data file is only read or written by [`Store::load`],
/// [`Store::persist`] and [`Store::drop`], unless
/// [`Config::autopersist`] is enabled.
///
/// # Example
///
/// ```rust
/// use folio_core::{Document, Projection, Store};
///
/// let mut store = Store::open_in_memory();
///
/// let mut doc = Document::new();
/// doc.insert("type", "normal");
/// store.insert(doc)?;
///
/// let mut query = Document::new();
/// query.insert("type", "normal");
/// let found = store.find(query, &Projection::all())?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), folio_core::CoreError>(())
/// ```
pub struct Store {
    config: Config,
    /// Opened lazily from `config.data_path()` unless supplied up front.
    backend: Option<Box<dyn StorageBackend>>,
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Store {
    /// Opens a store with the given configuration.
    ///
    /// No I/O happens here. Call [`Store::load`] to read an existing data
    /// file.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the name cannot be used as a file name,
    /// or if autopersist is enabled without a root directory.
    pub fn open(config: Config) -> CoreResult<Self> {
        if config.autopersist && config.root.is_none() {
            return Err(CoreError::configuration(
                "autopersist requires a root directory",
            ));
        }
        Self::with_parts(config, None)
    }

    /// Opens a store that lives only in memory.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self {
            config: Config::default(),
            backend: None,
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Opens a store persisting to the given backend instead of a file.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the name cannot be used as a file name.
    pub fn open_with_backend(config: Config, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        Self::with_parts(config, Some(backend))
    }

    fn with_parts(config: Config, backend: Option<Box<dyn StorageBackend>>) -> CoreResult<Self> {
        if !config.name_is_valid() {
            return Err(CoreError::configuration(format!(
                "invalid database name `{}`",
                config.name
            )));
        }
        Ok(Self {
            config,
            backend,
            slots: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of live documents.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// Number of slots, live or tombstoned.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no live documents.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.len() - self.count()
    }

    /// Iterates over live documents in slot order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.slots
            .iter()
            .filter(|slot| slot.is_live())
            .map(|slot| &slot.doc)
    }

    /// Returns true if the store can load and persist.
    pub fn has_storage(&self) -> bool {
        self.backend.is_some() || self.config.root.is_some()
    }

    /// Inserts one document or an array of documents.
    ///
    /// Documents without an `_id` get a generated one. The batch is
    /// inserted only if every document is valid and no `_id` collides with
    /// a live document or another document in the batch.
    ///
    /// Returns the inserted documents, including their `_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a candidate is not a document, holds an
    ///   illegal field name, or has an `_id` that is not a non-empty string
    /// - `DuplicateIdentifier` on an `_id` collision
    pub fn insert(&mut self, docs: impl Into<Value>) -> CoreResult<Vec<Document>> {
        let candidates = wrap_in_sequence(docs.into());
        let mut prepared = Vec::with_capacity(candidates.len());
        let mut batch_ids = HashSet::with_capacity(candidates.len());

        for candidate in candidates {
            let doc = prepare_insert(candidate)?;
            let id = document_id(&doc).to_string();
            if self.live_slot(&id).is_some() || !batch_ids.insert(id.clone()) {
                return Err(CoreError::duplicate_identifier(id));
            }
            prepared.push((id, doc));
        }

        let mut inserted = Vec::with_capacity(prepared.len());
        let mut undo = Vec::with_capacity(prepared.len());
        for (id, doc) in prepared {
            inserted.push(doc.clone());
            undo.push(self.put(id, doc));
        }
        debug!(count = inserted.len(), "inserted documents");

        self.autopersist_or(|store| {
            for put in undo.into_iter().rev() {
                store.undo_put(put);
            }
        })?;
        Ok(inserted)
    }

    /// Inserts a single document and returns it with its `_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Store::insert`].
    pub fn insert_one(&mut self, doc: Document) -> CoreResult<Document> {
        let mut inserted = self.insert(doc)?;
        inserted
            .pop()
            .ok_or_else(|| CoreError::invalid_argument("no document was inserted"))
    }

    /// Returns the live documents matching `query`, projected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the query is malformed.
    pub fn find(&self, query: impl Into<Value>, projection: &Projection) -> CoreResult<Vec<Document>> {
        let query = Query::from_value(&query.into())?;
        let found: Vec<Document> = self
            .matching(&query)
            .map(|index| projection.apply(&self.slots[index].doc))
            .collect();
        debug!(count = found.len(), "find");
        Ok(found)
    }

    /// Returns the live documents with the given ids, projected.
    ///
    /// Missing and tombstoned ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an id is empty.
    pub fn find_by_id(&self, ids: impl Into<Ids>, projection: &Projection) -> CoreResult<Vec<Document>> {
        let ids = ids.into();
        ids.validate()?;
        let found: Vec<Document> = ids
            .as_slice()
            .iter()
            .filter_map(|id| self.live_slot(id))
            .map(|index| projection.apply(&self.slots[index].doc))
            .collect();
        debug!(requested = ids.len(), count = found.len(), "find_by_id");
        Ok(found)
    }

    /// Updates the live documents matching `query`.
    ///
    /// A modifier update (`$set`, `$add`, `$push`) is applied to each
    /// target. Any other update replaces every field of each target. The
    /// target's `_id` is always kept.
    ///
    /// Returns the updated documents, projected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the query or update is malformed, if
    /// the update would change a target's `_id`, or if a modifier does not
    /// fit a target. No document is changed in that case.
    pub fn update(
        &mut self,
        query: impl Into<Value>,
        update: impl Into<Value>,
        projection: &Projection,
    ) -> CoreResult<Vec<Document>> {
        let update = Update::parse(&update.into())?;
        let query = Query::from_value(&query.into())?;
        let targets: Vec<usize> = self.matching(&query).collect();
        self.apply_update(&targets, &update, projection)
    }

    /// Updates the live documents with the given ids.
    ///
    /// Missing and tombstoned ids are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Store::update`], plus `InvalidArgument` for an empty id.
    pub fn update_by_id(
        &mut self,
        ids: impl Into<Ids>,
        update: impl Into<Value>,
        projection: &Projection,
    ) -> CoreResult<Vec<Document>> {
        let update = Update::parse(&update.into())?;
        let ids = ids.into();
        ids.validate()?;
        let targets = self.live_slots(&ids);
        self.apply_update(&targets, &update, projection)
    }

    fn apply_update(
        &mut self,
        targets: &[usize],
        update: &Update,
        projection: &Projection,
    ) -> CoreResult<Vec<Document>> {
        let mut replacements = Vec::with_capacity(targets.len());
        for &index in targets {
            let current = &self.slots[index].doc;
            update.check_target(document_id(current))?;
            replacements.push((index, update.apply(current)?));
        }

        let mut updated = Vec::with_capacity(replacements.len());
        let mut previous = Vec::with_capacity(replacements.len());
        for (index, doc) in replacements {
            updated.push(projection.apply(&doc));
            previous.push((index, std::mem::replace(&mut self.slots[index].doc, doc)));
        }
        debug!(count = updated.len(), "updated documents");

        self.autopersist_or(|store| {
            for (index, doc) in previous {
                store.slots[index].doc = doc;
            }
        })?;
        Ok(updated)
    }

    /// Tombstones the live documents matching `query`.
    ///
    /// Returns the number of documents newly tombstoned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the query is malformed.
    pub fn delete(&mut self, query: impl Into<Value>) -> CoreResult<usize> {
        let query = Query::from_value(&query.into())?;
        let targets: Vec<usize> = self.matching(&query).collect();
        self.tombstone(&targets)
    }

    /// Tombstones the live documents with the given ids.
    ///
    /// Missing and already tombstoned ids are skipped and not counted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an id is empty.
    pub fn delete_by_id(&mut self, ids: impl Into<Ids>) -> CoreResult<usize> {
        let ids = ids.into();
        ids.validate()?;
        let targets = self.live_slots(&ids);
        self.tombstone(&targets)
    }

    fn tombstone(&mut self, targets: &[usize]) -> CoreResult<usize> {
        for &index in targets {
            self.slots[index].state = SlotState::Deleted;
        }
        debug!(count = targets.len(), "deleted documents");

        if !targets.is_empty() {
            self.autopersist_or(|store| {
                for &index in targets {
                    store.slots[index].state = SlotState::Live;
                }
            })?;
        }
        Ok(targets.len())
    }

    /// Removes every document, live or tombstoned.
    ///
    /// A store with storage persists the now-empty table immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the empty table fails.
    #[allow(clippy::should_implement_trait)]
    pub fn drop(&mut self) -> CoreResult<()> {
        let removed = self.slots.len();
        self.slots.clear();
        self.index.clear();
        info!(removed, "dropped table");

        if self.has_storage() {
            self.persist()?;
        }
        Ok(())
    }

    /// Replaces the table with the content of the data file.
    ///
    /// A missing data file is created empty. Later lines win over earlier
    /// lines with the same `_id`. Corrupted lines are quarantined in the
    /// returned report, or fail the load in strict mode; a failed load
    /// leaves the table unchanged.
    ///
    /// # Errors
    ///
    /// - `Configuration` without a root directory or backend, or when the
    ///   file is missing and `create_if_missing` is off
    /// - `Corruption` in strict mode
    /// - `Storage` on I/O failure
    pub fn load(&mut self) -> CoreResult<LoadReport> {
        if self.backend.is_none() && !self.config.create_if_missing {
            if let Some(path) = self.config.data_path() {
                if !path.exists() {
                    return Err(CoreError::configuration(format!(
                        "data file {} does not exist",
                        path.display()
                    )));
                }
            }
        }

        let bytes = self.backend()?.read_all()?;
        let (documents, corrupted) = persistence::decode_lines(&bytes, self.config.strict)?;

        self.slots.clear();
        self.index.clear();
        for doc in documents {
            let id = document_id(&doc).to_string();
            self.put(id, doc);
        }

        let report = LoadReport {
            loaded: self.slots.len(),
            corrupted,
        };
        info!(
            loaded = report.loaded,
            corrupted = report.corrupted.len(),
            "loaded data file"
        );
        Ok(report)
    }

    /// Writes every live document to the data file, replacing its content.
    ///
    /// Tombstoned documents and previously quarantined lines are not
    /// written. Documents that cannot be serialized are skipped, or fail
    /// the call in strict mode without touching the file.
    ///
    /// # Errors
    ///
    /// - `Configuration` without a root directory or backend
    /// - `Corruption` in strict mode
    /// - `Storage` on I/O failure
    pub fn persist(&mut self) -> CoreResult<PersistReport> {
        self.backend()?;
        let (text, report) = persistence::encode_documents(self.documents(), self.config.strict)?;

        let backend = self.backend()?;
        backend.replace(text.as_bytes())?;
        backend.sync()?;

        info!(
            written = report.written,
            skipped = report.skipped,
            "persisted data file"
        );
        Ok(report)
    }

    /// Persists a mutation that is already applied in memory. If the write
    /// fails, `rollback` undoes the mutation before the error is returned.
    fn autopersist_or(&mut self, rollback: impl FnOnce(&mut Self)) -> CoreResult<()> {
        if !self.config.autopersist {
            return Ok(());
        }
        if let Err(e) = self.persist() {
            warn!(error = %e, "autopersist failed, rolling back");
            rollback(self);
            return Err(e);
        }
        Ok(())
    }

    fn backend(&mut self) -> CoreResult<&mut dyn StorageBackend> {
        if self.backend.is_none() {
            let path = self.config.data_path().ok_or_else(|| {
                CoreError::configuration("store is in memory only: no root directory configured")
            })?;
            let backend = FileBackend::open_with_create_dirs(&path)?;
            debug!(path = %path.display(), "opened data file");
            self.backend = Some(Box::new(backend));
        }
        match self.backend.as_deref_mut() {
            Some(backend) => Ok(backend),
            None => Err(CoreError::configuration("no storage backend")),
        }
    }

    fn live_slot(&self, id: &str) -> Option<usize> {
        self.index
            .get(id)
            .copied()
            .filter(|&index| self.slots[index].is_live())
    }

    /// Resolves ids to live slots, each slot at most once.
    fn live_slots(&self, ids: &Ids) -> Vec<usize> {
        let mut seen = HashSet::new();
        ids.as_slice()
            .iter()
            .filter_map(|id| self.live_slot(id))
            .filter(|index| seen.insert(*index))
            .collect()
    }

    fn matching<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = usize> + 'a {
        let universal = query.is_universal();
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.is_live() && (universal || query.matches(&slot.doc)))
            .map(|(index, _)| index)
    }

    /// Stores `doc` under `id`, reusing the slot already holding that id.
    fn put(&mut self, id: String, doc: Document) -> Put {
        let slot = Slot {
            doc,
            state: SlotState::Live,
        };
        match self.index.get(&id) {
            Some(&index) => Put::Reused {
                index,
                previous: std::mem::replace(&mut self.slots[index], slot),
            },
            None => {
                self.index.insert(id.clone(), self.slots.len());
                self.slots.push(slot);
                Put::Appended { id }
            }
        }
    }

    /// Reverts a `put`. Appends must be undone newest first.
    fn undo_put(&mut self, put: Put) {
        match put {
            Put::Reused { index, previous } => self.slots[index] = previous,
            Put::Appended { id } => {
                self.index.remove(&id);
                self.slots.pop();
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("live", &self.count())
            .field("tombstones", &self.tombstones())
            .finish_non_exhaustive()
    }
}

/// Validates an insert candidate and gives it an `_id` if it has none.
fn prepare_insert(candidate: Value) -> CoreResult<Document> {
    if model::is_invalid_document(&candidate) {
        return Err(CoreError::invalid_argument(if candidate.is_document() {
            "document contains an illegal field name".to_string()
        } else {
            format!("expected a document, found {}", candidate.type_name())
        }));
    }
    let Value::Document(doc) = candidate else {
        return Err(CoreError::invalid_argument("expected a document"));
    };

    match doc.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(doc),
        Some(_) => Err(CoreError::invalid_argument(
            "`_id` must be a non-empty string",
        )),
        None => {
            let mut stamped = Document::with_capacity(doc.len() + 1);
            stamped.insert(ID_FIELD, generate_id());
            for (name, value) in doc {
                stamped.insert(name, value);
            }
            Ok(stamped)
        }
    }
}

/// Returns the `_id` of a stored document.
///
/// Every stored document carries a string `_id`; insert and load both
/// enforce it.
fn document_id(doc: &Document) -> &str {
    doc.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default()
}
