//! Test doubles for the repository's collaborators and store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use provenance_db::{
    Document, DocumentStore, Filter, ProvenanceFile, Query, SnapshotCache, StoreError, Totals,
    UnknownItemListener,
};

/// Listener that records every label it is given.
#[derive(Debug, Default)]
pub struct RecordingListener {
    labels: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().expect("listener lock").clone()
    }

    pub fn last(&self) -> Option<String> {
        self.labels().pop()
    }

    pub fn count(&self) -> usize {
        self.labels.lock().expect("listener lock").len()
    }
}

impl UnknownItemListener for RecordingListener {
    fn unknown_file(&self, label: &str) {
        self.labels
            .lock()
            .expect("listener lock")
            .push(label.to_string());
    }
}

/// Snapshot cache that serves fixed bytes and records every call.
#[derive(Debug, Default)]
pub struct ScriptedSnapshotCache {
    bytes: Option<Vec<u8>>,
    requested: Mutex<Vec<String>>,
    kept: Mutex<Vec<(String, Vec<u8>)>>,
}

impl ScriptedSnapshotCache {
    /// A cache that never has bytes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A cache answering every `get_bytes` with `bytes`.
    pub fn serving(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            ..Self::default()
        }
    }

    /// Locations `get_bytes` was asked for.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("cache lock").clone()
    }

    /// `(location, bytes)` pairs handed to `keep`.
    pub fn kept(&self) -> Vec<(String, Vec<u8>)> {
        self.kept.lock().expect("cache lock").clone()
    }
}

impl<F: ProvenanceFile> SnapshotCache<F> for ScriptedSnapshotCache {
    fn get_bytes(&self, file: &F) -> Option<Vec<u8>> {
        self.requested
            .lock()
            .expect("cache lock")
            .push(file.location());
        self.bytes.clone()
    }

    fn keep(&self, bytes: Vec<u8>, file: &F) {
        self.kept
            .lock()
            .expect("cache lock")
            .push((file.location(), bytes));
    }
}

/// Store wrapper counting every call that reaches the inner store.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S: DocumentStore> DocumentStore for CountingStore<S> {
    fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        self.tick();
        self.inner.find_one(filter)
    }

    fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.tick();
        self.inner.find(query)
    }

    fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        self.tick();
        self.inner.insert_one(document)
    }

    fn replace_one(&self, filter: &Filter, document: Document) -> Result<u64, StoreError> {
        self.tick();
        self.inner.replace_one(filter, document)
    }

    fn set_fields(&self, filter: &Filter, fields: Document) -> Result<u64, StoreError> {
        self.tick();
        self.inner.set_fields(filter, fields)
    }

    fn sum_and_count(&self, field: &str) -> Result<Option<Totals>, StoreError> {
        self.tick();
        self.inner.sum_and_count(field)
    }
}

/// Store whose every call fails with the configured error.
#[derive(Debug, Clone)]
pub struct FailingStore {
    error: StoreError,
}

impl FailingStore {
    pub fn new(error: StoreError) -> Self {
        Self { error }
    }

    /// A store that cannot be reached.
    pub fn unreachable() -> Self {
        Self::new(StoreError::unavailable("connection refused"))
    }
}

impl DocumentStore for FailingStore {
    fn find_one(&self, _filter: &Filter) -> Result<Option<Document>, StoreError> {
        Err(self.error.clone())
    }

    fn find(&self, _query: &Query) -> Result<Vec<Document>, StoreError> {
        Err(self.error.clone())
    }

    fn insert_one(&self, _document: Document) -> Result<(), StoreError> {
        Err(self.error.clone())
    }

    fn replace_one(&self, _filter: &Filter, _document: Document) -> Result<u64, StoreError> {
        Err(self.error.clone())
    }

    fn set_fields(&self, _filter: &Filter, _fields: Document) -> Result<u64, StoreError> {
        Err(self.error.clone())
    }

    fn sum_and_count(&self, _field: &str) -> Result<Option<Totals>, StoreError> {
        Err(self.error.clone())
    }
}
