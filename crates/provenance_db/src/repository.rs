//! The provenance repository.
//!
//! Every public operation issues exactly one store call. Reads restore
//! stored documents (time spans, snapshot payloads) before handing them to
//! the record factory; writes convert provenance to stored form first.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span, info};

use crate::collaborators::{
    Lookup, ProvenanceFile, RecordFactory, SnapshotCache, UnknownItem, UnknownItemListener,
};
use crate::config::RepositoryConfig;
use crate::document::{fields, Document, Filter, Query, SortOrder};
use crate::error::{Result, StoreError};
use crate::serialization::{restore, to_stored};
use crate::store::DocumentStore;
use crate::types::Statistics;
use crate::value::Value;

type SharedCache<F> = Arc<dyn SnapshotCache<F> + Send + Sync>;
type SharedListener = Arc<dyn UnknownItemListener + Send + Sync>;

/// Read and write access to catalogued provenance.
pub struct ProvenanceRepository<S, F: RecordFactory> {
    store: S,
    factory: F,
    snapshots: SharedCache<F::File>,
    listener: SharedListener,
    config: RepositoryConfig,
}

impl<S, F> ProvenanceRepository<S, F>
where
    S: DocumentStore,
    F: RecordFactory,
{
    pub fn new<C, L>(store: S, factory: F, snapshots: Arc<C>, listener: Arc<L>) -> Self
    where
        C: SnapshotCache<F::File> + Send + Sync + 'static,
        L: UnknownItemListener + Send + Sync + 'static,
    {
        Self {
            store,
            factory,
            snapshots,
            listener,
            config: RepositoryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Identity lookups
    // ========================================================================

    /// Whether a record exists at `path`.
    pub fn knows_by_location(&self, path: &str) -> Result<bool> {
        let filter = Filter::equals(fields::LOCATION, path);
        let found = self.timed("knows_by_location", || self.store.find_one(&filter))?;
        Ok(found.is_some())
    }

    /// The record at `path`, or an unknown-location miss.
    pub fn by_location(&self, path: &str) -> Result<Lookup<F::File>> {
        self.lookup_one(
            "by_location",
            Filter::equals(fields::LOCATION, path),
            UnknownItem::Location(path.to_string()),
        )
    }

    /// The record with `id`, or an unknown-id miss.
    pub fn by_id(&self, id: &str) -> Result<Lookup<F::File>> {
        self.lookup_one(
            "by_id",
            Filter::equals(fields::ID, id),
            UnknownItem::Id(id.to_string()),
        )
    }

    /// The stored record for the series `file` belongs to.
    ///
    /// A file without a series id is reported as a miss without querying.
    pub fn get_series(&self, file: &F::File) -> Result<Lookup<F::File>> {
        let Some(series) = file.series_id() else {
            return Ok(self.miss(UnknownItem::NoSeries));
        };
        self.lookup_one(
            "get_series",
            Filter::equals(fields::SERIES_UID, series.as_str()),
            UnknownItem::Series(series),
        )
    }

    /// Whether a record of the series `file` belongs to exists.
    pub fn knows_series(&self, file: &F::File) -> Result<bool> {
        let Some(series) = file.series_id() else {
            return Ok(false);
        };
        let filter = Filter::equals(fields::SERIES_UID, series.as_str());
        let found = self.timed("knows_series", || self.store.find_one(&filter))?;
        Ok(found.is_some())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a newly observed file.
    ///
    /// Fails with a store conflict if its location is already catalogued.
    pub fn add(&self, file: &F::File) -> Result<()> {
        let mut document = to_stored(file.provenance());
        let has_snapshot = match self.snapshots.get_bytes(file) {
            Some(bytes) => {
                document.insert(fields::SNAPSHOT_DATA, Value::Binary(bytes));
                true
            }
            None => false,
        };
        self.timed("add", || self.store.insert_one(document))?;
        info!(location = %file.location(), has_snapshot, "Added provenance record");
        Ok(())
    }

    /// Replace the record at the file's location with its provenance.
    pub fn update(&self, file: &F::File) -> Result<()> {
        let location = file.location();
        let document = to_stored(file.provenance());
        let filter = Filter::equals(fields::LOCATION, location.as_str());
        let replaced = self.timed("update", || self.store.replace_one(&filter, document))?;
        info!(location = %location, replaced, "Updated provenance record");
        Ok(())
    }

    /// Set the approval status of the record at `path`, nothing else.
    pub fn update_approval(&self, path: &str, status: &str) -> Result<()> {
        let filter = Filter::equals(fields::LOCATION, path);
        let patch = Document::new().with(fields::APPROVAL, status);
        let modified = self.timed("update_approval", || self.store.set_fields(&filter, patch))?;
        info!(location = path, status, modified, "Updated approval status");
        Ok(())
    }

    // ========================================================================
    // Collection queries
    // ========================================================================

    /// Every record, in store order.
    pub fn all(&self) -> Result<Vec<F::File>> {
        self.collect("all", Query::all())
    }

    pub fn by_subject(&self, subject: &str) -> Result<Vec<F::File>> {
        self.collect(
            "by_subject",
            Query::new(Filter::equals(fields::SUBJECT, subject)),
        )
    }

    pub fn by_approval(&self, status: &str) -> Result<Vec<F::File>> {
        self.collect(
            "by_approval",
            Query::new(Filter::equals(fields::APPROVAL, status)),
        )
    }

    /// Records whose location is one of `paths`.
    pub fn by_locations<I, P>(&self, paths: I) -> Result<Vec<F::File>>
    where
        I: IntoIterator<Item = P>,
        P: Into<Value>,
    {
        self.collect(
            "by_locations",
            Query::new(Filter::is_in(fields::LOCATION, paths)),
        )
    }

    /// Records derived from any of `ids`.
    pub fn by_parents<I, P>(&self, ids: I) -> Result<Vec<F::File>>
    where
        I: IntoIterator<Item = P>,
        P: Into<Value>,
    {
        self.collect(
            "by_parents",
            Query::new(Filter::is_in(fields::PARENTS, ids)),
        )
    }

    /// The `limit` most recently added records, newest first.
    pub fn latest(&self, limit: usize) -> Result<Vec<F::File>> {
        self.collect(
            "latest",
            Query::all()
                .sort_by(fields::ADDED, SortOrder::Descending)
                .limit(limit),
        )
    }

    /// [`Self::latest`] with the configured default limit.
    pub fn latest_default(&self) -> Result<Vec<F::File>> {
        self.latest(self.config.latest_limit)
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Total size and count over every record.
    pub fn statistics(&self) -> Result<Statistics> {
        let totals = self.timed("statistics", || self.store.sum_and_count(fields::SIZE))?;
        Ok(Statistics::from(totals))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn lookup_one(
        &self,
        op: &'static str,
        filter: Filter,
        on_miss: UnknownItem,
    ) -> Result<Lookup<F::File>> {
        match self.timed(op, || self.store.find_one(&filter))? {
            Some(document) => Ok(Lookup::Found(self.materialize(document)?)),
            None => Ok(self.miss(on_miss)),
        }
    }

    fn miss(&self, item: UnknownItem) -> Lookup<F::File> {
        let label = item.label();
        debug!(item = %label, "Lookup found no record");
        self.listener.unknown_file(&label);
        Lookup::Unknown(item)
    }

    fn collect(&self, op: &'static str, query: Query) -> Result<Vec<F::File>> {
        let documents = self.timed(op, || self.store.find(&query))?;
        debug!(op, count = documents.len(), "Query returned records");
        documents
            .into_iter()
            .map(|document| self.materialize(document))
            .collect()
    }

    /// Stored document to domain file, forwarding any snapshot to the cache.
    fn materialize(&self, document: Document) -> Result<F::File> {
        let restored = restore(document)?;
        let file = self.factory.from_provenance(restored.provenance)?;
        if let Some(bytes) = restored.snapshot {
            self.snapshots.keep(bytes, &file);
        }
        Ok(file)
    }

    fn timed<T>(
        &self,
        op: &'static str,
        call: impl FnOnce() -> std::result::Result<T, StoreError>,
    ) -> std::result::Result<T, StoreError> {
        let span = debug_span!(
            "provenance.store",
            op = op,
            duration_ms = tracing::field::Empty
        );
        let _guard = span.enter();
        let start = Instant::now();
        let result = call();
        span.record("duration_ms", start.elapsed().as_millis() as u64);
        result
    }
}
