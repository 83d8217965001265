//! Record fixtures and a pre-wired repository harness.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use provenance_db::{
    approval, fields, DocumentStore, MemoryDocumentStore, Provenance, ProvenanceRepository,
};

use crate::doubles::{CountingStore, RecordingListener, ScriptedSnapshotCache};
use crate::plain::PlainFactory;

pub type SharedStore = Arc<CountingStore<MemoryDocumentStore>>;

/// Repository over a counting memory store, with handles on every double.
pub struct PlainHarness {
    pub repo: ProvenanceRepository<SharedStore, PlainFactory>,
    pub store: SharedStore,
    pub listener: Arc<RecordingListener>,
    pub snapshots: Arc<ScriptedSnapshotCache>,
}

/// Harness whose snapshot cache never has bytes.
pub fn plain_repository() -> PlainHarness {
    plain_repository_with(ScriptedSnapshotCache::empty())
}

/// Harness with the given snapshot cache.
pub fn plain_repository_with(snapshots: ScriptedSnapshotCache) -> PlainHarness {
    let store: SharedStore = Arc::new(CountingStore::new(MemoryDocumentStore::new()));
    let listener = Arc::new(RecordingListener::new());
    let snapshots = Arc::new(snapshots);
    let repo = ProvenanceRepository::new(
        Arc::clone(&store),
        PlainFactory,
        Arc::clone(&snapshots),
        Arc::clone(&listener),
    );
    PlainHarness {
        repo,
        store,
        listener,
        snapshots,
    }
}

/// Deterministic timestamp `minutes` after a fixed epoch.
pub fn added_at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
        + chrono::Duration::minutes(minutes)
}

/// Typical provenance for a file at `location`, added `minutes` after the
/// fixture epoch.
pub fn sample_record(location: &str, minutes: i64) -> Provenance {
    Provenance::new()
        .with(fields::LOCATION, location)
        .with(fields::ID, format!("id-{}", location.trim_start_matches('/')))
        .with(fields::SUBJECT, "Jane Doe")
        .with(fields::SIZE, 1024)
        .with(fields::DURATION, Duration::from_millis(12_500))
        .with(fields::APPROVAL, approval::PENDING)
        .with(fields::ADDED, added_at(minutes))
}

/// Insert documents directly into a store, bypassing the repository.
pub fn seed_store<S, I>(store: &S, documents: I) -> Result<()>
where
    S: DocumentStore,
    I: IntoIterator<Item = provenance_db::Document>,
{
    for (idx, document) in documents.into_iter().enumerate() {
        store
            .insert_one(document)
            .with_context(|| format!("Failed to seed document #{}", idx))?;
    }
    Ok(())
}

/// Install a test-writer tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("provenance_db=debug")),
        )
        .with_test_writer()
        .try_init();
}
