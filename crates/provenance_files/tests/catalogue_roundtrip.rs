use std::sync::{Arc, Barrier};
use std::thread;

use provenance_db::{
    approval, fields, MemoryDocumentStore, ProvenanceFile, ProvenanceRepository, RepositoryError,
    StoreError, UnknownItem, Value,
};
use provenance_files::{FileFactory, FileKind, ImageFile, MemorySnapshotCache, TracingListener};
use provenance_test_utils::{init_test_tracing, RecordingListener};

type Catalogue = ProvenanceRepository<MemoryDocumentStore, FileFactory>;

fn catalogue(cache: Arc<MemorySnapshotCache>) -> Catalogue {
    ProvenanceRepository::new(
        MemoryDocumentStore::new(),
        FileFactory::new(),
        cache,
        Arc::new(TracingListener),
    )
}

fn dicom(location: &str, series: &str) -> ImageFile {
    let mut file = FileFactory::new().locate(location).unwrap();
    file.set(fields::SERIES_UID, series);
    file
}

#[test]
fn test_new_file_roundtrips_through_catalogue() {
    init_test_tracing();
    let repo = catalogue(Arc::new(MemorySnapshotCache::new()));

    let mut file = FileFactory::new().locate("scanner:/data/s01/t1.nii.gz").unwrap();
    file.set(fields::SUBJECT, "Jane Doe");
    file.set(fields::SIZE, 4_096);
    file.set(fields::APPROVAL, approval::PENDING);
    repo.add(&file).unwrap();

    let back = repo
        .by_location("scanner:/data/s01/t1.nii.gz")
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(back, file);
    assert_eq!(back.kind(), FileKind::Nifti);
    assert_eq!(back.as_location().hostname(), Some("scanner"));

    let by_id = repo
        .by_id(file.id().unwrap().as_str())
        .unwrap()
        .into_option()
        .unwrap();
    assert_eq!(by_id.location(), "scanner:/data/s01/t1.nii.gz");
}

#[test]
fn test_dicom_series_lookup() {
    let repo = catalogue(Arc::new(MemorySnapshotCache::new()));
    repo.add(&dicom("/d/s01/IM0001.dcm", "1.2.840.113619")).unwrap();

    let sibling = dicom("/d/s01/IM0002.dcm", "1.2.840.113619");
    assert!(repo.knows_series(&sibling).unwrap());
    let first = repo.get_series(&sibling).unwrap().into_option().unwrap();
    assert_eq!(first.location(), "/d/s01/IM0001.dcm");

    // Only DICOM files carry a series, whatever their provenance says.
    let mut nifti = FileFactory::new().locate("/d/s01/t1.nii").unwrap();
    nifti.set(fields::SERIES_UID, "1.2.840.113619");
    assert!(!repo.knows_series(&nifti).unwrap());
    assert_eq!(
        repo.get_series(&nifti).unwrap().unknown(),
        Some(&UnknownItem::NoSeries)
    );
}

#[test]
fn test_snapshot_survives_store_roundtrip() {
    let writer_cache = Arc::new(MemorySnapshotCache::new());
    writer_cache.insert("/d/s01/t1.nii", b"\x89PNG".to_vec());

    let store = Arc::new(MemoryDocumentStore::new());
    let writer = ProvenanceRepository::new(
        Arc::clone(&store),
        FileFactory::new(),
        Arc::clone(&writer_cache),
        Arc::new(TracingListener),
    );
    writer
        .add(&FileFactory::new().locate("/d/s01/t1.nii").unwrap())
        .unwrap();

    let persisted = store.snapshot().unwrap();
    assert_eq!(
        persisted[0].get(fields::SNAPSHOT_DATA),
        Some(&Value::binary(b"\x89PNG".to_vec()))
    );

    // A second process with a cold cache picks the snapshot up on read.
    let reader_cache = Arc::new(MemorySnapshotCache::new());
    let reader = ProvenanceRepository::new(
        Arc::clone(&store),
        FileFactory::new(),
        Arc::clone(&reader_cache),
        Arc::new(TracingListener),
    );
    let file = reader.by_location("/d/s01/t1.nii").unwrap().into_option().unwrap();
    assert!(!file.provenance().contains_key(fields::SNAPSHOT_DATA));
    assert_eq!(reader_cache.get("/d/s01/t1.nii"), Some(b"\x89PNG".to_vec()));
}

#[test]
fn test_update_matches_non_canonical_stored_location() {
    let store = Arc::new(MemoryDocumentStore::new());
    let repo = ProvenanceRepository::new(
        Arc::clone(&store),
        FileFactory::new(),
        Arc::new(MemorySnapshotCache::new()),
        Arc::new(TracingListener),
    );
    provenance_test_utils::seed_store(
        store.as_ref(),
        [
            provenance_db::Document::new()
                .with(fields::LOCATION, "/d/t1.nii ")
                .with(fields::SUBJECT, "a"),
            provenance_db::Document::new()
                .with(fields::LOCATION, ":/d/t2.nii")
                .with(fields::SUBJECT, "a"),
        ],
    )
    .unwrap();

    for mut file in repo.by_subject("a").unwrap() {
        file.set(fields::SUBJECT, "b");
        repo.update(&file).unwrap();
        repo.update_approval(&file.location(), approval::GRANTED)
            .unwrap();
    }

    let stored = store.snapshot().unwrap();
    assert_eq!(stored.len(), 2);
    for doc in &stored {
        assert_eq!(doc.get_str(fields::SUBJECT), Some("b"));
        assert_eq!(doc.get_str(fields::APPROVAL), Some(approval::GRANTED));
    }
    assert_eq!(stored[0].get_str(fields::LOCATION), Some("/d/t1.nii "));
    assert_eq!(stored[1].get_str(fields::LOCATION), Some(":/d/t2.nii"));
}

#[test]
fn test_stored_record_without_location_fails_factory() {
    let store = Arc::new(MemoryDocumentStore::new());
    let listener = Arc::new(RecordingListener::new());
    let repo = ProvenanceRepository::new(
        Arc::clone(&store),
        FileFactory::new(),
        Arc::new(MemorySnapshotCache::new()),
        Arc::clone(&listener),
    );
    provenance_test_utils::seed_store(
        store.as_ref(),
        [provenance_db::Document::new().with(fields::SUBJECT, "Jane Doe")],
    )
    .unwrap();

    let err = repo.by_subject("Jane Doe").unwrap_err();
    assert!(matches!(err, RepositoryError::Factory(_)));
    assert_eq!(listener.count(), 0);
}

#[test]
fn test_concurrent_adds_of_same_location_conflict_once() {
    let repo = Arc::new(catalogue(Arc::new(MemorySnapshotCache::new())));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let repo = Arc::clone(&repo);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let file = FileFactory::new().locate("/d/race.fif").unwrap();
                barrier.wait();
                repo.add(&file)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(RepositoryError::Store(StoreError::Conflict { .. }))))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 3);
    assert_eq!(repo.all().unwrap().len(), 1);
}

#[test]
fn test_concurrent_readers_and_approval_writer() {
    let repo = Arc::new(catalogue(Arc::new(MemorySnapshotCache::new())));
    for n in 0..8 {
        let mut file = FileFactory::new()
            .locate(&format!("/d/eeg/run{}.cnt", n))
            .unwrap();
        file.set(fields::APPROVAL, approval::PENDING);
        repo.add(&file).unwrap();
    }

    let writer = {
        let repo = Arc::clone(&repo);
        thread::spawn(move || {
            for n in 0..8 {
                repo.update_approval(&format!("/d/eeg/run{}.cnt", n), approval::GRANTED)
                    .unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..3)
        .map(|_| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for _ in 0..20 {
                    let pending = repo.by_approval(approval::PENDING).unwrap().len();
                    let granted = repo.by_approval(approval::GRANTED).unwrap().len();
                    assert!(pending + granted <= 8);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let granted = repo.by_approval(approval::GRANTED).unwrap();
    assert_eq!(granted.len(), 8);
    assert!(granted.iter().all(|f| f.kind() == FileKind::EegCnt));
    assert_eq!(repo.statistics().unwrap().count, 8);
}
