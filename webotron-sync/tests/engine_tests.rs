//! Sync engine behaviour against an in-memory object store.

mod common;

use std::fs;
use std::sync::Arc;

use common::{bucket, MemoryStore};
use tempfile::TempDir;
use webotron_core::{Manifest, ObjectKey};
use webotron_sync::{
    walk_files, CancellationToken, FileOutcome, SyncEngine, SyncError, SyncOptions,
};

const CHUNK: u64 = 16;

fn options() -> SyncOptions {
    SyncOptions {
        chunk_size: CHUNK,
        concurrency: 4,
        dry_run: false,
    }
}

fn engine(store: &Arc<MemoryStore>, options: SyncOptions) -> SyncEngine {
    SyncEngine::new(store.clone(), options)
}

fn site() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    fs::create_dir_all(root.join("css")).unwrap();
    fs::write(root.join("index.html"), "<html>home</html>").unwrap();
    fs::write(root.join("css").join("app.css"), "body { color: red }").unwrap();
    fs::write(root.join("big.bin"), vec![42u8; (CHUNK * 3 + 5) as usize]).unwrap();
    tmp
}

#[tokio::test]
async fn first_run_uploads_everything_with_content_types() {
    let dir = site();
    let store = Arc::new(MemoryStore::new(CHUNK));

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .expect("sync");

    assert_eq!(report.counts(), (3, 0));
    assert!(report.is_success());
    assert_eq!(store.get("index.html").unwrap().content_type, "text/html");
    assert_eq!(store.get("css/app.css").unwrap().content_type, "text/css");
    assert_eq!(
        store.get("big.bin").unwrap().content_type,
        "application/octet-stream"
    );
}

#[tokio::test]
async fn second_run_on_unchanged_tree_skips_everything() {
    let dir = site();
    let store = Arc::new(MemoryStore::new(CHUNK));
    let engine = engine(&store, options());
    let cancel = CancellationToken::new();

    engine.run(dir.path(), &bucket(), &cancel).await.expect("first");
    let uploads_after_first = store.uploads();
    let second = engine.run(dir.path(), &bucket(), &cancel).await.expect("second");

    assert_eq!(second.counts(), (0, 3));
    assert_eq!(store.uploads(), uploads_after_first);
    assert_eq!(store.list_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[tokio::test]
async fn manifest_spans_every_listing_page() {
    let dir = TempDir::new().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("page-{i}.txt")), format!("body {i}")).unwrap();
    }
    let mut store = MemoryStore::new(CHUNK);
    store.page_size = 2;
    let store = Arc::new(store);
    let engine = engine(&store, options());
    let cancel = CancellationToken::new();

    engine.run(dir.path(), &bucket(), &cancel).await.unwrap();
    store.list_pages.store(0, std::sync::atomic::Ordering::SeqCst);
    let second = engine.run(dir.path(), &bucket(), &cancel).await.unwrap();

    assert_eq!(store.list_pages.load(std::sync::atomic::Ordering::SeqCst), 3);
    assert_eq!(second.counts(), (0, 5));
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_symlink_does_not_stop_the_sync() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<html>home</html>").unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("stale-link.txt"))
        .unwrap();
    let store = Arc::new(MemoryStore::new(CHUNK));

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .expect("dangling links are skipped");

    assert_eq!(report.counts(), (1, 0));
    assert!(store.get("stale-link.txt").is_none());
}

#[tokio::test]
async fn changed_and_new_files_are_uploaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "new content").unwrap();
    fs::write(dir.path().join("b.txt"), "brand new").unwrap();

    let store = Arc::new(MemoryStore::new(CHUNK));
    store.put("a.txt", b"old content");

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.counts(), (2, 0));
    assert_eq!(store.get("a.txt").unwrap().body, b"new content");
    assert!(store.get("b.txt").is_some());
}

#[tokio::test]
async fn empty_files_are_always_uploaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    let store = Arc::new(MemoryStore::new(CHUNK));
    let engine = engine(&store, options());
    let cancel = CancellationToken::new();

    engine.run(dir.path(), &bucket(), &cancel).await.unwrap();
    let second = engine.run(dir.path(), &bucket(), &cancel).await.unwrap();
    assert_eq!(second.counts(), (1, 0));
}

#[tokio::test]
async fn remote_only_objects_are_left_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("kept.txt"), "local").unwrap();
    let store = Arc::new(MemoryStore::new(CHUNK));
    store.put("deleted-locally.txt", b"remote");

    engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(store.get("deleted-locally.txt").is_some());
}

#[tokio::test]
async fn mismatched_chunk_size_uploads_instead_of_skipping() {
    let dir = TempDir::new().unwrap();
    let body = vec![9u8; 100];
    fs::write(dir.path().join("data.bin"), &body).unwrap();

    let store = Arc::new(MemoryStore::new(32));
    store.put("data.bin", &body);

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.counts(), (1, 0));
}

#[tokio::test]
async fn one_failed_upload_does_not_stop_the_rest() {
    let dir = site();
    let mut store = MemoryStore::new(CHUNK);
    store.fail_keys.insert("css/app.css".to_string());
    let store = Arc::new(store);

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .expect("failures are per-file, not fatal");

    assert_eq!(report.counts(), (2, 0));
    assert!(!report.is_success());
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.as_str(), "css/app.css");
    assert!(failures[0].1.contains("simulated failure"));
    assert!(store.get("index.html").is_some());
}

#[tokio::test]
async fn dry_run_uploads_nothing() {
    let dir = site();
    let store = Arc::new(MemoryStore::new(CHUNK));
    store.put("index.html", b"<html>home</html>");

    let report = engine(
        &store,
        SyncOptions {
            dry_run: true,
            ..options()
        },
    )
    .run(dir.path(), &bucket(), &CancellationToken::new())
    .await
    .unwrap();

    assert_eq!(report.counts(), (0, 1));
    assert_eq!(report.would_upload_count(), 2);
    assert_eq!(store.uploads(), 0);
}

#[tokio::test]
async fn cancelled_before_start_uploads_nothing() {
    let dir = site();
    let store = Arc::new(MemoryStore::new(CHUNK));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = engine(&store, options())
        .run(dir.path(), &bucket(), &cancel)
        .await
        .unwrap();

    assert_eq!(report.cancelled_count(), 3);
    assert_eq!(store.uploads(), 0);
    assert!(!report.is_success());
}

#[tokio::test]
async fn missing_root_fails_before_listing() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new(CHUNK));

    let err = engine(&store, options())
        .run(&tmp.path().join("missing"), &bucket(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Path { .. }), "got {err}");
    assert_eq!(store.list_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let dir = site();
    let mut store = MemoryStore::new(CHUNK);
    store.fail_listing = true;
    let store = Arc::new(store);

    let err = engine(&store, options())
        .run(dir.path(), &bucket(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Store(_)), "got {err}");
    assert_eq!(store.uploads(), 0);
}

#[tokio::test]
async fn outcomes_do_not_depend_on_concurrency() {
    let dir = site();
    let root = dir.path().canonicalize().unwrap();
    let files = walk_files(&root).unwrap();

    let mut manifest = Manifest::new();
    manifest.insert("css/app.css".to_string(), "\"stale\"".to_string());

    let mut results = Vec::new();
    for concurrency in [1, 2, 8] {
        let store = Arc::new(MemoryStore::new(CHUNK));
        let outcomes = engine(
            &store,
            SyncOptions {
                concurrency,
                ..options()
            },
        )
        .process_files(
            files.clone(),
            &bucket(),
            Arc::new(manifest.clone()),
            &CancellationToken::new(),
        )
        .await;
        results.push(outcomes);
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
    assert_eq!(
        results[0][0],
        FileOutcome::Uploaded {
            key: ObjectKey::from("big.bin")
        }
    );
}
