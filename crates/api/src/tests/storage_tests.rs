// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fotoexpres::{ArchiveManifest, StagedUploads, build_manifest};
use fotoexpres_domain::{OrderNumber, PhotoSpec};
use tempfile::TempDir;
use time::{Duration, OffsetDateTime};

use crate::error::ApiError;
use crate::storage::{ORDERS_DIR_NAME, OrderStorage, PendingArchive, ZIPS_DIR_NAME};

fn create_test_storage() -> (OrderStorage, TempDir) {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let storage: OrderStorage = OrderStorage::open(dir.path()).unwrap();
    (storage, dir)
}

fn order_number() -> OrderNumber {
    OrderNumber::parse("ORD-314159").unwrap()
}

#[test]
fn test_reserve_claims_number_once() {
    let (storage, _dir) = create_test_storage();

    assert!(storage.reserve(&order_number()).unwrap());
    assert!(!storage.reserve(&order_number()).unwrap());
    assert!(storage.staging(&order_number()).root().is_dir());
}

#[test]
fn test_stage_file_rejects_path_traversal() {
    let (storage, dir) = create_test_storage();

    let result: Result<(), ApiError> = storage.stage_file(&order_number(), "../x.jpg", b"x");

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert!(!dir.path().join("orders").join("x.jpg").exists());
}

#[test]
fn test_staged_file_is_visible_to_archive_builder() {
    let (storage, _dir) = create_test_storage();

    storage
        .stage_file(&order_number(), "more.jpg", b"more-bytes")
        .unwrap();

    assert!(storage.staging(&order_number()).contains("more.jpg"));
    assert!(!storage.staging(&order_number()).contains("other.jpg"));
}

#[test]
fn test_published_archive_lands_at_public_path() {
    let (storage, _dir) = create_test_storage();
    storage
        .stage_file(&order_number(), "more.jpg", b"more-bytes")
        .unwrap();
    let manifest: ArchiveManifest = build_manifest(
        &[PhotoSpec::new("more.jpg", "13x18", "mat", 1)],
        String::from("recap"),
    );

    let pending: PendingArchive = storage.build_archive(&order_number(), &manifest).unwrap();
    assert!(!storage.archive_path(&order_number()).exists());

    let file_name: String = pending.publish().unwrap();

    assert_eq!(file_name, "order-ORD-314159.zip");
    assert!(storage.archive_path(&order_number()).is_file());
    assert!(!storage.read_archive(&order_number()).unwrap().is_empty());
}

#[test]
fn test_failed_build_leaves_nothing_behind() {
    let (storage, dir) = create_test_storage();
    storage.reserve(&order_number()).unwrap();
    let manifest: ArchiveManifest = build_manifest(
        &[PhotoSpec::new("absent.jpg", "13x18", "mat", 1)],
        String::from("recap"),
    );

    let result: Result<PendingArchive, ApiError> = storage.build_archive(&order_number(), &manifest);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert_eq!(
        std::fs::read_dir(dir.path().join(ZIPS_DIR_NAME))
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn test_missing_archive_is_not_found() {
    let (storage, _dir) = create_test_storage();
    assert!(matches!(
        storage.read_archive(&order_number()),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_discard_removes_everything_and_tolerates_absence() {
    let (storage, _dir) = create_test_storage();
    storage
        .stage_file(&order_number(), "more.jpg", b"more-bytes")
        .unwrap();

    storage.discard(&order_number());
    storage.discard(&order_number());

    assert!(!storage.staging(&order_number()).root().exists());
    assert!(storage.remove_archive(&order_number()).is_ok());
}

#[test]
fn test_unpublished_archive_is_removed_when_dropped() {
    let (storage, dir) = create_test_storage();
    storage
        .stage_file(&order_number(), "more.jpg", b"more-bytes")
        .unwrap();
    let manifest: ArchiveManifest = build_manifest(
        &[PhotoSpec::new("more.jpg", "13x18", "mat", 1)],
        String::from("recap"),
    );

    let pending: PendingArchive = storage.build_archive(&order_number(), &manifest).unwrap();
    drop(pending);

    assert_eq!(
        std::fs::read_dir(dir.path().join(ZIPS_DIR_NAME))
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn test_idle_staging_lists_only_untouched_orders() {
    let (storage, dir) = create_test_storage();
    storage
        .stage_file(&order_number(), "more.jpg", b"more-bytes")
        .unwrap();
    std::fs::create_dir(dir.path().join(ORDERS_DIR_NAME).join("not-an-order")).unwrap();

    let future: OffsetDateTime = OffsetDateTime::now_utc() + Duration::minutes(1);
    let past: OffsetDateTime = OffsetDateTime::now_utc() - Duration::hours(1);

    assert_eq!(storage.idle_staging(future).unwrap(), vec![order_number()]);
    assert!(storage.idle_staging(past).unwrap().is_empty());
    assert!(!storage.is_staging_idle(&OrderNumber::parse("ORD-271828").unwrap(), future));
}
