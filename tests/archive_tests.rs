// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerbook::archive::trashed_archives;
use ledgerbook::layout::StoreLayout;
use ledgerbook::models::{Currency, TransactionInput, TxType};
use ledgerbook::rates::RateTable;
use ledgerbook::router::{StoreHandle, resolve_read_target};
use ledgerbook::service::LedgerService;
use ledgerbook::years::list_years;
use std::fs;
use std::time::Duration;
use tempfile::{TempDir, tempdir};

fn setup() -> (TempDir, LedgerService) {
    let dir = tempdir().unwrap();
    let layout = StoreLayout::new(dir.path(), "ACME", "archive");
    let service =
        LedgerService::open(layout, RateTable::default(), Duration::from_secs(10)).unwrap();
    (dir, service)
}

fn sale(description: &str) -> TransactionInput {
    TransactionInput {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        r#type: TxType::Income,
        category: "Sales".into(),
        document_owner: String::new(),
        description: description.into(),
        amount: "12.50".parse().unwrap(),
        currency: Currency::USD,
        invoice_no: String::new(),
    }
}

#[test]
fn archiving_twice_replaces_the_previous_copy() {
    let (_dir, service) = setup();
    service.create(&sale("first")).unwrap();
    let first = service.backup(Some("2024")).unwrap();
    assert_eq!(first.name, "2024 ACME");
    assert!(first.trashed.is_none());

    service.create(&sale("second")).unwrap();
    let second = service.backup(Some("2024")).unwrap();
    assert!(second.trashed.is_some());

    let year_dir = service.layout().year_dir("2024");
    let names: Vec<String> = fs::read_dir(&year_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["2024 ACME".to_string()]);

    // contents reflect the second call
    let archived = service.read(Some("2024")).unwrap();
    assert_eq!(archived.len(), 2);
    assert_eq!(archived[0].description, "second");

    assert_eq!(trashed_archives(service.layout()).unwrap().len(), 1);
}

#[test]
fn archive_is_frozen_while_live_store_moves_on() {
    let (_dir, service) = setup();
    service.create(&sale("kept")).unwrap();
    service.backup(Some("2023")).unwrap();
    service.create(&sale("later")).unwrap();

    assert_eq!(service.read(Some("2023")).unwrap().len(), 1);
    assert_eq!(service.read(None).unwrap().len(), 2);
}

#[test]
fn reading_a_year_without_archive_falls_back_to_live() {
    let (_dir, service) = setup();
    service.create(&sale("live only")).unwrap();
    let rows = service.read(Some("1999")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "live only");
}

#[test]
fn router_decision_table() {
    let (_dir, service) = setup();
    let layout = service.layout();
    let live = StoreHandle::Live(layout.live_path());

    assert_eq!(resolve_read_target(layout, None), live);
    assert_eq!(resolve_read_target(layout, Some("20245")), live);
    assert_eq!(resolve_read_target(layout, Some("2024")), live);

    // year container without the archive file
    fs::create_dir_all(layout.year_dir("2022")).unwrap();
    assert_eq!(resolve_read_target(layout, Some("2022")), live);

    service.backup(Some("2024")).unwrap();
    assert_eq!(
        resolve_read_target(layout, Some("2024")),
        StoreHandle::Archive {
            year: "2024".into(),
            path: layout.archive_path("2024"),
        }
    );
}

#[test]
fn backup_requires_a_valid_year() {
    let (_dir, service) = setup();
    let err = service.backup(None).unwrap_err();
    assert_eq!(err.to_string(), "Year is required");
    let err = service.backup(Some("20x5")).unwrap_err();
    assert!(err.to_string().contains("Invalid year"));
    assert!(!service.layout().year_dir("20x5").exists());

    let reply = service.handle_json(r#"{"action":"backup"}"#);
    assert!(!reply.is_success());
    assert_eq!(reply.message.as_deref(), Some("Year is required"));
}

#[test]
fn backup_accepts_numeric_year_in_body() {
    let (_dir, service) = setup();
    let reply = service.handle_json(r#"{"action":"backup","year":2021}"#);
    assert!(reply.is_success());
    assert_eq!(reply.message.as_deref(), Some("Backup created: 2021 ACME"));
    assert_eq!(service.years(), vec!["2021".to_string()]);
}

#[test]
fn year_directory_sorts_numerically_and_skips_other_names() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("archive");
    for name in ["2019", "2024", "0999", "2021", "20x5", "Archive", "12345", ".trash"] {
        fs::create_dir_all(root.join(name)).unwrap();
    }
    fs::write(root.join("2022"), b"not a folder").unwrap();

    assert_eq!(list_years(&root), vec!["2024", "2021", "2019", "0999"]);
}

#[test]
fn year_directory_is_empty_when_root_is_missing() {
    let dir = tempdir().unwrap();
    assert!(list_years(&dir.path().join("nowhere")).is_empty());
}

#[test]
fn unreadable_archive_falls_back_to_live() {
    let (_dir, service) = setup();
    service.create(&sale("live row")).unwrap();
    let layout = service.layout();
    fs::create_dir_all(layout.year_dir("2024")).unwrap();
    fs::write(layout.archive_path("2024"), vec![0xA5u8; 4096]).unwrap();

    // the router still picks the archive, the read recovers
    let target = resolve_read_target(layout, Some("2024"));
    assert!(!target.is_live());
    assert_eq!(target.path(), &layout.archive_path("2024"));

    let rows = service.read(Some("2024")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "live row");
}

#[test]
fn year_container_that_is_not_a_folder_reads_live() {
    let (_dir, service) = setup();
    service.create(&sale("live row")).unwrap();
    let layout = service.layout();
    fs::create_dir_all(layout.archive_root()).unwrap();
    fs::write(layout.year_dir("2024"), b"stray file").unwrap();

    let target = resolve_read_target(layout, Some("2024"));
    assert!(target.is_live());
    assert_eq!(target.path(), &layout.live_path());

    let rows = service.read(Some("2024")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "live row");
}
