// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerbook::client::{HttpTransport, SyncClient, Transport};
use ledgerbook::layout::StoreLayout;
use ledgerbook::models::Currency;
use ledgerbook::rates::RateTable;
use ledgerbook::server::LedgerServer;
use ledgerbook::service::LedgerService;
use serde_json::{Value, json};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

fn start() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let service = Arc::new(
        LedgerService::open(
            StoreLayout::new(dir.path(), "ACME", "archive"),
            RateTable::default(),
            Duration::from_secs(10),
        )
        .unwrap(),
    );
    let server = LedgerServer::bind("127.0.0.1:0", service).unwrap();
    let addr = server.local_addr().unwrap();
    server.spawn();
    (dir, format!("http://{}/", addr))
}

fn wait_for(cond: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn http_round_trip_with_archive_routing() {
    let (_dir, endpoint) = start();
    let transport = HttpTransport::new(endpoint.clone(), None).unwrap();
    let client = SyncClient::new(transport, Duration::from_millis(50));

    client.select_year("2024").unwrap();
    assert!(client.transactions().is_empty());
    assert!(client.load_years().unwrap().is_empty());

    let body = json!({
        "action": "create",
        "date": "2024-11-05",
        "type": "expense",
        "category": "Advertising",
        "description": "Google Ads",
        "amount": "100",
        "currency": "CAD",
        "year": "2024"
    });
    let raw = reqwest::blocking::Client::new()
        .post(&endpoint)
        .body(body.to_string())
        .send()
        .unwrap();
    let reply: Value = raw.json().unwrap();
    assert_eq!(reply["result"], "success");
    let id = reply["id"].as_str().unwrap().to_string();

    client.refresh().unwrap();
    let rows = client.transactions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].currency, Currency::CAD);
    assert_eq!(rows[0].usd_value.to_string(), "75.00");

    client.backup("2024").unwrap();
    assert_eq!(client.load_years().unwrap(), vec!["2024"]);

    // archive is frozen, live store keeps changing
    client.delete(&[id]).unwrap();
    assert!(wait_for(|| {
        HttpTransport::new(endpoint.clone(), None)
            .unwrap()
            .fetch_transactions("2030")
            .map(|v| v.as_array().map(|a| a.is_empty()).unwrap_or(false))
            .unwrap_or(false)
    }));
    client.select_year("2024").unwrap();
    assert_eq!(client.transactions().len(), 1);
}

#[test]
fn transactions_use_header_names_on_the_wire() {
    let (_dir, endpoint) = start();
    let http = reqwest::blocking::Client::new();
    http.post(&endpoint)
        .body(
            json!({
                "date": "2025-01-02",
                "type": "income",
                "category": "Sales",
                "documentOwner": "Mehmet",
                "amount": 20,
                "currency": "GBP",
                "invoiceNo": "F-9"
            })
            .to_string(),
        )
        .send()
        .unwrap();

    let rows: Value = http
        .get(&endpoint)
        .query(&[("year", "2025")])
        .send()
        .unwrap()
        .json()
        .unwrap();
    let row = &rows[0];
    for key in [
        "ID",
        "Date",
        "Type",
        "Category",
        "Document Owner",
        "Description",
        "Amount",
        "Currency",
        "USD Value",
        "Invoice No",
        "Timestamp",
    ] {
        assert!(row.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(row["Document Owner"], "Mehmet");
    assert_eq!(row["USD Value"], "25.00");
}

#[test]
fn delete_reply_and_unsupported_methods() {
    let (_dir, endpoint) = start();
    let http = reqwest::blocking::Client::new();
    let reply: Value = http
        .post(&endpoint)
        .body(r#"{"action":"delete","ids":["nope"]}"#)
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(reply["result"], "success");
    assert_eq!(reply["missing"], json!(["nope"]));

    let resp = http.put(&endpoint).body("{}").send().unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    let reply: Value = resp.json().unwrap();
    assert_eq!(reply["result"], "error");
}
