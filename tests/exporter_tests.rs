// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use pocketbook::cli;
use pocketbook::commands::exporter::{self, json_export, write_csv};
use pocketbook::db;
use pocketbook::models::{Transaction, TxType, default_categories};
use pocketbook::store::Store;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn sample() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: "Salary".to_string(),
            amount: Decimal::from(100),
            r#type: TxType::Income,
            category_id: None,
        },
        Transaction {
            id: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            description: "Bread, milk".to_string(),
            amount: "12.5".parse().unwrap(),
            r#type: TxType::Expense,
            category_id: Some(1),
        },
    ]
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["pocketbook", "export"];
    argv.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(argv);
    m.subcommand_matches("export").unwrap().clone()
}

#[test]
fn csv_has_header_and_one_row_per_transaction() {
    let mut buf = Vec::new();
    write_csv(&mut buf, &sample(), &default_categories()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Data,Descrição,Tipo,Categoria,Valor");
    assert_eq!(lines[1], "05/01/2024,Salary,Receita,Sem categoria,100.00");
    // commas inside a field are quoted rather than splitting the row
    assert_eq!(lines[2], "06/01/2024,\"Bread, milk\",Despesa,Alimentação,12.50");
}

#[test]
fn csv_of_nothing_is_just_the_header() {
    let mut buf = Vec::new();
    write_csv(&mut buf, &[], &[]).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap().trim_end(), "Data,Descrição,Tipo,Categoria,Valor");
}

#[test]
fn json_export_carries_stats() {
    let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
    let doc = json_export(&sample(), &default_categories(), at);
    assert_eq!(doc["exportDate"], at.to_rfc3339());
    assert_eq!(doc["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(doc["categories"].as_array().unwrap().len(), 6);
    assert_eq!(doc["stats"]["totalTransactions"], 2);
    assert_eq!(doc["stats"]["totalIncome"], "100");
    assert_eq!(doc["stats"]["totalExpenses"], "12.5");
    assert_eq!(doc["transactions"][1]["categoryId"], 1);
}

#[test]
fn unknown_format_writes_nothing() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.xml");
    let m = export_matches(&["--format", "xml", "--out", out.to_str().unwrap()]);
    assert!(exporter::handle(&conn, &m).is_err());
    assert!(!out.exists());
}

#[test]
fn json_file_export_reads_back() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    for t in sample() {
        store.insert(&conn, t).unwrap();
    }
    let dir = tempdir().unwrap();
    let out = dir.path().join("financas.json");
    let m = export_matches(&["-f", "json", "-o", out.to_str().unwrap()]);
    exporter::handle(&conn, &m).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["stats"]["totalTransactions"], 2);
    let back: Vec<Transaction> = serde_json::from_value(doc["transactions"].clone()).unwrap();
    assert_eq!(back, sample());
}
