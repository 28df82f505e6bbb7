// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::commands::recurring::{new_template, toggle};
use pocketbook::commands::tags::new_tag;
use pocketbook::db::{self, load_blob};
use pocketbook::models::{
    Frequency, RecurringTemplate, Transaction, TxType, UNCATEGORIZED, default_categories,
};
use pocketbook::store::{AppState, AssumeNo, AssumeYes, Store, load_categories, load_tags};
use pocketbook::utils::category_name;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn expense(id: i64, category_id: Option<i64>) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        description: "Groceries".to_string(),
        amount: Decimal::from(40),
        r#type: TxType::Expense,
        category_id,
    }
}

#[test]
fn categories_seeded_once_and_persisted() {
    let conn = setup();
    assert!(load_blob(&conn, "categories").unwrap().is_none());
    let cats = load_categories(&conn).unwrap();
    assert_eq!(cats.len(), default_categories().len());
    assert!(load_blob(&conn, "categories").unwrap().is_some());

    // an emptied list stays empty instead of being re-seeded
    let mut cats = cats;
    let ids: Vec<i64> = cats.items().iter().map(|c| c.id).collect();
    for id in ids {
        cats.remove(&conn, id, &AssumeYes).unwrap();
    }
    assert!(load_categories(&conn).unwrap().is_empty());
}

#[test]
fn every_mutation_is_saved() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    store.insert(&conn, expense(1, Some(1))).unwrap();
    assert_eq!(Store::<Transaction>::load(&conn).unwrap().len(), 1);

    let mut edited = expense(1, Some(2));
    edited.amount = Decimal::from(55);
    store.replace(&conn, edited.clone()).unwrap();
    let reloaded: Store<Transaction> = Store::load(&conn).unwrap();
    assert_eq!(reloaded.get(1), Some(&edited));
}

#[test]
fn declined_delete_changes_nothing() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    store.insert(&conn, expense(1, None)).unwrap();

    assert!(store.remove(&conn, 1, &AssumeNo).unwrap().is_none());
    assert_eq!(Store::<Transaction>::load(&conn).unwrap().len(), 1);

    assert!(store.remove(&conn, 1, &AssumeYes).unwrap().is_some());
    assert!(Store::<Transaction>::load(&conn).unwrap().is_empty());
}

#[test]
fn removing_unknown_id_is_an_error() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    assert!(store.remove(&conn, 99, &AssumeYes).is_err());
}

#[test]
fn failed_modify_leaves_record_untouched() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    store.insert(&conn, expense(1, None)).unwrap();
    let res: anyhow::Result<()> = store.modify(&conn, 1, |t| {
        t.amount = Decimal::from(1);
        anyhow::bail!("rejected")
    });
    assert!(res.is_err());
    assert_eq!(store.get(1).unwrap().amount, Decimal::from(40));
}

#[test]
fn deleting_category_leaves_dangling_reference() {
    let conn = setup();
    let mut cats = load_categories(&conn).unwrap();
    let cat_id = cats.items()[0].id;
    let mut txs: Store<Transaction> = Store::load(&conn).unwrap();
    txs.insert(&conn, expense(1, Some(cat_id))).unwrap();

    cats.remove(&conn, cat_id, &AssumeYes).unwrap();

    let state = AppState::load(&conn).unwrap();
    let t = state.transactions.get(1).unwrap();
    assert_eq!(t.category_id, Some(cat_id));
    assert_eq!(
        category_name(state.categories.items(), t.category_id),
        UNCATEGORIZED
    );
}

#[test]
fn next_id_moves_past_existing_ids() {
    let conn = setup();
    let mut store: Store<Transaction> = Store::load(&conn).unwrap();
    store.insert(&conn, expense(i64::MAX / 2, None)).unwrap();
    assert!(store.next_id() > i64::MAX / 2);
}

#[test]
fn recurring_templates_toggle_and_drop_income_category() {
    let conn = setup();
    let cats = load_categories(&conn).unwrap();
    let mut store: Store<RecurringTemplate> = Store::load(&conn).unwrap();

    let salary = new_template(
        store.next_id(),
        "Salary",
        Decimal::from(1500),
        TxType::Income,
        Frequency::Monthly,
        25,
        Some(&cats.items()[0]),
    )
    .unwrap();
    assert_eq!(salary.category_id, None);
    assert!(salary.active);
    let id = store.insert(&conn, salary).unwrap().id;

    assert!(!toggle(&conn, &mut store, id).unwrap());
    assert!(toggle(&conn, &mut store, id).unwrap());

    assert!(
        new_template(1, "Rent", Decimal::from(700), TxType::Expense, Frequency::Monthly, 32, None)
            .is_err()
    );
    // templates never show up as transactions
    assert!(Store::<Transaction>::load(&conn).unwrap().is_empty());
}

#[test]
fn tags_seed_and_rotate_palette() {
    let conn = setup();
    let mut tags = load_tags(&conn).unwrap();
    assert_eq!(tags.len(), 3);
    let t = new_tag(&tags, "Viagens", None).unwrap();
    assert_eq!(t.color, "#D4A574");
    tags.insert(&conn, t).unwrap();
    assert_eq!(load_tags(&conn).unwrap().len(), 4);
}
