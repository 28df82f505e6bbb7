// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use pocketbook::cli;
use pocketbook::commands::goals::{self, adjust_saved, new_goal};
use pocketbook::db;
use pocketbook::goals::{apply_delta, status};
use pocketbook::models::SavingsGoal;
use pocketbook::store::Store;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn goal(target: i64, saved: i64, deadline: &str) -> SavingsGoal {
    SavingsGoal {
        id: 1,
        name: "Holidays".to_string(),
        target: Decimal::from(target),
        deadline: NaiveDate::parse_from_str(deadline, "%Y-%m-%d").unwrap(),
        saved: Decimal::from(saved),
        created_at: Utc::now(),
    }
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

#[test]
fn deltas_accumulate_without_upper_clamp() {
    let mut g = goal(200, 0, "2030-01-01");
    assert!(!apply_delta(&mut g, Decimal::from(50)).just_completed());
    assert!(!apply_delta(&mut g, Decimal::from(50)).just_completed());
    let last = apply_delta(&mut g, Decimal::from(150));
    assert_eq!(g.saved, Decimal::from(250));
    assert!(last.just_completed());

    let st = status(&g, at("2029-01-01 12:00"));
    assert!(st.is_completed);
    assert_eq!(st.progress, Decimal::from(125));
    assert_eq!(st.bar_percent(), Decimal::from(100));
}

#[test]
fn saved_never_goes_below_zero() {
    let mut g = goal(200, 30, "2030-01-01");
    let tr = apply_delta(&mut g, Decimal::from(-1_000_000));
    assert_eq!(g.saved, Decimal::ZERO);
    assert!(!tr.now_completed);
}

#[test]
fn staying_complete_is_not_a_new_completion() {
    let mut g = goal(100, 120, "2030-01-01");
    let tr = apply_delta(&mut g, Decimal::from(10));
    assert!(tr.was_completed && tr.now_completed);
    assert!(!tr.just_completed());
}

#[test]
fn days_left_rounds_up() {
    let g = goal(100, 0, "2024-01-11");
    let st = status(&g, at("2024-01-10 15:00"));
    assert_eq!(st.days_left, 1);
    assert!(!st.is_overdue);

    let due_today = goal(100, 0, "2024-01-10");
    let st = status(&due_today, at("2024-01-10 15:00"));
    assert_eq!(st.days_left, 0);
    assert!(!st.is_overdue);

    let late = goal(100, 0, "2024-01-08");
    let st = status(&late, at("2024-01-10 15:00"));
    assert_eq!(st.days_left, -2);
    assert!(st.is_overdue);
    assert!(!st.is_completed);
}

#[test]
fn adjust_saved_persists() {
    let conn = setup();
    let mut store: Store<SavingsGoal> = Store::load(&conn).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let g = new_goal(
        &store,
        "Car",
        Decimal::from(200),
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        today,
    )
    .unwrap();
    let id = store.insert(&conn, g).unwrap().id;

    for delta in [50, 50, 150] {
        adjust_saved(&conn, &mut store, id, Decimal::from(delta)).unwrap();
    }
    let reloaded: Store<SavingsGoal> = Store::load(&conn).unwrap();
    assert_eq!(reloaded.get(id).unwrap().saved, Decimal::from(250));
}

#[test]
fn new_goal_validates_target_and_deadline() {
    let store: Store<SavingsGoal> = Store::load(&setup()).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let later = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
    let earlier = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    assert!(new_goal(&store, "Zero", Decimal::ZERO, later, today).is_err());
    assert!(new_goal(&store, "Past", Decimal::from(10), earlier, today).is_err());
    assert!(new_goal(&store, "  ", Decimal::from(10), later, today).is_err());

    let ok = new_goal(&store, "Trip", Decimal::from(10), later, today).unwrap();
    assert_eq!(ok.saved, Decimal::ZERO);
}

fn run_goal(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["pocketbook", "goal"];
    argv.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(argv);
    goals::handle(conn, m.subcommand_matches("goal").unwrap())
}

#[test]
fn edit_overwrites_only_given_fields() {
    let conn = setup();
    let mut store: Store<SavingsGoal> = Store::load(&conn).unwrap();
    store.insert(&conn, goal(500, 20, "2030-06-01")).unwrap();

    run_goal(&conn, &["edit", "1", "--name", "New car", "--saved", "80"]).unwrap();
    let g = Store::<SavingsGoal>::load(&conn).unwrap().get(1).unwrap().clone();
    assert_eq!(g.name, "New car");
    assert_eq!(g.saved, Decimal::from(80));
    assert_eq!(g.target, Decimal::from(500));
    assert_eq!(g.deadline, NaiveDate::from_ymd_opt(2030, 6, 1).unwrap());

    // invalid values leave the stored goal as it was
    assert!(run_goal(&conn, &["edit", "1", "--target", "0"]).is_err());
    assert!(run_goal(&conn, &["edit", "1", "--saved=-5"]).is_err());
    assert_eq!(Store::<SavingsGoal>::load(&conn).unwrap().get(1), Some(&g));
}

#[test]
fn deposit_command_accepts_negative_amounts() {
    let conn = setup();
    let mut store: Store<SavingsGoal> = Store::load(&conn).unwrap();
    store.insert(&conn, goal(500, 100, "2030-06-01")).unwrap();

    run_goal(&conn, &["deposit", "1", "-25"]).unwrap();
    let g = Store::<SavingsGoal>::load(&conn).unwrap().get(1).unwrap().clone();
    assert_eq!(g.saved, Decimal::from(75));
}
