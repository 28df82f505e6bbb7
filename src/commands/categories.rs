// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::confirmer;
use crate::models::{Category, CategoryType, TxType};
use crate::store::load_categories;
use crate::utils::{
    arg, fmt_money, get_currency_symbol, maybe_print_json, non_empty, opt_arg, parse_id,
    parse_non_negative, pretty_table, validate_color,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let mut store = load_categories(conn)?;
            let cat = Category {
                id: store.next_id(),
                name: non_empty(arg(sub, "name")?, "Category name")?,
                color: validate_color(arg(sub, "color")?)?,
                icon: arg(sub, "icon")?.trim().to_string(),
                budget: parse_non_negative(arg(sub, "budget")?, "Budget")?,
                r#type: arg(sub, "type")?.parse()?,
            };
            let cat = store.insert(conn, cat)?;
            println!("Added category '{}' (id {})", cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let store = load_categories(conn)?;
            let only = opt_arg(sub, "type")
                .map(str::parse::<TxType>)
                .transpose()?;
            let data: Vec<&Category> = store
                .items()
                .iter()
                .filter(|c| only.is_none_or(|t| c.r#type.applies_to(t)))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let symbol = get_currency_symbol(conn)?;
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            format!("{} {}", c.icon, c.name),
                            c.r#type.to_string(),
                            c.color.clone(),
                            if c.r#type.has_budget() && !c.budget.is_zero() {
                                format!("{}/month", fmt_money(&c.budget, &symbol))
                            } else {
                                String::new()
                            },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Category", "Type", "Color", "Budget"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store = load_categories(conn)?;
            store.modify(conn, id, |cat| {
                if let Some(name) = opt_arg(sub, "name") {
                    cat.name = non_empty(name, "Category name")?;
                }
                if let Some(color) = opt_arg(sub, "color") {
                    cat.color = validate_color(color)?;
                }
                if let Some(icon) = opt_arg(sub, "icon") {
                    cat.icon = icon.to_string();
                }
                if let Some(budget) = opt_arg(sub, "budget") {
                    cat.budget = parse_non_negative(budget, "Budget")?;
                }
                if let Some(t) = opt_arg(sub, "type") {
                    cat.r#type = t.parse::<CategoryType>()?;
                }
                Ok(())
            })?;
            println!("Updated category {}", id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store = load_categories(conn)?;
            // transactions keep their category id and fall back to the uncategorized label
            match store.remove(conn, id, confirmer(sub))? {
                Some(c) => println!("Removed category '{}'", c.name),
                None => println!("Aborted"),
            }
        }
        _ => {}
    }
    Ok(())
}
