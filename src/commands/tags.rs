// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::confirmer;
use crate::models::{TAG_PALETTE, Tag};
use crate::store::{Store, load_tags};
use crate::utils::{arg, maybe_print_json, non_empty, opt_arg, parse_id, pretty_table, validate_color};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let mut store = load_tags(conn)?;
            let color = opt_arg(sub, "color").map(validate_color).transpose()?;
            let tag = new_tag(&store, arg(sub, "name")?, color)?;
            let tag = store.insert(conn, tag)?;
            println!("Added tag '{}' ({})", tag.name, tag.color);
        }
        Some(("list", sub)) => {
            let store = load_tags(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &store.items())? {
                let rows = store
                    .items()
                    .iter()
                    .map(|t| vec![t.id.to_string(), t.name.clone(), t.color.clone()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Tag", "Color"], rows));
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let mut store = load_tags(conn)?;
            match store.remove(conn, id, confirmer(sub))? {
                Some(t) => println!("Removed tag '{}'", t.name),
                None => println!("Aborted"),
            }
        }
        _ => {}
    }
    Ok(())
}

/// New tag; without an explicit color the palette is used in rotation.
pub fn new_tag(store: &Store<Tag>, name: &str, color: Option<String>) -> Result<Tag> {
    let color = color.unwrap_or_else(|| TAG_PALETTE[store.len() % TAG_PALETTE.len()].to_string());
    Ok(Tag {
        id: store.next_id(),
        name: non_empty(name, "Tag name")?,
        color,
    })
}
