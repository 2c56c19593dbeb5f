// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::{bail, Result};

pub fn handle(app: &mut App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let icon = required(sub, "icon")?;
            let color = required(sub, "color")?;
            let c = app.ledger_mut().add_category(name, icon, color);
            println!("Added category '{}' (id: {})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let categories = app.ledger().categories();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let data = categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.icon.clone(),
                            c.color.clone(),
                            if c.builtin { "yes" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Icon", "Color", "Built-in"], data)
                );
            }
        }
        Some(("update", sub)) => {
            let id = required(sub, "id")?;
            let Some(current) = app.ledger().category(id).cloned() else {
                bail!("Category '{}' not found", id);
            };
            let name = sub.get_one::<String>("name").unwrap_or(&current.name);
            let icon = sub.get_one::<String>("icon").unwrap_or(&current.icon);
            let color = sub.get_one::<String>("color").unwrap_or(&current.color);
            app.ledger_mut().update_category(id, name, icon, color);
            println!("Updated category '{}'", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            if app.ledger_mut().delete_category(id) {
                println!("Removed category '{}'", id);
            } else {
                println!("No category with id '{}'", id);
            }
        }
        _ => {}
    }
    Ok(())
}
