// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::{cli, commands, config, db};

fn main() -> Result<()> {
    config::init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let mut app = db::load_app(&conn)?;

    let dirty = match matches.subcommand() {
        Some(("init", _)) => {
            db::save_app(&mut conn, &app)?;
            println!("Database initialized at {}", db::db_path()?.display());
            false
        }
        Some(("tx", sub)) => {
            commands::transactions::handle(&mut app, sub)?;
            true
        }
        Some(("category", sub)) => {
            commands::categories::handle(&mut app, sub)?;
            true
        }
        Some(("currency", sub)) => {
            commands::currency::handle(&conn, &mut app, sub)?;
            true
        }
        Some(("fx", sub)) => {
            commands::fx::handle(&conn, sub)?;
            false
        }
        Some(("report", sub)) => {
            commands::reports::handle(&app, sub)?;
            false
        }
        Some(("receipt", sub)) => {
            commands::receipt::handle(&conn, &mut app, sub)?;
            true
        }
        Some(("export", sub)) => {
            commands::exporter::handle(&app, sub)?;
            false
        }
        Some(("import", sub)) => {
            commands::importer::handle(&mut app, sub)?;
            true
        }
        Some(("doctor", _)) => {
            commands::doctor::handle(&app)?;
            false
        }
        Some(("reset", _)) => {
            app.reset_all();
            println!("All data erased; default categories restored.");
            true
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
            false
        }
    };

    if dirty {
        db::save_app(&mut conn, &app)?;
    }
    Ok(())
}
