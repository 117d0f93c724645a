mod cli;

use anyhow::Result;
use std::io;

use crate::config::Settings;
use crate::db::Storage;
use crate::menu::Menu;

pub(crate) use cli::{as_cli, Command};

/// Run the interactive numbered menu on stdin/stdout.
pub(crate) fn as_menu(db: &mut Storage, settings: &Settings) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(db, settings, stdin.lock(), stdout.lock()).run()
}
