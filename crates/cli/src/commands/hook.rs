// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook management commands.

use super::ProdEngine;
use crate::exit_error::validation;
use anyhow::Result;
use clap::{Args, Subcommand};
use daedalos_engine::hooks;
use daedalos_engine::HookEvent;
use std::path::PathBuf;

#[derive(Args)]
pub struct HookArgs {
    #[command(subcommand)]
    pub command: HookCommand,
}

#[derive(Subcommand)]
pub enum HookCommand {
    /// List hooks (all events, or one)
    List {
        event: Option<EventArg>,
    },
    /// Install a script as a hook
    Add {
        event: EventArg,
        script: PathBuf,
    },
    /// Delete a hook by file name
    Remove {
        event: EventArg,
        name: String,
    },
    /// Re-enable a disabled hook
    Enable {
        event: EventArg,
        name: String,
    },
    /// Disable a hook without deleting it
    Disable {
        event: EventArg,
        name: String,
    },
    /// Write a starter hook script
    Create {
        event: EventArg,
        name: String,
    },
}

/// Clap-friendly hook event wrapper.
#[derive(Clone)]
pub struct EventArg(pub HookEvent);

impl std::str::FromStr for EventArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(EventArg)
    }
}

pub fn run(engine: &ProdEngine, args: HookArgs) -> Result<()> {
    let root = engine.data_root();
    match args.command {
        HookCommand::List { event } => {
            let events: Vec<HookEvent> = match event {
                Some(event) => vec![event.0],
                None => HookEvent::ALL.to_vec(),
            };
            let mut any = false;
            for event in events {
                for (path, enabled) in hooks::list(root, event) {
                    any = true;
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    println!(
                        "{event}/{name}{}",
                        if enabled { "" } else { " (disabled)" }
                    );
                }
            }
            if !any {
                println!("no hooks installed");
            }
            Ok(())
        }
        HookCommand::Add { event, script } => {
            if !script.is_file() {
                return Err(validation(format!(
                    "hook script not found: {}",
                    script.display()
                )));
            }
            let installed = hooks::add(root, event.0, &script)?;
            println!("installed {}", installed.display());
            Ok(())
        }
        HookCommand::Remove { event, name } => {
            hooks::remove(root, event.0, &name)?;
            println!("removed {}/{}", event.0, name);
            Ok(())
        }
        HookCommand::Enable { event, name } => {
            hooks::set_enabled(root, event.0, &name, true)?;
            println!("enabled {}/{}", event.0, name);
            Ok(())
        }
        HookCommand::Disable { event, name } => {
            hooks::set_enabled(root, event.0, &name, false)?;
            println!("disabled {}/{}", event.0, name);
            Ok(())
        }
        HookCommand::Create { event, name } => {
            let path = hooks::create(root, event.0, &name)?;
            println!("created {}", path.display());
            Ok(())
        }
    }
}
