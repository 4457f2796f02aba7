// Library module containing testable functions behind the binary

use crate::command::{parse_script, Command};
use crate::config::Config;
use crate::error::Result;
use crate::event::KeyMap;
use crate::navigator::NavigatorState;
use crate::persistence::{FileStore, MemoryStore, PinPersistence, PinnedStore};
use crate::tree::load_forest_from_file;
use std::fs;
use std::path::Path;

/// Pin storage per config: a file store in the pins directory, or memory when disabled or
/// no directory can be resolved
pub fn open_persistence(config: &Config, no_persist: bool) -> Box<dyn PinPersistence> {
    let key = config.storage.pinned_key.clone();
    if no_persist {
        return Box::new(PinnedStore::new(MemoryStore::new(), key));
    }

    match config.pins_directory() {
        Some(directory) => {
            let store = FileStore::new(directory);
            log::debug!("Pins stored under {:?}", store.directory());
            Box::new(PinnedStore::new(store, key))
        }
        None => {
            log::warn!("No data directory available, pins will not outlive this run");
            Box::new(PinnedStore::new(MemoryStore::new(), key))
        }
    }
}

pub fn build_navigator(tree_path: &Path, config: &Config, no_persist: bool) -> Result<NavigatorState> {
    let forest = load_forest_from_file(tree_path)?;
    Ok(NavigatorState::new(&forest, open_persistence(config, no_persist)))
}

/// Script commands first, then inline ones
pub fn collect_commands(script: Option<&Path>, inline: &[String]) -> Result<Vec<Command>> {
    let mut commands = match script {
        Some(path) => parse_script(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    for raw in inline {
        commands.push(Command::from_string(raw)?);
    }
    Ok(commands)
}

/// Run commands in order; returns how many changed the navigator
pub fn run_commands(navigator: &mut NavigatorState, commands: &[Command], keymap: &KeyMap) -> usize {
    commands
        .iter()
        .filter(|command| {
            let changed = command.apply(navigator, keymap);
            log::debug!("{} -> changed: {}", command.to_string(), changed);
            changed
        })
        .count()
}

pub fn snapshot_json(navigator: &NavigatorState) -> Result<String> {
    Ok(serde_json::to_string_pretty(navigator.snapshot())?)
}

pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Snapshot saved to: {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

pub fn print_snapshot(
    tree_path: &Path,
    config: &Config,
    output_path: Option<&Path>,
    no_persist: bool,
) -> Result<()> {
    let navigator = build_navigator(tree_path, config, no_persist)?;
    write_output(&snapshot_json(&navigator)?, output_path)
}

pub fn execute_commands(
    tree_path: &Path,
    config: &Config,
    script: Option<&Path>,
    inline: &[String],
    output_path: Option<&Path>,
    no_persist: bool,
) -> Result<()> {
    let keymap = KeyMap::from_config(&config.keybindings)?;
    let commands = collect_commands(script, inline)?;
    let mut navigator = build_navigator(tree_path, config, no_persist)?;

    let changed = run_commands(&mut navigator, &commands, &keymap);
    log::info!("Executed {} commands, {} changed state", commands.len(), changed);
    eprintln!("Executed {} commands ({} changed state)", commands.len(), changed);

    write_output(&snapshot_json(&navigator)?, output_path)
}
