use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tree_navigator::cli::{Cli, Commands};
use tree_navigator::config::Config;
use tree_navigator::main_lib;

#[test]
fn test_cli_parsing_execute_command() {
    let cli = Cli::try_parse_from([
        "tree-navigator",
        "execute",
        "--tree",
        "tree.json",
        "-x",
        "down",
        "-x",
        "open:f1",
        "--no-persist",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Commands::Execute {
            tree: PathBuf::from("tree.json"),
            commands: vec!["down".to_string(), "open:f1".to_string()],
            script: None,
            output: None,
            no_persist: true,
        }
    );
    assert!(!cli.verbose);
}

#[test]
fn test_cli_parsing_snapshot_with_global_flags() {
    let cli = Cli::try_parse_from([
        "tree-navigator",
        "snapshot",
        "-t",
        "tree.json",
        "--config",
        "nav.json",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("nav.json")));
    assert!(matches!(cli.command, Commands::Snapshot { no_persist: false, .. }));
}

#[test]
fn test_cli_requires_subcommand_and_tree() {
    assert!(Cli::try_parse_from(["tree-navigator"]).is_err());
    assert!(Cli::try_parse_from(["tree-navigator", "execute"]).is_err());
}

#[test]
fn test_snapshot_of_missing_tree_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = main_lib::print_snapshot(
        &temp_dir.path().join("absent.json"),
        &Config::default(),
        None,
        true,
    );
    assert!(result.is_err());
}

#[test]
fn test_snapshot_written_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let tree = temp_dir.path().join("tree.json");
    fs::write(
        &tree,
        r#"[{"id": "a", "name": "Archive", "type": "folder", "children": []}]"#,
    )
    .unwrap();
    let output = temp_dir.path().join("snapshot.json");

    main_lib::print_snapshot(&tree, &Config::default(), Some(&output), true).unwrap();

    let snapshot: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(snapshot["projection"], serde_json::json!(["a"]));
    assert_eq!(snapshot["focus_index"], 0);
    assert_eq!(snapshot["search_active"], false);
}
