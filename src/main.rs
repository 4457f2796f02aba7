use clap::Parser;
use tree_navigator::cli::{Cli, Commands};
use tree_navigator::config::Config;
use tree_navigator::error::Result;
use tree_navigator::main_lib;

fn init_logging(verbose: bool) {
    // Log to a file only if TREE_NAV_LOG is set, otherwise to stderr when verbose
    if let Ok(log_file) = std::env::var("TREE_NAV_LOG") {
        match std::fs::OpenOptions::new().create(true).append(true).open(&log_file) {
            Ok(file) => {
                env_logger::Builder::new()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .filter_level(log::LevelFilter::Debug)
                    .init();
                log::info!("Tree navigator starting up");
                return;
            }
            Err(e) => eprintln!("Warning: cannot open log file {}: {}", log_file, e),
        }
    }

    if verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Snapshot {
            tree,
            output,
            no_persist,
        } => main_lib::print_snapshot(&tree, &config, output.as_deref(), no_persist),
        Commands::Execute {
            tree,
            commands,
            script,
            output,
            no_persist,
        } => main_lib::execute_commands(
            &tree,
            &config,
            script.as_deref(),
            &commands,
            output.as_deref(),
            no_persist,
        ),
    }
}
