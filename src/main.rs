use clap::{Parser, Subcommand};
use clap_complete::Shell;
use depcost::cmd;
use std::process;

/// Dependency binary-size cost analyzer
///
/// depcost measures what adding a crate actually costs in compiled binary
/// size, by building a minimal probe program with and without the dependency
/// across a matrix of target platforms and diffing the results.
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the binary-size cost of adding dependencies
    Cost {
        /// Crates to measure, optionally versioned (e.g. serde, serde@1.0)
        #[arg(value_name = "CRATE")]
        dependencies: Vec<String>,

        /// Target operating system (repeatable): linux, macos, windows
        #[arg(long = "os", value_name = "OS")]
        oses: Vec<String>,

        /// Target architecture (repeatable): x86_64, aarch64
        #[arg(long = "arch", value_name = "ARCH")]
        arches: Vec<String>,

        /// Discover dependencies from an existing Cargo.toml
        #[arg(long, value_name = "PATH")]
        from_manifest: Option<String>,

        /// Directory for temporary probe projects
        #[arg(long, value_name = "DIR")]
        work_dir: Option<String>,

        /// Output as JSON (for CI/CD integration)
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Cost {
            dependencies,
            oses,
            arches,
            from_manifest,
            work_dir,
            json,
        }) => cmd::cmd_cost(
            dependencies,
            oses,
            arches,
            from_manifest.as_deref(),
            work_dir.as_deref(),
            *json,
        ),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("depcost v{}", env!("CARGO_PKG_VERSION"));
            println!("Dependency binary-size cost analyzer\n");
            println!("Usage: depcost <COMMAND>\n");
            println!("Commands:");
            println!("  cost         Measure the binary-size cost of adding dependencies");
            println!("  completions  Generate shell completions");
            println!("\nRun 'depcost <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use depcost::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
