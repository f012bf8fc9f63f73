//! Completions command implementation
//!
//! Handles the `depcost completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// depcost completions bash > /etc/bash_completion.d/depcost
///
/// # Zsh
/// depcost completions zsh > ~/.zfunc/_depcost
///
/// # Fish
/// depcost completions fish > ~/.config/fish/completions/depcost.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    // Re-create the command structure here since Cli is in main.rs
    use clap::{Arg, ArgAction, Command};

    let mut cmd = Command::new("depcost")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dependency binary-size cost analyzer")
        .subcommand(
            Command::new("cost")
                .about("Measure the binary-size cost of adding dependencies")
                .arg(Arg::new("dependencies").num_args(0..))
                .arg(Arg::new("os").long("os").action(ArgAction::Append))
                .arg(Arg::new("arch").long("arch").action(ArgAction::Append))
                .arg(Arg::new("from-manifest").long("from-manifest"))
                .arg(Arg::new("work-dir").long("work-dir"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("completions").about("Generate shell completions"));

    let bin_name = "depcost".to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use clap_complete::Shell;

    #[test]
    fn test_cmd_completions_all_shells_supported() {
        // If this compiles, all major shells are available
        let _bash = Shell::Bash;
        let _zsh = Shell::Zsh;
        let _fish = Shell::Fish;
        let _powershell = Shell::PowerShell;
    }
}
