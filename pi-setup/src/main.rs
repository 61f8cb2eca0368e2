use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

mod backup;
mod bootconfig;
mod cleanup;
mod config;
mod constants;
mod kiosk;
mod packages;
mod rotation;
mod service;
mod setup;
mod status;
mod sudoers;

/// Setup and maintenance utility for the PiStats Raspberry Pi display host
#[derive(Parser, Debug)]
#[command(name = "pistats-pi")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full display host provisioning process
    Setup {
        /// Screen orientation (skips the interactive prompt)
        #[arg(long, value_enum)]
        orientation: Option<config::Orientation>,

        /// Simulate all operations without making any changes
        #[arg(long)]
        dry_run: bool,

        /// Display detailed diagnostic information for each step
        #[arg(long, short)]
        verbose: bool,

        /// Automatically confirm all prompts without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Apply the configured orientation to the live display session
    Rotate {
        /// Invoked from the service's pre-start hook at boot
        #[arg(long)]
        boot: bool,
    },
    /// Display current status without making changes
    Status {
        /// Display detailed diagnostic information
        #[arg(long, short)]
        verbose: bool,
    },
    /// Remove all generated display host configuration
    Cleanup {
        /// Simulate all operations without making any changes
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate and install shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,

        /// Print to stdout instead of installing
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            Cli::command().print_help()?;
            std::process::exit(0);
        }
        Some(Commands::Setup {
            orientation,
            dry_run,
            verbose,
            yes,
        }) => {
            init_logging(verbose);

            if yes {
                println!(
                    "{}",
                    "Auto-confirm mode enabled (--yes) - prompts will be automatically accepted"
                        .yellow()
                        .bold()
                );
            }

            setup::run(&setup::SetupOptions {
                orientation,
                dry_run,
                auto_confirm: yes,
            })?;
        }
        Some(Commands::Rotate { boot }) => {
            env_logger::Builder::from_default_env().init();
            rotation::run_rotate(boot)?;
        }
        Some(Commands::Status { verbose }) => {
            init_logging(verbose);
            status::run(verbose);
        }
        Some(Commands::Cleanup { dry_run }) => {
            init_logging(false);
            cleanup::run(dry_run)?;
        }
        Some(Commands::Completions { shell, print }) => {
            handle_completions(shell, print)?;
        }
    }

    Ok(())
}

fn handle_completions(shell: Shell, print: bool) -> Result<()> {
    if print {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "pistats-pi",
            &mut std::io::stdout(),
        );
    } else {
        install_completions(shell)?;
    }
    Ok(())
}

fn install_completions(shell: Shell) -> Result<()> {
    use std::io::Write;

    let (completions_dir, filename) = match shell {
        Shell::Bash => {
            let data_dir = dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine XDG_DATA_HOME"))?;
            (data_dir.join("bash-completion/completions"), "pistats-pi")
        }
        Shell::Zsh => {
            let data_dir = dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine XDG_DATA_HOME"))?;
            (data_dir.join("zsh/completions"), "_pistats-pi")
        }
        Shell::Fish => {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine XDG_CONFIG_HOME"))?;
            (config_dir.join("fish/completions"), "pistats-pi.fish")
        }
        _ => {
            anyhow::bail!(
                "Auto-install not supported for {shell:?}. Use --print to output to stdout."
            );
        }
    };

    std::fs::create_dir_all(&completions_dir)?;

    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut Cli::command(), "pistats-pi", &mut buf);

    let file_path = completions_dir.join(filename);
    let mut file = std::fs::File::create(&file_path)?;
    file.write_all(&buf)?;

    println!(
        "{} Installed {} completions to {}",
        "✓".green(),
        format!("{shell:?}").to_lowercase(),
        file_path.display()
    );
    println!(
        "  {} Restart your shell or run: source {}",
        "→".cyan(),
        file_path.display()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let log_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_completions_print_flag_parses() {
        let cli = Cli::try_parse_from(["pistats-pi", "completions", "zsh", "--print"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { print: true, .. })
        ));
    }
}
