use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod constants;
mod fps;
mod install;
mod logclean;
mod logs;
mod setup;
mod status;
mod uninstall;
mod units;

/// Setup utility and telemetry loops for the PiStats gaming-PC sender host
#[derive(Parser, Debug)]
#[command(name = "pistats-pc")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full sender host provisioning process
    Setup {
        /// IPv4 address of the Pi display host (skips the interactive prompt)
        #[arg(long)]
        pi_addr: Option<String>,

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
    /// Run one of the long-lived loops (normally invoked by the user units)
    Run {
        #[command(subcommand)]
        task: RunTask,
    },
    /// Display current status without making changes
    Status {
        /// Display detailed diagnostic information
        #[arg(long, short)]
        verbose: bool,
    },
    /// Remove all generated sender host configuration
    Uninstall {
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

#[derive(Subcommand, Debug)]
enum RunTask {
    /// Mirror the newest MangoHud frame rate into /tmp/fps.txt twice a second
    FpsLogger {
        /// Directory to scan for session logs (defaults to the home directory)
        #[arg(long)]
        scan_dir: Option<PathBuf>,

        /// Sample file to write (defaults to /tmp/fps.txt)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete MangoHud session logs untouched for 30+ seconds
    LogCleanup {
        /// Directory to scan for session logs (defaults to the home directory)
        #[arg(long)]
        scan_dir: Option<PathBuf>,
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
            pi_addr,
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
                pi_addr,
                dry_run,
                auto_confirm: yes,
            })?;
        }
        Some(Commands::Run { task }) => {
            env_logger::Builder::from_default_env()
                .filter_level(log::LevelFilter::Info)
                .init();
            match task {
                RunTask::FpsLogger { scan_dir, out } => fps::run_logger(scan_dir, out)?,
                RunTask::LogCleanup { scan_dir } => logclean::run_cleanup(scan_dir)?,
            }
        }
        Some(Commands::Status { verbose }) => {
            init_logging(verbose);
            status::run(verbose);
        }
        Some(Commands::Uninstall { dry_run }) => {
            init_logging(false);
            uninstall::run(dry_run)?;
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
            "pistats-pc",
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
            (data_dir.join("bash-completion/completions"), "pistats-pc")
        }
        Shell::Zsh => {
            let data_dir = dirs::data_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine XDG_DATA_HOME"))?;
            (data_dir.join("zsh/completions"), "_pistats-pc")
        }
        Shell::Fish => {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine XDG_CONFIG_HOME"))?;
            (config_dir.join("fish/completions"), "pistats-pc.fish")
        }
        _ => {
            anyhow::bail!(
                "Auto-install not supported for {shell:?}. Use --print to output to stdout."
            );
        }
    };

    std::fs::create_dir_all(&completions_dir)?;

    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut Cli::command(), "pistats-pc", &mut buf);

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
