// Full sender host provisioning sequence
//
// Unlike the display host this runs unprivileged: everything lands in
// the user's XDG directories and the per-user service manager. The only
// hard failure before any mutation is a missing sender script; a bad
// address never gets past validation, and an unreachable Pi is just a
// warning since the sender retries forever anyway. Every step after the
// script check is warn-and-continue.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::validator::Validation;

use pistats_provision::activate::{self, Activation};
use pistats_provision::net::{parse_ipv4, ping};
use pistats_provision::output::{self, create_teal_theme, print_title_bar};
use pistats_provision::steps::{run_step, run_step_lenient};
use pistats_provision::units::UnitScope;

use crate::config::AgentConfig;
use crate::constants::{ALL_UNITS, SENDER_SCRIPT};
use crate::{install, units};

/// Options for the setup command
pub struct SetupOptions {
    pub pi_addr: Option<String>,
    pub dry_run: bool,
    pub auto_confirm: bool,
}

pub fn run(options: &SetupOptions) -> Result<()> {
    println!();
    print_title_bar("🎮 PiStats Sender Host Setup");
    println!();

    if options.dry_run {
        println!(
            "{}",
            "Running in DRY-RUN mode - no changes will be made"
                .yellow()
                .bold()
        );
        println!();
    }

    // Fail before touching anything: without the sender script there is
    // nothing for the units to run.
    let sender_source = locate_payload(SENDER_SCRIPT).with_context(|| {
        format!(
            "{SENDER_SCRIPT} not found next to the installer or in the current directory. \
             Place it beside pistats-pc and re-run setup."
        )
    })?;

    let pi_addr = resolve_pi_addr(options)?;
    let config = AgentConfig::new(pi_addr);

    output::info(&format!("Pi address: {pi_addr}"));
    output::info(&format!("Stats URL:  {}", config.stats_url()));
    println!();

    let reachable = run_step("Checking Pi reachability", || Ok(ping(&pi_addr.to_string())))?;
    if !reachable {
        output::warning(&format!(
            "{pi_addr} did not answer a ping. Continuing; the sender retries on its own."
        ));
    }

    if options.dry_run {
        log::info!("Would deploy {SENDER_SCRIPT}, write config and install user units");
        output::info("Dry run complete; no files were written.");
        return Ok(());
    }

    // Past this point every failure is warn-and-continue
    run_step_lenient("Deploying sender script", || {
        let data_dir = AgentConfig::data_dir()?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        std::fs::copy(&sender_source, data_dir.join(SENDER_SCRIPT))
            .context("Failed to copy sender script")?;
        Ok(())
    });

    run_step_lenient("Writing agent config", || config.save());

    let agent_bin = match run_step("Installing pistats-pc to ~/.local/bin", install::install_self)
    {
        Ok(path) => path,
        Err(e) => {
            output::warning(&format!("Self-install failed: {e:#}"));
            output::info("Generated units will reference the current executable path.");
            std::env::current_exe().unwrap_or_else(|_| PathBuf::from("pistats-pc"))
        }
    };

    run_step_lenient("Generating user units", || {
        units::install_all(&config, &agent_bin.display().to_string())
    });

    let mut deferred = false;
    for unit in ALL_UNITS {
        match run_step(&format!("Starting {unit}"), || {
            activate::ensure_active(UnitScope::User, unit, &whoami())
        }) {
            Ok(Activation::Started) => {}
            Ok(Activation::DeferredToLogin) => deferred = true,
            Err(e) => {
                output::warning(&format!("Could not start {unit}: {e:#}"));
                output::info(&format!("Start it manually: systemctl --user start {unit}"));
            }
        }
    }

    println!();
    print_title_bar("🎮 PiStats Sender Host Setup Complete!");
    println!();

    if deferred {
        output::info(
            "No user session bus was reachable. Lingering is enabled; the services \
             start automatically at your next login.",
        );
        println!();
    }

    install::warn_if_not_in_path()?;

    Ok(())
}

/// Flag wins; otherwise prompt with inline validation until a strict
/// dotted-quad is entered. `--yes` forbids prompting, so it requires
/// the flag.
fn resolve_pi_addr(options: &SetupOptions) -> Result<Ipv4Addr> {
    if let Some(ref raw) = options.pi_addr {
        return parse_ipv4(raw)
            .with_context(|| format!("Invalid --pi-addr value: '{raw}'"));
    }

    if options.auto_confirm {
        anyhow::bail!("When using --yes, you must provide --pi-addr with the Pi's address");
    }

    let validator = |input: &str| match parse_ipv4(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(e) => Ok(Validation::Invalid(e.to_string().into())),
    };

    let answer = inquire::Text::new("Raspberry Pi IP address:")
        .with_validator(validator)
        .with_placeholder("10.0.0.225")
        .with_render_config(create_teal_theme())
        .prompt()
        .context("Failed to get Pi address")?;

    parse_ipv4(&answer).context("Address validation failed")
}

/// Find a payload file next to the running binary, then in the CWD
fn locate_payload(name: &str) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let cwd_candidate = PathBuf::from(name);
    cwd_candidate.is_file().then_some(cwd_candidate)
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "nobody".to_string())
}
