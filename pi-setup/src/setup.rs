// Full display host provisioning sequence
//
// Failure policy is "continue and warn": after the root check, a step
// that cannot complete leaves a warning and a manual-remediation hint
// rather than aborting the remaining steps. Every step is idempotent, so
// re-running setup converges to the same final state.

use anyhow::{Context, Result};
use colored::Colorize;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use pistats_provision::activate::{self, Activation};
use pistats_provision::output::{self, create_teal_theme, print_title_bar};
use pistats_provision::steps::{run_step, run_step_lenient};
use pistats_provision::units::UnitScope;

use crate::config::{DisplayConfig, Orientation, detect_install_user};
use crate::constants::{
    BIN_INSTALL_PATH, DISPLAY_SCRIPT, GAME_ART_DIR_NAME, SERVICE_NAME,
};
use crate::{bootconfig, kiosk, packages, service, sudoers};

/// Options for the setup command
pub struct SetupOptions {
    pub orientation: Option<Orientation>,
    pub dry_run: bool,
    pub auto_confirm: bool,
}

pub fn run(options: &SetupOptions) -> Result<()> {
    // Hard stop before any mutation; everything below writes system paths
    ensure_root()?;
    validate_environment(options)?;

    println!();
    print_title_bar("🖥  PiStats Display Host Setup");
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

    let user = detect_install_user();
    let orientation = resolve_orientation(options)?;
    let config = DisplayConfig::new(orientation, &user);

    output::info(&format!("Display user: {user}"));
    output::info(&format!("Orientation:  {orientation}"));
    println!();

    // Past this point every failure is warn-and-continue: the steps are
    // independent and a partial install is still worth finishing.
    run_step_lenient("Installing packages (apt-get)", || {
        packages::install(options.dry_run)
    });

    match run_step("Deploying display script", || {
        deploy_display_script(&config, options.dry_run)
    }) {
        Ok(true) => {}
        Ok(false) => {
            output::warning(&format!("{DISPLAY_SCRIPT} not found next to the installer."));
            output::info(&format!(
                "Copy it manually to {} and restart {SERVICE_NAME}.",
                config.display_dir.display()
            ));
        }
        Err(e) => output::warning(&format!("Display script deployment failed: {e:#}")),
    }

    run_step_lenient("Writing orientation config", || {
        if options.dry_run {
            return Ok(());
        }
        config.save()
    });

    run_step_lenient("Installing pistats-pi to /usr/local/bin", || {
        install_self(options.dry_run)
    });

    run_step_lenient("Generating stats-display.service", || {
        service::install_unit(&config, options.dry_run)
    });

    run_step_lenient("Updating boot firmware config", || {
        bootconfig::apply(options.dry_run)
    });

    run_step_lenient("Configuring autologin and kiosk autostart", || {
        kiosk::configure(&user, options.dry_run)
    });

    run_step_lenient("Installing sudoers policy", || {
        sudoers::install(&user, options.dry_run)
    });

    if options.dry_run {
        log::info!("Would enable and start {SERVICE_NAME}");
    } else {
        match run_step("Starting stats-display.service", || {
            activate::ensure_active(UnitScope::System, SERVICE_NAME, &user)
        }) {
            Ok(Activation::Started | Activation::DeferredToLogin) => {}
            Err(e) => {
                output::warning(&format!("Could not start {SERVICE_NAME}: {e:#}"));
                output::info(&format!("Start it manually: systemctl start {SERVICE_NAME}"));
            }
        }
    }

    println!();
    print_title_bar("🖥  PiStats Display Host Setup Complete!");
    println!();
    output::info("Reboot to bring up the autologin kiosk session:");
    println!();
    println!("  {}", "sudo reboot".cyan());
    println!();

    Ok(())
}

fn ensure_root() -> Result<()> {
    if !nix::unistd::Uid::effective().is_root() {
        anyhow::bail!("This setup must run as root. Re-run with: sudo pistats-pi setup");
    }
    Ok(())
}

fn validate_environment(options: &SetupOptions) -> Result<()> {
    use std::io::IsTerminal;

    if options.orientation.is_none()
        && !options.auto_confirm
        && !options.dry_run
        && !std::io::stdin().is_terminal()
    {
        anyhow::bail!(
            "Running in non-interactive environment (no TTY detected). \
             Use --orientation or --yes to skip the prompt."
        );
    }
    Ok(())
}

/// Flag wins; otherwise prompt, defaulting to portrait
fn resolve_orientation(options: &SetupOptions) -> Result<Orientation> {
    if let Some(orientation) = options.orientation {
        return Ok(orientation);
    }
    if options.auto_confirm {
        return Ok(Orientation::default());
    }

    let choices = vec!["Portrait (480x1920)", "Landscape (1920x480)"];
    let selection = inquire::Select::new("Screen orientation:", choices)
        .with_starting_cursor(0)
        .with_render_config(create_teal_theme())
        .prompt()
        .context("Failed to get orientation selection")?;

    Ok(if selection.starts_with("Landscape") {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    })
}

/// Copy the display script into place and create the artwork directory
///
/// Returns Ok(false) when no script could be located; the caller decides
/// how loudly to complain.
fn deploy_display_script(config: &DisplayConfig, dry_run: bool) -> Result<bool> {
    let Some(source) = locate_payload(DISPLAY_SCRIPT) else {
        return Ok(false);
    };

    if dry_run {
        log::info!(
            "Would copy {} to {}",
            source.display(),
            config.display_dir.display()
        );
        return Ok(true);
    }

    std::fs::create_dir_all(&config.display_dir).with_context(|| {
        format!("Failed to create {}", config.display_dir.display())
    })?;
    std::fs::copy(&source, config.display_dir.join(DISPLAY_SCRIPT))
        .context("Failed to copy display script")?;

    let art_dir = PathBuf::from(format!("/home/{}/{GAME_ART_DIR_NAME}", config.user));
    std::fs::create_dir_all(&art_dir)
        .with_context(|| format!("Failed to create {}", art_dir.display()))?;

    let owner = format!("{0}:{0}", config.user);
    for dir in [&config.display_dir, &art_dir] {
        let _ = pistats_provision::cmd::run_command(
            "chown",
            &["-R", &owner, &dir.display().to_string()],
        );
    }

    Ok(true)
}

/// Find a payload file next to the running binary, then in the CWD
pub fn locate_payload(name: &str) -> Option<PathBuf> {
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

/// Install this binary to the stable path the unit's pre-start hook uses
fn install_self(dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!("Would install binary to {BIN_INSTALL_PATH}");
        return Ok(());
    }

    let current_exe =
        std::env::current_exe().context("Failed to determine current executable path")?;
    let target = Path::new(BIN_INSTALL_PATH);

    // Re-running setup from the installed path would copy a file onto itself
    if current_exe == target {
        return Ok(());
    }

    std::fs::copy(&current_exe, target)
        .with_context(|| format!("Failed to copy binary to {BIN_INSTALL_PATH}"))?;

    let mut perms = std::fs::metadata(target)
        .context("Failed to read installed binary permissions")?
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(target, perms)
        .context("Failed to set executable permissions")?;

    Ok(())
}
