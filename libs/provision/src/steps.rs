// Progress tracking for sequential setup steps
//
// Each provisioning step is shown with a spinner while it runs and a
// checkmark line once it completes.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output;
use crate::output::TEAL_256;

/// Create a teal-themed spinner with a message
///
/// Returns a `ProgressBar` configured as a spinner with consistent styling.
/// The spinner auto-ticks every 80ms. Call `.finish_and_clear()` when done.
pub fn create_spinner(message: &str) -> ProgressBar {
    use std::time::Duration;

    let spinner = ProgressBar::new_spinner();
    let template = format!("  {{spinner:.{TEAL_256}}} {{msg}}");
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&template)
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run a single setup step with spinner and success indicator
///
/// Shows `  ⠋ description` while executing `f`,
/// then replaces with `  ✓ description` on success.
pub fn run_step<F, R>(description: &str, f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    let spinner = create_spinner(description);
    match f() {
        Ok(value) => {
            spinner.finish_and_clear();
            output::success(description);
            Ok(value)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}

/// Like [`run_step`] but a failure is reported as a warning instead of
/// propagated, for sequences where the remaining steps are independent
/// and still worth running. Returns whether the step succeeded.
pub fn run_step_lenient<F>(description: &str, f: F) -> bool
where
    F: FnOnce() -> Result<()>,
{
    match run_step(description, f) {
        Ok(()) => true,
        Err(e) => {
            output::warning(&format!("{description} failed: {e:#}"));
            false
        }
    }
}

/// Like [`run_step`] but the closure returns `(R, detail)` where `detail` is
/// appended after the checkmark line: `  ✓ description — detail`
pub fn run_step_detail<F, R>(description: &str, f: F) -> Result<R>
where
    F: FnOnce() -> Result<(R, String)>,
{
    let spinner = create_spinner(description);
    match f() {
        Ok((value, detail)) => {
            spinner.finish_and_clear();
            output::success(&format!("{description} — {detail}"));
            Ok(value)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}
