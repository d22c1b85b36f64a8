pub mod check_conffiles;
pub mod check_hashes;
pub mod check_wheel_rebuild;
pub mod clean_nightlies;
pub mod completions;
pub mod create_dirs;
pub mod download_urls;
pub mod man_pages;
pub mod project_name;
pub mod reprotest;
pub mod requirements;
pub mod update_index;
pub mod update_requirements;
pub mod verify_artifacts;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use wheelhouse_core::CoreError;
use wheelhouse_runtime::{format_missing, MissingPrereq};
use wheelhouse_store::StoreError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Error messages starting with this map to [`EXIT_CONFIG_ERROR`].
pub const CONFIG_ERROR_PREFIX: &str = "configuration error:";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_status(status: &str) -> String {
    use console::Style;
    match status {
        "ok" | "created" => Style::new().green().apply_to(status).to_string(),
        "exists" | "kept" => Style::new().dim().apply_to(status).to_string(),
        "missing" | "expired" => Style::new().yellow().apply_to(status).to_string(),
        "FAIL" => Style::new().red().bold().apply_to(status).to_string(),
        other => other.to_owned(),
    }
}

fn with_config_prefix(is_configuration: bool, msg: String) -> String {
    if is_configuration {
        format!("{CONFIG_ERROR_PREFIX} {msg}")
    } else {
        msg
    }
}

/// Render a core error for `main`, appending its hint on a second line.
pub fn core_error(e: &CoreError) -> String {
    let mut msg = with_config_prefix(e.is_configuration(), e.to_string());
    if let Some(hint) = e.hint() {
        msg.push_str("\nhint: ");
        msg.push_str(hint);
    }
    msg
}

pub fn store_error(e: &StoreError) -> String {
    with_config_prefix(e.is_configuration(), e.to_string())
}

/// Missing external tools are a setup problem, not a check failure.
pub fn prereq_error(missing: &[MissingPrereq]) -> String {
    format!("{CONFIG_ERROR_PREFIX} {}", format_missing(missing))
}
