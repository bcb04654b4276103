//! Ready command implementation
//!
//! Reports whether the readiness marker says the atlas is production quality.

use anyhow::Result;
use atlasforge_backend_atlas::is_ready;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, ReadyOutput};

/// Run the ready command
///
/// # Returns
/// Exit code: 0 when ready, 1 when not
pub fn run(marker: &str, json: bool) -> Result<ExitCode> {
    let ready = is_ready(Path::new(marker));

    if json {
        print_json(&ReadyOutput {
            ready,
            marker: marker.to_string(),
        })?;
    } else if ready {
        println!("{} {} marks the atlas as production", "ok".green(), marker);
    } else {
        println!(
            "{} {} is absent or not marked production",
            "!!".yellow(),
            marker
        );
    }

    Ok(if ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
