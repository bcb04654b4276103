//! Missing command implementation
//!
//! Lists the sprite ids a generation run would need to (re)produce. Ids go to
//! stdout one per line so the output can be piped; status goes to stderr.

use anyhow::Result;
use atlasforge_backend_atlas::{plan_missing, AtlasError};
use atlasforge_spec::LayoutManifest;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, MissingOutput};

/// Run the missing command
///
/// # Returns
/// Exit code: 0 on success, 1 when the manifest cannot be loaded
pub fn run(layout: &str, index: &str, marker: &str, json: bool) -> Result<ExitCode> {
    let manifest = match LayoutManifest::load(Path::new(layout)) {
        Ok(manifest) => manifest,
        Err(err) => {
            let err = AtlasError::from(err);
            if json {
                print_json(&MissingOutput {
                    ok: false,
                    plan: None,
                    error: Some((&err).into()),
                })?;
            } else {
                eprintln!("{} [{}] {}", "error:".red().bold(), err.code(), err);
            }
            return Ok(ExitCode::from(1));
        }
    };

    let plan = plan_missing(&manifest, Path::new(index), Path::new(marker));

    if json {
        print_json(&MissingOutput {
            ok: true,
            plan: Some(plan),
            error: None,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    if plan.force_full {
        eprintln!(
            "{} atlas not marked production, regenerating all {} sprites",
            "!!".yellow(),
            plan.ids.len()
        );
    } else {
        eprintln!(
            "{} {} of {} sprites missing from {}",
            "->".cyan(),
            plan.ids.len(),
            manifest.sprites.len(),
            index
        );
    }
    for id in &plan.ids {
        println!("{}", id);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_layout_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

        let code = run(&path("layout.json"), &path("sprites.json"), &path("ready.json"), true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_missing_lists_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
        std::fs::write(
            dir.path().join("layout.json"),
            r#"{
              "sheet": { "width": 16, "height": 16, "scale": 1, "cell": 16 },
              "sprites": [ { "id": "coin", "row": 0, "col": 0, "w": 16, "h": 16 } ]
            }"#,
        )
        .unwrap();

        let code = run(&path("layout.json"), &path("sprites.json"), &path("ready.json"), false).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }
}
