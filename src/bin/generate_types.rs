//! Export TypeScript bindings for the serializable wizard types.
//!
//! Usage: `cargo run --bin generate_types [-- <out_dir>]` (default `bindings/`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use ts_rs::TS;

use gymflow::wizard::{Step, WizardProgress, WizardState};

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("bindings"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    Step::export_all_to(&out_dir).context("Failed to export Step")?;
    WizardState::export_all_to(&out_dir).context("Failed to export WizardState")?;
    WizardProgress::export_all_to(&out_dir).context("Failed to export WizardProgress")?;

    println!("TypeScript bindings written to {}", out_dir.display());
    Ok(())
}
