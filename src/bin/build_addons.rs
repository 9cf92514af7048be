//! Rebuilds `addons.json` from every descriptor in the working directory.
//!
//! No validation happens here; CI runs `validate-addon` on every change
//! before descriptors reach the branch this runs on.

use addon_registry::{Annotation, CATALOG_FILE, build_catalog};
use anyhow::{Context, Result, bail};
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    if env::args_os().len() > 1 {
        bail!("{}", usage());
    }

    let dir = env::current_dir().context("resolving working directory")?;
    let summary = build_catalog(&dir)?;
    println!(
        "{}",
        Annotation::notice(format!(
            "Wrote {} addons to {CATALOG_FILE}",
            summary.entries
        ))
    );
    Ok(())
}

fn usage() -> &'static str {
    "Usage: build-addons\nRun from the directory holding the addon descriptors; writes addons.json there."
}
