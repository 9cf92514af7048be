//! CI entry point that validates the addon descriptors changed in a PR.
//!
//! Every argument is a path; anything without a `.yaml`/`.yml` extension is
//! ignored, so the runner's changed-files list can be passed through as is.
//! Findings are printed as workflow annotations on stdout and the process
//! exits 1 when at least one error was found.

use addon_registry::{
    GithubReleases, ReleaseSource, ValidatorConfig, report, validate_pr_changes,
};
use anyhow::{Context, Result};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let config = ValidatorConfig::from_env();

    let client = if config.remote_checks {
        Some(GithubReleases::new(&config)?)
    } else {
        None
    };
    let releases = client.as_ref().map(|client| client as &dyn ReleaseSource);

    let outcome = validate_pr_changes(&paths, releases);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = report(&outcome, &mut out).context("writing annotations")?;
    out.flush().context("flushing annotations")?;
    Ok(code)
}
