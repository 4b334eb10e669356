//! Wrapper command
//!
//! Runs the installed git-ai binary with the caller's arguments and stdio,
//! and hands back its exit code.

use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::install::Config;
use crate::locate::BinaryLocator;
use crate::runtime::Runtime;

/// Locate git-ai and run it with `args`, returning its exit code.
///
/// A missing binary is an error carrying the locator's hint.
pub fn exec<R: Runtime>(runtime: &R, config: &Config, args: &[OsString]) -> Result<i32> {
    let platform = config.platform()?;
    let locator = BinaryLocator::new(runtime, config.package_root.clone(), config.mode);
    let binary = locator.locate(&platform)?;
    run_binary(&binary, args)
}

#[tracing::instrument(skip(args))]
pub fn run_binary(binary: &Path, args: &[OsString]) -> Result<i32> {
    debug!("Running {:?} with {} argument(s)", binary, args.len());
    let status = Command::new(binary)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", binary.display()))?;
    Ok(exit_code(status))
}

/// A child killed by a signal has no exit code; report it as 1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
