//! Export artifacts: pretty-printed JSON written under a target directory.
//!
//! Failures here are invisible to the caller (logged only); exporting is a
//! best-effort side effect on an already-terminal outcome, not part of it.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::protocol::AssessmentResult;

pub const ASSESSMENT_FILE: &str = "assessment.json";
pub const COVERAGE_FILE: &str = "coverage_report.json";

/// Serialize `payload` as 2-space-indented JSON to `dir/filename`. The file
/// handle lives only inside this call.
pub fn export(dir: &Path, filename: &str, payload: &impl Serialize) {
  let path = dir.join(filename);
  let attempt = || -> std::io::Result<()> {
    let body = serde_json::to_string_pretty(payload)?;
    let mut file = File::create(&path)?;
    file.write_all(body.as_bytes())?;
    file.flush()
  };
  match attempt() {
    Ok(()) => info!(target: "assessgen", path = %path.display(), "Wrote export artifact"),
    Err(e) => {
      error!(target: "assessgen", path = %path.display(), error = %e, "Failed to write export artifact")
    }
  }
}

/// Write both download artifacts for a successful result.
pub fn export_result(dir: &Path, result: &AssessmentResult) {
  export(dir, ASSESSMENT_FILE, &result.assessment);
  export(dir, COVERAGE_FILE, &result.coverage_report);
}
