//! Process-wide configuration: generation service endpoint and export paths.
//!
//! Sources, in order: environment variables, then an optional TOML overlay
//! (ASSESSGEN_CONFIG_PATH). Any overlay load/parse error is logged and the
//! overlay ignored.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Clone, Debug)]
pub struct Config {
  /// Base URL of the generation service. Not validated beyond what the HTTP
  /// client enforces when the request URL is formatted.
  pub backend_url: String,
  /// Optional client-side bound on a single request. Absent by default: an
  /// unresolved call keeps the outcome loading.
  pub request_timeout: Option<Duration>,
  /// Default directory for exported artifacts.
  pub out_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  backend_url: Option<String>,
  #[serde(default)]
  request_timeout_secs: Option<u64>,
  #[serde(default)]
  out_dir: Option<PathBuf>,
}

impl Config {
  pub fn load() -> Self {
    let overlay = load_overlay_from_env().unwrap_or_default();

    let backend_url = std::env::var("BACKEND_URL")
      .ok()
      .or(overlay.backend_url)
      .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    Self {
      backend_url,
      request_timeout: overlay.request_timeout_secs.map(Duration::from_secs),
      out_dir: overlay.out_dir.unwrap_or_else(|| PathBuf::from(".")),
    }
  }
}

/// Attempt to load the TOML overlay from ASSESSGEN_CONFIG_PATH.
/// On any parsing/IO error, returns None.
fn load_overlay_from_env() -> Option<ConfigFile> {
  let path = std::env::var("ASSESSGEN_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ConfigFile>(&s) {
      Ok(cfg) => {
        info!(target: "assessgen", %path, "Loaded config overlay (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "assessgen", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "assessgen", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
