//! HTTP client for the assessment generation service.
//!
//! Single endpoint: POST {base_url}/assessment/generate. Calls are
//! instrumented and log status codes, latencies, and body sizes (never body
//! contents).

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::error::GenerateError;
use crate::protocol::{AssessmentResult, GenerationRequest};

#[derive(Clone)]
pub struct GenerationClient {
  client: reqwest::Client,
  base_url: String,
}

impl GenerationClient {
  pub fn new(cfg: &Config) -> Self {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = cfg.request_timeout {
      builder = builder.timeout(timeout);
    }
    let client = match builder.build() {
      Ok(c) => c,
      Err(e) => {
        error!(target: "assessgen", error = %e, "HTTP client build failed; using defaults");
        reqwest::Client::new()
      }
    };
    Self { client, base_url: cfg.backend_url.clone() }
  }

  /// Issue one generation request and classify every failure into the
  /// `GenerateError` taxonomy. Nothing here panics or escapes uncaught.
  #[instrument(
    level = "info",
    skip(self, req),
    fields(skills_len = req.skills.len(), difficulty = %req.difficulty)
  )]
  pub async fn generate(&self, req: &GenerationRequest) -> Result<AssessmentResult, GenerateError> {
    let url = format!("{}/assessment/generate", self.base_url);
    let start = std::time::Instant::now();

    let res = self.client.post(&url)
      .header(USER_AGENT, "assessgen/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(req)
      .send()
      .await
      .map_err(GenerateError::unknown)?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      error!(
        target: "assessgen",
        status = status.as_u16(),
        body_len = body.len(),
        "Generation request rejected"
      );
      return Err(GenerateError::transport(status.as_u16(), extract_detail(&body)));
    }

    let body = res.text().await.map_err(GenerateError::unknown)?;
    let result = parse_success_body(&body)?;
    info!(
      target: "assessgen",
      elapsed = ?start.elapsed(),
      items = result.assessment.len(),
      body_len = body.len(),
      "Generation response accepted"
    );
    Ok(result)
  }
}

/// Parse a 2xx body. Both top-level fields must be present and non-null;
/// anything else is a format error, never a success.
fn parse_success_body(body: &str) -> Result<AssessmentResult, GenerateError> {
  let value: Value = serde_json::from_str(body).map_err(|_| GenerateError::InvalidFormat)?;
  let present = |key: &str| matches!(value.get(key), Some(v) if !v.is_null());
  if !present("assessment") || !present("coverage_report") {
    return Err(GenerateError::InvalidFormat);
  }
  serde_json::from_value(value).map_err(|_| GenerateError::InvalidFormat)
}

/// Try to extract a clean `detail` message from an error body.
fn extract_detail(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct ErrBody {
    detail: String,
  }
  serde_json::from_str::<ErrBody>(body).ok().map(|e| e.detail)
}
