//! Wire protocol for the generation service (serde ready).
//!
//! The item shape is owned by the service and only loosely modeled here:
//! every field we know about is optional, and unrecognized fields ride along
//! in `extra` so an exported item re-serializes to what the service sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::{Difficulty, FormState};

/// Normalized payload for one submission. Built once from a form snapshot
/// and handed to the controller by value; an in-flight attempt never reads
/// back into live form state.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationRequest {
    pub role: String,
    pub skills: Vec<String>,
    pub difficulty: Difficulty,
    pub include_minicase: bool,
    pub include_aptitude: bool,
}

impl GenerationRequest {
    pub fn from_form(form: &FormState) -> Self {
        Self {
            role: form.role.clone(),
            skills: form.skills_list(),
            difficulty: form.difficulty,
            include_minicase: form.include_minicase,
            include_aptitude: form.include_aptitude,
        }
    }
}

/// One generated item. The service guarantees no particular shape beyond
/// "may or may not contain these fields"; defaulting happens at the display
/// boundary (`present`), not here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentItem {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Anything the service sent that we do not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Terminal payload of a successful attempt. Both fields are mandatory; a
/// body missing either is rejected at the client boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub assessment: Vec<AssessmentItem>,
    pub coverage_report: Value,
}
