//! Form state: the user's raw input prior to normalization.
//!
//! `skills` stays comma-separated text exactly as typed; the normalized list
//! is derived on demand (`skills_list`) and never stored.

use serde::{Deserialize, Serialize};

/// Requested assessment difficulty. The wire format expects the capitalized
/// variant names verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
    })
  }
}

/// Case-insensitive parser for the CLI flag.
pub fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
  match s.trim().to_ascii_lowercase().as_str() {
    "easy" => Ok(Difficulty::Easy),
    "medium" => Ok(Difficulty::Medium),
    "hard" => Ok(Difficulty::Hard),
    other => Err(format!("unknown difficulty '{}' (expected easy|medium|hard)", other)),
  }
}

/// Current user input. Mutated only by user edits; never reset implicitly.
#[derive(Clone, Debug)]
pub struct FormState {
  pub role: String,
  /// Raw comma-separated text, e.g. "SQL, Product-Metrics".
  pub skills: String,
  pub difficulty: Difficulty,
  pub include_minicase: bool,
  pub include_aptitude: bool,
}

impl Default for FormState {
  fn default() -> Self {
    Self {
      role: String::new(),
      skills: String::new(),
      difficulty: Difficulty::default(),
      include_minicase: true,
      include_aptitude: true,
    }
  }
}

impl FormState {
  /// Split on commas, trim each entry, drop empties. Order preserved,
  /// duplicates kept.
  pub fn skills_list(&self) -> Vec<String> {
    self
      .skills
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect()
  }
}

/// Minimal precondition check before submission. Difficulty and the section
/// flags always hold valid values by construction, so only the free-text
/// fields are inspected.
pub fn validate(form: &FormState) -> Result<(), String> {
  if form.role.trim().is_empty() || form.skills.trim().is_empty() {
    return Err("Please fill in role and skills".to_string());
  }
  Ok(())
}
