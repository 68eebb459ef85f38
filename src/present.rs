//! Display-side projection of a result: a bounded item preview plus the full
//! coverage report. All defaulting for the loosely-shaped items happens here,
//! at the display boundary, not at parse time.

use crate::protocol::{AssessmentItem, AssessmentResult};

/// Items shown before the "N more" indicator takes over.
pub const PREVIEW_LIMIT: usize = 5;

/// One item, defaulted and flattened for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemView {
    pub label: String,
    pub difficulty: Option<String>,
    pub text: String,
    pub choices: Option<String>,
    pub answer: Option<String>,
}

/// Bounded projection of a full result.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    pub items: Vec<ItemView>,
    /// Items beyond PREVIEW_LIMIT (0 when everything fit).
    pub omitted: usize,
    pub total: usize,
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field.clone().filter(|v| !v.is_empty())
}

pub fn item_view(item: &AssessmentItem) -> ItemView {
    ItemView {
        label: non_empty(&item.kind).unwrap_or_else(|| "Question".to_string()),
        difficulty: non_empty(&item.difficulty),
        text: non_empty(&item.question)
            .or_else(|| non_empty(&item.scenario))
            .unwrap_or_else(|| "No question text".to_string()),
        choices: item.choices.as_ref().map(|c| c.join(", ")),
        answer: non_empty(&item.answer),
    }
}

pub fn preview(result: &AssessmentResult) -> Preview {
    let total = result.assessment.len();
    Preview {
        items: result.assessment.iter().take(PREVIEW_LIMIT).map(item_view).collect(),
        omitted: total.saturating_sub(PREVIEW_LIMIT),
        total,
    }
}

/// The full coverage report, pretty-printed for unrestricted display.
pub fn coverage_pretty(result: &AssessmentResult) -> String {
    serde_json::to_string_pretty(&result.coverage_report)
        .unwrap_or_else(|_| result.coverage_report.to_string())
}

/// Render a preview as terminal text.
pub fn render_preview(p: &Preview) -> String {
    let mut out = String::from("Assessment Items\n");
    for view in &p.items {
        out.push_str(&format!("\n[{}]", view.label));
        if let Some(d) = &view.difficulty {
            out.push_str(&format!(" ({d})"));
        }
        out.push('\n');
        out.push_str(&view.text);
        out.push('\n');
        if let Some(c) = &view.choices {
            out.push_str(&format!("Choices: {c}\n"));
        }
        if let Some(a) = &view.answer {
            out.push_str(&format!("Answer: {a}\n"));
        }
    }
    if p.omitted > 0 {
        out.push_str(&format!(
            "\nShowing first {} of {} items. Export for the complete list.\n",
            PREVIEW_LIMIT, p.total
        ));
    }
    out
}
