// THEORY:
// The assembler is the last pure stage. It joins the scorer's probabilities with
// catalog names, the caller's measurements and the optional auxiliary label into
// one `AnalysisResult`, and attaches the care advice for the winning condition.
//
// The auxiliary label is carried verbatim (or as a placeholder) in `meta` and is
// never read while choosing `primary` or building `all`.

use crate::core_modules::condition_catalog::{self, CATALOG};
use crate::core_modules::condition_scorer::ScoreVector;
use serde::Serialize;

/// Label stored when no auxiliary classifier label is available.
pub const AUX_LABEL_PLACEHOLDER: &str = "—";

const FALLBACK_DESCRIPTION: &str = "No reference information is available for this result.";
const FALLBACK_FOODS: &[&str] = &["A balanced diet with plenty of fruit, vegetables and water"];
const FALLBACK_REMEDIES: &[&str] = &["Consult a qualified healthcare professional for an examination"];

/// One catalog entry with its probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionScore {
    pub id: &'static str,
    pub name: &'static str,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub analysis_time_ms: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub aux_label: String,
}

/// Description, foods and remedies shown alongside the primary condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareAdvice {
    pub description: &'static str,
    pub foods: &'static [&'static str],
    pub remedies: &'static [&'static str],
}

impl CareAdvice {
    /// Generic advice used when a condition id has no catalog entry.
    pub fn fallback() -> Self {
        Self {
            description: FALLBACK_DESCRIPTION,
            foods: FALLBACK_FOODS,
            remedies: FALLBACK_REMEDIES,
        }
    }
}

/// The full output of one analysis. Built once and handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub primary: ConditionScore,
    /// Every condition, in catalog order.
    pub all: Vec<ConditionScore>,
    pub meta: AnalysisMeta,
    pub advice: CareAdvice,
}

impl AnalysisResult {
    /// Conditions by descending confidence. `all` keeps catalog order.
    pub fn ranked(&self) -> Vec<&ConditionScore> {
        let mut ranked: Vec<&ConditionScore> = self.all.iter().collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked
    }
}

/// Care advice for `id`, or the generic fallback if the catalog lacks it.
pub fn care_advice_for(id: &str) -> CareAdvice {
    match condition_catalog::find(id) {
        Some(condition) => CareAdvice {
            description: condition.description,
            foods: condition.foods,
            remedies: condition.remedies,
        },
        None => CareAdvice::fallback(),
    }
}

/// Builds the result record. Total: never fails.
pub fn assemble_result(
    scores: &ScoreVector,
    elapsed_ms: f64,
    width: u32,
    height: u32,
    aux_label: Option<&str>,
) -> AnalysisResult {
    let all: Vec<ConditionScore> = CATALOG
        .iter()
        .zip(scores.probabilities())
        .map(|(condition, &confidence)| ConditionScore {
            id: condition.id,
            name: condition.name,
            confidence,
        })
        .collect();

    let (top, _) = scores.top();
    let primary = all[top].clone();
    let advice = care_advice_for(primary.id);

    let aux_label = aux_label
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(AUX_LABEL_PLACEHOLDER)
        .to_string();

    AnalysisResult {
        primary,
        all,
        meta: AnalysisMeta {
            analysis_time_ms: elapsed_ms,
            image_width: width,
            image_height: height,
            aux_label,
        },
        advice,
    }
}
