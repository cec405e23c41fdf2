//! Evaluation Summarizer: best-effort split of evaluator text into sections.
//!
//! Heuristic only. The model is asked for three headers but nothing guarantees
//! it complies; text with no recognised header comes back whole as the overall
//! assessment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub overall_assessment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Strengths,
    AreasForImprovement,
    OverallAssessment,
}

/// Literal, case-sensitive section headers in their required order.
const HEADERS: &[(&str, Section)] = &[
    ("Strengths:", Section::Strengths),
    ("Areas for improvement:", Section::AreasForImprovement),
    ("Overall assessment:", Section::OverallAssessment),
];

const BULLET_MARKERS: &[&str] = &["* ", "- ", "• "];

fn match_header(line: &str) -> Option<(Section, &str)> {
    HEADERS.iter().find_map(|(header, section)| {
        line.strip_prefix(header)
            .map(|rest| (*section, rest.trim()))
    })
}

fn strip_bullet(line: &str) -> &str {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
        .unwrap_or(line)
}

/// Segments raw evaluator output into strengths, areas for improvement, and
/// an overall assessment.
///
/// Headers only move forward: a header for the current or an earlier section is
/// kept as ordinary content, leaving its own bucket empty. Lines before the
/// first header are dropped.
pub fn summarize_evaluation(raw: &str) -> EvaluationSummary {
    let cleaned = raw.replace("**", "");
    let mut summary = EvaluationSummary::default();
    let mut current: Option<Section> = None;
    let mut overall_parts: Vec<String> = Vec::new();

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut content = line;

        if let Some((section, rest)) = match_header(line) {
            if current.map_or(true, |c| section > c) {
                current = Some(section);
                if rest.is_empty() {
                    continue;
                }
                content = rest;
            }
        }

        let Some(section) = current else {
            continue;
        };

        let item = strip_bullet(content);
        if item.is_empty() {
            continue;
        }
        match section {
            Section::Strengths => summary.strengths.push(item.to_string()),
            Section::AreasForImprovement => summary.areas_for_improvement.push(item.to_string()),
            Section::OverallAssessment => overall_parts.push(item.to_string()),
        }
    }

    if current.is_none() {
        summary.overall_assessment = raw.trim().to_string();
        return summary;
    }

    summary.overall_assessment = overall_parts.join(" ");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "**Strengths:**\n\
        * Correct definition of ownership\n\
        * Good example with Vec\n\
        \n\
        **Areas for improvement:**\n\
        * Mention lifetimes\n\
        Could discuss borrowing rules.\n\
        \n\
        **Overall assessment:**\n\
        A solid answer.\n\
        * Ready for the next round.";

    #[test]
    fn test_well_formed_evaluation_is_split() {
        let summary = summarize_evaluation(WELL_FORMED);
        assert_eq!(
            summary.strengths,
            vec!["Correct definition of ownership", "Good example with Vec"]
        );
        assert_eq!(
            summary.areas_for_improvement,
            vec!["Mention lifetimes", "Could discuss borrowing rules."]
        );
        assert_eq!(
            summary.overall_assessment,
            "A solid answer. Ready for the next round."
        );
    }

    #[test]
    fn test_no_headers_returns_everything_as_overall() {
        let raw = "  This answer is fine.\nIt could use more detail.  ";
        let summary = summarize_evaluation(raw);
        assert!(summary.strengths.is_empty());
        assert!(summary.areas_for_improvement.is_empty());
        assert_eq!(
            summary.overall_assessment,
            "This answer is fine.\nIt could use more detail."
        );
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let raw = "STRENGTHS:\n* Loud\nstrengths:\n* quiet";
        let summary = summarize_evaluation(raw);
        assert!(summary.strengths.is_empty());
        assert_eq!(summary.overall_assessment, raw);
    }

    #[test]
    fn test_missing_section_stays_empty() {
        let raw = "Strengths:\n* Concise\nOverall assessment:\nGood.";
        let summary = summarize_evaluation(raw);
        assert_eq!(summary.strengths, vec!["Concise"]);
        assert!(summary.areas_for_improvement.is_empty());
        assert_eq!(summary.overall_assessment, "Good.");
    }

    #[test]
    fn test_out_of_order_header_leaves_bucket_empty() {
        let raw = "Areas for improvement:\n* Add tests\nStrengths:\n* Fast";
        let summary = summarize_evaluation(raw);
        assert!(summary.strengths.is_empty());
        assert_eq!(
            summary.areas_for_improvement,
            vec!["Add tests", "Strengths:", "Fast"]
        );
        assert_eq!(summary.overall_assessment, "");
    }

    #[test]
    fn test_inline_header_text_is_kept() {
        let raw = "Strengths: Clear structure\nOverall assessment: Strong hire signal.";
        let summary = summarize_evaluation(raw);
        assert_eq!(summary.strengths, vec!["Clear structure"]);
        assert_eq!(summary.overall_assessment, "Strong hire signal.");
    }

    #[test]
    fn test_preamble_before_first_header_is_dropped() {
        let raw = "Here is my evaluation.\nStrengths:\n- Accurate";
        let summary = summarize_evaluation(raw);
        assert_eq!(summary.strengths, vec!["Accurate"]);
        assert_eq!(summary.overall_assessment, "");
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_evaluation("");
        assert_eq!(summary, EvaluationSummary::default());
    }
}
