//! Prompt construction for the compliance analysis
//!
//! The prompt is the concatenation of a fixed sequence of instruction blocks.
//! Each block generator looks at the request and either contributes a
//! fragment or nothing; unselected options leave no trace in the output.

use super::types::{AnalysisRequest, AnalysisType};

/// A single instruction block generator
type BlockGenerator = fn(&AnalysisRequest) -> Option<String>;

/// Block order is part of the output contract
const BLOCK_GENERATORS: [BlockGenerator; 7] = [
    preamble_block,
    scientific_block,
    reasonableness_block,
    compliance_block,
    legal_areas_block,
    custom_instructions_block,
    closing_block,
];

const PREAMBLE: &str = r#"
Acting as a professional legal advisor, provide a detailed analysis of the following text:

---TEXT START---
{text}
---TEXT END---

Analysis requirements:
"#;

const SCIENTIFIC_BLOCK: &str = r#"
1. Scientific soundness analysis:
   - Whether the content is grounded in scientific facts and evidence
   - Whether it contains scientific fallacies or inaccurate statements
   - Whether the scientific basis is sufficient
"#;

const REASONABLENESS_BLOCK: &str = r#"
2. Reasonableness analysis:
   - Whether the logic of the content is sound
   - Whether any statements contradict each other
   - Assessment of practical feasibility
"#;

const COMPLIANCE_BLOCK: &str = r#"
3. Compliance analysis:
   - Whether the content complies with the laws and regulations currently in force in the People's Republic of China
   - List the specific legal and regulatory provisions that may be violated
   - Compliance risk rating (low/medium/high)
"#;

const CLOSING: &str = r#"
Please provide an analysis report in the following format:
1. Overall assessment: overall evaluation of compliance
2. Issue list: list every issue found and mark its severity (minor/moderate/severe)
3. Remediation suggestions: concrete revision suggestions for each issue
4. Legal basis: cite the relevant legal and regulatory provisions

Make sure the report is objective, comprehensive and professional, and that the suggestions are practical and actionable.
"#;

/// Build the full prompt for a request
pub fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    let prompt: String = BLOCK_GENERATORS
        .iter()
        .filter_map(|generate| generate(request))
        .collect();

    tracing::debug!(
        "[PromptBuilder] Built prompt: {} chars, {} dimensions, {} legal areas, custom={}",
        prompt.len(),
        request.analysis_types.len(),
        request.legal_areas.len(),
        request.custom_instructions().is_some()
    );

    prompt
}

fn preamble_block(request: &AnalysisRequest) -> Option<String> {
    Some(PREAMBLE.replacen("{text}", &request.text, 1))
}

fn dimension_block(request: &AnalysisRequest, dimension: AnalysisType, block: &str) -> Option<String> {
    request.includes(dimension).then(|| block.to_string())
}

fn scientific_block(request: &AnalysisRequest) -> Option<String> {
    dimension_block(request, AnalysisType::Scientific, SCIENTIFIC_BLOCK)
}

fn reasonableness_block(request: &AnalysisRequest) -> Option<String> {
    dimension_block(request, AnalysisType::Reasonableness, REASONABLENESS_BLOCK)
}

fn compliance_block(request: &AnalysisRequest) -> Option<String> {
    dimension_block(request, AnalysisType::Compliance, COMPLIANCE_BLOCK)
}

fn legal_areas_block(request: &AnalysisRequest) -> Option<String> {
    if request.legal_areas.is_empty() {
        return None;
    }

    let areas = request
        .legal_areas
        .iter()
        .map(|area| area.label())
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "\n4. Focus on the following areas of law:\n   - {}\n",
        areas
    ))
}

fn custom_instructions_block(request: &AnalysisRequest) -> Option<String> {
    request
        .custom_instructions()
        .map(|custom| format!("\n5. Additional analysis requirements:\n   {}\n", custom))
}

fn closing_block(_request: &AnalysisRequest) -> Option<String> {
    Some(CLOSING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::LegalArea;

    const DIMENSION_HEADINGS: [&str; 3] = [
        "1. Scientific soundness analysis:",
        "2. Reasonableness analysis:",
        "3. Compliance analysis:",
    ];

    #[test]
    fn test_full_prompt_block_order() {
        let request = AnalysisRequest::new("Clause 1: the seller may refuse all refunds.")
            .with_custom_instructions(Some("Check refund terms".into()));
        let prompt = build_analysis_prompt(&request);

        let positions: Vec<usize> = [
            "---TEXT START---",
            "Clause 1: the seller may refuse all refunds.",
            "---TEXT END---",
            DIMENSION_HEADINGS[0],
            DIMENSION_HEADINGS[1],
            DIMENSION_HEADINGS[2],
            "4. Focus on the following areas of law:",
            "5. Additional analysis requirements:",
            "Please provide an analysis report",
        ]
        .iter()
        .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "blocks out of order");
    }

    #[test]
    fn test_no_dimension_blocks_without_selection() {
        let request = AnalysisRequest::new("text").with_analysis_types(Vec::<AnalysisType>::new());
        let prompt = build_analysis_prompt(&request);

        for heading in DIMENSION_HEADINGS {
            assert!(!prompt.contains(heading), "unexpected block: {heading}");
        }
        assert!(prompt.contains("Analysis requirements:"));
        assert!(prompt.contains("Please provide an analysis report"));
    }

    #[test]
    fn test_only_selected_dimension_is_emitted() {
        let request = AnalysisRequest::new("text").with_analysis_types([AnalysisType::Compliance]);
        let prompt = build_analysis_prompt(&request);

        assert!(!prompt.contains(DIMENSION_HEADINGS[0]));
        assert!(!prompt.contains(DIMENSION_HEADINGS[1]));
        assert!(prompt.contains(DIMENSION_HEADINGS[2]));
        assert!(prompt.contains("Compliance risk rating (low/medium/high)"));
    }

    #[test]
    fn test_dimension_order_ignores_selection_order() {
        let forward = AnalysisRequest::new("text")
            .with_analysis_types([AnalysisType::Scientific, AnalysisType::Compliance]);
        let reversed = AnalysisRequest::new("text")
            .with_analysis_types([AnalysisType::Compliance, AnalysisType::Scientific]);

        assert_eq!(build_analysis_prompt(&forward), build_analysis_prompt(&reversed));
    }

    #[test]
    fn test_legal_areas_follow_selection_order() {
        let a = AnalysisRequest::new("text")
            .with_legal_areas([LegalArea::LaborLaw, LegalArea::CompanyLaw]);
        let b = AnalysisRequest::new("text")
            .with_legal_areas([LegalArea::CompanyLaw, LegalArea::LaborLaw]);

        assert!(build_analysis_prompt(&a).contains("   - Labor Law, Company Law\n"));
        assert!(build_analysis_prompt(&b).contains("   - Company Law, Labor Law\n"));
    }

    #[test]
    fn test_no_legal_area_block_when_empty() {
        let request = AnalysisRequest::new("text").with_legal_areas(Vec::<LegalArea>::new());
        let prompt = build_analysis_prompt(&request);
        assert!(!prompt.contains("4. Focus on the following areas of law:"));
    }

    #[test]
    fn test_custom_block_only_when_non_blank() {
        let none = AnalysisRequest::new("text");
        assert!(!build_analysis_prompt(&none).contains("5. Additional analysis requirements:"));

        let blank = AnalysisRequest::new("text").with_custom_instructions(Some("  ".into()));
        assert!(!build_analysis_prompt(&blank).contains("5. Additional analysis requirements:"));

        let custom = AnalysisRequest::new("text")
            .with_custom_instructions(Some("Focus on Article 26".into()));
        assert!(build_analysis_prompt(&custom)
            .contains("\n5. Additional analysis requirements:\n   Focus on Article 26\n"));
    }

    #[test]
    fn test_custom_block_inserts_text_untrimmed() {
        let custom = AnalysisRequest::new("text")
            .with_custom_instructions(Some(" Check clause 9 \n".into()));
        assert!(build_analysis_prompt(&custom)
            .contains("\n5. Additional analysis requirements:\n    Check clause 9 \n\n"));
    }

    #[test]
    fn test_text_with_placeholder_is_inserted_verbatim() {
        let request = AnalysisRequest::new("literal {text} marker");
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains("---TEXT START---\nliteral {text} marker\n---TEXT END---"));
    }

    #[test]
    fn test_closing_block_lists_required_sections() {
        let prompt = build_analysis_prompt(&AnalysisRequest::new("text"));
        assert!(prompt.contains("1. Overall assessment"));
        assert!(prompt.contains("(minor/moderate/severe)"));
        assert!(prompt.contains("3. Remediation suggestions"));
        assert!(prompt.contains("4. Legal basis"));
        assert!(prompt.ends_with("practical and actionable.\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = AnalysisRequest::new("same input");
        assert_eq!(build_analysis_prompt(&request), build_analysis_prompt(&request));
    }
}
