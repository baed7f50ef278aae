//! Shared types for the analysis pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::credentials::Credential;

/// Evaluation dimension the model is asked to cover
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Scientific soundness of the claims
    Scientific,
    /// Internal logic and feasibility
    Reasonableness,
    /// Conformity with laws and regulations in force
    Compliance,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [Self::Scientific, Self::Reasonableness, Self::Compliance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scientific => "scientific",
            Self::Reasonableness => "reasonableness",
            Self::Compliance => "compliance",
        }
    }

}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scientific" | "science" => Ok(Self::Scientific),
            "reasonableness" | "reasonable" => Ok(Self::Reasonableness),
            "compliance" => Ok(Self::Compliance),
            other => Err(SelectionError::UnknownAnalysisType(other.to_string())),
        }
    }
}

/// Domain-of-law tag used to focus the analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LegalArea {
    CompanyLaw,
    ContractLaw,
    LaborLaw,
    IntellectualPropertyLaw,
    CybersecurityLaw,
    PersonalInformationProtectionLaw,
    DataSecurityLaw,
    AntiMonopolyLaw,
    ConsumerRightsProtectionLaw,
    Other,
}

impl LegalArea {
    pub const ALL: [LegalArea; 10] = [
        Self::CompanyLaw,
        Self::ContractLaw,
        Self::LaborLaw,
        Self::IntellectualPropertyLaw,
        Self::CybersecurityLaw,
        Self::PersonalInformationProtectionLaw,
        Self::DataSecurityLaw,
        Self::AntiMonopolyLaw,
        Self::ConsumerRightsProtectionLaw,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyLaw => "company-law",
            Self::ContractLaw => "contract-law",
            Self::LaborLaw => "labor-law",
            Self::IntellectualPropertyLaw => "intellectual-property-law",
            Self::CybersecurityLaw => "cybersecurity-law",
            Self::PersonalInformationProtectionLaw => "personal-information-protection-law",
            Self::DataSecurityLaw => "data-security-law",
            Self::AntiMonopolyLaw => "anti-monopoly-law",
            Self::ConsumerRightsProtectionLaw => "consumer-rights-protection-law",
            Self::Other => "other",
        }
    }

    /// Human-readable name, as it appears in the prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::CompanyLaw => "Company Law",
            Self::ContractLaw => "Contract Law",
            Self::LaborLaw => "Labor Law",
            Self::IntellectualPropertyLaw => "Intellectual Property Law",
            Self::CybersecurityLaw => "Cybersecurity Law",
            Self::PersonalInformationProtectionLaw => "Personal Information Protection Law",
            Self::DataSecurityLaw => "Data Security Law",
            Self::AntiMonopolyLaw => "Anti-Monopoly Law",
            Self::ConsumerRightsProtectionLaw => "Consumer Rights Protection Law",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LegalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalArea {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .iter()
            .copied()
            .find(|area| area.as_str() == normalized || area.label().to_lowercase() == s.trim().to_lowercase())
            .ok_or(SelectionError::UnknownLegalArea(s.trim().to_string()))
    }
}

/// Completion model offered to the user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModelChoice {
    #[default]
    #[serde(rename = "deepseek-chat")]
    DeepseekChat,
    #[serde(rename = "deepseek-coder")]
    DeepseekCoder,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 2] = [Self::DeepseekChat, Self::DeepseekCoder];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepseekChat => "deepseek-chat",
            Self::DeepseekCoder => "deepseek-coder",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelChoice {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim())
            .ok_or(SelectionError::UnknownModel(s.trim().to_string()))
    }
}

/// Unrecognised user selection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown analysis type '{0}' (expected scientific, reasonableness or compliance)")]
    UnknownAnalysisType(String),

    #[error("unknown legal area '{0}'")]
    UnknownLegalArea(String),

    #[error("unknown model '{0}' (expected deepseek-chat or deepseek-coder)")]
    UnknownModel(String),
}

/// Request rejected before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload a document or enter the text to analyze")]
    EmptyText,

    #[error("Please provide a DeepSeek API key")]
    MissingCredential,
}

/// Everything the prompt builder needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub text: String,
    pub analysis_types: Vec<AnalysisType>,
    pub legal_areas: Vec<LegalArea>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl AnalysisRequest {
    /// Create a request with the default selections (all dimensions, company + contract law)
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            analysis_types: AnalysisType::ALL.to_vec(),
            legal_areas: vec![LegalArea::CompanyLaw, LegalArea::ContractLaw],
            custom_instructions: None,
        }
    }

    pub fn with_analysis_types(mut self, types: impl IntoIterator<Item = AnalysisType>) -> Self {
        self.analysis_types = dedup_preserving_order(types);
        self
    }

    pub fn with_legal_areas(mut self, areas: impl IntoIterator<Item = LegalArea>) -> Self {
        self.legal_areas = dedup_preserving_order(areas);
        self
    }

    pub fn with_custom_instructions(mut self, instructions: Option<String>) -> Self {
        self.custom_instructions = instructions;
        self
    }

    pub fn includes(&self, analysis_type: AnalysisType) -> bool {
        self.analysis_types.contains(&analysis_type)
    }

    /// Custom instructions as given; whitespace-only input counts as none
    pub fn custom_instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// A request is only sendable with non-blank text and a credential
    pub fn validate(&self, credential: Option<&Credential>) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if credential.is_none() {
            return Err(ValidationError::MissingCredential);
        }
        Ok(())
    }
}

fn dedup_preserving_order<T: PartialEq + Copy>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_from_str() {
        assert_eq!("scientific".parse::<AnalysisType>(), Ok(AnalysisType::Scientific));
        assert_eq!("COMPLIANCE".parse::<AnalysisType>(), Ok(AnalysisType::Compliance));
        assert!("astrology".parse::<AnalysisType>().is_err());
    }

    #[test]
    fn test_legal_area_accepts_slug_and_label() {
        assert_eq!("labor-law".parse::<LegalArea>(), Ok(LegalArea::LaborLaw));
        assert_eq!("Data Security Law".parse::<LegalArea>(), Ok(LegalArea::DataSecurityLaw));
        assert_eq!("anti_monopoly_law".parse::<LegalArea>(), Ok(LegalArea::AntiMonopolyLaw));
        assert!("maritime-law".parse::<LegalArea>().is_err());
    }

    #[test]
    fn test_model_choice_is_closed() {
        assert_eq!("deepseek-coder".parse::<ModelChoice>(), Ok(ModelChoice::DeepseekCoder));
        assert_eq!(
            "gpt-4".parse::<ModelChoice>(),
            Err(SelectionError::UnknownModel("gpt-4".to_string()))
        );
        assert_eq!(ModelChoice::default().as_str(), "deepseek-chat");
    }

    #[test]
    fn test_default_selections() {
        let request = AnalysisRequest::new("text");
        assert_eq!(request.analysis_types, AnalysisType::ALL.to_vec());
        assert_eq!(request.legal_areas, vec![LegalArea::CompanyLaw, LegalArea::ContractLaw]);
        assert!(request.custom_instructions().is_none());
    }

    #[test]
    fn test_legal_areas_keep_selection_order_and_drop_duplicates() {
        let request = AnalysisRequest::new("text").with_legal_areas([
            LegalArea::DataSecurityLaw,
            LegalArea::CompanyLaw,
            LegalArea::DataSecurityLaw,
        ]);
        assert_eq!(request.legal_areas, vec![LegalArea::DataSecurityLaw, LegalArea::CompanyLaw]);
    }

    #[test]
    fn test_blank_custom_instructions_are_absent() {
        let request = AnalysisRequest::new("text").with_custom_instructions(Some("   \n".into()));
        assert!(request.custom_instructions().is_none());
    }

    #[test]
    fn test_custom_instructions_keep_surrounding_whitespace() {
        let request = AnalysisRequest::new("text")
            .with_custom_instructions(Some("  Check refunds\n".into()));
        assert_eq!(request.custom_instructions(), Some("  Check refunds\n"));
    }

    #[test]
    fn test_validate() {
        let key = Credential::new("sk-test");
        assert_eq!(
            AnalysisRequest::new("  \n ").validate(key.as_ref()),
            Err(ValidationError::EmptyText)
        );
        assert_eq!(
            AnalysisRequest::new("contract text").validate(None),
            Err(ValidationError::MissingCredential)
        );
        assert!(AnalysisRequest::new("contract text").validate(key.as_ref()).is_ok());
    }
}
