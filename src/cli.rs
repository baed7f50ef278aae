use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::ai::{AnalysisRequest, AnalysisType, LegalArea, ModelChoice};
use crate::config::ConfigOverrides;
use crate::report::ReportFormat;

#[derive(Parser)]
#[command(name = "lexreview")]
#[command(about = "Compliance review of legal documents with a DeepSeek model")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract plain text from a .docx or .pdf document
    Extract {
        /// Document to read
        file: PathBuf,
    },
    /// Print the analysis prompt without sending it
    Prompt {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: AnalysisOptions,
    },
    /// Analyze a document and write the reports
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: AnalysisOptions,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the selectable models
    Models,
}

/// Exactly one text source
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Document to analyze (.docx or .pdf)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Text to analyze, given inline
    #[arg(long)]
    pub text: Option<String>,

    /// UTF-8 text file to analyze (e.g. edited `extract` output)
    #[arg(long)]
    pub text_file: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct AnalysisOptions {
    /// Analysis dimensions, comma separated; pass the flag alone to select none
    /// [default: scientific,reasonableness,compliance]
    #[arg(long = "analysis", value_delimiter = ',', num_args = 0..)]
    pub analysis_types: Option<Vec<AnalysisType>>,

    /// Areas of law to focus on, in order; pass the flag alone to select none
    /// [default: company-law,contract-law]
    #[arg(long = "legal-areas", value_delimiter = ',', num_args = 0..)]
    pub legal_areas: Option<Vec<LegalArea>>,

    /// Additional analysis requirements
    #[arg(long)]
    pub custom: Option<String>,
}

impl AnalysisOptions {
    pub fn to_request(&self, text: String) -> AnalysisRequest {
        let mut request = AnalysisRequest::new(text).with_custom_instructions(self.custom.clone());
        if let Some(types) = &self.analysis_types {
            request = request.with_analysis_types(types.iter().copied());
        }
        if let Some(areas) = &self.legal_areas {
            request = request.with_legal_areas(areas.iter().copied());
        }
        request
    }
}

#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// DeepSeek API key (overrides DEEPSEEK_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (overrides DEEPSEEK_API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Model to use
    #[arg(long)]
    pub model: Option<ModelChoice>,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Directory for report files (overrides LEXREVIEW_OUTPUT_DIR)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Report formats to write [default: txt,docx,pdf]
    #[arg(long, value_delimiter = ',')]
    pub formats: Option<Vec<ReportFormat>>,

    /// Unicode TTF font for PDF reports (overrides LEXREVIEW_REPORT_FONT)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Print the result only, write no report files
    #[arg(long)]
    pub no_reports: bool,
}

impl OutputArgs {
    pub fn formats(&self) -> Vec<ReportFormat> {
        self.formats
            .clone()
            .unwrap_or_else(|| ReportFormat::ALL.to_vec())
    }
}

/// CLI flags as configuration overrides
pub fn overrides(connection: &ConnectionArgs, output: &OutputArgs) -> ConfigOverrides {
    ConfigOverrides {
        api_key: connection.api_key.clone(),
        api_base: connection.api_base.clone(),
        model: connection.model,
        output_dir: output.out_dir.clone(),
        report_font: output.font.clone(),
    }
}
