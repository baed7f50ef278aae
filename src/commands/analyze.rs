use std::path::Path;

use crate::ai::{build_analysis_prompt, AnalysisClient, AnalysisRequest};
use crate::cli::{AnalysisOptions, InputArgs, OutputArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::report::{export_all, exporters_for, ExportOutcome, ReportFormat};
use crate::session::{Session, SessionState};

use super::load_text;

/// `prompt`: build and print the prompt, no network call
pub async fn run_prompt(input: &InputArgs, options: &AnalysisOptions) -> Result<(), AppError> {
    let text = load_text(input).await?;
    let request = options.to_request(text);
    tracing::info!(
        "[PromptBuilder] {} dimensions, {} legal areas, custom: {}",
        request.analysis_types.len(),
        request.legal_areas.len(),
        request.custom_instructions().is_some()
    );
    println!("{}", build_analysis_prompt(&request));
    Ok(())
}

/// Validate, prompt, call the model and record the outcome in a fresh session
pub async fn run_pipeline(
    request: &AnalysisRequest,
    config: &AppConfig,
    client: &AnalysisClient,
) -> Result<Session, AppError> {
    let mut session = Session::new();
    session.begin(request, config.api_key.as_ref())?;

    let prompt = build_analysis_prompt(request);
    tracing::info!("[PromptBuilder] Prompt built: {} chars", prompt.len());

    let outcome = client.analyze(&prompt, &config.connection()).await;
    session.finish(outcome)?;
    Ok(session)
}

/// Write every requested report for a completed session
pub fn write_reports(
    session: &Session,
    config: &AppConfig,
    formats: &[ReportFormat],
) -> Vec<ExportOutcome> {
    let Some(input) = session.report_input() else {
        return Vec::new();
    };
    let exporters = exporters_for(formats, config.report_font.clone());
    export_all(&exporters, &input, &config.output_dir)
}

/// `analyze`: the full pipeline, then the downloads
pub async fn run(
    input: &InputArgs,
    options: &AnalysisOptions,
    output: &OutputArgs,
    config: &AppConfig,
) -> Result<(), AppError> {
    let text = load_text(input).await?;
    let request = options.to_request(text);

    let session = run_pipeline(&request, config, &AnalysisClient::new()).await?;

    match session.state() {
        SessionState::Completed { result, .. } => println!("{}", result),
        SessionState::Failed(error) => return Err(AppError::Analysis(error.clone())),
        _ => {}
    }

    if output.no_reports {
        return Ok(());
    }

    println!();
    for outcome in write_reports(&session, config, &output.formats()) {
        match outcome.result {
            Ok(path) => println!("{}", download_line(outcome.format, &path)),
            Err(e) => eprintln!(
                "warning: {} report not written: {} ({})",
                outcome.format,
                e,
                outcome.format.capability_hint()
            ),
        }
    }
    Ok(())
}

/// One offered download: format, MIME type and where it was written
fn download_line(format: ReportFormat, path: &Path) -> String {
    format!("{} report ({}): {}", format, format.mime_type(), path.display())
}
