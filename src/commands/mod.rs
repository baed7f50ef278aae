//! Subcommand handlers
//!
//! Each handler runs one user action to completion. Results go to stdout,
//! diagnostics go through `tracing` to stderr.

pub mod analyze;
pub mod extract;
pub mod models;

use crate::cli::InputArgs;
use crate::error::AppError;

/// Resolve the selected text source into the text to analyze.
///
/// Documents that fail to parse yield the failure description as their
/// text, so the pipeline keeps going with it.
pub async fn load_text(input: &InputArgs) -> Result<String, AppError> {
    if let Some(path) = &input.file {
        return extract::extract_file(path);
    }
    if let Some(path) = &input.text_file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AppError::Input {
                path: path.clone(),
                source,
            });
    }
    Ok(input.text.clone().unwrap_or_default())
}
