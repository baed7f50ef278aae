use std::path::Path;

use crate::document::{extract_or_describe, Document, DocumentParser};
use crate::error::AppError;

/// Text of a document on disk, or the description of why it could not be read
pub fn extract_file(path: &Path) -> Result<String, AppError> {
    let document = Document::read(path)?;
    Ok(extract_or_describe(&DocumentParser::new(), &document))
}

pub fn run(path: &Path) -> Result<(), AppError> {
    let text = extract_file(path)?;
    println!("{}", text);
    Ok(())
}
