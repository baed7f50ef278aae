//! Per-interaction analysis state
//!
//! A `Session` owns the result of the most recent analysis. Starting a new
//! analysis discards whatever the previous one left behind.

use serde::Serialize;

use crate::ai::{AnalysisError, AnalysisRequest, Credential, ValidationError};
use crate::report::ReportInput;

/// Where the session is in its analysis lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    NoResult,
    AnalysisPending,
    Completed { result: String, input_text: String },
    Failed(AnalysisError),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::NoResult => "no_result",
            Self::AnalysisPending => "analysis_pending",
            Self::Completed { .. } => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {action} while session is {state}")]
    IllegalTransition {
        action: &'static str,
        state: &'static str,
    },
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    /// Text of the request in flight
    pending_text: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::NoResult,
            pending_text: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Validate the request and enter `AnalysisPending`.
    ///
    /// A rejected request leaves the current state untouched.
    pub fn begin(
        &mut self,
        request: &AnalysisRequest,
        credential: Option<&Credential>,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::AnalysisPending {
            return Err(self.illegal("begin an analysis"));
        }
        request.validate(credential)?;

        if !matches!(self.state, SessionState::NoResult) {
            tracing::info!("[Session] Discarding previous {} state", self.state.name());
        }

        self.pending_text = Some(request.text.clone());
        self.state = SessionState::AnalysisPending;
        Ok(())
    }

    pub fn complete(&mut self, result: String) -> Result<(), SessionError> {
        let input_text = self.take_pending("complete")?;
        tracing::info!("[Session] Analysis completed: {} chars", result.len());
        self.state = SessionState::Completed { result, input_text };
        Ok(())
    }

    pub fn fail(&mut self, error: AnalysisError) -> Result<(), SessionError> {
        self.take_pending("fail")?;
        tracing::info!("[Session] Analysis failed: {}", error.message);
        self.state = SessionState::Failed(error);
        Ok(())
    }

    /// Settle a pending analysis from the client's outcome
    pub fn finish(&mut self, outcome: Result<String, AnalysisError>) -> Result<(), SessionError> {
        match outcome {
            Ok(result) => self.complete(result),
            Err(error) => self.fail(error),
        }
    }

    /// Report material, only once an analysis has completed
    pub fn report_input(&self) -> Option<ReportInput<'_>> {
        match &self.state {
            SessionState::Completed { result, input_text } => {
                Some(ReportInput::new(result, input_text))
            }
            _ => None,
        }
    }

    fn take_pending(&mut self, action: &'static str) -> Result<String, SessionError> {
        if self.state != SessionState::AnalysisPending {
            return Err(self.illegal(action));
        }
        Ok(self.pending_text.take().unwrap_or_default())
    }

    fn illegal(&self, action: &'static str) -> SessionError {
        SessionError::IllegalTransition {
            action,
            state: self.state.name(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
