pub mod client;
pub mod credentials;
pub mod http_client;
pub mod prompts;
pub mod types;

pub use client::*;
pub use credentials::*;
pub use prompts::build_analysis_prompt;
pub use types::*;
