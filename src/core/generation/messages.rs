//! Wire types for the `generateText` API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateTextRequest<'a> {
    pub prompt: TextPrompt<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPrompt<'a> {
    pub text: &'a str,
}

impl<'a> GenerateTextRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            prompt: TextPrompt { text },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateTextResponse {
    /// Absent when every candidate was filtered out
    #[serde(default)]
    pub candidates: Vec<TextCompletion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextCompletion {
    #[serde(default)]
    pub output: String,
}

impl GenerateTextResponse {
    /// Output of the first candidate.
    pub fn first_output(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.output.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
