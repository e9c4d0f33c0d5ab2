//! llm.rs
//!
//! Blocking client for the local Ollama generation service. One call
//! per uncommented test; no retry, no cache.

use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GtscribeError, Result};

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen3:4b";

// Local generation can be very slow; the call blocks the whole run.
const GENERATION_TIMEOUT_SECS: u64 = 3000;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaClient {
    http: reqwest::blocking::Client,
    host: String,
    model: String,
    think_re: Regex,
    tag_re: Regex,
}

impl OllamaClient {
    pub fn new(host: String, model: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()
            .map_err(|e| GtscribeError::Generation {
                detail: e.to_string(),
            })?;

        Ok(Self {
            http,
            host,
            model,
            think_re: Regex::new(r"(?s)<think>.*?</think>").unwrap(),
            tag_re: Regex::new(r"</?[^>]+>").unwrap(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for one sanitized plain-English sentence describing
    /// what `code` verifies. The ≤100-character instruction is advisory:
    /// callers must wrap defensively.
    pub fn summarize(&self, code: &str) -> Result<String> {
        let prompt = build_prompt(code);
        let url = format!("{}/api/generate", self.host);

        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            temperature: 0.1,
            top_p: 0.9,
            max_tokens: 64,
        };

        tracing::debug!(url = %url, model = %self.model, "requesting summary");
        let started = Instant::now();

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| GtscribeError::Generation {
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GtscribeError::Generation {
                detail: format!("{} from {}", status, url),
            });
        }

        let text = resp.text().map_err(|e| GtscribeError::Generation {
            detail: e.to_string(),
        })?;
        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| GtscribeError::Generation {
                detail: format!("bad response body: {e}"),
            })?;

        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "summary received");
        Ok(self.sanitize(&parsed.response))
    }

    /// Strip reasoning spans and stray markup, collapse whitespace.
    fn sanitize(&self, raw: &str) -> String {
        let no_think = self.think_re.replace_all(raw, "");
        let no_tags = self.tag_re.replace_all(&no_think, "");
        no_tags.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn build_prompt(code: &str) -> String {
    let mut out = String::new();

    out.push_str(
        "You summarise C++ GoogleTest cases. \
         Return ONE plain-English sentence, at most 100 characters. \
         Do NOT mention fixture or test names. \
         Do NOT emit tags, markup, or commentary. \
         Output the sentence only.\n\n",
    );
    out.push_str(
        "### Instruction: In ONE SHORT sentence only (up to 100 characters), \
         say what this C++ GoogleTest verifies. \
         Use plain English; do not mention fixture or test names. \
         Provide nothing except the description of what the test does. \
         Do NOT include <think> blocks, explanations or tags.\n\n",
    );
    out.push_str("```cpp\n");
    out.push_str(code);
    out.push_str("\n```\n\n### Answer:\n");

    out
}
