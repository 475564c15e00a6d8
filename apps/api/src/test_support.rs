//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::config::{Config, ModelSettings};
use crate::llm_client::{Completion, LlmError};
use crate::references::StaticReferenceSource;
use crate::session::InMemorySessionStore;
use crate::state::AppState;

pub fn model_settings() -> ModelSettings {
    ModelSettings {
        model: "test-model".to_string(),
        temperature: 0.5,
    }
}

pub fn test_config() -> Config {
    Config {
        completion_api_key: "test-key".to_string(),
        completion_base_url: "http://127.0.0.1:1".to_string(),
        model: model_settings(),
        clause_index_url: None,
        redis_url: None,
        session_ttl_secs: 60,
        negotiation_rounds: 2,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// App state wired to in-process fakes.
pub fn test_state(llm: Arc<dyn Completion>) -> AppState {
    AppState {
        llm,
        references: Arc::new(StaticReferenceSource(vec!["Index clause".to_string()])),
        sessions: Arc::new(InMemorySessionStore::new()),
        http: reqwest::Client::new(),
        config: test_config(),
    }
}

/// Replies with scripted texts in order and records every request.
/// Once the script runs out, echoes a numbered reply.
#[derive(Default)]
pub struct RecordingCompletion {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String, f32)>>,
}

impl RecordingCompletion {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _, _)| p.clone())
            .collect()
    }

    pub fn models(&self) -> Vec<(String, f32)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m, t)| (m.clone(), *t))
            .collect()
    }
}

#[async_trait]
impl Completion for RecordingCompletion {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((prompt.to_string(), model.to_string(), temperature));
        let n = calls.len();
        drop(calls);

        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("reply {n}")))
    }
}

/// Always fails like an exhausted upstream quota.
pub struct FailingCompletion;

#[async_trait]
impl Completion for FailingCompletion {
    async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        })
    }
}

/// Succeeds for the first `ok_calls` requests, then fails.
pub struct FlakyCompletion {
    ok_calls: usize,
    seen: Mutex<usize>,
}

impl FlakyCompletion {
    pub fn failing_after(ok_calls: usize) -> Self {
        Self {
            ok_calls,
            seen: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Completion for FlakyCompletion {
    async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, LlmError> {
        let mut seen = self.seen.lock().unwrap();
        *seen += 1;
        if *seen > self.ok_calls {
            Err(LlmError::EmptyContent)
        } else {
            Ok(format!("response {}", *seen))
        }
    }
}

/// Holds back any prompt containing `needle` until `release` is notified;
/// `entered` fires once such a call is waiting. Other prompts reply at once.
pub struct GatedCompletion {
    needle: String,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedCompletion {
    pub fn holding(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl Completion for GatedCompletion {
    async fn complete(&self, prompt: &str, _: &str, _: f32) -> Result<String, LlmError> {
        if prompt.contains(&self.needle) {
            let released = self.release.notified();
            self.entered.notify_one();
            released.await;
            return Ok("gated reply".to_string());
        }
        Ok("ungated reply".to_string())
    }
}

/// A two-page PDF: page one has no content stream, page two shows `text`
/// in Helvetica. Cross-reference offsets are computed, not hard-coded.
pub fn two_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 /MediaBox [0 0 612 792] >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << >> >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 6 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}
