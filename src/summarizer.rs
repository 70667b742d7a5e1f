// lingo-live/src/summarizer.rs

// ============================================================================
// MÓDULO SUMMARIZER - Resumo do texto usando Gemini (REST)
// ============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use crate::config::{language_name, Settings};

const GEMINI_MODEL: &str = "gemini-2.5-flash";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

pub struct Summarizer {
    api_key: String,
    timeout: Duration,
}

impl Summarizer {
    pub fn from_settings(settings: &Settings) -> Self {
        Summarizer {
            api_key: settings.gemini_api_key.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
        }
    }

    /// Sem API key o botão de resumo nem aparece
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Resume o texto no idioma pedido. Nunca falha: erros viram texto.
    pub fn summarize(&self, text: &str, target_lang: &str) -> String {
        if !self.is_available() {
            return "Gemini service is not available.".to_string();
        }

        if text.trim().is_empty() {
            return "No text to summarize.".to_string();
        }

        info!("📄 [Gemini] Gerando resumo...");

        match self.request_summary(&build_prompt(text, target_lang)) {
            Ok(summary) if !summary.trim().is_empty() => {
                info!("✅ [Gemini] Resumo pronto");
                summary
            }
            Ok(_) => "No summary generated.".to_string(),
            Err(e) => {
                error!("❌ [Gemini] {:#}", e);
                format!("Summarization failed: {:#}", e)
            }
        }
    }

    fn request_summary(&self, prompt: &str) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Falha ao criar runtime tokio")?;

        runtime.block_on(async {
            let client = reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .context("Falha ao criar cliente HTTP")?;

            let url = format!(
                "{}/{}:generateContent?key={}",
                GEMINI_URL, GEMINI_MODEL, self.api_key
            );

            let body = GeminiRequest {
                contents: vec![GeminiContent {
                    parts: vec![GeminiPart {
                        text: prompt.to_string(),
                    }],
                }],
            };

            let response = client
                .post(&url)
                .json(&body)
                .send()
                .await
                .context("Falha ao enviar requisição para Gemini")?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                anyhow::bail!("Gemini API erro {}: {}", status, error_text);
            }

            let json: serde_json::Value = response
                .json()
                .await
                .context("Falha ao parsear resposta do Gemini")?;

            Ok(extract_summary(&json))
        })
    }
}

fn build_prompt(text: &str, target_lang: &str) -> String {
    let lang_instruction = match language_name(target_lang) {
        Some(name) => format!(" in {}", name),
        None => " in the same language as the text".to_string(),
    };

    format!(
        "Please summarize the following text concisely{}:\n\n{}",
        lang_instruction, text
    )
}

/// candidates[0].content.parts[*].text
fn extract_summary(json: &serde_json::Value) -> String {
    json.pointer("/candidates/0/content/parts")
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_names_the_target_language() {
        let prompt = build_prompt("Le chat dort.", "es");
        assert!(prompt.starts_with("Please summarize the following text concisely in Spanish:"));
        assert!(prompt.ends_with("Le chat dort."));

        let prompt = build_prompt("x", "xx");
        assert!(prompt.contains("in the same language as the text"));
    }

    #[test]
    fn summary_is_read_from_first_candidate() {
        let response = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Short "}, {"text": "summary"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        });
        assert_eq!(extract_summary(&response), "Short summary");
        assert_eq!(extract_summary(&json!({"error": {}})), "");
    }

    #[test]
    fn without_key_nothing_is_requested() {
        let summarizer = Summarizer::from_settings(&Settings::default());
        assert!(!summarizer.is_available());
        assert_eq!(
            summarizer.summarize("text", "en"),
            "Gemini service is not available."
        );
    }

    #[test]
    fn empty_text_short_circuits() {
        let mut settings = Settings::default();
        settings.gemini_api_key = "key".to_string();
        let summarizer = Summarizer::from_settings(&settings);
        assert_eq!(summarizer.summarize("   ", "en"), "No text to summarize.");
    }
}
