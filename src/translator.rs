// lingo-live/src/translator.rs

// ============================================================================
// MÓDULO TRANSLATOR - Tradução usando múltiplos provedores
// ============================================================================
//
// Provedores suportados:
// - Google Translate (grátis, sem API key, padrão)
// - DeepL (requer API key)
// - LibreTranslate (servidor próprio, URL configurável)
//
// O idioma de origem é sempre detectado automaticamente. Se o provedor
// escolhido falhar, tenta o Google. Se o Google também falhar, devolve
// "[Translation failed: motivo]" no lugar da tradução.
//
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_state::TranslationJob;
use crate::config::Settings;

/// Contrato do Translation Adapter (chamado da thread de trabalho)
pub trait Translator: Send + Sync {
    /// Traduz `job.source_text` para `job.target_language_code`.
    /// Texto vazio devolve vazio.
    fn translate(&self, job: &TranslationJob) -> Result<String>;
}

const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const DEEPL_URL: &str = "https://api-free.deepl.com/v2/translate";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// ESTRUTURAS DE DADOS - DeepL / LibreTranslate
// ============================================================================

#[derive(Debug, Serialize)]
struct DeepLRequest {
    text: Vec<String>,
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: String,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: String,
}

// ============================================================================
// PROVEDOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    DeepL,
    LibreTranslate,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "google" => Provider::Google,
            "deepl" => Provider::DeepL,
            "libretranslate" | "libre" => Provider::LibreTranslate,
            other => {
                warn!("⚠️  Provedor '{}' não reconhecido, usando Google", other);
                Provider::Google
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::DeepL => "DeepL",
            Provider::LibreTranslate => "LibreTranslate",
        }
    }
}

/// Tradutor HTTP com fallback para o Google
pub struct HttpTranslator {
    provider: Provider,
    deepl_api_key: String,
    libretranslate_url: String,
    timeout: Duration,
}

impl HttpTranslator {
    pub fn from_settings(settings: &Settings) -> Self {
        let provider = Provider::from_name(&settings.translation_provider);
        info!("🌐 Tradução: {}", provider.label());

        HttpTranslator {
            provider,
            deepl_api_key: settings.deepl_api_key.clone(),
            libretranslate_url: settings.libretranslate_url.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
        }
    }

    async fn translate_async(&self, text: &str, target_lang: &str) -> String {
        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(e) => return failure_text(&e.to_string()),
        };

        if self.provider != Provider::Google {
            let primary = match self.provider {
                Provider::DeepL => {
                    translate_deepl(&client, &self.deepl_api_key, text, target_lang).await
                }
                _ => translate_libre(&client, &self.libretranslate_url, text, target_lang).await,
            };

            match primary {
                Ok(translated) => return translated,
                Err(e) => {
                    warn!(
                        "⚠️  [{}] falhou: {:#}. Tentando Google...",
                        self.provider.label(),
                        e
                    );
                }
            }
        }

        match translate_google(&client, text, target_lang).await {
            Ok(translated) => translated,
            Err(e) => {
                error!("❌ [Google] falhou: {:#}", e);
                failure_text(&format!("{:#}", e))
            }
        }
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, job: &TranslationJob) -> Result<String> {
        let text = job.source_text.as_str();
        let target_lang = job.target_language_code.as_str();

        if text.trim().is_empty() {
            return Ok(String::new());
        }

        // Runtime próprio por chamada: a thread de trabalho não é async
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Falha ao criar runtime tokio")?;

        info!("🌐 [{}] Traduzindo para '{}'...", self.provider.label(), target_lang);
        let translated = runtime.block_on(self.translate_async(text, target_lang));
        info!("✅ Tradução concluída!");

        Ok(translated)
    }
}

/// Texto exibido quando todos os provedores falham
pub fn failure_text(reason: &str) -> String {
    format!("[Translation failed: {}]", reason)
}

// ============================================================================
// GOOGLE TRANSLATE (GRÁTIS, SEM API KEY)
// ============================================================================

async fn translate_google(client: &reqwest::Client, text: &str, target: &str) -> Result<String> {
    let url = format!(
        "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
        GOOGLE_URL,
        convert_lang_code_to_google(target),
        urlencoding::encode(text)
    );

    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .context("Falha ao enviar requisição para Google Translate")?;

    if !response.status().is_success() {
        anyhow::bail!("Google Translate erro: {}", response.status());
    }

    let response_text = response.text().await?;
    parse_google_response(&response_text)
}

/// Parseia a resposta JSON do Google Translate
/// O formato é um array aninhado: [[["texto traduzido","texto original",...],...],...]
fn parse_google_response(response: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(response).context("Falha ao parsear resposta do Google")?;

    let translated: String = json
        .get(0)
        .and_then(|sentences| sentences.as_array())
        .map(|sentences| {
            sentences
                .iter()
                .filter_map(|sentence| sentence.get(0).and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if translated.is_empty() {
        anyhow::bail!("Não foi possível extrair tradução da resposta");
    }

    Ok(translated)
}

/// Códigos da tabela de idiomas -> formato do Google
fn convert_lang_code_to_google(lang: &str) -> String {
    match lang.to_uppercase().as_str() {
        "PT-BR" | "PT-PT" => "pt".to_string(),
        "EN-US" | "EN-GB" => "en".to_string(),
        "ZH" | "ZH-CN" => "zh-CN".to_string(),
        "ZH-TW" => "zh-TW".to_string(),
        code => code.to_lowercase(),
    }
}

// ============================================================================
// DeepL
// ============================================================================

async fn translate_deepl(
    client: &reqwest::Client,
    api_key: &str,
    text: &str,
    target: &str,
) -> Result<String> {
    if api_key.is_empty() {
        anyhow::bail!("DeepL API key não configurada");
    }

    let request_body = DeepLRequest {
        text: vec![text.to_string()],
        target_lang: convert_lang_code_to_deepl(target),
    };

    let response = client
        .post(DEEPL_URL)
        .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
        .json(&request_body)
        .send()
        .await
        .context("Falha ao enviar requisição para DeepL")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("DeepL API erro {}: {}", status, error_text);
    }

    let deepl_response: DeepLResponse = response
        .json()
        .await
        .context("Falha ao parsear resposta DeepL")?;

    deepl_response
        .translations
        .into_iter()
        .next()
        .map(|t| t.text)
        .context("DeepL não retornou tradução")
}

/// Códigos da tabela de idiomas -> formato do DeepL
fn convert_lang_code_to_deepl(lang: &str) -> String {
    match lang.to_lowercase().as_str() {
        "en" => "EN-US".to_string(),
        "pt" => "PT-BR".to_string(),
        "zh-cn" | "zh-tw" | "zh" => "ZH".to_string(),
        code => code.to_uppercase(),
    }
}

// ============================================================================
// LibreTranslate
// ============================================================================

async fn translate_libre(
    client: &reqwest::Client,
    base_url: &str,
    text: &str,
    target: &str,
) -> Result<String> {
    if base_url.is_empty() {
        anyhow::bail!("URL do LibreTranslate não configurada");
    }

    let url = format!("{}/translate", base_url.trim_end_matches('/'));
    let request_body = LibreRequest {
        q: text,
        source: "auto",
        target: convert_lang_code_to_libre(target),
        format: "text",
    };

    let response = client
        .post(&url)
        .json(&request_body)
        .send()
        .await
        .context("Falha ao enviar requisição para LibreTranslate")?;

    if !response.status().is_success() {
        anyhow::bail!("LibreTranslate erro: {}", response.status());
    }

    let libre_response: LibreResponse = response
        .json()
        .await
        .context("Falha ao parsear resposta LibreTranslate")?;

    Ok(libre_response.translated_text)
}

/// Códigos da tabela de idiomas -> formato do LibreTranslate
fn convert_lang_code_to_libre(lang: &str) -> String {
    match lang.to_lowercase().as_str() {
        "zh-cn" => "zh".to_string(),
        "zh-tw" => "zt".to_string(),
        code => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_response_sentences_are_joined() {
        let body = r#"[[["Hello ","Bonjour ",null,null,10],["world","monde",null,null,10]],null,"fr"]"#;
        assert_eq!(parse_google_response(body).unwrap(), "Hello world");
    }

    #[test]
    fn google_response_without_text_is_an_error() {
        assert!(parse_google_response("[null,null,\"fr\"]").is_err());
        assert!(parse_google_response("<html>").is_err());
    }

    #[test]
    fn language_codes_per_provider() {
        assert_eq!(convert_lang_code_to_google("zh-CN"), "zh-CN");
        assert_eq!(convert_lang_code_to_google("PT-BR"), "pt");
        assert_eq!(convert_lang_code_to_google("fr"), "fr");

        assert_eq!(convert_lang_code_to_deepl("en"), "EN-US");
        assert_eq!(convert_lang_code_to_deepl("zh-TW"), "ZH");
        assert_eq!(convert_lang_code_to_deepl("de"), "DE");

        assert_eq!(convert_lang_code_to_libre("zh-TW"), "zt");
        assert_eq!(convert_lang_code_to_libre("es"), "es");
    }

    #[test]
    fn provider_names_fall_back_to_google() {
        assert_eq!(Provider::from_name("DeepL"), Provider::DeepL);
        assert_eq!(Provider::from_name("libretranslate"), Provider::LibreTranslate);
        assert_eq!(Provider::from_name("lingo"), Provider::Google);
    }

    #[test]
    fn empty_text_is_not_sent_anywhere() {
        let translator = HttpTranslator::from_settings(&Settings::default());
        for blank in ["", "  \n "] {
            let job = TranslationJob::new(blank, "fr");
            assert_eq!(translator.translate(&job).unwrap(), "");
        }
    }

    #[test]
    fn failure_text_is_bracketed() {
        assert_eq!(failure_text("timeout"), "[Translation failed: timeout]");
    }
}
