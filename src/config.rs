// lingo-live/src/config.rs

// ============================================================================
// MÓDULO CONFIG - Configurações da aplicação (settings.json)
// ============================================================================
//
// As configurações são um objeto JSON "plano" (chave -> valor). Ao carregar,
// os valores padrão são mesclados por baixo das chaves presentes no arquivo.
// Toda alteração reescreve o arquivo inteiro.
//
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Idiomas suportados: (código, nome de exibição)
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
];

/// Idioma de destino padrão
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Nome de exibição de um código de idioma
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn is_supported_language(code: &str) -> bool {
    language_name(code).is_some()
}

/// Estrutura principal de configuração (chaves planas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Atalho para nova seleção (ex: "ctrl+alt+t")
    pub hotkey: String,
    /// Atalho para sair (string vazia desativa)
    pub exit_hotkey: String,
    /// Opacidade do overlay (0.2 - 1.0)
    pub opacity: f32,
    /// "Dark" ou "Light"
    pub theme: String,
    /// Nome da fonte; nomes de largura fixa (Consolas, Courier, ...) usam
    /// a família monoespaçada
    pub font_family: String,
    pub font_size: f32,
    /// Arquivo .ttf/.otf opcional usado no texto do overlay
    pub font_path: String,
    /// Último idioma de destino escolhido
    pub target_language: String,
    /// "tesseract" ou "windows"
    pub ocr_engine: String,
    /// Caminho do executável do tesseract (vazio = PATH)
    pub tesseract_cmd: String,
    /// "google", "deepl" ou "libretranslate"
    pub translation_provider: String,
    pub deepl_api_key: String,
    pub libretranslate_url: String,
    pub gemini_api_key: String,
    pub tts_enabled: bool,
    /// Timeout das chamadas HTTP dos adapters (segundos)
    pub request_timeout_secs: u64,
    /// Espera antes da captura para o seletor sumir da tela
    pub capture_delay_ms: u64,
    pub overlay_width: f32,
    pub overlay_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hotkey: "ctrl+alt+t".to_string(),
            exit_hotkey: "ctrl+alt+q".to_string(),
            opacity: 0.95,
            theme: "Dark".to_string(),
            font_family: "Segoe UI".to_string(),
            font_size: 14.0,
            font_path: String::new(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            ocr_engine: "tesseract".to_string(),
            tesseract_cmd: String::new(),
            translation_provider: "google".to_string(),
            deepl_api_key: String::new(),
            libretranslate_url: "http://localhost:5000".to_string(),
            gemini_api_key: String::new(),
            tts_enabled: false,
            request_timeout_secs: 20,
            capture_delay_ms: 150,
            overlay_width: 450.0,
            overlay_height: 200.0,
        }
    }
}

impl Settings {
    /// Caminho padrão do arquivo de configurações
    pub const SETTINGS_FILE: &'static str = "settings.json";

    /// Carrega do caminho padrão e aplica fallback das variáveis de ambiente
    pub fn load() -> Self {
        // Carrega variáveis de ambiente (.env) como fallback
        dotenvy::dotenv().ok();

        let mut settings = Self::load_from(Path::new(Self::SETTINGS_FILE));
        settings.apply_env_fallbacks();
        settings
    }

    /// Carrega configurações de um arquivo, mesclando com os padrões.
    ///
    /// Arquivo ausente ou inválido resulta nos valores padrão.
    pub fn load_from(path: &Path) -> Self {
        info!("📋 Carregando configurações de {:?}...", path);

        if !path.exists() {
            info!("   settings.json não encontrado, usando padrões");
            return Settings::default();
        }

        match Self::read_merged(path) {
            Ok(settings) => {
                info!("✅ Configurações carregadas");
                settings
            }
            Err(e) => {
                warn!("⚠️  Erro ao carregar configurações: {:#}", e);
                warn!("   Usando valores padrão");
                Settings::default()
            }
        }
    }

    fn read_merged(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("Falha ao ler settings.json")?;

        let loaded: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&contents).context("Falha ao parsear settings.json")?;

        // Padrões por baixo, chaves do arquivo por cima
        let mut merged = match serde_json::to_value(Settings::default())? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in loaded {
            merged.insert(key, value);
        }

        serde_json::from_value(serde_json::Value::Object(merged))
            .context("Valores inválidos em settings.json")
    }

    /// Salva configurações no arquivo (reescreve tudo)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Falha ao serializar configurações")?;

        fs::write(path, json).with_context(|| format!("Falha ao escrever {:?}", path))?;

        info!("💾 Configurações salvas em {:?}", path);
        Ok(())
    }

    /// Altera uma chave e persiste imediatamente.
    ///
    /// A chave precisa existir e o valor precisa ter o tipo certo.
    pub fn set(&mut self, path: &Path, key: &str, value: serde_json::Value) -> Result<()> {
        let mut map = match serde_json::to_value(&*self)? {
            serde_json::Value::Object(map) => map,
            _ => anyhow::bail!("Configurações não são um objeto JSON"),
        };

        if !map.contains_key(key) {
            anyhow::bail!("Chave de configuração desconhecida: {}", key);
        }
        map.insert(key.to_string(), value);

        let updated: Settings = serde_json::from_value(serde_json::Value::Object(map))
            .with_context(|| format!("Valor inválido para '{}'", key))?;

        *self = updated;
        self.save_to(path)
    }

    /// API keys: prioriza settings.json, fallback pro .env
    fn apply_env_fallbacks(&mut self) {
        if self.deepl_api_key.is_empty() {
            self.deepl_api_key = env::var("DEEPL_API_KEY").unwrap_or_default();
        }
        if self.gemini_api_key.is_empty() {
            self.gemini_api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        }
    }

    /// Opacidade limitada a uma faixa visível
    pub fn clamped_opacity(&self) -> f32 {
        self.opacity.clamp(0.2, 1.0)
    }

    /// Idioma de destino válido (cai no padrão se o salvo não existir)
    pub fn initial_language(&self) -> String {
        if is_supported_language(&self.target_language) {
            self.target_language.clone()
        } else {
            DEFAULT_TARGET_LANGUAGE.to_string()
        }
    }
}

/// Caminho padrão do settings.json (diretório atual)
pub fn settings_path() -> PathBuf {
    PathBuf::from(Settings::SETTINGS_FILE)
}
