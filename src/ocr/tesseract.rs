// lingo-live/src/ocr/tesseract.rs

// ============================================================================
// BACKEND TESSERACT
// ============================================================================
//
// Usa os pacotes de idioma instalados, na ordem de prioridade abaixo.
// Se nenhum da lista estiver instalado, cai para inglês.
//
// ============================================================================

use anyhow::{Context, Result};
use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use super::{normalize_whitespace, TextRecognizer};
use crate::screenshot;

/// Idiomas tentados, em ordem de prioridade
pub const LANGUAGE_PRIORITY: &[&str] = &[
    "eng", "hin", "jpn", "chi_sim", "chi_tra", "kor", "fra", "deu", "spa", "rus", "ara", "por",
    "ita",
];

/// Idioma usado quando nada da lista está instalado
pub const FALLBACK_LANGUAGE: &str = "eng";

/// Caminhos comuns de instalação no Windows
#[cfg(windows)]
const COMMON_INSTALL_DIRS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];

pub struct TesseractOcr {
    available: OnceLock<bool>,
    languages: OnceLock<Vec<String>>,
}

impl TesseractOcr {
    /// `tesseract_cmd` vazio = usa o executável do PATH
    pub fn new(tesseract_cmd: &str) -> Self {
        if !tesseract_cmd.is_empty() {
            add_to_path(Path::new(tesseract_cmd));
        } else {
            #[cfg(windows)]
            if rusty_tesseract::get_tesseract_version().is_err() {
                for dir in COMMON_INSTALL_DIRS {
                    let exe = Path::new(dir).join("tesseract.exe");
                    if exe.exists() {
                        add_to_path(&exe);
                        break;
                    }
                }
            }
        }

        TesseractOcr {
            available: OnceLock::new(),
            languages: OnceLock::new(),
        }
    }

    /// Idiomas efetivamente usados (consulta o tesseract só uma vez)
    fn languages(&self) -> &[String] {
        self.languages.get_or_init(|| match rusty_tesseract::get_tesseract_langs() {
            Ok(installed) => {
                let selected = select_languages(&installed);
                info!("   🌍 Idiomas do Tesseract: {}", selected.join("+"));
                selected
            }
            Err(e) => {
                warn!("⚠️  Não foi possível listar idiomas do Tesseract: {}", e);
                vec![FALLBACK_LANGUAGE.to_string()]
            }
        })
    }

    fn recognize(&self, image: &Image, lang: &str) -> Result<String> {
        let args = Args {
            lang: lang.to_string(),
            config_variables: HashMap::new(),
            dpi: None,
            psm: Some(6),
            oem: Some(3),
        };

        let text = rusty_tesseract::image_to_string(image, &args)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Falha ao executar Tesseract")?;

        Ok(normalize_whitespace(&text))
    }
}

impl TextRecognizer for TesseractOcr {
    fn name(&self) -> &'static str {
        "Tesseract OCR"
    }

    fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| rusty_tesseract::get_tesseract_version().is_ok())
    }

    fn extract_text(&self, image: &DynamicImage, preprocess: bool) -> Result<String> {
        if !self.is_available() {
            anyhow::bail!("Tesseract não encontrado");
        }

        let prepared = if preprocess {
            screenshot::preprocess_image(image)
        } else {
            image.clone()
        };

        let tess_image = Image::from_dynamic_image(&prepared)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Falha ao preparar imagem para o Tesseract")?;

        let lang = self.languages().join("+");

        match self.recognize(&tess_image, &lang) {
            Ok(text) => Ok(text),
            Err(e) => {
                // Tenta de novo só com inglês antes de desistir
                warn!("⚠️  OCR com '{}' falhou: {:#}", lang, e);
                match self.recognize(&tess_image, FALLBACK_LANGUAGE) {
                    Ok(text) => Ok(text),
                    Err(e) => {
                        error!("❌ OCR falhou também com '{}': {:#}", FALLBACK_LANGUAGE, e);
                        Ok(String::new())
                    }
                }
            }
        }
    }
}

/// Interseção da lista de prioridade com os idiomas instalados
pub fn select_languages(installed: &[String]) -> Vec<String> {
    let selected: Vec<String> = LANGUAGE_PRIORITY
        .iter()
        .filter(|lang| installed.iter().any(|i| i == *lang))
        .map(|lang| lang.to_string())
        .collect();

    if selected.is_empty() {
        vec![FALLBACK_LANGUAGE.to_string()]
    } else {
        selected
    }
}

/// Coloca a pasta do executável no início do PATH
fn add_to_path(exe: &Path) {
    let Some(dir) = exe.parent() else {
        return;
    };

    let current = std::env::var_os("PATH").unwrap_or_default();
    let mut paths: Vec<_> = std::env::split_paths(&current).collect();
    if paths.iter().any(|p| p == dir) {
        return;
    }
    paths.insert(0, dir.to_path_buf());

    match std::env::join_paths(paths) {
        Ok(joined) => {
            std::env::set_var("PATH", joined);
            info!("   📂 Tesseract em: {:?}", dir);
        }
        Err(e) => warn!("⚠️  Caminho do Tesseract inválido: {}", e),
    }
}
