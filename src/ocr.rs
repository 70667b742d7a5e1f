// lingo-live/src/ocr.rs

// ============================================================================
// MÓDULO OCR - Extração de texto da imagem capturada
// ============================================================================
//
// Dois backends:
// 1. Tesseract (padrão, multiplataforma, multi-idioma)
// 2. Windows OCR nativo (só no Windows, usa os idiomas do perfil)
//
// ============================================================================

pub mod tesseract;
#[cfg(windows)]
pub mod windows_ocr;

use anyhow::Result;
use image::DynamicImage;

use crate::config::Settings;

/// Contrato do OCR Adapter
pub trait TextRecognizer: Send + Sync {
    /// Nome do motor (para logs e mensagens)
    fn name(&self) -> &'static str;

    /// Verifica se o motor está instalado e utilizável
    fn is_available(&self) -> bool;

    /// Extrai o texto da imagem já normalizado (espaços simples).
    ///
    /// `preprocess` aplica escala de cinza + contraste antes do OCR.
    fn extract_text(&self, image: &DynamicImage, preprocess: bool) -> Result<String>;
}

/// Cria o motor de OCR configurado
pub fn build_recognizer(settings: &Settings) -> Box<dyn TextRecognizer> {
    match settings.ocr_engine.to_lowercase().as_str() {
        #[cfg(windows)]
        "windows" => {
            info!("🔍 OCR: Windows OCR nativo");
            Box::new(windows_ocr::WindowsOcr)
        }
        "tesseract" => {
            info!("🔍 OCR: Tesseract");
            Box::new(tesseract::TesseractOcr::new(&settings.tesseract_cmd))
        }
        other => {
            warn!("⚠️  Motor de OCR '{}' não reconhecido, usando Tesseract", other);
            Box::new(tesseract::TesseractOcr::new(&settings.tesseract_cmd))
        }
    }
}

/// Junta todas as sequências de espaço/quebra de linha em um espaço só
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
