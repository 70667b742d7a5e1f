// lingo-live/src/error.rs

// ============================================================================
// MÓDULO ERROR - Taxonomia de erros do pipeline
// ============================================================================

use thiserror::Error;

/// Falhas possíveis de uma execução do pipeline.
///
/// Todas são convertidas em `ShowingError` pelo coordenador; nenhuma
/// derruba o processo. Cancelar a seleção não é erro: chega como
/// `SelectionOutcome::Cancelled` e volta para `Idle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Screen capture failed: {0}")]
    CaptureFailure(String),

    #[error("No text detected")]
    NoTextDetected,

    #[error("OCR failed: {0}")]
    OcrFailure(String),

    #[error("Translation failed: {0}")]
    TranslationFailure(String),

    /// Adapter não instalado ou mal configurado (OCR, tradução, resumo, TTS)
    #[error("{0} is not available")]
    AdapterUnavailable(String),

    /// Panic dentro da thread de trabalho
    #[error("Unexpected worker failure: {0}")]
    WorkerPanicked(String),
}

impl PipelineError {
    /// Mensagem exibida no overlay
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
