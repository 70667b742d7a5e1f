// lingo-live/src/app_state.rs

// ============================================================================
// MÓDULO APP STATE - Modelo de dados do pipeline
// ============================================================================
// Contém as estruturas que circulam entre a UI e as threads de trabalho:
// - ScreenRegion: retângulo selecionado pelo usuário
// - CaptureResult: bitmap capturado + origem na tela
// - TranslationJob: texto + idioma de destino
// - PipelineState: estado único do coordenador
// - AppCommand / PipelineEvent: mensagens entre threads
// ============================================================================

use image::DynamicImage;

use crate::error::PipelineError;

/// Tamanho mínimo (em pixels, exclusivo) de cada lado da seleção.
/// Seleções com largura ou altura <= 10px contam como cancelamento.
pub const MIN_SELECTION_SIZE: i32 = 10;

// ============================================================================
// REGIÃO DA TELA
// ============================================================================

/// Retângulo em pixels de tela, sempre normalizado (x2 > x1, y2 > y1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ScreenRegion {
    /// Monta a região a partir do ponto de clique e do ponto de soltura.
    ///
    /// Retorna `None` quando algum lado tem 10px ou menos.
    pub fn from_drag(press: (i32, i32), release: (i32, i32)) -> Option<Self> {
        let x1 = press.0.min(release.0);
        let y1 = press.1.min(release.1);
        let x2 = press.0.max(release.0);
        let y2 = press.1.max(release.1);

        if x2 - x1 <= MIN_SELECTION_SIZE || y2 - y1 <= MIN_SELECTION_SIZE {
            return None;
        }

        Some(ScreenRegion { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x1, self.y1)
    }
}

// ============================================================================
// RESULTADO DA CAPTURA
// ============================================================================

/// Bitmap capturado + posição de origem (canto superior esquerdo)
pub struct CaptureResult {
    pub image: DynamicImage,
    pub origin: (i32, i32),
}

impl std::fmt::Debug for CaptureResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureResult")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("origin", &self.origin)
            .finish()
    }
}

/// Pedido de tradução (um por vez)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub source_text: String,
    pub target_language_code: String,
}

impl TranslationJob {
    pub fn new(source_text: impl Into<String>, target_language_code: impl Into<String>) -> Self {
        TranslationJob {
            source_text: source_text.into(),
            target_language_code: target_language_code.into(),
        }
    }
}

// ============================================================================
// ESTADO DO PIPELINE
// ============================================================================

/// Estado único do coordenador. Só a thread da UI escreve nele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Selecting,
    Capturing,
    RecognizingText,
    Translating,
    ShowingResult,
    ShowingError,
}

impl PipelineState {
    /// Estados passivos aceitam uma nova seleção; os demais estão "em voo"
    pub fn accepts_trigger(self) -> bool {
        matches!(
            self,
            PipelineState::Idle | PipelineState::ShowingResult | PipelineState::ShowingError
        )
    }

    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            PipelineState::Capturing | PipelineState::RecognizingText | PipelineState::Translating
        )
    }
}

// ============================================================================
// COMANDOS ENTRE THREADS
// ============================================================================

/// Comandos enviados da thread de hotkeys para a thread da UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Inicia uma nova seleção de região
    NewSelection,
    /// Encerra a aplicação
    Quit,
}

/// Etapas que a thread de trabalho reporta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capturing,
    RecognizingText,
    Translating,
}

impl From<Stage> for PipelineState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Capturing => PipelineState::Capturing,
            Stage::RecognizingText => PipelineState::RecognizingText,
            Stage::Translating => PipelineState::Translating,
        }
    }
}

/// Saída de uma execução bem sucedida
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub original: String,
    pub translated: String,
}

/// Mensagens enviadas das threads de trabalho para a thread da UI
#[derive(Debug)]
pub enum PipelineEvent {
    /// A execução avançou para uma nova etapa
    Stage(Stage),
    /// A execução terminou (resultado ou erro)
    Finished(Result<PipelineOutput, PipelineError>),
    /// Resumo pedido pelo usuário ficou pronto
    Summary(String),
}
