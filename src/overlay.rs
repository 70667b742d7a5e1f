// lingo-live/src/overlay.rs

// ============================================================================
// MÓDULO OVERLAY - Janela de resultado (sempre no topo)
// ============================================================================
//
// O overlay é a janela raiz do eframe. Este arquivo guarda só o MODELO
// (texto, status, idioma, visibilidade e pedidos pendentes para a janela).
// O desenho fica em `render.rs`, a aplicação dos pedidos em `commands.rs`
// e fontes/tema em `fonts.rs`.
//
// Esconder a janela = encolher para 1x1. Com a janela realmente invisível
// o `update()` pode parar de ser chamado e os eventos dos workers ficariam
// presos no canal.
//
// ============================================================================

pub mod commands;
pub mod fonts;
pub mod render;

use crate::app_state::{PipelineOutput, ScreenRegion};
use crate::config::{is_supported_language, Settings};
use crate::screenshot::DisplayGeometry;

/// Texto mostrado enquanto o pipeline roda
pub const PROCESSING_TEXT: &str = "⏳ Processing...";

/// Distância (pixels) entre a região selecionada e o overlay
pub const ANCHOR_GAP: i32 = 12;

/// Pedidos para a janela, aplicados no próximo frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowRequest {
    /// Restaura o tamanho normal e traz para frente
    Show,
    /// Encolhe para 1x1
    Hide,
    /// Move para (x, y) em points
    MoveTo(f32, f32),
    /// Fecha a aplicação
    Close,
}

/// Modelo do Result Overlay (só a thread da UI mexe aqui)
#[derive(Debug)]
pub struct ResultOverlay {
    visible: bool,
    text: String,
    status: String,
    language: String,
    summary: Option<String>,
    last_result: Option<PipelineOutput>,
    idle_prompt: String,
    size: (f32, f32),
    display: DisplayGeometry,
    quit_requested: bool,
    pending: Vec<WindowRequest>,
}

impl ResultOverlay {
    pub fn new(settings: &Settings, display: DisplayGeometry) -> Self {
        let idle_prompt = format!(
            "Press {} or click 📷 New to select text on screen.",
            settings.hotkey.to_uppercase()
        );

        ResultOverlay {
            visible: true,
            text: idle_prompt.clone(),
            status: "Ready".to_string(),
            language: settings.initial_language(),
            summary: None,
            last_result: None,
            idle_prompt,
            size: (settings.overlay_width, settings.overlay_height),
            display,
            quit_requested: false,
            pending: Vec::new(),
        }
    }

    // ========================================================================
    // OPERAÇÕES DO OVERLAY
    // ========================================================================

    pub fn hide(&mut self) {
        if self.visible {
            debug!("🙈 Overlay escondido");
        }
        self.visible = false;
        self.pending.push(WindowRequest::Hide);
    }

    fn show(&mut self) {
        self.visible = true;
        self.pending.push(WindowRequest::Show);
    }

    /// Mostra uma mensagem de status no lugar do texto
    pub fn show_status(&mut self, text: &str) {
        self.set_status_text(text);
        self.show();
    }

    /// Como `show_status`, mas posicionado junto da região (fora dela).
    /// Se não houver lugar fora da região, o overlay continua escondido
    /// para não entrar na captura.
    pub fn show_status_near(&mut self, text: &str, region: &ScreenRegion) {
        match anchor_position(region, self.size, &self.display) {
            Some((x, y)) => {
                self.pending.push(WindowRequest::MoveTo(x, y));
                self.show_status(text);
            }
            None => {
                debug!("🪟 Sem espaço fora da região, overlay fica escondido");
                self.set_status_text(text);
            }
        }
    }

    fn set_status_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.status = "Please wait...".to_string();
        self.summary = None;
    }

    /// Mensagem inicial (também usada quando a seleção é cancelada)
    pub fn show_idle(&mut self) {
        self.text = self.idle_prompt.clone();
        self.status = "Ready".to_string();
        self.summary = None;
        self.show();
    }

    pub fn show_result(&mut self, original: &str, translated: &str) {
        self.text = format_result(original, translated);
        self.status = "Drag header to move".to_string();
        self.summary = None;
        self.last_result = Some(PipelineOutput {
            original: original.to_string(),
            translated: translated.to_string(),
        });
        self.show();
    }

    pub fn show_error(&mut self, message: &str) {
        self.text = format!("❌ Error\n{}", message);
        self.status = "Press New to try again".to_string();
        self.summary = None;
        self.last_result = None;
        self.show();
    }

    /// Resumo exibido abaixo do resultado atual
    pub fn show_summary(&mut self, summary: &str) {
        self.summary = Some(summary.to_string());
        self.status = "Summary ready".to_string();
    }

    pub fn set_status_line(&mut self, status: &str) {
        self.status = status.to_string();
    }

    pub fn current_language(&self) -> &str {
        &self.language
    }

    /// Troca o idioma das próximas execuções (a atual não muda)
    pub fn set_current_language(&mut self, code: &str) -> bool {
        if !is_supported_language(code) {
            warn!("⚠️  Idioma não suportado: {}", code);
            return false;
        }
        self.language = code.to_string();
        true
    }

    /// Encerra a aplicação. Chamadas repetidas não fazem nada.
    pub fn quit(&mut self) -> bool {
        if self.quit_requested {
            return false;
        }
        info!("👋 Encerrando...");
        self.quit_requested = true;
        self.pending.push(WindowRequest::Close);
        true
    }

    // ========================================================================
    // LEITURA
    // ========================================================================

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_quitting(&self) -> bool {
        self.quit_requested
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn last_result(&self) -> Option<&PipelineOutput> {
        self.last_result.as_ref()
    }

    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    /// Retira os pedidos pendentes para a janela
    pub fn take_requests(&mut self) -> Vec<WindowRequest> {
        std::mem::take(&mut self.pending)
    }
}

/// Texto exibido para um resultado.
///
/// Original e tradução aparecem mesmo quando são iguais; sem original, só
/// a tradução.
pub fn format_result(original: &str, translated: &str) -> String {
    if original.trim().is_empty() {
        translated.to_string()
    } else {
        format!("📝 Original:\n{}\n\n🌐 Translation:\n{}", original, translated)
    }
}

/// Arrastar pelo cabeçalho só vale fora de maximizado/tela cheia
pub fn can_drag(maximized: bool, fullscreen: bool) -> bool {
    !maximized && !fullscreen
}

/// Posição (points) do overlay junto da região, sem cobrir nenhum pixel
/// dela: embaixo, em cima, à direita ou à esquerda, nessa ordem.
/// `None` quando a região não deixa espaço livre.
pub fn anchor_position(
    region: &ScreenRegion,
    size: (f32, f32),
    display: &DisplayGeometry,
) -> Option<(f32, f32)> {
    let scale = display.scale_factor.max(0.5);
    let width_px = (size.0 * scale).round() as i32;
    let height_px = (size.1 * scale).round() as i32;

    let left = display.x;
    let top = display.y;
    let right = display.x + display.width as i32;
    let bottom = display.y + display.height as i32;

    // Embaixo / em cima: x alinhado com a região
    let x = region.x1.min(right - width_px).max(left);
    let below = region.y2 + ANCHOR_GAP;
    let above = region.y1 - ANCHOR_GAP - height_px;

    // Dos lados: y alinhado com a região
    let y = region.y1.min(bottom - height_px).max(top);
    let beside_right = region.x2 + ANCHOR_GAP;
    let beside_left = region.x1 - ANCHOR_GAP - width_px;

    let (x, y) = if below + height_px <= bottom {
        (x, below)
    } else if above >= top {
        (x, above)
    } else if beside_right + width_px <= right {
        (beside_right, y)
    } else if beside_left >= left {
        (beside_left, y)
    } else {
        return None;
    };

    Some((x as f32 / scale, y as f32 / scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> ResultOverlay {
        ResultOverlay::new(&Settings::default(), DisplayGeometry::default())
    }

    #[test]
    fn starts_visible_with_idle_prompt() {
        let overlay = overlay();
        assert!(overlay.is_visible());
        assert!(overlay.text().contains("CTRL+ALT+T"));
        assert_eq!(overlay.current_language(), "en");
    }

    #[test]
    fn hide_then_show_result_is_visible_with_text() {
        let mut overlay = overlay();
        overlay.hide();
        assert!(!overlay.is_visible());

        overlay.show_result("Bonjour", "Hello");
        assert!(overlay.is_visible());
        assert!(overlay.text().contains("Bonjour"));
        assert!(overlay.text().contains("Hello"));
        assert_eq!(
            overlay.take_requests(),
            vec![WindowRequest::Hide, WindowRequest::Show]
        );
    }

    #[test]
    fn equal_texts_still_show_both_fields() {
        let text = format_result("Hello", "Hello");
        assert_eq!(text, "📝 Original:\nHello\n\n🌐 Translation:\nHello");
        assert_eq!(format_result("", "Hola"), "Hola");
    }

    #[test]
    fn errors_are_shown_with_a_header() {
        let mut overlay = overlay();
        overlay.show_result("a", "b");
        overlay.show_error("Translation failed: HTTP 503");
        assert_eq!(overlay.text(), "❌ Error\nTranslation failed: HTTP 503");
        assert!(overlay.last_result().is_none());
    }

    #[test]
    fn quit_emits_close_exactly_once() {
        let mut overlay = overlay();
        assert!(overlay.quit());
        assert!(!overlay.quit());
        assert!(!overlay.quit());

        let closes = overlay
            .take_requests()
            .into_iter()
            .filter(|r| *r == WindowRequest::Close)
            .count();
        assert_eq!(closes, 1);
        assert!(overlay.is_quitting());
    }

    #[test]
    fn only_supported_languages_are_accepted() {
        let mut overlay = overlay();
        assert!(overlay.set_current_language("ja"));
        assert_eq!(overlay.current_language(), "ja");
        assert!(!overlay.set_current_language("klingon"));
        assert_eq!(overlay.current_language(), "ja");
    }

    #[test]
    fn drag_is_disabled_while_maximized_or_fullscreen() {
        assert!(can_drag(false, false));
        assert!(!can_drag(true, false));
        assert!(!can_drag(false, true));
        assert!(!can_drag(true, true));
    }

    #[test]
    fn overlay_is_anchored_below_the_region() {
        let display = DisplayGeometry::default();
        let region = ScreenRegion::from_drag((100, 100), (500, 200)).unwrap();

        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &display),
            Some((100.0, 212.0))
        );
    }

    #[test]
    fn overlay_goes_above_when_there_is_no_room_below() {
        let display = DisplayGeometry::default();
        let region = ScreenRegion::from_drag((1700, 950), (1900, 1050)).unwrap();

        // x recuado para caber na tela, y acima da região
        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &display),
            Some((1470.0, 738.0))
        );
    }

    #[test]
    fn anchor_accounts_for_scale_factor() {
        let display = DisplayGeometry {
            scale_factor: 2.0,
            width: 3840,
            height: 2160,
            ..Default::default()
        };
        let region = ScreenRegion::from_drag((200, 200), (600, 400)).unwrap();

        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &display),
            Some((100.0, 206.0))
        );
    }

    #[test]
    fn tall_regions_put_the_overlay_beside_them() {
        let display = DisplayGeometry::default();

        let region = ScreenRegion::from_drag((100, 0), (500, 1080)).unwrap();
        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &display),
            Some((512.0, 0.0))
        );

        let region = ScreenRegion::from_drag((1200, 40), (1900, 1080)).unwrap();
        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &display),
            Some((738.0, 40.0))
        );
    }

    #[test]
    fn full_screen_region_keeps_the_overlay_hidden() {
        let mut overlay = overlay();
        overlay.hide();
        overlay.take_requests();

        let region = ScreenRegion::from_drag((0, 0), (1920, 1080)).unwrap();
        assert_eq!(
            anchor_position(&region, (450.0, 200.0), &DisplayGeometry::default()),
            None
        );

        overlay.show_status_near(PROCESSING_TEXT, &region);
        assert!(!overlay.is_visible());
        assert!(overlay.take_requests().is_empty());
        assert_eq!(overlay.text(), PROCESSING_TEXT);

        overlay.show_result("Bonjour", "Hello");
        assert!(overlay.is_visible());
    }

    #[test]
    fn language_change_keeps_the_result_on_screen() {
        let mut overlay = overlay();
        overlay.show_result("Bonjour", "Hello");
        let text = overlay.text().to_string();
        let result = overlay.last_result().cloned();

        assert!(overlay.set_current_language("de"));

        assert_eq!(overlay.text(), text);
        assert_eq!(overlay.last_result().cloned(), result);
        assert_eq!(overlay.current_language(), "de");
    }
}
