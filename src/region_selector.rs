// lingo-live/src/region_selector.rs

// ============================================================================
// MÓDULO REGION SELECTOR - Seleção visual de região
// ============================================================================
//
// Janela de tela cheia, sem bordas, sempre no topo e semitransparente,
// desenhada como um viewport imediato da própria aplicação. O gesto
// (clique, arraste, soltura) fica num modelo separado do egui para poder
// ser testado.
//
// ============================================================================

use eframe::egui;

use crate::app_state::ScreenRegion;
use crate::screenshot::DisplayGeometry;

/// Resultado de uma seleção
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Region(ScreenRegion),
    Cancelled,
}

// ============================================================================
// MODELO DO GESTO
// ============================================================================

/// Estado do arraste em pixels de tela
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectionGesture {
    anchor: Option<(i32, i32)>,
    current: Option<(i32, i32)>,
}

impl SelectionGesture {
    /// Mouse pressionado: guarda a âncora
    pub fn press(&mut self, point: (i32, i32)) {
        self.anchor = Some(point);
        self.current = Some(point);
    }

    /// Mouse arrastado: atualiza o contorno
    pub fn move_to(&mut self, point: (i32, i32)) {
        if self.anchor.is_some() {
            self.current = Some(point);
        }
    }

    /// Mouse solto: normaliza e valida o retângulo
    pub fn release(&mut self, point: (i32, i32)) -> SelectionOutcome {
        let Some(anchor) = self.anchor.take() else {
            return SelectionOutcome::Cancelled;
        };
        self.current = None;

        match ScreenRegion::from_drag(anchor, point) {
            Some(region) => SelectionOutcome::Region(region),
            None => SelectionOutcome::Cancelled,
        }
    }

    /// Descarta qualquer retângulo em andamento
    pub fn cancel(&mut self) -> SelectionOutcome {
        self.anchor = None;
        self.current = None;
        SelectionOutcome::Cancelled
    }

    /// Retângulo atual (x1, y1, x2, y2) normalizado, para desenhar
    pub fn live_rect(&self) -> Option<(i32, i32, i32, i32)> {
        let (ax, ay) = self.anchor?;
        let (cx, cy) = self.current?;
        Some((ax.min(cx), ay.min(cy), ax.max(cx), ay.max(cy)))
    }
}

// ============================================================================
// SELETOR ATIVO
// ============================================================================

/// Um seletor aberto: geometria do monitor + gesto
#[derive(Debug)]
pub struct RegionSelector {
    display: DisplayGeometry,
    gesture: SelectionGesture,
}

impl RegionSelector {
    pub fn new(display: DisplayGeometry) -> Self {
        RegionSelector {
            display,
            gesture: SelectionGesture::default(),
        }
    }

    /// Ponto em points (relativo à janela) -> pixels de tela
    fn to_screen(&self, pos: egui::Pos2, pixels_per_point: f32) -> (i32, i32) {
        (
            self.display.x + (pos.x * pixels_per_point).round() as i32,
            self.display.y + (pos.y * pixels_per_point).round() as i32,
        )
    }

    /// Pixels de tela -> ponto em points (relativo à janela)
    fn to_local(&self, x: i32, y: i32, pixels_per_point: f32) -> egui::Pos2 {
        egui::pos2(
            (x - self.display.x) as f32 / pixels_per_point,
            (y - self.display.y) as f32 / pixels_per_point,
        )
    }

    fn viewport_builder(&self) -> egui::ViewportBuilder {
        let scale = self.display.scale_factor.max(0.5);

        egui::ViewportBuilder::default()
            .with_title("Lingo-Live - Select Region")
            .with_position([self.display.x as f32 / scale, self.display.y as f32 / scale])
            .with_inner_size([
                self.display.width as f32 / scale,
                self.display.height as f32 / scale,
            ])
            .with_fullscreen(true)
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true)
    }

    /// Desenha um frame do seletor. Retorna o resultado quando terminar.
    fn ui(&mut self, ctx: &egui::Context) -> Option<SelectionOutcome> {
        let ppp = ctx.pixels_per_point();
        let mut outcome = None;

        // Fechado pelo gerenciador de janelas
        if ctx.input(|i| i.viewport().close_requested()) {
            info!("❌ Seletor fechado pela janela");
            return Some(self.gesture.cancel());
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let full_rect = ui.max_rect();

                // Véu escuro semitransparente
                ui.painter().rect_filled(
                    full_rect,
                    0.0,
                    egui::Color32::from_rgba_unmultiplied(0, 0, 0, 100),
                );

                // ============================================================
                // INSTRUÇÕES
                // ============================================================
                ui.painter().text(
                    egui::pos2(20.0, 30.0),
                    egui::Align2::LEFT_TOP,
                    "🎯 Click and drag to select the text to translate",
                    egui::FontId::proportional(22.0),
                    egui::Color32::WHITE,
                );

                ui.painter().text(
                    egui::pos2(20.0, 62.0),
                    egui::Align2::LEFT_TOP,
                    "Press ESC to cancel",
                    egui::FontId::proportional(14.0),
                    egui::Color32::LIGHT_GRAY,
                );

                // ============================================================
                // DETECTA INTERAÇÃO DO MOUSE
                // ============================================================
                let response = ui.interact(
                    full_rect,
                    egui::Id::new("region_selector"),
                    egui::Sense::click_and_drag(),
                );

                if response.drag_started() {
                    // O egui só confirma o arraste depois que o ponteiro anda;
                    // a âncora é onde o botão foi pressionado.
                    let anchor = ui
                        .input(|i| i.pointer.press_origin())
                        .or_else(|| response.interact_pointer_pos());

                    if let Some(pos) = anchor {
                        let point = self.to_screen(pos, ppp);
                        self.gesture.press(point);
                        debug!("🖱️  Início da seleção: {:?}", point);
                    }
                }

                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.gesture.move_to(self.to_screen(pos, ppp));
                    }
                }

                if response.drag_stopped() {
                    let release = response
                        .interact_pointer_pos()
                        .or_else(|| ui.input(|i| i.pointer.latest_pos()))
                        .map(|pos| self.to_screen(pos, ppp));

                    outcome = Some(match release {
                        Some(point) => self.gesture.release(point),
                        None => self.gesture.cancel(),
                    });
                } else if response.clicked() {
                    // Clique sem arraste: retângulo vazio
                    outcome = Some(self.gesture.cancel());
                }

                // ============================================================
                // DESENHA O RETÂNGULO DE SELEÇÃO
                // ============================================================
                if let Some((x1, y1, x2, y2)) = self.gesture.live_rect() {
                    let rect = egui::Rect::from_two_pos(
                        self.to_local(x1, y1, ppp),
                        self.to_local(x2, y2, ppp),
                    );

                    ui.painter().rect_filled(
                        rect,
                        0.0,
                        egui::Color32::from_rgba_unmultiplied(0, 150, 255, 50),
                    );
                    ui.painter().rect_stroke(
                        rect,
                        0.0,
                        egui::Stroke::new(2.0, egui::Color32::from_rgb(0, 200, 255)),
                    );

                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("{}x{}", x2 - x1, y2 - y1),
                        egui::FontId::proportional(18.0),
                        egui::Color32::WHITE,
                    );
                }

                // ============================================================
                // BOTÃO CANCELAR
                // ============================================================
                let cancel_rect = egui::Rect::from_min_size(
                    egui::pos2(full_rect.right() - 130.0, 20.0),
                    egui::vec2(110.0, 32.0),
                );
                let cancel = ui.put(
                    cancel_rect,
                    egui::Button::new(egui::RichText::new("✕ Cancel").size(16.0)),
                );
                if cancel.clicked() {
                    outcome = Some(self.gesture.cancel());
                }

                // Cursor em cruz em toda a área
                if outcome.is_none() && !cancel.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            info!("❌ Seleção cancelada (ESC)");
            outcome = Some(self.gesture.cancel());
        }

        // Continua redesenhando enquanto o usuário arrasta
        if outcome.is_none() && self.gesture.live_rect().is_some() {
            ctx.request_repaint();
        }

        outcome
    }
}

// ============================================================================
// SLOT ÚNICO
// ============================================================================

/// Guarda no máximo um seletor aberto
#[derive(Debug, Default)]
pub struct SelectorSlot {
    active: Option<RegionSelector>,
}

impl SelectorSlot {
    /// Abre um seletor novo (fecha o anterior, se houver)
    pub fn open(&mut self, display: DisplayGeometry) {
        if self.active.is_some() {
            warn!("⚠️  Seletor anterior ainda aberto, fechando");
            self.close();
        }

        info!("🎯 Abrindo seletor de região...");
        self.active = Some(RegionSelector::new(display));
    }

    /// Fecha o seletor. Pode ser chamado várias vezes.
    pub fn close(&mut self) {
        if self.active.take().is_some() {
            debug!("🎯 Seletor fechado");
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Desenha o seletor (se aberto) num viewport próprio.
    ///
    /// Quando o usuário termina, o seletor é fechado antes de o resultado
    /// ser devolvido.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SelectionOutcome> {
        let selector = self.active.as_mut()?;

        let outcome = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("region_selector"),
            selector.viewport_builder(),
            |ctx, _class| selector.ui(ctx),
        );

        if let Some(outcome) = outcome {
            self.close();
            match outcome {
                SelectionOutcome::Region(region) => info!(
                    "✅ Região selecionada: {}x{} na posição ({}, {})",
                    region.width(),
                    region.height(),
                    region.x1,
                    region.y1
                ),
                SelectionOutcome::Cancelled => info!("❌ Seleção cancelada"),
            }
            return Some(outcome);
        }

        None
    }
}
