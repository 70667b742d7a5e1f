// lingo-live/src/overlay/render.rs

// ============================================================================
// RENDERIZAÇÃO DO OVERLAY
// ============================================================================

use super::fonts::OVERLAY_FONT_FAMILY;
use super::{can_drag, ResultOverlay};
use crate::config::SUPPORTED_LANGUAGES;

/// Ações pedidas pelo usuário neste frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    NewSelection,
    Hide,
    Quit,
    Speak,
    Summarize,
    LanguageChanged(String),
}

/// O que o overlay sabe sobre os adapters opcionais
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalFeatures {
    pub speak: bool,
    pub summarize: bool,
}

/// Cria um FontId usando a família "overlay_text" (fonte configurada)
fn overlay_font_id(size: f32) -> eframe::egui::FontId {
    eframe::egui::FontId::new(size, eframe::egui::FontFamily::Name(OVERLAY_FONT_FAMILY.into()))
}

/// Desenha o overlay inteiro. Retorna as ações clicadas.
pub fn render_overlay(
    ctx: &eframe::egui::Context,
    overlay: &mut ResultOverlay,
    features: OptionalFeatures,
    font_size: f32,
    opacity: f32,
) -> Vec<OverlayAction> {
    let mut actions = Vec::new();

    if !overlay.is_visible() {
        // Janela encolhida: só mantém o fundo transparente
        eframe::egui::CentralPanel::default()
            .frame(eframe::egui::Frame::none().fill(eframe::egui::Color32::TRANSPARENT))
            .show(ctx, |_ui| {});
        return actions;
    }

    // ESC esconde o overlay
    if ctx.input(|i| i.key_pressed(eframe::egui::Key::Escape)) {
        actions.push(OverlayAction::Hide);
    }

    let fill = ctx.style().visuals.panel_fill;
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let fill = eframe::egui::Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), alpha);

    // ========================================================================
    // CABEÇALHO (arrastável)
    // ========================================================================
    eframe::egui::TopBottomPanel::top("overlay_header")
        .frame(
            eframe::egui::Frame::none()
                .fill(fill)
                .inner_margin(eframe::egui::Margin::symmetric(8.0, 6.0)),
        )
        .show(ctx, |ui| {
            let header = ui.horizontal(|ui| {
                ui.label(eframe::egui::RichText::new("🌐 Lingo-Live").strong().size(15.0));

                ui.with_layout(
                    eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                    |ui| {
                        if ui.button("Quit").on_hover_text("Exit Lingo-Live").clicked() {
                            actions.push(OverlayAction::Quit);
                        }
                        if ui.button("✕").on_hover_text("Hide").clicked() {
                            actions.push(OverlayAction::Hide);
                        }
                        if ui.button("📷 New").on_hover_text("Select a new region").clicked() {
                            actions.push(OverlayAction::NewSelection);
                        }

                        let mut selected = overlay.current_language().to_string();
                        let selected_name = SUPPORTED_LANGUAGES
                            .iter()
                            .find(|(code, _)| *code == selected)
                            .map(|(_, name)| *name)
                            .unwrap_or("?");

                        eframe::egui::ComboBox::from_id_source("target_language")
                            .selected_text(selected_name)
                            .width(150.0)
                            .show_ui(ui, |ui| {
                                for (code, name) in SUPPORTED_LANGUAGES {
                                    ui.selectable_value(&mut selected, code.to_string(), *name);
                                }
                            });

                        if selected != overlay.current_language()
                            && overlay.set_current_language(&selected)
                        {
                            actions.push(OverlayAction::LanguageChanged(selected));
                        }
                    },
                );
            });

            // Arrastar pelo cabeçalho
            let drag_area = ui.interact(
                header.response.rect,
                eframe::egui::Id::new("overlay_drag"),
                eframe::egui::Sense::drag(),
            );
            if drag_area.drag_started() {
                let (maximized, fullscreen) = ctx.input(|i| {
                    let viewport = i.viewport();
                    (
                        viewport.maximized.unwrap_or(false),
                        viewport.fullscreen.unwrap_or(false),
                    )
                });
                if can_drag(maximized, fullscreen) {
                    ctx.send_viewport_cmd(eframe::egui::ViewportCommand::StartDrag);
                }
            }
        });

    // ========================================================================
    // RODAPÉ (status + ações opcionais)
    // ========================================================================
    eframe::egui::TopBottomPanel::bottom("overlay_footer")
        .frame(
            eframe::egui::Frame::none()
                .fill(fill)
                .inner_margin(eframe::egui::Margin::symmetric(8.0, 4.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    eframe::egui::RichText::new(overlay.status())
                        .small()
                        .color(eframe::egui::Color32::GRAY),
                );

                if overlay.last_result().is_some() {
                    ui.with_layout(
                        eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                        |ui| {
                            if features.summarize && ui.small_button("📄 Summary").clicked() {
                                actions.push(OverlayAction::Summarize);
                            }
                            if features.speak && ui.small_button("🔊 Speak").clicked() {
                                actions.push(OverlayAction::Speak);
                            }
                        },
                    );
                }
            });
        });

    // ========================================================================
    // TEXTO (somente leitura)
    // ========================================================================
    eframe::egui::CentralPanel::default()
        .frame(
            eframe::egui::Frame::none()
                .fill(fill)
                .inner_margin(eframe::egui::Margin::same(10.0)),
        )
        .show(ctx, |ui| {
            eframe::egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.label(
                        eframe::egui::RichText::new(overlay.text())
                            .font(overlay_font_id(font_size)),
                    );

                    if let Some(summary) = overlay.summary() {
                        ui.separator();
                        ui.label(eframe::egui::RichText::new("📄 Summary").strong());
                        ui.label(
                            eframe::egui::RichText::new(summary)
                                .font(overlay_font_id(font_size)),
                        );
                    }
                });
        });

    actions
}
