// lingo-live/src/overlay/commands.rs

// ============================================================================
// PROCESSAMENTO DE COMANDOS DO OVERLAY
// ============================================================================

use crossbeam_channel::Receiver;

use super::{ResultOverlay, WindowRequest};
use crate::app_state::AppCommand;
use crate::coordinator::Coordinator;

/// Processa comandos pendentes enviados para a thread principal.
pub fn process_pending_commands(
    command_receiver: &Receiver<AppCommand>,
    coordinator: &mut Coordinator,
    overlay: &mut ResultOverlay,
) {
    while let Ok(command) = command_receiver.try_recv() {
        match command {
            AppCommand::NewSelection => {
                coordinator.trigger(overlay);
            }
            AppCommand::Quit => {
                overlay.quit();
            }
        }
    }
}

/// Aplica na janela os pedidos acumulados pelo modelo do overlay.
pub fn apply_window_requests(ctx: &eframe::egui::Context, overlay: &mut ResultOverlay) {
    let (width, height) = overlay.size();

    for request in overlay.take_requests() {
        match request {
            WindowRequest::Show => {
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::InnerSize(
                    eframe::egui::vec2(width, height),
                ));
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::Focus);
            }
            WindowRequest::Hide => {
                // Esconde o overlay encolhendo a janela
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::InnerSize(
                    eframe::egui::vec2(1.0, 1.0),
                ));
            }
            WindowRequest::MoveTo(x, y) => {
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::OuterPosition(
                    eframe::egui::pos2(x, y),
                ));
            }
            WindowRequest::Close => {
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::Close);
            }
        }
    }
}
