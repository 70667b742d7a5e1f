// lingo-live/src/runtime/hotkeys.rs

// ============================================================================
// THREAD DE HOTKEYS (roda em background)
// ============================================================================

use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::app_state::AppCommand;
use crate::hotkey::{HotkeyAction, HotkeyManager};

/// Intervalo de leitura do teclado
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Controle da thread de hotkeys. Parar é idempotente; o drop também para.
pub struct HotkeyHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl HotkeyHandle {
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("❌ Thread de hotkeys terminou com pânico");
            }
            info!("⌨️  Thread de hotkeys encerrada");
        }
    }
}

impl Drop for HotkeyHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Inicia a leitura das hotkeys. Cada disparo vira um `AppCommand` e acorda
/// a thread da UI.
pub fn start_hotkey_thread(
    mut manager: HotkeyManager,
    command_sender: Sender<AppCommand>,
    ctx: eframe::egui::Context,
) -> HotkeyHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::spawn(move || {
        info!("⌨️  Thread de hotkeys iniciada");

        while !stop_flag.load(Ordering::SeqCst) {
            for action in manager.check_hotkeys() {
                let command = match action {
                    HotkeyAction::NewSelection => {
                        info!("");
                        info!("🎯 ============================================");
                        info!("🎯 HOTKEY: NOVA SELEÇÃO");
                        info!("🎯 ============================================");
                        AppCommand::NewSelection
                    }
                    HotkeyAction::Quit => {
                        info!("");
                        info!("👋 ============================================");
                        info!("👋 HOTKEY: SAIR");
                        info!("👋 ============================================");
                        AppCommand::Quit
                    }
                };

                if let Err(e) = command_sender.send(command) {
                    error!("❌ Erro ao enviar comando: {}", e);
                    return;
                }
                ctx.request_repaint();
            }

            thread::sleep(POLL_INTERVAL);
        }
    });

    HotkeyHandle {
        stop,
        thread: Some(thread),
    }
}
