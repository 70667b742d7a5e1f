// lingo-live/src/main.rs

// ============================================================================
// LINGO-LIVE - Selecione uma região da tela, leia o texto e traduza
// ============================================================================

#[macro_use]
extern crate log;

// ============================================================================
// DECLARAÇÃO DE MÓDULOS
// ============================================================================
mod app_state;
mod config;
mod coordinator;
mod error;
mod hotkey;
mod instance;
mod ocr;
mod overlay;
mod platform;
mod processing;
mod region_selector;
mod runtime;
mod screenshot;
mod summarizer;
mod translator;
mod tts;

// ============================================================================
// IMPORTS
// ============================================================================
use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Arc;
use std::time::Duration;

use app_state::AppCommand;
use config::Settings;
use coordinator::Coordinator;
use hotkey::HotkeyManager;
use instance::InstanceLock;
use ocr::TextRecognizer;
use overlay::render::OverlayAction;
use overlay::ResultOverlay;
use processing::Adapters;
use runtime::hotkeys::HotkeyHandle;
use screenshot::{DisplayGeometry, ScreenshotsCapture};
use summarizer::Summarizer;
use translator::HttpTranslator;
use tts::Speaker;

// ============================================================================
// APLICAÇÃO (janela raiz = overlay de resultado)
// ============================================================================
struct LingoApp {
    settings: Settings,
    coordinator: Coordinator,
    overlay: ResultOverlay,
    command_receiver: Receiver<AppCommand>,
    hotkeys: Option<HotkeyHandle>,
}

impl LingoApp {
    fn handle_action(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::NewSelection => {
                self.coordinator.trigger(&mut self.overlay);
            }
            OverlayAction::Hide => self.overlay.hide(),
            OverlayAction::Quit => {
                self.overlay.quit();
            }
            OverlayAction::Speak => self.coordinator.speak(&self.overlay),
            OverlayAction::Summarize => {
                self.coordinator.request_summary(&mut self.overlay);
            }
            OverlayAction::LanguageChanged(code) => {
                info!("🌍 Idioma de destino: {}", code);
                if let Err(e) = self.settings.set(
                    &config::settings_path(),
                    "target_language",
                    serde_json::Value::String(code),
                ) {
                    warn!("⚠️  Não foi possível salvar o idioma: {:#}", e);
                }
            }
        }
    }

    /// Para TTS, seletor e hotkeys. Pode ser chamado mais de uma vez.
    fn shutdown(&mut self) {
        self.coordinator.shutdown();
        if let Some(mut hotkeys) = self.hotkeys.take() {
            hotkeys.stop();
        }
    }
}

impl eframe::App for LingoApp {
    fn clear_color(&self, _visuals: &eframe::egui::Visuals) -> [f32; 4] {
        // Fundo transparente (a opacidade vem dos painéis)
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        // ====================================================================
        // COMANDOS DAS HOTKEYS + EVENTOS DOS WORKERS
        // ====================================================================
        overlay::commands::process_pending_commands(
            &self.command_receiver,
            &mut self.coordinator,
            &mut self.overlay,
        );
        self.coordinator.pump(&mut self.overlay);

        // ====================================================================
        // SELETOR DE REGIÃO (viewport próprio, só quando aberto)
        // ====================================================================
        self.coordinator.show_selector(ctx, &mut self.overlay);

        // ====================================================================
        // OVERLAY
        // ====================================================================
        let actions = overlay::render::render_overlay(
            ctx,
            &mut self.overlay,
            self.coordinator.features(),
            self.settings.font_size,
            self.settings.clamped_opacity(),
        );
        for action in actions {
            self.handle_action(action);
        }

        // Fechado pelo gerenciador de janelas
        if ctx.input(|i| i.viewport().close_requested()) {
            self.overlay.quit();
        }

        if self.overlay.is_quitting() {
            self.shutdown();
        }

        overlay::commands::apply_window_requests(ctx, &mut self.overlay);

        // Mantém o loop vivo para drenar eventos mesmo com a janela escondida
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for LingoApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// FUNÇÃO PRINCIPAL
// ============================================================================
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🌐 ============================================");
    info!("🌐 LINGO-LIVE - Tradução instantânea da tela");
    info!("🌐 ============================================");
    info!("");

    // Instância única (o lock é liberado no fim do main)
    let _instance_lock = match InstanceLock::acquire(&instance::default_lock_path()) {
        Ok(lock) => Some(lock),
        Err(e) => {
            warn!("⚠️  Sem lock de instância única: {:#}", e);
            None
        }
    };

    info!("⚙️  Configurando sistema...");

    let settings = Settings::load();

    let display = screenshot::primary_display().unwrap_or_else(|e| {
        warn!("⚠️  Monitor não detectado ({:#}), usando 1920x1080", e);
        DisplayGeometry::default()
    });
    info!(
        "🖥️  Monitor: {}x{} (escala {:.2})",
        display.width, display.height, display.scale_factor
    );

    // ========================================================================
    // ADAPTERS
    // ========================================================================
    let ocr: Arc<dyn TextRecognizer> = Arc::from(ocr::build_recognizer(&settings));
    let ocr_status = if ocr.is_available() {
        info!("✅ {} pronto", ocr.name());
        format!("{} ready", ocr.name())
    } else {
        warn!("⚠️  {} não encontrado! Instale ou ajuste tesseract_cmd", ocr.name());
        format!("⚠️ {} not available", ocr.name())
    };

    let adapters = Adapters {
        capture: Arc::new(ScreenshotsCapture),
        ocr,
        translator: Arc::new(HttpTranslator::from_settings(&settings)),
    };
    let summarizer = Arc::new(Summarizer::from_settings(&settings));
    let speaker = Arc::new(Speaker::from_settings(&settings));

    if summarizer.is_available() {
        info!("📄 Resumo: Gemini");
    }
    if speaker.is_available() {
        info!("🔊 Voz: ativada");
    }

    // ========================================================================
    // HOTKEYS
    // ========================================================================
    let hotkey_manager = match HotkeyManager::new(&settings.hotkey, &settings.exit_hotkey) {
        Ok(manager) => manager,
        Err(e) => {
            warn!("⚠️  Atalho inválido ({:#}), usando os padrões", e);
            let defaults = Settings::default();
            HotkeyManager::new(&defaults.hotkey, &defaults.exit_hotkey)?
        }
    };
    let (command_sender, command_receiver) = unbounded::<AppCommand>();

    info!("✅ Sistema pronto!");
    info!("🎯 Pressione {} para selecionar uma região", settings.hotkey);
    info!("");

    // ========================================================================
    // INICIA OVERLAY NA MAIN THREAD
    // ========================================================================
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Lingo-Live")
            .with_inner_size([settings.overlay_width, settings.overlay_height])
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true),

        ..Default::default()
    };

    let capture_delay = Duration::from_millis(settings.capture_delay_ms);

    eframe::run_native(
        "Lingo-Live",
        options,
        Box::new(move |cc| {
            overlay::fonts::setup_fonts_and_theme(&cc.egui_ctx, &settings);

            let hotkeys = runtime::hotkeys::start_hotkey_thread(
                hotkey_manager,
                command_sender,
                cc.egui_ctx.clone(),
            );

            let coordinator = Coordinator::new(
                adapters,
                summarizer,
                speaker,
                display,
                capture_delay,
                cc.egui_ctx.clone(),
            );

            let mut overlay = ResultOverlay::new(&settings, display);
            overlay.set_status_line(&ocr_status);

            Ok(Box::new(LingoApp {
                settings,
                coordinator,
                overlay,
                command_receiver,
                hotkeys: Some(hotkeys),
            }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Falha ao iniciar a interface: {}", e))?;

    info!("👋 Até logo!");
    Ok(())
}
