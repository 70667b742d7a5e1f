// lingo-live/src/coordinator.rs

// ============================================================================
// MÓDULO COORDINATOR - Máquina de estados do pipeline
// ============================================================================
//
//   Idle / ShowingResult / ShowingError --(hotkey ou New)--> Selecting
//   Selecting --cancelado--> Idle
//   Selecting --região--> Capturing -> RecognizingText -> Translating
//   Translating --> ShowingResult | ShowingError
//
// Só a thread da UI chama métodos daqui. As threads de trabalho mandam
// eventos pelo UiDispatcher e o `pump()` aplica tudo no próximo frame.
//
// ============================================================================

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::app_state::{PipelineEvent, PipelineState, Stage};
use crate::overlay::render::OptionalFeatures;
use crate::overlay::{ResultOverlay, PROCESSING_TEXT};
use crate::processing::{spawn_pipeline_run, Adapters};
use crate::region_selector::{SelectionOutcome, SelectorSlot};
use crate::screenshot::DisplayGeometry;
use crate::summarizer::Summarizer;
use crate::tts::Speaker;

// ============================================================================
// DESPACHO PARA A THREAD DA UI
// ============================================================================

/// Entrega eventos para a thread da UI e acorda o loop do egui
#[derive(Clone)]
pub struct UiDispatcher {
    tx: Sender<PipelineEvent>,
    ctx: egui::Context,
}

impl UiDispatcher {
    pub fn new(tx: Sender<PipelineEvent>, ctx: egui::Context) -> Self {
        UiDispatcher { tx, ctx }
    }

    pub fn send(&self, event: PipelineEvent) {
        if self.tx.send(event).is_err() {
            debug!("Canal de eventos fechado, descartando evento");
            return;
        }
        self.ctx.request_repaint();
    }
}

// ============================================================================
// COORDENADOR
// ============================================================================

pub struct Coordinator {
    state: PipelineState,
    adapters: Adapters,
    summarizer: Arc<Summarizer>,
    speaker: Arc<Speaker>,
    selector: SelectorSlot,
    display: DisplayGeometry,
    capture_delay: Duration,
    dispatcher: UiDispatcher,
    events: Receiver<PipelineEvent>,
    summary_pending: bool,
}

impl Coordinator {
    pub fn new(
        adapters: Adapters,
        summarizer: Arc<Summarizer>,
        speaker: Arc<Speaker>,
        display: DisplayGeometry,
        capture_delay: Duration,
        ctx: egui::Context,
    ) -> Self {
        let (tx, events) = crossbeam_channel::unbounded();

        Coordinator {
            state: PipelineState::Idle,
            adapters,
            summarizer,
            speaker,
            selector: SelectorSlot::default(),
            display,
            capture_delay,
            dispatcher: UiDispatcher::new(tx, ctx),
            events,
            summary_pending: false,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn features(&self) -> OptionalFeatures {
        OptionalFeatures {
            speak: self.speaker.is_available(),
            summarize: self.summarizer.is_available(),
        }
    }

    /// Hotkey ou botão New. Retorna `false` quando ignorado.
    pub fn trigger(&mut self, overlay: &mut ResultOverlay) -> bool {
        if !self.state.accepts_trigger() {
            debug!("⏭️  Nova seleção ignorada (estado: {:?})", self.state);
            return false;
        }

        self.speaker.stop();
        overlay.hide();
        self.selector.open(self.display);
        self.state = PipelineState::Selecting;
        true
    }

    /// Desenha o seletor (se aberto) e trata o resultado
    pub fn show_selector(&mut self, ctx: &egui::Context, overlay: &mut ResultOverlay) {
        if let Some(outcome) = self.selector.show(ctx) {
            self.on_selection(outcome, overlay);
        }
    }

    pub fn on_selection(&mut self, outcome: SelectionOutcome, overlay: &mut ResultOverlay) {
        // Fecha em qualquer caminho (idempotente)
        self.selector.close();

        if self.state != PipelineState::Selecting {
            warn!("⚠️  Resultado de seleção fora de hora ignorado");
            return;
        }

        match outcome {
            SelectionOutcome::Cancelled => {
                self.state = PipelineState::Idle;
                overlay.show_idle();
            }
            SelectionOutcome::Region(region) => {
                self.state = PipelineState::Capturing;
                overlay.show_status_near(PROCESSING_TEXT, &region);

                spawn_pipeline_run(
                    self.adapters.clone(),
                    region,
                    overlay.current_language().to_string(),
                    self.capture_delay,
                    self.dispatcher.clone(),
                );
            }
        }
    }

    /// Aplica todos os eventos pendentes das threads de trabalho
    pub fn pump(&mut self, overlay: &mut ResultOverlay) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event, overlay);
        }
    }

    fn apply_event(&mut self, event: PipelineEvent, overlay: &mut ResultOverlay) {
        match event {
            PipelineEvent::Stage(stage) => {
                if self.state.is_in_flight() {
                    self.state = stage.into();
                    overlay.set_status_line(stage_label(stage));
                }
            }
            PipelineEvent::Finished(result) => {
                if !self.state.is_in_flight() {
                    warn!("⚠️  Resultado fora de hora ignorado");
                    return;
                }

                match result {
                    Ok(output) => {
                        self.state = PipelineState::ShowingResult;
                        overlay.show_result(&output.original, &output.translated);
                    }
                    Err(e) => {
                        self.state = PipelineState::ShowingError;
                        overlay.show_error(&e.user_message());
                    }
                }
            }
            PipelineEvent::Summary(summary) => {
                self.summary_pending = false;
                if self.state == PipelineState::ShowingResult {
                    overlay.show_summary(&summary);
                }
            }
        }
    }

    /// Pede um resumo do texto original (em segundo plano)
    pub fn request_summary(&mut self, overlay: &mut ResultOverlay) -> bool {
        if self.state != PipelineState::ShowingResult
            || self.summary_pending
            || !self.summarizer.is_available()
        {
            return false;
        }

        let Some(result) = overlay.last_result() else {
            return false;
        };

        let text = result.original.clone();
        let lang = overlay.current_language().to_string();
        let summarizer = Arc::clone(&self.summarizer);
        let dispatcher = self.dispatcher.clone();

        self.summary_pending = true;
        overlay.set_status_line("📄 Summarizing...");

        thread::spawn(move || {
            let summary = summarizer.summarize(&text, &lang);
            dispatcher.send(PipelineEvent::Summary(summary));
        });

        true
    }

    /// Lê a tradução atual em voz alta
    pub fn speak(&self, overlay: &ResultOverlay) {
        if self.state != PipelineState::ShowingResult {
            return;
        }
        if let Some(result) = overlay.last_result() {
            self.speaker.speak(&result.translated, overlay.current_language());
        }
    }

    /// Para TTS e fecha o seletor (saída da aplicação)
    pub fn shutdown(&mut self) {
        self.speaker.stop();
        self.selector.close();
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Capturing => "📸 Capturing...",
        Stage::RecognizingText => "🔍 Reading text...",
        Stage::Translating => "🌐 Translating...",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app_state::{ScreenRegion, TranslationJob};
    use crate::config::Settings;
    use crate::error::PipelineError;
    use crate::processing::tests::{adapters, CountingTranslator, FailingTranslator, StubOcr};
    use crate::overlay::WindowRequest;
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    const ALL_STATES: [PipelineState; 7] = [
        PipelineState::Idle,
        PipelineState::Selecting,
        PipelineState::Capturing,
        PipelineState::RecognizingText,
        PipelineState::Translating,
        PipelineState::ShowingResult,
        PipelineState::ShowingError,
    ];

    fn coordinator(adapters: Adapters) -> Coordinator {
        let settings = Settings::default();
        Coordinator::new(
            adapters,
            Arc::new(Summarizer::from_settings(&settings)),
            Arc::new(Speaker::from_settings(&settings)),
            DisplayGeometry::default(),
            Duration::ZERO,
            egui::Context::default(),
        )
    }

    /// Coordenador ocioso com adapters de teste
    pub fn idle_coordinator() -> Coordinator {
        coordinator(adapters(StubOcr("x"), translator("y")))
    }

    fn overlay() -> ResultOverlay {
        ResultOverlay::new(&Settings::default(), DisplayGeometry::default())
    }

    fn region() -> ScreenRegion {
        ScreenRegion::from_drag((100, 100), (400, 180)).unwrap()
    }

    /// Bombeia eventos até a execução terminar
    fn settle(coord: &mut Coordinator, overlay: &mut ResultOverlay) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while coord.state().is_in_flight() {
            assert!(Instant::now() < deadline, "pipeline did not finish");
            coord.pump(overlay);
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn translator(reply: &'static str) -> Arc<CountingTranslator> {
        Arc::new(CountingTranslator {
            reply,
            ..Default::default()
        })
    }

    #[test]
    fn trigger_only_from_passive_states() {
        for state in ALL_STATES {
            let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
            let mut overlay = overlay();
            coord.state = state;

            let accepted = coord.trigger(&mut overlay);
            assert_eq!(accepted, state.accepts_trigger(), "state {:?}", state);

            if accepted {
                assert_eq!(coord.state(), PipelineState::Selecting);
                assert!(coord.selector.is_open());
                assert!(!overlay.is_visible());
            } else {
                assert_eq!(coord.state(), state);
                assert!(!coord.selector.is_open());
            }
        }
    }

    #[test]
    fn second_trigger_while_selecting_is_a_no_op() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();

        assert!(coord.trigger(&mut overlay));
        overlay.take_requests();
        assert!(!coord.trigger(&mut overlay));

        assert_eq!(coord.state(), PipelineState::Selecting);
        assert!(overlay.take_requests().is_empty());
    }

    #[test]
    fn cancel_returns_to_idle_with_prompt() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();
        let prompt = overlay.text().to_string();

        coord.trigger(&mut overlay);
        coord.on_selection(SelectionOutcome::Cancelled, &mut overlay);

        assert_eq!(coord.state(), PipelineState::Idle);
        assert!(!coord.selector.is_open());
        assert!(overlay.is_visible());
        assert_eq!(overlay.text(), prompt);
    }

    #[test]
    fn bonjour_is_shown_next_to_hello() {
        let translator = translator("Hello");
        let mut coord = coordinator(adapters(StubOcr("Bonjour"), translator.clone()));
        let mut overlay = overlay();

        coord.trigger(&mut overlay);
        overlay.take_requests();
        coord.on_selection(SelectionOutcome::Region(region()), &mut overlay);

        assert_eq!(coord.state(), PipelineState::Capturing);
        assert_eq!(overlay.text(), PROCESSING_TEXT);
        assert!(overlay
            .take_requests()
            .iter()
            .any(|r| matches!(r, WindowRequest::MoveTo(_, _))));

        settle(&mut coord, &mut overlay);

        assert_eq!(coord.state(), PipelineState::ShowingResult);
        assert!(overlay.is_visible());
        assert!(overlay.text().contains("Bonjour"));
        assert!(overlay.text().contains("Hello"));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn run_keeps_the_language_chosen_at_commit_time() {
        let translator = translator("Hallo");
        let mut coord = coordinator(adapters(StubOcr("Bonjour"), translator.clone()));
        let mut overlay = overlay();
        assert!(overlay.set_current_language("de"));

        coord.trigger(&mut overlay);
        coord.on_selection(SelectionOutcome::Region(region()), &mut overlay);
        assert!(overlay.set_current_language("ja"));

        settle(&mut coord, &mut overlay);

        assert_eq!(coord.state(), PipelineState::ShowingResult);
        assert_eq!(
            translator.last_job(),
            Some(TranslationJob::new("Bonjour", "de"))
        );
        assert_eq!(overlay.current_language(), "ja");
    }

    #[test]
    fn empty_ocr_shows_no_text_detected() {
        let translator = translator("never");
        let mut coord = coordinator(adapters(StubOcr("  "), translator.clone()));
        let mut overlay = overlay();

        coord.trigger(&mut overlay);
        coord.on_selection(SelectionOutcome::Region(region()), &mut overlay);
        settle(&mut coord, &mut overlay);

        assert_eq!(coord.state(), PipelineState::ShowingError);
        assert!(overlay.text().contains("No text detected"));
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_translator_shows_reason_and_allows_retry() {
        let mut coord = coordinator(adapters(StubOcr("Hola"), Arc::new(FailingTranslator)));
        let mut overlay = overlay();

        coord.trigger(&mut overlay);
        coord.on_selection(SelectionOutcome::Region(region()), &mut overlay);
        settle(&mut coord, &mut overlay);

        assert_eq!(coord.state(), PipelineState::ShowingError);
        assert!(overlay.text().contains("HTTP 503"));

        // Nova seleção aceita imediatamente
        assert!(coord.trigger(&mut overlay));
        assert_eq!(coord.state(), PipelineState::Selecting);
    }

    #[test]
    fn selection_outside_selecting_is_ignored() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();

        coord.on_selection(SelectionOutcome::Region(region()), &mut overlay);
        assert_eq!(coord.state(), PipelineState::Idle);
    }

    #[test]
    fn stale_events_do_not_change_passive_states() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();

        coord.apply_event(PipelineEvent::Stage(Stage::Translating), &mut overlay);
        coord.apply_event(
            PipelineEvent::Finished(Err(PipelineError::NoTextDetected)),
            &mut overlay,
        );
        assert_eq!(coord.state(), PipelineState::Idle);

        coord.apply_event(PipelineEvent::Summary("sum".to_string()), &mut overlay);
        assert!(overlay.summary().is_none());
    }

    #[test]
    fn stage_events_advance_the_state() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();
        coord.state = PipelineState::Capturing;

        coord.apply_event(PipelineEvent::Stage(Stage::RecognizingText), &mut overlay);
        assert_eq!(coord.state(), PipelineState::RecognizingText);
        assert_eq!(overlay.status(), "🔍 Reading text...");

        coord.apply_event(PipelineEvent::Stage(Stage::Translating), &mut overlay);
        assert_eq!(coord.state(), PipelineState::Translating);
    }

    #[test]
    fn summary_needs_a_configured_key() {
        let mut coord = coordinator(adapters(StubOcr("x"), translator("y")));
        let mut overlay = overlay();
        coord.state = PipelineState::ShowingResult;
        overlay.show_result("a", "b");

        assert!(!coord.features().summarize);
        assert!(!coord.request_summary(&mut overlay));
    }
}
