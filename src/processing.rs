// lingo-live/src/processing.rs

// ============================================================================
// MÓDULO PROCESSING - Pipeline de tradução (thread de trabalho)
// ============================================================================
// captura → OCR → tradução
//
// Roda fora da thread da UI. Cada etapa é reportada para o coordenador,
// que é o único que mexe no estado e no overlay.
// ============================================================================

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::app_state::{PipelineEvent, PipelineOutput, ScreenRegion, Stage, TranslationJob};
use crate::coordinator::UiDispatcher;
use crate::error::PipelineError;
use crate::ocr::TextRecognizer;
use crate::screenshot::ScreenCapture;
use crate::translator::Translator;

/// Adapters usados por uma execução do pipeline
#[derive(Clone)]
pub struct Adapters {
    pub capture: Arc<dyn ScreenCapture>,
    pub ocr: Arc<dyn TextRecognizer>,
    pub translator: Arc<dyn Translator>,
}

/// Executa o pipeline completo de forma bloqueante:
/// 1. Captura a região
/// 2. OCR (com pré-processamento)
/// 3. Tradução
///
/// `report` é chamado no início de cada etapa.
pub fn run_pipeline(
    adapters: &Adapters,
    region: &ScreenRegion,
    target_lang: &str,
    report: &dyn Fn(Stage),
) -> Result<PipelineOutput, PipelineError> {
    // === CAPTURA ===
    report(Stage::Capturing);
    info!(
        "📸 [1/3] Capturando {}x{} em ({}, {})...",
        region.width(),
        region.height(),
        region.x1,
        region.y1
    );

    let capture = adapters
        .capture
        .capture_region(region)
        .map_err(|e| PipelineError::CaptureFailure(format!("{:#}", e)))?;

    // === OCR ===
    report(Stage::RecognizingText);
    info!("🔍 [2/3] Executando OCR ({})...", adapters.ocr.name());

    if !adapters.ocr.is_available() {
        return Err(PipelineError::AdapterUnavailable(
            adapters.ocr.name().to_string(),
        ));
    }

    let text = adapters
        .ocr
        .extract_text(&capture.image, true)
        .map_err(|e| PipelineError::OcrFailure(format!("{:#}", e)))?;

    // A imagem não é mais necessária
    drop(capture);

    if text.trim().is_empty() {
        info!("⚠️  Nenhum texto detectado!");
        return Err(PipelineError::NoTextDetected);
    }

    info!("   📝 OCR: {} caracteres", text.chars().count());

    // === TRADUÇÃO ===
    report(Stage::Translating);
    info!("🌐 [3/3] Traduzindo para '{}'...", target_lang);

    let job = TranslationJob::new(text, target_lang);
    let translated = adapters
        .translator
        .translate(&job)
        .map_err(|e| PipelineError::TranslationFailure(format!("{:#}", e)))?;

    info!("✅ Pipeline concluído!");

    Ok(PipelineOutput {
        original: job.source_text,
        translated,
    })
}

/// Dispara uma execução numa thread própria.
///
/// Espera `capture_delay` antes de capturar (o seletor precisa sumir da
/// tela). Um panic dentro do pipeline vira `WorkerPanicked`.
pub fn spawn_pipeline_run(
    adapters: Adapters,
    region: ScreenRegion,
    target_lang: String,
    capture_delay: Duration,
    dispatcher: UiDispatcher,
) {
    thread::spawn(move || {
        if !capture_delay.is_zero() {
            thread::sleep(capture_delay);
        }

        let report = |stage: Stage| dispatcher.send(PipelineEvent::Stage(stage));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_pipeline(&adapters, &region, &target_lang, &report)
        }))
        .unwrap_or_else(|payload| {
            let reason = panic_message(payload.as_ref());
            error!("❌ Thread de trabalho entrou em pânico: {}", reason);
            Err(PipelineError::WorkerPanicked(reason))
        });

        if let Err(e) = &result {
            warn!("⚠️  Execução terminou com erro: {}", e);
        }

        dispatcher.send(PipelineEvent::Finished(result));
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app_state::CaptureResult;
    use anyhow::Result;
    use image::DynamicImage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub struct StubCapture;

    impl ScreenCapture for StubCapture {
        fn capture_region(&self, region: &ScreenRegion) -> Result<CaptureResult> {
            Ok(CaptureResult {
                image: DynamicImage::new_rgba8(region.width(), region.height()),
                origin: region.top_left(),
            })
        }
    }

    pub struct BrokenCapture;

    impl ScreenCapture for BrokenCapture {
        fn capture_region(&self, _region: &ScreenRegion) -> Result<CaptureResult> {
            anyhow::bail!("display gone")
        }
    }

    pub struct StubOcr(pub &'static str);

    impl TextRecognizer for StubOcr {
        fn name(&self) -> &'static str {
            "Stub OCR"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn extract_text(&self, _image: &DynamicImage, _preprocess: bool) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    pub struct MissingOcr;

    impl TextRecognizer for MissingOcr {
        fn name(&self) -> &'static str {
            "Tesseract OCR"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn extract_text(&self, _image: &DynamicImage, _preprocess: bool) -> Result<String> {
            unreachable!("unavailable engine must not be called")
        }
    }

    pub struct PanickingOcr;

    impl TextRecognizer for PanickingOcr {
        fn name(&self) -> &'static str {
            "Panicking OCR"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn extract_text(&self, _image: &DynamicImage, _preprocess: bool) -> Result<String> {
            panic!("engine crashed")
        }
    }

    /// Conta chamadas, guarda os pedidos e devolve uma tradução fixa
    #[derive(Default)]
    pub struct CountingTranslator {
        pub calls: AtomicUsize,
        pub jobs: Mutex<Vec<TranslationJob>>,
        pub reply: &'static str,
    }

    impl CountingTranslator {
        pub fn last_job(&self) -> Option<TranslationJob> {
            self.jobs.lock().unwrap().last().cloned()
        }
    }

    impl Translator for CountingTranslator {
        fn translate(&self, job: &TranslationJob) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.jobs.lock().unwrap().push(job.clone());
            Ok(self.reply.to_string())
        }
    }

    pub struct FailingTranslator;

    impl Translator for FailingTranslator {
        fn translate(&self, _job: &TranslationJob) -> Result<String> {
            anyhow::bail!("HTTP 503")
        }
    }

    pub fn adapters(
        ocr: impl TextRecognizer + 'static,
        translator: Arc<dyn Translator>,
    ) -> Adapters {
        Adapters {
            capture: Arc::new(StubCapture),
            ocr: Arc::new(ocr),
            translator,
        }
    }

    fn region() -> ScreenRegion {
        ScreenRegion::from_drag((100, 100), (300, 160)).unwrap()
    }

    fn run(adapters: &Adapters) -> (Result<PipelineOutput, PipelineError>, Vec<Stage>) {
        let stages = Mutex::new(Vec::new());
        let result = run_pipeline(adapters, &region(), "en", &|stage| {
            stages.lock().unwrap().push(stage)
        });
        (result, stages.into_inner().unwrap())
    }

    #[test]
    fn successful_run_reports_every_stage() {
        let translator = Arc::new(CountingTranslator {
            reply: "Hello",
            ..Default::default()
        });
        let (result, stages) = run(&adapters(StubOcr("Bonjour"), translator.clone()));

        assert_eq!(
            result.unwrap(),
            PipelineOutput {
                original: "Bonjour".to_string(),
                translated: "Hello".to_string(),
            }
        );
        assert_eq!(
            stages,
            vec![Stage::Capturing, Stage::RecognizingText, Stage::Translating]
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            translator.last_job(),
            Some(TranslationJob::new("Bonjour", "en"))
        );
    }

    #[test]
    fn empty_ocr_never_reaches_the_translator() {
        for blank in ["", "   ", "\n\t"] {
            let translator = Arc::new(CountingTranslator::default());
            let (result, stages) = run(&adapters(StubOcr(blank), translator.clone()));

            assert_eq!(result, Err(PipelineError::NoTextDetected));
            assert!(!stages.contains(&Stage::Translating));
            assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn failures_are_mapped_to_the_taxonomy() {
        let (result, _) = run(&adapters(StubOcr("Hola"), Arc::new(FailingTranslator)));
        assert_eq!(
            result,
            Err(PipelineError::TranslationFailure("HTTP 503".to_string()))
        );

        let (result, _) = run(&adapters(MissingOcr, Arc::new(FailingTranslator)));
        assert_eq!(
            result,
            Err(PipelineError::AdapterUnavailable("Tesseract OCR".to_string()))
        );

        let broken = Adapters {
            capture: Arc::new(BrokenCapture),
            ..adapters(StubOcr("x"), Arc::new(FailingTranslator))
        };
        let (result, stages) = run(&broken);
        assert_eq!(
            result,
            Err(PipelineError::CaptureFailure("display gone".to_string()))
        );
        assert_eq!(stages, vec![Stage::Capturing]);
    }

    #[test]
    fn panics_in_the_worker_become_errors() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let dispatcher = UiDispatcher::new(tx, eframe::egui::Context::default());

        spawn_pipeline_run(
            adapters(PanickingOcr, Arc::new(CountingTranslator::default())),
            region(),
            "en".to_string(),
            Duration::ZERO,
            dispatcher,
        );

        let finished = rx
            .iter()
            .find_map(|event| match event {
                PipelineEvent::Finished(result) => Some(result),
                _ => None,
            })
            .unwrap();

        assert_eq!(
            finished,
            Err(PipelineError::WorkerPanicked("engine crashed".to_string()))
        );
    }
}
