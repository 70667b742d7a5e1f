// lingo-live/src/tts.rs

// ============================================================================
// MÓDULO TTS - Text-to-Speech (áudio do Google Translate + rodio)
// ============================================================================
//
// A reprodução roda numa thread própria. Cada `speak` ganha um número de
// geração; `stop` avança a geração e para o áudio atual, então uma thread
// antiga que ainda esteja baixando áudio desiste sozinha.
//
// ============================================================================

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::Settings;

const TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Limite de caracteres por requisição do endpoint de TTS
pub const MAX_CHUNK_CHARS: usize = 200;

pub struct Speaker {
    enabled: bool,
    timeout: Duration,
    generation: Arc<AtomicU64>,
    current: Arc<Mutex<Option<Arc<Sink>>>>,
}

impl Speaker {
    pub fn from_settings(settings: &Settings) -> Self {
        Speaker {
            enabled: settings.tts_enabled,
            timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
            generation: Arc::new(AtomicU64::new(0)),
            current: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    /// Fala o texto em segundo plano (interrompe o que estiver tocando)
    pub fn speak(&self, text: &str, lang: &str) {
        if !self.enabled || text.trim().is_empty() {
            return;
        }

        self.stop();
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        let lang = lang.to_string();
        let timeout = self.timeout;
        let generation = Arc::clone(&self.generation);
        let current = Arc::clone(&self.current);

        info!("🔊 Sintetizando voz ({} partes)...", chunks.len());

        thread::spawn(move || {
            let still_current = || generation.load(Ordering::SeqCst) == my_generation;

            let audio = match download_audio(&chunks, &lang, timeout, &still_current) {
                Ok(Some(audio)) => audio,
                Ok(None) => return,
                Err(e) => {
                    error!("❌ Falha ao baixar áudio: {:#}", e);
                    return;
                }
            };

            if let Err(e) = play(audio, &current, &still_current) {
                error!("❌ Falha ao reproduzir áudio: {:#}", e);
            }
        });
    }

    /// Para a fala atual (melhor esforço)
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let sink = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(sink) = sink {
            sink.stop();
            debug!("🔇 Fala interrompida");
        }
    }
}

/// Baixa o MP3 de cada parte. `None` se a fala foi cancelada no meio.
fn download_audio(
    chunks: &[String],
    lang: &str,
    timeout: Duration,
    still_current: &dyn Fn() -> bool,
) -> Result<Option<Vec<Vec<u8>>>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Falha ao criar runtime tokio")?;

    runtime.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Falha ao criar cliente HTTP")?;

        let mut audio = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if !still_current() {
                return Ok(None);
            }

            let url = format!(
                "{}?ie=UTF-8&client=tw-ob&tl={}&q={}",
                TTS_URL,
                lang,
                urlencoding::encode(chunk)
            );

            let response = client
                .get(&url)
                .header("User-Agent", "Mozilla/5.0")
                .send()
                .await
                .context("Falha na requisição de TTS")?;

            if !response.status().is_success() {
                anyhow::bail!("TTS erro: {}", response.status());
            }

            audio.push(response.bytes().await?.to_vec());
        }

        Ok(Some(audio))
    })
}

fn play(
    audio: Vec<Vec<u8>>,
    current: &Mutex<Option<Arc<Sink>>>,
    still_current: &dyn Fn() -> bool,
) -> Result<()> {
    // O OutputStream precisa viver até o fim da reprodução
    let (_stream, handle) = OutputStream::try_default().context("Nenhuma saída de áudio")?;
    let sink = Arc::new(Sink::try_new(&handle).context("Falha ao criar sink de áudio")?);

    for bytes in audio {
        let source = Decoder::new(Cursor::new(bytes)).context("Áudio inválido")?;
        sink.append(source);
    }

    {
        let mut slot = current.lock().unwrap_or_else(|e| e.into_inner());
        if !still_current() {
            return Ok(());
        }
        *slot = Some(Arc::clone(&sink));
    }

    sink.sleep_until_end();

    let mut slot = current.lock().unwrap_or_else(|e| e.into_inner());
    if slot.as_ref().is_some_and(|s| Arc::ptr_eq(s, &sink)) {
        *slot = None;
    }

    Ok(())
}

/// Quebra o texto em partes de até `max_chars`, preferindo espaços
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        // Palavra maior que o limite: corta por caractere
        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(max_chars).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                chunks.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_respect_the_limit_and_keep_words() {
        let text = "one two three four five six";
        let chunks = split_into_chunks(text, 10);
        assert_eq!(chunks, vec!["one two", "three four", "five six"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn long_words_are_cut() {
        let chunks = split_into_chunks("abcdefghij xy", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn multibyte_text_is_counted_by_chars() {
        let text = "日本語のテキスト";
        let chunks = split_into_chunks(text, 3);
        assert_eq!(chunks, vec!["日本語", "のテキ", "スト"]);
        assert!(split_into_chunks("   ", 200).is_empty());
    }

    #[test]
    fn disabled_speaker_does_nothing() {
        let speaker = Speaker::from_settings(&Settings::default());
        assert!(!speaker.is_available());
        speaker.speak("hello", "en");
        speaker.stop();
        assert!(speaker.current.lock().unwrap().is_none());
    }
}
