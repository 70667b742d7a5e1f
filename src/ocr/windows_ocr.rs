// lingo-live/src/ocr/windows_ocr.rs

// ============================================================================
// BACKEND WINDOWS OCR (Windows 10/11)
// ============================================================================
//
// A imagem vai direto da memória para a API do Windows, sem tocar o disco.
// Os idiomas reconhecidos são os do perfil do usuário.
//
// ============================================================================

use anyhow::{Context, Result};
use image::DynamicImage;
use std::io::Cursor;
use windows::{
    Graphics::Imaging::BitmapDecoder,
    Media::Ocr::OcrEngine,
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
};

use super::{normalize_whitespace, TextRecognizer};
use crate::screenshot;

pub struct WindowsOcr;

impl TextRecognizer for WindowsOcr {
    fn name(&self) -> &'static str {
        "Windows OCR"
    }

    fn is_available(&self) -> bool {
        OcrEngine::TryCreateFromUserProfileLanguages().is_ok()
    }

    fn extract_text(&self, image: &DynamicImage, preprocess: bool) -> Result<String> {
        let prepared = if preprocess {
            screenshot::preprocess_image(image)
        } else {
            image.clone()
        };

        match recognize_in_memory(&prepared) {
            Ok(text) => Ok(text),
            Err(e) => {
                error!("❌ Windows OCR falhou: {:#}", e);
                Ok(String::new())
            }
        }
    }
}

fn recognize_in_memory(image: &DynamicImage) -> Result<String> {
    debug!("🔍 Executando Windows OCR (memória)...");

    // PNG em memória
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .context("Falha ao converter imagem para PNG")?;

    let stream = InMemoryRandomAccessStream::new().context("Falha ao criar stream em memória")?;
    {
        let writer = DataWriter::CreateDataWriter(&stream).context("Falha ao criar DataWriter")?;
        writer
            .WriteBytes(&png_bytes)
            .context("Falha ao escrever bytes")?;
        writer
            .StoreAsync()
            .context("Falha ao iniciar store")?
            .get()
            .context("Falha ao armazenar bytes")?;
        writer.DetachStream().context("Falha ao desanexar stream")?;
    }
    stream.Seek(0).context("Falha ao voltar ao início do stream")?;

    let bitmap = BitmapDecoder::CreateAsync(&stream)
        .context("Falha ao criar decoder")?
        .get()
        .context("Falha ao decodificar imagem")?
        .GetSoftwareBitmapAsync()
        .context("Falha ao criar bitmap")?
        .get()
        .context("Falha ao obter bitmap")?;

    let engine =
        OcrEngine::TryCreateFromUserProfileLanguages().context("Falha ao criar engine OCR")?;

    let result = engine
        .RecognizeAsync(&bitmap)
        .context("Falha ao executar OCR")?
        .get()
        .context("Falha ao obter resultado OCR")?;

    let text = result
        .Text()
        .context("Falha ao obter texto")?
        .to_string_lossy();

    Ok(normalize_whitespace(&text))
}
