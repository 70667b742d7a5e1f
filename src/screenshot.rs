// lingo-live/src/screenshot.rs

// ============================================================================
// MÓDULO SCREENSHOT - Captura de tela
// ============================================================================
//
// Cada chamada enumera os monitores de novo: nenhum handle de captura é
// guardado entre chamadas, então qualquer thread pode capturar.
//
// ============================================================================

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, Rgba};
use screenshots::Screen;

use crate::app_state::{CaptureResult, ScreenRegion};

// ============================================================================
// CONTRATO DO CAPTURE PROVIDER
// ============================================================================

/// Fornece bitmaps de regiões da tela
pub trait ScreenCapture: Send + Sync {
    /// Captura exatamente a região pedida
    fn capture_region(&self, region: &ScreenRegion) -> Result<CaptureResult>;
}

/// Geometria do monitor principal (pixels físicos)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        DisplayGeometry {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            scale_factor: 1.0,
        }
    }
}

/// Lê a geometria do monitor principal
pub fn primary_display() -> Result<DisplayGeometry> {
    let screens = Screen::all().context("Falha ao listar monitores")?;

    // Monitor principal (índice 0)
    let screen = screens.first().context("Nenhum monitor encontrado")?;

    let info = &screen.display_info;
    Ok(DisplayGeometry {
        x: info.x,
        y: info.y,
        width: info.width,
        height: info.height,
        scale_factor: info.scale_factor,
    })
}

// ============================================================================
// IMPLEMENTAÇÃO COM O CRATE `screenshots`
// ============================================================================

/// Capture provider padrão (em memória, sem salvar em disco)
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenshotsCapture;

impl ScreenCapture for ScreenshotsCapture {
    fn capture_region(&self, region: &ScreenRegion) -> Result<CaptureResult> {
        let image = capture_area(region.x1, region.y1, region.width(), region.height())?;

        Ok(CaptureResult {
            image,
            origin: region.top_left(),
        })
    }
}

/// Captura uma área em coordenadas absolutas de tela
fn capture_area(x: i32, y: i32, width: u32, height: u32) -> Result<DynamicImage> {
    trace!("📸 Capturando {}x{} em ({}, {})", width, height, x, y);

    // Monitor que contém o canto superior esquerdo
    let screen = Screen::from_point(x, y).context("Nenhum monitor na posição pedida")?;
    let (screen_x, screen_y) = (screen.display_info.x, screen.display_info.y);
    let (screen_width, screen_height) = (screen.display_info.width, screen.display_info.height);

    // Converte para coordenadas relativas ao monitor e recorta nas bordas
    let local_x = x - screen_x;
    let local_y = y - screen_y;
    let (width, height) =
        clamp_to_screen(local_x, local_y, width, height, screen_width, screen_height)
            .with_context(|| {
                format!(
                    "Região ({},{} {}x{}) está fora dos limites da tela ({}x{})",
                    x, y, width, height, screen_width, screen_height
                )
            })?;

    let buffer = screen
        .capture_area(local_x, local_y, width, height)
        .context("Falha ao capturar tela")?;

    buffer_to_image(&buffer)
}

/// Recorta a largura/altura para caber na tela. `None` se não sobra nada.
fn clamp_to_screen(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    screen_width: u32,
    screen_height: u32,
) -> Option<(u32, u32)> {
    if x < 0 || y < 0 || x as u32 >= screen_width || y as u32 >= screen_height {
        return None;
    }

    let width = width.min(screen_width - x as u32);
    let height = height.min(screen_height - y as u32);

    if width == 0 || height == 0 {
        return None;
    }

    Some((width, height))
}

/// Converte o buffer da screenshot para DynamicImage
fn buffer_to_image(buffer: &screenshots::Image) -> Result<DynamicImage> {
    let width = buffer.width();
    let height = buffer.height();
    let rgba = buffer.rgba();

    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, rgba.to_vec())
            .context("Falha ao criar ImageBuffer")?;

    Ok(DynamicImage::ImageRgba8(img_buffer))
}

// ============================================================================
// PRÉ-PROCESSAMENTO PARA OCR
// ============================================================================

/// Fator de contraste aplicado antes do OCR
pub const OCR_CONTRAST: f32 = 1.5;

/// Pré-processa uma imagem para melhorar o OCR
/// - Converte para escala de cinza
/// - Aumenta contraste
pub fn preprocess_image(image: &DynamicImage) -> DynamicImage {
    let gray = DynamicImage::ImageLuma8(image.to_luma8());

    // adjust_contrast recebe porcentagem: 1.5x = +50
    gray.adjust_contrast((OCR_CONTRAST - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_regions_inside_the_screen() {
        assert_eq!(clamp_to_screen(0, 0, 100, 50, 1920, 1080), Some((100, 50)));
        assert_eq!(
            clamp_to_screen(1900, 1070, 100, 50, 1920, 1080),
            Some((20, 10))
        );
        assert_eq!(clamp_to_screen(1920, 0, 100, 50, 1920, 1080), None);
        assert_eq!(clamp_to_screen(-5, 0, 100, 50, 1920, 1080), None);
    }

    #[test]
    fn preprocess_outputs_grayscale_of_same_size() {
        let mut img = image::RgbaImage::new(8, 4);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 30) as u8, 10, 200, 255]);
        }

        let processed = preprocess_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(processed.width(), 8);
        assert_eq!(processed.height(), 4);
        assert!(matches!(processed, DynamicImage::ImageLuma8(_)));
    }
}
