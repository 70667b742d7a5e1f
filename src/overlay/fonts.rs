// lingo-live/src/overlay/fonts.rs

// ============================================================================
// FONTES E TEMA DO OVERLAY
// ============================================================================

use std::path::Path;

use crate::config::Settings;

/// Nome da família usada no texto do overlay
pub const OVERLAY_FONT_FAMILY: &str = "overlay_text";

/// Carrega a fonte do texto (se configurada) e aplica o tema.
pub fn setup_fonts_and_theme(ctx: &eframe::egui::Context, settings: &Settings) {
    ctx.set_fonts(overlay_font_definitions(settings));
    ctx.set_visuals(visuals_for_theme(&settings.theme));
}

/// Família "overlay_text": arquivo de `font_path` (se houver) na frente das
/// fontes padrão da família escolhida em `font_family`.
fn overlay_font_definitions(settings: &Settings) -> eframe::egui::FontDefinitions {
    let mut fonts = eframe::egui::FontDefinitions::default();
    let overlay_family = eframe::egui::FontFamily::Name(OVERLAY_FONT_FAMILY.into());

    let base = base_family(&settings.font_family);
    let mut family_fonts = fonts.families.get(&base).cloned().unwrap_or_default();
    debug!("🔤 Família base: {:?} ({})", base, settings.font_family);

    let font_path = Path::new(&settings.font_path);
    if !settings.font_path.is_empty() {
        match std::fs::read(font_path) {
            Ok(font_data) => {
                fonts.font_data.insert(
                    OVERLAY_FONT_FAMILY.to_owned(),
                    eframe::egui::FontData::from_owned(font_data),
                );
                family_fonts.insert(0, OVERLAY_FONT_FAMILY.to_owned());
                info!("🔤 Fonte do overlay: {:?}", font_path);
            }
            Err(e) => {
                error!("❌ Erro ao carregar fonte {:?}: {}", font_path, e);
            }
        }
    }

    fonts.families.insert(overlay_family, family_fonts);
    fonts
}

/// Nomes de fontes de largura fixa usam a família monoespaçada do egui
fn base_family(font_family: &str) -> eframe::egui::FontFamily {
    let name = font_family.to_ascii_lowercase();
    let monospace = ["mono", "courier", "consolas", "menlo", "fixed"]
        .iter()
        .any(|hint| name.contains(hint));

    if monospace {
        eframe::egui::FontFamily::Monospace
    } else {
        eframe::egui::FontFamily::Proportional
    }
}

fn visuals_for_theme(theme: &str) -> eframe::egui::Visuals {
    if theme.eq_ignore_ascii_case("light") {
        eframe::egui::Visuals::light()
    } else {
        eframe::egui::Visuals::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_themes_are_dark() {
        assert!(!visuals_for_theme("Light").dark_mode);
        assert!(!visuals_for_theme("light").dark_mode);
        assert!(visuals_for_theme("Dark").dark_mode);
        assert!(visuals_for_theme("solarized").dark_mode);
    }

    fn overlay_fonts(settings: &Settings) -> Vec<String> {
        let fonts = overlay_font_definitions(settings);
        fonts.families[&eframe::egui::FontFamily::Name(OVERLAY_FONT_FAMILY.into())].clone()
    }

    #[test]
    fn missing_font_file_keeps_default_family() {
        let ctx = eframe::egui::Context::default();
        let mut settings = Settings::default();
        settings.font_path = "/definitely/not/here.ttf".to_string();

        // Não pode entrar em pânico
        setup_fonts_and_theme(&ctx, &settings);

        let defaults = eframe::egui::FontDefinitions::default();
        assert_eq!(
            overlay_fonts(&settings),
            defaults.families[&eframe::egui::FontFamily::Proportional]
        );
    }

    #[test]
    fn font_family_picks_the_base_fonts() {
        let defaults = eframe::egui::FontDefinitions::default();
        let mut settings = Settings::default();

        settings.font_family = "Consolas".to_string();
        assert_eq!(
            overlay_fonts(&settings),
            defaults.families[&eframe::egui::FontFamily::Monospace]
        );

        settings.font_family = "Segoe UI".to_string();
        assert_eq!(
            overlay_fonts(&settings),
            defaults.families[&eframe::egui::FontFamily::Proportional]
        );

        assert_eq!(base_family("JetBrains Mono"), eframe::egui::FontFamily::Monospace);
    }
}
