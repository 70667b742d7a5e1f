// lingo-live/src/hotkey.rs

// ============================================================================
// MÓDULO HOTKEY - Gerenciamento de hotkeys usando device_query
// ============================================================================
//
// Atalhos vêm do settings.json como texto ("ctrl+alt+t"). Cada parte do
// atalho vira um grupo de teclas alternativas (ctrl = LControl ou RControl).
// O disparo acontece na BORDA: segurar o atalho dispara uma vez só.
//
// ============================================================================

use anyhow::Result;
use device_query::{DeviceQuery, DeviceState, Keycode};

/// Ações disparadas por hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    NewSelection,
    Quit,
}

const LETTERS: [Keycode; 26] = [
    Keycode::A,
    Keycode::B,
    Keycode::C,
    Keycode::D,
    Keycode::E,
    Keycode::F,
    Keycode::G,
    Keycode::H,
    Keycode::I,
    Keycode::J,
    Keycode::K,
    Keycode::L,
    Keycode::M,
    Keycode::N,
    Keycode::O,
    Keycode::P,
    Keycode::Q,
    Keycode::R,
    Keycode::S,
    Keycode::T,
    Keycode::U,
    Keycode::V,
    Keycode::W,
    Keycode::X,
    Keycode::Y,
    Keycode::Z,
];

const DIGITS: [Keycode; 10] = [
    Keycode::Key0,
    Keycode::Key1,
    Keycode::Key2,
    Keycode::Key3,
    Keycode::Key4,
    Keycode::Key5,
    Keycode::Key6,
    Keycode::Key7,
    Keycode::Key8,
    Keycode::Key9,
];

const NUMPAD: [Keycode; 10] = [
    Keycode::Numpad0,
    Keycode::Numpad1,
    Keycode::Numpad2,
    Keycode::Numpad3,
    Keycode::Numpad4,
    Keycode::Numpad5,
    Keycode::Numpad6,
    Keycode::Numpad7,
    Keycode::Numpad8,
    Keycode::Numpad9,
];

const FUNCTION_KEYS: [Keycode; 12] = [
    Keycode::F1,
    Keycode::F2,
    Keycode::F3,
    Keycode::F4,
    Keycode::F5,
    Keycode::F6,
    Keycode::F7,
    Keycode::F8,
    Keycode::F9,
    Keycode::F10,
    Keycode::F11,
    Keycode::F12,
];

// ============================================================================
// PARSE DOS ATALHOS
// ============================================================================

/// Combinação de teclas: todas as partes precisam estar pressionadas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    groups: Vec<Vec<Keycode>>,
}

impl Chord {
    /// Lê "ctrl+alt+t". Texto vazio = atalho desativado (`None`).
    pub fn parse(text: &str) -> Result<Option<Chord>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut groups = Vec::new();
        for token in text.split('+') {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                anyhow::bail!("Atalho inválido: '{}'", text);
            }
            let keys = keys_for_token(&token)
                .ok_or_else(|| anyhow::anyhow!("Tecla desconhecida '{}' em '{}'", token, text))?;
            groups.push(keys);
        }

        Ok(Some(Chord { groups }))
    }

    /// Todas as partes estão pressionadas agora?
    pub fn is_pressed(&self, pressed: &[Keycode]) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|key| pressed.contains(key)))
    }
}

fn keys_for_token(token: &str) -> Option<Vec<Keycode>> {
    let keys = match token {
        "ctrl" | "control" => vec![Keycode::LControl, Keycode::RControl],
        "alt" | "option" => vec![Keycode::LAlt, Keycode::RAlt],
        "shift" => vec![Keycode::LShift, Keycode::RShift],
        "meta" | "win" | "super" | "cmd" => vec![Keycode::LMeta, Keycode::RMeta],
        "esc" | "escape" => vec![Keycode::Escape],
        "space" => vec![Keycode::Space],
        "enter" | "return" => vec![Keycode::Enter],
        "tab" => vec![Keycode::Tab],
        "numpad+" | "numpadadd" => vec![Keycode::NumpadAdd],
        "numpad-" | "numpadsubtract" => vec![Keycode::NumpadSubtract],
        _ => return single_key(token).map(|key| vec![key]),
    };
    Some(keys)
}

/// Letras, dígitos, F1-F12 e numpad0-numpad9
fn single_key(token: &str) -> Option<Keycode> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return LETTERS.get((c as u8 - b'a') as usize).cloned();
        }
        if c.is_ascii_digit() {
            return DIGITS.get((c as u8 - b'0') as usize).cloned();
        }
        return None;
    }

    if let Some(n) = token.strip_prefix("numpad") {
        let n: usize = n.parse().ok()?;
        return NUMPAD.get(n).cloned();
    }

    if let Some(n) = token.strip_prefix('f') {
        let n: usize = n.parse().ok()?;
        return FUNCTION_KEYS.get(n.checked_sub(1)?).cloned();
    }

    None
}

// ============================================================================
// DETECÇÃO NA BORDA
// ============================================================================

/// Lembra quais atalhos já estavam pressionados no último ciclo
#[derive(Debug, Default)]
pub struct EdgeDetector {
    bindings: Vec<(HotkeyAction, Chord)>,
    held: Vec<HotkeyAction>,
}

impl EdgeDetector {
    pub fn new(bindings: Vec<(HotkeyAction, Chord)>) -> Self {
        EdgeDetector {
            bindings,
            held: Vec::new(),
        }
    }

    /// Recebe as teclas pressionadas e devolve os atalhos que ACABARAM de
    /// ser pressionados.
    pub fn update(&mut self, pressed: &[Keycode]) -> Vec<HotkeyAction> {
        let mut fired = Vec::new();

        for (action, chord) in &self.bindings {
            let down = chord.is_pressed(pressed);
            let was_down = self.held.contains(action);

            if down && !was_down {
                self.held.push(*action);
                fired.push(*action);
            } else if !down && was_down {
                self.held.retain(|held| held != action);
            }
        }

        fired
    }
}

/// Estrutura que gerencia hotkeys
pub struct HotkeyManager {
    device_state: DeviceState,
    detector: EdgeDetector,
}

impl HotkeyManager {
    /// `exit_hotkey` vazio desativa o atalho de saída
    pub fn new(hotkey: &str, exit_hotkey: &str) -> Result<Self> {
        info!("⌨️  Configurando detecção de teclas...");

        let mut bindings = Vec::new();

        match Chord::parse(hotkey)? {
            Some(chord) => {
                info!("   🎯 Nova seleção: {}", hotkey);
                bindings.push((HotkeyAction::NewSelection, chord));
            }
            None => warn!("⚠️  Atalho de seleção vazio, só o botão New funciona"),
        }

        if let Some(chord) = Chord::parse(exit_hotkey)? {
            info!("   👋 Sair: {}", exit_hotkey);
            bindings.push((HotkeyAction::Quit, chord));
        }

        info!("✅ Detecção de teclas configurada!");

        Ok(HotkeyManager {
            device_state: DeviceState::new(),
            detector: EdgeDetector::new(bindings),
        })
    }

    /// Atalhos que acabaram de ser pressionados
    pub fn check_hotkeys(&mut self) -> Vec<HotkeyAction> {
        let keys = self.device_state.get_keys();
        self.detector.update(&keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(text: &str) -> Chord {
        Chord::parse(text).unwrap().unwrap()
    }

    #[test]
    fn parses_modifiers_letters_and_function_keys() {
        let c = chord("Ctrl+Alt+T");
        assert!(c.is_pressed(&[Keycode::LControl, Keycode::RAlt, Keycode::T]));
        assert!(!c.is_pressed(&[Keycode::LControl, Keycode::T]));

        assert!(chord("shift+f12").is_pressed(&[Keycode::RShift, Keycode::F12]));
        assert!(chord("numpad3").is_pressed(&[Keycode::Numpad3]));
        assert!(chord("ctrl+7").is_pressed(&[Keycode::LControl, Keycode::Key7]));
    }

    #[test]
    fn empty_disables_and_garbage_is_rejected() {
        assert!(Chord::parse("").unwrap().is_none());
        assert!(Chord::parse("   ").unwrap().is_none());
        assert!(Chord::parse("ctrl+banana").is_err());
        assert!(Chord::parse("ctrl++t").is_err());
        assert!(Chord::parse("f13").is_err());
        assert!(Chord::parse("f0").is_err());
    }

    #[test]
    fn holding_the_chord_fires_once() {
        let mut detector = EdgeDetector::new(vec![
            (HotkeyAction::NewSelection, chord("ctrl+alt+t")),
            (HotkeyAction::Quit, chord("ctrl+alt+q")),
        ]);
        let held = [Keycode::LControl, Keycode::LAlt, Keycode::T];

        assert!(detector.update(&[Keycode::LControl]).is_empty());
        assert_eq!(detector.update(&held), vec![HotkeyAction::NewSelection]);
        assert!(detector.update(&held).is_empty());
        assert!(detector.update(&held).is_empty());

        // Solta e aperta de novo: dispara outra vez
        assert!(detector.update(&[]).is_empty());
        assert_eq!(detector.update(&held), vec![HotkeyAction::NewSelection]);

        let quit = [Keycode::RControl, Keycode::RAlt, Keycode::Q];
        assert_eq!(detector.update(&quit), vec![HotkeyAction::Quit]);
    }
}
