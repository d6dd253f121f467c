//! Colour themes.
//!
//! Six predefined palettes. Each theme names a default ambient sound and a
//! colour per timer mode; the selected theme id is persisted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::sound::BackgroundSound;
use crate::store::{load_value, save_value, KeyValueStore};
use crate::types::TimerMode;

/// Store key for the selected theme id.
pub const SELECTED_THEME_KEY: &str = "selected_theme";

/// Theme used when nothing (or an unknown id) is persisted.
pub const DEFAULT_THEME_ID: &str = "forest";

/// Errors returned by theme operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// No predefined theme has this id.
    #[error("unknown theme: {0}")]
    Unknown(String),
}

impl ThemeError {
    /// Returns a suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "run `tomato-focus theme list` to see available themes",
        }
    }
}

// ============================================================================
// Rgba
// ============================================================================

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Parses `RGB`, `RRGGBB` or `AARRGGBB` hex, with or without a leading `#`.
    ///
    /// Anything else parses to opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let digits: String = hex.chars().filter(char::is_ascii_alphanumeric).collect();
        let Ok(value) = u32::from_str_radix(&digits, 16) else {
            return Self::BLACK;
        };

        // `as u8` keeps the low byte.
        match digits.len() {
            3 => Self {
                r: ((value >> 8) & 0xF) as u8 * 17,
                g: ((value >> 4) & 0xF) as u8 * 17,
                b: (value & 0xF) as u8 * 17,
                a: 255,
            },
            6 => Self {
                r: (value >> 16) as u8,
                g: (value >> 8) as u8,
                b: value as u8,
                a: 255,
            },
            8 => Self {
                a: (value >> 24) as u8,
                r: (value >> 16) as u8,
                g: (value >> 8) as u8,
                b: value as u8,
            },
            _ => Self::BLACK,
        }
    }

    /// Opaque black.
    pub const BLACK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Returns this colour with its alpha scaled by `opacity` (0.0-1.0).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    /// Formats as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// ============================================================================
// AppTheme
// ============================================================================

/// A predefined colour palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub default_sound: BackgroundSound,
    pub background: [&'static str; 3],
    pub card: &'static str,
    pub focus: &'static str,
    pub short_break: &'static str,
    pub long_break: &'static str,
    pub primary_text: &'static str,
    pub secondary_text: &'static str,
    pub accent: &'static str,
    pub button_background: &'static str,
}

impl AppTheme {
    /// Timer colour for a mode.
    pub fn timer_color(&self, mode: TimerMode) -> Rgba {
        let hex = match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        };
        Rgba::from_hex(hex)
    }

    /// Two-stop gradient for a mode: the timer colour, then the same at 70%.
    pub fn gradient(&self, mode: TimerMode) -> [Rgba; 2] {
        let base = self.timer_color(mode);
        [base, base.with_opacity(0.7)]
    }

    /// Background gradient stops.
    pub fn background_colors(&self) -> Vec<Rgba> {
        self.background.iter().map(|hex| Rgba::from_hex(hex)).collect()
    }

    pub fn accent_color(&self) -> Rgba {
        Rgba::from_hex(self.accent)
    }
}

/// The predefined themes, in cycle order.
pub static THEMES: [AppTheme; 6] = [
    AppTheme {
        id: "forest",
        name: "Forest",
        emoji: "🌸",
        default_sound: BackgroundSound::Forest,
        background: ["2D5016", "3E7F2D", "5BA046"],
        card: "4CAF50",
        focus: "388E3C",
        short_break: "66BB6A",
        long_break: "81C784",
        primary_text: "FFFFFF",
        secondary_text: "E8F5E8",
        accent: "4CAF50",
        button_background: "2E7D32",
    },
    AppTheme {
        id: "ocean",
        name: "Ocean",
        emoji: "🌊",
        default_sound: BackgroundSound::Ocean,
        background: ["0D47A1", "1565C0", "1976D2"],
        card: "1976D2",
        focus: "1565C0",
        short_break: "42A5F5",
        long_break: "64B5F6",
        primary_text: "FFFFFF",
        secondary_text: "E3F2FD",
        accent: "2196F3",
        button_background: "0D47A1",
    },
    AppTheme {
        id: "cafe",
        name: "Cafe",
        emoji: "☕",
        default_sound: BackgroundSound::Cafe,
        background: ["3E2723", "5D4037", "6D4C41"],
        card: "6D4C41",
        focus: "5D4037",
        short_break: "8D6E63",
        long_break: "A1887F",
        primary_text: "FFFFFF",
        secondary_text: "EFEBE9",
        accent: "795548",
        button_background: "3E2723",
    },
    AppTheme {
        id: "minimal",
        name: "Minimal",
        emoji: "🌙",
        default_sound: BackgroundSound::WhiteNoise,
        background: ["212121", "424242", "616161"],
        card: "424242",
        focus: "757575",
        short_break: "9E9E9E",
        long_break: "BDBDBD",
        primary_text: "FFFFFF",
        secondary_text: "E0E0E0",
        accent: "9E9E9E",
        button_background: "212121",
    },
    AppTheme {
        id: "lofi",
        name: "Lofi",
        emoji: "🎵",
        default_sound: BackgroundSound::Rain,
        background: ["4A148C", "6A1B9A", "7B1FA2"],
        card: "7B1FA2",
        focus: "6A1B9A",
        short_break: "9C27B0",
        long_break: "BA68C8",
        primary_text: "FFFFFF",
        secondary_text: "F3E5F5",
        accent: "9C27B0",
        button_background: "4A148C",
    },
    AppTheme {
        id: "tech",
        name: "Tech",
        emoji: "🚀",
        default_sound: BackgroundSound::WhiteNoise,
        background: ["1A237E", "283593", "303F9F"],
        card: "303F9F",
        focus: "283593",
        short_break: "5C6BC0",
        long_break: "7986CB",
        primary_text: "FFFFFF",
        secondary_text: "E8EAF6",
        accent: "3F51B5",
        button_background: "1A237E",
    },
];

/// Looks up a predefined theme by id (case-insensitive).
pub fn find_theme(id: &str) -> Option<&'static AppTheme> {
    THEMES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

// ============================================================================
// ThemeManager
// ============================================================================

/// Holds the selected theme and persists changes to it.
pub struct ThemeManager {
    store: Arc<dyn KeyValueStore>,
    current: &'static AppTheme,
}

impl ThemeManager {
    /// Loads the persisted theme, falling back to the default.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let saved: Option<String> = load_value(store.as_ref(), SELECTED_THEME_KEY);
        let current = saved
            .as_deref()
            .and_then(find_theme)
            .unwrap_or(&THEMES[0]);
        debug!("Loaded theme '{}'", current.id);
        Self { store, current }
    }

    /// The selected theme.
    pub fn current(&self) -> &'static AppTheme {
        self.current
    }

    /// Selects the theme with this id.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::Unknown` if no predefined theme matches.
    pub fn set_theme(&mut self, id: &str) -> Result<&'static AppTheme, ThemeError> {
        let theme = find_theme(id).ok_or_else(|| ThemeError::Unknown(id.to_string()))?;
        self.apply(theme);
        Ok(theme)
    }

    /// Advances to the next theme, wrapping around.
    pub fn next_theme(&mut self) -> &'static AppTheme {
        let index = THEMES
            .iter()
            .position(|t| t.id == self.current.id)
            .unwrap_or(0);
        let next = &THEMES[(index + 1) % THEMES.len()];
        self.apply(next);
        next
    }

    /// Default ambient sound of the selected theme.
    pub fn default_sound(&self) -> BackgroundSound {
        self.current.default_sound
    }

    /// Timer colour of the selected theme for a mode.
    pub fn timer_color(&self, mode: TimerMode) -> Rgba {
        self.current.timer_color(mode)
    }

    fn apply(&mut self, theme: &'static AppTheme) {
        self.current = theme;
        save_value(self.store.as_ref(), SELECTED_THEME_KEY, &theme.id);
        info!("Theme set to '{}'", theme.id);
    }
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("current", &self.current.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_from_hex_six_digits() {
        let c = Rgba::from_hex("388E3C");
        assert_eq!((c.r, c.g, c.b, c.a), (0x38, 0x8E, 0x3C, 255));
        assert_eq!(Rgba::from_hex("#388E3C"), c);
    }

    #[test]
    fn test_from_hex_three_digits() {
        let c = Rgba::from_hex("F80");
        assert_eq!((c.r, c.g, c.b, c.a), (255, 136, 0, 255));
    }

    #[test]
    fn test_from_hex_eight_digits() {
        let c = Rgba::from_hex("80FF0000");
        assert_eq!((c.r, c.g, c.b, c.a), (255, 0, 0, 0x80));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert_eq!(Rgba::from_hex("zz"), Rgba::BLACK);
        assert_eq!(Rgba::from_hex("12345"), Rgba::BLACK);
        assert_eq!(Rgba::from_hex(""), Rgba::BLACK);
    }

    #[test]
    fn test_to_hex_and_opacity() {
        let c = Rgba::from_hex("4caf50");
        assert_eq!(c.to_hex(), "#4CAF50");
        assert!((178..=179).contains(&c.with_opacity(0.7).a));
    }

    #[test]
    fn test_all_theme_colours_parse() {
        for theme in &THEMES {
            for hex in theme
                .background
                .iter()
                .chain([&theme.card, &theme.focus, &theme.accent])
            {
                assert_ne!(Rgba::from_hex(hex), Rgba::BLACK, "{} {}", theme.id, hex);
            }
        }
    }

    #[test]
    fn test_default_theme() {
        let manager = ThemeManager::load(Arc::new(MemoryStore::new()));
        assert_eq!(manager.current().id, DEFAULT_THEME_ID);
        assert_eq!(manager.default_sound(), BackgroundSound::Forest);
    }

    #[test]
    fn test_set_theme_persists() {
        let kv = Arc::new(MemoryStore::new());
        let mut manager = ThemeManager::load(kv.clone());

        let theme = manager.set_theme("Ocean").unwrap();
        assert_eq!(theme.id, "ocean");

        let reloaded = ThemeManager::load(kv);
        assert_eq!(reloaded.current().id, "ocean");
        assert_eq!(reloaded.default_sound(), BackgroundSound::Ocean);
    }

    #[test]
    fn test_set_unknown_theme() {
        let mut manager = ThemeManager::load(Arc::new(MemoryStore::new()));
        assert_eq!(
            manager.set_theme("neon").unwrap_err(),
            ThemeError::Unknown("neon".to_string())
        );
        assert_eq!(manager.current().id, "forest");
    }

    #[test]
    fn test_next_theme_wraps() {
        let mut manager = ThemeManager::load(Arc::new(MemoryStore::new()));
        let mut seen = vec![manager.current().id];
        for _ in 0..THEMES.len() {
            seen.push(manager.next_theme().id);
        }
        assert_eq!(seen.first(), seen.last());
        assert_eq!(seen[1], "ocean");
    }

    #[test]
    fn test_timer_color_per_mode() {
        let manager = ThemeManager::load(Arc::new(MemoryStore::new()));
        assert_eq!(manager.timer_color(TimerMode::Focus), Rgba::from_hex("388E3C"));
        assert_eq!(
            manager.timer_color(TimerMode::LongBreak),
            Rgba::from_hex("81C784")
        );
        let [base, faded] = manager.current().gradient(TimerMode::ShortBreak);
        assert_eq!(base.a, 255);
        assert!(faded.a < base.a);
    }
}
