///! Theme palettes

use resvg::tiny_skia;
use sensei_common::Theme;

/// Opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// `#RRGGBB` for SVG attributes
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.0, self.1, self.2, 255)
    }
}

/// Colours used by one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub title: Rgb,
    pub body: Rgb,
    pub separator: Rgb,
    pub box_outline: Rgb,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Rgb::WHITE,
        title: Rgb::BLACK,
        body: Rgb::BLACK,
        separator: Rgb::BLACK,
        box_outline: Rgb::BLACK,
    };

    pub const DARK: Palette = Palette {
        background: Rgb(0x12, 0x12, 0x12),
        title: Rgb::WHITE,
        body: Rgb(0xE0, 0xE0, 0xE0),
        separator: Rgb(0x44, 0x44, 0x44),
        box_outline: Rgb(0x8A, 0x8A, 0x8A),
    };

    /// Fixed palette of the mockup layout, independent of dark/light
    pub const MOCKUP: Palette = Palette {
        background: Rgb(0xF5, 0xF1, 0xE8),
        title: Rgb(0x1F, 0x3A, 0x5F),
        body: Rgb(0x2E, 0x2E, 0x2E),
        separator: Rgb(0xC8, 0xB9, 0x8F),
        box_outline: Rgb(0x1F, 0x3A, 0x5F),
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
            Theme::Mockup => Self::MOCKUP,
        }
    }
}
