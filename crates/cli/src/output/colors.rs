use crossterm::style::Color;
use opkit_core::help::Tone;
use opkit_core::value::{EnumMember, EnumSpec};

/// Trait for converting semantic styles to terminal colors
pub trait AsTermColor {
    fn as_crossterm_color(&self) -> Color;
}

impl AsTermColor for Tone {
    fn as_crossterm_color(&self) -> Color {
        match self {
            Tone::Title | Tone::Text => Color::Green,
            Tone::Heading => Color::Grey,
            Tone::Name => Color::Cyan,
            Tone::Hint => Color::DarkCyan,
            Tone::Plain => Color::Reset,
        }
    }
}

/// RGB values for the 16 named console colors.
type Palette = [(Color, (u8, u8, u8)); 16];

/// Named palettes that replace the 16 console colors with fixed RGB values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// The terminal's own colors.
    #[default]
    Default,
    Vintage,
    Campbell,
    HalfDark,
    Raspberry,
}

/// Scheme names for option binding and help.
pub static COLOR_SCHEMES: EnumSpec = EnumSpec::new(
    "ColorScheme",
    &[
        EnumMember::new("Default", 0),
        EnumMember::new("Vintage", 1),
        EnumMember::new("Campbell", 2),
        EnumMember::new("HalfDark", 3),
        EnumMember::new("Raspberry", 4),
    ],
);

impl ColorScheme {
    #[must_use]
    pub fn from_member(member: EnumMember) -> Option<Self> {
        match member.ordinal {
            0 => Some(Self::Default),
            1 => Some(Self::Vintage),
            2 => Some(Self::Campbell),
            3 => Some(Self::HalfDark),
            4 => Some(Self::Raspberry),
            _ => None,
        }
    }

    fn palette(self) -> Option<&'static Palette> {
        match self {
            Self::Default => None,
            Self::Vintage => Some(&VINTAGE),
            Self::Campbell => Some(&CAMPBELL),
            Self::HalfDark => Some(&HALF_DARK),
            Self::Raspberry => Some(&RASPBERRY),
        }
    }

    /// Maps a named console color to this scheme's RGB value. Other colors, and every
    /// color under [`ColorScheme::Default`], pass through unchanged.
    #[must_use]
    pub fn resolve(self, color: Color) -> Color {
        let Some(palette) = self.palette() else {
            return color;
        };

        palette
            .iter()
            .find(|(named, _)| *named == color)
            .map_or(color, |&(_, (r, g, b))| Color::Rgb { r, g, b })
    }
}

const HALF_DARK: Palette = [
    (Color::Black, (40, 44, 52)),
    (Color::DarkBlue, (97, 175, 239)),
    (Color::DarkGreen, (152, 195, 121)),
    (Color::DarkCyan, (101, 188, 199)),
    (Color::DarkRed, (224, 108, 117)),
    (Color::DarkMagenta, (198, 120, 221)),
    (Color::DarkYellow, (229, 192, 123)),
    (Color::Grey, (220, 223, 228)),
    (Color::DarkGrey, (0, 0, 0)),
    (Color::Blue, (97, 175, 239)),
    (Color::Green, (152, 195, 121)),
    (Color::Cyan, (101, 188, 199)),
    (Color::Red, (224, 108, 117)),
    (Color::Magenta, (198, 120, 221)),
    (Color::Yellow, (229, 192, 123)),
    (Color::White, (248, 249, 250)),
];

const CAMPBELL: Palette = [
    (Color::Black, (12, 12, 12)),
    (Color::DarkBlue, (0, 55, 218)),
    (Color::DarkGreen, (19, 161, 14)),
    (Color::DarkCyan, (58, 150, 221)),
    (Color::DarkRed, (197, 15, 31)),
    (Color::DarkMagenta, (136, 23, 152)),
    (Color::DarkYellow, (193, 156, 0)),
    (Color::Grey, (166, 166, 166)),
    (Color::DarkGrey, (78, 86, 102)),
    (Color::Blue, (59, 120, 255)),
    (Color::Green, (22, 198, 12)),
    (Color::Cyan, (97, 214, 214)),
    (Color::Red, (231, 72, 86)),
    (Color::Magenta, (180, 0, 158)),
    (Color::Yellow, (249, 241, 165)),
    (Color::White, (242, 242, 242)),
];

const VINTAGE: Palette = [
    (Color::Black, (0, 0, 0)),
    (Color::DarkBlue, (32, 32, 180)),
    (Color::DarkGreen, (0, 128, 0)),
    (Color::DarkCyan, (0, 128, 128)),
    (Color::DarkRed, (180, 32, 32)),
    (Color::DarkMagenta, (160, 32, 160)),
    (Color::DarkYellow, (128, 128, 0)),
    (Color::Grey, (166, 166, 166)),
    (Color::DarkGrey, (78, 86, 102)),
    (Color::Blue, (32, 32, 255)),
    (Color::Green, (0, 255, 0)),
    (Color::Cyan, (0, 255, 255)),
    (Color::Red, (255, 0, 0)),
    (Color::Magenta, (255, 32, 255)),
    (Color::Yellow, (255, 255, 32)),
    (Color::White, (255, 255, 255)),
];

const RASPBERRY: Palette = [
    (Color::Black, (42, 2, 15)),
    (Color::DarkBlue, (1, 112, 197)),
    (Color::DarkGreen, (118, 171, 35)),
    (Color::DarkCyan, (63, 141, 131)),
    (Color::DarkRed, (189, 9, 64)),
    (Color::DarkMagenta, (125, 73, 143)),
    (Color::DarkYellow, (224, 222, 72)),
    (Color::Grey, (177, 182, 189)),
    (Color::DarkGrey, (40, 42, 46)),
    (Color::Blue, (128, 200, 255)),
    (Color::Green, (181, 214, 128)),
    (Color::Cyan, (138, 190, 183)),
    (Color::Red, (189, 109, 133)),
    (Color::Magenta, (172, 121, 187)),
    (Color::Yellow, (255, 253, 118)),
    (Color::White, (255, 255, 253)),
];
