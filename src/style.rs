//! Style values for terminal rendering
//!
//! The engine itself only emits categories; these types carry the visual
//! styles the renderer maps categories onto.

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        use crossterm::style::Color as Ct;
        match color {
            Color::Default => Ct::Reset,
            Color::Black => Ct::Black,
            Color::Red => Ct::DarkRed,
            Color::Green => Ct::DarkGreen,
            Color::Yellow => Ct::DarkYellow,
            Color::Blue => Ct::DarkBlue,
            Color::Magenta => Ct::DarkMagenta,
            Color::Cyan => Ct::DarkCyan,
            Color::White => Ct::Grey,
            Color::BrightBlack => Ct::DarkGrey,
            Color::BrightRed => Ct::Red,
            Color::BrightGreen => Ct::Green,
            Color::BrightYellow => Ct::Yellow,
            Color::BrightBlue => Ct::Blue,
            Color::BrightMagenta => Ct::Magenta,
            Color::BrightCyan => Ct::Cyan,
            Color::BrightWhite => Ct::White,
        }
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
}

impl Style {
    /// Create a style with just a foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Merge another style on top of this one.
    ///
    /// The overlay's color wins when set; attribute flags accumulate, so
    /// e.g. a strong span inside a heading renders bold and colored.
    pub fn merged(mut self, overlay: Style) -> Self {
        if overlay.fg != Color::Default {
            self.fg = overlay.fg;
        }
        self.bold |= overlay.bold;
        self.italic |= overlay.italic;
        self.underline |= overlay.underline;
        self
    }
}
