use ratatui::style::{Color, Style};

/// Theme configuration for the reader
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the reader
    pub background: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Foreground color for the focused sentence
    pub focused_fg: Color,

    /// Background color for the focused sentence
    pub focused_bg: Color,

    /// Foreground color for the held-modifier selection
    pub selection_fg: Color,

    /// Background color for the held-modifier selection
    pub selection_bg: Color,

    /// Color for links
    pub link_color: Color,

    /// Color for inline code and code blocks
    pub code_color: Color,

    /// Foreground color for tooltip popups
    pub popup_fg: Color,

    /// Background color for tooltip popups
    pub popup_bg: Color,

    /// Foreground color for the scrollbar knob
    pub scrollbar_knob_fg: Color,

    /// Background color for the scrollbar knob
    pub scrollbar_knob_bg: Color,

    /// Foreground color for the scrollbar track
    pub scrollbar_track_fg: Color,

    /// Background color for the scrollbar track
    pub scrollbar_track_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            focused_fg: Color::Black,
            focused_bg: Color::LightYellow,
            selection_fg: Color::White,
            selection_bg: Color::LightBlue,
            link_color: Color::Blue,
            code_color: Color::DarkGray,
            popup_fg: Color::White,
            popup_bg: Color::Black,
            scrollbar_knob_fg: Color::Reset,
            scrollbar_knob_bg: Color::Reset,
            scrollbar_track_fg: Color::Reset,
            scrollbar_track_bg: Color::Reset,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        Style::default().fg(self.filename_color)
    }

    /// Get the style for the focused sentence
    pub fn focused_style(&self) -> Style {
        Style::default().fg(self.focused_fg).bg(self.focused_bg)
    }

    /// Get the style for the held-modifier selection
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    /// Get the style for links
    pub fn link_style(&self) -> Style {
        Style::default().fg(self.link_color)
    }

    /// Get the style for inline code and code blocks
    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code_color)
    }

    /// Get the style for tooltip popups
    pub fn popup_style(&self) -> Style {
        Style::default().fg(self.popup_fg).bg(self.popup_bg)
    }

    /// Get the style for the scrollbar knob
    pub fn scrollbar_knob_style(&self) -> Style {
        Style::default()
            .fg(self.scrollbar_knob_fg)
            .bg(self.scrollbar_knob_bg)
    }

    /// Get the style for the scrollbar track
    pub fn scrollbar_track_style(&self) -> Style {
        Style::default()
            .fg(self.scrollbar_track_fg)
            .bg(self.scrollbar_track_bg)
    }
}
