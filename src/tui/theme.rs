use ratatui::style::Color;
use ratatui::widgets::block::BorderType;

use crate::session::FeedbackTone;
use crate::trial::Difficulty;

// Border style
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

// Selected choice button
pub const SELECTED_BG: Color = Color::Blue;
pub const SELECTED_FG: Color = Color::White;
pub const DISABLED: Color = Color::DarkGray;

// Progress bars
pub const PROCESSING_BAR: Color = Color::Rgb(0x6f, 0xa8, 0xdc);
pub const REMAINING_BAR: Color = Color::Rgb(0xf6, 0xb9, 0x79);

// Processing caption
pub const PROCESSING_TEXT: Color = Color::Blue;

/// Prompt color for a difficulty: green / orange / red.
pub const fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Rgb(0xff, 0xa5, 0x00),
        Difficulty::Hard => Color::Red,
    }
}

/// Feedback text color for a tone.
pub const fn tone_color(tone: FeedbackTone) -> Color {
    match tone {
        FeedbackTone::Neutral => Color::Blue,
        FeedbackTone::Positive => Color::Green,
        FeedbackTone::Negative => Color::Red,
    }
}
