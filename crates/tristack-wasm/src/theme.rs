//! Color themes for the browser UI

use serde::{Deserialize, Serialize};
use tristack_core::Cell;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn as_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Color theme for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    /// Grid frame color
    pub frame: Color,
    /// Frame of the candidate under the cursor
    pub cursor: Color,
    /// Frame of a selected candidate
    pub selected: Color,
    pub red: Color,
    pub blue: Color,
    pub yellow: Color,
    /// Empty cell fill
    pub empty: Color,
    pub text: Color,
    pub info_text: Color,
    pub message_text: Color,
    pub success: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            background: Color::new(24, 24, 32),
            frame: Color::new(100, 100, 140),
            cursor: Color::new(255, 220, 100),
            selected: Color::new(100, 180, 255),
            red: Color::new(235, 70, 70),
            blue: Color::new(70, 120, 245),
            yellow: Color::new(245, 215, 60),
            empty: Color::new(40, 40, 54),
            text: Color::new(200, 200, 220),
            info_text: Color::new(160, 160, 180),
            message_text: Color::new(255, 220, 100),
            success: Color::new(100, 255, 150),
            error: Color::new(255, 100, 100),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            background: Color::new(245, 245, 250),
            frame: Color::new(80, 80, 100),
            cursor: Color::new(180, 120, 0),
            selected: Color::new(30, 100, 200),
            red: Color::new(210, 40, 40),
            blue: Color::new(30, 80, 210),
            yellow: Color::new(220, 170, 0),
            empty: Color::new(228, 228, 236),
            text: Color::new(20, 20, 40),
            info_text: Color::new(60, 60, 80),
            message_text: Color::new(180, 120, 0),
            success: Color::new(50, 180, 80),
            error: Color::new(220, 50, 50),
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            background: Color::new(0, 0, 0),
            frame: Color::new(255, 255, 255),
            cursor: Color::new(255, 255, 0),
            selected: Color::new(0, 255, 255),
            red: Color::new(255, 0, 0),
            blue: Color::new(0, 90, 255),
            yellow: Color::new(255, 255, 0),
            empty: Color::new(30, 30, 30),
            text: Color::new(255, 255, 255),
            info_text: Color::new(200, 200, 200),
            message_text: Color::new(255, 255, 0),
            success: Color::new(0, 255, 0),
            error: Color::new(255, 0, 0),
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "high_contrast" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    pub fn cell(&self, cell: Cell) -> Color {
        match cell {
            Cell::Red => self.red,
            Cell::Blue => self.blue,
            Cell::Yellow => self.yellow,
            Cell::Empty => self.empty,
        }
    }
}
