use crossterm::style::Color;
use tristack_core::Cell;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid frame color
    pub border: Color,
    /// Frame of the candidate under the cursor
    pub cursor: Color,
    /// Frame of a selected candidate
    pub selected: Color,
    /// Ink colors
    pub red: Color,
    pub blue: Color,
    pub yellow: Color,
    /// Empty cell dots
    pub empty: Color,
    /// Error/conflict color
    pub error: Color,
    /// Success/solved color
    pub success: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
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
            name: "Dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            cursor: Color::Rgb { r: 255, g: 210, b: 100 },
            selected: Color::Rgb { r: 80, g: 180, b: 255 },
            red: Color::Rgb { r: 235, g: 70, b: 70 },
            blue: Color::Rgb { r: 70, g: 120, b: 245 },
            yellow: Color::Rgb { r: 245, g: 215, b: 60 },
            empty: Color::Rgb { r: 55, g: 60, b: 75 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "Light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            cursor: Color::Rgb { r: 200, g: 120, b: 20 },
            selected: Color::Rgb { r: 30, g: 100, b: 200 },
            red: Color::Rgb { r: 210, g: 40, b: 40 },
            blue: Color::Rgb { r: 30, g: 80, b: 210 },
            yellow: Color::Rgb { r: 220, g: 170, b: 0 },
            empty: Color::Rgb { r: 205, g: 205, b: 215 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            name: "High contrast",
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            cursor: Color::Yellow,
            selected: Color::Cyan,
            red: Color::Red,
            blue: Color::Blue,
            yellow: Color::Yellow,
            empty: Color::DarkGrey,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }

    /// Next theme in the dark -> light -> high contrast cycle
    pub fn next(&self) -> Self {
        match self.name {
            "Dark" => Self::light(),
            "Light" => Self::high_contrast(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Dark");
        assert_eq!(theme.next().name, "Light");
        assert_eq!(theme.next().next().name, "High contrast");
        assert_eq!(theme.next().next().next().name, "Dark");
    }

    #[test]
    fn test_inks_have_distinct_colors() {
        let theme = Theme::dark();
        assert_ne!(theme.cell(Cell::Red), theme.cell(Cell::Blue));
        assert_ne!(theme.cell(Cell::Blue), theme.cell(Cell::Yellow));
        assert_ne!(theme.cell(Cell::Empty), theme.cell(Cell::Red));
    }
}
