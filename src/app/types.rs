use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ThemePreset {
    Fjord,
    Graphite,
    Solarized,
    Aurora,
    Ember,
}

impl ThemePreset {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            ThemePreset::Fjord => "fjord",
            ThemePreset::Graphite => "graphite",
            ThemePreset::Solarized => "solarized",
            ThemePreset::Aurora => "aurora",
            ThemePreset::Ember => "ember",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "fjord" | "nord" | "blue" => Some(ThemePreset::Fjord),
            "graphite" | "slate" | "gray" => Some(ThemePreset::Graphite),
            "solarized" | "sand" | "amber" => Some(ThemePreset::Solarized),
            "aurora" | "mint" | "teal" => Some(ThemePreset::Aurora),
            "ember" | "warm" | "copper" => Some(ThemePreset::Ember),
            _ => None,
        }
    }

    pub(crate) fn palette(self) -> ThemePalette {
        match self {
            ThemePreset::Fjord => ThemePalette {
                prompt: Color::Rgb(192, 192, 192),
                input_text: Color::Rgb(224, 224, 224),
                muted_text: Color::Rgb(128, 128, 128),
                divider: Color::Rgb(58, 58, 62),
                brand: Color::Rgb(95, 215, 175),
                info_text: Color::Rgb(160, 160, 160),
                user_fg: Color::Rgb(0, 175, 255),
                agent_text: Color::Rgb(210, 210, 210),
                thinking: Color::Rgb(255, 95, 175),
                tool_border: Color::Rgb(88, 88, 88),
                tool_header: Color::Rgb(255, 175, 0),
                tool_text: Color::Rgb(188, 188, 188),
                collapsed_text: Color::Rgb(128, 128, 128),
                error_label: Color::Rgb(255, 0, 0),
                error_text: Color::Rgb(255, 95, 95),
                diff_add: Color::Rgb(135, 215, 135),
                diff_remove: Color::Rgb(255, 95, 95),
            },
            ThemePreset::Graphite => ThemePalette {
                prompt: Color::Rgb(100, 150, 200),
                input_text: Color::Rgb(180, 200, 220),
                muted_text: Color::Rgb(80, 100, 120),
                divider: Color::Rgb(40, 60, 80),
                brand: Color::Rgb(130, 190, 230),
                info_text: Color::Rgb(120, 140, 160),
                user_fg: Color::Rgb(200, 220, 240),
                agent_text: Color::Rgb(170, 190, 210),
                thinking: Color::Rgb(130, 160, 190),
                tool_border: Color::Rgb(90, 110, 130),
                tool_header: Color::Rgb(200, 150, 100),
                tool_text: Color::Rgb(140, 160, 180),
                collapsed_text: Color::Rgb(110, 130, 150),
                error_label: Color::Rgb(220, 100, 100),
                error_text: Color::Rgb(230, 120, 120),
                diff_add: Color::Rgb(120, 190, 140),
                diff_remove: Color::Rgb(230, 120, 120),
            },
            ThemePreset::Solarized => ThemePalette {
                prompt: Color::Rgb(120, 180, 120),
                input_text: Color::Rgb(180, 216, 180),
                muted_text: Color::Rgb(100, 140, 100),
                divider: Color::Rgb(50, 80, 50),
                brand: Color::Rgb(160, 200, 160),
                info_text: Color::Rgb(140, 180, 140),
                user_fg: Color::Rgb(212, 240, 212),
                agent_text: Color::Rgb(186, 216, 186),
                thinking: Color::Rgb(150, 190, 150),
                tool_border: Color::Rgb(110, 150, 110),
                tool_header: Color::Rgb(200, 170, 140),
                tool_text: Color::Rgb(160, 190, 160),
                collapsed_text: Color::Rgb(130, 170, 130),
                error_label: Color::Rgb(220, 120, 120),
                error_text: Color::Rgb(230, 140, 140),
                diff_add: Color::Rgb(170, 230, 150),
                diff_remove: Color::Rgb(230, 140, 140),
            },
            ThemePreset::Aurora => ThemePalette {
                prompt: Color::Rgb(216, 180, 224),
                input_text: Color::Rgb(240, 212, 248),
                muted_text: Color::Rgb(160, 120, 176),
                divider: Color::Rgb(80, 60, 96),
                brand: Color::Rgb(210, 180, 220),
                info_text: Color::Rgb(192, 160, 208),
                user_fg: Color::Rgb(255, 255, 255),
                agent_text: Color::Rgb(230, 200, 240),
                thinking: Color::Rgb(200, 160, 216),
                tool_border: Color::Rgb(170, 140, 190),
                tool_header: Color::Rgb(220, 180, 160),
                tool_text: Color::Rgb(200, 170, 220),
                collapsed_text: Color::Rgb(180, 150, 200),
                error_label: Color::Rgb(220, 120, 160),
                error_text: Color::Rgb(230, 140, 180),
                diff_add: Color::Rgb(160, 220, 180),
                diff_remove: Color::Rgb(230, 140, 180),
            },
            ThemePreset::Ember => ThemePalette {
                prompt: Color::Rgb(204, 204, 204),
                input_text: Color::Rgb(238, 238, 238),
                muted_text: Color::Rgb(153, 153, 153),
                divider: Color::Rgb(64, 64, 64),
                brand: Color::Rgb(255, 127, 80),
                info_text: Color::Rgb(192, 192, 192),
                user_fg: Color::Rgb(255, 255, 255),
                agent_text: Color::Rgb(220, 220, 220),
                thinking: Color::Rgb(210, 160, 120),
                tool_border: Color::Rgb(110, 110, 110),
                tool_header: Color::Rgb(210, 180, 150),
                tool_text: Color::Rgb(190, 190, 190),
                collapsed_text: Color::Rgb(160, 160, 160),
                error_label: Color::Rgb(220, 100, 100),
                error_text: Color::Rgb(230, 120, 120),
                diff_add: Color::Rgb(150, 210, 130),
                diff_remove: Color::Rgb(230, 120, 120),
            },
        }
    }
}

pub(crate) fn default_theme() -> ThemePreset {
    ThemePreset::Fjord
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ThemePalette {
    pub(crate) prompt: Color,
    pub(crate) input_text: Color,
    pub(crate) muted_text: Color,
    pub(crate) divider: Color,
    pub(crate) brand: Color,
    pub(crate) info_text: Color,
    pub(crate) user_fg: Color,
    pub(crate) agent_text: Color,
    pub(crate) thinking: Color,
    pub(crate) tool_border: Color,
    pub(crate) tool_header: Color,
    pub(crate) tool_text: Color,
    pub(crate) collapsed_text: Color,
    pub(crate) error_label: Color,
    pub(crate) error_text: Color,
    pub(crate) diff_add: Color,
    pub(crate) diff_remove: Color,
}

impl ThemePalette {
    pub(crate) fn prompt_style(self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn brand_style(self) -> Style {
        Style::default()
            .fg(self.brand)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn info_style(self) -> Style {
        Style::default().fg(self.info_text)
    }

    pub(crate) fn muted_style(self) -> Style {
        Style::default().fg(self.muted_text)
    }

    pub(crate) fn divider_style(self) -> Style {
        Style::default().fg(self.divider)
    }

    pub(crate) fn input_style(self) -> Style {
        Style::default().fg(self.input_text)
    }

    pub(crate) fn user_style(self) -> Style {
        Style::default()
            .fg(self.user_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn agent_style(self) -> Style {
        Style::default().fg(self.agent_text)
    }

    pub(crate) fn thinking_style(self) -> Style {
        Style::default()
            .fg(self.thinking)
            .add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn tool_border_style(self) -> Style {
        Style::default().fg(self.tool_border)
    }

    pub(crate) fn tool_header_style(self) -> Style {
        Style::default()
            .fg(self.tool_header)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn tool_text_style(self) -> Style {
        Style::default().fg(self.tool_text)
    }

    pub(crate) fn collapsed_style(self) -> Style {
        Style::default().fg(self.collapsed_text)
    }

    pub(crate) fn collapsed_summary_style(self) -> Style {
        Style::default()
            .fg(self.tool_border)
            .add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn error_header_style(self) -> Style {
        Style::default()
            .fg(self.error_label)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_border_style(self) -> Style {
        Style::default().fg(self.error_label)
    }

    pub(crate) fn error_text_style(self) -> Style {
        Style::default().fg(self.error_text)
    }

    pub(crate) fn diff_add_style(self) -> Style {
        Style::default().fg(self.diff_add)
    }

    pub(crate) fn diff_remove_style(self) -> Style {
        Style::default().fg(self.diff_remove)
    }
}
