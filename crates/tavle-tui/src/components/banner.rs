use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerVariant {
    Error,
    Success,
}

impl BannerVariant {
    fn color(self) -> Color {
        match self {
            BannerVariant::Error => Color::Red,
            BannerVariant::Success => Color::Green,
        }
    }
}

/// Single inline notice above the board. Setting a new banner replaces the
/// old one in place; there is never more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub variant: BannerVariant,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: BannerVariant::Error,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: BannerVariant::Success,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = self.variant.color();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let widget = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(widget, area);
    }
}
