use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Error(message) => message,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let area = centered_rect(70, 30, f.area());
        f.render_widget(Clear, area);

        let (icon, heading, title, color, text_color) = match self {
            Notice::Success(_) => {
                ("  🎉  ", "Done!", " ✅ Success ", Color::Green, Color::LightGreen)
            }
            Notice::Error(_) => (
                "  ⚠️  ",
                "Something went wrong:",
                " ❌ Error ",
                Color::Red,
                Color::LightRed,
            ),
        };

        let content = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(icon, Style::default().fg(color).bold()),
                Span::styled(heading, Style::default().fg(Color::White).bold()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(
                    self.message().to_string(),
                    Style::default().fg(text_color),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", Style::default().fg(Color::Gray)),
                Span::styled("ESC", Style::default().fg(Color::White).bold()),
                Span::styled(" to dismiss", Style::default().fg(Color::Gray)),
            ]),
        ];

        let block = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::THICK)
                    .border_style(Style::default().fg(color))
                    .title(title)
                    .title_style(Style::default().fg(color).bold()),
            )
            .alignment(Alignment::Left);

        f.render_widget(block, area);
    }
}
