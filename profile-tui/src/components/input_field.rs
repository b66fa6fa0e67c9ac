use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Single-line text box. The value lives elsewhere when the field mirrors
/// model state; `with_value` copies it in for drawing.
pub struct InputField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub focused: bool,
}

impl InputField {
    pub fn new(label: String) -> Self {
        Self {
            label,
            value: String::new(),
            placeholder: String::new(),
            focused: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: String) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_value(mut self, value: String) -> Self {
        self.value = value;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = if self.value.is_empty() {
            vec![Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![Span::styled(
                self.value.clone(),
                Style::default().fg(Color::White),
            )]
        };
        if self.focused {
            spans.push(Span::styled("│", Style::default().fg(Color::Yellow)));
        }

        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", self.label))
                .border_style(border_style),
        );

        f.render_widget(input, area);
    }

    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }
}
