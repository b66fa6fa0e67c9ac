use profile_core::Decision;
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

/// Yes/No dialog guarding a destructive action.
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub selected: bool, // true for confirm, false for cancel
}

impl ConfirmationDialog {
    pub fn new(title: String, message: String) -> Self {
        Self {
            title,
            message,
            confirm_text: "Yes".to_string(),
            cancel_text: "No".to_string(),
            selected: false,
        }
    }

    pub fn with_buttons(
        mut self,
        confirm_text: String,
        cancel_text: String,
    ) -> Self {
        self.confirm_text = confirm_text;
        self.cancel_text = cancel_text;
        self
    }

    /// Returns the user's answer once one was given.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Decision> {
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab => {
                self.toggle_selection();
                None
            }
            KeyCode::Enter => Some(if self.is_confirm_selected() {
                Decision::Confirmed
            } else {
                Decision::Declined
            }),
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                Some(Decision::Confirmed)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(Decision::Declined)
            }
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let area = centered_rect(60, 30, f.area());

        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Message
                Constraint::Length(3), // Buttons
            ])
            .split(area);

        let message_block = Paragraph::new(self.message.as_str())
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title))
                    .style(Style::default().fg(Color::Yellow)),
            );
        f.render_widget(message_block, chunks[0]);

        let button_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(50),
            ])
            .split(chunks[1]);

        let confirm_style = if self.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };

        let cancel_style = if !self.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };

        let confirm_button =
            Paragraph::new(format!("[ {} ]", self.confirm_text))
                .alignment(Alignment::Center)
                .style(confirm_style)
                .block(Block::default().borders(Borders::ALL));
        f.render_widget(confirm_button, button_area[0]);

        let cancel_button = Paragraph::new(format!("[ {} ]", self.cancel_text))
            .alignment(Alignment::Center)
            .style(cancel_style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(cancel_button, button_area[1]);
    }

    pub fn toggle_selection(&mut self) {
        self.selected = !self.selected;
    }

    pub fn is_confirm_selected(&self) -> bool {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_without_toggling_declines() {
        let mut dialog =
            ConfirmationDialog::new("Reset".into(), "Sure?".into());
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(Decision::Declined));
    }

    #[test]
    fn toggled_enter_confirms() {
        let mut dialog =
            ConfirmationDialog::new("Reset".into(), "Sure?".into());
        assert_eq!(dialog.handle_key(key(KeyCode::Left)), None);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(Decision::Confirmed));
    }

    #[test]
    fn shortcuts() {
        let mut dialog =
            ConfirmationDialog::new("Reset".into(), "Sure?".into());
        assert_eq!(dialog.handle_key(key(KeyCode::Char('y'))), Some(Decision::Confirmed));
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), Some(Decision::Declined));
        assert_eq!(dialog.handle_key(key(KeyCode::Char('x'))), None);
    }
}
