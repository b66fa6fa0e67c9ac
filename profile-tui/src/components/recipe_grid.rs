use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const GRID_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 5;

/// What a grid card needs to know about a recipe.
pub trait RecipeCard {
    fn title(&self) -> &str;
    fn caption(&self) -> Option<String>;
}

/// Recipes laid out row by row, `GRID_COLUMNS` per row, in the given
/// order. Rows that do not fit are scrolled so `selected` stays visible.
pub struct RecipeGrid<'a, R> {
    pub recipes: &'a [R],
    pub selected: Option<usize>,
}

impl<'a, R: RecipeCard> RecipeGrid<'a, R> {
    pub fn new(recipes: &'a [R], selected: Option<usize>) -> Self {
        Self { recipes, selected }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected.unwrap_or(0) / GRID_COLUMNS;
        let first_row = (selected_row + 1).saturating_sub(visible_rows);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
            .split(area);

        for (slot, (row_index, chunk)) in self
            .recipes
            .chunks(GRID_COLUMNS)
            .enumerate()
            .skip(first_row)
            .take(visible_rows)
            .enumerate()
        {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, GRID_COLUMNS as u32);
                    GRID_COLUMNS
                ])
                .split(rows[slot]);

            for (column, recipe) in chunk.iter().enumerate() {
                let index = row_index * GRID_COLUMNS + column;
                self.render_card(f, cells[column], recipe, index);
            }
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, recipe: &R, index: usize) {
        let is_selected = self.selected == Some(index);
        let border_color = if is_selected {
            Color::Yellow
        } else {
            Color::Gray
        };

        let mut lines = vec![Line::from(Span::styled(
            recipe.title().to_string(),
            Style::default().fg(Color::White).bold(),
        ))];
        if let Some(caption) = recipe.caption() {
            lines.push(Line::from(Span::styled(
                caption,
                Style::default().fg(Color::DarkGray).italic(),
            )));
        }

        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(border_color))
                .title(if is_selected { " ♥ ▶ " } else { " ♥ " })
                .title_style(Style::default().fg(Color::Red)),
        );

        f.render_widget(card, area);
    }
}
