use std::path::Path;

use kv_storage::KeyValueStorage;
use profile_core::{
    AvatarFile, Decision, FavoritesPanel, FavoritesSnapshot, FieldEdit,
    Member, MemberId, ProfileState, RosterEntry,
    favorites::{
        EMPTY_HINT, EMPTY_MESSAGE, FAILURE_HEADING, FAVORITES_HEADING,
        FAVORITES_SUBTITLE, LOADING_MESSAGE,
    },
    favorites_panel,
    state::{REMOVE_PHOTO_PROMPT, RESET_PROMPT},
};
use profile_error::ProfileError;
use ratatui::{
    Frame,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    AppEvent,
    components::{
        ConfirmationDialog, GRID_COLUMNS, InputField, Notice, RecipeGrid,
        centered_rect,
    },
    favorites::Recipe,
};

const VIEW_CARD_HEIGHT: u16 = 5;
const EDIT_CARD_HEIGHT: u16 = 9;

/// Invoked when the user opens one of the favorite recipes.
pub type RecipeClick = Box<dyn FnMut(&Recipe) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Members,
    Favorites,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextField {
    Name,
    Nim,
}

enum PendingAction {
    Reset,
    RemovePhoto(MemberId),
}

struct PendingConfirmation {
    action: PendingAction,
    dialog: ConfirmationDialog,
}

struct PhotoPrompt {
    member: MemberId,
    input: InputField,
}

/// The group profile page: member cards on the left, favorite recipes on
/// the right.
pub struct ProfilePage<S> {
    state: ProfileState<S>,
    favorites: FavoritesSnapshot<Recipe>,
    on_recipe_click: RecipeClick,
    events: UnboundedSender<AppEvent>,

    // UI state
    column: Column,
    selected_member: usize,
    text_field: TextField,
    selected_recipe: usize,

    // Overlays, topmost last
    photo_prompt: Option<PhotoPrompt>,
    confirmation: Option<PendingConfirmation>,
    notice: Option<Notice>,

    status: String,
}

impl<S: KeyValueStorage> ProfilePage<S> {
    pub fn new(
        state: ProfileState<S>,
        events: UnboundedSender<AppEvent>,
        on_recipe_click: RecipeClick,
    ) -> Self {
        Self {
            state,
            favorites: FavoritesSnapshot::loading(),
            on_recipe_click,
            events,

            column: Column::Members,
            selected_member: 0,
            text_field: TextField::Name,
            selected_recipe: 0,

            photo_prompt: None,
            confirmation: None,
            notice: None,

            status: "Press 'e' to edit the group profile".to_string(),
        }
    }

    pub fn state(&self) -> &ProfileState<S> {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AvatarEncoded(Ok(encoded)) => {
                match self.state.apply_avatar(encoded) {
                    Ok(true) => {
                        self.status =
                            "Photo updated - save to keep it".to_string()
                    }
                    Ok(false) => {
                        self.status =
                            "Photo discarded: the edit session changed"
                                .to_string()
                    }
                    Err(e) => self.report(e),
                }
            }
            AppEvent::AvatarEncoded(Err(e)) => self.report(e),
            AppEvent::FavoritesLoaded(snapshot) => {
                self.favorites = snapshot;
                let count = self.favorites.favorites.len();
                self.selected_recipe =
                    self.selected_recipe.min(count.saturating_sub(1));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.notice = None;
            }
            return;
        }

        if let Some(pending) = self.confirmation.as_mut() {
            if let Some(decision) = pending.dialog.handle_key(key) {
                if let Some(pending) = self.confirmation.take() {
                    self.resolve(pending.action, decision);
                }
            }
            return;
        }

        if self.photo_prompt.is_some() {
            self.handle_photo_prompt_key(key);
        } else if self.state.is_editing() {
            self.handle_edit_key(key);
        } else {
            self.handle_view_key(key);
        }
    }

    /// Footer hint for the current mode.
    pub fn help_text(&self) -> (&'static str, Color) {
        if self.notice.is_some() {
            ("Esc/Enter Dismiss", Color::Magenta)
        } else if self.confirmation.is_some() {
            ("←/→ Choose • Enter Confirm • Y Yes • N No", Color::Red)
        } else if self.photo_prompt.is_some() {
            ("Type a path • Enter Use file • Esc Cancel", Color::Blue)
        } else if self.state.is_editing() {
            (
                "↑/↓ Member • Tab Name/NIM • CTRL-S Save • Esc Cancel • CTRL-R Reset • CTRL-P Photo • CTRL-D Remove photo",
                Color::Green,
            )
        } else {
            (
                "E Edit • Tab Switch column • Arrows Navigate • Enter Open recipe • CTRL-Q Quit",
                Color::Cyan,
            )
        }
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match (self.column, key.code) {
            (_, KeyCode::Char('e') | KeyCode::Char('E')) => {
                self.state.begin_edit();
                self.column = Column::Members;
                self.text_field = TextField::Name;
                self.status =
                    "Editing profile - CTRL-S to save, Esc to cancel"
                        .to_string();
            }
            (_, KeyCode::Tab | KeyCode::BackTab) => {
                self.column = match self.column {
                    Column::Members => Column::Favorites,
                    Column::Favorites => Column::Members,
                };
            }
            (Column::Members, KeyCode::Up) => self.move_member(-1),
            (Column::Members, KeyCode::Down) => self.move_member(1),
            (Column::Favorites, KeyCode::Left) => self.move_recipe(-1),
            (Column::Favorites, KeyCode::Right) => self.move_recipe(1),
            (Column::Favorites, KeyCode::Up) => {
                self.move_recipe(-(GRID_COLUMNS as isize))
            }
            (Column::Favorites, KeyCode::Down) => {
                self.move_recipe(GRID_COLUMNS as isize)
            }
            (Column::Favorites, KeyCode::Enter) => self.open_recipe(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => self.save(),
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.confirm(
                        PendingAction::Reset,
                        "Reset all profiles",
                        RESET_PROMPT,
                        "Reset",
                    );
                }
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.open_photo_prompt()
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.request_photo_removal()
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Up => self.move_member(-1),
            KeyCode::Down => self.move_member(1),
            KeyCode::Tab | KeyCode::BackTab => {
                self.text_field = match self.text_field {
                    TextField::Name => TextField::Nim,
                    TextField::Nim => TextField::Name,
                };
            }
            KeyCode::Backspace => self.edit_text(|value| {
                value.pop();
            }),
            KeyCode::Char(c) => self.edit_text(|value| value.push(c)),
            _ => {}
        }
    }

    fn handle_photo_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.photo_prompt.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.photo_prompt = None;
                self.status = "Photo selection cancelled".to_string();
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.photo_prompt.take() {
                    self.submit_photo(prompt);
                }
            }
            KeyCode::Backspace => prompt.input.pop_char(),
            KeyCode::Char(c) => prompt.input.push_char(c),
            _ => {}
        }
    }

    fn selected_entry(&self) -> Option<&RosterEntry> {
        self.state.members().get(self.selected_member)
    }

    fn edit_text(&mut self, change: impl FnOnce(&mut String)) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let id = entry.id;
        let edit = match self.text_field {
            TextField::Name => {
                let mut value = entry.member.name.clone();
                change(&mut value);
                FieldEdit::Name(value)
            }
            TextField::Nim => {
                let mut value = entry.member.nim.clone();
                change(&mut value);
                FieldEdit::Nim(value)
            }
        };

        if let Err(e) = self.state.edit(id, edit) {
            self.report(e);
        }
    }

    fn save(&mut self) {
        match self.state.save() {
            Ok(notice) => {
                self.status = "Profile saved".to_string();
                self.notice = Some(Notice::Success(notice.to_string()));
            }
            Err(e) => self.report(e),
        }
    }

    fn cancel(&mut self) {
        match self.state.cancel() {
            Ok(()) => self.status = "Changes discarded".to_string(),
            Err(e) => self.report(e),
        }
        self.clamp_member();
    }

    fn confirm(
        &mut self,
        action: PendingAction,
        title: &str,
        prompt: &str,
        confirm_text: &str,
    ) {
        let dialog = ConfirmationDialog::new(title.into(), prompt.into())
            .with_buttons(confirm_text.into(), "Keep".into());
        self.confirmation = Some(PendingConfirmation { action, dialog });
    }

    fn request_photo_removal(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if entry.member.avatar.is_none() {
            self.status = format!("{} has no photo", entry.member.name);
            return;
        }

        let id = entry.id;
        self.confirm(
            PendingAction::RemovePhoto(id),
            "Remove photo",
            REMOVE_PHOTO_PROMPT,
            "Remove",
        );
    }

    fn resolve(&mut self, action: PendingAction, mut decision: Decision) {
        match action {
            PendingAction::Reset => match self.state.reset(&mut decision) {
                Ok(Some(notice)) => {
                    self.selected_member = 0;
                    self.status = "Profiles reset".to_string();
                    self.notice = Some(Notice::Success(notice.to_string()));
                }
                Ok(None) => self.status = "Reset cancelled".to_string(),
                Err(e) => self.report(e),
            },
            PendingAction::RemovePhoto(id) => {
                match self.state.remove_avatar(id, &mut decision) {
                    Ok(true) => self.status = "Photo removed".to_string(),
                    Ok(false) => self.status = "Photo kept".to_string(),
                    Err(e) => self.report(e),
                }
            }
        }
    }

    fn open_photo_prompt(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let member = entry.id;
        let input = InputField::new(format!("Photo for {}", entry.member.name))
            .with_placeholder("/path/to/photo.png".to_string())
            .focused(true);

        self.photo_prompt = Some(PhotoPrompt { member, input });
    }

    fn submit_photo(&mut self, prompt: PhotoPrompt) {
        let selection = if prompt.input.is_empty() {
            None
        } else {
            let path = prompt.input.get_value().trim();
            match AvatarFile::from_path(Path::new(path)) {
                Ok(file) => Some(file),
                Err(e) => {
                    self.report(e);
                    return;
                }
            }
        };

        match self.state.select_avatar(prompt.member, selection) {
            Ok(upload) => {
                self.status = format!("Reading {}...", upload.file().name);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = upload.encode().await;
                    if events.send(AppEvent::AvatarEncoded(result)).is_err() {
                        log::debug!("Avatar encoded after the page was closed");
                    }
                });
            }
            Err(e) => self.report(e),
        }
    }

    fn open_recipe(&mut self) {
        if let FavoritesPanel::Grid(recipes) = favorites_panel(&self.favorites)
        {
            if let Some(recipe) = recipes.get(self.selected_recipe) {
                self.status = format!("Opening {}", recipe.name);
                (self.on_recipe_click)(recipe);
            }
        }
    }

    fn move_member(&mut self, delta: isize) {
        let count = self.state.members().len();
        if count == 0 {
            return;
        }
        self.selected_member = self
            .selected_member
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    fn clamp_member(&mut self) {
        let count = self.state.members().len();
        self.selected_member =
            self.selected_member.min(count.saturating_sub(1));
    }

    fn move_recipe(&mut self, delta: isize) {
        let FavoritesPanel::Grid(recipes) = favorites_panel(&self.favorites)
        else {
            return;
        };
        let target = self.selected_recipe as isize + delta;
        if target >= 0 && (target as usize) < recipes.len() {
            self.selected_recipe = target as usize;
        }
    }

    fn report(&mut self, error: ProfileError) {
        if error.is_validation() {
            log::warn!("Rejected photo: {}", error);
        } else {
            log::error!("{}", error);
        }
        self.notice = Some(Notice::Error(error.to_string()));
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.draw_members(f, columns[0]);
        self.draw_favorites(f, columns[1]);

        if let Some(prompt) = &self.photo_prompt {
            self.draw_photo_prompt(f, prompt);
        }
        if let Some(pending) = &self.confirmation {
            pending.dialog.render(f);
        }
        if let Some(notice) = &self.notice {
            notice.render(f);
        }
    }

    fn draw_members(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Group header
                Constraint::Min(0),    // Member cards
            ])
            .split(area);

        let group = self.state.group();
        let (badge, badge_color) = if self.state.is_editing() {
            (" EDITING ", Color::Green)
        } else {
            (" VIEW ", Color::Blue)
        };
        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("👥 ", Style::default().fg(Color::Blue)),
                Span::styled(
                    group.group_name,
                    Style::default().fg(Color::White).bold(),
                ),
                Span::raw(" "),
                Span::styled(
                    badge,
                    Style::default().fg(Color::Black).bg(badge_color),
                ),
            ]),
            Line::from(Span::styled(
                group.description,
                Style::default().fg(Color::Gray).italic(),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Group ")
                .title_style(Style::default().fg(Color::White).bold()),
        );
        f.render_widget(header, chunks[0]);

        let card_height = if self.state.is_editing() {
            EDIT_CARD_HEIGHT
        } else {
            VIEW_CARD_HEIGHT
        };
        let visible = (chunks[1].height / card_height).max(1) as usize;
        let first = (self.selected_member + 1).saturating_sub(visible);

        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(card_height); visible])
            .split(chunks[1]);

        for (slot, (index, entry)) in self
            .state
            .members()
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            self.draw_member_card(f, slots[slot], index, &entry.member);
        }
    }

    fn draw_member_card(
        &self,
        f: &mut Frame,
        area: Rect,
        index: usize,
        member: &Member,
    ) {
        let is_selected =
            self.column == Column::Members && index == self.selected_member;
        let border_color = if is_selected {
            Color::Yellow
        } else {
            Color::White
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(border_color))
            .title(format!(" Member {} ", index + 1))
            .title_style(Style::default().fg(Color::White).bold());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut photo_line = vec![Span::styled(
            photo_label(member),
            Style::default().fg(Color::Cyan),
        )];
        if self.state.is_editing() && is_selected {
            photo_line.push(Span::styled(
                "  [^P change]",
                Style::default().fg(Color::Blue),
            ));
            if member.avatar.is_some() {
                photo_line.push(Span::styled(
                    " [^D remove]",
                    Style::default().fg(Color::Red),
                ));
            }
        }

        if !self.state.is_editing() {
            let card = Paragraph::new(vec![
                Line::from(photo_line),
                Line::from(Span::styled(
                    member.name.clone(),
                    Style::default().fg(Color::White).bold(),
                )),
                Line::from(vec![
                    Span::styled("# ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        member.nim.clone(),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
            ])
            .alignment(Alignment::Center);
            f.render_widget(card, inner);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Photo
                Constraint::Length(3), // Name
                Constraint::Length(3), // NIM
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new(Line::from(photo_line)).alignment(Alignment::Center),
            rows[0],
        );
        InputField::new("Name".to_string())
            .with_placeholder("Member name".to_string())
            .with_value(member.name.clone())
            .focused(is_selected && self.text_field == TextField::Name)
            .render(f, rows[1]);
        InputField::new("NIM".to_string())
            .with_placeholder("NIM".to_string())
            .with_value(member.nim.clone())
            .focused(is_selected && self.text_field == TextField::Nim)
            .render(f, rows[2]);
    }

    fn draw_favorites(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Heading
                Constraint::Min(0),    // Panel
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                FAVORITES_HEADING,
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(Span::styled(
                FAVORITES_SUBTITLE,
                Style::default().fg(Color::Gray).italic(),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Favorites ")
                .title_style(Style::default().fg(Color::White).bold()),
        );
        f.render_widget(header, chunks[0]);

        let body = chunks[1];
        match favorites_panel(&self.favorites) {
            FavoritesPanel::Loading => {
                let loading = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "⏳",
                        Style::default().fg(Color::Magenta),
                    )),
                    Line::from(Span::styled(
                        LOADING_MESSAGE,
                        Style::default().fg(Color::Gray),
                    )),
                ])
                .alignment(Alignment::Center);
                f.render_widget(loading, body);
            }
            FavoritesPanel::Failed(message) => {
                let failure = Paragraph::new(vec![
                    Line::from(Span::styled(
                        FAILURE_HEADING,
                        Style::default().fg(Color::Red).bold(),
                    )),
                    Line::from(Span::styled(
                        message.to_string(),
                        Style::default().fg(Color::LightRed),
                    )),
                ])
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
                f.render_widget(failure, body);
            }
            FavoritesPanel::Empty => {
                let empty = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "♥",
                        Style::default().fg(Color::LightRed),
                    )),
                    Line::from(Span::styled(
                        EMPTY_MESSAGE,
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(Span::styled(
                        EMPTY_HINT,
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_set(border::ROUNDED),
                );
                f.render_widget(empty, body);
            }
            FavoritesPanel::Grid(recipes) => {
                let selected = (self.column == Column::Favorites)
                    .then_some(self.selected_recipe);
                RecipeGrid::new(recipes, selected).render(f, body);
            }
        }
    }

    fn draw_photo_prompt(&self, f: &mut Frame, prompt: &PhotoPrompt) {
        let area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        prompt.input.render(f, chunks[0]);
        let hint = Paragraph::new(
            "Image files only, up to 2MB. Leave empty and press Enter to pick nothing.",
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, chunks[1]);
    }
}

/// Short description of a member's photo for the card.
fn photo_label(member: &Member) -> String {
    match &member.avatar {
        Some(data_uri) => {
            let payload = data_uri
                .split_once(',')
                .map(|(_, payload)| payload.len())
                .unwrap_or(data_uri.len());
            format!("📷 photo ({} KiB)", payload * 3 / 4 / 1024)
        }
        None => format!("🖼  {}", member.avatar_src()),
    }
}
