use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use kv_storage::{FileStorage, KeyValueStorage};
use profile_core::{EncodedAvatar, FavoritesSnapshot, ProfileState};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode,
            KeyEvent, KeyEventKind, KeyModifiers,
        },
        execute,
        terminal::{
            EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
            enable_raw_mode,
        },
    },
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::{
    favorites::{Recipe, spawn_favorites_load},
    page::ProfilePage,
};

pub mod components;
pub mod config;
pub mod favorites;
pub mod page;

/// Results of background work, delivered to the page on the UI loop.
pub enum AppEvent {
    AvatarEncoded(profile_error::Result<EncodedAvatar>),
    FavoritesLoaded(FavoritesSnapshot<Recipe>),
}

/// Where the page keeps its data.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_file: PathBuf,
    pub favorites_file: Option<PathBuf>,
}

pub async fn run_tui(settings: Settings) -> Result<()> {
    // Fail before touching the terminal if the saved roster is unreadable.
    let storage =
        FileStorage::new("GroupProfile".to_string(), &settings.store_file);
    let state = ProfileState::load(storage).with_context(|| {
        format!(
            "Failed to load the group profile from {}",
            settings.store_file.display()
        )
    })?;

    let (tx, mut rx) = unbounded_channel();
    spawn_favorites_load(settings.favorites_file, tx.clone());
    let mut page = ProfilePage::new(
        state,
        tx,
        Box::new(|recipe: &Recipe| {
            log::info!("Opening recipe {} ({})", recipe.name, recipe.id)
        }),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_tui_loop(&mut terminal, &mut page, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_tui_loop<B: Backend, S: KeyValueStorage>(
    terminal: &mut Terminal<B>,
    page: &mut ProfilePage<S>,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, page))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if is_quit(&key) {
                        break;
                    }
                    page.handle_key(key);
                }
            }
        }

        // Background results
        while let Ok(event) = events.try_recv() {
            page.handle_event(event);
        }

        tokio::task::yield_now().await;
    }

    log::info!("Quit requested");
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
}

fn ui<S: KeyValueStorage>(f: &mut Frame, page: &ProfilePage<S>) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Main content
            Constraint::Length(4), // Footer/Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new(Line::from(vec![
        Span::styled("  🍲 ", Style::default().fg(Color::Yellow).bold()),
        Span::styled("Group ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("Profile", Style::default().fg(Color::Blue).bold()),
        Span::styled(
            " - Members & Favorite Recipes",
            Style::default().fg(Color::White),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Profile ")
            .title_style(Style::default().fg(Color::White).bold()),
    )
    .alignment(Alignment::Left);
    f.render_widget(title, main_chunks[0]);

    page.draw(f, main_chunks[1]);

    // Footer with navigation help
    let (help_text, status_color) = page.help_text();
    let footer_content = vec![
        Line::from(vec![
            Span::styled("💡 ", Style::default().fg(Color::Yellow)),
            Span::styled(help_text, Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(
            page.status().to_string(),
            Style::default().fg(Color::Gray).italic(),
        )),
    ];

    let footer = Paragraph::new(footer_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(status_color))
                .title(" Controls ")
                .title_style(Style::default().fg(Color::White).bold()),
        )
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);
}
