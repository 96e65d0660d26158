//! Ratatui front-end for the incremental search bar.
//!
//! The event loop owns the [`SearchDriver`]: key and mouse events feed the
//! controller, the debounce timer is checked every tick, and finished lookups
//! are drained from the driver's channel before each redraw.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::runtime::Handle;
use tracing::info;

use crate::api::client::HttpCatalog;
use crate::config::ClientConfig;
use crate::recent::{RecentSearches, recent_path_for};
use crate::search::driver::{NoRecent, RecordingNavigator};
use crate::search::{Handled, NavEvent, SearchBar, SearchDriver};
use crate::ui::components::theme::{ThemePalette, kbd_style};
use crate::ui::data::candidate_line;
use crate::ui::shortcuts;

const PLACEHOLDER: &str = "Search a medicine brand…";

/// Rows shown in the suggestion panel before it scrolls.
const PANEL_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    /// Render once and exit (headless-friendly).
    pub once: bool,
    /// Exit after the first navigation instead of staying open.
    pub exit_on_open: bool,
}

pub fn footer_legend(panel_open: bool) -> String {
    if panel_open {
        format!(
            "{}/{} move | {} open | {} select | {} close",
            shortcuts::MOVE_UP,
            shortcuts::MOVE_DOWN,
            shortcuts::OPEN,
            shortcuts::CLICK,
            shortcuts::DISMISS
        )
    } else {
        format!(
            "type to search | {} clear | {} theme | {} quit",
            shortcuts::CLEAR_QUERY,
            shortcuts::THEME,
            shortcuts::QUIT
        )
    }
}

/// Screen regions from the last frame, used to route mouse presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HitMap {
    input: Rect,
    panel: Option<Rect>,
    /// Inner list area and the scroll offset it was rendered with.
    rows: Option<(Rect, usize)>,
    row_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hit {
    Input,
    Row(usize),
    /// Inside the panel but not on a candidate (border, loading line).
    Panel,
    Outside,
}

impl HitMap {
    pub(crate) fn hit(&self, x: u16, y: u16) -> Hit {
        let pos = Position::new(x, y);
        if self.input.contains(pos) {
            return Hit::Input;
        }
        if let Some((rows, offset)) = self.rows
            && rows.contains(pos)
        {
            let idx = offset + usize::from(y - rows.y);
            return if idx < self.row_count {
                Hit::Row(idx)
            } else {
                Hit::Panel
            };
        }
        match self.panel {
            Some(panel) if panel.contains(pos) => Hit::Panel,
            _ => Hit::Outside,
        }
    }
}

fn panel_height(bar: &SearchBar) -> u16 {
    let session = bar.session();
    if !session.panel_open() {
        return 0;
    }
    let rows = if session.loading() || session.candidates().is_empty() {
        1
    } else {
        session.candidates().len().min(PANEL_ROWS)
    };
    rows as u16 + 2
}

fn draw(
    f: &mut Frame,
    bar: &SearchBar,
    recent: &[String],
    palette: ThemePalette,
    status: &str,
) -> HitMap {
    let session = bar.session();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),               // search bar
                Constraint::Length(panel_height(bar)), // suggestion panel
                Constraint::Min(0),                  // recent searches
                Constraint::Length(1),               // status
                Constraint::Length(1),               // footer
            ]
            .as_ref(),
        )
        .split(f.area());

    let mut hits = HitMap {
        input: chunks[0],
        ..HitMap::default()
    };

    // Search bar
    let border = if bar.input_focused() {
        palette.border_focus_style()
    } else {
        palette.border_style()
    };
    let input_line = if session.query().is_empty() {
        Line::from(Span::styled(PLACEHOLDER, palette.hint_style()))
    } else {
        Line::from(Span::styled(
            session.query().to_string(),
            Style::default().fg(palette.fg),
        ))
    };
    f.render_widget(
        Paragraph::new(input_line).block(
            Block::default()
                .title(Span::styled(" Medicine search ", palette.title()))
                .borders(Borders::ALL)
                .border_style(border),
        ),
        chunks[0],
    );
    if bar.input_focused() {
        let x = chunks[0].x + 1 + session.query().chars().count() as u16;
        f.set_cursor_position(Position::new(
            x.min(chunks[0].right().saturating_sub(2)),
            chunks[0].y + 1,
        ));
    }

    // Suggestion panel
    if session.panel_open() {
        let area = chunks[1];
        hits.panel = Some(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_style())
            .style(palette.surface_style());
        if session.loading() {
            f.render_widget(
                Paragraph::new(Span::styled("Loading…", palette.hint_style())).block(block),
                area,
            );
        } else if session.candidates().is_empty() {
            let msg = if session.last_error().is_some() {
                Span::styled("Search failed - keep typing to retry", Style::default().fg(palette.error))
            } else {
                Span::styled("No results found", palette.hint_style())
            };
            f.render_widget(Paragraph::new(msg).block(block), area);
        } else {
            let inner = block.inner(area);
            let items: Vec<ListItem> = session
                .candidates()
                .iter()
                .map(|c| ListItem::new(candidate_line(c, palette)))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(palette.selected_style())
                .highlight_symbol("› ");
            let mut state = ListState::default().with_selected(session.highlighted());
            f.render_stateful_widget(list, area, &mut state);
            hits.rows = Some((inner, state.offset()));
            hits.row_count = session.candidates().len();
        }
    }

    // Recent searches
    if session.query().trim().is_empty() && !recent.is_empty() {
        let items: Vec<ListItem> = recent
            .iter()
            .map(|q| ListItem::new(Span::styled(q.clone(), palette.hint_style())))
            .collect();
        f.render_widget(
            List::new(items).block(
                Block::default()
                    .title(Span::styled(" Recent searches ", palette.title()))
                    .borders(Borders::TOP)
                    .border_style(palette.border_style()),
            ),
            chunks[2],
        );
    }

    let status_line = match session.last_error() {
        Some(err) => Span::styled(format!("Search error: {err}"), Style::default().fg(palette.error)),
        None => Span::styled(status.to_string(), palette.hint_style()),
    };
    f.render_widget(Paragraph::new(status_line), chunks[3]);
    f.render_widget(
        Paragraph::new(Span::styled(footer_legend(session.panel_open()), kbd_style(palette))),
        chunks[4],
    );

    hits
}

/// Run the interactive search bar. Returns the last signature navigated to.
pub fn run_tui(opts: TuiOptions) -> Result<Option<String>> {
    if opts.once
        && std::env::var("TUI_HEADLESS")
            .map(|v| v == "1")
            .unwrap_or(false)
    {
        run_tui_headless(&opts)?;
        return Ok(None);
    }

    let catalog = Arc::new(HttpCatalog::new(opts.config.clone())?);
    let recent = RecentSearches::load(recent_path_for(&opts.data_dir));
    let mut driver = SearchDriver::new(
        SearchBar::from_config(&opts.config),
        catalog,
        RecordingNavigator::default(),
        recent,
        Handle::current(),
    );

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(30);
    let mut palette = ThemePalette::dark();
    let mut needs_draw = true;
    let mut hits = HitMap::default();
    let mut status = format!("Catalog: {}", opts.config.api_base);
    let mut opened: Option<String> = None;

    loop {
        if needs_draw {
            let recent = driver.recent().entries().to_vec();
            terminal.draw(|f| {
                hits = draw(f, driver.bar(), &recent, palette, &status);
            })?;
            needs_draw = false;
        }

        if event::poll(tick_rate)? {
            let visited_before = driver.navigator().visited.len();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    needs_draw = true;
                    if is_quit(&key, driver.bar().session().panel_open()) {
                        break;
                    }
                    let now = Instant::now();
                    match key.code {
                        KeyCode::F(2) => palette = palette.toggled(),
                        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            driver.clear(now)
                        }
                        KeyCode::Down => {
                            driver.handle(NavEvent::Down);
                        }
                        KeyCode::Up => {
                            driver.handle(NavEvent::Up);
                        }
                        KeyCode::Enter => {
                            driver.handle(NavEvent::Enter);
                        }
                        KeyCode::Esc => {
                            driver.handle(NavEvent::Escape);
                        }
                        KeyCode::Backspace => driver.pop_char(now),
                        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                            driver.push_char(c, now)
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    needs_draw = true;
                    match hits.hit(mouse.column, mouse.row) {
                        Hit::Input => driver.focus_input(),
                        Hit::Row(idx) => {
                            driver.handle(NavEvent::Click(idx));
                        }
                        Hit::Panel => {}
                        Hit::Outside => {
                            if driver.handle(NavEvent::OutsideClick) == Handled::Dismissed {
                                status = "Suggestions closed".to_string();
                            }
                        }
                    }
                }
                Event::Resize(_, _) => needs_draw = true,
                _ => {}
            }
            if driver.navigator().visited.len() > visited_before
                && let Some(sig) = driver.navigator().visited.last()
            {
                status = format!("Opened /drug/{sig}");
                opened = Some(sig.clone());
            }
        }

        if driver.tick(Instant::now()) {
            needs_draw = true;
        }
        let visited_before = driver.navigator().visited.len();
        if driver.pump() > 0 {
            needs_draw = true;
        }
        // Resolutions land through `pump`, so navigation can happen here too.
        if driver.navigator().visited.len() > visited_before
            && let Some(sig) = driver.navigator().visited.last()
        {
            status = format!("Opened /drug/{sig}");
            opened = Some(sig.clone());
        }

        if opts.exit_on_open && opened.is_some() {
            break;
        }
    }

    driver.unmount();
    teardown_terminal()?;
    if let Some(sig) = &opened {
        info!(signature = %sig, "tui exited after navigation");
    }
    Ok(opened)
}

fn is_quit(key: &KeyEvent, panel_open: bool) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    key.code == KeyCode::Esc && !panel_open
}

/// Exercise one debounced lookup against the catalog without a terminal.
fn run_tui_headless(opts: &TuiOptions) -> Result<()> {
    let probe = dotenvy::var("MEDI_HEADLESS_QUERY").unwrap_or_else(|_| "para".to_string());
    let handle = Handle::current();
    let catalog = Arc::new(HttpCatalog::new(opts.config.clone())?);
    let mut driver = SearchDriver::new(
        SearchBar::from_config(&opts.config),
        catalog,
        RecordingNavigator::default(),
        NoRecent,
        handle.clone(),
    );

    let start = Instant::now();
    driver.set_query(probe.clone(), start);
    if !driver.tick(start + opts.config.debounce) {
        anyhow::bail!("no lookup issued for {probe:?}");
    }
    handle.block_on(driver.next_completion());

    let session = driver.bar().session();
    if let Some(err) = session.last_error() {
        anyhow::bail!("lookup failed: {err}");
    }
    println!("{} candidates for {probe:?}", session.candidates().len());
    driver.unmount();
    Ok(())
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}
