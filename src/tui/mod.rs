//! Terminal storefront browser.
//!
//! Hosts a [`CatalogView`] over a [`TerminalViewport`]: every frame lays the
//! visible slice out on the grid, feeds that layout to the viewport observer,
//! draws, then reads input and ticks the view. Queued filter input is drawn
//! as busy for one frame before it is applied.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod render;
pub mod theme;
pub mod viewport;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::collections::BTreeSet;
use std::io;
use std::time::{Duration, Instant};

pub use theme::Theme;
pub use viewport::{RowSpan, TerminalViewport};

use crate::config::Config;
use crate::constants::ALL_CATEGORIES;
use crate::engine::{CatalogView, Generation, SentinelKey, Target, ViewOptions};
use crate::models::Catalog;
use render::{columns_for, screen_layout, CARD_HEIGHT, FOOTER_HEIGHT};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Application state for the terminal browser.
pub struct AppState {
    /// The catalog view-model
    pub view: CatalogView<TerminalViewport>,
    /// Active color theme
    pub theme: Theme,
    /// Display locale
    pub locale: String,
    /// Locales offered by Ctrl+L, in cycling order
    locales: Vec<String>,
    /// First card row shown in the grid
    pub scroll_row: usize,
    /// Card rows that fit in the grid (from the last layout pass)
    visible_rows: usize,
    /// Cards per row (from the last layout pass)
    columns: usize,
    /// Filtered set the scroll position belongs to
    scrolled_generation: Generation,
    /// Set when the user asked to leave
    pub should_quit: bool,
}

impl AppState {
    /// Creates the browser state over `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog, config: &Config, theme: Theme) -> Self {
        let locales = collect_locales(&catalog, &config.ui.locale);
        let options = ViewOptions::from_config(&config.browse);
        let view = CatalogView::new(catalog, TerminalViewport::new(), options);
        let scrolled_generation = view.disclosure().generation();

        Self {
            view,
            theme,
            locale: config.ui.locale.clone(),
            locales,
            scroll_row: 0,
            visible_rows: 1,
            columns: 1,
            scrolled_generation,
            should_quit: false,
        }
    }

    /// Category tabs as `(key, label)`, starting with "all".
    #[must_use]
    pub fn tabs(&self) -> Vec<(String, String)> {
        std::iter::once((
            ALL_CATEGORIES.to_string(),
            render::all_label(&self.locale).to_string(),
        ))
        .chain(self.view.catalog().categories().iter().map(|c| {
            (
                c.key.as_str().to_string(),
                c.label(&self.locale).to_string(),
            )
        }))
        .collect()
    }

    /// Index of the tab matching the current category input.
    #[must_use]
    pub fn selected_tab(&self) -> usize {
        let current = self.view.filter_input().category.as_str().to_string();
        self.tabs()
            .iter()
            .position(|(key, _)| *key == current)
            .unwrap_or(0)
    }

    /// Selects the tab at `index`, ignoring out-of-range indices.
    pub fn select_tab(&mut self, index: usize) {
        if let Some((key, _)) = self.tabs().get(index) {
            self.view.select_category(key);
        }
    }

    /// Moves the category selection by `delta`, wrapping around.
    pub fn cycle_category(&mut self, delta: isize) {
        let count = self.tabs().len() as isize;
        let next = (self.selected_tab() as isize + delta).rem_euclid(count);
        self.select_tab(next as usize);
    }

    /// Switches to the next display locale.
    pub fn toggle_locale(&mut self) {
        let current = self.locales.iter().position(|l| *l == self.locale);
        let next = current.map_or(0, |i| (i + 1) % self.locales.len());
        if let Some(locale) = self.locales.get(next) {
            tracing::debug!("Display locale {} -> {}", self.locale, locale);
            self.locale.clone_from(locale);
        }
    }

    fn item_rows(&self) -> usize {
        self.view.disclosure().revealed_count().div_ceil(self.columns.max(1))
    }

    /// Largest scroll position that still shows the footer slot.
    fn max_scroll(&self) -> usize {
        (self.item_rows() + 1).saturating_sub(self.visible_rows.max(1))
    }

    /// Scrolls by `delta` card rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_row.saturating_add_signed(delta);
        self.scroll_row = target.min(self.max_scroll());
    }

    /// Places the visible slice and the sentinel on the grid for `area` and
    /// lets the viewport observer compare them against the scrolled window.
    pub fn layout_pass(&mut self, area: Rect) {
        let grid = screen_layout(area).grid;
        self.columns = columns_for(grid.width);
        self.visible_rows = ((grid.height / CARD_HEIGHT) as usize).max(1);

        // A new filtered set starts at the top
        let generation = self.view.disclosure().generation();
        if generation != self.scrolled_generation {
            self.scrolled_generation = generation;
            self.scroll_row = 0;
        }
        self.scroll_row = self.scroll_row.min(self.max_scroll());

        let columns = self.columns;
        let card_height = u32::from(CARD_HEIGHT);
        let ids: Vec<_> = self.view.visible_items().map(|item| item.id.clone()).collect();
        let boundary = ids.len();
        let item_rows = boundary.div_ceil(columns) as u32;
        let scroll = self.scroll_row as u32 * card_height;

        let viewport = self.view.observer_mut();
        viewport.clear_layout();
        for (i, id) in ids.into_iter().enumerate() {
            let top = (i / columns) as u32 * card_height;
            viewport.place(
                Target::Item(id),
                RowSpan {
                    top,
                    height: card_height,
                },
            );
        }
        viewport.place(
            Target::Sentinel(SentinelKey {
                generation,
                boundary,
            }),
            RowSpan {
                top: item_rows * card_height,
                height: u32::from(FOOTER_HEIGHT),
            },
        );
        viewport.set_viewport(scroll, u32::from(grid.height));
        viewport.evaluate();
    }

    /// How long the loop may wait for input before the next frame.
    #[must_use]
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        if self.view.is_busy() || self.view.observer().has_entries() {
            return Duration::ZERO;
        }
        self.view
            .next_reveal_deadline()
            .map_or(FRAME_INTERVAL, |deadline| {
                deadline.saturating_duration_since(now).min(FRAME_INTERVAL)
            })
    }

    /// Ticks the view after input, unless a filter pass was queued since the
    /// last frame. `busy_drawn` is whether that frame already showed it.
    pub fn advance(&mut self, busy_drawn: bool, now: Instant) {
        if busy_drawn || !self.view.is_busy() {
            self.view.tick(now);
        }
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => self.toggle_locale(),
            KeyCode::Char(c) if alt && c.is_ascii_digit() => {
                self.select_tab(c.to_digit(10).map_or(0, |d| d as usize));
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                let mut query = self.view.filter_input().query.clone();
                query.push(c);
                self.view.set_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.view.filter_input().query.clone();
                if query.pop().is_some() {
                    self.view.set_query(query);
                }
            }
            KeyCode::Esc => {
                if self.view.filter_input().query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.view.set_query(String::new());
                }
            }
            KeyCode::Left | KeyCode::BackTab => self.cycle_category(-1),
            KeyCode::Right | KeyCode::Tab => self.cycle_category(1),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-(self.visible_rows as isize)),
            KeyCode::PageDown => self.scroll_by(self.visible_rows as isize),
            KeyCode::Home => self.scroll_row = 0,
            KeyCode::End => self.scroll_row = self.max_scroll(),
            KeyCode::Enter => self.view.load_more(),
            _ => {}
        }
    }
}

/// Display locales found in the catalog, starting with `preferred`.
fn collect_locales(catalog: &Catalog, preferred: &str) -> Vec<String> {
    let mut found: BTreeSet<&str> = BTreeSet::new();
    for item in catalog.items() {
        found.extend(item.name.iter().map(|(locale, _)| locale));
    }
    for category in catalog.categories() {
        found.extend(category.name.iter().map(|(locale, _)| locale));
    }

    let mut locales = vec![preferred.to_string()];
    locales.extend(
        found
            .into_iter()
            .filter(|l| *l != preferred)
            .map(str::to_string),
    );
    locales
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    state.view.tick(Instant::now());

    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        state.layout_pass(Rect::new(0, 0, size.width, size.height));

        terminal.draw(|f| render::render(f, state))?;

        if state.should_quit {
            break;
        }
        let busy_drawn = state.view.is_busy();

        // Resize needs no handling: the next frame lays out again
        if event::poll(state.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                state.handle_key(key);
            }
        }

        state.advance(busy_drawn, Instant::now());
    }

    state.view.release();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryKey, Item};
    use ratatui::backend::TestBackend;

    fn catalog(count: usize) -> Catalog {
        let coffee = CategoryKey::new("coffee").unwrap();
        let items = (0..count)
            .map(|i| {
                Item::new(format!("item-{i}"), format!("Item {i}"))
                    .named("ar", format!("منتج {i}"))
                    .in_category(coffee.clone())
            })
            .collect();
        let categories = vec![
            Category::new("coffee", "Coffee").unwrap(),
            Category::new("tea", "Tea").unwrap(),
        ];
        Catalog::new(items, categories).unwrap()
    }

    fn state(count: usize) -> AppState {
        let mut config = Config::new();
        config.browse.stagger_step_ms = 0;
        config.browse.stagger_cap_ms = 0;
        AppState::new(catalog(count), &config, Theme::dark())
    }

    fn press(state: &mut AppState, code: KeyCode) {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    // 100x40 terminal: 3 columns, 33-row grid, 4 card rows
    const AREA: Rect = Rect::new(0, 0, 100, 40);

    fn frame(state: &mut AppState) {
        state.view.tick(Instant::now());
        state.layout_pass(AREA);
    }

    #[test]
    fn test_tabs_and_category_cycling() {
        let mut state = state(3);
        let labels: Vec<String> = state.tabs().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["All", "Coffee", "Tea"]);

        press(&mut state, KeyCode::Right);
        assert_eq!(state.selected_tab(), 1);
        press(&mut state, KeyCode::Left);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.selected_tab(), 2);

        state.handle_key(KeyEvent::new(KeyCode::Char('0'), KeyModifiers::ALT));
        assert_eq!(state.selected_tab(), 0);
    }

    #[test]
    fn test_typing_edits_query_and_marks_busy() {
        let mut state = state(3);
        press(&mut state, KeyCode::Char('i'));
        press(&mut state, KeyCode::Char('t'));
        assert_eq!(state.view.filter_input().query, "it");
        assert!(state.view.is_busy());

        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.view.filter_input().query, "i");

        press(&mut state, KeyCode::Esc);
        assert_eq!(state.view.filter_input().query, "");
        assert!(!state.should_quit);

        press(&mut state, KeyCode::Esc);
        assert!(state.should_quit);
    }

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(AREA.width, AREA.height)).unwrap();
        terminal.draw(|f| render::render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_queued_filter_is_drawn_busy_before_it_applies() {
        let mut state = state(3);
        frame(&mut state);
        assert!(draw(&state).contains("3 results"));

        let busy_drawn = state.view.is_busy();
        press(&mut state, KeyCode::Char('x'));
        state.advance(busy_drawn, Instant::now());
        assert!(state.view.is_busy());
        assert!(draw(&state).contains("Filtering..."));

        let busy_drawn = state.view.is_busy();
        state.advance(busy_drawn, Instant::now());
        assert!(!state.view.is_busy());
        assert!(draw(&state).contains("0 results"));
    }

    #[test]
    fn test_non_filter_input_ticks_at_once() {
        let mut state = state(20);
        frame(&mut state);
        let shown = state.view.snapshot().visible.len();

        press(&mut state, KeyCode::Enter);
        state.advance(false, Instant::now());
        state.advance(false, Instant::now());
        assert!(state.view.snapshot().visible.len() > shown);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut state = state(1);
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
        assert_eq!(state.view.filter_input().query, "");
    }

    #[test]
    fn test_toggle_locale_cycles_catalog_locales() {
        let mut state = state(1);
        assert_eq!(state.locale, "en");
        state.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(state.locale, "ar");
        state.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(state.locale, "en");
    }

    #[test]
    fn test_viewport_reveals_items_on_screen() {
        let mut state = state(6);
        frame(&mut state);
        frame(&mut state);
        frame(&mut state);

        let snapshot = state.view.snapshot();
        assert_eq!(snapshot.visible.len(), 6);
        assert!(snapshot.revealed.iter().all(|r| *r));
    }

    #[test]
    fn test_sentinel_in_view_loads_until_screen_is_full() {
        // 3 columns x 4 rows on screen; the sentinel sits below the last row
        let mut state = state(40);
        for _ in 0..20 {
            frame(&mut state);
        }

        let shown = state.view.snapshot().visible.len();
        assert!(shown > 6, "expected progressive loading, got {shown}");
        assert!(shown < 40, "sentinel should leave the viewport before the end");
    }

    #[test]
    fn test_scrolling_is_clamped_and_reset_on_filter_change() {
        let mut state = state(40);
        for _ in 0..20 {
            frame(&mut state);
        }
        press(&mut state, KeyCode::End);
        assert!(state.scroll_row > 0);
        press(&mut state, KeyCode::PageDown);
        assert_eq!(state.scroll_row, state.max_scroll());

        press(&mut state, KeyCode::Char('9'));
        frame(&mut state);
        assert_eq!(state.scroll_row, 0);
    }

    #[test]
    fn test_enter_loads_more() {
        let mut state = state(40);
        let before = state.view.snapshot().visible.len();
        press(&mut state, KeyCode::Enter);
        state.view.tick(Instant::now());
        state.view.tick(Instant::now());
        assert!(state.view.snapshot().visible.len() > before);
    }
}
