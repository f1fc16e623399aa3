//! Frame rendering: category tabs, search box, item grid, footer, status bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::{AppState, Theme};
use crate::constants::APP_NAME;
use crate::display::{plain_price, rating_stars, truncate};
use crate::engine::{Footer, ViewSnapshot};
use crate::models::Item;

/// Rows one item card occupies (borders included).
pub const CARD_HEIGHT: u16 = 7;

/// Rows the footer occupies below the last card row.
pub const FOOTER_HEIGHT: u16 = 3;

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Category tabs
    pub tabs: Rect,
    /// Search input and results readout
    pub search: Rect,
    /// Scrollable item grid
    pub grid: Rect,
    /// Key hints
    pub status: Rect,
}

/// Splits the terminal area into its regions.
#[must_use]
pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Category tabs
            Constraint::Length(3),           // Search box
            Constraint::Min(CARD_HEIGHT),    // Grid
            Constraint::Length(1),           // Status bar
        ])
        .split(area);

    ScreenLayout {
        tabs: chunks[0],
        search: chunks[1],
        grid: chunks[2],
        status: chunks[3],
    }
}

/// Cards per grid row for a given width.
#[must_use]
pub const fn columns_for(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        _ => 3,
    }
}

/// Label of the "all categories" tab.
#[must_use]
pub fn all_label(locale: &str) -> &'static str {
    match locale {
        "ar" => "الكل",
        _ => "All",
    }
}

/// Render the UI from current state
pub fn render(f: &mut Frame, state: &AppState) {
    let theme = &state.theme;

    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(full_bg, f.area());

    let layout = screen_layout(f.area());
    let snapshot = state.view.snapshot();

    render_tabs(f, layout.tabs, state);
    render_search(f, layout.search, state, &snapshot);
    render_grid(f, layout.grid, state, &snapshot);
    render_status(f, layout.status, state);
}

fn render_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let titles: Vec<Line> = state
        .tabs()
        .into_iter()
        .enumerate()
        .map(|(i, (_, label))| {
            if i < 10 {
                Line::from(format!("{i} {label}"))
            } else {
                Line::from(label)
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.selected_tab())
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("|", Style::default().fg(theme.text_muted)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary))
                .title(format!(" {APP_NAME} ")),
        );
    f.render_widget(tabs, area);
}

fn render_search(f: &mut Frame, area: Rect, state: &AppState, snapshot: &ViewSnapshot) {
    let theme = &state.theme;

    let readout = if snapshot.busy {
        Span::styled("Filtering...", Style::default().fg(theme.warning))
    } else if snapshot.total == 1 {
        Span::styled("1 result", Style::default().fg(theme.text_secondary))
    } else {
        Span::styled(
            format!("{} results", snapshot.total),
            Style::default().fg(theme.text_secondary),
        )
    };

    let query = &state.view.filter_input().query;
    let input = if query.is_empty() {
        Span::styled("Type to search...", Style::default().fg(theme.text_muted))
    } else {
        Span::styled(query.clone(), Style::default().fg(theme.text))
    };

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(theme.primary)),
        input,
        Span::styled("▏", Style::default().fg(theme.accent)),
    ]);

    let search = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title_bottom(Line::from(vec![Span::raw(" "), readout, Span::raw(" ")]).right_aligned()),
    );
    f.render_widget(search, area);
}

fn render_grid(f: &mut Frame, area: Rect, state: &AppState, snapshot: &ViewSnapshot) {
    let columns = columns_for(area.width);
    let card_width = area.width / columns as u16;
    let first_row = state.scroll_row;
    let visible_rows = (area.height / CARD_HEIGHT) as usize;

    let items: Vec<&Item> = state.view.visible_items().collect();
    let item_rows = items.len().div_ceil(columns);

    for (i, item) in items.iter().enumerate() {
        let row = i / columns;
        if row < first_row {
            continue;
        }
        if row >= first_row + visible_rows {
            break;
        }
        let rect = Rect::new(
            area.x + (i % columns) as u16 * card_width,
            area.y + ((row - first_row) as u16) * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        );
        let revealed = snapshot.revealed.get(i).copied().unwrap_or(false);
        if revealed {
            render_card(f, rect, item, state);
        } else {
            render_skeleton(f, rect, &state.theme);
        }
    }

    // Footer sits in the slot after the last card row
    if item_rows >= first_row && item_rows - first_row < visible_rows.max(1) + 1 {
        let top = area.y + ((item_rows - first_row) as u16) * CARD_HEIGHT;
        let bottom = area.y + area.height;
        if top < bottom {
            let rect = Rect::new(area.x, top, area.width, FOOTER_HEIGHT.min(bottom - top));
            render_footer(f, rect, state, snapshot);
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, item: &Item, state: &AppState) {
    let theme = &state.theme;
    let locale = state.locale.as_str();
    let inner_width = area.width.saturating_sub(2) as usize;

    let category = item
        .category
        .as_ref()
        .map(|key| {
            state
                .view
                .catalog()
                .category(key)
                .map_or_else(|| key.to_string(), |c| c.label(locale).to_string())
        })
        .unwrap_or_default();

    let stock = if item.in_stock {
        Span::styled("In stock", Style::default().fg(theme.success))
    } else {
        Span::styled("Out of stock", Style::default().fg(theme.error))
    };

    let mut badges = vec![stock];
    if item.featured {
        badges.push(Span::styled("  ◆ Featured", Style::default().fg(theme.accent)));
    }

    let lines = vec![
        Line::from(Span::styled(
            truncate(&category, inner_width),
            Style::default().fg(theme.text_muted),
        )),
        Line::from(vec![
            Span::styled(
                plain_price(item.price),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(rating_stars(item.rating), Style::default().fg(theme.warning)),
        ]),
        Line::from(badges),
        Line::from(Span::styled(
            truncate(item.description.display(locale).unwrap_or(""), inner_width.saturating_sub(3)),
            Style::default().fg(theme.text_secondary),
        )),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(Span::styled(
                truncate(item.title(locale), inner_width.saturating_sub(3)),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(card, area);
}

fn render_skeleton(f: &mut Frame, area: Rect, theme: &Theme) {
    let bar_width = area.width.saturating_sub(4) as usize;
    let bar = |fraction: usize| {
        Line::from(Span::styled(
            "░".repeat(bar_width * fraction / 4),
            Style::default().fg(theme.text_muted).bg(theme.surface),
        ))
    };

    let skeleton = Paragraph::new(vec![bar(2), bar(3), bar(1), bar(4)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.text_muted)),
    );
    f.render_widget(skeleton, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState, snapshot: &ViewSnapshot) {
    let theme = &state.theme;
    let text = match snapshot.footer {
        Footer::Hidden => return,
        Footer::NoResults if snapshot.filter_is_default => {
            Span::styled("The catalog is empty.", Style::default().fg(theme.text_muted))
        }
        Footer::NoResults => Span::styled(
            "No products match your filters. Try another category or search.",
            Style::default().fg(theme.text_muted),
        ),
        Footer::LoadMore if snapshot.loading_more => {
            Span::styled("Loading more...", Style::default().fg(theme.warning))
        }
        Footer::LoadMore => Span::styled(
            format!(
                "[Enter] Load more ({} of {})",
                snapshot.visible.len(),
                snapshot.total
            ),
            Style::default().fg(theme.accent),
        ),
        Footer::EndOfResults => Span::styled(
            format!("Showing all {} products", snapshot.total),
            Style::default().fg(theme.text_secondary),
        ),
    };

    let footer = Paragraph::new(Line::from(text).centered()).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.text_muted)),
    );
    f.render_widget(footer, area);
}

fn render_status(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let hint = |key: &'static str, label: &'static str| {
        vec![
            Span::styled(key, Style::default().fg(theme.accent)),
            Span::styled(format!(" {label}  "), Style::default().fg(theme.text_muted)),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(hint("←/→", "category"));
    spans.extend(hint("↑/↓", "scroll"));
    spans.extend(hint("Enter", "load more"));
    spans.extend(hint("Ctrl+L", "locale"));
    spans.extend(hint("Esc", "clear/quit"));
    spans.push(Span::styled(
        format!("[{}]", state.locale),
        Style::default().fg(theme.primary),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
