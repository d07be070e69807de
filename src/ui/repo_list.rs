use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::{format_age, Repository};

/// Terminal lines taken by one repository card.
pub const ROW_HEIGHT: u16 = 3;

/// What the list view put on screen during the last draw.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub rows: Range<usize>,
}

/// Indices of the cards that fit in `height` lines starting at `offset`.
pub fn visible_rows(offset: usize, height: u16, len: usize) -> Range<usize> {
    let fit = if height == 0 {
        0
    } else {
        (height / ROW_HEIGHT).max(1) as usize
    };
    let start = offset.min(len);
    start..(start + fit).min(len)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn card<'a>(repo: &Repository, selected: bool, width: usize) -> ListItem<'a> {
    let name_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut title = vec![Span::styled(truncate(&repo.name, width), name_style)];
    if repo.fork {
        title.push(Span::styled(" (fork)", Style::default().fg(Color::DarkGray)));
    }

    let description = repo.description.as_deref().unwrap_or("No description");

    let mut meta = Vec::new();
    if let Some(language) = &repo.language {
        meta.push(Span::styled(
            language.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
        meta.push(Span::raw("  "));
    }
    meta.push(Span::styled(
        format!("★ {}", repo.stars),
        Style::default().fg(Color::DarkGray),
    ));
    if let Some(updated) = repo.updated_at {
        meta.push(Span::styled(
            format!("  updated {}", format_age(updated)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            truncate(description, width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(meta),
    ])
}

fn footer(app: &App) -> Option<Line<'static>> {
    if app.repos.is_loading_next_page() {
        Some(Line::from(Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow),
        )))
    } else if app.repos.is_exhausted() {
        Some(Line::from(Span::styled(
            "No more repositories",
            Style::default().fg(Color::DarkGray),
        )))
    } else if app.repos.last_error().is_some() {
        Some(Line::from(Span::styled(
            "Could not load more, scroll to retry",
            Style::default().fg(Color::Red),
        )))
    } else {
        None
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) -> Viewport {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Repositories ({}) ", app.repos.len()));

    if app.repos.is_empty() {
        let message = if app.repos.is_loading_first_page() {
            "Loading repositories...".to_string()
        } else if let Some(error) = app.repos.last_error() {
            format!("Could not load repositories: {} (r: retry)", error)
        } else if app.repos.is_exhausted() {
            "No repositories found".to_string()
        } else {
            String::new()
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return Viewport::default();
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let footer = footer(app);
    let (list_area, footer_area) = if footer.is_some() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (chunks[0], Some(chunks[1]))
    } else {
        (inner, None)
    };

    let width = list_area.width as usize;
    let items: Vec<ListItem> = app
        .repos
        .items()
        .iter()
        .enumerate()
        .map(|(i, repo)| card(repo, i == app.selected, width))
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default()
        .with_offset(app.offset)
        .with_selected(Some(app.selected));
    frame.render_stateful_widget(list, list_area, &mut state);

    if let (Some(line), Some(footer_area)) = (footer, footer_area) {
        frame.render_widget(Paragraph::new(line), footer_area);
    }

    Viewport {
        offset: state.offset(),
        rows: visible_rows(state.offset(), list_area.height, app.repos.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{app_with_repos, repo};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &App, width: u16, height: u16) -> (Viewport, String) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut viewport = Viewport::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                viewport = render(frame, app, area);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        (viewport, text)
    }

    #[test]
    fn visible_rows_fit_height() {
        assert_eq!(visible_rows(0, 30, 100), 0..10);
        assert_eq!(visible_rows(5, 30, 100), 5..15);
        assert_eq!(visible_rows(95, 30, 100), 95..100);
        assert_eq!(visible_rows(0, 2, 100), 0..1);
        assert_eq!(visible_rows(0, 0, 100), 0..0);
        assert_eq!(visible_rows(10, 30, 4), 4..4);
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn renders_cards_and_reports_rows() {
        let (app, _rx) = app_with_repos((0..20).map(repo).collect());
        let (viewport, text) = draw(&app, 60, 17);

        // 15 inner lines hold five cards
        assert_eq!(viewport, Viewport { offset: 0, rows: 0..5 });
        assert!(text.contains("repo-0"));
        assert!(text.contains("repo-4"));
        assert!(!text.contains("repo-5 "));
        assert!(text.contains("Rust"));
    }

    #[test]
    fn offset_follows_selection() {
        let (mut app, _rx) = app_with_repos((0..20).map(repo).collect());
        app.selected = 12;
        let (viewport, text) = draw(&app, 60, 17);

        assert!(viewport.rows.contains(&12));
        assert_eq!(viewport.rows.len(), 5);
        assert!(text.contains("repo-12"));
    }

    #[test]
    fn shows_loading_more_footer() {
        let (mut app, _rx) = app_with_repos((0..20).map(repo).collect());
        app.repos.fetch_next_page().unwrap();
        let (viewport, text) = draw(&app, 60, 17);

        assert!(text.contains("Loading more..."));
        // The footer line leaves room for four cards
        assert_eq!(viewport.rows, 0..4);
    }

    #[test]
    fn empty_list_message() {
        let (app, _rx) = app_with_repos(vec![]);
        let (viewport, text) = draw(&app, 60, 10);

        assert_eq!(viewport, Viewport::default());
        assert!(text.contains("No repositories found"));
    }
}
