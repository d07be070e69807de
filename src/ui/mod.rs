mod about;
mod popup;
mod repo_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Screen};

pub use repo_list::Viewport;

/// Draw the whole screen. Returns the rows the list view put on screen, if
/// the list was drawn.
pub fn render(frame: &mut Frame, app: &App) -> Option<Viewport> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let viewport = match app.screen {
        Screen::Repos => Some(repo_list::render(frame, app, chunks[1])),
        Screen::About => {
            about::render(frame, chunks[1]);
            None
        }
    };

    render_status_bar(frame, app, chunks[2]);

    if let Some(input) = &app.prompt {
        popup::render_input(frame, "Show repositories of", input);
    }

    viewport
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Repos => match app.repos.user() {
            Some(user) => format!(
                "repopage - {}'s repositories ({} loaded, page {})",
                user,
                app.repos.len(),
                app.repos.current_page()
            ),
            None => "repopage - Repositories".to_string(),
        },
        Screen::About => "repopage - About".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.repos.is_loading_first_page() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )])
    } else {
        let help = match app.screen {
            Screen::Repos => {
                "j/k/g/G: nav | Ctrl+d/u: page | Enter: open | y: yank | u: user | r: refresh | i: info | q: quit"
            }
            Screen::About => "q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
