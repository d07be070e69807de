use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const BINDINGS: &[(&str, &str)] = &[
    ("j / k, arrows, wheel", "move selection"),
    ("g / G", "first / last repository"),
    ("Ctrl+d / Ctrl+u", "half page down / up"),
    ("Enter / o", "open repository in browser"),
    ("y", "copy repository URL"),
    ("u", "show another user"),
    ("r", "reload from the first page"),
    ("i", "this screen"),
    ("q / Esc", "back / quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("repopage {}", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            env!("CARGO_PKG_DESCRIPTION"),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    lines.extend(BINDINGS.iter().map(|(keys, what)| {
        Line::from(vec![
            Span::styled(format!("{:>22}", keys), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::raw(*what),
        ])
    }));

    let about = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" About "))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(about, area);
}
