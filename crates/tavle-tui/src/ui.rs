use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tavle_domain::{describe, Card, Lane, PriorityFilter, SprintFilter, StatusFilter};

use crate::app::{App, AppMode};
use crate::components::render_popup_block;

pub fn render(app: &App, frame: &mut Frame) {
    let has_banner = app.banner.is_some();
    let constraints = if has_banner {
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    if let Some(banner) = &app.banner {
        banner.render(frame, chunks[next]);
        next += 1;
    }

    render_header(app, frame, chunks[next]);
    render_lanes(app, frame, chunks[next + 1]);
    render_footer(app, frame, chunks[next + 2]);

    if app.mode == AppMode::Detail {
        render_detail_popup(app, frame);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let counts = app.counts();
    let mut spans = vec![
        Span::styled("Total ", Style::default().fg(Color::DarkGray)),
        Span::raw(counts.total.to_string()),
        Span::styled("  To do ", Style::default().fg(Color::DarkGray)),
        Span::raw(counts.todo.to_string()),
        Span::styled("  In progress ", Style::default().fg(Color::DarkGray)),
        Span::raw(counts.in_progress.to_string()),
        Span::styled("  Done ", Style::default().fg(Color::DarkGray)),
        Span::raw(counts.done.to_string()),
    ];

    let filters = filter_summary(app);
    if !filters.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", filters),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.loading {
        spans.push(Span::styled(
            "  loading…",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let widget = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("tavle"));
    frame.render_widget(widget, area);
}

fn filter_summary(app: &App) -> String {
    let mut parts = Vec::new();
    if let StatusFilter::Family(lane) = app.filters.status {
        parts.push(format!("status: {}", lane.title().to_lowercase()));
    }
    if let SprintFilter::Bucket(name) = &app.filters.sprint {
        parts.push(format!("sprint: {name}"));
    }
    if let PriorityFilter::Contains(text) = &app.filters.priority {
        parts.push(format!("priority: {text}"));
    }
    parts.join(", ")
}

fn render_lanes(app: &App, frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (lane, column) in Lane::ALL.into_iter().zip(columns.iter()) {
        render_lane(app, frame, *column, lane);
    }
}

fn render_lane(app: &App, frame: &mut Frame, area: Rect, lane: Lane) {
    let visible = app.visible_in_lane(lane);
    let focused = app.focus == lane;
    let selected = app.selected_index(lane);

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = format!("{} ({})", lane.title(), app.board.lane(lane).len());

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(index, card)| card_item(app, card, focused && index == selected))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(list, area);
}

fn card_item<'a>(app: &App, card: &'a Card, selected: bool) -> ListItem<'a> {
    let grabbed = app.grabbed.as_deref() == Some(card.key());

    let mut header = vec![Span::styled(
        card.key(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(priority) = card.issue.priority.as_deref() {
        let color = match card.priority_bucket_text() {
            "high" => Color::Red,
            "medium" => Color::Yellow,
            "low" => Color::Green,
            _ => Color::DarkGray,
        };
        header.push(Span::raw(" "));
        header.push(Span::styled(priority, Style::default().fg(color)));
    }
    if let Some(sprint) = card.sprint.as_deref() {
        header.push(Span::styled(
            format!(" s{sprint}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut meta = vec![Span::styled(
        card.issue.status_text(),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(assignee) = card.issue.assignee.as_deref() {
        meta.push(Span::styled(
            format!("  {assignee}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut style = Style::default();
    if selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if grabbed {
        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }

    ListItem::new(vec![
        Line::from(header),
        Line::from(card.issue.summary.clone()),
        Line::from(meta),
        Line::from(""),
    ])
    .style(style)
}

fn render_detail_popup(app: &App, frame: &mut Frame) {
    let Some(card) = app.detail_key.as_deref().and_then(|key| app.card_by_key(key)) else {
        return;
    };

    let title = format!("{} — {}", card.key(), card.issue.summary);
    let inner = render_popup_block(frame, &title, 70, 70);

    let dash = |value: Option<&str>| value.unwrap_or("—").to_string();
    let mut lines = vec![
        meta_line("Status", dash(card.issue.status.as_deref())),
        meta_line("Type", dash(card.issue.issue_type.as_deref())),
        meta_line("Assignee", dash(card.issue.assignee.as_deref())),
        meta_line("Priority", dash(card.issue.priority.as_deref())),
        meta_line(
            "Labels",
            if card.labels().is_empty() {
                "—".to_string()
            } else {
                card.labels().join(", ")
            },
        ),
        meta_line("Created", dash(card.issue.created.as_deref())),
        meta_line("Updated", dash(card.issue.updated.as_deref())),
        meta_line("Link", dash(card.issue.url.as_deref())),
        Line::from(""),
    ];

    for text in describe::render(card.issue.description.as_ref()).lines() {
        lines.push(Line::from(text.to_string()));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, inner);
}

fn meta_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.mode {
        AppMode::Normal => {
            "←/→ lane  ↑/↓ card  ⏎ details  space grab  s/n/p filters  f clear  r reload  R reset  e export  q quit"
        }
        AppMode::Moving => "←/→ move lane  ↑/↓ reorder  ⏎/space drop  esc cancel",
        AppMode::Detail => "esc close",
    };
    let widget = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}
