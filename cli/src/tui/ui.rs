use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use taskboard_core::{Category, Priority, Task, TaskCounts, Theme};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

struct Palette {
    bg: Color,
    text: Color,
    muted: Color,
    border: Color,
    highlight: Color,
    total: Color,
    completed: Color,
    pending: Color,
    high: Color,
}

const LIGHT: Palette = Palette {
    bg: Color::White,
    text: Color::Black,
    muted: Color::Gray,
    border: Color::Gray,
    highlight: Color::LightBlue,
    total: Color::Blue,
    completed: Color::Green,
    pending: Color::Rgb(234, 88, 12),
    high: Color::Red,
};

const DARK: Palette = Palette {
    bg: Color::Reset,
    text: Color::White,
    muted: Color::DarkGray,
    border: Color::DarkGray,
    highlight: Color::DarkGray,
    total: Color::LightBlue,
    completed: Color::LightGreen,
    pending: Color::LightYellow,
    high: Color::LightRed,
};

fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let p = palette(app.theme());
    let size = f.area();
    f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.text)), size);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Counters
            Constraint::Length(3), // Search / filter
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    draw_header(f, app, p, main_chunks[0]);
    let counts = app.view().counts;
    draw_counters(f, &counts, p, main_chunks[1]);
    draw_search_bar(f, app, p, main_chunks[2]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[3]);

    draw_task_list(f, app, p, content_chunks[0]);
    draw_detail_view(f, app, p, content_chunks[1]);
    draw_footer(f, app, p, main_chunks[4]);
}

fn block<'a>(title: &'a str, p: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.border))
}

fn draw_header(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let theme_label = if app.theme().is_dark() { "☾ dark" } else { "☀ light" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("TASKBOARD", Style::default().fg(p.total).add_modifier(Modifier::BOLD)),
        Span::styled(format!("   {}", theme_label), Style::default().fg(p.muted)),
    ]))
    .alignment(Alignment::Center)
    .block(block("", p));
    f.render_widget(header, area);
}

fn draw_counters(f: &mut Frame, counts: &TaskCounts, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let cards = [
        ("Total Tasks", counts.total, p.total),
        ("Completed", counts.completed, p.completed),
        ("Pending", counts.pending, p.pending),
        ("High Priority", counts.high, p.high),
    ];
    for ((label, value, color), chunk) in cards.into_iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(vec![
            Span::styled(value.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {}", label), Style::default().fg(p.muted)),
        ]))
        .alignment(Alignment::Center)
        .block(block("", p));
        f.render_widget(card, *chunk);
    }
}

fn draw_search_bar(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(24)])
        .split(area);

    let searching = app.input_mode == InputMode::Searching;
    let search_text = if app.view_state.search.is_empty() && !searching {
        Span::styled("Search tasks...", Style::default().fg(p.muted))
    } else {
        Span::raw(app.view_state.search.as_str())
    };
    let search_style = if searching {
        Style::default().fg(p.total)
    } else {
        Style::default().fg(p.border)
    };
    let search = Paragraph::new(Line::from(search_text)).block(
        block(" / Search ", p).border_style(search_style),
    );
    f.render_widget(search, chunks[0]);

    let filter = Paragraph::new(app.view_state.filter.label())
        .alignment(Alignment::Center)
        .block(block(" f Filter ", p));
    f.render_widget(filter, chunks[1]);

    if searching {
        place_cursor(f, app, chunks[0]);
    }
}

fn priority_style(priority: Priority, p: &Palette) -> Style {
    match priority {
        Priority::High => Style::default().fg(p.high),
        Priority::Medium => Style::default().fg(p.pending),
        Priority::Low => Style::default().fg(p.completed),
    }
}

fn category_tag(category: Category) -> &'static str {
    match category {
        Category::Work => "work",
        Category::Personal => "pers",
        Category::Shopping => "shop",
        Category::Health => "hlth",
    }
}

fn draw_task_list(f: &mut Frame, app: &mut App, p: &Palette, area: Rect) {
    let view = app.view();
    if view.visible.is_empty() {
        let hint = if view.is_narrowed() {
            "Try adjusting your search or filters"
        } else {
            "Add your first task to get started! (press a)"
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No tasks found", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(hint, Style::default().fg(p.muted))),
        ])
        .alignment(Alignment::Center)
        .block(block(" Tasks ", p));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = view
        .visible
        .iter()
        .map(|task| {
            let status_icon = if task.completed { "✔" } else { "☐" };
            let pri_str = match task.priority {
                Priority::High => "H",
                Priority::Medium => "M",
                Priority::Low => "L",
            };
            let due_str = task
                .due_date
                .map(|d| d.format("%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let title_style = if task.completed {
                Style::default().fg(p.muted).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            Row::new(vec![
                Span::styled(status_icon, Style::default().fg(p.completed)),
                Span::styled(pri_str, priority_style(task.priority, p)),
                Span::raw(due_str),
                Span::raw(category_tag(task.category)),
                Span::styled(task.title.clone(), title_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3), // Status
            Constraint::Length(3), // Priority
            Constraint::Length(6), // Due
            Constraint::Length(5), // Category
            Constraint::Min(10),   // Title
        ],
    )
    .header(Row::new(vec!["St", "Pr", "Due", "Cat", "Task"]).style(Style::default().fg(p.pending)))
    .block(block(" Tasks ", p))
    .row_highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn detail_line<'a>(label: &'a str, value: String, p: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(p.total)),
        Span::raw(value),
    ])
}

fn detail_lines<'a>(task: &'a Task, p: &Palette) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().fg(p.total)),
            Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(p.muted)),
            Span::raw(task.id.short()),
        ]),
        detail_line(
            "Status: ",
            if task.completed { "Completed" } else { "Pending" }.to_string(),
            p,
        ),
        Line::from(vec![
            Span::styled("Priority: ", Style::default().fg(p.total)),
            Span::styled(task.priority.to_string(), priority_style(task.priority, p)),
        ]),
        detail_line("Category: ", task.category.to_string(), p),
        detail_line(
            "Due: ",
            task.due_date
                .map(|d| d.format("%a %b %-d, %Y").to_string())
                .unwrap_or_else(|| "None".to_string()),
            p,
        ),
        detail_line(
            "Created: ",
            task.created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            p,
        ),
        Line::from(""),
    ];

    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled("Description:", Style::default().fg(p.total))));
        lines.push(Line::from(task.description.as_str()));
    }
    lines
}

fn draw_detail_view(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    match app.selected_task() {
        Some(task) => {
            let detail = Paragraph::new(detail_lines(task, p))
                .block(block(" Detail ", p))
                .wrap(Wrap { trim: true });
            f.render_widget(detail, area);
        }
        None => f.render_widget(block(" Detail ", p), area),
    }
}

fn draw_footer(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let (prompt, show_input) = match app.input_mode {
        InputMode::Adding => ("New: ", true),
        InputMode::Editing(_) => ("Edit: ", true),
        InputMode::Searching => ("Enter/Esc: done searching", false),
        InputMode::Normal => ("", false),
    };

    let footer = if show_input {
        Paragraph::new(Line::from(vec![
            Span::styled(prompt, Style::default().fg(p.total).add_modifier(Modifier::BOLD)),
            Span::raw(app.input.as_str()),
        ]))
    } else if let Some(message) = &app.message {
        Paragraph::new(Span::styled(message.as_str(), Style::default().fg(p.high)))
    } else if app.input_mode == InputMode::Searching {
        Paragraph::new(Span::styled(prompt, Style::default().fg(p.muted)))
    } else {
        Paragraph::new(Span::styled(
            "j/k: Move | space: Done | a: Add | e: Edit | d: Delete | /: Search | f: Filter | t: Theme | q: Quit",
            Style::default().fg(p.muted),
        ))
        .alignment(Alignment::Center)
    };
    f.render_widget(footer, area);

    if show_input {
        let prompt_width = prompt.width() as u16;
        let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
        let x = area.x + prompt_width + before_cursor.width() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}

// Cursor inside the bordered search box.
fn place_cursor(f: &mut Frame, app: &App, area: Rect) {
    let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
    let x = area.x + 1 + before_cursor.width() as u16;
    f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
}
