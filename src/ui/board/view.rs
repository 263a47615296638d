//! Board viewer rendering.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::model::{Priority, Task};

use super::app::{AppState, StatusKind};

pub(crate) fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_title(frame, chunks[0], state);
    render_columns(frame, chunks[1], state);
    render_status(frame, chunks[2], state);
}

fn render_title(frame: &mut Frame, area: Rect, state: &AppState) {
    let (indicator, color) = if state.connected {
        ("● connected", Color::Green)
    } else {
        ("○ reconnecting", Color::Yellow)
    };

    let total: usize = state.columns.iter().map(|col| col.tasks.len()).sum();
    let left = format!(" Board  {total} task(s)");
    let padding = area
        .width
        .saturating_sub(left.len() as u16 + indicator.len() as u16 + 1) as usize;

    let line = Line::from(vec![
        Span::styled(left, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(padding)),
        Span::styled(indicator, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_columns(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.columns.is_empty() {
        let empty = Paragraph::new("No workflow stages. Create one with: tf stage new <name>")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = state
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, state.columns.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (index, column) in state.columns.iter().enumerate() {
        let is_selected = index == state.selected_column;
        let is_target = state.move_target == Some(index);

        let border_style = if is_target {
            Style::default().fg(Color::Magenta)
        } else if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if column.synthetic {
            format!(" {} (?) {} ", column.stage.name, column.tasks.len())
        } else {
            format!(" {} {} ", column.stage.name, column.tasks.len())
        };

        let items: Vec<ListItem> = column
            .tasks
            .iter()
            .map(|task| ListItem::new(task_line(task)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        if is_selected && !column.tasks.is_empty() {
            list_state.select(Some(state.selected_task));
        }
        frame.render_stateful_widget(list, slots[index], &mut list_state);
    }
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match &state.status {
        Some((StatusKind::Error, message)) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Red),
        )),
        Some((StatusKind::Info, message)) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            " h/l:Column  j/k:Task  m:Move  r:Refresh  q:Quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn task_line(task: &Task) -> Line<'static> {
    let marker = match task.priority {
        Priority::Critical => Span::styled("!! ", Style::default().fg(Color::Red)),
        Priority::High => Span::styled("!  ", Style::default().fg(Color::LightRed)),
        Priority::Medium => Span::raw("   "),
        Priority::Low => Span::styled(".  ", Style::default().fg(Color::DarkGray)),
    };

    let done = task.subtasks.iter().filter(|sub| sub.is_done).count();
    let suffix = if task.subtasks.is_empty() {
        String::new()
    } else {
        format!(" [{done}/{}]", task.subtasks.len())
    };

    Line::from(vec![
        marker,
        Span::raw(task.title.clone()),
        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
    ])
}
