//! Board viewer: event loop and terminal management.
//!
//! Renders the Kanban columns, tracks a selection, and applies optimistic
//! moves through the reconciler. A background bridge task feeds server
//! events in; the loop multiplexes keyboard polling and that event stream.

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::api::ApiClient;
use crate::board::{self, Column};
use crate::error::Result;
use crate::model::Stage;
use crate::realtime::{self, RealtimeHandle, ServerEvent};
use crate::store::TaskStore;

use super::view;

const EVENT_POLL_MS: u64 = 100;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

pub(crate) struct AppState {
    pub(crate) columns: Vec<Column>,
    pub(crate) selected_column: usize,
    pub(crate) selected_task: usize,
    /// Destination column index while a move is being picked.
    pub(crate) move_target: Option<usize>,
    pub(crate) status: Option<(StatusKind, String)>,
    pub(crate) connected: bool,
    should_quit: bool,
    needs_refresh: bool,
    joined_room: Option<String>,
}

impl AppState {
    fn new() -> Self {
        Self {
            columns: Vec::new(),
            selected_column: 0,
            selected_task: 0,
            move_target: None,
            status: None,
            connected: false,
            should_quit: false,
            needs_refresh: false,
            joined_room: None,
        }
    }

    pub(crate) fn selected_task_id(&self) -> Option<&str> {
        self.columns
            .get(self.selected_column)?
            .tasks
            .get(self.selected_task)
            .map(|task| task.id.as_str())
    }

    fn rebuild(&mut self, store: &TaskStore, stages: &[Stage], fallback: &str) {
        self.columns = board::build_columns(store.tasks(), stages, fallback);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.columns.is_empty() {
            self.selected_column = 0;
            self.selected_task = 0;
            return;
        }
        self.selected_column = self.selected_column.min(self.columns.len() - 1);
        let tasks = self.columns[self.selected_column].tasks.len();
        self.selected_task = self.selected_task.min(tasks.saturating_sub(1));
    }

    fn select_column(&mut self, delta: isize) {
        if self.columns.is_empty() {
            return;
        }
        let last = self.columns.len() as isize - 1;
        let next = (self.selected_column as isize + delta).clamp(0, last);
        self.selected_column = next as usize;
        self.selected_task = 0;
    }

    fn select_task(&mut self, delta: isize) {
        let Some(column) = self.columns.get(self.selected_column) else {
            return;
        };
        if column.tasks.is_empty() {
            return;
        }
        let last = column.tasks.len() as isize - 1;
        let next = (self.selected_task as isize + delta).clamp(0, last);
        self.selected_task = next as usize;
    }

    fn move_target_shift(&mut self, delta: isize) {
        if self.columns.is_empty() {
            return;
        }
        let last = self.columns.len() as isize - 1;
        let current = self.move_target.unwrap_or(self.selected_column) as isize;
        self.move_target = Some((current + delta).clamp(0, last) as usize);
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some((kind, message.into()));
    }

    fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::CommentAdded(comment) => {
                self.set_status(
                    StatusKind::Info,
                    format!("New comment on {}", comment.task_id),
                );
            }
            ServerEvent::CommentUpdated(comment) => {
                self.set_status(
                    StatusKind::Info,
                    format!("Comment updated on {}", comment.task_id),
                );
            }
            ServerEvent::CommentDeleted { task_id, .. } => {
                self.set_status(StatusKind::Info, format!("Comment deleted on {task_id}"));
            }
            ServerEvent::Notification(notification) => {
                self.set_status(StatusKind::Info, notification.message.clone());
                // A notification usually means a task changed under us.
                if notification.task_id.is_some() {
                    self.needs_refresh = true;
                }
            }
        }
    }

    /// Keep the comment room subscription on the selected task.
    fn sync_room(&mut self, handle: &RealtimeHandle) {
        let current = self.selected_task_id().map(str::to_string);
        if current == self.joined_room {
            return;
        }
        if let Some(old) = self.joined_room.take() {
            handle.leave(old);
        }
        if let Some(new) = current {
            handle.join(new.clone());
            self.joined_room = Some(new);
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Open the board viewer and block until the user quits.
pub async fn run(api: ApiClient, ws_url: String, token: String, fallback: String) -> Result<()> {
    let (bridge, handle) = realtime::bridge(ws_url, token);
    tokio::spawn(bridge.run());

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, api, handle, &fallback).await;
    restore_terminal()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: ApiClient,
    mut handle: RealtimeHandle,
    fallback: &str,
) -> Result<()> {
    let mut stages = api.list_stages().await?;
    let mut store = TaskStore::new();
    store.load_tasks(&api).await?;

    let mut state = AppState::new();
    state.rebuild(&store, &stages, fallback);
    state.sync_room(&handle);

    loop {
        state.connected = matches!(
            handle.connection_state(),
            crate::realtime::ConnectionState::Connected
        );

        if state.needs_refresh {
            state.needs_refresh = false;
            match store.load_tasks(&api).await {
                Ok(()) => {
                    stages = api.list_stages().await?;
                    state.rebuild(&store, &stages, fallback);
                }
                Err(err) => state.set_status(StatusKind::Error, err.to_string()),
            }
        }

        terminal.draw(|frame| view::render(frame, &state))?;

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(EVENT_POLL_MS)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            handle_key(&mut state, key.code, &mut store, &stages, &api, fallback)
                                .await;
                        }
                    }
                }
            }
            event = handle.events.recv() => {
                if let Some(event) = event {
                    state.handle_server_event(event);
                }
            }
        }

        state.sync_room(&handle);

        if state.should_quit {
            return Ok(());
        }
    }
}

async fn handle_key(
    state: &mut AppState,
    key: KeyCode,
    store: &mut TaskStore,
    stages: &[Stage],
    api: &ApiClient,
    fallback: &str,
) {
    // Move mode captures navigation keys until confirmed or cancelled.
    if state.move_target.is_some() {
        match key {
            KeyCode::Char('h') | KeyCode::Left => state.move_target_shift(-1),
            KeyCode::Char('l') | KeyCode::Right => state.move_target_shift(1),
            KeyCode::Enter => {
                confirm_move(state, store, stages, api, fallback).await;
                state.move_target = None;
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                state.move_target = None;
                state.status = None;
            }
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('h') | KeyCode::Left => state.select_column(-1),
        KeyCode::Char('l') | KeyCode::Right => state.select_column(1),
        KeyCode::Char('j') | KeyCode::Down => state.select_task(1),
        KeyCode::Char('k') | KeyCode::Up => state.select_task(-1),
        KeyCode::Char('r') => state.needs_refresh = true,
        KeyCode::Char('m') => {
            if state.selected_task_id().is_some() {
                state.move_target = Some(state.selected_column);
                state.set_status(
                    StatusKind::Info,
                    "Pick a column with h/l, Enter to move, Esc to cancel",
                );
            }
        }
        _ => {}
    }
}

async fn confirm_move(
    state: &mut AppState,
    store: &mut TaskStore,
    stages: &[Stage],
    api: &ApiClient,
    fallback: &str,
) {
    let Some(task_id) = state.selected_task_id().map(str::to_string) else {
        return;
    };
    let Some(target) = state.move_target else {
        return;
    };
    let Some(dest) = state.columns.get(target) else {
        return;
    };
    let synthetic = dest.synthetic;
    let dest_id = dest.stage.id.clone();
    let dest_name = dest.stage.name.clone();
    if synthetic {
        state.set_status(StatusKind::Error, "Cannot move into an unresolved column");
        return;
    }

    match board::move_task(store, stages, api, &task_id, &dest_id, fallback).await {
        Ok(()) => {
            state.set_status(StatusKind::Info, format!("Moved {task_id} to {dest_name}"));
        }
        Err(err) => {
            // The store was already reloaded from the server; just surface it.
            state.set_status(StatusKind::Error, format!("Move failed: {err}"));
        }
    }
    state.rebuild(store, stages, fallback);
}
