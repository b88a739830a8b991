use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tavle_core::SprintPlan;
use tavle_domain::{
    build_cards, BoardCounts, BoardState, Card, FilterSet, Lane, PriorityFilter, Snapshot,
    SprintFilter, StatusFilter,
};
use tavle_persistence::LayoutStore;

use crate::components::Banner;
use crate::events::{Event, EventHandler};
use crate::{export, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    /// A card is grabbed and follows lane/position keys until dropped.
    Moving,
    Detail,
}

pub struct AppOptions {
    pub snapshot_path: PathBuf,
    pub export_path: PathBuf,
    pub store: Arc<dyn LayoutStore>,
    pub plan: SprintPlan,
}

/// The board controller: owns the session state and drives
/// fetch → build → restore → render → interact.
pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub loading: bool,
    pub cards: Vec<Card>,
    pub board: BoardState,
    pub filters: FilterSet,
    pub banner: Option<Banner>,
    pub focus: Lane,
    pub grabbed: Option<String>,
    pub detail_key: Option<String>,
    snapshot_path: PathBuf,
    export_path: PathBuf,
    store: Arc<dyn LayoutStore>,
    plan: SprintPlan,
    selected: HashMap<Lane, usize>,
    grab_origin: Option<(Lane, usize)>,
    needs_reload: bool,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            loading: true,
            cards: Vec::new(),
            board: BoardState::default(),
            filters: FilterSet::default(),
            banner: None,
            focus: Lane::Todo,
            grabbed: None,
            detail_key: None,
            snapshot_path: options.snapshot_path,
            export_path: options.export_path,
            store: options.store,
            plan: options.plan,
            selected: HashMap::new(),
            grab_origin: None,
            needs_reload: true,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let mut events = EventHandler::new();
        let result = self.event_loop(&mut terminal, &mut events).await;

        events.stop();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &mut EventHandler,
    ) -> anyhow::Result<()> {
        while !self.should_quit {
            if self.take_reload_request() {
                spawn_snapshot_load(self.snapshot_path.clone(), events.sender());
            }

            terminal.draw(|frame| ui::render(self, frame))?;

            match events.next().await {
                Some(Event::Key(key)) => self.handle_key(key.code).await,
                Some(Event::SnapshotLoaded(result)) => self.ingest_snapshot(result).await,
                Some(Event::Tick) => {}
                None => break,
            }
        }
        Ok(())
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Request a fresh snapshot load; the event loop spawns the read.
    pub fn request_reload(&mut self) {
        self.loading = true;
        self.needs_reload = true;
    }

    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_reload)
    }

    /// Apply a completed snapshot load. A failure keeps the previous board
    /// and surfaces a single replaceable banner; a success rebuilds the
    /// board and overlays the persisted layout.
    pub async fn ingest_snapshot(&mut self, result: Result<Snapshot, String>) {
        self.loading = false;
        match result {
            Ok(snapshot) => {
                self.cards = build_cards(snapshot.issues, &self.plan);
                self.board = BoardState::assemble(&self.cards);
                if let Some(saved) = self.store.load().await {
                    self.board.apply_layout(&saved.lanes);
                }
                self.banner = None;
                self.grabbed = None;
                self.grab_origin = None;
                self.mode = AppMode::Normal;
                if self
                    .detail_key
                    .as_deref()
                    .is_some_and(|key| !self.board.contains(key))
                {
                    self.detail_key = None;
                }
                self.clamp_selections();
                tracing::info!("board rebuilt with {} cards", self.cards.len());
            }
            Err(message) => {
                tracing::warn!("snapshot load failed: {}", message);
                self.banner = Some(Banner::error(format!("Error loading data: {message}")));
            }
        }
    }

    pub fn counts(&self) -> BoardCounts {
        self.board.counts()
    }

    pub fn card_by_key(&self, key: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.key() == key)
    }

    /// Cards of a lane that pass the active filters, in board order.
    pub fn visible_in_lane(&self, lane: Lane) -> Vec<&Card> {
        self.board
            .lane(lane)
            .iter()
            .filter_map(|key| self.card_by_key(key))
            .filter(|card| self.filters.is_visible(card))
            .collect()
    }

    pub fn selected_index(&self, lane: Lane) -> usize {
        self.selected.get(&lane).copied().unwrap_or(0)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        let visible = self.visible_in_lane(self.focus);
        visible.get(self.selected_index(self.focus)).copied()
    }

    fn clamp_selections(&mut self) {
        for lane in Lane::ALL {
            let visible = self.visible_in_lane(lane).len();
            let entry = self.selected.entry(lane).or_insert(0);
            *entry = (*entry).min(visible.saturating_sub(1));
        }
    }

    pub async fn handle_key(&mut self, code: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;

        if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) && self.mode != AppMode::Detail {
            self.quit();
            return;
        }

        match self.mode {
            AppMode::Normal => match code {
                KeyCode::Left | KeyCode::Char('h') => self.focus_prev_lane(),
                KeyCode::Right | KeyCode::Char('l') => self.focus_next_lane(),
                KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
                KeyCode::Enter => self.open_detail(),
                KeyCode::Char(' ') | KeyCode::Char('g') => self.grab_selected(),
                KeyCode::Char('s') => self.cycle_status_filter(),
                KeyCode::Char('n') => self.cycle_sprint_filter(),
                KeyCode::Char('p') => self.cycle_priority_filter(),
                KeyCode::Char('f') => self.clear_filters(),
                KeyCode::Char('r') => self.request_reload(),
                KeyCode::Char('R') => self.reset().await,
                KeyCode::Char('e') => self.export_board().await,
                _ => {}
            },
            AppMode::Moving => match code {
                KeyCode::Left | KeyCode::Char('h') => self.move_grabbed_lane(-1),
                KeyCode::Right | KeyCode::Char('l') => self.move_grabbed_lane(1),
                KeyCode::Down | KeyCode::Char('j') => self.move_grabbed_within(1),
                KeyCode::Up | KeyCode::Char('k') => self.move_grabbed_within(-1),
                KeyCode::Enter | KeyCode::Char(' ') => self.drop_grabbed().await,
                KeyCode::Esc => self.cancel_grab(),
                _ => {}
            },
            AppMode::Detail => match code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.close_detail(),
                _ => {}
            },
        }
    }

    fn focus_prev_lane(&mut self) {
        self.focus = match self.focus {
            Lane::Todo => Lane::Todo,
            Lane::InProgress => Lane::Todo,
            Lane::Done => Lane::InProgress,
        };
    }

    fn focus_next_lane(&mut self) {
        self.focus = match self.focus {
            Lane::Todo => Lane::InProgress,
            Lane::InProgress => Lane::Done,
            Lane::Done => Lane::Done,
        };
    }

    fn select_next(&mut self) {
        let visible = self.visible_in_lane(self.focus).len();
        let entry = self.selected.entry(self.focus).or_insert(0);
        if *entry + 1 < visible {
            *entry += 1;
        }
    }

    fn select_prev(&mut self) {
        let entry = self.selected.entry(self.focus).or_insert(0);
        *entry = entry.saturating_sub(1);
    }

    pub fn open_detail(&mut self) {
        if let Some(card) = self.selected_card() {
            self.detail_key = Some(card.key().to_string());
            self.mode = AppMode::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_key = None;
        self.mode = AppMode::Normal;
    }

    /// Pick up the selected card. Its origin is remembered so a cancelled
    /// move restores the pre-grab position.
    pub fn grab_selected(&mut self) {
        if let Some(card) = self.selected_card() {
            let key = card.key().to_string();
            self.grab_origin = self.board.position_of(&key);
            self.grabbed = Some(key);
            self.mode = AppMode::Moving;
        }
    }

    pub fn move_grabbed_lane(&mut self, direction: i8) {
        let Some(key) = self.grabbed.clone() else {
            return;
        };
        let Some((lane, _)) = self.board.position_of(&key) else {
            return;
        };
        let target = match (lane, direction) {
            (Lane::InProgress, -1) => Lane::Todo,
            (Lane::Done, -1) => Lane::InProgress,
            (Lane::Todo, 1) => Lane::InProgress,
            (Lane::InProgress, 1) => Lane::Done,
            _ => return,
        };
        self.board.move_card(&key, target, None);
        self.focus = target;
        self.select_grabbed();
    }

    pub fn move_grabbed_within(&mut self, direction: i8) {
        let Some(key) = self.grabbed.clone() else {
            return;
        };
        let Some((lane, index)) = self.board.position_of(&key) else {
            return;
        };
        let target = if direction < 0 {
            index.saturating_sub(1)
        } else {
            index + 1
        };
        self.board.move_card(&key, lane, Some(target));
        self.select_grabbed();
    }

    /// Drop at the current position and persist the new layout.
    pub async fn drop_grabbed(&mut self) {
        if self.grabbed.take().is_some() {
            self.grab_origin = None;
            self.mode = AppMode::Normal;
            self.store.save(self.board.layout()).await;
        }
    }

    /// Abort the move, returning the card to where it was grabbed.
    pub fn cancel_grab(&mut self) {
        if let (Some(key), Some((lane, index))) = (self.grabbed.take(), self.grab_origin.take()) {
            self.board.move_card(&key, lane, Some(index));
            self.focus = lane;
        }
        self.mode = AppMode::Normal;
        self.clamp_selections();
    }

    fn select_grabbed(&mut self) {
        let Some(key) = self.grabbed.as_deref() else {
            return;
        };
        if let Some(index) = self
            .visible_in_lane(self.focus)
            .iter()
            .position(|card| card.key() == key)
        {
            self.selected.insert(self.focus, index);
        }
    }

    pub fn cycle_status_filter(&mut self) {
        self.filters.status = match self.filters.status {
            StatusFilter::All => StatusFilter::Family(Lane::Todo),
            StatusFilter::Family(Lane::Todo) => StatusFilter::Family(Lane::InProgress),
            StatusFilter::Family(Lane::InProgress) => StatusFilter::Family(Lane::Done),
            StatusFilter::Family(Lane::Done) => StatusFilter::All,
        };
        self.clamp_selections();
    }

    pub fn cycle_sprint_filter(&mut self) {
        let names: Vec<String> = self.plan.names().map(str::to_string).collect();
        self.filters.sprint = match &self.filters.sprint {
            SprintFilter::All => match names.first() {
                Some(first) => SprintFilter::Bucket(first.clone()),
                None => SprintFilter::All,
            },
            SprintFilter::Bucket(current) => {
                let next = names
                    .iter()
                    .position(|name| name == current)
                    .map(|index| index + 1);
                match next.and_then(|index| names.get(index)) {
                    Some(name) => SprintFilter::Bucket(name.clone()),
                    None => SprintFilter::All,
                }
            }
        };
        self.clamp_selections();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.filters.priority = match &self.filters.priority {
            PriorityFilter::All => PriorityFilter::Contains("high".to_string()),
            PriorityFilter::Contains(current) => match current.as_str() {
                "high" => PriorityFilter::Contains("medium".to_string()),
                "medium" => PriorityFilter::Contains("low".to_string()),
                _ => PriorityFilter::All,
            },
        };
        self.clamp_selections();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterSet::default();
        self.clamp_selections();
    }

    /// Drop the persisted layout and rebuild from the tracker snapshot.
    pub async fn reset(&mut self) {
        self.store.clear().await;
        self.request_reload();
    }

    pub async fn export_board(&mut self) {
        let page = export::board_page(&self.board, &self.cards);
        match tokio::fs::write(&self.export_path, page).await {
            Ok(()) => {
                self.banner = Some(Banner::success(format!(
                    "Exported board to {}",
                    self.export_path.display()
                )));
            }
            Err(e) => {
                self.banner = Some(Banner::error(format!("Export failed: {e}")));
            }
        }
    }
}

/// Non-cached read of the snapshot file, decoded off the UI loop.
pub async fn load_snapshot(path: &Path) -> Result<Snapshot, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("invalid snapshot: {e}"))
}

fn spawn_snapshot_load(path: PathBuf, tx: tokio::sync::mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let result = load_snapshot(&path).await;
        let _ = tx.send(Event::SnapshotLoaded(result));
    });
}
