//! Interactive dashboard state and input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::debug;

use super::animation::{Animations, Entrance};
use crate::core::chart::ChartSeries;
use crate::core::dashboard::{Dashboard, DashboardUpdate};
use crate::core::market::SymbolMatch;
use crate::core::search::Autocomplete;
use crate::core::theme::Theme;

/// Results reported back by background tasks, tagged with the generation they were started for.
#[derive(Debug)]
pub enum Message {
    SearchResults {
        generation: u64,
        result: Result<Vec<SymbolMatch>, String>,
    },
    Dashboard {
        generation: u64,
        update: DashboardUpdate,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Search { generation: u64, query: String },
    Fetch { generation: u64, symbol: String },
}

pub struct App {
    pub input: String,
    pub autocomplete: Autocomplete,
    pub selected: Option<usize>,
    pub theme: Theme,
    pub dashboard: Dashboard,
    pub chart: Option<ChartSeries>,
    pub searching: bool,
    pub animations: Animations,
    search_generation: u64,
    fetch_generation: u64,
}

impl App {
    pub fn new(theme: Theme, search_min_length: usize, now: Instant) -> Self {
        App {
            input: String::new(),
            autocomplete: Autocomplete::new(search_min_length),
            selected: None,
            theme,
            dashboard: Dashboard::default(),
            chart: None,
            searching: false,
            animations: Animations::new(now),
            search_generation: 0,
            fetch_generation: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.searching || self.dashboard.loading
    }

    /// Whether the screen changes on its own (spinner or entrance animation).
    pub fn is_animating(&self, now: Instant) -> bool {
        self.is_loading() || self.animations.is_running(now)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('t') if ctrl => {
                self.toggle_theme();
                Action::None
            }
            KeyCode::Enter => self.begin_fetch(),
            KeyCode::Up => {
                self.move_selection(-1);
                Action::None
            }
            KeyCode::Down => {
                self.move_selection(1);
                Action::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.begin_search()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                self.begin_search()
            }
            _ => Action::None,
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.rebuild_chart();
    }

    fn rebuild_chart(&mut self) {
        self.chart = self
            .dashboard
            .history
            .as_deref()
            .map(|history| ChartSeries::new(history, self.theme));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.autocomplete.options().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).rem_euclid(len as isize) as usize);
    }

    /// Invalidates any in-flight search; short input just clears the options.
    fn begin_search(&mut self) -> Action {
        self.search_generation += 1;
        // Options on screen belong to the previous text until new results land.
        self.selected = None;
        let Some(query) = self.autocomplete.prepare_query(&self.input) else {
            self.searching = false;
            return Action::None;
        };
        self.searching = true;
        Action::Search {
            generation: self.search_generation,
            query,
        }
    }

    /// The highlighted option, or the typed text when no options are shown.
    fn chosen_symbol(&self) -> Option<String> {
        let from_options = self
            .selected
            .and_then(|i| self.autocomplete.select(i))
            .map(str::to_string);
        let typed = self.input.trim();
        from_options.or_else(|| (!typed.is_empty()).then(|| typed.to_uppercase()))
    }

    fn begin_fetch(&mut self) -> Action {
        let Some(symbol) = self.chosen_symbol() else {
            return Action::None;
        };
        // Close the popup and drop any pending search.
        self.search_generation += 1;
        self.searching = false;
        self.autocomplete.clear();
        self.selected = None;

        self.fetch_generation += 1;
        Action::Fetch {
            generation: self.fetch_generation,
            symbol,
        }
    }

    pub fn handle_message(&mut self, message: Message, now: Instant) {
        match message {
            Message::SearchResults { generation, result } => {
                if generation != self.search_generation {
                    debug!(generation, "Dropping stale search results");
                    return;
                }
                self.searching = false;
                if self.autocomplete.apply_result(result).is_ok() {
                    self.selected = (!self.autocomplete.options().is_empty()).then_some(0);
                }
            }
            Message::Dashboard { generation, update } => {
                if generation != self.fetch_generation {
                    debug!(generation, "Dropping stale dashboard update");
                    return;
                }
                let entrance = Some(Entrance::new(now));
                match &update {
                    DashboardUpdate::Quote(_) => self.animations.stock = entrance,
                    DashboardUpdate::History(_) => self.animations.history = entrance,
                    DashboardUpdate::News(_) => self.animations.news = entrance,
                    _ => {}
                }
                let history_changed = matches!(
                    update,
                    DashboardUpdate::History(_) | DashboardUpdate::Started(_)
                );
                self.dashboard.apply(update);
                if history_changed {
                    self.rebuild_chart();
                }
            }
        }
    }
}
