//! Interactive terminal dashboard

pub mod animation;
pub mod app;
pub mod chart;
pub mod view;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use crate::core::dashboard::{DashboardLimits, fetch_dashboard};
use crate::core::market::MarketDataProvider;
use crate::core::theme::Theme;
use app::{Action, App, Message};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub async fn run(
    provider: Arc<dyn MarketDataProvider>,
    theme: Theme,
    search_min_length: usize,
    limits: DashboardLimits,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(theme, search_min_length, Instant::now());
    let result = run_app(&mut terminal, app, provider, limits).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    provider: Arc<dyn MarketDataProvider>,
    limits: DashboardLimits,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut dirty = true;

    loop {
        let now = Instant::now();
        if dirty || app.is_animating(now) {
            terminal.draw(|frame| view::draw(frame, &app, now))?;
            dirty = false;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            Some(message) = rx.recv() => {
                app.handle_message(message, Instant::now());
                dirty = true;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    dirty = true;
                    match app.handle_key(key) {
                        Action::Quit => return Ok(()),
                        Action::Search { generation, query } => {
                            spawn_search(Arc::clone(&provider), tx.clone(), generation, query);
                        }
                        Action::Fetch { generation, symbol } => {
                            spawn_fetch(Arc::clone(&provider), tx.clone(), generation, symbol, limits);
                        }
                        Action::None => {}
                    }
                }
                // Resizes and the like.
                Some(Ok(_)) => dirty = true,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

fn spawn_search(
    provider: Arc<dyn MarketDataProvider>,
    tx: UnboundedSender<Message>,
    generation: u64,
    query: String,
) {
    tokio::spawn(async move {
        let result = provider
            .search_symbols(&query)
            .await
            .map_err(|e| e.to_string());
        if tx.send(Message::SearchResults { generation, result }).is_err() {
            debug!("Dashboard closed before search finished");
        }
    });
}

fn spawn_fetch(
    provider: Arc<dyn MarketDataProvider>,
    tx: UnboundedSender<Message>,
    generation: u64,
    symbol: String,
    limits: DashboardLimits,
) {
    tokio::spawn(async move {
        fetch_dashboard(provider.as_ref(), &symbol, &limits, |update| {
            // The receiver only goes away when the dashboard exits.
            let _ = tx.send(Message::Dashboard { generation, update });
        })
        .await;
    });
}
