//! Aggregates overview, quote, price history and news for one symbol

use crate::core::market::{CompanyOverview, DailyBar, MarketDataProvider, NewsArticle, Quote};
use tracing::{debug, error, info, instrument};

pub const NOT_FOUND_MESSAGE: &str = "Stock data not found";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";
pub const FOOTER_LINES: [&str; 2] = [
    "© 2024 Stock Price Checker. All rights reserved.",
    "Developed by- Priyanshu Sutar",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub history_days: usize,
    pub news_limit: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        DashboardLimits {
            history_days: 30,
            news_limit: 5,
        }
    }
}

/// One step of progress while a dashboard loads.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    Started(String),
    Overview(CompanyOverview),
    Quote(Quote),
    History(Vec<DailyBar>),
    News(Vec<NewsArticle>),
    Error(String),
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub symbol: Option<String>,
    pub overview: Option<CompanyOverview>,
    pub quote: Option<Quote>,
    pub history: Option<Vec<DailyBar>>,
    pub news: Option<Vec<NewsArticle>>,
    pub error: Option<String>,
    pub loading: bool,
}

impl Dashboard {
    pub fn apply(&mut self, update: DashboardUpdate) {
        match update {
            DashboardUpdate::Started(symbol) => {
                *self = Dashboard {
                    symbol: Some(symbol),
                    loading: true,
                    ..Dashboard::default()
                };
            }
            DashboardUpdate::Overview(overview) => self.overview = Some(overview),
            DashboardUpdate::Quote(quote) => self.quote = Some(quote),
            DashboardUpdate::History(history) => self.history = Some(history),
            DashboardUpdate::News(news) => self.news = Some(news),
            DashboardUpdate::Error(message) => self.error = Some(message),
            DashboardUpdate::Finished => self.loading = false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_none()
            && self.quote.is_none()
            && self.history.is_none()
            && self.news.is_none()
    }
}

/// Runs the fetch sequence for `symbol`, reporting each filled slot through `emit`.
///
/// The overview is optional. A missing quote ends the sequence with
/// [`NOT_FOUND_MESSAGE`]; any provider error ends it with
/// [`FETCH_ERROR_MESSAGE`], keeping whatever was already emitted.
#[instrument(skip(provider, limits, emit), fields(symbol = %symbol))]
pub async fn fetch_dashboard<F>(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    limits: &DashboardLimits,
    mut emit: F,
) where
    F: FnMut(DashboardUpdate) + Send,
{
    let symbol = symbol.trim();
    if symbol.is_empty() {
        debug!("No symbol selected, skipping fetch");
        return;
    }

    info!("Fetching dashboard data");
    emit(DashboardUpdate::Started(symbol.to_string()));

    if let Err(e) = fetch_steps(provider, symbol, limits, &mut emit).await {
        error!(error = %e, "Error fetching data");
        emit(DashboardUpdate::Error(FETCH_ERROR_MESSAGE.to_string()));
    }

    emit(DashboardUpdate::Finished);
}

async fn fetch_steps<F>(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    limits: &DashboardLimits,
    emit: &mut F,
) -> anyhow::Result<()>
where
    F: FnMut(DashboardUpdate) + Send,
{
    if let Some(overview) = provider.fetch_overview(symbol).await? {
        emit(DashboardUpdate::Overview(overview));
    }

    let Some(quote) = provider.fetch_quote(symbol).await? else {
        emit(DashboardUpdate::Error(NOT_FOUND_MESSAGE.to_string()));
        return Ok(());
    };
    emit(DashboardUpdate::Quote(quote));

    if let Some(series) = provider.fetch_daily_series(symbol).await? {
        emit(DashboardUpdate::History(recent_history(
            series,
            limits.history_days,
        )));
    }

    if let Some(mut feed) = provider.fetch_news(symbol).await? {
        feed.truncate(limits.news_limit);
        emit(DashboardUpdate::News(feed));
    }

    Ok(())
}

/// Keeps the last `days` bars of an oldest-first series.
pub fn recent_history(mut series: Vec<DailyBar>, days: usize) -> Vec<DailyBar> {
    let skip = series.len().saturating_sub(days);
    series.drain(..skip);
    series
}

/// Fetches and folds the whole sequence into one [`Dashboard`].
pub async fn load_dashboard(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    limits: &DashboardLimits,
) -> Dashboard {
    let mut dashboard = Dashboard::default();
    fetch_dashboard(provider, symbol, limits, |update| dashboard.apply(update)).await;
    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::SymbolMatch;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockMarket {
        overview: bool,
        quote: bool,
        fail_on: Option<&'static str>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockMarket {
        fn record(&self, call: &'static str) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(call) {
                return Err(anyhow!("{call} failed"));
            }
            Ok(())
        }
    }

    fn bar(day: u32, close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockMarket {
        async fn search_symbols(&self, _: &str) -> Result<Vec<SymbolMatch>> {
            Ok(Vec::new())
        }

        async fn fetch_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
            self.record("overview")?;
            Ok(self.overview.then(|| CompanyOverview {
                symbol: symbol.to_string(),
                name: "International Business Machines".to_string(),
                description: None,
                exchange: None,
                currency: None,
                sector: Some("TECHNOLOGY".to_string()),
                industry: None,
                market_capitalization: Some(1.0e11),
                pe_ratio: None,
                dividend_yield: None,
                week_52_high: None,
                week_52_low: None,
            }))
        }

        async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
            self.record("quote")?;
            Ok(self.quote.then(|| Quote {
                symbol: symbol.to_string(),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                price: 10.5,
                volume: 1000,
                latest_trading_day: "2024-03-31".to_string(),
                previous_close: 10.0,
                change: 0.5,
                change_percent: "5.0000%".to_string(),
            }))
        }

        async fn fetch_daily_series(&self, _: &str) -> Result<Option<Vec<DailyBar>>> {
            self.record("history")?;
            Ok(Some((1..=31).map(|d| bar(d, d as f64)).collect()))
        }

        async fn fetch_news(&self, _: &str) -> Result<Option<Vec<NewsArticle>>> {
            self.record("news")?;
            Ok(Some(
                (0..8)
                    .map(|i| NewsArticle {
                        title: format!("headline {i}"),
                        url: format!("https://example.com/{i}"),
                        source: None,
                        time_published: None,
                        summary: None,
                        sentiment_label: None,
                        sentiment_score: None,
                    })
                    .collect(),
            ))
        }
    }

    #[tokio::test]
    async fn test_full_sequence() {
        let market = MockMarket {
            overview: true,
            quote: true,
            ..Default::default()
        };

        let dashboard = load_dashboard(&market, "IBM", &DashboardLimits::default()).await;

        assert_eq!(
            *market.calls.lock().unwrap(),
            vec!["overview", "quote", "history", "news"]
        );
        assert_eq!(dashboard.symbol.as_deref(), Some("IBM"));
        assert!(dashboard.overview.is_some());
        assert_eq!(dashboard.quote.as_ref().unwrap().price, 10.5);

        let history = dashboard.history.unwrap();
        assert_eq!(history.len(), 30);
        assert_eq!(history.first().unwrap().close, 2.0);
        assert_eq!(history.last().unwrap().close, 31.0);

        assert_eq!(dashboard.news.unwrap().len(), 5);
        assert!(dashboard.error.is_none());
        assert!(!dashboard.loading);
    }

    #[tokio::test]
    async fn test_missing_quote_stops_sequence() {
        let market = MockMarket {
            overview: true,
            quote: false,
            ..Default::default()
        };

        let dashboard = load_dashboard(&market, "NOPE", &DashboardLimits::default()).await;

        assert_eq!(*market.calls.lock().unwrap(), vec!["overview", "quote"]);
        assert!(dashboard.overview.is_some());
        assert!(dashboard.quote.is_none());
        assert!(dashboard.history.is_none());
        assert_eq!(dashboard.error.as_deref(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_provider_error_keeps_filled_slots() {
        let market = MockMarket {
            overview: true,
            quote: true,
            fail_on: Some("history"),
            ..Default::default()
        };

        let dashboard = load_dashboard(&market, "IBM", &DashboardLimits::default()).await;

        assert_eq!(
            *market.calls.lock().unwrap(),
            vec!["overview", "quote", "history"]
        );
        assert!(dashboard.overview.is_some());
        assert!(dashboard.quote.is_some());
        assert!(dashboard.history.is_none());
        assert!(dashboard.news.is_none());
        assert_eq!(dashboard.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert!(!dashboard.loading);
    }

    #[tokio::test]
    async fn test_empty_symbol_is_noop() {
        let market = MockMarket::default();
        let mut updates = Vec::new();

        fetch_dashboard(&market, "  ", &DashboardLimits::default(), |u| updates.push(u)).await;

        assert!(updates.is_empty());
        assert!(market.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_updates_arrive_in_order() {
        let market = MockMarket {
            overview: false,
            quote: true,
            ..Default::default()
        };
        let mut kinds = Vec::new();

        fetch_dashboard(&market, "IBM", &DashboardLimits::default(), |u| {
            kinds.push(match u {
                DashboardUpdate::Started(_) => "started",
                DashboardUpdate::Overview(_) => "overview",
                DashboardUpdate::Quote(_) => "quote",
                DashboardUpdate::History(_) => "history",
                DashboardUpdate::News(_) => "news",
                DashboardUpdate::Error(_) => "error",
                DashboardUpdate::Finished => "finished",
            })
        })
        .await;

        assert_eq!(kinds, vec!["started", "quote", "history", "news", "finished"]);
    }

    #[test]
    fn test_started_resets_previous_state() {
        let mut dashboard = Dashboard {
            symbol: Some("OLD".to_string()),
            error: Some(NOT_FOUND_MESSAGE.to_string()),
            history: Some(vec![bar(1, 1.0)]),
            ..Default::default()
        };

        dashboard.apply(DashboardUpdate::Started("IBM".to_string()));

        assert_eq!(dashboard.symbol.as_deref(), Some("IBM"));
        assert!(dashboard.error.is_none());
        assert!(dashboard.is_empty());
        assert!(dashboard.loading);
    }

    #[test]
    fn test_recent_history_shorter_than_window() {
        let history = recent_history(vec![bar(1, 1.0), bar(2, 2.0)], 30);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].close, 1.0);
    }
}
