//! Market data abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One autocomplete candidate returned by a symbol search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub kind: Option<String>,
    pub region: Option<String>,
    pub currency: Option<String>,
    pub match_score: Option<f64>,
}

impl SymbolMatch {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "▲",
                Direction::Down => "▼",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: u64,
    pub latest_trading_day: String,
    pub previous_close: f64,
    pub change: f64,
    /// Kept verbatim, e.g. `"-0.4523%"`.
    pub change_percent: String,
}

impl Quote {
    pub fn direction(&self) -> Direction {
        if self.change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_capitalization: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Fraction, 0.0065 means 0.65%.
    pub dividend_yield: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub time_published: Option<String>,
    pub summary: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
}

/// Source of everything the dashboard displays.
///
/// `Ok(None)` means the service answered but had nothing for the symbol;
/// `Err` is reserved for transport and decoding failures.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>>;

    async fn fetch_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>>;

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>>;

    /// Full daily series, oldest first.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Option<Vec<DailyBar>>>;

    async fn fetch_news(&self, symbol: &str) -> Result<Option<Vec<NewsArticle>>>;
}
