//! Core business logic abstractions

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod log;
pub mod market;
pub mod search;
pub mod theme;

// Re-export main types for cleaner imports
pub use dashboard::{Dashboard, DashboardLimits, DashboardUpdate};
pub use market::{CompanyOverview, DailyBar, MarketDataProvider, NewsArticle, Quote, SymbolMatch};
pub use theme::Theme;
