use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use crate::core::market::{
    CompanyOverview, DailyBar, MarketDataProvider, NewsArticle, Quote, SymbolMatch,
};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Parses the numeric strings Alpha Vantage uses, treating its placeholders as missing.
fn parse_number(value: Option<&str>) -> Option<f64> {
    match value.map(str::trim) {
        None | Some("") | Some("None") | Some("-") => None,
        Some(v) => v.trim_end_matches('%').parse().ok(),
    }
}

fn required_number(field: &str, value: Option<&str>) -> Result<f64> {
    parse_number(value).ok_or_else(|| anyhow!("Invalid value for {}: {:?}", field, value))
}

/// Text fields where `"None"` means absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "None" && v != "-")
}

/// Error text Alpha Vantage embeds in a 200 response instead of the payload.
#[derive(Deserialize, Debug, Default)]
struct ApiNotice {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl ApiNotice {
    fn message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }

    fn log(&self, function: &str, subject: &str) {
        if let Some(message) = self.message() {
            warn!(%function, %subject, "Alpha Vantage notice: {}", message);
        }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<RawMatch>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct RawMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
    #[serde(rename = "3. type")]
    kind: Option<String>,
    #[serde(rename = "4. region")]
    region: Option<String>,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
    #[serde(rename = "9. matchScore")]
    match_score: Option<String>,
}

impl From<RawMatch> for SymbolMatch {
    fn from(raw: RawMatch) -> Self {
        SymbolMatch {
            match_score: parse_number(raw.match_score.as_deref()),
            symbol: raw.symbol,
            name: raw.name,
            kind: raw.kind,
            region: raw.region,
            currency: raw.currency,
        }
    }
}

#[derive(Deserialize, Debug)]
struct QuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<RawQuote>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct RawQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "02. open")]
    open: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

impl RawQuote {
    fn into_quote(self) -> Result<Option<Quote>> {
        // An unknown symbol comes back as an empty "Global Quote" object.
        let Some(symbol) = non_empty(self.symbol) else {
            return Ok(None);
        };
        let volume = self
            .volume
            .as_deref()
            .map(str::trim)
            .unwrap_or("0")
            .parse::<u64>()
            .with_context(|| format!("Invalid volume for {symbol}"))?;

        Ok(Some(Quote {
            open: required_number("open", self.open.as_deref())?,
            high: required_number("high", self.high.as_deref())?,
            low: required_number("low", self.low.as_deref())?,
            price: required_number("price", self.price.as_deref())?,
            volume,
            latest_trading_day: self.latest_trading_day.unwrap_or_default(),
            previous_close: required_number("previous close", self.previous_close.as_deref())?,
            change: required_number("change", self.change.as_deref())?,
            change_percent: self.change_percent.unwrap_or_default(),
            symbol,
        }))
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct RawOverview {
    symbol: Option<String>,
    name: Option<String>,
    description: Option<String>,
    exchange: Option<String>,
    currency: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    market_capitalization: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    dividend_yield: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,
    #[serde(flatten)]
    notice: ApiNotice,
}

impl RawOverview {
    fn into_overview(self) -> Option<CompanyOverview> {
        let symbol = non_empty(self.symbol)?;
        Some(CompanyOverview {
            name: non_empty(self.name).unwrap_or_else(|| symbol.clone()),
            description: non_empty(self.description),
            exchange: non_empty(self.exchange),
            currency: non_empty(self.currency),
            sector: non_empty(self.sector),
            industry: non_empty(self.industry),
            market_capitalization: parse_number(self.market_capitalization.as_deref()),
            pe_ratio: parse_number(self.pe_ratio.as_deref()),
            dividend_yield: parse_number(self.dividend_yield.as_deref()),
            week_52_high: parse_number(self.week_52_high.as_deref()),
            week_52_low: parse_number(self.week_52_low.as_deref()),
            symbol,
        })
    }
}

#[derive(Deserialize, Debug)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<NaiveDate, RawBar>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl RawBar {
    fn into_bar(self, date: NaiveDate) -> Result<DailyBar> {
        Ok(DailyBar {
            date,
            open: required_number("open", Some(&self.open))?,
            high: required_number("high", Some(&self.high))?,
            low: required_number("low", Some(&self.low))?,
            close: required_number("close", Some(&self.close))?,
            volume: self
                .volume
                .trim()
                .parse()
                .with_context(|| format!("Invalid volume on {date}"))?,
        })
    }
}

#[derive(Deserialize, Debug)]
struct NewsResponse {
    feed: Option<Vec<RawArticle>>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct RawArticle {
    title: String,
    url: String,
    source: Option<String>,
    time_published: Option<String>,
    summary: Option<String>,
    overall_sentiment_label: Option<String>,
    overall_sentiment_score: Option<f64>,
}

impl From<RawArticle> for NewsArticle {
    fn from(raw: RawArticle) -> Self {
        NewsArticle {
            title: raw.title,
            url: raw.url,
            source: non_empty(raw.source),
            time_published: raw.time_published,
            summary: non_empty(raw.summary),
            sentiment_label: non_empty(raw.overall_sentiment_label),
            sentiment_score: raw.overall_sentiment_score,
        }
    }
}

pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stocklab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(AlphaVantageProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    async fn query<T: DeserializeOwned>(&self, function: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/query", self.base_url);
        debug!(%function, ?params, "Requesting data from {}", url);

        let mut query = vec![("function", function)];
        query.extend_from_slice(params);
        query.push(("apikey", self.api_key.as_str()));

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            // The request URL carries the API key.
            .map_err(|e| anyhow!("Request error: {} for {}", e.without_url(), function))?;

        debug!(status = %response.status(), "Received Alpha Vantage response");

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {}",
                response.status(),
                function
            ));
        }

        let text = response.text().await.map_err(|e| {
            anyhow!(
                "Failed to read response body for {}: {}",
                function,
                e.without_url()
            )
        })?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", function, e))
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    #[instrument(name = "AlphaVantageSearch", skip(self), fields(keywords = %keywords))]
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>> {
        let data: SearchResponse = self
            .query("SYMBOL_SEARCH", &[("keywords", keywords)])
            .await?;

        match data.best_matches {
            Some(matches) => Ok(matches.into_iter().map(SymbolMatch::from).collect()),
            None => Err(anyhow!(
                "No search results for {}: {}",
                keywords,
                data.notice.message().unwrap_or("missing bestMatches")
            )),
        }
    }

    #[instrument(name = "AlphaVantageOverview", skip(self), fields(symbol = %symbol))]
    async fn fetch_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
        let data: RawOverview = self.query("OVERVIEW", &[("symbol", symbol)]).await?;
        data.notice.log("OVERVIEW", symbol);
        Ok(data.into_overview())
    }

    #[instrument(name = "AlphaVantageQuote", skip(self), fields(symbol = %symbol))]
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let data: QuoteResponse = self.query("GLOBAL_QUOTE", &[("symbol", symbol)]).await?;
        data.notice.log("GLOBAL_QUOTE", symbol);
        match data.global_quote {
            Some(raw) => raw.into_quote(),
            None => Ok(None),
        }
    }

    #[instrument(name = "AlphaVantageDaily", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Option<Vec<DailyBar>>> {
        let data: DailySeriesResponse = self
            .query("TIME_SERIES_DAILY", &[("symbol", symbol)])
            .await?;
        data.notice.log("TIME_SERIES_DAILY", symbol);

        let Some(series) = data.series else {
            return Ok(None);
        };
        let bars = series
            .into_iter()
            .map(|(date, raw)| raw.into_bar(date))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = bars.len(), "Parsed daily series");
        Ok(Some(bars))
    }

    #[instrument(name = "AlphaVantageNews", skip(self), fields(symbol = %symbol))]
    async fn fetch_news(&self, symbol: &str) -> Result<Option<Vec<NewsArticle>>> {
        let data: NewsResponse = self
            .query("NEWS_SENTIMENT", &[("tickers", symbol)])
            .await?;
        data.notice.log("NEWS_SENTIMENT", symbol);
        Ok(data
            .feed
            .map(|feed| feed.into_iter().map(NewsArticle::from).collect()))
    }
}
