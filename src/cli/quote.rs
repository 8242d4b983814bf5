use super::ui;
use crate::core::chart::ChartSeries;
use crate::core::dashboard::{self, Dashboard, DashboardLimits, FOOTER_LINES};
use crate::core::format;
use crate::core::market::{CompanyOverview, MarketDataProvider, NewsArticle, Quote};
use crate::core::theme::{Palette, Theme};
use crate::tui::chart::render_to_text;
use anyhow::Result;
use comfy_table::{Attribute, Cell};

const CHART_HEIGHT: u16 = 18;

fn overview_card(info: &CompanyOverview, palette: &Palette) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Company Overview", palette), Cell::new("")]);

    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    table.add_row(ui::field_row("Name", info.name.as_str()));
    table.add_row(ui::field_row("Sector", text(&info.sector)));
    table.add_row(ui::field_row("Industry", text(&info.industry)));
    table.add_row(ui::field_row(
        "Market Cap",
        format::optional(info.market_capitalization, |v| format!("${}", format::thousands(v))),
    ));
    table.add_row(ui::field_row(
        "PE Ratio",
        format::optional(info.pe_ratio, |v| format!("{v:.2}")),
    ));
    table.add_row(ui::field_row(
        "Dividend Yield",
        format::optional(info.dividend_yield, format::percent),
    ));
    table.add_row(ui::field_row(
        "52 Week High",
        format::optional(info.week_52_high, format::currency),
    ));
    table.add_row(ui::field_row(
        "52 Week Low",
        format::optional(info.week_52_low, format::currency),
    ));

    let mut output = table.to_string();
    if let Some(description) = &info.description {
        output.push_str(&format!("\n{description}"));
    }
    output
}

fn quote_card(quote: &Quote, palette: &Palette) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&quote.symbol, palette).add_attribute(Attribute::Underlined),
        Cell::new(format!("Price: {}", format::currency(quote.price)))
            .add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Change").add_attribute(Attribute::Bold),
        ui::change_cell(
            quote.direction(),
            &format!("{:.4} ({})", quote.change, quote.change_percent),
            palette,
        ),
    ]);
    table.add_row(ui::field_row("Open", format::currency(quote.open)));
    table.add_row(ui::field_row("High", format::currency(quote.high)));
    table.add_row(ui::field_row("Low", format::currency(quote.low)));
    table.add_row(ui::field_row("Volume", format::thousands_u64(quote.volume)));
    table.add_row(ui::field_row(
        "Latest Trading Day",
        quote.latest_trading_day.as_str(),
    ));
    table.add_row(ui::field_row(
        "Previous Close",
        format::currency(quote.previous_close),
    ));

    table.to_string()
}

fn history_card(series: &ChartSeries, palette: &Palette, width: u16) -> String {
    let mut table = ui::new_card("30-Day Price History", palette);
    table.add_row(vec![Cell::new(render_to_text(
        series,
        palette,
        width,
        CHART_HEIGHT,
    ))]);
    table.to_string()
}

fn news_card(news: &[NewsArticle], palette: &Palette) -> String {
    let mut table = ui::new_card("Related News", palette);
    if news.is_empty() {
        table.add_row(vec![ui::na_cell()]);
    }
    for article in news {
        let mut meta = Vec::new();
        if let Some(source) = &article.source {
            meta.push(source.clone());
        }
        if let Some(label) = &article.sentiment_label {
            meta.push(label.clone());
        }
        let mut text = article.title.clone();
        if !meta.is_empty() {
            text.push_str(&format!("\n{}", meta.join(" · ")));
        }
        text.push_str(&format!("\n{}", article.url));
        table.add_row(vec![Cell::new(text)]);
    }
    table.to_string()
}

/// Lays the dashboard out top to bottom: overview, quote, chart, news, error, footer.
pub fn display_dashboard(dashboard: &Dashboard, theme: Theme, width: usize) -> String {
    let palette = theme.palette();
    let mut sections = Vec::new();

    if let Some(info) = &dashboard.overview {
        sections.push(overview_card(info, &palette));
    }
    if let Some(quote) = &dashboard.quote {
        sections.push(quote_card(quote, &palette));
    }
    if let Some(history) = &dashboard.history {
        let series = ChartSeries::new(history, theme);
        let chart_width = width.saturating_sub(4).clamp(40, 160) as u16;
        sections.push(history_card(&series, &palette, chart_width));
    }
    if let Some(news) = &dashboard.news {
        sections.push(news_card(news, &palette));
    }
    if let Some(error) = &dashboard.error {
        sections.push(ui::style_text(error, ui::StyleType::Error));
    }

    let footer: Vec<String> = FOOTER_LINES
        .iter()
        .map(|line| ui::style_text(line, ui::StyleType::Subtle))
        .collect();
    sections.push(format!(
        "{}\n{}",
        ui::separator(width.min(100)),
        footer.join("\n")
    ));
    sections.join("\n\n")
}

pub async fn run(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    limits: &DashboardLimits,
    theme: Theme,
) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        anyhow::bail!("No symbol given");
    }

    let pb = ui::new_spinner(&format!("Fetching {symbol}..."));
    let result = dashboard::load_dashboard(provider, &symbol, limits).await;
    pb.finish_and_clear();

    println!(
        "{}\n",
        ui::style_text(&format!("Stock-Lab: {symbol}"), ui::StyleType::Title)
    );
    println!("{}", display_dashboard(&result, theme, ui::terminal_width()));

    match result.error {
        Some(error) => Err(anyhow::anyhow!("{}: {}", symbol, error)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::NOT_FOUND_MESSAGE;
    use crate::core::market::DailyBar;
    use chrono::NaiveDate;

    fn sample_dashboard() -> Dashboard {
        Dashboard {
            symbol: Some("IBM".to_string()),
            overview: Some(CompanyOverview {
                symbol: "IBM".to_string(),
                name: "International Business Machines".to_string(),
                description: Some("Makes computers.".to_string()),
                exchange: Some("NYSE".to_string()),
                currency: Some("USD".to_string()),
                sector: Some("TECHNOLOGY".to_string()),
                industry: None,
                market_capitalization: Some(152_417_534_000.0),
                pe_ratio: Some(18.76),
                dividend_yield: Some(0.0402),
                week_52_high: Some(199.18),
                week_52_low: Some(120.55),
            }),
            quote: Some(Quote {
                symbol: "IBM".to_string(),
                open: 167.5,
                high: 168.22,
                low: 165.88,
                price: 166.2,
                volume: 3_524_891,
                latest_trading_day: "2024-05-03".to_string(),
                previous_close: 166.92,
                change: -0.72,
                change_percent: "-0.4313%".to_string(),
            }),
            history: Some(
                (1..=5)
                    .map(|d| DailyBar {
                        date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
                        open: 0.0,
                        high: 0.0,
                        low: 0.0,
                        close: 160.0 + d as f64,
                        volume: 0,
                    })
                    .collect(),
            ),
            news: Some(vec![NewsArticle {
                title: "IBM beats estimates".to_string(),
                url: "https://example.com/ibm".to_string(),
                source: Some("Example Wire".to_string()),
                time_published: None,
                summary: None,
                sentiment_label: Some("Bullish".to_string()),
                sentiment_score: Some(0.4),
            }]),
            error: None,
            loading: false,
        }
    }

    #[test]
    fn test_display_full_dashboard() {
        let output = display_dashboard(&sample_dashboard(), Theme::Light, 100);

        assert!(output.contains("Company Overview"));
        assert!(output.contains("$152,417,534,000"));
        assert!(output.contains("4.02%"));
        assert!(output.contains("$199.18"));
        assert!(output.contains("Makes computers."));

        assert!(output.contains("Price: $166.20"));
        assert!(output.contains("▼ -0.7200 (-0.4313%)"));
        assert!(output.contains("3,524,891"));
        assert!(output.contains("2024-05-03"));

        assert!(output.contains("30-Day Price History"));
        assert!(output.contains("Related News"));
        assert!(output.contains("IBM beats estimates"));
        assert!(output.contains("Example Wire · Bullish"));
        assert!(output.contains("All rights reserved."));
        assert!(output.contains("Developed by- Priyanshu Sutar"));
        assert!(output.contains(&"─".repeat(100)));
    }

    #[test]
    fn test_display_error_only() {
        let dashboard = Dashboard {
            symbol: Some("NOPE".to_string()),
            error: Some(NOT_FOUND_MESSAGE.to_string()),
            ..Default::default()
        };

        let output = display_dashboard(&dashboard, Theme::Dark, 80);
        assert!(output.contains(NOT_FOUND_MESSAGE));
        assert!(!output.contains("Company Overview"));
        assert!(!output.contains("30-Day Price History"));
        for line in FOOTER_LINES {
            assert!(output.contains(line));
        }
    }
}
