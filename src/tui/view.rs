use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::Instant;

use super::animation::Entrance;
use super::app::App;
use super::chart::{color, price_chart};
use crate::core::dashboard::FOOTER_LINES;
use crate::core::format;
use crate::core::market::{CompanyOverview, Direction as Trend, NewsArticle, Quote};
use crate::core::theme::Palette;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MAX_OPTIONS: u16 = 8;

/// Moves `area` down by the entrance offset, clipping what falls off the bottom.
fn entering(area: Rect, entrance: Option<Entrance>, now: Instant) -> (Rect, bool) {
    let Some(entrance) = entrance else {
        return (area, false);
    };
    let offset = entrance.offset(now).min(area.height);
    let shifted = Rect {
        y: area.y + offset,
        height: area.height - offset,
        ..area
    };
    (shifted, entrance.is_dimmed(now))
}

fn card<'a>(title: &'a str, palette: &Palette, dimmed: bool) -> Block<'a> {
    let mut style = Style::default()
        .fg(color(palette.text))
        .bg(color(palette.surface));
    if dimmed {
        style = style.add_modifier(Modifier::DIM);
    }
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.primary)))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(color(palette.primary))
                .add_modifier(Modifier::BOLD),
        ))
        .style(style)
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
    ])
}

pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(
            Style::default()
                .fg(color(palette.text))
                .bg(color(palette.background)),
        ),
        frame.area(),
    );

    let (area, _) = entering(frame.area(), Some(app.animations.container), now);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search
            Constraint::Length(1), // Loading
            Constraint::Min(6),    // Cards
            Constraint::Length(1), // Error
            Constraint::Length(2), // Footer
        ])
        .split(area);

    draw_title(frame, chunks[0], app, &palette);
    draw_search(frame, chunks[1], app, &palette);
    draw_status(frame, chunks[2], app, &palette, now);
    draw_body(frame, chunks[3], app, &palette, now);
    draw_error(frame, chunks[4], app, &palette);
    draw_footer(frame, chunks[5], &palette);

    // Popup goes last so it sits on top of the cards.
    draw_options(frame, chunks[1], area, app, &palette);
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Stock-Lab",
        Style::default()
            .fg(color(palette.primary))
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, halves[0]);

    let (switch, switch_color) = if app.theme.is_dark() {
        ("[●  ON]", palette.primary)
    } else {
        ("[OFF  ○]", palette.text_secondary)
    };
    let toggle = Paragraph::new(Line::from(vec![
        Span::raw("Dark Mode "),
        Span::styled(switch, Style::default().fg(color(switch_color))),
        Span::styled(
            "  Ctrl-t",
            Style::default().fg(color(palette.text_secondary)),
        ),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(toggle, halves[1]);
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let input = Paragraph::new(app.input.as_str()).block(card(
        "Search company or symbol",
        palette,
        false,
    ));
    frame.render_widget(input, area);

    let cursor_x = area.x + 1 + app.input.chars().count() as u16;
    if cursor_x < area.right().saturating_sub(1) {
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, now: Instant) {
    if !app.is_loading() {
        return;
    }
    let elapsed = now.saturating_duration_since(app.animations.container.started());
    let frame_index = (elapsed.as_millis() / 100) as usize % SPINNER.len();
    let what = if app.dashboard.loading {
        "Fetching stock data..."
    } else {
        "Searching..."
    };
    let status = Paragraph::new(Line::from(vec![
        Span::styled(SPINNER[frame_index], Style::default().fg(color(palette.primary))),
        Span::raw(" "),
        Span::styled(what, Style::default().fg(color(palette.text_secondary))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(status, area);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, now: Instant) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let dashboard = &app.dashboard;
    if dashboard.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from("Type a company name or ticker to search."),
            Line::from("Up/Down to pick a match, Enter to load it, Esc to quit."),
        ])
        .style(Style::default().fg(color(palette.text_secondary)))
        .alignment(Alignment::Center);
        frame.render_widget(hint, columns[0]);
        return;
    }

    let (left, dimmed) = entering(columns[0], app.animations.stock, now);
    let mut constraints = Vec::new();
    if dashboard.overview.is_some() {
        constraints.push(Constraint::Length(12));
    }
    if dashboard.quote.is_some() {
        constraints.push(Constraint::Length(11));
    }
    if app.chart.is_some() {
        constraints.push(Constraint::Min(8));
    }
    constraints.push(Constraint::Length(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(left);

    // Rows were pushed in this same order, one per present card.
    let mut slot = rows.iter().copied();
    if let Some(info) = &dashboard.overview
        && let Some(rect) = slot.next()
    {
        draw_overview(frame, rect, info, palette, dimmed);
    }
    if let Some(quote) = &dashboard.quote
        && let Some(rect) = slot.next()
    {
        draw_quote(frame, rect, quote, palette, dimmed);
    }
    if let Some(series) = &app.chart
        && let Some(rect) = slot.next()
    {
        let (rect, chart_dimmed) = entering(rect, app.animations.history, now);
        let block = card("30-Day Price History", palette, dimmed || chart_dimmed);
        if series.is_empty() {
            frame.render_widget(Paragraph::new("No price history available").block(block), rect);
        } else {
            frame.render_widget(price_chart(series, palette).block(block), rect);
        }
    }

    if let Some(news) = &dashboard.news {
        let (right, news_dimmed) = entering(columns[1], app.animations.news, now);
        draw_news(frame, right, news, palette, news_dimmed);
    }
}

fn draw_overview(
    frame: &mut Frame,
    area: Rect,
    info: &CompanyOverview,
    palette: &Palette,
    dimmed: bool,
) {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    let mut lines = vec![
        field("Name", info.name.clone()),
        field("Sector", text(&info.sector)),
        field("Industry", text(&info.industry)),
        field(
            "Market Cap",
            format::optional(info.market_capitalization, |v| {
                format!("${}", format::thousands(v))
            }),
        ),
        field(
            "PE Ratio",
            format::optional(info.pe_ratio, |v| format!("{v:.2}")),
        ),
        field(
            "Dividend Yield",
            format::optional(info.dividend_yield, format::percent),
        ),
        field(
            "52 Week High",
            format::optional(info.week_52_high, format::currency),
        ),
        field(
            "52 Week Low",
            format::optional(info.week_52_low, format::currency),
        ),
    ];
    if let Some(description) = &info.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(color(palette.text_secondary)),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(card("Company Overview", palette, dimmed));
    frame.render_widget(paragraph, area);
}

fn draw_quote(frame: &mut Frame, area: Rect, quote: &Quote, palette: &Palette, dimmed: bool) {
    let trend = quote.direction();
    let trend_color = match trend {
        Trend::Up => palette.success,
        Trend::Down => palette.error,
    };

    let lines = vec![
        Line::from(Span::styled(
            quote.symbol.clone(),
            Style::default()
                .fg(color(palette.primary))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Price: {}", format::currency(quote.price)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Change: "),
            Span::styled(
                format!("{trend} {:.4} ({})", quote.change, quote.change_percent),
                Style::default().fg(color(trend_color)),
            ),
        ]),
        field("Open", format::currency(quote.open)),
        field("High", format::currency(quote.high)),
        field("Low", format::currency(quote.low)),
        field("Volume", format::thousands_u64(quote.volume)),
        field("Latest Trading Day", quote.latest_trading_day.clone()),
        field("Previous Close", format::currency(quote.previous_close)),
    ];

    let title = quote.symbol.as_str();
    frame.render_widget(Paragraph::new(lines).block(card(title, palette, dimmed)), area);
}

fn draw_news(frame: &mut Frame, area: Rect, news: &[NewsArticle], palette: &Palette, dimmed: bool) {
    let mut lines = Vec::new();
    if news.is_empty() {
        lines.push(Line::from("No recent articles"));
    }
    for article in news {
        lines.push(Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let meta: Vec<&str> = [article.source.as_deref(), article.sentiment_label.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !meta.is_empty() {
            lines.push(Line::from(Span::styled(
                meta.join(" · "),
                Style::default().fg(color(palette.text_secondary)),
            )));
        }
        lines.push(Line::from(Span::styled(
            article.url.clone(),
            Style::default()
                .fg(color(palette.primary))
                .add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(card("Related News", palette, dimmed));
    frame.render_widget(paragraph, area);
}

fn draw_error(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    if let Some(error) = &app.dashboard.error {
        let paragraph = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(color(palette.error)),
        ));
        frame.render_widget(paragraph, area);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let footer = Paragraph::new(FOOTER_LINES.map(Line::from).to_vec())
        .style(Style::default().fg(color(palette.text_secondary)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn draw_options(frame: &mut Frame, search: Rect, bounds: Rect, app: &App, palette: &Palette) {
    let options = app.autocomplete.options();
    if options.is_empty() {
        return;
    }

    let top = search.bottom();
    let height = (options.len() as u16).min(MAX_OPTIONS) + 2;
    let area = Rect {
        x: search.x,
        y: top,
        width: search.width.min(60),
        height: height.min(bounds.bottom().saturating_sub(top)),
    };
    if area.height < 3 {
        return;
    }

    let items: Vec<ListItem> = options
        .iter()
        .map(|m| ListItem::new(m.label()))
        .collect();
    let list = List::new(items)
        .block(card("Matches", palette, false))
        .highlight_style(
            Style::default()
                .fg(color(palette.surface))
                .bg(color(palette.primary))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(app.selected);

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::DashboardUpdate;
    use crate::core::market::SymbolMatch;
    use crate::core::theme::Theme;
    use crate::tui::app::Message;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_initial_screen() {
        let start = Instant::now();
        let app = App::new(Theme::Light, 2, start);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal
            .draw(|frame| draw(frame, &app, start + Duration::from_secs(2)))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Stock-Lab"));
        assert!(text.contains("Dark Mode"));
        assert!(text.contains("Search company or symbol"));
        assert!(text.contains("Type a company name or ticker to search."));
        assert!(text.contains("All rights reserved."));
        assert!(text.contains("Developed by- Priyanshu Sutar"));
    }

    #[test]
    fn test_draw_options_popup_and_quote() {
        let start = Instant::now();
        let mut app = App::new(Theme::Dark, 2, start);
        app.input = "ib".to_string();
        app.autocomplete
            .apply_result(Ok::<_, String>(vec![SymbolMatch {
                symbol: "IBM".to_string(),
                name: "International Business Machines".to_string(),
                kind: None,
                region: None,
                currency: None,
                match_score: None,
            }]))
            .unwrap();
        app.selected = Some(0);
        app.handle_message(
            Message::Dashboard {
                generation: 0,
                update: DashboardUpdate::Error("Stock data not found".to_string()),
            },
            start,
        );

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| draw(frame, &app, start + Duration::from_secs(2)))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("International Business Machines (IBM)"));
        assert!(text.contains("Stock data not found"));
        assert!(text.contains("[●  ON]"));
    }
}
