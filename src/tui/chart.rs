//! Line chart of closing prices

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Widget};

use crate::core::chart::ChartSeries;
use crate::core::format;
use crate::core::theme::{Palette, Rgb};

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn price_label(value: f64) -> String {
    format::thousands((value * 100.0).round() / 100.0)
}

pub fn price_chart<'a>(series: &'a ChartSeries, palette: &Palette) -> Chart<'a> {
    let axis_style = Style::default().fg(color(palette.text));
    let grid_style = Style::default().fg(color(palette.grid));
    let [y_min, y_max] = series.y_bounds();

    let fill_style = Style::default().fg(color(series.fill_color));
    // Unnamed datasets stay out of the legend.
    let mut datasets: Vec<Dataset> = series
        .fill
        .iter()
        .map(|segment| {
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(fill_style)
                .data(segment)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .name(series.label)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color(series.line_color)))
            .data(&series.points),
    );

    Chart::new(datasets)
        .style(Style::default().bg(color(palette.surface)))
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .style(grid_style)
                .bounds(series.x_bounds())
                .labels(
                    series
                        .axis_labels()
                        .into_iter()
                        .map(|l| Span::styled(l.to_string(), axis_style))
                        .collect::<Vec<_>>(),
                ),
        )
        .y_axis(
            Axis::default()
                .style(grid_style)
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(price_label(y_min), axis_style),
                    Span::styled(price_label((y_min + y_max) / 2.0), axis_style),
                    Span::styled(price_label(y_max), axis_style),
                ]),
        )
}

/// Renders the chart off-screen and returns its rows as plain text.
pub fn render_to_text(series: &ChartSeries, palette: &Palette, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    price_chart(series, palette).render(area, &mut buffer);

    (0..height)
        .map(|y| {
            let row: String = (0..width).map(|x| buffer[(x, y)].symbol()).collect();
            row.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::DailyBar;
    use crate::core::theme::Theme;
    use chrono::NaiveDate;

    fn sample_series() -> ChartSeries {
        let history: Vec<DailyBar> = (1..=10)
            .map(|d| DailyBar {
                date: NaiveDate::from_ymd_opt(2024, 2, d).unwrap(),
                open: 0.0,
                high: 0.0,
                low: 0.0,
                close: 100.0 + d as f64,
                volume: 0,
            })
            .collect();
        ChartSeries::new(&history, Theme::Dark)
    }

    #[test]
    fn test_render_to_text_draws_axes_and_legend() {
        let series = sample_series();

        let text = render_to_text(&series, &Theme::Dark.palette(), 100, 20);
        assert_eq!(text.lines().count(), 20);
        assert!(text.contains("Closing Price"));
        assert!(text.contains("2024-02-10"));
    }

    #[test]
    fn test_area_under_line_uses_fill_colour() {
        let series = sample_series();
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        price_chart(&series, &Theme::Dark.palette()).render(area, &mut buffer);

        let cells = |rgb: Rgb| {
            (0..area.height)
                .flat_map(|y| (0..area.width).map(move |x| (x, y)))
                .filter(|&pos| buffer[pos].fg == color(rgb))
                .count()
        };
        assert!(cells(series.fill_color) > 0);
        assert!(cells(series.line_color) > 0);
    }
}
