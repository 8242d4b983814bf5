//! Closing-price series derived from the daily history and the active theme

use crate::core::market::DailyBar;
use crate::core::theme::{Rgb, Theme};

pub const SERIES_LABEL: &str = "Closing Price";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    /// One date label per point.
    pub labels: Vec<String>,
    pub points: Vec<(f64, f64)>,
    pub line_color: Rgb,
    pub fill_color: Rgb,
    /// Vertical segments from the chart floor up to each point, shading the area under the line.
    pub fill: Vec<[(f64, f64); 2]>,
}

impl ChartSeries {
    /// Rebuilt whenever either the history or the theme changes.
    pub fn new(history: &[DailyBar], theme: Theme) -> Self {
        let palette = theme.palette();
        let mut series = ChartSeries {
            label: SERIES_LABEL,
            labels: history.iter().map(|b| b.date.to_string()).collect(),
            points: history
                .iter()
                .enumerate()
                .map(|(i, b)| (i as f64, b.close))
                .collect(),
            line_color: palette.chart_line,
            fill_color: palette.chart_fill,
            fill: Vec::new(),
        };
        let [floor, _] = series.y_bounds();
        series.fill = series
            .points
            .iter()
            .map(|&(x, y)| [(x, floor), (x, y)])
            .collect();
        series
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.points.len().saturating_sub(1).max(1) as f64]
    }

    /// Min and max close padded by 2%.
    pub fn y_bounds(&self) -> [f64; 2] {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
                (lo.min(*y), hi.max(*y))
            });
        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        [min * 0.98, max * 1.02]
    }

    /// First, middle and last date, for sparse axis labelling.
    pub fn axis_labels(&self) -> Vec<&str> {
        match self.labels.len() {
            0 => Vec::new(),
            1 => vec![self.labels[0].as_str()],
            2 => self.labels.iter().map(String::as_str).collect(),
            n => vec![
                self.labels[0].as_str(),
                self.labels[n / 2].as_str(),
                self.labels[n - 1].as_str(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history(closes: &[f64]) -> Vec<DailyBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| DailyBar {
                date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap(),
                open: *c,
                high: *c,
                low: *c,
                close: *c,
                volume: 0,
            })
            .collect()
    }

    #[test]
    fn test_series_from_history() {
        let series = ChartSeries::new(&history(&[100.0, 110.0, 105.0]), Theme::Light);
        assert_eq!(series.label, "Closing Price");
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(series.points, vec![(0.0, 100.0), (1.0, 110.0), (2.0, 105.0)]);
        assert_eq!(series.x_bounds(), [0.0, 2.0]);

        let [lo, hi] = series.y_bounds();
        assert!((lo - 98.0).abs() < 1e-9);
        assert!((hi - 112.2).abs() < 1e-9);
        assert_eq!(series.axis_labels(), vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

        assert_eq!(series.fill.len(), 3);
        assert_eq!(series.fill[1], [(1.0, lo), (1.0, 110.0)]);
        assert!(series.fill.iter().all(|[floor, _]| floor.1 == lo));
    }

    #[test]
    fn test_theme_changes_colours_only() {
        let bars = history(&[1.0, 2.0]);
        let light = ChartSeries::new(&bars, Theme::Light);
        let dark = ChartSeries::new(&bars, Theme::Dark);
        assert_eq!(light.points, dark.points);
        assert_ne!(light.line_color, dark.line_color);
        assert_eq!(dark.line_color, Rgb(0, 255, 255));
        assert_eq!(light.fill, dark.fill);
        assert_eq!(dark.fill_color, Theme::Dark.palette().chart_fill);
    }

    #[test]
    fn test_empty_series() {
        let series = ChartSeries::new(&[], Theme::Dark);
        assert!(series.is_empty());
        assert_eq!(series.y_bounds(), [0.0, 1.0]);
        assert_eq!(series.x_bounds(), [0.0, 1.0]);
        assert!(series.axis_labels().is_empty());
        assert!(series.fill.is_empty());
    }
}
