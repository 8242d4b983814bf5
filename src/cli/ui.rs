use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::market::Direction;
use crate::core::theme::{Palette, Rgb};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

pub fn table_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str, palette: &Palette) -> Cell {
    Cell::new(text)
        .fg(table_color(palette.primary))
        .add_attribute(Attribute::Bold)
}

/// A single-column table with a titled header, used for each dashboard card.
pub fn new_card(title: &str, palette: &Palette) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell(title, palette)]);
    table
}

/// A bold label cell paired with its value, for key/value cards.
pub fn field_row(label: &str, value: impl Into<String>) -> Vec<Cell> {
    vec![
        Cell::new(label).add_attribute(Attribute::Bold),
        Cell::new(value.into()),
    ]
}

/// Coloured arrow and change text.
pub fn change_cell(direction: Direction, text: &str, palette: &Palette) -> Cell {
    let color = match direction {
        Direction::Up => palette.success,
        Direction::Down => palette.error,
    };
    Cell::new(format!("{direction} {text}"))
        .fg(table_color(color))
        .set_alignment(CellAlignment::Left)
}

/// Creates a cell for "N/A" values.
pub fn na_cell() -> Cell {
    Cell::new("N/A").fg(Color::DarkGrey)
}

/// Creates a spinner shown while requests are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A dim horizontal rule `width` columns wide.
pub fn separator(width: usize) -> String {
    style("─".repeat(width)).dim().to_string()
}

pub fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80)
}
