use super::ui;
use crate::core::format;
use crate::core::market::{MarketDataProvider, SymbolMatch};
use crate::core::search::Autocomplete;
use crate::core::theme::Theme;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn display_matches(matches: &[SymbolMatch], theme: Theme) -> String {
    let palette = theme.palette();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol", &palette),
        ui::header_cell("Name", &palette),
        ui::header_cell("Type", &palette),
        ui::header_cell("Region", &palette),
        ui::header_cell("Currency", &palette),
        ui::header_cell("Match", &palette),
    ]);

    for m in matches {
        let text_or_na = |v: &Option<String>| v.as_ref().map_or_else(ui::na_cell, Cell::new);
        table.add_row(vec![
            Cell::new(&m.symbol).fg(ui::table_color(palette.primary)),
            Cell::new(&m.name),
            text_or_na(&m.kind),
            text_or_na(&m.region),
            text_or_na(&m.currency),
            Cell::new(format::optional(m.match_score, |s| format!("{:.0}%", s * 100.0)))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

pub async fn run(
    provider: &dyn MarketDataProvider,
    keywords: &str,
    min_length: usize,
    theme: Theme,
) -> Result<()> {
    let mut autocomplete = Autocomplete::new(min_length);
    if !autocomplete.should_query(keywords) {
        println!(
            "{}",
            ui::style_text(
                &format!("Type at least {min_length} characters to search."),
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    let pb = ui::new_spinner("Searching...");
    let result = autocomplete.update(provider, keywords).await;
    pb.finish_and_clear();
    // Nothing was shown before, so a kept-on-failure list is empty here.
    result?;

    if autocomplete.options().is_empty() {
        println!("No symbols match \"{}\".", keywords.trim());
        return Ok(());
    }

    println!("{}", display_matches(autocomplete.options(), theme));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches() {
        let matches = vec![SymbolMatch {
            symbol: "TSCO.LON".to_string(),
            name: "Tesco PLC".to_string(),
            kind: Some("Equity".to_string()),
            region: Some("United Kingdom".to_string()),
            currency: None,
            match_score: Some(0.7273),
        }];

        let output = display_matches(&matches, Theme::Light);
        assert!(output.contains("TSCO.LON"));
        assert!(output.contains("Tesco PLC"));
        assert!(output.contains("United Kingdom"));
        assert!(output.contains("N/A"));
        assert!(output.contains("73%"));
    }
}
