//! Symbol autocomplete driven by the search input

use crate::core::market::{MarketDataProvider, SymbolMatch};
use anyhow::Result;
use std::fmt::Display;
use tracing::{debug, error};

pub const DEFAULT_MIN_LENGTH: usize = 2;

#[derive(Debug, Clone)]
pub struct Autocomplete {
    min_length: usize,
    options: Vec<SymbolMatch>,
}

impl Autocomplete {
    pub fn new(min_length: usize) -> Self {
        Autocomplete {
            min_length,
            options: Vec::new(),
        }
    }

    pub fn options(&self) -> &[SymbolMatch] {
        &self.options
    }

    /// Inputs shorter than the minimum length never reach the network.
    /// Surrounding whitespace does not count towards the length.
    pub fn should_query(&self, input: &str) -> bool {
        input.trim().chars().count() >= self.min_length
    }

    /// The keywords to search for, or `None` after clearing the options
    /// when `input` is too short.
    pub fn prepare_query(&mut self, input: &str) -> Option<String> {
        if !self.should_query(input) {
            self.clear();
            return None;
        }
        Some(input.trim().to_string())
    }

    /// Replaces the options with a successful result. A failure is logged,
    /// handed back, and leaves the previous options in place.
    pub fn apply_result<E: Display>(
        &mut self,
        result: Result<Vec<SymbolMatch>, E>,
    ) -> Result<(), E> {
        match result {
            Ok(matches) => {
                debug!(count = matches.len(), "Search returned matches");
                self.options = matches;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error searching symbols");
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.options.clear();
    }

    /// Runs the search step for `input`. On failure the previous options stay
    /// and the error is returned.
    pub async fn update(&mut self, provider: &dyn MarketDataProvider, input: &str) -> Result<()> {
        let Some(keywords) = self.prepare_query(input) else {
            return Ok(());
        };
        let result = provider.search_symbols(&keywords).await;
        self.apply_result(result)
    }

    pub fn select(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(|m| m.symbol.as_str())
    }
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}
