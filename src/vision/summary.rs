// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Compact class summary for a prediction run

use std::collections::HashMap;

use crate::detection::DetectionBox;

/// Class name -> display symbol. Lookups are by the name the service
/// returned, so a model with more classes than the table still renders.
#[derive(Debug, Clone)]
pub struct ClassSymbols {
    symbols: HashMap<String, String>,
}

impl Default for ClassSymbols {
    fn default() -> Self {
        let symbols = [
            ("hippo", "🦛"),
            ("hippopotamus", "🦛"),
            ("lion", "🦁"),
        ]
        .into_iter()
        .map(|(name, symbol)| (name.to_string(), symbol.to_string()))
        .collect();
        Self { symbols }
    }
}

impl ClassSymbols {
    /// Empty table; every class renders as its raw name
    pub fn empty() -> Self {
        Self {
            symbols: HashMap::new(),
        }
    }

    /// Add or replace mappings
    pub fn extend<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.symbols.extend(extra);
        self
    }

    /// Symbol for a class name; case-insensitive, raw name when unmapped
    pub fn symbol_for<'a>(&'a self, class_name: &'a str) -> &'a str {
        self.symbols
            .get(class_name)
            .or_else(|| self.symbols.get(&class_name.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(class_name)
    }

    /// Concatenate one symbol per box, in result order
    pub fn summarize(&self, boxes: &[DetectionBox]) -> String {
        boxes
            .iter()
            .map(|b| self.symbol_for(&b.class_name))
            .collect()
    }
}
