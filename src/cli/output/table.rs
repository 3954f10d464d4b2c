//! Table output formatting for CLI commands
//!
//! Renders property sources and fetch plans using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;
use std::env;

use super::truncate;
use crate::domain::models::PropertySource;

/// Placeholder shown instead of a secret value
pub const MASKED_VALUE: &str = "********";

/// One row of a plan table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow<'a> {
    pub name: &'a str,
    pub request_path: String,
    pub priority: i32,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
    /// Print property values instead of masking them
    reveal_values: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
            reveal_values: false,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
            reveal_values: false,
        }
    }

    /// Print property values in clear text
    #[must_use]
    pub const fn reveal_values(mut self, reveal: bool) -> Self {
        self.reveal_values = reveal;
        self
    }

    /// Format property sources as one row per property, highest priority first
    pub fn format_sources(&self, sources: &[PropertySource]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Key").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        for source in sources.iter().rev() {
            let mut keys: Vec<&str> = source.keys().collect();
            keys.sort_unstable();

            for key in keys {
                let value = source
                    .properties
                    .get(key)
                    .map_or_else(String::new, |v| self.display_value(v));

                let source_cell = if self.use_colors {
                    Cell::new(&source.name).fg(Color::Cyan)
                } else {
                    Cell::new(&source.name)
                };

                table.add_row(vec![
                    source_cell,
                    Cell::new(source.priority),
                    Cell::new(key),
                    Cell::new(value),
                ]);
            }
        }

        table.to_string()
    }

    /// Format planned fetch targets in plan order
    pub fn format_plan(&self, rows: &[PlanRow<'_>]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Request Path").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
        ]);

        for (index, row) in rows.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index),
                Cell::new(row.name),
                Cell::new(&row.request_path),
                Cell::new(row.priority),
            ]);
        }

        table.to_string()
    }

    fn display_value(&self, value: &Value) -> String {
        if !self.reveal_values {
            return MASKED_VALUE.to_string();
        }
        match value {
            Value::String(s) => truncate(s, 60),
            other => truncate(&other.to_string(), 60),
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}
