//! Consistent styling for CLI output.
//!
//! Provides color and formatting helpers using owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Section headers (e.g., "translate", "Cache")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Labels/keys (e.g., "url", "timeout")
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Primary values (endpoint names, paths)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// The marker next to a group's default endpoint.
    pub fn default_marker() -> String {
        format!("{}", "(default)".dimmed())
    }
}
