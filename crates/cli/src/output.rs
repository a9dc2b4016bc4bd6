//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Two-column row used by the detail views
#[derive(Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_rows<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        print_warning("Nothing to show");
        return;
    }
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn print_heading(text: &str) {
    println!("\n{}", text.bold());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// One decimal, or a dash for an absent value
pub fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

/// Color a 0-100 score: green from 80, yellow from 60, red below
pub fn color_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s >= 80.0 => format_value(score).green().to_string(),
        Some(s) if s >= 60.0 => format_value(score).yellow().to_string(),
        Some(_) => format_value(score).red().to_string(),
        None => format_value(None).dimmed().to_string(),
    }
}

/// Color trend, tier and priority labels
pub fn color_label(label: &str) -> String {
    match label.to_lowercase().as_str() {
        "improvement" | "improving" | "elite" | "advanced" | "yes" => label.green().to_string(),
        "unchanged" | "stable" | "intermediate" | "medium" => label.yellow().to_string(),
        "decline" | "declining" | "developing" | "high" | "no" => label.red().to_string(),
        "unavailable" | "low" => label.dimmed().to_string(),
        _ => label.to_string(),
    }
}
