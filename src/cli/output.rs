//! Colored output helpers for CLI
//!
//! Status lines, key/value summaries, content-sized tables and the fetch
//! spinner. Every helper has a plain rendering for `--no-color`.

use crate::registry::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Failed,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Warn => "[WARN]",
            Status::Failed => "[ERROR]",
        }
    }
}

/// Terminal printer for command results.
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Ok, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Status::Warn, message);
    }

    /// Failures go to stderr so they never mix with report output.
    pub fn error(&self, message: &str) {
        self.status(Status::Failed, message);
    }

    fn status(&self, status: Status, message: &str) {
        if !self.colored {
            match status {
                Status::Failed => eprintln!("  {} {}", status.tag(), message),
                _ => println!("  {} {}", status.tag(), message),
            }
            return;
        }
        match status {
            Status::Ok => println!("  {} {}", "✓".green().bold(), message.green()),
            Status::Warn => println!("  {} {}", "!".yellow().bold(), message.yellow()),
            Status::Failed => eprintln!("  {} {}", "✗".red().bold(), message.red()),
        }
    }

    /// A file produced by the command.
    pub fn written(&self, what: &str, path: &str) {
        if self.colored {
            println!("  {} {:<18} {}", "→".cyan(), what.dimmed(), path);
        } else {
            println!("  [WRITTEN] {:<18} {}", what, path);
        }
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bold());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a table whose columns are as wide as their widest cell.
    pub fn table(&self, columns: &[&str], rows: &[Vec<String>]) {
        let mut lines = format_table(columns, rows).into_iter();
        let (Some(header), Some(rule)) = (lines.next(), lines.next()) else {
            return;
        };
        if self.colored {
            println!("    {}", header.bold());
            println!("    {}", rule.dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", rule);
        }
        for line in lines {
            println!("    {}", line);
        }
    }

    /// Spinner reporting listing pages as they arrive
    pub fn spinner(&self, message: &str) -> SpinnerProgress {
        SpinnerProgress::new(message, self.colored)
    }
}

/// Header, rule and rows. Columns holding only numbers (or `-`) are
/// right-aligned, the rest left-aligned.
pub(crate) fn format_table(columns: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let numeric: Vec<bool> = (0..columns.len())
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .all(|cell| cell == "-" || cell.parse::<f64>().is_ok())
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(columns.iter().copied(), &widths, &numeric));
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    lines.push("-".repeat(total));
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str), &widths, &numeric));
    }
    lines
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], numeric: &[bool]) -> String {
    cells
        .zip(widths.iter().zip(numeric))
        .map(|(cell, (&width, &right))| {
            if right {
                format!("{:>width$}", cell)
            } else {
                format!("{:<width$}", cell)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Terminal spinner for paginated registry fetches.
pub struct SpinnerProgress {
    bar: ProgressBar,
    fetched: AtomicUsize,
}

impl SpinnerProgress {
    pub fn new(message: &str, colored: bool) -> Self {
        let template = if colored {
            "  {spinner:.cyan} {msg}"
        } else {
            "  {spinner} {msg}"
        };
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            fetched: AtomicUsize::new(0),
        }
    }

    /// Agents received so far, over all pages.
    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    /// Stop without leaving a line behind
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl FetchProgress for SpinnerProgress {
    fn page_fetched(&self, page: usize, records: usize) {
        let so_far = self.fetched.fetch_add(records, Ordering::Relaxed) + records;
        self.bar
            .set_message(format!("page {}: {} agents so far", page, so_far));
    }

    fn finished(&self, total: usize) {
        self.bar.finish_with_message(format!("{} agents fetched", total));
    }
}
