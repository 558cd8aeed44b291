//! Progress reporting for batch iteration
//!
//! Provides the progress bar shown while batches are pulled, plus the header
//! and summary blocks printed around a run.

use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Totals collected while draining a batch sequence
#[derive(Debug, Clone, Default)]
pub struct BatchRunStats {
    /// Batches successfully read
    pub batches: u64,
    /// Rows across those batches
    pub rows: u64,
    /// Wall time of the run
    pub duration: Duration,
    /// Error that ended the run, if any
    pub stopped_by: Option<String>,
}

/// Progress reporter that displays batch status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Bar over `total_steps` steps, or a spinner when the count is unknown
    pub fn new(total_steps: Option<u64>) -> Self {
        let bar = match total_steps {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner())
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                bar
            }
        };

        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Reporter that draws nothing (for `--quiet`)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record one batch
    pub fn record_batch(&self, stats: &BatchRunStats) {
        self.bar.inc(1);
        self.bar.set_message(format!(
            "Batches: {} | Rows: {}",
            format_number(stats.batches),
            format_number(stats.rows)
        ));
    }

    /// Print above the bar (straight to stdout when hidden)
    pub fn println(&self, text: &str) {
        if self.bar.is_hidden() {
            println!("{}", text);
        } else {
            self.bar.println(text);
        }
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header before paginating a file
pub fn print_header(path: &Path, row_groups: usize, rows: u64, file_size: Option<u64>, step: &str) {
    println!();
    println!(
        "{} {}",
        style("parquet-pager").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    match file_size {
        Some(size) => println!(
            "  {} {} ({})",
            style("File:").bold(),
            path.display(),
            format_size(size, BINARY)
        ),
        None => println!("  {} {}", style("File:").bold(), path.display()),
    }
    println!("  {} {}", style("Row groups:").bold(), format_number(row_groups as u64));
    println!("  {} {}", style("Rows:").bold(), format_number(rows));
    println!("  {} {}", style("Stepping:").bold(), step);
    println!();
}

/// Print a summary of a batch run
pub fn print_summary(stats: &BatchRunStats) {
    let duration_secs = stats.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        stats.rows as f64 / duration_secs
    } else {
        0.0
    };

    let title = if stats.stopped_by.is_some() {
        style("Pagination Stopped").yellow().bold()
    } else {
        style("Pagination Complete").green().bold()
    };

    println!();
    println!("{}", title);
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Batches:").bold(), format_number(stats.batches));
    println!("  {} {}", style("Rows:").bold(), format_number(stats.rows));
    println!(
        "  {} {:.2}s ({:.0} rows/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if let Some(reason) = &stats.stopped_by {
        println!("  {} {}", style("Stopped by:").yellow().bold(), reason);
    }
    println!();
}

/// Print a titled key/value block
pub fn print_section(title: &str, entries: &[(&str, String)]) {
    println!();
    println!("{}", style(title).green().bold());
    println!("{}", style("─".repeat(50)).dim());
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in entries {
        println!(
            "  {} {}",
            style(format!("{:<width$}", format!("{}:", key), width = width + 1)).bold(),
            value
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_hidden_reporter_counts_steps() {
        let reporter = ProgressReporter::hidden();
        let stats = BatchRunStats {
            batches: 1,
            rows: 20,
            ..Default::default()
        };
        reporter.record_batch(&stats);
        reporter.record_batch(&stats);
        assert_eq!(reporter.bar.position(), 2);
        reporter.finish_and_clear();
    }
}
