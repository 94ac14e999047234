// Colored terminal output for results, trend, history and word statistics.
//
// User text always goes through `escape_for_terminal` before any styling is
// applied; highlight spans are styled here, never pre-rendered upstream.

use colored::Colorize;

use super::{escape_for_terminal, truncate_chars};
use crate::predictor::traits::{AnalysisResult, Severity};
use crate::session::history::HistoryEntry;
use crate::session::state::SessionState;
use crate::session::trend::TrendPoint;
use crate::text::frequency::WordFrequencyMap;
use crate::text::highlight::{highlight, HighlightSpan};
use crate::text::metrics::TextMetrics;

/// Render highlight spans as a single line, abusive words in red.
pub fn render_spans(spans: &[HighlightSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            let text = escape_for_terminal(&span.text);
            if span.abusive {
                text.red().bold().underline().to_string()
            } else {
                text
            }
        })
        .collect()
}

/// Display the full result card for `text`.
pub fn display_result(text: &str, result: &AnalysisResult) {
    let heading = if result.toxic {
        "!! Toxic content".red().bold()
    } else {
        "Safe content".green().bold()
    };
    println!("\n{}  [{}]", heading, colorize_severity(result.severity));

    let percent = result.percent();
    let filled = usize::from(percent) / 5;
    println!(
        "  Confidence: [{}{}] {}%",
        "#".repeat(filled),
        " ".repeat(20 - filled),
        percent
    );

    let spans = highlight(text, &result.abusive_words);
    println!("  Text: {}", render_spans(&spans));

    let metrics = TextMetrics::compute(text, Some(result));
    println!(
        "  Words: {}  |  Abusive: {}  |  Toxicity: {}%",
        metrics.total_words,
        metrics.abusive_count,
        metrics.toxicity_percent.unwrap_or(0)
    );

    if let Some(source) = &result.source {
        println!("  Source: {}", escape_for_terminal(source));
    }
    println!(
        "  Reason: {}",
        result
            .reason
            .as_deref()
            .map(escape_for_terminal)
            .unwrap_or_else(|| "-".to_string())
            .dimmed()
    );
    if let Some(sentiment) = &result.sentiment {
        println!(
            "  Sentiment: {} ({:.2})",
            escape_for_terminal(&sentiment.label),
            sentiment.polarity
        );
    }

    display_abuse_table(&result.abusive_words, &result.suggestions);
}

/// Abusive words alongside the service's suggestions.
pub fn display_abuse_table(abusive_words: &[String], suggestions: &[String]) {
    if abusive_words.is_empty() && suggestions.is_empty() {
        return;
    }

    println!("\n  {:<24} {}", "Word".dimmed(), "Suggestion".dimmed());
    println!("  {}", "-".repeat(70).dimmed());
    let rows = abusive_words.len().max(suggestions.len());
    for i in 0..rows {
        let word = abusive_words.get(i).map(String::as_str).unwrap_or("");
        let suggestion = suggestions.get(i).map(String::as_str).unwrap_or("");
        println!(
            "  {:<24} {}",
            escape_for_terminal(word).red(),
            escape_for_terminal(suggestion)
        );
    }
}

/// One-line view of the session: loading, failure or the current verdict.
pub fn display_status(state: &SessionState) {
    if state.is_loading() {
        println!("{}", "Analyzing...".dimmed());
    } else if let Some(failure) = state.failure() {
        println!(
            "{} request {} failed: {}",
            "Warning:".yellow(),
            failure.request,
            escape_for_terminal(&failure.detail)
        );
    } else if state.current().is_none() {
        println!("{}", "Start typing to analyze text in real-time.".dimmed());
    }
}

/// Trend as a small bar chart, oldest first.
pub fn display_trend(points: &[TrendPoint]) {
    if points.is_empty() {
        println!("No trend data yet.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Toxicity Trend ({} points) ===", points.len()).bold()
    );
    for point in points {
        let bar = "#".repeat(usize::from(point.value) / 5);
        let colored_bar = match point.value {
            v if v >= 85 => bar.red(),
            v if v >= 60 => bar.yellow(),
            _ => bar.green(),
        };
        println!("  {:>11}  {:>3}%  {}", point.time, point.value, colored_bar);
    }
}

/// Manual analyses, numbered for `:replay`.
pub fn display_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No manual analyses yet. Use :analyze to add one.");
        return;
    }

    println!(
        "\n{}",
        format!("=== History ({} analyses) ===", entries.len()).bold()
    );
    for (i, entry) in entries.iter().enumerate() {
        let verdict = if entry.toxic {
            "toxic".red()
        } else {
            "safe".green()
        };
        println!(
            "  {:>3}. [{:<5} {:>3}%] {}",
            i,
            verdict,
            crate::predictor::traits::confidence_percent(entry.confidence),
            escape_for_terminal(&truncate_chars(&entry.text, 80)).dimmed()
        );
    }
}

/// Top words, abusive ones marked in red.
pub fn display_word_frequency(freq: &WordFrequencyMap, abusive_words: &[String], limit: usize) {
    if freq.is_empty() {
        return;
    }

    let weights = freq.cloud_weights();
    println!(
        "\n{}",
        format!("=== Words ({} distinct, {} total) ===", freq.len(), freq.total()).bold()
    );
    for (word, count) in freq.top(limit) {
        let is_abusive = abusive_words.iter().any(|w| w.eq_ignore_ascii_case(&word));
        let weight = weights.get(&word).copied().unwrap_or(0.0);
        let bar = "*".repeat((weight * 20.0).round() as usize);
        let label = if is_abusive {
            word.red().bold()
        } else {
            word.normal()
        };
        println!("  {:<20} {:>4}  {}", label, count, bar.dimmed());
    }
}

fn colorize_severity(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::High => severity.as_str().red().bold(),
        Severity::Medium => severity.as_str().yellow(),
        Severity::Low => severity.as_str().green(),
    }
}
