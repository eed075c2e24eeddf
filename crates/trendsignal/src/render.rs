//! Terminal rendering of scan reports, chat answers and errors

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::analysis::{SentimentLabel, Signal, round2};
use crate::dashboard::{Candle, ScanReport};
use crate::error::SignalError;
use crate::market::QuoteSummary;

/// Candles shown in the recent-price table
pub const RECENT_CANDLES: usize = 10;

pub const HELP: &str = "TrendSignal AI commands:
  /scan <TICKER>  Run a full scan (bare tickers get the exchange suffix)
  /reset          Clear the chat history
  /help           Show this help
  /exit           Quit
Anything else is sent to the assistant as a question about the last scan.";

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn signal_cell(signal: Signal) -> Cell {
    let color = match signal {
        Signal::Bullish => Color::Green,
        Signal::Bearish => Color::Red,
        Signal::Neutral => Color::Yellow,
    };
    Cell::new(signal).fg(color)
}

fn sentiment_cell(label: SentimentLabel) -> Cell {
    let color = match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Yellow,
    };
    Cell::new(label).fg(color)
}

fn currency_symbol(currency: Option<&str>) -> String {
    match currency {
        Some("INR") => "₹".to_string(),
        Some("USD") => "$".to_string(),
        Some("GBP") => "£".to_string(),
        Some("EUR") => "€".to_string(),
        Some("JPY") => "¥".to_string(),
        Some(other) => format!("{other} "),
        None => String::new(),
    }
}

fn money(value: f64, currency: Option<&str>) -> String {
    format!("{}{:.2}", currency_symbol(currency), round2(value))
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", round2(v)))
}

/// Group thousands with commas
pub fn volume(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn metrics_table(report: &ScanReport) -> Table {
    let currency = report.quote.as_ref().and_then(|q| q.currency.as_deref());
    let snapshot = &report.snapshot;

    let mut table = table();
    table.set_header(vec!["Metric", "Value", "Signal"]);
    table.add_row(vec![
        Cell::new("Price"),
        Cell::new(money(snapshot.price, currency)),
        signal_cell(snapshot.trend),
    ]);
    table.add_row(vec![
        Cell::new("Change"),
        Cell::new(
            report
                .quote
                .as_ref()
                .and_then(|q| q.change_pct)
                .map_or_else(|| "N/A".to_string(), |p| format!("{:+.2}%", round2(p))),
        ),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("50-day moving average"),
        Cell::new(money(snapshot.moving_average, currency)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Momentum (14)"),
        Cell::new(format!("{:.2}", round2(snapshot.momentum))),
        signal_cell(snapshot.momentum_signal),
    ]);
    table
}

fn quote_table(quote: &QuoteSummary) -> Table {
    let currency = quote.currency.as_deref();
    let mut table = table();
    table.set_header(vec!["Quote", "Value"]);
    table.add_row(vec!["Open".to_string(), money(quote.open, currency)]);
    table.add_row(vec![
        "Day range".to_string(),
        format!("{} - {}", money(quote.day_low, currency), money(quote.day_high, currency)),
    ]);
    table.add_row(vec![
        "52-week range".to_string(),
        format!("{} - {}", money(quote.low_52, currency), money(quote.high_52, currency)),
    ]);
    table.add_row(vec!["Volume".to_string(), volume(quote.volume)]);
    table.add_row(vec!["Avg volume".to_string(), volume(quote.avg_volume)]);
    table.add_row(vec!["Market cap".to_string(), optional(quote.market_cap)]);
    table.add_row(vec!["P/E".to_string(), optional(quote.pe_ratio)]);
    table.add_row(vec![
        "Currency".to_string(),
        quote.currency.clone().unwrap_or_else(|| "N/A".to_string()),
    ]);
    table
}

fn candles_table(chart: &[Candle]) -> Table {
    let mut table = table();
    table.set_header(vec!["Date", "Open", "High", "Low", "Close", "Volume", ""]);
    for candle in &chart[chart.len().saturating_sub(RECENT_CANDLES)..] {
        let (marker, color) = if candle.up {
            ("▲", Color::Green)
        } else {
            ("▼", Color::Red)
        };
        table.add_row(vec![
            Cell::new(candle.date.format("%Y-%m-%d")),
            Cell::new(format!("{:.2}", candle.open)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", candle.high)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", candle.low)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", candle.close)).set_alignment(CellAlignment::Right),
            Cell::new(volume(candle.volume)).set_alignment(CellAlignment::Right),
            Cell::new(marker).fg(color),
        ]);
    }
    table
}

fn sentiment_table(report: &ScanReport) -> Table {
    let sentiment = &report.sentiment;
    let mut table = table();
    table.set_header(vec!["News sentiment", ""]);
    table.add_row(vec![Cell::new("Label"), sentiment_cell(sentiment.label)]);
    table.add_row(vec![Cell::new("Score"), Cell::new(format!("{:+.1}", sentiment.score))]);
    table.add_row(vec![
        Cell::new("Positive keywords"),
        Cell::new(format!("{} {}", sentiment.positive_hits, keyword_list(&sentiment.positive_matches))),
    ]);
    table.add_row(vec![
        Cell::new("Negative keywords"),
        Cell::new(format!("{} {}", sentiment.negative_hits, keyword_list(&sentiment.negative_matches))),
    ]);
    table.add_row(vec![Cell::new("Headlines"), Cell::new(report.headlines.joined())]);
    if let Some(failure) = &report.news_failure {
        table.add_row(vec![Cell::new("News fetch"), Cell::new(failure).fg(Color::Red)]);
    }
    table
}

fn keyword_list(words: &[String]) -> String {
    if words.is_empty() {
        String::new()
    } else {
        format!("({})", words.join(", "))
    }
}

/// Render a full scan report
pub fn render_report(report: &ScanReport) -> String {
    let mut out = format!("TrendSignal AI: {}\n\n", report.ticker);

    out.push_str(&metrics_table(report).to_string());
    out.push('\n');
    if let Some(quote) = &report.quote {
        out.push_str(&quote_table(quote).to_string());
        out.push('\n');
    }
    if !report.chart.is_empty() {
        out.push_str(&candles_table(&report.chart).to_string());
        out.push('\n');
    }
    out.push_str(&sentiment_table(report).to_string());
    out.push('\n');

    match &report.summary {
        Ok(text) => out.push_str(&panel("Strategist report", text.trim(), None)),
        Err(e) => out.push_str(&panel(
            &format!("Report unavailable ({})", e.kind()),
            &e.to_string(),
            Some(Color::Red),
        )),
    }
    out
}

/// Render a non-fatal error for one user action
pub fn render_error(ticker: &str, error: &SignalError) -> String {
    let title = if ticker.is_empty() {
        error.kind().to_string()
    } else {
        format!("{}: {ticker}", error.kind())
    };
    panel(&title, &error.to_string(), Some(Color::Red))
}

/// Render an assistant answer
pub fn render_answer(answer: &str) -> String {
    panel("Assistant", answer.trim(), None)
}

fn panel(title: &str, body: &str, color: Option<Color>) -> String {
    let mut table = table();
    let header = match color {
        Some(color) => Cell::new(title).fg(color),
        None => Cell::new(title),
    };
    table.set_header(vec![header]);
    table.add_row(vec![Cell::new(body)]);
    table.to_string()
}
