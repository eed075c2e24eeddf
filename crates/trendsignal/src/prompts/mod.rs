//! Prompt templates for the report and the chat assistant
//!
//! Templates are rendered with MiniJinja from serialisable values. Snapshot
//! numbers arrive already rounded to two decimals by their serializer; other
//! floats go through the `fixed2` filter.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::analysis::{IndicatorSnapshot, SentimentResult};
use crate::error::Result;
use crate::session::LastAnalysis;

/// System instruction for the report completion
pub const STRATEGIST_SYSTEM: &str = r"You are a Senior Multi-Agent Market Strategist.
You receive the output of a technical sensor and a news sensor for one stock.
Write a concise market signal: state the overall stance (Bullish, Bearish or Neutral),
the two or three facts that support it, and the main risk to that view.
Use the numbers you are given and do not invent figures. Keep it under 200 words.
This is an educational demo, not financial advice.";

/// System instruction for follow-up chat
pub const CHAT_SYSTEM: &str = r"You are the TrendSignal AI assistant, a market strategist answering
follow-up questions about the most recent dashboard scan.
Ground your answers in the scan context provided. If the question needs data the
scan does not contain, say so plainly. Be brief and never present output as financial advice.";

const REPORT_TEMPLATE: &str = r"Analyze the following inputs and generate a concise market signal.

TICKER: {{ ticker }}

TECHNICAL DATA:
- Price: {{ snapshot.price }}
- 50-day moving average: {{ snapshot.moving_average }}
- Momentum (14): {{ snapshot.momentum }}
- Trend: {{ snapshot.trend }}
- Momentum signal: {{ snapshot.momentum_signal }}

NEWS CONTEXT:
- Headlines: {{ headlines }}
- Sentiment: {{ sentiment.label }} (score {{ sentiment.score }}, {{ sentiment.positive_hits }} positive / {{ sentiment.negative_hits }} negative keywords)
";

const CHAT_CONTEXT_TEMPLATE: &str = r"{% if analysis %}Latest scan for {{ analysis.ticker }} at {{ analysis.analyzed_at }}:
- Price {{ analysis.snapshot.price }}, 50-day average {{ analysis.snapshot.moving_average }}, trend {{ analysis.snapshot.trend }}
- Momentum {{ analysis.snapshot.momentum }} ({{ analysis.snapshot.momentum_signal }})
{%- if analysis.quote %}
- Day range {{ analysis.quote.day_low | fixed2 }} to {{ analysis.quote.day_high | fixed2 }}, 52-week range {{ analysis.quote.low_52 | fixed2 }} to {{ analysis.quote.high_52 | fixed2 }}
{%- endif %}
- News sentiment {{ analysis.sentiment.label }} ({{ analysis.sentiment.score }})
- Headlines: {{ analysis.headlines }}
{%- if analysis.summary %}
- Report: {{ analysis.summary }}
{%- endif %}
{% else %}No scan has been run in this session yet. Answer generally and suggest running a scan.
{% endif %}";

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_filter("fixed2", |v: f64| format!("{v:.2}"));
    env.add_template("report", REPORT_TEMPLATE)?;
    env.add_template("chat_context", CHAT_CONTEXT_TEMPLATE)?;
    Ok(env)
}

/// Render the report prompt for one scan
pub fn render_report(
    ticker: &str,
    snapshot: &IndicatorSnapshot,
    sentiment: &SentimentResult,
    headlines: &str,
) -> Result<String> {
    render(
        "report",
        context! {
            ticker => ticker,
            snapshot => snapshot,
            sentiment => sentiment,
            headlines => headlines,
        },
    )
}

/// Render the chat context preamble from the session's last analysis
pub fn render_chat_context(analysis: Option<&LastAnalysis>) -> Result<String> {
    render("chat_context", context! { analysis => analysis })
}

fn render<S: Serialize>(name: &str, ctx: S) -> Result<String> {
    let env = environment()?;
    let template = env.get_template(name)?;
    Ok(template.render(ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Signal, score_headlines};
    use crate::session::fixtures::last_analysis;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            price: 149.0,
            moving_average: 124.5,
            momentum: 100.0,
            avg_gain: 1.0,
            avg_loss: 0.0,
            trend: Signal::Bullish,
            momentum_signal: Signal::Bullish,
        }
    }

    #[test]
    fn test_report_prompt() {
        let sentiment = score_headlines("Profit surges as growth continues");
        let prompt = render_report(
            "RELIANCE.NS",
            &snapshot(),
            &sentiment,
            "Profit surges as growth continues",
        )
        .unwrap();

        assert!(prompt.contains("TICKER: RELIANCE.NS"));
        assert!(prompt.contains("- Price: 149"));
        assert!(prompt.contains("- 50-day moving average: 124.5"));
        assert!(prompt.contains("- Trend: Bullish"));
        assert!(prompt.contains("Sentiment: Positive (score 0.5, 2 positive / 0 negative keywords)"));
    }

    #[test]
    fn test_report_prompt_rounds_numbers() {
        let mut snap = snapshot();
        snap.moving_average = 124.456_789;
        let sentiment = score_headlines("");
        let prompt = render_report("TCS.NS", &snap, &sentiment, "").unwrap();

        assert!(prompt.contains("moving average: 124.46"));
        assert!(!prompt.contains("124.456"));
    }

    #[test]
    fn test_chat_context_without_scan() {
        let text = render_chat_context(None).unwrap();
        assert!(text.starts_with("No scan has been run"));
    }

    #[test]
    fn test_chat_context_with_scan() {
        let analysis = last_analysis("INFY.NS");
        let text = render_chat_context(Some(&analysis)).unwrap();

        assert!(text.starts_with("Latest scan for INFY.NS"));
        assert!(text.contains("trend Bullish"));
        assert!(text.contains("News sentiment Positive (0.5)"));
        assert!(text.contains("- Report: Stay long."));
    }
}
