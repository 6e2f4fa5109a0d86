//! Text renderers for delivery channels.
//!
//! Precision contract: prices are rounded to whole numbers, percentages carry
//! two decimals, the score one decimal.

use super::Report;

/// Renders a report into a message body.
pub trait ReportRenderer {
    fn render(&self, report: &Report) -> String;
}

/// Price rounded to a whole number.
pub fn fmt_price(price: f64) -> String {
    format!("{price:.0}")
}

/// Percentage with two decimals and a trailing `%`.
pub fn fmt_pct(pct: f64) -> String {
    format!("{pct:.2}%")
}

/// Chat-style plain text, one fact per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl ReportRenderer for PlainTextRenderer {
    fn render(&self, report: &Report) -> String {
        let mut out = format!(
            "{} market structure ({})\n",
            report.symbol,
            report.as_of.format("%Y-%m-%d %H:%M UTC")
        );
        out.push_str(&format!(
            "Price: {} | Trend 1D: {} | Trend 4H: {}\n",
            fmt_price(report.last_close),
            report.trend.label(),
            report.h4_trend.label()
        ));
        out.push_str(&format!(
            "Momentum: {} (RSI {:.2})\n",
            report.momentum.label(),
            report.rsi
        ));
        out.push_str(&format!(
            "Volatility: ATR {} ({})\n",
            fmt_price(report.volatility.atr),
            fmt_pct(report.volatility.atr_pct)
        ));
        out.push_str(&format!("Score: {}\n", report.score));
        out.push_str(&format!("State: {}\n", report.state));
        out.push_str(&format!("{}\n", report.rationale));
        out.push_str(&format!(
            "Resistance: {} / {}\n",
            fmt_price(report.bands.resistance[0]),
            fmt_price(report.bands.resistance[1])
        ));
        out.push_str(&format!(
            "Support: {} / {}\n",
            fmt_price(report.bands.support[0]),
            fmt_price(report.bands.support[1])
        ));
        out
    }
}

/// Markdown layout with a levels table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        let mut out = format!(
            "# {}: {}\n\n\
As of: `{}`\n\n\
## Summary\n\
- Price: {}\n\
- Trend (1D / 4H): {} / {}\n\
- Momentum: {} (RSI {:.2})\n\
- Volatility: ATR {} ({})\n\
- Score: {}\n\n\
> {}\n",
            report.symbol,
            report.state,
            report.as_of.to_rfc3339(),
            fmt_price(report.last_close),
            report.trend.label(),
            report.h4_trend.label(),
            report.momentum.label(),
            report.rsi,
            fmt_price(report.volatility.atr),
            fmt_pct(report.volatility.atr_pct),
            report.score,
            report.rationale,
        );

        out.push_str("\n## Levels\n\n");
        out.push_str("| Level | Price |\n");
        out.push_str("|-------|-------|\n");
        out.push_str(&format!("| R2 | {} |\n", fmt_price(report.bands.resistance[1])));
        out.push_str(&format!("| R1 | {} |\n", fmt_price(report.bands.resistance[0])));
        out.push_str(&format!("| S1 | {} |\n", fmt_price(report.bands.support[0])));
        out.push_str(&format!("| S2 | {} |\n", fmt_price(report.bands.support[1])));

        out.push_str("\n## Structure\n");
        out.push_str(&format!(
            "- 20-bar range: {} ({} to {})\n",
            fmt_pct(report.regime.range_pct),
            fmt_price(report.regime.min_low),
            fmt_price(report.regime.max_high)
        ));
        out.push_str(&format!("- EMA slope: {}\n", fmt_pct(report.regime.slope_pct)));
        out.push_str(&format!("- Candle body: {}\n", fmt_pct(report.regime.body_pct)));
        out
    }
}
