//! Console rendering of experiment results. Everything renders to `String`;
//! the CLI decides where it goes.

use std::fmt::Write;

use crate::experiment::aggregator::{weighted_score, WinnerWeights};
use crate::experiment::models::StrategySummary;
use crate::experiment::strategy::Strategy;
use crate::report::ExperimentReport;

const RULE_WIDTH: usize = 70;

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

fn banner(title: &str) -> String {
    format!("{}\n{}\n{}\n", rule('='), title, rule('='))
}

/// Per-strategy averages block printed after a strategy finishes.
pub fn strategy_averages(summary: &StrategySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule('-'));
    let _ = writeln!(out, "AVERAGE RESULTS - {}", summary.strategy.as_str().to_uppercase());
    let _ = writeln!(out, "{}", rule('-'));
    let _ = writeln!(out, "Relevance:         {:.1}/10", summary.avg_relevance);
    let _ = writeln!(out, "Clarity:           {:.1}/10", summary.avg_clarity);
    let _ = writeln!(out, "Format Compliance: {:.1}/10", summary.avg_format);
    let _ = writeln!(out, "Generation Time:   {:.2}s", summary.avg_time);
    let _ = writeln!(out, "Parsing Success:   {:.0}%", summary.parse_success_rate);
    let _ = writeln!(
        out,
        "Iterations:        {}/{} succeeded",
        summary.successful_iterations, summary.total_iterations
    );
    out
}

/// The side-by-side comparison table.
pub fn comparison_table(summaries: &[StrategySummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<22} {:<12} {:<10} {:<10} {:<8} {:<8}",
        "Strategy", "Relevance", "Clarity", "Format", "Time", "Parse%"
    );
    let _ = writeln!(out, "{}", rule('-'));
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<22} {:<12.1} {:<10.1} {:<10.1} {:<8} {:<8}",
            s.strategy.as_str(),
            s.avg_relevance,
            s.avg_clarity,
            s.avg_format,
            format!("{:.2}s", s.avg_time),
            format!("{:.0}%", s.parse_success_rate)
        );
    }
    out
}

/// Final comparison printed at the end of a run.
pub fn final_comparison(report: &ExperimentReport, weights: &WinnerWeights) -> String {
    let mut out = String::new();
    out.push_str(&banner("FINAL COMPARISON"));
    out.push('\n');
    out.push_str(&comparison_table(&report.result.summaries));
    out.push('\n');
    out.push_str(&rule('='));
    out.push('\n');
    match report.result.winner_summary() {
        Some(winner) => {
            let _ = writeln!(
                out,
                "RECOMMENDED STRATEGY: {}",
                winner.strategy.as_str().to_uppercase()
            );
            let _ = writeln!(
                out,
                "   Overall Score: {:.1}",
                weighted_score(winner, weights)
            );
        }
        None => {
            let _ = writeln!(out, "No strategy completed a successful iteration.");
        }
    }
    out.push_str(&rule('='));
    out.push('\n');
    out
}

/// Full results display for a stored artifact.
pub fn demo_display(report: &ExperimentReport) -> String {
    let mut out = String::new();
    out.push_str(&banner("PROMPT ENGINEERING RESEARCH RESULTS"));

    let _ = writeln!(out, "\nEXPERIMENT DETAILS:");
    let unknown = || "unknown".to_string();
    let _ = writeln!(
        out,
        "   Date: {}",
        report
            .experiment_date
            .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(unknown)
    );
    let _ = writeln!(
        out,
        "   Researcher: {}",
        report.researcher.clone().unwrap_or_else(unknown)
    );
    let _ = writeln!(
        out,
        "   Model: {}",
        report.model_used.clone().unwrap_or_else(unknown)
    );
    let _ = writeln!(
        out,
        "   Iterations: {} per strategy",
        report
            .iterations_per_strategy
            .map(|n| n.to_string())
            .unwrap_or_else(unknown)
    );

    out.push('\n');
    out.push_str(&banner("STRATEGY COMPARISON"));
    out.push('\n');
    out.push_str(&comparison_table(&report.result.summaries));

    out.push('\n');
    out.push_str(&rule('='));
    out.push('\n');
    match report.result.winner_summary() {
        Some(w) => {
            let _ = writeln!(
                out,
                "WINNER: {}",
                w.strategy.as_str().to_uppercase().replace('_', " ")
            );
            let _ = writeln!(out, "\n   Relevance Score:     {}/10", w.avg_relevance);
            let _ = writeln!(out, "   Clarity Score:       {}/10", w.avg_clarity);
            let _ = writeln!(out, "   Format Compliance:   {}/10", w.avg_format);
            let _ = writeln!(out, "   Parsing Success:     {}%", w.parse_success_rate);
            let _ = writeln!(out, "   Generation Time:     {}s", w.avg_time);
        }
        None => {
            let _ = writeln!(out, "WINNER: none (no strategy produced a summary)");
        }
    }

    if let Some(recommendation) = &report.recommendation {
        out.push('\n');
        out.push_str(&banner("RECOMMENDATION"));
        let _ = writeln!(out, "\n{recommendation}\n");
    }

    if let Some(example) = &report.sample_outputs.structured_example {
        out.push_str(&banner("SAMPLE OUTPUT - STRUCTURED TEMPLATE"));
        let _ = writeln!(out, "{example}");
    }

    out
}

/// Printed instead of running when no API key is configured.
pub fn demo_mode_notice(iterations: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "WARNING: OPENAI_API_KEY not set!");
    let _ = writeln!(out, "Set it with: export OPENAI_API_KEY='your-key-here'");
    let _ = writeln!(out, "\nRunning in DEMO MODE, no API calls will be made.\n");
    out.push_str(&banner("DEMO MODE"));
    let _ = writeln!(out, "\nThis experiment would test {} prompt strategies:", Strategy::ALL.len());
    for (i, strategy) in Strategy::ALL.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} Prompting", i + 1, strategy.label());
    }
    let _ = writeln!(
        out,
        "\nEach strategy would be tested {iterations} times with real API calls."
    );
    let _ = writeln!(out, "\nTo run the real experiment: set OPENAI_API_KEY and run again.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;

    #[test]
    fn test_comparison_table_has_row_per_summary() {
        let report = sample_report();
        let table = comparison_table(&report.result.summaries);
        assert!(table.starts_with("Strategy"));
        // header + rule + 3 rows
        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("structured"));
        assert!(table.contains("100%"));
    }

    #[test]
    fn test_final_comparison_names_winner() {
        let text = final_comparison(&sample_report(), &WinnerWeights::default());
        assert!(text.contains("RECOMMENDED STRATEGY: STRUCTURED"));
        assert!(text.contains("Overall Score: 18.3"));
    }

    #[test]
    fn test_strategy_averages_block() {
        let report = sample_report();
        let few_shot = report.result.summary_for(Strategy::FewShot).unwrap();
        let block = strategy_averages(few_shot);
        assert!(block.contains("AVERAGE RESULTS - FEW_SHOT"));
        assert!(block.contains("Iterations:        1/2 succeeded"));
    }

    #[test]
    fn test_demo_display_includes_details_and_sample() {
        let text = demo_display(&sample_report());
        assert!(text.contains("Researcher: Ada"));
        assert!(text.contains("Date: 2025-11-25 12:00 UTC"));
        assert!(text.contains("WINNER: STRUCTURED"));
        assert!(text.contains("RECOMMENDATION"));
        assert!(text.contains("<questions>"));
    }

    #[test]
    fn test_demo_display_tolerates_missing_enrichment() {
        let mut report = sample_report();
        report.researcher = None;
        report.recommendation = None;
        report.sample_outputs.structured_example = None;
        report.result.winner = None;
        let text = demo_display(&report);
        assert!(text.contains("Researcher: unknown"));
        assert!(text.contains("WINNER: none"));
        assert!(!text.contains("SAMPLE OUTPUT"));
    }

    #[test]
    fn test_demo_mode_notice_lists_all_strategies() {
        let text = demo_mode_notice(3);
        assert!(text.contains("OPENAI_API_KEY not set"));
        assert!(text.contains("4. Structured (XML) Prompting"));
        assert!(text.contains("tested 3 times"));
    }
}
