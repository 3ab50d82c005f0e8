//! Results reporting

use serde::{Deserialize, Serialize};
use std::path::Path;

use spanqa::{EvaluationReport, Example, Inspection};

use crate::dataset::find_example;

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub model: String,
    pub scored: usize,
    pub failed: usize,
    pub mean_exact_match: f64,
    pub mean_f1: f64,
    pub examples: Vec<ExampleRecord>,
    pub failures: Vec<FailureRecord>,
}

/// Per-example line of the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub answer: String,
    pub exact_match: f64,
    pub f1: f64,
}

/// An example left out of the means
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: String,
    pub error: String,
}

impl JsonSummary {
    /// Create from an evaluation report
    pub fn from_report(run_id: impl Into<String>, report: &EvaluationReport) -> Self {
        let summary = report.summary();
        let examples = report
            .outcomes
            .iter()
            .map(|o| ExampleRecord {
                id: o.id.clone(),
                start: o.span.start(),
                end: o.span.end(),
                answer: o.answer.clone(),
                exact_match: o.metrics.exact_match,
                f1: o.metrics.f1,
            })
            .collect();
        let failures = report
            .failures
            .iter()
            .map(|f| FailureRecord {
                id: f.id.clone(),
                error: f.error.clone(),
            })
            .collect();

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: report.model.clone(),
            scored: summary.scored,
            failed: summary.failed,
            mean_exact_match: summary.mean_exact_match,
            mean_f1: summary.mean_f1,
            examples,
            failures,
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Generate a console report, with diagnostics for the first `show` outcomes
pub fn print_console_report(report: &EvaluationReport, examples: &[Example], show: usize) {
    let summary = report.summary();

    println!("\n=== Span QA Evaluation ===\n");
    println!("Model: {}", report.model);
    println!("Scored: {}  Failed: {}\n", summary.scored, summary.failed);
    println!("Exact Match: {:.4}", summary.mean_exact_match);
    println!("F1:          {:.4}", summary.mean_f1);

    if !report.failures.is_empty() {
        println!("\nFailures:");
        println!("{:-<50}", "");
        for failure in &report.failures {
            println!("  {}: {}", failure.id, failure.error);
        }
    }

    if show > 0 && !report.outcomes.is_empty() {
        println!("\nExamples:");
        println!("{:-<50}", "");
        for outcome in report.outcomes.iter().take(show) {
            println!("  [{}] span {}", outcome.id, outcome.span);
            if let Some(example) = find_example(examples, &outcome.id) {
                println!("    Q: {}", example.question);
                println!("    References: {}", example.answers.join(" | "));
            }
            println!("    Answer: {}", outcome.answer);
            println!(
                "    EM {:.0}  F1 {:.3}",
                outcome.metrics.exact_match, outcome.metrics.f1
            );
        }
    }

    println!("\n{:=<50}", "");
}

/// Print a single-example diagnostic
pub fn print_inspection(inspection: &Inspection) {
    let outcome = &inspection.outcome;

    println!("\n=== Example {} ===\n", outcome.id);
    println!("Question: {}", inspection.question);
    println!("Context:  {}", inspection.context);
    println!(
        "Tokens:   {} valid of {} padded",
        inspection.valid_len,
        inspection.scores.padded_len()
    );
    println!("\nSpan:     {} (score {:.6})", outcome.span, inspection.span_score);
    println!("Answer:   {}", outcome.answer);

    println!("\nReferences:");
    for (i, reference) in inspection.references.iter().enumerate() {
        println!("  {}. {:?}", i + 1, reference);
    }

    println!(
        "\nExact Match: {:.0}  F1: {:.4}",
        outcome.metrics.exact_match, outcome.metrics.f1
    );
}
