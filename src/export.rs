//! Serializers for a finished [`AnalysisResult`]: JSON, CSV and a plain-text
//! report.

use chrono::{DateTime, Utc};

use crate::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Report,
}

impl ExportFormat {
    /// File name used when an export is written to disk.
    pub fn file_name(&self, millis: i64) -> String {
        match self {
            ExportFormat::Json => format!("argument-analysis-{millis}.json"),
            ExportFormat::Csv => format!("argument-analysis-{millis}.csv"),
            ExportFormat::Report => format!("argument-analysis-report-{millis}.txt"),
        }
    }
}

pub fn to_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One row per argument, then one per claim. Claims put their evidence in the
/// `Sources` column.
pub fn to_csv(result: &AnalysisResult) -> String {
    let mut rows = vec!["Type,Text,Confidence,Sources".to_string()];

    for arg in &result.arguments {
        rows.push(format!(
            "{},{},{},{}",
            quote(arg.kind.as_str()),
            quote(&arg.text),
            arg.confidence,
            quote(&arg.sources.join("; "))
        ));
    }

    for claim in &result.claims {
        rows.push(format!(
            "{},{},{},{}",
            quote("claim"),
            quote(&claim.text),
            claim.confidence,
            quote(&claim.evidence.join("; "))
        ));
    }

    rows.join("\n")
}

fn or_else(items: &[String], label: &str, separator: &str, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        format!("{label}: {}", items.join(separator))
    }
}

pub fn to_report(result: &AnalysisResult, generated_at: DateTime<Utc>) -> String {
    let stats = &result.statistics;
    let mut lines = vec![
        "ARGUMENT ANALYSIS REPORT".to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        "MAIN THESIS:".to_string(),
        result.main_thesis.clone(),
        String::new(),
        "ANALYSIS STATISTICS:".to_string(),
        format!("- Total Sentences: {}", stats.total_sentences),
        format!("- Argumentative Sentences: {}", stats.argumentative_sentences),
        format!("- Neutral Sentences: {}", stats.neutral_sentences),
        format!(
            "- Average Confidence: {}%",
            stats.average_confidence.round() as i64
        ),
        String::new(),
        format!("IDENTIFIED ARGUMENTS ({}):", result.arguments.len()),
    ];

    for (i, arg) in result.arguments.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "{}. [{}] ({}% confidence)",
            i + 1,
            arg.kind.as_str().to_uppercase(),
            arg.confidence
        ));
        lines.push(format!("   {}", arg.text));
        lines.push(format!(
            "   {}",
            or_else(&arg.sources, "Sources", ", ", "No sources identified")
        ));
    }

    lines.push(String::new());
    lines.push(format!("EXTRACTED CLAIMS ({}):", result.claims.len()));

    for (i, claim) in result.claims.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. ({}% confidence)", i + 1, claim.confidence));
        lines.push(format!("   {}", claim.text));
        lines.push(format!(
            "   {}",
            or_else(
                &claim.evidence,
                "Supporting Evidence",
                " | ",
                "No supporting evidence found"
            )
        ));
        lines.push(format!(
            "   {}",
            or_else(
                &claim.contradictions,
                "Contradictions",
                " | ",
                "No contradictions found"
            )
        ));
    }

    lines.push(String::new());
    lines.push("END OF REPORT".to_string());

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Render `result` in `format`.
pub fn render(
    result: &AnalysisResult,
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => to_json(result),
        ExportFormat::Csv => Ok(to_csv(result)),
        ExportFormat::Report => Ok(to_report(result, generated_at)),
    }
}
