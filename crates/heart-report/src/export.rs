//! Report exporters.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use heart_model::ChatRole;
use tracing::info;

use crate::report::AssessmentReport;

/// Output format of an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(anyhow!("unknown report format: {other}")),
        }
    }
}

/// `HeartAlert_Report_YYYYMMDD.<ext>`
pub fn default_file_name(date: NaiveDate, format: ReportFormat) -> String {
    format!(
        "HeartAlert_Report_{}.{}",
        date.format("%Y%m%d"),
        format.extension()
    )
}

/// Renders an [`AssessmentReport`] to a byte sink.
pub trait ReportExporter: Send + Sync {
    fn format(&self) -> ReportFormat;

    fn export(&self, report: &AssessmentReport, out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

pub fn exporter_for(format: ReportFormat) -> Box<dyn ReportExporter> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownExporter),
        ReportFormat::Json => Box::new(JsonExporter),
    }
}

/// Export a report to `path`, creating or truncating the file.
pub fn write_report(
    report: &AssessmentReport,
    exporter: &dyn ReportExporter,
    path: &Path,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    exporter
        .export(report, &mut writer)
        .with_context(|| format!("write report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush report {}", path.display()))?;
    info!(path = %path.display(), format = %exporter.format(), "report written");
    Ok(())
}

impl ReportExporter for JsonExporter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn export(&self, report: &AssessmentReport, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report).context("serialize report")?;
        writeln!(out)?;
        Ok(())
    }
}

impl ReportExporter for MarkdownExporter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }

    fn export(&self, report: &AssessmentReport, out: &mut dyn Write) -> Result<()> {
        let o = &report.observation;
        writeln!(out, "# HeartAlert Assessment Report")?;
        writeln!(out)?;
        writeln!(
            out,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(out)?;

        writeln!(out, "## Patient")?;
        writeln!(out)?;
        writeln!(out, "- Name: {}", report.profile.name)?;
        writeln!(out, "- Symptoms: {}", report.profile.symptoms)?;
        writeln!(out)?;

        writeln!(out, "## Health Details")?;
        writeln!(out)?;
        writeln!(out, "| Field | Value |")?;
        writeln!(out, "|---|---|")?;
        let rows: [(&str, String); 11] = [
            ("Age", o.age.to_string()),
            ("Gender", o.gender.label().to_string()),
            ("Chest Pain Type", o.chest_pain.to_string()),
            ("Resting BP (mm Hg)", o.resting_bp.to_string()),
            ("Cholesterol (mg/dL)", o.cholesterol.to_string()),
            (
                "Fasting BS > 120 mg/dL",
                String::from(if o.fasting_bs { "Yes" } else { "No" }),
            ),
            ("Resting ECG", o.resting_ecg.to_string()),
            ("Max HR", o.max_hr.to_string()),
            ("Exercise Angina", o.exercise_angina.label().to_string()),
            ("Oldpeak", format!("{:.1}", o.oldpeak)),
            ("ST Slope", o.st_slope.to_string()),
        ];
        for (field, value) in rows {
            writeln!(out, "| {field} | {value} |")?;
        }
        writeln!(out)?;

        writeln!(out, "## Result")?;
        writeln!(out)?;
        writeln!(out, "{}", report.label.description())?;

        if let Some(tips) = &report.tips {
            writeln!(out)?;
            writeln!(out, "## Health Tips")?;
            writeln!(out)?;
            writeln!(out, "{}", tips.trim())?;
        }

        if !report.transcript.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Conversation")?;
            for message in &report.transcript {
                let speaker = match message.role {
                    ChatRole::User => "You",
                    ChatRole::Assistant | ChatRole::System => "HeartAlert",
                };
                writeln!(out)?;
                writeln!(out, "**{speaker}:** {}", message.content.trim())?;
            }
        }

        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(
            out,
            "This report is informational and is not a medical diagnosis."
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            default_file_name(date, ReportFormat::Markdown),
            "HeartAlert_Report_20260307.md"
        );
        assert_eq!(
            default_file_name(date, ReportFormat::Json),
            "HeartAlert_Report_20260307.json"
        );
    }

    #[test]
    fn format_parses_aliases() {
        assert_eq!("MD".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!(" json ".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
