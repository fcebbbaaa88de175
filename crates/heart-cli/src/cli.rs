//! CLI argument definitions for HeartAlert.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use heart_model::{ChestPainType, ExerciseAngina, Gender, RawObservation, RestingEcg, StSlope};

#[derive(Parser)]
#[command(
    name = "heartalert",
    version,
    about = "HeartAlert - heart disease risk assessment",
    long_about = "Assess heart disease risk from clinical measurements.\n\n\
                  Encodes the measurements, aligns them to the trained feature schema,\n\
                  scales and classifies them with a verified model bundle, and can ask\n\
                  an AI assistant for follow-up health tips."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding manifest.toml and the model artifacts.
    #[arg(
        long = "artifacts",
        value_name = "DIR",
        env = "HEARTALERT_ARTIFACTS",
        default_value = "artifacts",
        global = true
    )]
    pub artifacts: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one set of measurements.
    Analyze(Box<AnalyzeArgs>),

    /// Chat with the heart health assistant.
    Chat,

    /// Print the feature schema the model was trained on.
    Schema,

    /// Verify the artifact bundle and print a JSON report.
    Doctor,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Patient name.
    #[arg(long = "name")]
    pub name: String,

    /// Describe the symptoms (chest pain, breathlessness, fatigue, ...).
    #[arg(long = "symptoms")]
    pub symptoms: String,

    /// Age in years (18-100).
    #[arg(long = "age", default_value_t = 40)]
    pub age: u16,

    /// Sex: M or F.
    #[arg(long = "gender", default_value = "M")]
    pub gender: Gender,

    /// Chest pain type: ATA, NAP, TA or ASY.
    #[arg(long = "chest-pain", default_value = "ATA")]
    pub chest_pain: ChestPainType,

    /// Resting blood pressure in mm Hg (80-200).
    #[arg(long = "resting-bp", default_value_t = 120)]
    pub resting_bp: u16,

    /// Serum cholesterol in mg/dL (100-600).
    #[arg(long = "cholesterol", default_value_t = 200)]
    pub cholesterol: u16,

    /// Fasting blood sugar above 120 mg/dL: 1 or 0.
    #[arg(
        long = "fasting-bs",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    pub fasting_bs: u8,

    /// Resting ECG: Normal, ST or LVH.
    #[arg(long = "resting-ecg", default_value = "Normal")]
    pub resting_ecg: RestingEcg,

    /// Maximum heart rate achieved (60-220).
    #[arg(long = "max-hr", default_value_t = 150)]
    pub max_hr: u16,

    /// Exercise-induced angina: Y or N.
    #[arg(long = "exercise-angina", default_value = "N")]
    pub exercise_angina: ExerciseAngina,

    /// ST depression induced by exercise (0.0-6.0).
    #[arg(long = "oldpeak", default_value_t = 1.0)]
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment: Up, Flat or Down.
    #[arg(long = "st-slope", default_value = "Up")]
    pub st_slope: StSlope,

    /// Skip the AI health tips.
    #[arg(long = "no-advice")]
    pub no_advice: bool,

    /// Continue with a follow-up chat after the result.
    #[arg(long = "chat")]
    pub chat: bool,

    /// Write a report to this file, or into this directory with the default name.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Report format.
    #[arg(long = "report-format", value_enum, default_value = "markdown")]
    pub report_format: ReportFormatArg,

    /// Fail when the encoder produces columns the schema does not have.
    #[arg(long = "strict-columns")]
    pub strict_columns: bool,
}

impl AnalyzeArgs {
    pub fn observation(&self) -> RawObservation {
        RawObservation {
            age: self.age,
            resting_bp: self.resting_bp,
            cholesterol: self.cholesterol,
            fasting_bs: self.fasting_bs == 1,
            max_hr: self.max_hr,
            oldpeak: self.oldpeak,
            gender: self.gender,
            chest_pain: self.chest_pain,
            resting_ecg: self.resting_ecg,
            exercise_angina: self.exercise_angina,
            st_slope: self.st_slope,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Markdown,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
