use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use heart_advisor::{ChatCompletionsClient, HealthAdvisor};
use heart_artifacts::{ArtifactRegistry, DoctorReport, VerifySummary};
use heart_core::{InferencePipeline, SessionContext};
use heart_model::PatientProfile;
use heart_report::{AssessmentReport, ReportFormat, default_file_name, exporter_for, write_report};
use tracing::{info_span, warn};

use heart_cli::assess::{chat_loop, run_assessment};

use crate::cli::{AnalyzeArgs, ReportFormatArg};
use crate::summary::{print_assessment, print_schema};

pub fn run_analyze(args: &AnalyzeArgs, pipeline: &InferencePipeline) -> Result<()> {
    let span = info_span!("analyze_command");
    let _guard = span.enter();

    let profile = PatientProfile::new(&args.name, &args.symptoms)
        .context("please enter your name and symptoms")?;

    let client = if args.no_advice && !args.chat {
        None
    } else {
        match ChatCompletionsClient::from_env() {
            Ok(client) => Some(client),
            Err(error) => {
                warn!(%error, "AI assistant disabled");
                eprintln!("warning: {error}");
                None
            }
        }
    };
    let advisor = client.as_ref().map(|client| client as &dyn HealthAdvisor);
    let tips_advisor = if args.no_advice { None } else { advisor };

    let mut session = SessionContext::new();
    let outcome = run_assessment(
        pipeline,
        tips_advisor,
        profile.clone(),
        &args.observation(),
        &mut session,
    )?;
    print_assessment(&profile, &outcome);

    if args.chat {
        match advisor {
            Some(advisor) => {
                println!();
                println!("Ask me anything about heart health (type 'exit' to finish).");
                let stdin = io::stdin();
                let mut input = stdin.lock();
                chat_loop(advisor, &mut session, &mut input, &mut io::stdout())?;
            }
            None => eprintln!("warning: chat unavailable without an AI assistant"),
        }
    }

    if let Some(path) = &args.report {
        let format = report_format(args.report_format);
        let path = resolve_report_path(path, format);
        let report = AssessmentReport::from_session(&session, Utc::now())?;
        write_report(&report, exporter_for(format).as_ref(), &path)?;
        println!("Report: {}", path.display());
    }
    Ok(())
}

pub fn run_chat() -> Result<()> {
    let client = ChatCompletionsClient::from_env().context("configure AI assistant")?;
    let mut session = SessionContext::new();
    println!("Ask me anything about heart health (type 'exit' to finish).");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    chat_loop(&client, &mut session, &mut input, &mut io::stdout())?;
    Ok(())
}

pub fn run_schema(registry: &ArtifactRegistry) -> Result<()> {
    print_schema(&registry.schema);
    Ok(())
}

pub fn run_doctor(registry: &ArtifactRegistry, summary: &VerifySummary) -> Result<()> {
    let report = DoctorReport::from_registry(registry, summary);
    let json = serde_json::to_string_pretty(&report).context("serialize doctor report")?;
    println!("{json}");
    Ok(())
}

fn report_format(arg: ReportFormatArg) -> ReportFormat {
    match arg {
        ReportFormatArg::Markdown => ReportFormat::Markdown,
        ReportFormatArg::Json => ReportFormat::Json,
    }
}

fn resolve_report_path(path: &Path, format: ReportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(default_file_name(Local::now().date_naive(), format))
    } else {
        path.to_path_buf()
    }
}
