//! Subcommand implementations.

use anyhow::{Context, Result, bail};
use comfy_table::{Table, presets};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use onboard_client::{HttpApi, OnboardingApi, UploadRequest};
use onboard_model::{CanonicalCatalog, FileType, OverallStatus, UploadSession};
use onboard_wizard::{WizardController, WizardStep};

use crate::cli::{CatalogArgs, RunArgs, StatusArgs};

pub fn run_catalog(args: &CatalogArgs) -> Result<()> {
    let file_types: Vec<FileType> = match args.file_type {
        Some(file_type) => vec![file_type],
        None => FileType::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(vec!["File Type", "Canonical Field", "Type", "Required"]);
    for file_type in file_types {
        for field in CanonicalCatalog::fields_for(file_type) {
            table.add_row(vec![
                file_type.to_string(),
                field.name.to_string(),
                field.semantic_type.to_string(),
                if field.required { "yes" } else { "" }.to_string(),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

pub async fn run_status(server: &str, args: &StatusArgs) -> Result<()> {
    let api = HttpApi::new(server).context("create client")?;
    let session = api
        .get_status(&args.upload_id)
        .await
        .context("fetch status")?
        .normalize();
    print_session(&session);
    Ok(())
}

pub async fn run_onboard(server: &str, args: &RunArgs) -> Result<()> {
    let api = HttpApi::new(server).context("create client")?;
    let mut wizard = WizardController::new(api);

    wizard.begin_upload()?;
    let request = UploadRequest {
        policy: Some(args.policy.clone()),
        claim: args.claim.clone(),
        cancel: args.cancel.clone(),
    };
    let receipt = wizard.upload(&request).await.context("upload files")?;
    let upload_id = receipt.upload_id.clone();
    println!("Uploaded as session {upload_id}");

    wizard.enter_mapping().await.context("detect fields")?;

    let report = wizard.validation();
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if args.show_mapping {
        print_mapping(&wizard);
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("error: {error}");
        }
        bail!(
            "mapping validation failed with {} error(s); fix the source headers or adjust the mapping",
            report.error_count()
        );
    }
    info!(warnings = report.warning_count(), "mapping validated");

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos:>3}% {msg}").context("progress template")?,
    );
    wizard
        .submit_and_track(|session| {
            bar.set_position((session.aggregate_progress() * 100.0).round() as u64);
            bar.set_message(session.overall.to_string());
        })
        .await?;
    bar.finish_and_clear();

    if let Some(session) = wizard.last_session() {
        print_session(session);
    }
    match wizard.step() {
        WizardStep::Complete => {
            println!("Onboarding complete.");
            Ok(())
        }
        _ if wizard.processing_failed() => {
            bail!("transformation failed; see job messages above")
        }
        step => bail!("wizard stopped at {step}"),
    }
}

fn print_mapping<A: OnboardingApi>(wizard: &WizardController<A>) {
    let Some(state) = wizard.mapping_state() else {
        return;
    };
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(vec![
        "File Type",
        "Source Field",
        "Canonical Field",
        "Populated %",
        "Confidence",
    ]);
    for mapping in state.mappings() {
        table.add_row(vec![
            mapping.file_type.to_string(),
            mapping.source_field.clone(),
            mapping.canonical_field.clone().unwrap_or_default(),
            format!("{:.1}", mapping.populated_pct),
            format!("{:.2}", mapping.confidence),
        ]);
    }
    println!("{table}");
}

fn print_session(session: &UploadSession) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(vec!["File Type", "Status", "Progress", "Message"]);
    for job in &session.jobs {
        table.add_row(vec![
            job.file_type.to_string(),
            job.status.to_string(),
            format!("{:.0}%", job.progress * 100.0),
            job.message.clone(),
        ]);
    }
    println!("{table}");
    let marker = match session.overall {
        OverallStatus::Done => "✓",
        OverallStatus::Failed => "✗",
        _ => "…",
    };
    println!("{marker} overall: {}", session.overall);
}
