use crate::cli::{CacheCommand, ProfileCommand};
use anyhow::Context;
use candor::Candor;
use candor::cache::parse_analysis;
use candor::domain::AnalysisRecord;
use candor::profile::ProfileStatus;
use std::io::Write;

pub(crate) async fn profile(
    core: &Candor,
    command: ProfileCommand,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Status => {
            let status = match core.profiles.status().await? {
                ProfileStatus::Saved => "saved",
                ProfileStatus::NoSavedProfile => "no saved profile",
            };
            writeln!(out, "{status}")?;
        },
        ProfileCommand::Save { text, file, passphrase } => {
            let profile = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Provide the profile text or --file"),
            };
            core.profiles.save(&profile, &passphrase.passphrase).await?;
            writeln!(out, "Profile saved")?;
        },
        ProfileCommand::Unlock { passphrase } => {
            let profile = core.profiles.unlock(&passphrase.passphrase).await?;
            writeln!(out, "{profile}")?;
        },
        ProfileCommand::Clear => {
            core.profiles.clear().await?;
            writeln!(out, "Profile cleared")?;
        },
    }
    Ok(())
}

pub(crate) async fn cache(
    core: &Candor,
    command: CacheCommand,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        CacheCommand::Lookup { name, json } => {
            let Some(record) = core.cache.lookup(&name).await else {
                anyhow::bail!("No cached analysis for '{name}'");
            };
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                render(&record, out)?;
            }
        },
        CacheCommand::List => {
            for subject in core.cache.list_known_subjects().await {
                writeln!(out, "{subject}")?;
            }
        },
        CacheCommand::Import { file, name } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let record = parse_analysis(&raw)?;
            let name = name.unwrap_or_else(|| record.subject_name.clone());

            let outcome = core.cache.store(&name, record).await;
            match outcome.warning {
                Some(warning) => writeln!(out, "Imported '{name}' (not persisted: {warning})")?,
                None => writeln!(out, "Imported '{name}'")?,
            }
        },
    }
    Ok(())
}

fn render(record: &AnalysisRecord, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", record.subject_name)?;
    for (dimension, scored) in record.dimension_scores.iter() {
        writeln!(out, "\n{:<26}{:>5.1}", dimension.id(), scored.score.value())?;
        writeln!(out, "  {}", dimension.description())?;
        for evidence in &scored.evidence {
            writeln!(out, "  - {evidence}")?;
        }
    }
    if !record.narrative_summary.is_empty() {
        writeln!(out, "\n{}", record.narrative_summary)?;
    }
    Ok(())
}
