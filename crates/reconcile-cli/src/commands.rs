use colored::Colorize;
use reconcile_diff::{two_way, TwoWayDiff};
use reconcile_merge::{three_way_with, Changeset, MergeConfig, MergeReport};
use reconcile_types::Record;
use serde_json::json;

use crate::cli::*;
use crate::config::CliConfig;
use crate::snapshot;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output);
    let output = match cli.command {
        Command::Diff(args) => cmd_diff(args, format)?,
        Command::Merge(args) => cmd_merge(args, config.merge, format)?,
    };
    println!("{output}");
    Ok(())
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<String> {
    let theirs = snapshot::load(&args.theirs)?;
    let mine = snapshot::load(&args.mine)?;
    let diff = two_way(&theirs, &mine);
    render_diff(&diff, format)
}

fn cmd_merge(args: MergeArgs, mut config: MergeConfig, format: OutputFormat) -> anyhow::Result<String> {
    if let Some(tie_break) = args.tie_break {
        config.tie_break = tie_break;
    }

    let reference = snapshot::load_or_empty(args.reference.as_deref())?;
    let theirs = snapshot::load(&args.theirs)?;
    let mine = snapshot::load(&args.mine)?;

    let mut changeset = Changeset::new();
    let report = three_way_with(
        &config,
        &reference,
        &theirs,
        &mine,
        &mut changeset.added,
        &mut changeset.removed,
    )?;

    let mut output = render_merge(&changeset, &report, format)?;
    if let Some(path) = &args.apply {
        let merged = changeset.apply(&mine);
        snapshot::save(path, &merged)?;
        if format == OutputFormat::Text {
            output.push_str(&format!(
                "\n{} Wrote {} records to {}",
                "✓".green().bold(),
                merged.len(),
                path.display().to_string().bold()
            ));
        }
    }
    Ok(output)
}

fn render_diff(diff: &TwoWayDiff<'_, Record>, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "added": diff.added,
            "removed": diff.removed,
        }))?),
        OutputFormat::Text => {
            if diff.is_empty() {
                return Ok("No differences.".into());
            }
            let mut lines = Vec::new();
            lines.extend(diff.removed.iter().map(|r| removed_line(r)));
            lines.extend(diff.added.iter().map(|r| added_line(r)));
            lines.push(format!(
                "{} added, {} removed",
                diff.added.len().to_string().green(),
                diff.removed.len().to_string().red()
            ));
            Ok(lines.join("\n"))
        }
    }
}

fn render_merge(
    changeset: &Changeset<'_, Record>,
    report: &MergeReport,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
            "added": changeset.added,
            "removed": changeset.removed,
            "report": report,
        }))?),
        OutputFormat::Text => {
            let mut lines = Vec::new();
            if changeset.is_empty() {
                lines.push("Already up to date.".to_string());
            }
            lines.extend(changeset.removed.iter().map(|r| removed_line(r)));
            lines.extend(changeset.added.iter().map(|r| added_line(r)));
            for conflict in &report.conflicts {
                lines.push(format!(
                    "  {} {} ({:?})",
                    "conflict:".yellow(),
                    conflict.id,
                    conflict.resolution
                ));
            }
            lines.push(format!(
                "{} identities: {} unchanged, {} adopted, {} kept local, {} converged, {} conflicts",
                report.identities,
                report.unchanged,
                report.adopted,
                report.kept_mine,
                report.converged,
                report.conflicts.len()
            ));
            Ok(lines.join("\n"))
        }
    }
}

fn added_line(record: &Record) -> String {
    format!("{} {} {}", "+".green().bold(), record.id, record.data.to_string().dimmed())
}

fn removed_line(record: &Record) -> String {
    format!("{} {}", "-".red().bold(), record.id)
}
