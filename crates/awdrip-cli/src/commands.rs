use std::path::Path;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::{error, info, info_span};

use awdrip_catalog::Settings;
use awdrip_cli::pipeline::{BatchInputs, run_batch};
use awdrip_cli::types::BatchReport;
use awdrip_model::{FieldStrategy, OutputTemplate, SourceDirectory};

use crate::summary::apply_table_style;

/// Load the configuration documents and run one batch.
pub fn run_once(settings: &Settings) -> Result<BatchReport> {
    let inputs = BatchInputs::load(settings).context("load configuration documents")?;
    run_batch(settings, &inputs).context("run batch")
}

/// Run batches back to back at the configured interval.
///
/// Documents are reloaded before every batch. A failed batch is logged and
/// the loop carries on.
pub fn run_watch(settings: &Settings, max_runs: Option<u32>) -> Result<()> {
    let interval = settings.interval();
    info!(
        interval_minutes = settings.interval_minutes,
        max_runs = ?max_runs,
        "scheduler started"
    );
    let mut run = 0u32;
    loop {
        run += 1;
        let span = info_span!("scheduled_run", run);
        let started = Instant::now();
        span.in_scope(|| {
            if let Err(error) = run_once(settings) {
                error!(error = format!("{error:#}"), "batch failed");
            }
        });
        if max_runs.is_some_and(|max| run >= max) {
            info!(runs = run, "scheduler finished");
            return Ok(());
        }
        thread::sleep(interval.saturating_sub(started.elapsed()));
    }
}

/// Validate every configuration document and print what it defines.
pub fn run_check(settings_path: &Path, settings: &Settings) -> Result<()> {
    let inputs = BatchInputs::load(settings).context("load configuration documents")?;

    println!("Settings: {}", settings_path.display());
    println!("Template: {}", settings.template_path.display());
    println!("Reference: {}", settings.reference_path.display());
    println!(
        "Interval: {} min, delimiter {:?}",
        settings.interval_minutes, settings.delimiter
    );

    println!("{}", template_table(&inputs.template));

    let catalog = &inputs.reference.catalog;
    println!(
        "Catalog: {} destinations ({} exportable), {} status entries",
        catalog.destination_count(),
        catalog.exportable_count(),
        catalog.status_count()
    );

    println!("{}", sources_table(&inputs.reference.sources));
    Ok(())
}

fn template_table(template: &OutputTemplate) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Strategy", "Source"]);
    apply_table_style(&mut table);
    for field in template {
        let source = match &field.strategy {
            FieldStrategy::Literal { value } => format!("\"{value}\""),
            strategy => strategy.column().unwrap_or("-").to_string(),
        };
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(field.strategy.label()),
            Cell::new(source),
        ]);
    }
    table
}

fn sources_table(sources: &[SourceDirectory]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Source", "Path", "Directory"]);
    apply_table_style(&mut table);
    for source in sources {
        let state = if source.path.is_dir() {
            "exists"
        } else {
            "missing"
        };
        table.add_row(vec![
            Cell::new(&source.id),
            Cell::new(source.path.display()),
            Cell::new(state),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use awdrip_model::FieldTemplate;

    use super::*;

    #[test]
    fn template_table_lists_fields_in_order() {
        let template = OutputTemplate::new(vec![
            FieldTemplate::new(
                "POLN",
                FieldStrategy::Copy {
                    column: "PolicyNumber".to_string(),
                },
            ),
            FieldTemplate::new(
                "UNIT",
                FieldStrategy::Unit {
                    fallback_column: None,
                },
            ),
            FieldTemplate::new(
                "SOON",
                FieldStrategy::Literal {
                    value: "Y".to_string(),
                },
            ),
            FieldTemplate::new("STAT", FieldStrategy::Status),
        ]);
        let mut table = template_table(&template);
        table.force_no_tty();
        insta::assert_snapshot!(table.to_string(), @r#"
        ╭───────┬──────────┬──────────────╮
        │ Field ┆ Strategy ┆ Source       │
        ╞═══════╪══════════╪══════════════╡
        │ POLN  ┆ copy     ┆ PolicyNumber │
        │ UNIT  ┆ unit     ┆ -            │
        │ SOON  ┆ literal  ┆ "Y"          │
        │ STAT  ┆ status   ┆ -            │
        ╰───────┴──────────┴──────────────╯
        "#);
    }

    #[test]
    fn sources_table_flags_missing_directories() {
        let sources = vec![SourceDirectory {
            id: "claims".to_string(),
            path: PathBuf::from("/nonexistent/awdrip/claims"),
        }];
        let mut table = sources_table(&sources);
        table.force_no_tty();
        insta::assert_snapshot!(table.to_string(), @r"
        ╭────────┬────────────────────────────┬───────────╮
        │ Source ┆ Path                       ┆ Directory │
        ╞════════╪════════════════════════════╪═══════════╡
        │ claims ┆ /nonexistent/awdrip/claims ┆ missing   │
        ╰────────┴────────────────────────────┴───────────╯
        ");
    }
}
