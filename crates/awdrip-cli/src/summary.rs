use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use awdrip_cli::types::{BatchReport, FileOutcome, FileReport};

pub fn print_summary(report: &BatchReport) {
    println!(
        "Batch: {} ({} ms)",
        report.started_at.format("%Y-%m-%d %H:%M:%S"),
        report.duration.as_millis()
    );
    if report.files.is_empty() {
        println!("No source files processed.");
    } else {
        println!("{}", file_table(report));
    }
    if !report.skipped.is_empty() {
        println!();
        println!("Skipped directories:");
        for skipped in &report.skipped {
            println!(
                "- {} ({}): {}",
                skipped.source_id,
                skipped.path.display(),
                skipped.reason.label()
            );
        }
    }
    let failures: Vec<&FileReport> = report
        .files
        .iter()
        .filter(|file| file.outcome.is_failed())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for file in failures {
            if let FileOutcome::Failed(message) = &file.outcome {
                eprintln!("- {}: {message}", file.path.display());
            }
        }
    }
}

fn file_table(report: &BatchReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("File"),
        header_cell("Total"),
        header_cell("Processed"),
        header_cell("Ignored"),
        header_cell("Failed"),
        header_cell("Archive"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&file.source_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(name),
            Cell::new(file.tally.total),
            count_cell(file.tally.processed, Color::Green),
            count_cell(file.tally.ignored(), Color::Yellow),
            count_cell(file.tally.failed, Color::Red),
            outcome_cell(&file.outcome),
        ]);
    }
    let totals = report.totals();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} files", report.files.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals.total).add_attribute(Attribute::Bold),
        count_cell(totals.processed, Color::Green).add_attribute(Attribute::Bold),
        count_cell(totals.ignored(), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.failed, Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn outcome_cell(outcome: &FileOutcome) -> Cell {
    match outcome {
        FileOutcome::Archived(path) => Cell::new(path.display()),
        FileOutcome::Failed(_) => Cell::new("not archived")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
