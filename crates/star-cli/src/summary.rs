use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{NormalizeRun, TableKind, TableSummary};

pub fn print_summary(result: &NormalizeRun) {
    println!("Input: {} ({} rows)", result.input.display(), result.input_rows);
    if result.dry_run {
        println!("Output: dry run, nothing written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.manifest {
        println!("Manifest: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Kind"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("File"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in &result.tables {
        table.add_row(vec![
            table_cell(summary),
            dim_cell(summary.kind.label()),
            Cell::new(summary.rows),
            Cell::new(summary.columns),
            file_cell(summary),
        ]);
    }
    println!("{table}");
    print_issue_table(result);
}

fn print_issue_table(result: &NormalizeRun) {
    if result.issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Issue"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    for issue in &result.issues {
        table.add_row(vec![
            Cell::new(&issue.table),
            Cell::new(&issue.column),
            Cell::new(issue.kind.as_str()).fg(Color::Red),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Integrity issues:");
    println!("{table}");
    eprintln!("{} integrity issue(s); no tables written", result.issues.len());
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn table_cell(summary: &TableSummary) -> Cell {
    match summary.kind {
        TableKind::Fact => Cell::new(&summary.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        TableKind::Dimension => Cell::new(&summary.name),
    }
}

fn file_cell(summary: &TableSummary) -> Cell {
    match &summary.file {
        Some(path) => Cell::new(path.display()).fg(Color::Green),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
