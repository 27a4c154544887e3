use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use wrangle_cli::pipeline::{ExecutionMode, RunResult, StepReport};
use wrangle_directives::DirectiveRegistry;
use wrangle_model::{Row, Value};

pub fn print_summary(result: &RunResult, limit: usize, lineage_json: bool) -> anyhow::Result<()> {
    println!("{}", rows_table(&result.rows, limit));
    if result.rows.len() > limit {
        println!("... {} more rows", result.rows.len() - limit);
    }
    println!();
    if lineage_json {
        println!("{}", serde_json::to_string_pretty(&result.steps)?);
    } else {
        println!("Lineage:");
        println!("{}", lineage_table(&result.steps));
    }
    Ok(())
}

/// Render up to `limit` rows. The header follows the first row's column order.
pub fn rows_table(rows: &[Row], limit: usize) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    if let Some(first) = rows.first() {
        table.set_header(first.columns().map(header_cell).collect::<Vec<_>>());
    }
    for row in rows.iter().take(limit) {
        table.add_row(row.cells().map(|(_, value)| value_cell(value)).collect::<Vec<_>>());
    }
    table
}

pub fn lineage_table(steps: &[StepReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Step"),
        header_cell("Mode"),
        header_cell("Lineage"),
        header_cell("Relations"),
    ]);
    apply_table_style(&mut table);
    for (idx, report) in steps.iter().enumerate() {
        let (readable, relations) = match &report.lineage {
            Some(mutation) => (
                Cell::new(&mutation.readable),
                Cell::new(
                    mutation
                        .edges()
                        .into_iter()
                        .map(|(output, input)| format!("{output} <- {input}"))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&report.step),
            mode_cell(report.mode),
            readable,
            relations,
        ]);
    }
    table
}

pub fn directives_table(registry: &DirectiveRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Directive"),
        header_cell("Category"),
        header_cell("Usage"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for registration in registry.iter() {
        table.add_row(vec![
            Cell::new(registration.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(registration.category),
            Cell::new(registration.define().usage()),
            Cell::new(registration.description),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn mode_cell(mode: ExecutionMode) -> Cell {
    let cell = Cell::new(mode.as_str());
    match mode {
        ExecutionMode::Pushdown => cell.fg(Color::Green),
        ExecutionMode::RowWise => cell,
        ExecutionMode::Fallback => cell.fg(Color::Yellow),
    }
}

fn value_cell(value: &Value) -> Cell {
    if value.is_null() {
        dim_cell("null")
    } else {
        Cell::new(value)
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
