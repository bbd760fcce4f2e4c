use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use survey_cli::pipeline::VariableSummary;
use survey_model::PivotWarning;
use survey_pivot::VariableRole;

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Survey: {} ({})", result.survey_name, result.year);
    let format = result.output_format.extension();
    if result.written {
        println!("Output: {} [{format}]", result.output_path.display());
    } else {
        println!(
            "Output: {} [{format}] (dry run, not written)",
            result.output_path.display()
        );
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Respondents"), Cell::new(result.respondents)]);
    table.add_row(vec![Cell::new("Attributes"), Cell::new(result.attributes)]);
    table.add_row(vec![Cell::new("Questions pivoted"), Cell::new(result.questions)]);
    table.add_row(vec![Cell::new("Question groups"), Cell::new(result.groups)]);
    table.add_row(vec![Cell::new("Blank answers dropped"), dim_cell(result.dropped_rows)]);
    table.add_row(vec![
        Cell::new("Rows written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Warnings"),
        count_cell(result.warnings.len(), Color::Yellow),
    ]);
    println!("{table}");
    print_warning_table(&result.warnings);
}

fn print_warning_table(warnings: &[PivotWarning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Message")]);
    apply_wide_table_style(&mut table);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning_kind(warning)).fg(Color::Yellow),
            Cell::new(warning.to_string()),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
}

pub fn print_inspection(summaries: &[VariableSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Role"),
        header_cell("Name"),
        header_cell("Label"),
        header_cell("Codes"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.variable)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            role_cell(summary.role),
            Cell::new(&summary.display_name),
            Cell::new(&summary.label),
            match summary.domain_size {
                Some(size) => Cell::new(size),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn warning_kind(warning: &PivotWarning) -> &'static str {
    match warning {
        PivotWarning::MissingLabel { .. } => "missing label",
        PivotWarning::AttributeColumnMissing { .. } => "missing column",
        PivotWarning::WeightColumnMissing { .. } => "missing weight",
        PivotWarning::NonPositiveCode { .. } => "code <= 0",
        PivotWarning::DomainDiscontinuity { .. } => "code gap",
    }
}

fn role_cell(role: VariableRole) -> Cell {
    match role {
        VariableRole::Attribute => Cell::new("attribute"),
        VariableRole::Question => Cell::new("question").fg(Color::Green),
        VariableRole::AttributeAndQuestion => Cell::new("both")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
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
