use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use formgen_cli::types::{GenerationResult, OutputSummary};
use formgen_model::{LayoutDiagnostic, Severity};

pub fn print_summary(result: &GenerationResult) {
    println!("Form: {}", result.form_id);
    println!("Input: {}", result.input_dir.display());
    if result.dry_run {
        println!("Output: {} (dry run, nothing written)", result.form_dir.display());
    } else {
        println!("Output: {}", result.form_dir.display());
    }
    print_area_table(result);
    print_output_table(&result.outputs);
    println!(
        "Field links: {}  LOV fields filtered: {}",
        result.link_count, result.filtered_fields
    );
    print_diagnostic_table(&result.diagnostics);
}

fn print_area_table(result: &GenerationResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Area"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Explicit"),
        header_cell("Configured"),
        header_cell("Default"),
        header_cell("Panel"),
    ]);
    apply_table_style(&mut table);
    for column in 2..=6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for area in &result.areas {
        let area_cell = if area.fields == 0 {
            dim_cell(area.area)
        } else {
            Cell::new(area.area)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            area_cell,
            Cell::new(&area.title),
            Cell::new(area.fields),
            count_cell(area.explicit),
            count_cell(area.configured),
            count_cell(area.defaulted),
            count_cell(area.static_panel),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.field_count()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_output_table(outputs: &[OutputSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Kind"),
        header_cell("Bytes"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for output in outputs {
        let file_name = output
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let status = if output.written {
            Cell::new("written").fg(Color::Green)
        } else {
            dim_cell("planned")
        };
        table.add_row(vec![
            Cell::new(file_name),
            Cell::new(output.kind),
            Cell::new(output.bytes),
            status,
        ]);
    }
    println!("{table}");
}

fn print_diagnostic_table(diagnostics: &[LayoutDiagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let mut ordered: Vec<&LayoutDiagnostic> = diagnostics.iter().collect();
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diagnostic in ordered {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(format!("{:?}", diagnostic.kind)),
            Cell::new(&diagnostic.subject),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!("{table}");
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => dim_cell("INFO"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
