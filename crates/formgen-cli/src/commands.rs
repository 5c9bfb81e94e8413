use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use formgen_cli::config::GeneratorConfig;
use formgen_cli::pipeline::run_generation;
use formgen_cli::types::GenerationResult;
use formgen_layout::AreaResolver;

use crate::cli::GenerateArgs;
use crate::summary::{align_column, apply_table_style, header_cell};

pub fn run_generate(args: &GenerateArgs) -> Result<GenerationResult> {
    let config = GeneratorConfig::resolve(args.config.as_deref(), &args.overrides())?;
    let span = info_span!("run", form_id = config.form_id.as_deref().unwrap_or("-"));
    let _guard = span.enter();
    run_generation(&config, args.dry_run)
}

pub fn run_panels() {
    let resolver = AreaResolver::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Panel"),
        header_cell("Area"),
        header_cell("Field"),
        header_cell("Nature"),
        header_cell("Sort"),
        header_cell("Column"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for panel in resolver.catalog().panels() {
        for field in &panel.fields {
            table.add_row(vec![
                Cell::new(&panel.id),
                Cell::new(panel.area),
                Cell::new(field.id()),
                Cell::new(&field.definition.nature),
                Cell::new(field.sort_number),
                Cell::new(field.column_number),
                Cell::new(field.definition.label.as_deref().unwrap_or_default()),
            ]);
        }
    }
    println!("{table}");
}
