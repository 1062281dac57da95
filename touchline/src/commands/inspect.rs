// touchline/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table or a stored dataset (schema + sample rows).

use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::Path;

use touchline_core::domain::dataset::Dataset;

use super::project;

pub async fn execute(
    project_dir: &Path,
    table: Option<String>,
    key: Option<String>,
    raw: bool,
    limit: usize,
) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;

    let dataset = match (table, key) {
        (Some(table), _) => {
            println!("\n🔍 Inspecting Table: '{}'", table);
            let columns = ctx.warehouse.fetch_columns(&table).await?;
            if columns.is_empty() {
                anyhow::bail!(
                    "❌ Table '{}' not found\n👉 Have you run 'touchline load'?",
                    table
                );
            }
            let described: Vec<String> = columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.data_type))
                .collect();
            println!("   Columns: [{}]", described.join(", "));
            ctx.warehouse.preview(&table, limit).await?
        }
        (None, Some(key)) => {
            let object = if raw { ctx.raw(key) } else { ctx.cleaned(key) };
            println!("\n🔍 Inspecting Object: '{}'", object);
            let ds = ctx.read_dataset(&object).await?;
            println!("   {} rows x {} columns", ds.num_rows(), ds.num_columns());
            head(ds, limit)
        }
        (None, None) => anyhow::bail!("Either --table or --key is required"),
    };

    println!("   --- Rows (Limit {}) ---", limit);
    println!("{}", render(&dataset));
    Ok(())
}

fn head(ds: Dataset, limit: usize) -> Dataset {
    let mut count = 0;
    ds.filter_rows(|_| {
        count += 1;
        count <= limit
    })
}

fn render(ds: &Dataset) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(ds.columns());
    for row in ds.rows() {
        table.add_row(row.iter().map(|cell| cell.to_string()));
    }
    table
}
