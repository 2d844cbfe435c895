use crate::table::AggregateTable;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Render the table for the terminal, one line per run.
pub fn summary_table(table: &AggregateTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.header().into_iter().map(str::to_string));
    for row in table.rows() {
        builder.push_record(
            std::iter::once(row.level.to_string())
                .chain(row.values.iter().map(|value| float3(*value))),
        );
    }

    let mut rendered = builder.build();
    rendered.with(Style::modern());
    rendered.to_string()
}

pub fn print_summary(table: &AggregateTable) {
    println!("\nSummary of sweep");
    println!("{}", summary_table(table));
}

fn float3(n: f64) -> String {
    format!("{:.3}", n)
}
