//! Plain-text renderings of a statement.

use tally_statements::Statement;

const LABEL_WIDTH: usize = 44;
const VALUE_WIDTH: usize = 16;

fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
    }
}

fn indented_label(label: &str, depth: usize) -> String {
    let mut text = format!("{}{label}", "  ".repeat(depth));
    if text.chars().count() > LABEL_WIDTH {
        text = text.chars().take(LABEL_WIDTH - 1).collect();
        text.push('~');
    }
    text
}

/// Renders a fixed-width table with one column per period.
pub fn to_ascii_table(statement: &Statement) -> String {
    let width = LABEL_WIDTH + (VALUE_WIDTH + 1) * statement.periods.len();
    let mut output = String::new();

    output.push_str(&format!("\n{}", statement.kind));
    if statement.fallback {
        output.push_str(" (fallback)");
    }
    output.push_str(&format!("  [confidence: {}]\n", statement.confidence));
    output.push_str(&"=".repeat(width));
    output.push('\n');

    output.push_str(&format!("{:<LABEL_WIDTH$}", ""));
    for period in &statement.periods {
        output.push_str(&format!(" {:>VALUE_WIDTH$}", period.label));
    }
    output.push('\n');
    output.push_str(&"-".repeat(width));
    output.push('\n');

    for row in &statement.rows {
        output.push_str(&format!("{:<LABEL_WIDTH$}", indented_label(&row.label, row.depth)));
        if !row.is_abstract {
            for column in 0..statement.periods.len() {
                output.push_str(&format!(" {:>VALUE_WIDTH$}", format_value(row.value(column))));
            }
        }
        output.push('\n');
        if row.is_total {
            output.push_str(&"-".repeat(width));
            output.push('\n');
        }
    }

    for warning in &statement.warnings {
        output.push_str(&format!("! {warning}\n"));
    }
    output
}

/// Renders a markdown table; headings are bold, totals are italic.
pub fn to_markdown(statement: &Statement) -> String {
    let mut output = format!("## {}\n\n", statement.kind);

    output.push_str("| Line |");
    for period in &statement.periods {
        output.push_str(&format!(" {} |", period.label));
    }
    output.push_str("\n|------|");
    for _ in &statement.periods {
        output.push_str("---:|");
    }
    output.push('\n');

    for row in &statement.rows {
        let indent = "&nbsp;&nbsp;".repeat(row.depth);
        let label = if row.is_abstract {
            format!("**{}**", row.label)
        } else if row.is_total {
            format!("*{}*", row.label)
        } else {
            row.label.clone()
        };
        output.push_str(&format!("| {indent}{label} |"));
        for column in 0..statement.periods.len() {
            let cell = if row.is_abstract {
                String::new()
            } else {
                format_value(row.value(column))
            };
            output.push_str(&format!(" {cell} |"));
        }
        output.push('\n');
    }

    if !statement.warnings.is_empty() {
        output.push_str("\n**Warnings**\n\n");
        for warning in &statement.warnings {
            output.push_str(&format!("- {warning}\n"));
        }
    }
    output
}
