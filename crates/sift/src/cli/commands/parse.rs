//! Implementation of `sift parse`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sift_query::{ParseResult, TermNode, parse};

use crate::cli::{
    args::ParseCommand,
    failure,
    output::{dim, subheader},
};

/// Shows the expression tree and term list for a query without reading any records.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let result = parse(&cmd.query);

    if cmd.json {
        return match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                failure()
            }
        };
    }

    print!("{}", render(&result));
    ExitCode::SUCCESS
}

/// Renders the human-readable report.
fn render(result: &ParseResult) -> String {
    let Some(root) = &result.root else {
        return format!("{}\n", dim("(empty query: matches every record)"));
    };

    let mut out = String::new();
    out.push_str(&subheader("Parsed tree:"));
    out.push('\n');
    for line in root.to_string().lines() {
        out.push_str("   ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&subheader("Normalized query:"));
    out.push('\n');
    out.push_str("   ");
    out.push_str(&root.to_query_string());
    out.push_str("\n\n");

    out.push_str(&subheader("Terms:"));
    out.push('\n');
    out.push_str(&terms_table(&result.terms).to_string());
    out.push('\n');
    out
}

/// Builds the term table.
fn terms_table(terms: &[TermNode]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Value", "Kind", "Fuzzy"]);
    for (i, term) in terms.iter().enumerate() {
        let kind = if term.is_phrase { "phrase" } else { "word" };
        let fuzzy = term
            .fuzzy_distance
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&term.value),
            Cell::new(kind),
            Cell::new(fuzzy),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_report() {
        let report = render(&parse("   "));
        assert!(report.contains("empty query"));
    }

    #[test]
    fn report_lists_tree_and_terms() {
        let report = render(&parse("\"hello world\" OR colour~1 NOT java"));
        assert!(report.contains("Parsed tree:"));
        assert!(report.contains("Phrase(\"hello world\")"));
        assert!(report.contains("Term(\"colour\")~1"));
        assert!(report.contains("Not"));
        assert!(report.contains("phrase"));
        assert!(report.contains("java"));
    }

    #[test]
    fn table_has_one_row_per_term() {
        let result = parse("a b c");
        let table = terms_table(&result.terms);
        assert_eq!(table.row_count(), 3);
    }
}
