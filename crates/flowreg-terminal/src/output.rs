//! Plain-text rendering of tables, notices and gate decisions.

use flowreg_app::{error_notice, ErrorCategory, GateDecision, Notice, TableState, Tabular};
use flowreg_core::ConsoleError;
use std::fmt::Write as _;

use crate::cli::ListArgs;

/// Apply `--search`, `--exact`, `--sort` and `--desc` to a table.
///
/// Returns an error naming the column when `--sort` is unknown or fixed.
pub fn apply_list_args<T: Tabular>(table: &mut TableState<T>, args: &ListArgs) -> Result<(), String> {
    table.set_fuzzy(!args.exact);
    for term in &args.search {
        table.add_search_term(term.as_str());
    }

    let column = match &args.sort {
        Some(column) => column.clone(),
        None if args.desc => match flowreg_app::views::active_column(table.columns()) {
            Some(active) => active.name.clone(),
            None => return Ok(()),
        },
        None => return Ok(()),
    };
    let order = if args.desc {
        flowreg_app::SortOrder::Desc
    } else {
        flowreg_app::SortOrder::Asc
    };
    if table.set_sort(&column, order) {
        Ok(())
    } else {
        let sortable: Vec<&str> = table
            .columns()
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.name.as_str())
            .collect();
        Err(format!(
            "cannot sort by '{column}' (sortable: {})",
            sortable.join(", ")
        ))
    }
}

/// Render the displayed rows under a header of column labels.
pub fn render_table<T: Tabular>(table: &TableState<T>) -> String {
    let columns = table.columns();
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.field(&c.name).map(|v| v.into_owned()).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| header(c).chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let headers: Vec<String> = columns.iter().map(header).collect();
    push_line(&mut out, &headers, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    let _ = write!(out, "{} of {} shown", rows.len(), table.records().len());
    out
}

fn header(column: &flowreg_app::ColumnDescriptor) -> String {
    if column.active {
        let arrow = match column.sort_order {
            flowreg_app::SortOrder::Asc => '^',
            flowreg_app::SortOrder::Desc => 'v',
        };
        format!("{} {arrow}", column.label)
    } else {
        column.label.clone()
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// One-line rendering of a notice.
pub fn render_notice(notice: &Notice) -> String {
    format!("{} {}: {}", notice.level().indicator(), notice.title(), notice.message())
}

/// Notice for a failed operation plus the category's recovery hint.
pub fn render_error(error: &ConsoleError) -> String {
    let category = ErrorCategory::of(error);
    format!(
        "{}\n  {}",
        render_notice(&error_notice(error)),
        category.resolution_hint()
    )
}

/// One line describing a gate decision for `url`.
pub fn render_decision(url: &str, decision: &GateDecision) -> String {
    match decision {
        GateDecision::Allow => format!("allowed: {url}"),
        GateDecision::Redirect { to, notice } => match notice {
            Some(notice) => format!("redirected to {to}\n{}", render_notice(notice)),
            None => format!("redirected to {to}"),
        },
        GateDecision::Stay { error } => {
            render_notice(&Notice::error(error.body()))
        }
        GateDecision::Superseded => format!("navigation to {url} was superseded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowreg_app::workflows::buckets::bucket_table;
    use flowreg_app::Route;
    use flowreg_core::Bucket;

    fn bucket(id: &str, name: &str) -> Bucket {
        Bucket {
            identifier: id.into(),
            name: name.into(),
            ..Bucket::default()
        }
    }

    #[test]
    fn test_render_table_aligns_and_counts() {
        let mut table = bucket_table();
        table.set_records(vec![bucket("b-1", "prod"), bucket("b-22", "dev")]);
        table.add_search_term("b-22");

        let rendered = render_table(&table);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Bucket Name ^  Bucket ID  Created");
        assert_eq!(lines[1], "dev            b-22");
        assert_eq!(lines[2], "1 of 2 shown");
    }

    #[test]
    fn test_list_args_sort_and_exact() {
        let mut table = bucket_table();
        table.set_records(vec![bucket("b-1", "prod"), bucket("b-2", "production")]);

        let args = ListArgs {
            search: vec!["PROD".into()],
            exact: true,
            sort: Some("createdTimestamp".into()),
            desc: true,
        };
        apply_list_args(&mut table, &args).unwrap();

        assert!(!table.is_fuzzy());
        assert_eq!(table.rows().len(), 1);
        let active = flowreg_app::views::active_column(table.columns()).unwrap();
        assert_eq!(active.name, "createdTimestamp");
        assert_eq!(active.sort_order, flowreg_app::SortOrder::Desc);
    }

    #[test]
    fn test_list_args_rejects_fixed_column() {
        let mut table = bucket_table();
        let args = ListArgs {
            sort: Some("identifier".into()),
            ..ListArgs::default()
        };
        let err = apply_list_args(&mut table, &args).unwrap_err();
        assert!(err.contains("name, createdTimestamp"));
    }

    #[test]
    fn test_render_redirect_with_notice() {
        let decision = GateDecision::redirect_with(Route::Explorer, Notice::AccessDenied);
        let rendered = render_decision("/administration/users", &decision);
        assert!(rendered.starts_with("redirected to /explorer/grid-list\n"));
        assert!(rendered.contains(Notice::AccessDenied.title()));
    }
}
