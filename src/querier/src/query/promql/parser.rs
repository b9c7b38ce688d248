//! Thin wrapper around the promql-parser crate.
//!
//! Rendered templates are run through the grammar before they leave the
//! process so that a malformed template never reaches the backend.

use std::time::Duration;

use promql_parser::label::MatchOp;
use promql_parser::parser::{self, Expr, VectorSelector};

use crate::query::error::QuerierError;

/// Parse a PromQL query string into an AST expression
///
/// # Examples
/// ```ignore
/// use querier::query::promql::parser::parse;
///
/// let expr = parse("avg by (bridge, port)(rate(ovs_flow_flow_bytes_total[5m])*8)").unwrap();
/// ```
pub fn parse(query: &str) -> Result<Expr, QuerierError> {
    parser::parse(query).map_err(|e| {
        QuerierError::invalid_request(format!("query '{query}' does not parse: {e}"))
    })
}

/// Metric names selected by exact match anywhere in `expr`, in query order
pub fn selected_metrics(expr: &Expr) -> Vec<String> {
    let mut names = Vec::new();
    visit(expr, &mut |node| {
        if let Some(name) = selector(node).and_then(metric_name) {
            names.push(name.to_string());
        }
    });
    names
}

/// Range of the first matrix selector in `expr`
pub fn range_duration(expr: &Expr) -> Option<Duration> {
    match expr {
        Expr::MatrixSelector(ms) => Some(ms.range),
        other => children(other).into_iter().find_map(range_duration),
    }
}

fn metric_name(vs: &VectorSelector) -> Option<&str> {
    vs.matchers
        .matchers
        .iter()
        .find(|m| m.name == "__name__" && matches!(m.op, MatchOp::Equal))
        .map(|m| m.value.as_str())
        .or(vs.name.as_deref())
}

fn selector(expr: &Expr) -> Option<&VectorSelector> {
    match expr {
        Expr::VectorSelector(vs) => Some(vs),
        Expr::MatrixSelector(ms) => Some(&ms.vs),
        _ => None,
    }
}

fn visit<'a>(expr: &'a Expr, f: &mut impl FnMut(&'a Expr)) {
    f(expr);
    for child in children(expr) {
        visit(child, f);
    }
}

fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Call(call) => call.args.args.iter().map(|arg| &**arg).collect(),
        Expr::Aggregate(agg) => agg
            .param
            .iter()
            .map(|param| &**param)
            .chain([&*agg.expr])
            .collect(),
        Expr::Binary(bin) => vec![&*bin.lhs, &*bin.rhs],
        Expr::Paren(paren) => vec![&*paren.expr],
        Expr::Unary(unary) => vec![&*unary.expr],
        Expr::Subquery(sq) => vec![&*sq.expr],
        _ => Vec::new(),
    }
}
