//! Enforcement pack: custom lints for pipeline-core.
//!
//! ## Implemented Lints
//!
//! - `NO_PRINTLN`: Forbids println!, eprintln!, and dbg! macros. Output must
//!   go through `tracing` (usually via `RequestLog`) so that every line
//!   carries its request id and internal failure detail stays in the logs.

#![feature(rustc_private)]
#![warn(unused_extern_crates)]

extern crate rustc_ast;
extern crate rustc_lint;
extern crate rustc_session;
extern crate rustc_span;

use rustc_ast::{Expr, ExprKind, MacCall};
use rustc_lint::{EarlyContext, EarlyLintPass};
use rustc_session::{declare_lint_pass, declare_tool_lint};

declare_tool_lint! {
    /// **What it does:** Forbids use of `println!`, `eprintln!`, and `dbg!` macros in library code.
    ///
    /// **Why is this bad?** Output written straight to stdout/stderr has no
    /// `request_id` field and no level, so it cannot be correlated with the
    /// request that produced it. It also sidesteps the error boundary, which
    /// only ever writes failure detail to the log.
    ///
    /// **Known problems:** None.
    ///
    /// **Example:**
    /// ```rust,ignore
    /// // Bad
    /// println!("activity {} updated", id);
    /// eprintln!("store failed: {}", err);
    /// dbg!(&request);
    ///
    /// // Good
    /// ctx.log().info(format_args!("activity {} updated", id));
    /// ```
    pub enforcement_pack::NO_PRINTLN,
    Deny,
    "use of println!, eprintln!, or dbg! macros; use RequestLog or tracing instead"
}

declare_lint_pass!(NoPrintln => [NO_PRINTLN]);

impl EarlyLintPass for NoPrintln {
    fn check_expr(&mut self, cx: &EarlyContext<'_>, expr: &Expr) {
        if let ExprKind::MacCall(mac) = &expr.kind {
            check_macro(cx, mac, expr.span);
        }
    }
}

fn check_macro(cx: &EarlyContext<'_>, mac: &MacCall, span: rustc_span::Span) {
    let path = &mac.path;

    if path.segments.len() != 1 {
        return;
    }

    match path.segments[0].ident.name.as_str() {
        "println" => {
            emit(cx, span, "`RequestLog::info` or `tracing::info!`", "println!");
        }
        "eprintln" => {
            emit(cx, span, "`RequestLog::error` or `tracing::error!`", "eprintln!");
        }
        "dbg" => {
            emit(cx, span, "`RequestLog::debug` or `tracing::debug!`", "dbg!");
        }
        _ => {}
    }
}

fn emit(cx: &EarlyContext<'_>, span: rustc_span::Span, replacement: &str, name: &str) {
    rustc_lint::LintContext::span_lint(cx, NO_PRINTLN, span, |diag| {
        diag.help(format!("use {} so the line carries its request id", replacement));
        diag.note(format!("`{}` writes outside the request's log context", name));
    });
}

#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub extern "C" fn register_lints(_sess: &rustc_session::Session, lint_store: &mut rustc_lint::LintStore) {
    lint_store.register_lints(&[&NO_PRINTLN]);
    lint_store.register_early_pass(|| Box::new(NoPrintln));
}

#[unsafe(no_mangle)]
pub fn dylint_version() -> *mut std::os::raw::c_char {
    std::ffi::CString::new(dylint_linting::DYLINT_VERSION)
        .expect("version string contains null byte")
        .into_raw()
}
