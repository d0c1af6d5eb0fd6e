//! Top-level failure reporting.
//!
//! Every command returns `anyhow::Result`; `main` hands a failure to
//! [`report_failure`] once and exits non-zero.

use colored::Colorize;

use notion_blog::notion::NotionError;
use notion_blog::storage::StorageError;

/// Diagnostic fields pulled from the first typed error in the chain.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub name: Option<&'static str>,
    pub code: Option<String>,
    pub status: Option<u16>,
    pub body: Option<String>,
}

pub fn diagnostics(err: &anyhow::Error) -> Diagnostics {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<NotionError>() {
            return Diagnostics {
                name: Some(e.name()),
                code: e.code().map(str::to_string),
                status: e.status(),
                body: e
                    .body()
                    .map(|b| serde_json::to_string_pretty(b).unwrap_or_else(|_| b.to_string())),
            };
        }
        if let Some(e) = cause.downcast_ref::<StorageError>() {
            return Diagnostics {
                name: Some(e.name()),
                code: e.code().map(str::to_string),
                status: e.status(),
                body: None,
            };
        }
    }
    Diagnostics::default()
}

/// Log and print a failure with every diagnostic field available.
pub fn log_failure(context: &str, err: &anyhow::Error) {
    let diag = diagnostics(err);
    tracing::error!(
        context,
        name = diag.name.unwrap_or("Error"),
        message = %err,
        code = diag.code.as_deref().unwrap_or("N/A"),
        status = %diag.status.map(|s| s.to_string()).unwrap_or_else(|| "N/A".to_string()),
        "operation failed"
    );

    eprintln!("{} {}", "✗".red(), context.red());
    eprintln!("  Error name: {}", diag.name.unwrap_or("Error"));
    eprintln!("  Error message: {:#}", err);
    eprintln!("  Error code: {}", diag.code.as_deref().unwrap_or("N/A"));
    if let Some(status) = diag.status {
        eprintln!("  Status: {}", status);
    }
    if let Some(body) = diag.body {
        eprintln!("  Error body: {}", body);
    }
}

pub fn report_failure(err: &anyhow::Error) {
    log_failure("Command failed", err);
}
