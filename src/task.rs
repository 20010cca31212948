//! Task document codec.
//!
//! A task is a flat markdown document with recognized label lines. Fields are
//! recovered by independent pattern lookups, so parsing never fails: a field
//! whose pattern does not match falls back to its default. The `filename`
//! field is not part of the document — the caller assigns it from the task's
//! storage location.

use regex::{NoExpand, Regex};
use serde::Serialize;
use std::sync::LazyLock;

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

static STATUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Status:\s*(.+)$").unwrap());

static ASSIGNED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Assigned:\s*(.+)$").unwrap());

// These two carry their value on the line following the heading.
static DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Parent Domain\s*\n(.+)$").unwrap());

static COMPLEXITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## Estimated Complexity\s*\n(.+)$").unwrap());

/// One unit of work on the task board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    /// Storage key within its queue; doubles as the lock resource name.
    pub filename: String,
    pub title: String,
    pub status: String,
    pub assigned: String,
    pub domain: String,
    pub complexity: String,
}

impl TaskRecord {
    /// Extract fields from a task document. Never fails; absent fields
    /// degrade to their defaults ("Unknown", "unknown", "none", "").
    pub fn parse(content: &str) -> Self {
        let title = TITLE_REGEX
            .captures(content)
            .map(|cap| {
                let raw = cap[1].trim();
                raw.strip_prefix("Task:").map_or(raw, str::trim_start).to_string()
            })
            .unwrap_or_else(|| "Unknown".to_string());

        let field = |re: &Regex, default: &str| {
            re.captures(content)
                .map(|cap| cap[1].trim().to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            filename: String::new(),
            title,
            status: field(&STATUS_REGEX, "unknown"),
            assigned: field(&ASSIGNED_REGEX, "none"),
            domain: field(&DOMAIN_REGEX, ""),
            complexity: field(&COMPLEXITY_REGEX, ""),
        }
    }
}

/// Replace the first `## <field>: ...` line with the new value, leaving the
/// rest of the document byte-for-byte unchanged.
///
/// If no such line exists the document is returned unmodified — the field is
/// deliberately NOT appended.
pub fn update_field(content: &str, field: &str, value: &str) -> String {
    let pattern = format!(r"(?m)^## {}:.*$", regex::escape(field));
    let re = Regex::new(&pattern).expect("escaped field name forms a valid regex");
    if re.is_match(content) {
        let line = format!("## {field}: {value}");
        re.replace(content, NoExpand(&line)).into_owned()
    } else {
        content.to_string()
    }
}
