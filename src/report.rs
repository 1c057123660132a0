//! Rendering of resolution results

use serde::Serialize;

use crate::pipeline::item::ResolutionResult;
use crate::version::checker::VersionStatus;
use crate::version::evr::Version;

const HEADERS: [&str; 4] = ["PACKAGE", "PACKAGED", "UPSTREAM", "STATUS"];
const MISSING: &str = "-";

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
}

/// Render results as an aligned text table, one row per item.
///
/// Failed items get an `ERROR` status followed by the failing side and message.
pub fn render_table(results: &[ResolutionResult]) -> String {
    let rows: Vec<[String; 4]> = results.iter().map(table_row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    std::iter::once(HEADERS.map(str::to_string))
        .chain(rows)
        .map(|row| {
            let [name, packaged, upstream, status] = row;
            format!(
                "{:<w0$}  {:<w1$}  {:<w2$}  {}",
                name,
                packaged,
                upstream,
                status,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn table_row(result: &ResolutionResult) -> [String; 4] {
    let version = |v: Option<&Version>| {
        v.map_or_else(|| MISSING.to_string(), |v| v.to_string())
    };
    let status = match (result.status(), result.error()) {
        (Some(status), _) => status.label().to_string(),
        (None, Some(error)) => format!("ERROR {}", error),
        (None, None) => MISSING.to_string(),
    };

    [
        result.name.clone(),
        version(result.package()),
        version(result.software()),
        status,
    ]
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    packaged: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<VersionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    side: &'static str,
    message: String,
}

/// Render results as a pretty-printed JSON array.
pub fn render_json(results: &[ResolutionResult]) -> Result<String, serde_json::Error> {
    let rows: Vec<JsonRow> = results
        .iter()
        .map(|result| JsonRow {
            name: &result.name,
            packaged: result.package().map(ToString::to_string),
            upstream: result.software().map(ToString::to_string),
            status: result.status(),
            error: result.error().map(|e| JsonError {
                side: e.side.as_str(),
                message: e.error.to_string(),
            }),
        })
        .collect();

    serde_json::to_string_pretty(&rows)
}
