//! JSON and CSV renderings of stats snapshots.

use crate::monitoring::MonitorStats;

const CSV_HEADERS: [&str; 7] = [
    "URL",
    "Name",
    "Checks",
    "Uptime %",
    "Avg Response Time (ms)",
    "Last Status",
    "Last Check Time",
];

const MISSING: &str = "N/A";

/// Pretty-printed JSON array of the snapshot
pub fn to_json(stats: &[MonitorStats]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

/// CSV with a header row; every field is quoted and embedded quotes doubled
pub fn to_csv(stats: &[MonitorStats]) -> String {
    let header = CSV_HEADERS.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");

    let rows = stats.iter().map(|stat| {
        let last_status = stat.last_check.as_ref().map(|c| c.status.to_string());
        let last_time = stat.last_check.as_ref().map(|c| c.timestamp.to_rfc3339());

        [
            stat.url.clone(),
            stat.name.clone(),
            stat.checks.to_string(),
            stat.uptime.to_string(),
            stat.avg_response_time.to_string(),
            last_status.unwrap_or_else(|| MISSING.to_string()),
            last_time.unwrap_or_else(|| MISSING.to_string()),
        ]
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",")
    });

    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
