use upstatus::{MonitorStats, MonitorStatus};

const HEADERS: [&str; 6] = ["Name", "Status", "Uptime", "Avg Time", "Checks", "Last Check"];

fn status_label(status: Option<MonitorStatus>) -> String {
    match status {
        Some(status) => status.to_string().to_uppercase(),
        None => "PENDING".to_string(),
    }
}

fn row(stats: &MonitorStats) -> [String; 6] {
    let last_check = stats
        .last_check
        .as_ref()
        .map(|check| match (check.status_code, &check.error) {
            (_, Some(error)) => error.clone(),
            (Some(code), None) => format!("HTTP {code}"),
            (None, None) => "-".to_string(),
        })
        .unwrap_or_else(|| "-".to_string());

    [
        stats.name.clone(),
        status_label(stats.last_status()),
        format!("{:.1}%", stats.uptime),
        format!("{}ms", stats.avg_response_time),
        stats.checks.to_string(),
        last_check,
    ]
}

/// Plain-text table with one line per monitor
pub fn table(stats: &[MonitorStats]) -> String {
    let rows: Vec<[String; 6]> = stats.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: &[&str]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_line(&HEADERS);
    let rule = widths.map(|width| "-".repeat(width));
    push_line(&rule.each_ref().map(String::as_str));
    for row in &rows {
        push_line(&row.each_ref().map(String::as_str));
    }

    out
}
