use crate::session::{ProbeResult, SessionReport};

const HEADERS: [&str; 6] = ["WAF", "Site", "Status", "Blocked", "Response Code", "Notes"];

fn row(result: &ProbeResult) -> [String; 6] {
    let status = if result.reachable { "[OK] reachable" } else { "[X] unreachable" };
    let blocked = match (result.reachable, result.blocked) {
        (false, _) => "-",
        (true, true) => "[!] blocked",
        (true, false) => "[+] passed",
    };
    [
        result.vendor.clone(),
        result.site.clone(),
        status.to_string(),
        blocked.to_string(),
        result.status_code.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string()),
        result.notes.clone(),
    ]
}

/// Render results as an aligned text table.
pub fn render_table(results: &[ProbeResult]) -> String {
    let rows: Vec<[String; 6]> = results.iter().map(row).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let fmt_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{}{}", c, " ".repeat(w - c.chars().count())))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&fmt_line(&HEADERS.map(|h| h.to_string())[..]));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    out.push('\n');
    for r in &rows {
        out.push_str(&fmt_line(&r[..]));
        out.push('\n');
    }
    out
}

pub fn print_report(report: &SessionReport) {
    println!("\n[*] WAF Probe Results");
    println!("{}", "=".repeat(80));
    print!("{}", render_table(&report.results));
    println!("{}", "=".repeat(80));
    println!("[+] Summary: {} probes, {} blocked, {} unreachable, {} skipped",
             report.results.len(), report.blocked_count(), report.unreachable_count(), report.skipped.len());
    for s in &report.skipped {
        match &s.site {
            Some(site) => println!("[!] skipped {} @ {}: {}", s.vendor, site, s.reason),
            None => println!("[!] skipped {}: {}", s.vendor, s.reason),
        }
    }
    println!();
}
