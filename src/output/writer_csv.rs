use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::session::ProbeResult;

pub fn write_csv(path: &Path, items: &[ProbeResult]) -> anyhow::Result<()> {
    let f = File::create(path)?;
    let mut w = Writer::from_writer(f);
    w.write_record(["waf", "site", "reachable", "blocked", "status_code", "notes"])?;
    for it in items {
        w.write_record(&[
            it.vendor.clone(),
            it.site.clone(),
            it.reachable.to_string(),
            it.blocked.to_string(),
            it.status_code.map(|v| v.to_string()).unwrap_or_default(),
            it.notes.clone(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
