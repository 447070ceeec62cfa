//! JSON report export.

use bios_extraction::{write_atomic, ReportDocument, ScrapeResult};
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// Write a `{generated_at, items}` report for `results` to `path`.
///
/// The file is replaced atomically so readers never see a partial report.
pub fn write_report(path: impl AsRef<Path>, results: &[ScrapeResult]) -> Result<ReportDocument> {
    let path = path.as_ref();
    let document = ReportDocument::new(results);
    let bytes = serde_json::to_vec_pretty(&document)?;

    write_atomic(path, &bytes)?;

    info!(path = %path.display(), items = document.items.len(), "Wrote report");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bios_extraction::{ReleaseRecord, TrackedModel};

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("bios.json");
        let results = vec![
            ScrapeResult::found(
                TrackedModel::new("B650 AORUS ELITE AX", "gigabyte", "https://gb.example/b650"),
                ReleaseRecord::new("F31"),
                Some(ReleaseRecord::new("F30")),
            ),
            ScrapeResult::failed(
                TrackedModel::new("PRIME B650-PLUS", "asus", "https://asus.example/b650"),
                "no BIOS version candidates found",
            ),
        ];

        write_report(&path, &results).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["items"][0]["latest"]["version"], "F31");
        assert_eq!(json["items"][0]["previous"]["version"], "F30");
        assert!(json["items"][1]["latest"].is_null());
        assert_eq!(json["items"][1]["error"], "no BIOS version candidates found");
    }
}
