use serde::Deserialize;
use serde_json::{Map, Value};

/// One version from the index, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub version: String,
    /// Raw upload timestamp of the first file record, if any.
    pub upload_time: Option<String>,
}

/// Outcome of parsing a release map with best-effort recovery.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Usable versions in document order.
    pub records: Vec<ReleaseRecord>,
    /// Versions dropped because they had no file records or a malformed one.
    pub skipped: usize,
}

#[derive(Deserialize)]
struct IndexDocument {
    releases: Map<String, Value>,
}

/// Parses `{"releases": {"<version>": [{"upload_time": ...}, ...]}}`.
///
/// Only the first record per version is read. The timestamp comes from
/// `upload_time`, falling back to `upload_time_iso_8601`. A document without a
/// `releases` object is an error; individual malformed versions, including
/// blank version keys, are skipped.
pub fn parse_release_map(bytes: &[u8]) -> Result<ParseResult, serde_json::Error> {
    let document: IndexDocument = serde_json::from_slice(bytes)?;

    let mut result = ParseResult::default();
    for (version, files) in document.releases {
        if version.trim().is_empty() {
            tracing::warn!("Release with a blank version key skipped");
            result.skipped += 1;
            continue;
        }
        let Some(first) = files.as_array().and_then(|files| files.first()) else {
            result.skipped += 1;
            continue;
        };
        let Some(record) = first.as_object() else {
            result.skipped += 1;
            continue;
        };

        let upload_time = ["upload_time", "upload_time_iso_8601"]
            .iter()
            .find_map(|key| record.get(*key).and_then(Value::as_str))
            .map(str::to_owned);

        result.records.push(ReleaseRecord {
            version,
            upload_time,
        });
    }

    Ok(result)
}
