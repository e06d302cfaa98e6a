use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::config::InstallBranchConfig;
use crate::releases::parser::ReleaseRecord;

/// Release channel a version is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Weekly,
    Production,
}

/// A release ready to be shown as an install entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub version: String,
    /// `None` when the index timestamp could not be parsed.
    pub upload_time: Option<DateTime<Utc>>,
    pub display_title: String,
    pub snippet: String,
    pub channel: Channel,
}

/// Newest releases per channel, each list bounded by `max_per_channel`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBundle {
    pub weekly: Vec<ReleaseEntry>,
    pub production: Vec<ReleaseEntry>,
}

impl ChannelBundle {
    pub fn is_empty(&self) -> bool {
        self.weekly.is_empty() && self.production.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weekly.len() + self.production.len()
    }

    pub fn channel(&self, channel: Channel) -> &[ReleaseEntry] {
        match channel {
            Channel::Weekly => &self.weekly,
            Channel::Production => &self.production,
        }
    }
}

/// Weekly when the version carries the pre-release marker, Production when it
/// carries the post-release marker, Weekly for everything else.
pub fn classify_channel(version: &str, install: &InstallBranchConfig) -> Channel {
    if version.contains(&install.weekly_marker) {
        Channel::Weekly
    } else if version.contains(&install.production_marker) {
        Channel::Production
    } else {
        Channel::Weekly
    }
}

/// Parses the timestamp formats seen in package index responses.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC, which is
/// what PyPI's `upload_time` means), the same with a space separator, and a
/// bare date.
pub fn parse_upload_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Tooltip for a release entry.
pub fn display_title(index_name: &str, upload_time: Option<&DateTime<Utc>>) -> String {
    match upload_time {
        Some(time) => format!(
            "Uploaded to {} on {}",
            index_name,
            time.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => format!("Uploaded to {} on an unknown date", index_name),
    }
}

impl ReleaseEntry {
    pub fn from_record(
        record: ReleaseRecord,
        index_name: &str,
        install: &InstallBranchConfig,
    ) -> Self {
        let upload_time = record.upload_time.as_deref().and_then(parse_upload_time);
        if upload_time.is_none() {
            tracing::debug!(
                version = %record.version,
                raw = ?record.upload_time,
                "Unparsable upload time, sorting release last"
            );
        }

        Self {
            display_title: display_title(index_name, upload_time.as_ref()),
            snippet: install.snippet_for(&record.version),
            channel: classify_channel(&record.version, install),
            upload_time,
            version: record.version,
        }
    }
}

/// Stable sort, most recent upload first.
///
/// Entries without a parsable timestamp tie with each other and go after every
/// dated entry, keeping their input order.
pub fn sort_newest_first(entries: &mut [ReleaseEntry]) {
    entries.sort_by(|a, b| b.upload_time.cmp(&a.upload_time));
}

/// Builds the channel bundle from parsed records.
///
/// Records are partitioned by channel, sorted newest first and truncated to
/// `install.max_per_channel` per channel.
pub fn classify(
    records: impl IntoIterator<Item = ReleaseRecord>,
    index_name: &str,
    install: &InstallBranchConfig,
) -> ChannelBundle {
    let mut bundle = ChannelBundle::default();

    for record in records {
        let entry = ReleaseEntry::from_record(record, index_name, install);
        match entry.channel {
            Channel::Weekly => bundle.weekly.push(entry),
            Channel::Production => bundle.production.push(entry),
        }
    }

    for list in [&mut bundle.weekly, &mut bundle.production] {
        sort_newest_first(list);
        list.truncate(install.max_per_channel);
    }

    bundle
}
