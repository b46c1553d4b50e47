//! CSV export of an owner's grants.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use docshare_entity::share::ShareGrant;

/// Header row of the export.
pub const CSV_HEADER: &str = "document_id,recipient,access_level,created,expires,status";

/// Export payload.
#[derive(Debug, Clone, Serialize)]
pub struct ShareExport {
    /// CSV text including the header row.
    pub csv: String,
    /// Suggested download name.
    pub filename: String,
    /// Number of data rows.
    pub total: usize,
}

impl ShareExport {
    /// Render grants as CSV at `now`.
    pub fn render(grants: &[ShareGrant], now: DateTime<Utc>) -> Self {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');

        for grant in grants {
            let expires = grant
                .expires_at
                .map(|e| e.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();
            let row = [
                escape_field(&grant.document_id),
                escape_field(&grant.shared_with_email),
                grant.access_level.as_str().to_string(),
                grant.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                expires,
                grant.status_at(now).as_str().to_string(),
            ];
            csv.push_str(&row.join(","));
            csv.push('\n');
        }

        Self {
            csv,
            filename: format!("shares-export-{}.csv", now.format("%Y-%m-%d")),
            total: grants.len(),
        }
    }
}

/// Quote a field when it holds a delimiter, quote or line break.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use docshare_entity::share::{AccessLevel, NewShareGrant};

    #[test]
    fn test_render() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let grant = NewShareGrant {
            document_id: "doc,1".into(),
            shared_by: "owner@example.com".into(),
            shared_with_email: "r@example.com".into(),
            access_level: AccessLevel::Download,
            expires_at: Some(now - Duration::days(1)),
            password_hash: None,
            custom_slug: None,
            source_app: "fintutto".into(),
            shared_with_app: None,
            track_downloads: false,
        }
        .into_grant(now - Duration::days(10));
        let revoked = {
            let mut g = grant.clone();
            g.is_active = false;
            g.expires_at = None;
            g
        };

        let export = ShareExport::render(&[grant, revoked], now);
        let lines: Vec<&str> = export.csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "\"doc,1\",r@example.com,download,2026-03-04T09:00:00Z,2026-03-13T09:00:00Z,expired"
        );
        assert!(lines[2].ends_with(",,revoked"));
        assert_eq!(export.filename, "shares-export-2026-03-14.csv");
        assert_eq!(export.total, 2);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
