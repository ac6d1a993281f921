//! The JSON document published at the end of a run.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::CatalogEntry;

/// Catalog output: `{lastUpdated, organization, user, actions}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOutput {
    pub last_updated: String,
    pub organization: String,
    pub user: String,
    pub actions: Vec<CatalogEntry>,
}

impl CatalogOutput {
    pub fn new<Tz: TimeZone>(
        actions: Vec<CatalogEntry>,
        organization: &str,
        user: &str,
        generated_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            last_updated: format_last_updated(generated_at),
            organization: organization.to_string(),
            user: user.to_string(),
            actions,
        }
    }

    /// Compact single-line JSON, suitable for a step output.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `YYYYMMDD_HHmm`
pub fn format_last_updated<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%Y%m%d_%H%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_last_updated_format() {
        let date = Utc.with_ymd_and_hms(2021, 1, 16, 11, 43, 0).unwrap();
        let formatted = format_last_updated(&date);
        assert_eq!(formatted.len(), 13);
        assert_eq!(formatted, "20210116_1143");
    }

    #[test]
    fn test_output_json_shape() {
        let date = Utc.with_ymd_and_hms(2024, 12, 1, 8, 5, 0).unwrap();
        let output = CatalogOutput::new(Vec::new(), "octo-org", "", &date);
        let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

        assert_eq!(json["lastUpdated"], "20241201_0805");
        assert_eq!(json["organization"], "octo-org");
        assert_eq!(json["user"], "");
        assert!(json["actions"].as_array().unwrap().is_empty());
    }
}
