//! Domain model: repositories under scan, manifest locations, parsed records
//! and the catalog entries emitted for them.

use serde::{Deserialize, Serialize};

/// Value used for every manifest field that is absent, empty or unreadable.
pub const UNDEFINED: &str = "Undefined";

/// Declared visibility of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "internal" => Ok(Visibility::Internal),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// A repository selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    pub visibility: Visibility,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            visibility,
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A manifest file known to exist but not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    pub repo: RepositoryRef,
    /// File name reported by the provider (e.g. `action.yml`).
    pub file_name: String,
    /// Path of the manifest inside the repository.
    pub path: String,
    pub download_url: Option<String>,
    /// Full name of the parent repository when the repository is a fork.
    pub forked_from: Option<String>,
}

/// A `uses:` step inside a composite manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub action: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Execution steps declared under `runs.steps`, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Steps {
    pub actions: Vec<ActionStep>,
    pub shell: Vec<serde_json::Value>,
}

/// Normalized manifest metadata.
///
/// String fields always hold either [`UNDEFINED`] or a sanitized,
/// non-empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub author: String,
    pub description: String,
    pub using: String,
    pub steps: Steps,
}

impl Default for ManifestRecord {
    fn default() -> Self {
        Self {
            name: UNDEFINED.to_string(),
            author: UNDEFINED.to_string(),
            description: UNDEFINED.to_string(),
            using: UNDEFINED.to_string(),
            steps: Steps::default(),
        }
    }
}

/// One discovered, visibility-permitted manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub download_url: Option<String>,
    /// Parent full name; written as `""` for repositories that are not forks.
    #[serde(rename = "forkedfrom", default, with = "empty_as_none")]
    pub forked_from: Option<String>,
    pub author: String,
    pub description: String,
    pub using: String,
    pub steps: Steps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|v| !v.is_empty()))
    }
}

impl CatalogEntry {
    /// Merge a location with its parsed record.
    pub fn from_parts(location: ManifestLocation, record: ManifestRecord) -> Self {
        Self {
            name: record.name,
            owner: location.repo.owner,
            repo: location.repo.name,
            path: location.path,
            download_url: location.download_url,
            forked_from: location.forked_from,
            author: record.author,
            description: record.description,
            using: record.using,
            steps: record.steps,
            readme: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parse_case_insensitive() {
        assert_eq!("Internal".parse::<Visibility>().unwrap(), Visibility::Internal);
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
        assert!("secret".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_default_record_is_all_undefined() {
        let record = ManifestRecord::default();
        assert_eq!(record.name, UNDEFINED);
        assert_eq!(record.author, UNDEFINED);
        assert_eq!(record.description, UNDEFINED);
        assert_eq!(record.using, UNDEFINED);
        assert!(record.steps.actions.is_empty());
        assert!(record.steps.shell.is_empty());
    }

    #[test]
    fn test_catalog_entry_serializes_camel_case() {
        let location = ManifestLocation {
            repo: RepositoryRef::new("octo", "hello", Visibility::Public),
            file_name: "action.yml".to_string(),
            path: "action.yml".to_string(),
            download_url: Some("https://raw.example/action.yml".to_string()),
            forked_from: Some("upstream/hello".to_string()),
        };
        let entry = CatalogEntry::from_parts(location, ManifestRecord::default());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["downloadUrl"], "https://raw.example/action.yml");
        assert_eq!(json["forkedfrom"], "upstream/hello");
        assert!(json.get("forkedFrom").is_none());
        assert_eq!(json["repo"], "hello");
        assert_eq!(json["name"], UNDEFINED);
    }

    #[test]
    fn test_non_fork_without_readme_serialization() {
        let location = ManifestLocation {
            repo: RepositoryRef::new("octo", "hello", Visibility::Public),
            file_name: "action.yml".to_string(),
            path: "action.yml".to_string(),
            download_url: None,
            forked_from: None,
        };
        let entry = CatalogEntry::from_parts(location, ManifestRecord::default());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["forkedfrom"], "");
        assert!(json.get("readme").is_none());

        let back: CatalogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.forked_from, None);
        assert_eq!(back.readme, None);
    }

    #[test]
    fn test_action_step_ref_field_name() {
        let step = ActionStep {
            action: "actions/checkout".to_string(),
            git_ref: "v4".to_string(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["ref"], "v4");
    }
}
