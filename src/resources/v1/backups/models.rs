use crate::error::RequestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the target list, as supplied. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct V1BackupTarget {
    pub name: Option<String>,
    pub uri: Option<String>,
}

/// A target that passed validation and can be dumped.
#[derive(Debug, Clone, PartialEq)]
pub struct V1ValidTarget {
    pub name: String,
    pub uri: String,
}

impl V1BackupTarget {
    fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        V1BackupTarget {
            name: field("name"),
            uri: field("uri"),
        }
    }

    /// Returns the usable target, or the skip reason.
    pub fn validate(&self) -> Result<V1ValidTarget, &'static str> {
        let name = self.name.as_deref().filter(|n| !n.is_empty());
        let uri = self.uri.as_deref().filter(|u| !u.is_empty());

        match (name, uri) {
            (Some(name), Some(uri)) => {
                if !is_safe_name(name) {
                    return Err("invalid name");
                }
                Ok(V1ValidTarget {
                    name: name.to_string(),
                    uri: uri.to_string(),
                })
            }
            _ => Err("missing name or uri"),
        }
    }

    /// Name used in results, falling back to a placeholder.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "<no-name>".to_string(),
        }
    }
}

// Names become a file name and an object key segment.
fn is_safe_name(name: &str) -> bool {
    name != "." && name != ".." && !name.contains('/') && !name.contains('\\')
}

/// Parse the raw target list JSON.
pub fn parse_targets(raw: &str) -> Result<Vec<V1BackupTarget>, RequestError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| RequestError::InvalidMongoList(e.to_string()))?;

    let entries = value.as_array().ok_or_else(|| {
        RequestError::InvalidMongoList("expected a JSON array of targets".to_string())
    })?;

    Ok(entries.iter().map(V1BackupTarget::from_value).collect())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum V1BackupStatus {
    Ok,
    Skipped,
    Error,
}

/// Per-target outcome returned by a backup run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct V1BackupResult {
    pub name: String,
    pub status: V1BackupStatus,
    /// Uploaded object location. Serialized as `gcs` regardless of backend.
    #[serde(rename = "gcs", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl V1BackupResult {
    pub fn ok(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: V1BackupStatus::Ok,
            location: Some(location.into()),
            reason: None,
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: V1BackupStatus::Skipped,
            location: None,
            reason: Some(reason.into()),
        }
    }

    pub fn error(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: V1BackupStatus::Error,
            location: None,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_well_formed_list() {
        let targets = parse_targets(
            r#"[{"name":"orders","uri":"mongodb://a"},{"name":"users","uri":"mongodb://b"}]"#,
        )
        .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name.as_deref(), Some("orders"));
        assert_eq!(targets[1].uri.as_deref(), Some("mongodb://b"));
    }

    #[test]
    fn invalid_json_is_reported_with_detail() {
        match parse_targets("[{") {
            Err(RequestError::InvalidMongoList(detail)) => assert!(!detail.is_empty()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn non_array_is_rejected() {
        assert_eq!(
            parse_targets(r#"{"name":"a","uri":"b"}"#),
            Err(RequestError::InvalidMongoList(
                "expected a JSON array of targets".to_string()
            ))
        );
    }

    #[test]
    fn odd_entries_become_empty_targets() {
        let targets = parse_targets(r#"["oops", 3, {"name": 7, "uri": "mongodb://x"}]"#).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], V1BackupTarget::default());
        assert_eq!(targets[1], V1BackupTarget::default());
        assert_eq!(targets[2].name, None);
        assert_eq!(targets[2].uri.as_deref(), Some("mongodb://x"));
    }

    #[test]
    fn validation_requires_name_and_uri() {
        let missing_uri = V1BackupTarget {
            name: Some("a".into()),
            uri: None,
        };
        assert_eq!(missing_uri.validate(), Err("missing name or uri"));

        let empty_name = V1BackupTarget {
            name: Some(String::new()),
            uri: Some("mongodb://x".into()),
        };
        assert_eq!(empty_name.validate(), Err("missing name or uri"));
        assert_eq!(empty_name.display_name(), "<no-name>");
    }

    #[test]
    fn validation_rejects_path_like_names() {
        for name in ["..", ".", "a/b", "a\\b"] {
            let target = V1BackupTarget {
                name: Some(name.into()),
                uri: Some("mongodb://x".into()),
            };
            assert_eq!(target.validate(), Err("invalid name"), "name {:?}", name);
        }
    }

    #[test]
    fn results_serialize_with_the_expected_keys() {
        let ok = serde_json::to_value(V1BackupResult::ok("a", "gs://b/backups/a/x.gz")).unwrap();
        assert_eq!(
            ok,
            json!({"name": "a", "status": "ok", "gcs": "gs://b/backups/a/x.gz"})
        );

        let skipped =
            serde_json::to_value(V1BackupResult::skipped("<no-name>", "missing name or uri"))
                .unwrap();
        assert_eq!(
            skipped,
            json!({"name": "<no-name>", "status": "skipped", "reason": "missing name or uri"})
        );
    }
}
