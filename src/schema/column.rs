use serde::{Deserialize, Deserializer, Serialize};

/// One row of `SHOW FULL COLUMNS` output.
///
/// Only the four columns the generators look at are kept. `has_default` is
/// true when the `Default` cell is non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRecord {
    pub field: String,
    #[serde(rename = "type")]
    pub raw_type: String,
    pub has_default: bool,
    pub comment: String,
}

impl ColumnRecord {
    pub fn new(
        field: impl Into<String>,
        raw_type: impl Into<String>,
        has_default: bool,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            raw_type: raw_type.into(),
            has_default,
            comment: comment.into(),
        }
    }

    /// Human title taken from the first whitespace-delimited token of the
    /// comment. Columns without a comment fall back to their field name.
    pub fn display_title(&self) -> &str {
        self.comment
            .split_whitespace()
            .next()
            .unwrap_or(self.field.as_str())
    }
}

#[derive(Deserialize)]
struct RawColumn {
    #[serde(rename = "Field", alias = "field")]
    field: String,
    #[serde(rename = "Type", alias = "type")]
    raw_type: String,
    #[serde(rename = "Default", alias = "default", default)]
    default: Option<serde_json::Value>,
    #[serde(rename = "Comment", alias = "comment", default)]
    comment: Option<String>,
}

impl<'de> Deserialize<'de> for ColumnRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawColumn::deserialize(deserializer)?;
        Ok(Self {
            field: raw.field,
            raw_type: raw.raw_type,
            has_default: raw.default.is_some_and(|value| !value.is_null()),
            comment: raw.comment.unwrap_or_default(),
        })
    }
}
