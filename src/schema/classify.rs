//! Column classification.
//!
//! Maps a raw `SHOW FULL COLUMNS` row onto a closed set of semantic field
//! kinds. Every deriver matches on [`FieldClassification`] instead of looking
//! at raw SQL type strings, so adding a kind is an exhaustiveness error in each
//! deriver rather than a silent fallthrough.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::Display;

use super::column::ColumnRecord;
use crate::error::ScaffoldError;
use crate::inflect;

/// Field names that are managed by the framework and never appear in
/// validation, resource or UI fragments.
pub const SUPPRESSED_FIELDS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

static VARCHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^varchar\((\d+)\)").expect("varchar pattern is valid"));
static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^decimal\((\d+)\s*,\s*(\d+)\)").expect("decimal pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    Created,
    Updated,
    Deleted,
}

impl AuditKind {
    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "created_at" => Some(Self::Created),
            "updated_at" => Some(Self::Updated),
            "deleted_at" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// The entity a foreign-key column points at.
///
/// Built only through [`EntityRef::from_field`], so every generator sees the
/// same name for the same column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityRef {
    /// Snake-case relation name: `parent_category_id` -> `parent_category`.
    pub accessor: String,
    /// Model type name: `parent_category_id` -> `ParentCategory`.
    pub type_name: String,
    /// Client API module name: `parent_category_id` -> `parentCategory`.
    pub api_module: String,
}

impl EntityRef {
    /// Drops the trailing `_`-delimited token (the `_id` part) and derives the
    /// names from what is left. Leading underscores are not separators, and a
    /// field with no other underscore is used whole: `_owner` -> `owner`.
    pub fn from_field(field: &str) -> Self {
        let trimmed = match field.trim_start_matches('_') {
            "" => field,
            trimmed => trimmed,
        };
        let accessor = match trimmed.rsplit_once('_') {
            Some((head, _)) if !head.is_empty() => head,
            _ => trimmed,
        };
        Self {
            accessor: accessor.to_string(),
            type_name: inflect::pascal_case(accessor),
            api_module: inflect::camel_case(accessor),
        }
    }

    pub fn names_identifier(&self) -> bool {
        self.accessor.eq_ignore_ascii_case("id")
    }

    pub fn model_import(&self) -> String {
        format!("use App\\Models\\{};", self.type_name)
    }

    pub fn api_binding(&self) -> String {
        format!("{}Api", self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldClassification {
    Identifier,
    AuditTimestamp { audit: AuditKind },
    BoundedString { max_len: u32 },
    FreeText,
    DecimalAmount { precision: u32 },
    IntegerNumber,
    FloatNumber,
    EnumCode,
    DateOnly,
    TimeOnly,
    DateTime,
    ForeignKey { referenced_entity: EntityRef },
    JsonBlob,
    Unrecognized { raw_type: String },
}

impl FieldClassification {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::DecimalAmount { .. } | Self::IntegerNumber | Self::FloatNumber
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateOnly | Self::TimeOnly | Self::DateTime)
    }
}

/// Classifies one column. The first matching rule wins.
pub fn classify(record: &ColumnRecord) -> FieldClassification {
    if record.field == "id" {
        return FieldClassification::Identifier;
    }
    if let Some(audit) = AuditKind::from_field(&record.field) {
        return FieldClassification::AuditTimestamp { audit };
    }

    let raw_type = record.raw_type.trim().to_ascii_lowercase();

    if let Some(max_len) = capture_u32(&VARCHAR, &raw_type, 1) {
        return FieldClassification::BoundedString { max_len };
    }
    if raw_type == "text" {
        return FieldClassification::FreeText;
    }
    if let Some(precision) = capture_u32(&DECIMAL, &raw_type, 2) {
        return FieldClassification::DecimalAmount { precision };
    }

    match raw_type.as_str() {
        "int" => FieldClassification::IntegerNumber,
        "float" => FieldClassification::FloatNumber,
        "tinyint unsigned" => FieldClassification::EnumCode,
        "date" => FieldClassification::DateOnly,
        "time" => FieldClassification::TimeOnly,
        "datetime" => FieldClassification::DateTime,
        "bigint unsigned" => {
            let referenced_entity = EntityRef::from_field(&record.field);
            // `_id` and the like point at no entity.
            if referenced_entity.names_identifier() {
                FieldClassification::IntegerNumber
            } else {
                FieldClassification::ForeignKey { referenced_entity }
            }
        }
        "json" => FieldClassification::JsonBlob,
        _ => FieldClassification::Unrecognized {
            raw_type: record.raw_type.clone(),
        },
    }
}

fn capture_u32(pattern: &Regex, raw_type: &str, group: usize) -> Option<u32> {
    pattern
        .captures(raw_type)
        .and_then(|caps| caps.get(group))
        .and_then(|m| m.as_str().parse().ok())
}

/// A column paired with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedColumn {
    pub record: ColumnRecord,
    pub class: FieldClassification,
}

impl ClassifiedColumn {
    pub fn new(record: ColumnRecord) -> Self {
        let class = classify(&record);
        Self { record, class }
    }

    pub fn field(&self) -> &str {
        &self.record.field
    }

    pub fn title(&self) -> &str {
        self.record.display_title()
    }

    pub fn has_default(&self) -> bool {
        self.record.has_default
    }

    pub fn is_suppressed(&self) -> bool {
        SUPPRESSED_FIELDS.contains(&self.record.field.as_str())
    }

    pub fn foreign_entity(&self) -> Option<&EntityRef> {
        match &self.class {
            FieldClassification::ForeignKey { referenced_entity } => Some(referenced_entity),
            _ => None,
        }
    }
}

/// Classifies every column, keeping declaration order.
pub fn classify_all(records: Vec<ColumnRecord>) -> Vec<ClassifiedColumn> {
    records.into_iter().map(ClassifiedColumn::new).collect()
}

/// One diagnostic per column whose type fell through to `Unrecognized`.
/// These never stop generation; the derivers emit inline TODO markers instead.
pub fn diagnostics(columns: &[ClassifiedColumn]) -> Vec<ScaffoldError> {
    columns
        .iter()
        .filter_map(|column| match &column.class {
            FieldClassification::Unrecognized { raw_type } => {
                Some(ScaffoldError::UnrecognizedColumnType {
                    field: column.field().to_string(),
                    raw_type: raw_type.clone(),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn class_of(field: &str, raw_type: &str) -> FieldClassification {
        classify(&ColumnRecord::new(field, raw_type, false, ""))
    }

    #[test]
    fn test_name_rules_take_priority_over_type() {
        assert_eq!(class_of("id", "bigint unsigned"), FieldClassification::Identifier);
        assert_eq!(
            class_of("deleted_at", "timestamp"),
            FieldClassification::AuditTimestamp {
                audit: AuditKind::Deleted
            }
        );
    }

    #[test]
    fn test_parameterised_types() {
        assert_eq!(
            class_of("name", "varchar(255)"),
            FieldClassification::BoundedString { max_len: 255 }
        );
        assert_eq!(
            class_of("price", "decimal(10,2)"),
            FieldClassification::DecimalAmount { precision: 2 }
        );
        assert_eq!(
            class_of("rate", "DECIMAL(8, 4) unsigned"),
            FieldClassification::DecimalAmount { precision: 4 }
        );
    }

    #[test]
    fn test_exact_types() {
        assert_eq!(class_of("body", "text"), FieldClassification::FreeText);
        assert_eq!(class_of("qty", "int"), FieldClassification::IntegerNumber);
        assert_eq!(class_of("ratio", "float"), FieldClassification::FloatNumber);
        assert_eq!(class_of("status", "tinyint unsigned"), FieldClassification::EnumCode);
        assert_eq!(class_of("day", "date"), FieldClassification::DateOnly);
        assert_eq!(class_of("at", "time"), FieldClassification::TimeOnly);
        assert_eq!(class_of("when", "datetime"), FieldClassification::DateTime);
        assert_eq!(class_of("meta", "json"), FieldClassification::JsonBlob);
    }

    #[test]
    fn test_unmatched_types_keep_raw_type() {
        assert_eq!(
            class_of("flag", "tinyint(1)"),
            FieldClassification::Unrecognized {
                raw_type: "tinyint(1)".to_string()
            }
        );
        assert_eq!(
            class_of("amount", "int unsigned"),
            FieldClassification::Unrecognized {
                raw_type: "int unsigned".to_string()
            }
        );
    }

    #[test]
    fn test_entity_ref_derivation() {
        let entity = EntityRef::from_field("parent_category_id");
        assert_eq!(entity.accessor, "parent_category");
        assert_eq!(entity.type_name, "ParentCategory");
        assert_eq!(entity.api_module, "parentCategory");
        assert_eq!(entity.api_binding(), "ParentCategoryApi");
        assert_eq!(entity.model_import(), "use App\\Models\\ParentCategory;");
    }

    #[test]
    fn test_entity_ref_without_underscore_uses_whole_name() {
        let entity = EntityRef::from_field("owner");
        assert_eq!(entity.accessor, "owner");
        assert_eq!(entity.type_name, "Owner");

        for field in ["_owner", "__owner"] {
            let entity = EntityRef::from_field(field);
            assert_eq!(entity.accessor, "owner", "{field}");
            assert_eq!(entity.type_name, "Owner", "{field}");
        }
        let entity = EntityRef::from_field("_owner_id");
        assert_eq!(entity.accessor, "owner");
        assert_eq!(entity.api_module, "owner");

        assert!(EntityRef::from_field("_id").names_identifier());
        assert_eq!(
            classify(&ColumnRecord::new("_id", "bigint unsigned", false, "")),
            FieldClassification::IntegerNumber
        );
        assert_matches!(
            classify(&ColumnRecord::new("_owner_id", "bigint unsigned", false, "")),
            FieldClassification::ForeignKey { referenced_entity } if referenced_entity.type_name == "Owner"
        );
    }

    #[test]
    fn test_diagnostics_only_for_unrecognized() {
        let columns = classify_all(vec![
            ColumnRecord::new("name", "varchar(20)", false, ""),
            ColumnRecord::new("blob", "longblob", false, ""),
        ]);
        let found = diagnostics(&columns);
        assert_eq!(found.len(), 1);
        assert!(found[0].to_string().contains("longblob"));
    }
}
