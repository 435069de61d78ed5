use serde::Serialize;
use strum::Display;

use crate::schema::{AuditKind, ClassifiedColumn, ClassifiedTable, FieldClassification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchStrategy {
    Fuzzy,
    Range,
    JsonContain,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub field: String,
    pub strategy: SearchStrategy,
}

impl SearchEntry {
    pub fn render(&self) -> String {
        format!("'{}' => '{}',", self.field, self.strategy)
    }
}

/// Default search strategy per column for the service's query builder.
///
/// `updated_at` and `deleted_at` are never searchable. Numeric columns get no
/// default and are left for manual completion.
pub fn derive_search_strategies(table: &ClassifiedTable) -> Vec<SearchEntry> {
    table
        .columns
        .iter()
        .filter_map(|column| {
            strategy_for(column).map(|strategy| SearchEntry {
                field: column.field().to_string(),
                strategy,
            })
        })
        .collect()
}

fn strategy_for(column: &ClassifiedColumn) -> Option<SearchStrategy> {
    match &column.class {
        FieldClassification::AuditTimestamp {
            audit: AuditKind::Updated | AuditKind::Deleted,
        } => None,
        FieldClassification::AuditTimestamp {
            audit: AuditKind::Created,
        } => Some(SearchStrategy::Range),
        FieldClassification::BoundedString { .. } | FieldClassification::FreeText => {
            Some(SearchStrategy::Fuzzy)
        }
        class if class.is_temporal() => Some(SearchStrategy::Range),
        FieldClassification::Unrecognized { raw_type }
            if raw_type.trim().eq_ignore_ascii_case("timestamp") =>
        {
            Some(SearchStrategy::Range)
        }
        FieldClassification::JsonBlob => Some(SearchStrategy::JsonContain),
        class if class.is_numeric() => None,
        _ => Some(SearchStrategy::Equal),
    }
}
