//! Table schema input: raw column records, their classification, and the
//! naming of the entity being generated.

pub mod classify;
pub mod column;

pub use classify::{
    AuditKind, ClassifiedColumn, EntityRef, FieldClassification, SUPPRESSED_FIELDS, classify,
    classify_all, diagnostics,
};
pub use column::ColumnRecord;

use serde::Serialize;

use crate::inflect;

/// The names under which one model appears across both target stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityNames {
    /// As typed by the user, e.g. `productCategory`.
    pub model: String,
    /// `ProductCategory`.
    pub pascal: String,
    /// `productCategories`; also the table name.
    pub plural: String,
}

impl EntityNames {
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            pascal: inflect::capitalize(&model),
            plural: inflect::pluralize(&model),
            model,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.plural
    }
}

/// A model together with its classified columns in declaration order.
#[derive(Debug, Clone)]
pub struct ClassifiedTable {
    pub entity: EntityNames,
    pub columns: Vec<ClassifiedColumn>,
}

impl ClassifiedTable {
    pub fn new(entity: EntityNames, records: Vec<ColumnRecord>) -> Self {
        Self {
            entity,
            columns: classify_all(records),
        }
    }

    /// Columns that take part in validation, resource and UI output.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ClassifiedColumn> {
        self.columns.iter().filter(|column| !column.is_suppressed())
    }

    pub fn has_enum(&self) -> bool {
        self.columns
            .iter()
            .any(|column| column.class == FieldClassification::EnumCode)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.columns.iter().any(|column| column.field() == field)
    }
}
