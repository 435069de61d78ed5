//! Artifact derivers.
//!
//! Each deriver is a pure function over a [`ClassifiedTable`] that yields the
//! text fragments for one output concern, in column declaration order:
//!
//! - [`validation`]: request rule sets and attribute titles
//! - [`resource`]: resource field exposure
//! - [`model`]: enum constants, casts and relationship stubs
//! - [`search`]: per-column search strategy
//! - [`ui`]: admin UI field descriptors and API imports
//!
//! Derivers never fail. Column types with no mapping are emitted with an inline
//! `TODO` marker so the generated file still renders.
//!
//! [`ClassifiedTable`]: crate::schema::ClassifiedTable

pub mod model;
pub mod resource;
pub mod search;
pub mod ui;
pub mod validation;

use serde::Serialize;
use strum::Display;

pub use model::{ModelSupport, derive_model_support};
pub use resource::derive_resource_fields;
pub use search::{SearchEntry, SearchStrategy, derive_search_strategies};
pub use ui::{UiDescriptors, UiField, UiWidget, derive_ui_descriptors};
pub use validation::{FieldRule, ValidationRules, derive_validation_rules};

/// Whether rules are generated for a create request or an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuleMode {
    Create,
    Update,
}

/// Marker appended to fragments the generator could not complete.
pub(crate) fn not_predefined(raw_type: &str) -> String {
    format!("// TODO: {raw_type} is not predefined")
}
