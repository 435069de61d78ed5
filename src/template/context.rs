//! Render contexts.
//!
//! A [`RenderContext`] is the whole input of one template render: the entity
//! names, a display title, the primary fragment list, sorted auxiliary imports
//! and any additional named fragment lists or flags the template needs. The
//! functions below assemble the context for each artifact type from the
//! derivers' output; contexts are built fresh per run and never stored.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::derive::{
    RuleMode, SearchEntry, derive_model_support, derive_resource_fields,
    derive_search_strategies, derive_ui_descriptors, derive_validation_rules,
};
use crate::schema::{ClassifiedTable, EntityNames};

#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub entity: EntityNames,
    pub display_title: String,
    pub fragments: Vec<String>,
    pub auxiliary_imports: BTreeSet<String>,
    pub sections: BTreeMap<String, Vec<String>>,
    pub flags: BTreeMap<String, bool>,
}

impl RenderContext {
    pub fn new(entity: &EntityNames, display_title: impl Into<String>) -> Self {
        Self {
            entity: entity.clone(),
            display_title: display_title.into(),
            fragments: Vec::new(),
            auxiliary_imports: BTreeSet::new(),
            sections: BTreeMap::new(),
            flags: BTreeMap::new(),
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<String>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_imports(mut self, imports: impl IntoIterator<Item = String>) -> Self {
        self.auxiliary_imports.extend(imports);
        self
    }

    pub fn with_section(mut self, name: &str, fragments: Vec<String>) -> Self {
        self.sections.insert(name.to_string(), fragments);
        self
    }

    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.flags.insert(name.to_string(), value);
        self
    }

    pub fn section(&self, name: &str) -> &[String] {
        self.sections.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn to_tera(&self) -> tera::Result<tera::Context> {
        tera::Context::from_serialize(self)
    }
}

/// The seven form requests generated per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum RequestKind {
    BulkDestroyRequest,
    DestroyRequest,
    IndexRequest,
    QueryRequest,
    ShowRequest,
    StoreRequest,
    UpdateRequest,
}

impl RequestKind {
    pub fn all() -> impl Iterator<Item = RequestKind> {
        RequestKind::iter()
    }

    pub fn template_id(&self) -> String {
        format!("php/request/{self}.php")
    }

    /// Store and Update carry field rules; the rest are fixed.
    pub fn rule_mode(&self) -> Option<RuleMode> {
        match self {
            RequestKind::StoreRequest => Some(RuleMode::Create),
            RequestKind::UpdateRequest => Some(RuleMode::Update),
            _ => None,
        }
    }
}

// =============================================================================
// php target
// =============================================================================

pub fn controller_context(table: &ClassifiedTable, title: &str) -> RenderContext {
    RenderContext::new(&table.entity, title)
}

pub fn request_context(table: &ClassifiedTable, title: &str, kind: RequestKind) -> RenderContext {
    let context = RenderContext::new(&table.entity, title).with_flag("has_enum", false);
    match kind.rule_mode() {
        Some(mode) => {
            let rules = derive_validation_rules(table, mode);
            context
                .with_fragments(rules.fragments())
                .with_imports(rules.imports)
                .with_section("attributes", rules.attributes)
                .with_flag("has_enum", rules.has_enum)
        }
        None => context,
    }
}

pub fn resource_context(table: &ClassifiedTable, title: &str) -> RenderContext {
    RenderContext::new(&table.entity, title).with_fragments(derive_resource_fields(table))
}

pub fn model_context(table: &ClassifiedTable, title: &str) -> RenderContext {
    let support = derive_model_support(table);
    RenderContext::new(&table.entity, title)
        .with_fragments(support.relationships)
        .with_section("constants", support.constants)
        .with_section("casts", support.casts)
        .with_flag("soft_deletes", support.soft_deletes)
}

pub fn service_context(table: &ClassifiedTable, title: &str) -> RenderContext {
    let strategies = derive_search_strategies(table)
        .iter()
        .map(SearchEntry::render)
        .collect();
    RenderContext::new(&table.entity, title).with_fragments(strategies)
}

pub fn route_context(entity: &EntityNames, title: &str) -> RenderContext {
    RenderContext::new(entity, title)
}

// =============================================================================
// web target
// =============================================================================

pub fn api_context(entity: &EntityNames, title: &str) -> RenderContext {
    RenderContext::new(entity, title)
}

pub fn view_context(entity: &EntityNames, title: &str) -> RenderContext {
    RenderContext::new(entity, title)
}

pub fn structure_context(table: &ClassifiedTable, title: &str) -> RenderContext {
    let ui = derive_ui_descriptors(table);
    RenderContext::new(&table.entity, title)
        .with_fragments(ui.fragments)
        .with_imports(ui.imports)
        .with_flag("has_enum", ui.has_enum)
}

pub fn menu_context(entity: &EntityNames, title: &str) -> RenderContext {
    RenderContext::new(entity, title)
}

pub fn router_context(entity: &EntityNames, title: &str) -> RenderContext {
    RenderContext::new(entity, title)
}
