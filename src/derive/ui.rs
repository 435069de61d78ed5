//! Admin UI field descriptors.
//!
//! Produces the entries of the `structure` array consumed by the generic list
//! and form views, plus one API import per entity the view talks to.

use std::collections::BTreeSet;

use serde::Serialize;

use super::not_predefined;
use crate::schema::{ClassifiedColumn, ClassifiedTable, EntityRef, FieldClassification};
use crate::template::escape::js_str;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum UiWidget {
    Text,
    Paragraph,
    Number { precision: Option<u32> },
    /// Options come from a constant lookup the developer fills in later.
    Options,
    Date,
    Time,
    DateTime,
    Foreign { entity: EntityRef },
    Fallback { raw_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiField {
    pub field: String,
    pub title: String,
    pub widget: UiWidget,
}

impl UiField {
    /// Renders one element of the `structure` array. `model` scopes the
    /// options lookup key for enum columns.
    pub fn render(&self, model: &str) -> String {
        let mut lines = vec![
            "{".to_string(),
            format!("      name: '{}',", self.field),
            format!("      title: '{}',", js_str(&self.title)),
        ];
        let mut trailer = String::new();

        match &self.widget {
            UiWidget::Text => lines.push("      type: 'text',".to_string()),
            UiWidget::Paragraph => lines.push("      type: 'paragraph',".to_string()),
            UiWidget::Number { precision: None } => {
                lines.push("      type: 'number',".to_string())
            }
            UiWidget::Number {
                precision: Some(precision),
            } => {
                lines.push("      type: 'number',".to_string());
                lines.push("      typeOptions: {".to_string());
                lines.push("        min: 0,".to_string());
                lines.push(format!("        precision: {precision},"));
                lines.push("      },".to_string());
            }
            UiWidget::Options => {
                lines.push(format!(
                    "      ...store.getters.getOptions('{model}.{}'), // TODO: update constant",
                    self.field
                ));
                lines.push("      sortable: false,".to_string());
            }
            UiWidget::Date => lines.push("      type: 'date',".to_string()),
            UiWidget::Time => lines.push("      type: 'time',".to_string()),
            UiWidget::DateTime => lines.push("      type: 'datetime',".to_string()),
            UiWidget::Foreign { entity } => {
                lines.push("      type: 'foreign',".to_string());
                lines.push("      query: async (keyword) =>".to_string());
                lines.push(format!(
                    "        (await {}.query({{ name: keyword }})).data.map((item) => ({{",
                    entity.api_binding()
                ));
                lines.push("          value: item.id,".to_string());
                lines.push("          label: item.name, // TODO: update model keyword".to_string());
                lines.push("        })),".to_string());
                lines.push("      sortable: false,".to_string());
            }
            UiWidget::Fallback { raw_type } => {
                lines.push("      type: 'text',".to_string());
                trailer = format!(" {}", not_predefined(raw_type));
            }
        }

        lines.push(format!("    }},{trailer}"));
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiDescriptors {
    pub fields: Vec<UiField>,
    /// Rendered `structure` entries, parallel to `fields`.
    pub fragments: Vec<String>,
    /// `import XApi from '@/apis/x';` lines, sorted and deduplicated.
    pub imports: BTreeSet<String>,
    pub has_enum: bool,
}

pub fn derive_ui_descriptors(table: &ClassifiedTable) -> UiDescriptors {
    let own_api = EntityRef {
        accessor: table.entity.model.clone(),
        type_name: table.entity.pascal.clone(),
        api_module: table.entity.model.clone(),
    };
    let mut imports = BTreeSet::from([api_import(&own_api)]);

    let fields: Vec<UiField> = table
        .visible_columns()
        .map(|column| {
            if let Some(entity) = column.foreign_entity() {
                imports.insert(api_import(entity));
            }
            UiField {
                field: column.field().to_string(),
                title: column.title().to_string(),
                widget: widget_for(column),
            }
        })
        .collect();

    let fragments = fields
        .iter()
        .map(|field| field.render(&table.entity.model))
        .collect();

    UiDescriptors {
        fields,
        fragments,
        imports,
        has_enum: table.has_enum(),
    }
}

fn api_import(entity: &EntityRef) -> String {
    format!(
        "import {} from '@/apis/{}';",
        entity.api_binding(),
        entity.api_module
    )
}

fn widget_for(column: &ClassifiedColumn) -> UiWidget {
    match &column.class {
        FieldClassification::BoundedString { .. } => UiWidget::Text,
        FieldClassification::FreeText => UiWidget::Paragraph,
        FieldClassification::DecimalAmount { precision } => UiWidget::Number {
            precision: Some(*precision),
        },
        FieldClassification::IntegerNumber | FieldClassification::FloatNumber => {
            UiWidget::Number { precision: None }
        }
        FieldClassification::EnumCode => UiWidget::Options,
        FieldClassification::DateOnly => UiWidget::Date,
        FieldClassification::TimeOnly => UiWidget::Time,
        FieldClassification::DateTime => UiWidget::DateTime,
        FieldClassification::ForeignKey { referenced_entity } => UiWidget::Foreign {
            entity: referenced_entity.clone(),
        },
        FieldClassification::JsonBlob => UiWidget::Fallback {
            raw_type: column.record.raw_type.clone(),
        },
        FieldClassification::Unrecognized { raw_type } => UiWidget::Fallback {
            raw_type: raw_type.clone(),
        },
        // Suppressed before we get here.
        FieldClassification::Identifier | FieldClassification::AuditTimestamp { .. } => {
            UiWidget::Text
        }
    }
}
