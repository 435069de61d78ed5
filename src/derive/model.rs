//! Eloquent model support: enum constant placeholders, attribute casts and
//! `belongsTo` relationship stubs.

use serde::Serialize;

use crate::schema::{ClassifiedTable, FieldClassification};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelSupport {
    pub constants: Vec<String>,
    pub casts: Vec<String>,
    pub relationships: Vec<String>,
    /// The table has a `deleted_at` column.
    pub soft_deletes: bool,
}

/// Unlike the request and resource derivers this one does not drop the
/// framework-managed fields by name; they are simply never enum, json or
/// foreign-key columns because classification claims them first.
pub fn derive_model_support(table: &ClassifiedTable) -> ModelSupport {
    let mut support = ModelSupport {
        soft_deletes: table.has_field("deleted_at"),
        ..ModelSupport::default()
    };

    for column in &table.columns {
        match &column.class {
            FieldClassification::EnumCode => support
                .constants
                .push(format!("// TODO: fill {} constant value", column.field())),
            FieldClassification::JsonBlob => support
                .casts
                .push(format!("'{}' => 'array',", column.field())),
            FieldClassification::ForeignKey { referenced_entity } => {
                support.relationships.push(format!(
                    "// TODO: update hasOne or hasMany method in {entity} model\n    \
                     public function {accessor}()\n    \
                     {{\n        \
                     return $this->belongsTo({entity}::class);\n    \
                     }}",
                    entity = referenced_entity.type_name,
                    accessor = referenced_entity.accessor,
                ));
            }
            _ => {}
        }
    }

    support
}
