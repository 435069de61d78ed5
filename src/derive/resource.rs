use crate::schema::ClassifiedTable;

/// Resource `toArray()` entries, one per visible column. A foreign key adds a
/// nested resource keyed by the relation accessor right after its own field.
pub fn derive_resource_fields(table: &ClassifiedTable) -> Vec<String> {
    let mut fields = Vec::new();
    for column in table.visible_columns() {
        fields.push(format!("'{0}' => $this->{0},", column.field()));
        if let Some(entity) = column.foreign_entity() {
            fields.push(format!(
                "'{accessor}' => new {resource}Resource($this->{accessor}),",
                accessor = entity.accessor,
                resource = entity.type_name,
            ));
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnRecord, EntityNames};

    #[test]
    fn test_foreign_key_adds_nested_resource() {
        let table = ClassifiedTable::new(
            EntityNames::new("product"),
            vec![
                ColumnRecord::new("id", "bigint unsigned", false, ""),
                ColumnRecord::new("parent_category_id", "bigint unsigned", false, "上级分类"),
                ColumnRecord::new("name", "varchar(20)", false, "名称"),
            ],
        );
        assert_eq!(
            derive_resource_fields(&table),
            vec![
                "'parent_category_id' => $this->parent_category_id,",
                "'parent_category' => new ParentCategoryResource($this->parent_category),",
                "'name' => $this->name,",
            ]
        );
    }
}
