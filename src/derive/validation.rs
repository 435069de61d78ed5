//! Request validation rules.
//!
//! One [`FieldRule`] per visible column. The optionality markers come first
//! (`sometimes` for update requests, `required` when the column has no
//! default), then the type constraint drawn from the classification.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{RuleMode, not_predefined};
use crate::schema::{ClassifiedColumn, ClassifiedTable, FieldClassification};
use crate::template::escape::php_str;

const ENTRY_INDENT: &str = "                ";
const CLOSE_INDENT: &str = "            ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RuleEntry {
    /// A plain rule name such as `required` or `max:255`.
    Keyword(String),
    /// A PHP expression; forces the array form of the rule.
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: String,
    pub entries: Vec<RuleEntry>,
    pub note: Option<String>,
}

impl FieldRule {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            entries: Vec::new(),
            note: None,
        }
    }

    fn keyword(&mut self, keyword: impl Into<String>) {
        self.entries.push(RuleEntry::Keyword(keyword.into()));
    }

    fn expression(&mut self, expression: impl Into<String>) {
        self.entries.push(RuleEntry::Expression(expression.into()));
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            RuleEntry::Keyword(keyword) => Some(keyword.as_str()),
            RuleEntry::Expression(_) => None,
        })
    }

    pub fn is_required(&self) -> bool {
        self.keywords().any(|keyword| keyword == "required")
    }

    pub fn is_sometimes(&self) -> bool {
        self.keywords().any(|keyword| keyword == "sometimes")
    }

    fn is_array_form(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, RuleEntry::Expression(_)))
    }

    /// Renders the `'field' => ...,` line(s) of a request `rules()` array.
    pub fn render(&self) -> String {
        let note = self
            .note
            .as_deref()
            .map(|note| format!(" {note}"))
            .unwrap_or_default();

        if !self.is_array_form() {
            let joined = self.keywords().collect::<Vec<_>>().join("|");
            return format!("'{}' => '{}',{}", self.field, joined, note);
        }

        let mut out = format!("'{}' => [\n", self.field);
        let last = self.entries.len().saturating_sub(1);
        for (idx, entry) in self.entries.iter().enumerate() {
            out.push_str(ENTRY_INDENT);
            match entry {
                RuleEntry::Keyword(keyword) => out.push_str(&format!("'{keyword}'")),
                RuleEntry::Expression(expression) => out.push_str(expression),
            }
            out.push(',');
            if idx == last {
                out.push_str(&note);
            }
            out.push('\n');
        }
        out.push_str(CLOSE_INDENT);
        out.push_str("],");
        out
    }
}

/// Everything a Store/Update request template needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRules {
    pub mode: RuleMode,
    pub rules: Vec<FieldRule>,
    /// `'field' => 'Title',` lines for the `attributes()` array.
    pub attributes: Vec<String>,
    /// `use App\Models\...;` lines, sorted and deduplicated.
    pub imports: BTreeSet<String>,
    pub has_enum: bool,
}

impl ValidationRules {
    pub fn fragments(&self) -> Vec<String> {
        self.rules.iter().map(FieldRule::render).collect()
    }
}

pub fn derive_validation_rules(table: &ClassifiedTable, mode: RuleMode) -> ValidationRules {
    let mut imports = BTreeSet::new();
    let has_enum = table.has_enum();
    if has_enum {
        imports.insert(format!("use App\\Models\\{};", table.entity.pascal));
    }

    let mut rules = Vec::new();
    let mut attributes = Vec::new();
    for column in table.visible_columns() {
        attributes.push(format!(
            "'{}' => '{}',",
            column.field(),
            php_str(column.title())
        ));
        if let Some(entity) = column.foreign_entity() {
            imports.insert(entity.model_import());
        }
        rules.push(rule_for(column, mode));
    }

    ValidationRules {
        mode,
        rules,
        attributes,
        imports,
        has_enum,
    }
}

fn rule_for(column: &ClassifiedColumn, mode: RuleMode) -> FieldRule {
    let mut rule = FieldRule::new(column.field());
    if mode == RuleMode::Update {
        rule.keyword("sometimes");
    }
    if !column.has_default() {
        rule.keyword("required");
    }

    match &column.class {
        FieldClassification::BoundedString { max_len } => rule.keyword(format!("max:{max_len}")),
        FieldClassification::DecimalAmount { .. } => {
            rule.keyword("numeric");
            rule.keyword("min:0");
        }
        FieldClassification::IntegerNumber => rule.keyword("integer"),
        FieldClassification::FloatNumber => rule.keyword("numeric"),
        FieldClassification::DateOnly => rule.keyword("date_format:Y-m-d"),
        FieldClassification::TimeOnly => rule.keyword("date_format:H:i:s"),
        FieldClassification::DateTime => rule.keyword("date_format:Y-m-d H:i:s"),
        FieldClassification::EnumCode => {
            rule.expression("Rule::in([])");
            rule.note = Some("// TODO: fill constant value".to_string());
        }
        FieldClassification::ForeignKey { referenced_entity } => {
            rule.keyword("integer");
            rule.expression(format!(
                "function ($attribute, $value, $fail) {{\n\
                 {indent}    if ({entity}::where('id', $value)->doesntExist()) {{\n\
                 {indent}        $fail('{title}不存在');\n\
                 {indent}    }}\n\
                 {indent}}}",
                indent = ENTRY_INDENT,
                entity = referenced_entity.type_name,
                title = php_str(column.title()),
            ));
        }
        FieldClassification::Unrecognized { raw_type } => {
            rule.note = Some(not_predefined(raw_type));
        }
        FieldClassification::FreeText | FieldClassification::JsonBlob => {}
        FieldClassification::Identifier | FieldClassification::AuditTimestamp { .. } => {}
    }

    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnRecord, EntityNames};

    fn table(columns: Vec<ColumnRecord>) -> ClassifiedTable {
        ClassifiedTable::new(EntityNames::new("product"), columns)
    }

    #[test]
    fn test_rule_per_classification() {
        let cases = [
            ("name", "varchar(50)", "'name' => 'required|max:50',"),
            ("summary", "text", "'summary' => 'required',"),
            ("price", "decimal(10,2)", "'price' => 'required|numeric|min:0',"),
            ("stock", "int", "'stock' => 'required|integer',"),
            ("weight", "float", "'weight' => 'required|numeric',"),
            ("ship_on", "date", "'ship_on' => 'required|date_format:Y-m-d',"),
            ("open_at", "time", "'open_at' => 'required|date_format:H:i:s',"),
            ("paid_at", "datetime", "'paid_at' => 'required|date_format:Y-m-d H:i:s',"),
            ("meta", "json", "'meta' => 'required',"),
            (
                "status",
                "tinyint unsigned",
                "'status' => [\n                'required',\n                Rule::in([]), // TODO: fill constant value\n            ],",
            ),
            (
                "flag",
                "bit(1)",
                "'flag' => 'required', // TODO: bit(1) is not predefined",
            ),
        ];
        for (field, raw_type, expected) in cases {
            let rules = derive_validation_rules(
                &table(vec![ColumnRecord::new(field, raw_type, false, "标题")]),
                RuleMode::Create,
            );
            assert_eq!(rules.fragments(), vec![expected], "{raw_type}");
        }

        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("shop_id", "bigint unsigned", false, "店铺")]),
            RuleMode::Create,
        );
        let rendered = rules.rules[0].render();
        assert!(rendered.starts_with("'shop_id' => [\n                'required',\n                'integer',\n"));
        assert!(rendered.contains("if (Shop::where('id', $value)->doesntExist()) {"));
    }

    #[test]
    fn test_pipe_form_for_plain_columns() {
        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("name", "varchar(64)", false, "名称")]),
            RuleMode::Create,
        );
        assert_eq!(rules.fragments(), vec!["'name' => 'required|max:64',"]);
        assert_eq!(rules.attributes, vec!["'name' => '名称',"]);
    }

    #[test]
    fn test_update_mode_prefixes_sometimes() {
        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("stock", "int", true, "库存")]),
            RuleMode::Update,
        );
        assert_eq!(rules.fragments(), vec!["'stock' => 'sometimes|integer',"]);
    }

    #[test]
    fn test_enum_uses_array_form_and_imports_own_model() {
        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("status", "tinyint unsigned", false, "状态")]),
            RuleMode::Create,
        );
        let rendered = &rules.fragments()[0];
        assert!(rendered.starts_with("'status' => [\n"));
        assert!(rendered.contains("'required',\n"));
        assert!(rendered.contains("Rule::in([]), // TODO: fill constant value\n"));
        assert!(rendered.ends_with("            ],"));
        assert!(rules.has_enum);
        assert!(rules.imports.contains("use App\\Models\\Product;"));
    }

    #[test]
    fn test_unrecognized_carries_todo_marker() {
        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("flag", "tinyint(1)", true, "")]),
            RuleMode::Create,
        );
        assert_eq!(
            rules.fragments(),
            vec!["'flag' => '', // TODO: tinyint(1) is not predefined"]
        );
    }

    #[test]
    fn test_title_quotes_are_escaped() {
        let rules = derive_validation_rules(
            &table(vec![ColumnRecord::new("note", "text", false, "Owner's")]),
            RuleMode::Create,
        );
        assert_eq!(rules.attributes, vec!["'note' => 'Owner\\'s',"]);
    }
}
