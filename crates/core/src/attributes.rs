use serde::Serialize;

use crate::error::{HamletError, Result};
use crate::inflector;

/// Attributes that never show up in the rendered model, views or forms.
pub const RESERVED_ATTRIBUTES: [&str; 3] = ["created_by", "updated_by", "position"];

/// Attributes rendered ahead of all others.
pub const LEADING_ATTRIBUTES: [&str; 2] = ["name", "title"];

/// One `name:type` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSpec {
    pub name: String,
    /// Column type as typed, e.g. `string`, `integer`, `text`.
    pub column_type: String,
    /// Form helper used by the views, e.g. `text_field`.
    pub field_type: String,
    /// Sample value for fixtures and tests.
    pub default: String,
    pub human_name: String,
    /// Referenced model for `*_id` attributes.
    pub association: Option<String>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        let name = name.into();
        let column_type = column_type.into();
        Self {
            field_type: field_type_for(&column_type).to_string(),
            default: default_for(&column_type).to_string(),
            human_name: inflector::humanize(&name),
            association: name
                .strip_suffix("_id")
                .filter(|association| !association.is_empty())
                .map(str::to_string),
            name,
            column_type,
        }
    }

    /// Parses a single `name:type` definition.
    pub fn parse(definition: &str) -> Result<Self> {
        let mut parts = definition.trim().splitn(2, ':');
        let name = parts.next().unwrap_or_default().trim();
        let column_type = parts.next().unwrap_or_default().trim();

        let valid_name = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_name || column_type.is_empty() || column_type.contains(':') {
            return Err(HamletError::InvalidAttribute {
                definition: definition.to_string(),
            });
        }

        Ok(Self::new(name, column_type))
    }

    /// Name of the model this attribute belongs to, for `*_id` attributes.
    pub fn association_name(&self) -> Option<&str> {
        self.association.as_deref()
    }

    pub fn is(&self, name: &str, column_type: &str) -> bool {
        self.name == name && self.column_type == column_type
    }
}

/// Parses every `name:type` argument, keeping command line order.
pub fn parse_attributes<S: AsRef<str>>(definitions: &[S]) -> Result<Vec<AttributeSpec>> {
    definitions
        .iter()
        .flat_map(|definition| definition.as_ref().split(','))
        .filter(|definition| !definition.trim().is_empty())
        .map(AttributeSpec::parse)
        .collect()
}

/// Drops reserved attributes and moves `name`/`title` to the front.
///
/// Both groups keep their original relative order.
pub fn renderable_attributes(
    attributes: &[AttributeSpec],
    extra_reserved: &[String],
) -> Vec<AttributeSpec> {
    let kept = attributes.iter().filter(|attribute| {
        !RESERVED_ATTRIBUTES.contains(&attribute.name.as_str())
            && !extra_reserved.contains(&attribute.name)
    });

    let (leading, rest): (Vec<&AttributeSpec>, Vec<&AttributeSpec>) =
        kept.partition(|attribute| LEADING_ATTRIBUTES.contains(&attribute.name.as_str()));

    leading.into_iter().chain(rest).cloned().collect()
}

fn field_type_for(column_type: &str) -> &'static str {
    match column_type {
        "integer" | "float" | "decimal" | "string" => "text_field",
        "time" => "time_select",
        "datetime" | "timestamp" => "datetime_select",
        "date" => "date_select",
        "text" => "text_area",
        "boolean" => "check_box",
        _ => "text_field",
    }
}

fn default_for(column_type: &str) -> &'static str {
    match column_type {
        "integer" => "1",
        "float" => "1.5",
        "decimal" => "9.99",
        "datetime" | "timestamp" | "time" => "2000-01-01 00:00:00",
        "date" => "2000-01-01",
        "string" => "MyString",
        "text" => "MyText",
        "boolean" => "false",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(attributes: &[AttributeSpec]) -> Vec<String> {
        attributes
            .iter()
            .map(|a| format!("{}:{}", a.name, a.column_type))
            .collect()
    }

    #[test]
    fn test_parse_attribute() {
        let attribute = AttributeSpec::parse("author_id:integer").unwrap();
        assert_eq!(attribute.name, "author_id");
        assert_eq!(attribute.column_type, "integer");
        assert_eq!(attribute.field_type, "text_field");
        assert_eq!(attribute.default, "1");
        assert_eq!(attribute.human_name, "Author");
        assert_eq!(attribute.association_name(), Some("author"));
        assert_eq!(AttributeSpec::new("title", "string").association_name(), None);
    }

    #[test]
    fn test_field_types() {
        assert_eq!(AttributeSpec::new("body", "text").field_type, "text_area");
        assert_eq!(AttributeSpec::new("active", "boolean").field_type, "check_box");
        assert_eq!(AttributeSpec::new("born_on", "date").field_type, "date_select");
        assert_eq!(AttributeSpec::new("starts_at", "datetime").field_type, "datetime_select");
        assert_eq!(AttributeSpec::new("data", "binary").default, "");
    }

    #[test]
    fn test_parse_rejects_malformed_definitions() {
        for definition in ["title", "title:", ":string", "Title:string", "a:b:c", "ti tle:string"] {
            assert!(
                matches!(AttributeSpec::parse(definition), Err(HamletError::InvalidAttribute { .. })),
                "{}",
                definition
            );
        }
    }

    #[test]
    fn test_parse_attributes_accepts_comma_lists() {
        let attributes = parse_attributes(&["title:string,body:text", "position:integer"]).unwrap();
        assert_eq!(
            names(&attributes),
            vec!["title:string", "body:text", "position:integer"]
        );
    }

    #[test]
    fn test_renderable_attributes_order() {
        let attributes =
            parse_attributes(&["age:integer", "title:string", "created_by:integer", "name:string"])
                .unwrap();
        let ordered = renderable_attributes(&attributes, &[]);
        assert_eq!(names(&ordered), vec!["title:string", "name:string", "age:integer"]);
    }

    #[test]
    fn test_renderable_attributes_extra_reserved() {
        let attributes = parse_attributes(&[
            "company_id:integer",
            "body:text",
            "position:integer",
            "updated_by:integer",
            "subject:string",
        ])
        .unwrap();
        let ordered = renderable_attributes(&attributes, &["company_id".to_string()]);
        assert_eq!(names(&ordered), vec!["body:text", "subject:string"]);
    }
}
