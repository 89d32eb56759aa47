use chrono::{DateTime, Utc};
use hamlet_core::inflector;
use hamlet_core::{
    renderable_attributes, AttributeSpec, ControllerType, FormType, NamingContext, Profile, Result,
};
use serde::Serialize;
use tera::Context;

use crate::templates::template_error;

/// Names the views and controllers use for the scaffolded resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNames {
    /// Instance variable and route helper stem, e.g. `widget`.
    pub singular: String,
    pub plural: String,
    /// Fully qualified model class.
    pub model: String,
    /// Key of the submitted form parameters.
    pub param_key: String,
    pub human: String,
    pub human_plural: String,
}

impl ResourceNames {
    pub fn from_naming(naming: &NamingContext) -> Self {
        Self {
            singular: naming.controller.singular_name.clone(),
            plural: naming.controller.plural_name.clone(),
            model: naming.class_name.clone(),
            param_key: inflector::underscore(&naming.class_name).replace('/', "_"),
            human: inflector::humanize(&naming.singular_name),
            human_plural: inflector::humanize(&naming.controller.plural_name),
        }
    }
}

/// Switches visible to the templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateOptions {
    pub has_position: bool,
    pub skip_timestamps: bool,
    pub include_helper: bool,
    pub userstamps: bool,
    pub scope_everything: bool,
    pub controller_type: ControllerType,
    pub form_type: FormType,
    pub profile: Profile,
}

/// Everything a scaffold template can refer to
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    pub naming: NamingContext,
    pub resource: ResourceNames,
    /// Attributes shown in views and forms.
    pub attributes: Vec<AttributeSpec>,
    /// Every column, in command line order.
    pub all_attributes: Vec<AttributeSpec>,
    pub options: TemplateOptions,
    pub migration_name: String,
    pub generated_at: String,
}

impl TemplateContext {
    pub fn new(
        naming: NamingContext,
        all_attributes: Vec<AttributeSpec>,
        extra_reserved: &[String],
        options: TemplateOptions,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            resource: ResourceNames::from_naming(&naming),
            attributes: renderable_attributes(&all_attributes, extra_reserved),
            migration_name: migration_name(&naming),
            generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            all_attributes,
            options,
            naming,
        }
    }

    pub fn to_tera(&self) -> Result<Context> {
        Context::from_serialize(self).map_err(template_error)
    }
}

/// `admin_widgets` -> `CreateAdminWidgets`
pub fn migration_name(naming: &NamingContext) -> String {
    format!("Create{}", inflector::camelize(&naming.table_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hamlet_core::{parse_attributes, Inflections, NameResolver};

    fn options() -> TemplateOptions {
        TemplateOptions {
            has_position: true,
            skip_timestamps: false,
            include_helper: false,
            userstamps: true,
            scope_everything: false,
            controller_type: ControllerType::Regular,
            form_type: FormType::Formtastic,
            profile: Profile::Full,
        }
    }

    fn naming(raw: &str) -> NamingContext {
        let inflections = Inflections::english();
        NameResolver::new(&inflections)
            .with_application_name("Shop")
            .resolve(raw, false)
            .unwrap()
    }

    #[test]
    fn test_resource_names() {
        let names = ResourceNames::from_naming(&naming("LineItem"));
        assert_eq!(names.singular, "line_item");
        assert_eq!(names.plural, "line_items");
        assert_eq!(names.model, "LineItem");
        assert_eq!(names.param_key, "line_item");
        assert_eq!(names.human, "Line item");
        assert_eq!(names.human_plural, "Line items");

        let names = ResourceNames::from_naming(&naming("Admin::Widget"));
        assert_eq!(names.model, "Admin::Widget");
        assert_eq!(names.param_key, "admin_widget");
        assert_eq!(names.plural, "widgets");
    }

    #[test]
    fn test_context_filters_attributes() {
        let attributes =
            parse_attributes(&["body:text", "title:string", "created_by:integer", "position:integer"])
                .unwrap();
        let now = Utc.with_ymd_and_hms(2009, 3, 14, 15, 9, 26).unwrap();
        let context = TemplateContext::new(naming("widget"), attributes, &[], options(), now);

        let shown: Vec<&str> = context.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(shown, vec!["title", "body"]);
        assert_eq!(context.all_attributes.len(), 4);
        assert_eq!(context.migration_name, "CreateWidgets");
        assert_eq!(context.generated_at, "2009-03-14 15:09:26");
    }

    #[test]
    fn test_to_tera_exposes_nested_values() {
        let now = Utc.with_ymd_and_hms(2009, 3, 14, 15, 9, 26).unwrap();
        let context = TemplateContext::new(naming("Admin::Widget"), vec![], &[], options(), now);
        let tera_context = context.to_tera().unwrap();
        let json = tera_context.into_json();

        assert_eq!(json["naming"]["class_name"], "Admin::Widget");
        assert_eq!(json["naming"]["controller"]["class_name"], "Admin::Widgets");
        assert_eq!(json["options"]["form_type"], "formtastic");
        assert_eq!(json["options"]["profile"], "full");
        assert_eq!(json["migration_name"], "CreateAdminWidgets");
    }
}
