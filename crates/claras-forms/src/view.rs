#![forbid(unsafe_code)]

//! Render plan: what a front end needs to draw each visible field.

use crate::errors::FormErrors;
use crate::field::{ChoiceOption, FieldDescriptor, FieldWidth, InputControl};
use crate::value::{FieldValue, FormValues};

/// Everything needed to draw one visible field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub control: InputControl,
    pub value: &'a FieldValue,
    /// Inline error, if the field failed the last validation.
    pub error: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub help_text: Option<&'a str>,
    pub options: &'a [ChoiceOption],
    /// Label of the selected option, for choice kinds.
    pub selected_label: Option<&'a str>,
    pub required: bool,
    pub disabled: bool,
    pub width: FieldWidth,
}

impl FieldView<'_> {
    /// Label with a trailing marker for required fields.
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.to_string()
        }
    }
}

/// Build views for the fields visible under `values`, in schema order.
#[must_use]
pub fn build_views<'a>(
    fields: &'a [FieldDescriptor],
    values: &'a FormValues,
    errors: &'a FormErrors,
) -> Vec<FieldView<'a>> {
    fields
        .iter()
        .filter(|f| f.is_visible(values))
        .map(|field| {
            let value = values.value(&field.name);
            FieldView {
                name: &field.name,
                label: field.label_text(),
                control: field.control(),
                value,
                error: errors.get(&field.name),
                placeholder: field.placeholder.as_deref(),
                help_text: field.help_text.as_deref(),
                options: &field.options,
                selected_label: if field.kind.is_choice() {
                    field.option_label(value)
                } else {
                    None
                },
                required: field.required,
                disabled: field.disabled,
                width: field.width,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_carry_errors_and_selection() {
        let fields = vec![
            FieldDescriptor::text("nombre").label("Nombre").required(),
            FieldDescriptor::select("tipo", [("depto", "Departamento"), ("casa", "Casa")]),
            FieldDescriptor::text("oculto").show_if(|_| false),
        ];
        let values = FormValues::new()
            .with("nombre", "")
            .with("tipo", "casa");
        let errors: FormErrors = [("nombre", "Nombre is required")].into_iter().collect();

        let views = build_views(&fields, &values, &errors);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].error, Some("Nombre is required"));
        assert_eq!(views[0].display_label(), "Nombre *");
        assert_eq!(views[1].selected_label, Some("Casa"));
        assert_eq!(views[1].control, InputControl::Dropdown);
        assert_eq!(views[1].display_label(), "tipo");
    }
}
