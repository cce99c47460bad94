#![forbid(unsafe_code)]

//! Field descriptors: the declarative schema a form is built from.
//!
//! A descriptor names a field, picks its [`FieldKind`], and carries the
//! constraints and display hints the engine needs:
//!
//! ```
//! use claras_forms::field::{FieldDescriptor, FieldKind, FieldWidth};
//!
//! let pisos = FieldDescriptor::new("pisos", FieldKind::Number)
//!     .label("Número de pisos")
//!     .required()
//!     .bounds(1.0, 60.0)
//!     .width(FieldWidth::Half);
//! assert_eq!(pisos.label_text(), "Número de pisos");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::value::{FieldValue, FormValues, ValueShape};

/// Caller-supplied validation hook. Returns `Some(message)` when invalid.
pub type CustomValidateFn = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Visibility predicate over the live form values.
pub type VisibilityFn = Arc<dyn Fn(&FormValues) -> bool + Send + Sync>;

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// The finite set of input kinds a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    #[default]
    ShortText,
    Email,
    Number,
    Date,
    DateTime,
    /// Single choice from a dropdown.
    Select,
    /// Multi-line text.
    TextArea,
    Boolean,
    /// Single choice from a visible set.
    Radio,
}

impl FieldKind {
    /// The payload shape values of this kind carry.
    #[must_use]
    pub const fn shape(self) -> ValueShape {
        match self {
            Self::Number => ValueShape::Number,
            Self::Boolean => ValueShape::Bool,
            Self::ShortText
            | Self::Email
            | Self::Date
            | Self::DateTime
            | Self::Select
            | Self::TextArea
            | Self::Radio => ValueShape::Text,
        }
    }

    /// Whether a value may be stored in a field of this kind.
    #[must_use]
    pub fn accepts(self, value: &FieldValue) -> bool {
        value.shape().is_none_or(|shape| shape == self.shape())
    }

    /// The value a field of this kind holds before anything is entered.
    #[must_use]
    pub fn empty_value(self) -> FieldValue {
        match self.shape() {
            ValueShape::Text => FieldValue::Text(String::new()),
            ValueShape::Number => FieldValue::Unset,
            ValueShape::Bool => FieldValue::Bool(false),
        }
    }

    /// Whether the kind draws its value from an option list.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Stable lowercase name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Select => "select",
            Self::TextArea => "textarea",
            Self::Boolean => "boolean",
            Self::Radio => "radio",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldWidth
// ---------------------------------------------------------------------------

/// Layout width of a field within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
}

// ---------------------------------------------------------------------------
// ChoiceOption
// ---------------------------------------------------------------------------

/// One `(value, label)` entry of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for ChoiceOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

// ---------------------------------------------------------------------------
// InputControl
// ---------------------------------------------------------------------------

/// The control a front end should draw for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputControl {
    /// Single-line input; `input_type` is the HTML input type.
    Text { input_type: &'static str },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
    },
    Dropdown,
    TextArea { rows: u16 },
    Checkbox,
    RadioGroup,
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Schema entry describing one input.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    /// Display label. Falls back to `name` when unset.
    pub label: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub validate: Option<CustomValidateFn>,
    pub help_text: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub rows: u16,
    pub disabled: bool,
    pub default_value: Option<FieldValue>,
    pub width: FieldWidth,
    pub show_if: Option<VisibilityFn>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("width", &self.width)
            .field("has_validate", &self.validate.is_some())
            .field("has_show_if", &self.show_if.is_some())
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    /// Create a descriptor with default settings for `kind`.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
            placeholder: None,
            options: Vec::new(),
            validate: None,
            help_text: None,
            min: None,
            max: None,
            step: 1.0,
            rows: 3,
            disabled: false,
            default_value: None,
            width: FieldWidth::Full,
            show_if: None,
        }
    }

    /// Shorthand for a short text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ShortText)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// A dropdown over `options`.
    pub fn select<O: Into<ChoiceOption>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = O>,
    ) -> Self {
        Self::new(name, FieldKind::Select).options(options)
    }

    /// A radio group over `options`.
    pub fn radio<O: Into<ChoiceOption>>(
        name: impl Into<String>,
        options: impl IntoIterator<Item = O>,
    ) -> Self {
        Self::new(name, FieldKind::Radio).options(options)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn options<O: Into<ChoiceOption>>(mut self, options: impl IntoIterator<Item = O>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a custom rule, run after the built-in ones.
    #[must_use]
    pub fn validate(
        mut self,
        f: impl Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set both numeric bounds.
    #[must_use]
    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: u16) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: FieldWidth) -> Self {
        self.width = width;
        self
    }

    /// Show the field only while `predicate` holds for the live values.
    #[must_use]
    pub fn show_if(
        mut self,
        predicate: impl Fn(&FormValues) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.show_if = Some(Arc::new(predicate));
        self
    }

    /// The label to display.
    #[must_use]
    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Evaluate the visibility predicate against `values`.
    ///
    /// Not cached: every call sees the current values.
    #[must_use]
    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.show_if.as_ref().is_none_or(|pred| pred(values))
    }

    /// Label of the option whose value equals `value`, for choice kinds.
    #[must_use]
    pub fn option_label(&self, value: &FieldValue) -> Option<&str> {
        let selected = value.as_text()?;
        self.options
            .iter()
            .find(|o| o.value == selected)
            .map(|o| o.label.as_str())
    }

    /// The control a front end draws for this field.
    #[must_use]
    pub fn control(&self) -> InputControl {
        match self.kind {
            FieldKind::ShortText => InputControl::Text { input_type: "text" },
            FieldKind::Email => InputControl::Text {
                input_type: "email",
            },
            FieldKind::Date => InputControl::Text { input_type: "date" },
            FieldKind::DateTime => InputControl::Text {
                input_type: "datetime-local",
            },
            FieldKind::Number => InputControl::Number {
                min: self.min,
                max: self.max,
                step: self.step,
            },
            FieldKind::Select => InputControl::Dropdown,
            FieldKind::TextArea => InputControl::TextArea { rows: self.rows },
            FieldKind::Boolean => InputControl::Checkbox,
            FieldKind::Radio => InputControl::RadioGroup,
        }
    }
}
