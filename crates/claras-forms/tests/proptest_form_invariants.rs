#![forbid(unsafe_code)]

//! Property-based invariant tests for the form engine.
//!
//! 1. Bounds: a number inside `[min, max]` passes; outside, the message names
//!    the violated bound.
//! 2. Required: empty text always fails with the label in the message;
//!    non-blank text always passes.
//! 3. Grouping: every visible field lands in exactly one group, in schema
//!    order, and hidden fields in none.
//! 4. Error visibility: after any edit sequence, every error key names a
//!    visible field.
//! 5. Reset: after any edit sequence, `reset()` restores the initial values.
//! 6. No panics on arbitrary edit/validate/reset sequences.

use claras_forms::{
    FieldDescriptor, FieldValue, FieldWidth, FormEngine, FormValues, group_fields_by_width,
    validate_field,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn width_strategy() -> impl Strategy<Value = FieldWidth> {
    prop_oneof![
        Just(FieldWidth::Full),
        Just(FieldWidth::Half),
        Just(FieldWidth::Third),
    ]
}

/// `(width, hidden)` per field.
fn schema_strategy() -> impl Strategy<Value = Vec<(FieldWidth, bool)>> {
    prop::collection::vec((width_strategy(), any::<bool>()), 0..24)
}

#[derive(Debug, Clone)]
enum Op {
    SetNombre(String),
    SetTipo(String),
    SetMonto(Option<f64>),
    Validate,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(Op::SetNombre),
        prop_oneof![Just("gasto"), Just("ingreso"), Just("")]
            .prop_map(|s| Op::SetTipo(s.to_string())),
        prop::option::of(-50.0f64..500.0).prop_map(Op::SetMonto),
        Just(Op::Validate),
        Just(Op::Reset),
    ]
}

/// Expense form: the amount only shows for outgoing expenses.
fn gasto_form() -> FormEngine {
    FormEngine::initialize(
        vec![
            FieldDescriptor::text("nombre").required(),
            FieldDescriptor::select("tipo", [("gasto", "Gasto"), ("ingreso", "Ingreso")])
                .required(),
            FieldDescriptor::number("monto")
                .required()
                .bounds(1.0, 100.0)
                .show_if(|v| v.value("tipo").as_text() == Some("gasto")),
        ],
        FormValues::new().with("nombre", "Mantención ascensor"),
    )
}

fn apply(form: &mut FormEngine, op: &Op) {
    match op {
        Op::SetNombre(s) => form.set_field_value("nombre", s.as_str()).unwrap(),
        Op::SetTipo(s) => form.set_field_value("tipo", s.as_str()).unwrap(),
        Op::SetMonto(Some(n)) => form.set_field_value("monto", *n).unwrap(),
        Op::SetMonto(None) => form.set_field_value("monto", FieldValue::Unset).unwrap(),
        Op::Validate => {
            form.validate_form();
        }
        Op::Reset => form.reset(),
    }
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bounds_classify_values(value in -1000.0f64..1000.0) {
        let field = FieldDescriptor::number("monto").bounds(1.0, 100.0);
        let message = validate_field(&field, &FieldValue::Number(value));
        if value < 1.0 {
            prop_assert_eq!(message.as_deref(), Some("minimum value: 1"));
        } else if value > 100.0 {
            prop_assert_eq!(message.as_deref(), Some("maximum value: 100"));
        } else {
            prop_assert_eq!(message, None);
        }
    }

    #[test]
    fn required_text(label in "[A-Za-z]{1,12}", blank in "[ \t]{0,4}", text in "[a-z]{1,10}") {
        let field = FieldDescriptor::text("campo").label(label.clone()).required();
        let expected = format!("{label} is required");
        prop_assert_eq!(
            validate_field(&field, &FieldValue::text(blank)),
            Some(expected)
        );
        prop_assert_eq!(validate_field(&field, &FieldValue::text(text)), None);
    }

    #[test]
    fn grouping_partitions_visible_fields(schema in schema_strategy()) {
        let fields: Vec<FieldDescriptor> = schema
            .iter()
            .enumerate()
            .map(|(i, (width, hidden))| {
                let f = FieldDescriptor::text(format!("f{i:02}")).width(*width);
                if *hidden { f.show_if(|_| false) } else { f }
            })
            .collect();
        let groups = group_fields_by_width(&fields, &FormValues::new());

        let visible = schema.iter().filter(|(_, hidden)| !hidden).count();
        prop_assert_eq!(groups.len(), visible);

        for width in [FieldWidth::Full, FieldWidth::Half, FieldWidth::Third] {
            let names = groups.names(width);
            let expected: Vec<String> = schema
                .iter()
                .enumerate()
                .filter(|(_, (w, hidden))| *w == width && !hidden)
                .map(|(i, _)| format!("f{i:02}"))
                .collect();
            prop_assert_eq!(names, expected);
        }
    }

    #[test]
    fn errors_only_on_visible_fields(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut form = gasto_form();
        for op in &ops {
            apply(&mut form, op);
            for (name, _) in form.errors().iter() {
                let field = form.field(name).unwrap();
                prop_assert!(field.is_visible(form.values()), "{} has an error while hidden", name);
            }
        }
    }

    #[test]
    fn reset_restores_initial(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut form = gasto_form();
        let initial = form.values().clone();
        for op in &ops {
            apply(&mut form, op);
        }
        form.reset();
        prop_assert_eq!(form.values(), &initial);
        prop_assert!(form.errors().is_empty());
        prop_assert!(form.is_pristine());
    }
}
