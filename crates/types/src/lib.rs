//! Shared data model for the Gradecast client.
//!
//! Defines the static field schema for the student performance model, the
//! form state that backs the input screen, and the wire types exchanged with
//! the remote prediction service.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number, Value};

/// Value kind a field carries across the wire.
///
/// Raw input is always a string; the kind decides whether it is coerced to a
/// JSON number or passed through as text when the request body is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Text,
}

/// A single named attribute of the student performance model.
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    /// Unique feature name, exactly as the model was trained with
    pub name: &'static str,
    /// Whether the value is sent as a number or a string
    pub kind: FieldKind,
}

/// The fixed, ordered schema of the 19 model features.
///
/// Order matters only for display; the service matches features by name.
pub const FIELD_SCHEMA: &[FieldDescriptor] = &[
    FieldDescriptor { name: "Hours_Studied", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Attendance", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Parental_Involvement", kind: FieldKind::Text },
    FieldDescriptor { name: "Access_to_Resources", kind: FieldKind::Text },
    FieldDescriptor { name: "Extracurricular_Activities", kind: FieldKind::Text },
    FieldDescriptor { name: "Sleep_Hours", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Previous_Scores", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Motivation_Level", kind: FieldKind::Text },
    FieldDescriptor { name: "Internet_Access", kind: FieldKind::Text },
    FieldDescriptor { name: "Tutoring_Sessions", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Family_Income", kind: FieldKind::Text },
    FieldDescriptor { name: "Teacher_Quality", kind: FieldKind::Text },
    FieldDescriptor { name: "School_Type", kind: FieldKind::Text },
    FieldDescriptor { name: "Peer_Influence", kind: FieldKind::Text },
    FieldDescriptor { name: "Physical_Activity", kind: FieldKind::Numeric },
    FieldDescriptor { name: "Learning_Disabilities", kind: FieldKind::Text },
    FieldDescriptor { name: "Parental_Education_Level", kind: FieldKind::Text },
    FieldDescriptor { name: "Distance_from_Home", kind: FieldKind::Text },
    FieldDescriptor { name: "Gender", kind: FieldKind::Text },
];

/// Look up a schema entry by feature name.
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    FIELD_SCHEMA.iter().find(|d| d.name == name)
}

/// Raw form values keyed by feature name, in schema order.
///
/// Invariants: the key set is exactly the schema's names, every value starts
/// as the empty string, and mutation happens one field at a time. The map is
/// never partially populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState(IndexMap<&'static str, String>);

impl FormState {
    /// Fresh state with every schema field mapped to an empty string.
    ///
    /// Each call yields an independent collection; callers never share one.
    pub fn new() -> Self {
        Self(FIELD_SCHEMA.iter().map(|d| (d.name, String::new())).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Current raw value of `name`.
    ///
    /// # Panics
    /// Panics if `name` is not a schema field. Callers only hand in names
    /// taken from [`FIELD_SCHEMA`], so an unknown name is a programming
    /// error, not a recoverable condition.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .get(name)
            .unwrap_or_else(|| panic!("unknown field name: {name}"))
    }

    /// Replace the value of a single field, leaving every other field as-is.
    ///
    /// # Panics
    /// Panics if `name` is not a schema field, same contract as [`Self::get`].
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let slot = self
            .0
            .get_mut(name)
            .unwrap_or_else(|| panic!("unknown field name: {name}"));
        *slot = value.into();
    }

    /// Iterate fields in schema (display) order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for `POST /predict`.
///
/// Built from a [`FormState`] snapshot with each field coerced exactly once
/// according to its [`FieldKind`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PredictionRequest {
    pub features: JsonMap<String, Value>,
}

impl PredictionRequest {
    /// Coerce a form snapshot into the typed feature map.
    ///
    /// Numeric fields become JSON numbers; everything else stays a string.
    /// No keys are added or dropped relative to the schema.
    pub fn from_form(form: &FormState) -> Self {
        let features = form
            .iter()
            .map(|(name, raw)| {
                let value = match descriptor(name).map(|d| d.kind) {
                    Some(FieldKind::Numeric) => coerce_numeric(raw),
                    _ => Value::String(raw.to_string()),
                };
                (name.to_string(), value)
            })
            .collect();
        Self { features }
    }
}

/// Coerce a raw numeric input without validating it.
///
/// Mirrors the loose number conversion of the reference client: blank input
/// counts as zero, and an unparsable value goes over the wire as the JSON
/// null that a non-finite number serializes to. The service is the one that
/// decides whether such a value is acceptable.
fn coerce_numeric(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Number(Number::from(0));
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

/// Successful response body from `POST /predict`.
///
/// Fields default when absent; a malformed success body therefore renders
/// zeroed output instead of raising a distinct error.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PredictionResult {
    /// Predicted label: 0 = fail, 1 = pass
    #[serde(default)]
    pub prediction: u8,
    /// Probability of the pass class, in `[0, 1]`
    #[serde(default)]
    pub probability_pass: f64,
}

/// Outcome of one background submit, delivered back to the event loop.
///
/// `seq` identifies the originating submit for logging only; outcomes are
/// applied in arrival order, so a later completion always wins.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub seq: u64,
    pub outcome: Result<PredictionResult, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_nineteen_fields_with_six_numeric() {
        assert_eq!(FIELD_SCHEMA.len(), 19);
        let numeric = FIELD_SCHEMA.iter().filter(|d| d.kind == FieldKind::Numeric).count();
        assert_eq!(numeric, 6);
    }

    #[test]
    fn new_form_maps_every_schema_field_to_empty() {
        let form = FormState::new();
        assert_eq!(form.len(), FIELD_SCHEMA.len());
        for d in FIELD_SCHEMA {
            assert_eq!(form.get(d.name), "");
        }
    }

    #[test]
    fn new_forms_are_independent() {
        let mut a = FormState::new();
        let b = FormState::new();
        a.set("Gender", "F");
        assert_eq!(a.get("Gender"), "F");
        assert_eq!(b.get("Gender"), "");
    }

    #[test]
    fn set_changes_only_the_named_field() {
        let before = FormState::new();
        let mut after = before.clone();
        after.set("Attendance", "92");

        assert_eq!(after.get("Attendance"), "92");
        for d in FIELD_SCHEMA.iter().filter(|d| d.name != "Attendance") {
            assert_eq!(after.get(d.name), before.get(d.name));
        }
    }

    #[test]
    #[should_panic(expected = "unknown field name")]
    fn set_rejects_names_outside_the_schema() {
        FormState::new().set("Shoe_Size", "42");
    }

    #[test]
    fn request_coerces_numeric_fields_and_keeps_text() {
        let mut form = FormState::new();
        form.set("Hours_Studied", "12.5");
        form.set("Gender", "F");
        let req = PredictionRequest::from_form(&form);

        assert_eq!(req.features.len(), FIELD_SCHEMA.len());
        assert_eq!(req.features["Hours_Studied"], Value::from(12.5));
        assert_eq!(req.features["Gender"], Value::from("F"));
        for d in FIELD_SCHEMA {
            let value = &req.features[d.name];
            match d.kind {
                FieldKind::Numeric => assert!(value.is_number() || value.is_null(), "{}", d.name),
                FieldKind::Text => assert!(value.is_string(), "{}", d.name),
            }
        }
    }

    #[test]
    fn blank_numeric_input_coerces_to_zero() {
        let form = FormState::new();
        let req = PredictionRequest::from_form(&form);
        assert_eq!(req.features["Sleep_Hours"], Value::from(0));
    }

    #[test]
    fn unparsable_numeric_input_passes_through_as_null() {
        let mut form = FormState::new();
        form.set("Previous_Scores", "ninety");
        let req = PredictionRequest::from_form(&form);
        assert_eq!(req.features["Previous_Scores"], Value::Null);
    }

    #[test]
    fn request_serializes_under_a_features_key() {
        let form = FormState::new();
        let json = serde_json::to_value(PredictionRequest::from_form(&form)).unwrap();
        let features = json.get("features").and_then(Value::as_object).unwrap();
        assert_eq!(features.len(), 19);
    }

    #[test]
    fn result_decodes_a_well_formed_body() {
        let body = r#"{"prediction": 1, "probability_pass": 0.823}"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.prediction, 1);
        assert!((result.probability_pass - 0.823).abs() < f64::EPSILON);
    }

    #[test]
    fn result_tolerates_missing_fields() {
        let result: PredictionResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, PredictionResult::default());
    }
}
