//! JSON Schema documents for plugin shapes
//!
//! Shapes are reflected with `schemars` at install time. A version that
//! declares no shape gets [`EMPTY_SCHEMA`]. The inputs schema can be
//! decorated with an [`InputsForm`] overlay carrying UI attributes.

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Schema used when a version declares no shape
pub const EMPTY_SCHEMA: &str =
    r#"{"type": "object", "properties": {}, "required": [], "definitions": {}}"#;

/// Per-property UI attributes merged into the inputs schema
///
/// Maps a property name to `{attribute: value}`. Attributes are copied onto
/// `properties[name]` of the reflected schema; names the schema does not
/// define are ignored.
pub type InputsForm = BTreeMap<String, Map<String, Value>>;

/// Which schema of a plugin record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// First-call inputs (carries the form overlay)
    Inputs,
    /// Carried context inputs
    ContextInputs,
    /// Plugin outputs
    Outputs,
}

impl SchemaKind {
    /// Stable name used on the command line and in logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Inputs => "inputs",
            SchemaKind::ContextInputs => "context-inputs",
            SchemaKind::Outputs => "outputs",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inputs" => Ok(SchemaKind::Inputs),
            "context-inputs" => Ok(SchemaKind::ContextInputs),
            "outputs" => Ok(SchemaKind::Outputs),
            other => Err(format!(
                "unknown schema kind '{other}', expected inputs, context-inputs or outputs"
            )),
        }
    }
}

/// A schema as serialized text plus its parsed form
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    raw: String,
    json: Value,
}

impl SchemaDocument {
    /// Canonical empty-object schema
    ///
    /// # Panics
    /// Never: [`EMPTY_SCHEMA`] is a JSON literal.
    #[must_use]
    pub fn empty() -> Self {
        let json = serde_json::from_str(EMPTY_SCHEMA).expect("empty schema literal is valid JSON");
        Self {
            raw: EMPTY_SCHEMA.to_string(),
            json,
        }
    }

    /// Serialized document
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed document
    #[inline]
    #[must_use]
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Property names declared at the top level
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.json
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Shapes declared by one plugin version
///
/// Every shape is optional; a missing one produces [`EMPTY_SCHEMA`].
///
/// # Example
/// ```rust,ignore
/// let shapes = Shapes::new()
///     .inputs::<CreateTaskInputs>()
///     .outputs::<CreateTaskOutputs>()
///     .inputs_form(form);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shapes {
    pub(crate) inputs: Option<RootSchema>,
    pub(crate) context_inputs: Option<RootSchema>,
    pub(crate) outputs: Option<RootSchema>,
    pub(crate) inputs_form: Option<InputsForm>,
}

impl Shapes {
    /// No shapes, no overlay
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflect the inputs shape from `T`
    #[must_use]
    pub fn inputs<T: JsonSchema>(mut self) -> Self {
        self.inputs = Some(reflect::<T>());
        self
    }

    /// Reflect the context inputs shape from `T`
    #[must_use]
    pub fn context_inputs<T: JsonSchema>(mut self) -> Self {
        self.context_inputs = Some(reflect::<T>());
        self
    }

    /// Reflect the outputs shape from `T`
    #[must_use]
    pub fn outputs<T: JsonSchema>(mut self) -> Self {
        self.outputs = Some(reflect::<T>());
        self
    }

    /// Use an already built inputs schema
    #[must_use]
    pub fn with_inputs_schema(mut self, schema: RootSchema) -> Self {
        self.inputs = Some(schema);
        self
    }

    /// Use an already built context inputs schema
    #[must_use]
    pub fn with_context_inputs_schema(mut self, schema: RootSchema) -> Self {
        self.context_inputs = Some(schema);
        self
    }

    /// Use an already built outputs schema
    #[must_use]
    pub fn with_outputs_schema(mut self, schema: RootSchema) -> Self {
        self.outputs = Some(schema);
        self
    }

    /// Attach a UI overlay for the inputs schema
    #[must_use]
    pub fn inputs_form(mut self, form: InputsForm) -> Self {
        self.inputs_form = Some(form);
        self
    }
}

/// Reflect the JSON Schema of `T`
#[must_use]
pub fn reflect<T: JsonSchema>() -> RootSchema {
    schemars::schema_for!(T)
}

/// Build the document for one shape
///
/// A missing shape yields the empty document and ignores `form`.
///
/// # Errors
/// The reflected schema could not be serialized.
pub fn build_document(
    shape: Option<&RootSchema>,
    form: Option<&InputsForm>,
) -> Result<SchemaDocument, serde_json::Error> {
    let Some(shape) = shape else {
        return Ok(SchemaDocument::empty());
    };

    let mut json = serde_json::to_value(shape)?;
    if let Some(form) = form {
        let dropped = merge_form(&mut json, form);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "inputs form names not in schema, ignored");
        }
    }
    let raw = serde_json::to_string(&json)?;
    Ok(SchemaDocument { raw, json })
}

/// Copy form attributes onto existing schema properties
///
/// Returns the form entries that matched no property.
pub fn merge_form(schema: &mut Value, form: &InputsForm) -> Vec<String> {
    let mut dropped = Vec::new();
    let properties = schema.get_mut("properties").and_then(Value::as_object_mut);

    let Some(properties) = properties else {
        dropped.extend(form.keys().cloned());
        return dropped;
    };

    for (name, attrs) in form {
        match properties.get_mut(name).and_then(Value::as_object_mut) {
            Some(property) => {
                for (key, value) in attrs {
                    property.insert(key.clone(), value.clone());
                }
            }
            None => dropped.push(name.clone()),
        }
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct CreateTask {
        template_id: i64,
        task_name: String,
    }

    fn form() -> InputsForm {
        serde_json::from_value(json!({
            "template_id": {"attr1": "val1", "attr2": "val2"},
            "task_name": {"attr3": {"sub_attr3": "val3"}},
            "unknown_field": {"attr4": "val4"}
        }))
        .unwrap()
    }

    #[test]
    fn empty_schema_literal() {
        assert_eq!(
            EMPTY_SCHEMA,
            r#"{"type": "object", "properties": {}, "required": [], "definitions": {}}"#
        );
    }

    #[test]
    fn missing_shape_yields_empty_document() {
        let doc = build_document(None, None).unwrap();
        assert_eq!(doc.raw(), EMPTY_SCHEMA);
        assert_eq!(
            doc.json(),
            &json!({"type": "object", "properties": {}, "required": [], "definitions": {}})
        );
        assert!(doc.property_names().is_empty());
    }

    #[test]
    fn missing_shape_ignores_form() {
        let doc = build_document(None, Some(&form())).unwrap();
        assert_eq!(doc, SchemaDocument::empty());
    }

    #[test]
    fn reflected_shape_lists_fields() {
        let root = reflect::<CreateTask>();
        let doc = build_document(Some(&root), None).unwrap();

        assert_eq!(doc.json()["type"], "object");
        let mut names = doc.property_names();
        names.sort_unstable();
        assert_eq!(names, vec!["task_name", "template_id"]);

        let reparsed: Value = serde_json::from_str(doc.raw()).unwrap();
        assert_eq!(&reparsed, doc.json());
    }

    #[test]
    fn form_merges_onto_existing_properties() {
        let root = reflect::<CreateTask>();
        let doc = build_document(Some(&root), Some(&form())).unwrap();
        let props = &doc.json()["properties"];

        assert_eq!(props["template_id"]["attr1"], "val1");
        assert_eq!(props["template_id"]["attr2"], "val2");
        assert_eq!(props["template_id"]["type"], "integer");
        assert_eq!(props["task_name"]["attr3"], json!({"sub_attr3": "val3"}));
        assert!(props.get("unknown_field").is_none());
        assert!(doc.raw().contains("\"attr1\":\"val1\""));
    }

    #[test]
    fn merge_reports_dropped_names() {
        let mut schema = json!({"properties": {"template_id": {"type": "integer"}}});
        let dropped = merge_form(&mut schema, &form());

        assert_eq!(dropped, vec!["task_name".to_string(), "unknown_field".to_string()]);
        assert_eq!(schema["properties"]["template_id"]["attr1"], "val1");
    }

    #[test]
    fn merge_without_properties_drops_everything() {
        let mut schema = json!({"type": "string"});
        let dropped = merge_form(&mut schema, &form());
        assert_eq!(dropped.len(), 3);
        assert_eq!(schema, json!({"type": "string"}));
    }

    #[test]
    fn schema_kind_round_trips_names() {
        for kind in [SchemaKind::Inputs, SchemaKind::ContextInputs, SchemaKind::Outputs] {
            assert_eq!(kind.as_str().parse::<SchemaKind>().unwrap(), kind);
        }
        assert!("schema".parse::<SchemaKind>().is_err());
    }
}
