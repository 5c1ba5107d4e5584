//! Output schema described as data.
//!
//! The same description is sent to the generative model as its structured
//! output contract and used to check the model's reply before it is turned into
//! a [`TicketRecord`](crate::ticket::TicketRecord).
//!
//! # Example
//!
//! ```
//! use prettytickets_core::schema::ticket_record_schema;
//!
//! let schema = ticket_record_schema();
//! let wire = schema.to_json();
//! assert_eq!(wire["type"], "OBJECT");
//! assert!(schema.validate(&serde_json::json!({})).is_err());
//! ```

use serde_json::{Map, Value, json};
use std::fmt;

/// A node of the output schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// A JSON string
    String,
    /// A JSON array whose items all match the inner node
    Array(Box<SchemaNode>),
    /// A JSON object with declared properties
    Object(ObjectSchema),
}

/// Declared properties of an object node, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Property {
    name: &'static str,
    node: SchemaNode,
    required: bool,
}

impl ObjectSchema {
    /// Start an object with no properties.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Builder: add a property that must be present.
    ///
    /// Required strings must also be non-blank.
    #[must_use]
    pub fn required(mut self, name: &'static str, node: SchemaNode) -> Self {
        self.properties.push(Property {
            name,
            node,
            required: true,
        });
        self
    }

    /// Builder: add a property that may be absent.
    #[must_use]
    pub fn optional(mut self, name: &'static str, node: SchemaNode) -> Self {
        self.properties.push(Property {
            name,
            node,
            required: false,
        });
        self
    }

    /// Names of the required properties.
    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
    }
}

impl SchemaNode {
    /// Shorthand for an array of strings.
    #[must_use]
    pub fn string_list() -> Self {
        Self::Array(Box::new(Self::String))
    }

    /// Render in the generative API's `responseSchema` dialect.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String => json!({ "type": "STRING" }),
            Self::Array(items) => json!({ "type": "ARRAY", "items": items.to_json() }),
            Self::Object(object) => {
                let mut properties = Map::new();
                for property in &object.properties {
                    properties.insert(property.name.to_string(), property.node.to_json());
                }
                let ordering: Vec<&str> = object.properties.iter().map(|p| p.name).collect();

                let mut node = Map::new();
                node.insert("type".to_string(), json!("OBJECT"));
                node.insert("properties".to_string(), Value::Object(properties));
                node.insert("propertyOrdering".to_string(), json!(ordering));
                let required: Vec<&str> = object.required_names().collect();
                if !required.is_empty() {
                    node.insert("required".to_string(), json!(required));
                }
                Value::Object(node)
            }
        }
    }

    /// Check `value` against this node.
    ///
    /// Unknown properties are ignored; `null` never matches.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] found, depth first in declaration
    /// order.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, &mut String::new())
    }

    fn validate_at(&self, value: &Value, path: &mut String) -> Result<(), SchemaViolation> {
        match (self, value) {
            (Self::String, Value::String(_)) => Ok(()),
            (Self::Array(items), Value::Array(values)) => {
                for (index, item) in values.iter().enumerate() {
                    let len = path.len();
                    path.push_str(&format!("[{index}]"));
                    items.validate_at(item, path)?;
                    path.truncate(len);
                }
                Ok(())
            }
            (Self::Object(object), Value::Object(map)) => {
                for property in &object.properties {
                    let len = path.len();
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(property.name);

                    match map.get(property.name) {
                        None if property.required => {
                            return Err(SchemaViolation::new(path, ViolationKind::Missing));
                        }
                        None => {}
                        Some(Value::String(s))
                            if property.required
                                && property.node == Self::String
                                && s.trim().is_empty() =>
                        {
                            return Err(SchemaViolation::new(path, ViolationKind::Blank));
                        }
                        Some(child) => property.node.validate_at(child, path)?,
                    }
                    path.truncate(len);
                }
                Ok(())
            }
            (expected, found) => Err(SchemaViolation::new(
                path,
                ViolationKind::WrongType {
                    expected: expected.type_name(),
                    found: json_type_name(found),
                },
            )),
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Where and how a value broke the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at `{path}`")]
pub struct SchemaViolation {
    /// Dotted path to the offending value (`""` for the root)
    pub path: String,
    /// What went wrong
    pub kind: ViolationKind,
}

impl SchemaViolation {
    fn new(path: &str, kind: ViolationKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
        }
    }
}

/// Kind of schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required property absent
    Missing,
    /// Required string present but empty
    Blank,
    /// Value has the wrong JSON type
    WrongType {
        /// Type the schema declares
        expected: &'static str,
        /// Type actually found
        found: &'static str,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing required field"),
            Self::Blank => f.write_str("required field is blank"),
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
        }
    }
}

/// The structured-output contract for a [`TicketRecord`](crate::ticket::TicketRecord).
///
/// The five sections and the event's name, venue and date are mandatory;
/// everything else may be omitted by the model.
#[must_use]
pub fn ticket_record_schema() -> SchemaNode {
    use SchemaNode::{Object, String};

    let event_details = ObjectSchema::new()
        .required("artistOrEvent", String)
        .required("venue", String)
        .required("date", String)
        .optional("seatInfo", String)
        .optional("personalMessage", String);

    let typography = ObjectSchema::new()
        .optional("headlineFont", String)
        .optional("bodyFont", String);

    let visual_theme = ObjectSchema::new()
        .optional("colorPalette", SchemaNode::string_list())
        .optional("textures", SchemaNode::string_list())
        .optional("typography", Object(typography))
        .optional("moodKeywords", SchemaNode::string_list())
        .optional("iconIdeas", SchemaNode::string_list());

    let ai_prompts = ObjectSchema::new()
        .optional("backgroundPrompt", String)
        .optional("ticketArtPrompt", String);

    let gift_copy = ObjectSchema::new()
        .optional("ticketTitle", String)
        .optional("tagline", String)
        .optional("emotionalDescription", String)
        .optional("giftMessage", String);

    let font_weights = ObjectSchema::new()
        .optional("eventName", String)
        .optional("seatInfo", String)
        .optional("extras", String);

    let layout_guide = ObjectSchema::new()
        .optional("recommendedLayout", String)
        .optional("hierarchyNotes", String)
        .optional("fontWeights", Object(font_weights));

    Object(
        ObjectSchema::new()
            .required("eventDetails", Object(event_details))
            .required("visualTheme", Object(visual_theme))
            .required("aiPrompts", Object(ai_prompts))
            .required("giftCopy", Object(gift_copy))
            .required("layoutGuide", Object(layout_guide)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn minimal() -> Value {
        json!({
            "eventDetails": {
                "artistOrEvent": "Taylor Swift",
                "venue": "MetLife Stadium",
                "date": "08/15/2025"
            },
            "visualTheme": {},
            "aiPrompts": {},
            "giftCopy": {},
            "layoutGuide": {}
        })
    }

    #[test]
    fn test_minimal_document_is_valid() {
        assert!(ticket_record_schema().validate(&minimal()).is_ok());
    }

    #[test]
    fn test_missing_mandatory_event_field() {
        let mut doc = minimal();
        doc["eventDetails"].as_object_mut().unwrap().remove("venue");

        let err = ticket_record_schema().validate(&doc).unwrap_err();
        assert_eq!(err.path, "eventDetails.venue");
        assert_eq!(err.kind, ViolationKind::Missing);
    }

    #[test]
    fn test_blank_mandatory_field() {
        let mut doc = minimal();
        doc["eventDetails"]["date"] = json!("   ");

        let err = ticket_record_schema().validate(&doc).unwrap_err();
        assert_eq!(err.path, "eventDetails.date");
        assert_eq!(err.kind, ViolationKind::Blank);
    }

    #[test]
    fn test_missing_section() {
        let mut doc = minimal();
        doc.as_object_mut().unwrap().remove("giftCopy");

        let err = ticket_record_schema().validate(&doc).unwrap_err();
        assert_eq!(err.path, "giftCopy");
    }

    #[test]
    fn test_wrong_type_inside_list() {
        let mut doc = minimal();
        doc["visualTheme"]["colorPalette"] = json!(["blush pink", 7]);

        let err = ticket_record_schema().validate(&doc).unwrap_err();
        assert_eq!(err.path, "visualTheme.colorPalette[1]");
        assert_eq!(
            err.kind,
            ViolationKind::WrongType {
                expected: "string",
                found: "number"
            }
        );
    }

    #[test]
    fn test_null_optional_field_is_rejected() {
        let mut doc = minimal();
        doc["giftCopy"]["tagline"] = Value::Null;

        let err = ticket_record_schema().validate(&doc).unwrap_err();
        assert_eq!(err.path, "giftCopy.tagline");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = ticket_record_schema().validate(&json!([])).unwrap_err();
        assert_eq!(err.path, "");
        assert_eq!(err.to_string(), "expected object, found array at ``");
    }

    #[test]
    fn test_wire_format() {
        let wire = ticket_record_schema().to_json();

        assert_eq!(wire["type"], "OBJECT");
        assert_eq!(
            wire["properties"]["eventDetails"]["required"],
            json!(["artistOrEvent", "venue", "date"])
        );
        assert_eq!(
            wire["properties"]["visualTheme"]["properties"]["colorPalette"],
            json!({ "type": "ARRAY", "items": { "type": "STRING" } })
        );
        assert_eq!(wire["propertyOrdering"][0], "eventDetails");
        assert!(wire["properties"]["aiPrompts"].get("required").is_none());
    }

    proptest! {
        #[test]
        fn prop_unknown_properties_are_ignored(key in "[a-z]{1,12}", text in ".*") {
            let mut doc = minimal();
            doc["eventDetails"][format!("x_{key}")] = json!(text);
            prop_assert!(ticket_record_schema().validate(&doc).is_ok());
        }
    }
}
