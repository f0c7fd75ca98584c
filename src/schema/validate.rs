use std::fmt;

use serde_json::Value;

use crate::schema::model::DraftDefinition;

/// Why a byte buffer could not be decoded into a [`DraftDefinition`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// A required field is absent or has the wrong JSON type.
    #[error("missing or invalid property '{field}'{}", in_object(.parent))]
    MissingProperty {
        /// Name of the offending field.
        field: String,
        /// Dotted path of the containing object; `None` at the top level.
        parent: Option<String>,
    },

    /// Any other decoding failure (syntax errors, wrong optional field types, bad dates).
    #[error("could not decode widget definition: {0}")]
    Deserialize(String),
}

fn in_object(parent: &Option<String>) -> String {
    match parent {
        Some(p) => format!(" in object '{p}'"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathElem<'a> {
    Field(&'a str),
    Index(usize),
}

struct FieldPath<'a, 'p>(&'p [PathElem<'a>]);

impl fmt::Display for FieldPath<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            match p {
                PathElem::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathElem::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Kind {
    String,
    Number,
    Object,
    Array,
}

impl Kind {
    fn matches(self, v: &Value) -> bool {
        match self {
            Self::String => v.is_string(),
            Self::Number => v.is_number(),
            Self::Object => v.is_object(),
            Self::Array => v.is_array(),
        }
    }
}

fn require<'v>(
    obj: &'v Value,
    field: &'static str,
    kind: Kind,
    path: &[PathElem<'_>],
) -> Result<&'v Value, DefinitionError> {
    match obj.get(field) {
        Some(v) if kind.matches(v) => Ok(v),
        _ => Err(DefinitionError::MissingProperty {
            field: field.to_owned(),
            parent: (!path.is_empty()).then(|| FieldPath(path).to_string()),
        }),
    }
}

/// Walk every required field in decode order and report the first one that is missing.
fn check_required(root: &Value) -> Result<(), DefinitionError> {
    let mut path = Vec::new();
    if !root.is_object() {
        return Err(DefinitionError::Deserialize(
            "widget definition must be a JSON object".to_owned(),
        ));
    }
    require(root, "name", Kind::String, &path)?;
    require(root, "data", Kind::Object, &path)?;
    let layouts = require(root, "layouts", Kind::Object, &path)?;

    path.push(PathElem::Field("layouts"));
    for (name, layout) in layouts.as_object().into_iter().flatten() {
        path.push(PathElem::Field(name));
        check_layout(layout, &mut path)?;
        path.pop();
    }
    Ok(())
}

fn check_layout<'a>(layout: &'a Value, path: &mut Vec<PathElem<'a>>) -> Result<(), DefinitionError> {
    require(layout, "size", Kind::String, path)?;
    let styles = require(layout, "styles", Kind::Object, path)?;

    if let Some(colors) = styles.get("colors").and_then(Value::as_object) {
        path.push(PathElem::Field("styles"));
        path.push(PathElem::Field("colors"));
        for (name, color) in colors {
            path.push(PathElem::Field(name));
            require(color, "color", Kind::String, path)?;
            path.pop();
        }
        path.pop();
        path.pop();
    }

    let layers = require(layout, "layers", Kind::Array, path)?;
    path.push(PathElem::Field("layers"));
    for (li, layer) in layers.as_array().into_iter().flatten().enumerate() {
        path.push(PathElem::Index(li));
        if let Some(rows) = layer.get("rows").and_then(Value::as_array) {
            path.push(PathElem::Field("rows"));
            for (ri, row) in rows.iter().enumerate() {
                path.push(PathElem::Index(ri));
                check_row(row, path)?;
                path.pop();
            }
            path.pop();
        }
        path.pop();
    }
    path.pop();
    Ok(())
}

fn check_row<'a>(row: &'a Value, path: &mut Vec<PathElem<'a>>) -> Result<(), DefinitionError> {
    require(row, "height", Kind::Number, path)?;
    if let Some(cells) = row.get("cells").and_then(Value::as_array) {
        path.push(PathElem::Field("cells"));
        for (ci, cell) in cells.iter().enumerate() {
            path.push(PathElem::Index(ci));
            require(cell, "width", Kind::Number, path)?;
            path.pop();
        }
        path.pop();
    }
    Ok(())
}

/// Decode JSON bytes into a [`DraftDefinition`].
///
/// Required fields are checked before typed decoding so that a missing field is reported with
/// the dotted path of its containing object. Unknown fields are ignored.
pub fn decode(bytes: &[u8]) -> Result<DraftDefinition, DefinitionError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DefinitionError::Deserialize(e.to_string()))?;
    check_required(&value)?;
    serde_json::from_value(value).map_err(|e| DefinitionError::Deserialize(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
