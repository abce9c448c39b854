//! Coerces the caller-supplied raw JSON variables map into internal
//! [`ResolvedValue`]s against an operation's variable declarations (§4.3
//! "Preparation"), reusing the same scalar/enum/input-object coercion rules
//! the parser applies to literals (§4.2), just driven from JSON instead of
//! source text.

use crate::document::Operation;
use crate::executor::error::VariablesError;
use crate::schema::Schema;
use crate::types::{GraphQLType, TypeRef};
use crate::value::ResolvedValue;
use indexmap::IndexMap;

pub fn coerce_variables(
    schema: &Schema,
    operation: &Operation,
    raw: &serde_json::Map<String, serde_json::Value>,
) -> Result<IndexMap<String, ResolvedValue>, VariablesError> {
    for key in raw.keys() {
        if !operation.variables.contains_key(key) {
            return Err(VariablesError::UnknownVariable(key.clone()));
        }
    }

    let mut out = IndexMap::new();
    for (name, var) in &operation.variables {
        match raw.get(name) {
            Some(json) => {
                let coerced = coerce_value(schema, &var.var_type, Some(json), name)?;
                out.insert(name.clone(), coerced);
            }
            None => {
                if let Some(default) = &var.default_value {
                    out.insert(name.clone(), default.substitute_variables(&IndexMap::new()));
                } else if var.var_type.is_non_null() {
                    return Err(VariablesError::MissingRequired(name.clone()));
                } else {
                    out.insert(name.clone(), ResolvedValue::Null);
                }
            }
        }
    }
    Ok(out)
}

fn coerce_value(
    schema: &Schema,
    type_ref: &TypeRef,
    json: Option<&serde_json::Value>,
    var_name: &str,
) -> Result<ResolvedValue, VariablesError> {
    match json {
        None | Some(serde_json::Value::Null) => {
            if type_ref.is_non_null() {
                return Err(VariablesError::MissingRequired(var_name.to_string()));
            }
            Ok(ResolvedValue::Null)
        }
        Some(value) => {
            let inner = match type_ref {
                TypeRef::NonNull(inner) => inner,
                other => other,
            };
            coerce_non_null_value(schema, inner, value, var_name)
        }
    }
}

fn coerce_non_null_value(
    schema: &Schema,
    type_ref: &TypeRef,
    json: &serde_json::Value,
    var_name: &str,
) -> Result<ResolvedValue, VariablesError> {
    if let TypeRef::List(elem_type) = type_ref {
        let items: Vec<serde_json::Value> = match json {
            serde_json::Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        };
        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            out.push(coerce_value(schema, elem_type, Some(item), var_name)?);
        }
        return Ok(ResolvedValue::List(out));
    }

    let base_name = type_ref.base_name();
    match schema.get_type(base_name) {
        Some(GraphQLType::Scalar(s)) => s
            .implementation
            .coerce_input(json)
            .map_err(|e| VariablesError::CoercionFailed(var_name.to_string(), e)),
        Some(GraphQLType::Enum(e)) => match json {
            serde_json::Value::String(name) if e.value(name).is_some() => Ok(ResolvedValue::EnumValue(name.clone())),
            _ => Err(VariablesError::CoercionFailed(
                var_name.to_string(),
                format!("not a valid value of enum `{base_name}`"),
            )),
        },
        Some(GraphQLType::InputObject(io)) => {
            let obj = json
                .as_object()
                .ok_or_else(|| VariablesError::CoercionFailed(var_name.to_string(), format!("`{base_name}` must be an object")))?;
            let mut fields = IndexMap::new();
            for (field_name, field_def) in io.fields.iter() {
                if let Some(v) = obj.get(field_name) {
                    let coerced = coerce_value(schema, &field_def.field_type, Some(v), var_name)?;
                    fields.insert(field_name.clone(), coerced);
                } else if field_def.field_type.is_non_null() {
                    return Err(VariablesError::CoercionFailed(
                        var_name.to_string(),
                        format!("missing required field `{field_name}` on `{base_name}`"),
                    ));
                }
            }
            Ok(ResolvedValue::Object(fields))
        }
        _ => Err(VariablesError::CoercionFailed(
            var_name.to_string(),
            format!("`{base_name}` is not a valid input type"),
        )),
    }
}
