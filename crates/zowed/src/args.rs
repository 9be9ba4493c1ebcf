// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamically-typed argument values and the maps that hold them.
//!
//! Grounded on the tagged-union `ArgTypes` described in the original
//! implementation's argument model; here it is a plain Rust enum with value
//! semantics instead of a manually-managed heap union.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// A single argument value, one of the six shapes the wire protocol allows.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    None,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    List(Vec<String>),
}

impl ArgumentValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            ArgumentValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ArgumentValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a parsed JSON value into an `ArgumentValue`, per the mapping
    /// rules in `RpcServer::process_request` (spec.md §4.4 step 3): arrays of
    /// strings become `List`, non-string elements are dropped (the caller is
    /// responsible for warning), nested objects/mixed arrays are serialized
    /// back into a JSON string.
    pub fn from_json(value: &Value) -> ArgumentValue {
        match value {
            Value::Null => ArgumentValue::None,
            Value::Bool(b) => ArgumentValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ArgumentValue::Int(i)
                } else {
                    ArgumentValue::Double(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => ArgumentValue::Str(s.clone()),
            Value::Array(items) if items.iter().all(|v| v.is_string()) => {
                let strings = items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect();
                ArgumentValue::List(strings)
            }
            other => ArgumentValue::Str(other.to_string()),
        }
    }

    /// Convert back to a JSON value, used when rebuilding a response or when
    /// `flatten_obj` exposes a nested scalar.
    pub fn to_json(&self) -> Value {
        match self {
            ArgumentValue::None => Value::Null,
            ArgumentValue::Bool(b) => Value::Bool(*b),
            ArgumentValue::Int(i) => Value::Number((*i).into()),
            ArgumentValue::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ArgumentValue::Str(s) => Value::String(s.clone()),
            ArgumentValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::None => write!(f, "<none>"),
            ArgumentValue::Bool(b) => write!(f, "{b}"),
            ArgumentValue::Int(i) => write!(f, "{i}"),
            ArgumentValue::Double(d) => write!(f, "{d}"),
            ArgumentValue::Str(s) => write!(f, "{s:?}"),
            ArgumentValue::List(items) => write!(f, "{items:?}"),
        }
    }
}

/// Mapping from argument name to value. Insertion order is not meaningful.
pub type ArgumentMap = HashMap<String, ArgumentValue>;

/// Build an `ArgumentMap` from a JSON-RPC `params` object, per spec.md §4.4
/// step 3. Returns `None` if `params` is present but not a JSON object.
pub fn argument_map_from_params(params: Option<&Value>) -> Option<ArgumentMap> {
    match params {
        None => Some(ArgumentMap::new()),
        Some(Value::Object(map)) => {
            let mut args = ArgumentMap::new();
            for (key, value) in map {
                args.insert(key.clone(), ArgumentValue::from_json(value));
            }
            Some(args)
        }
        Some(_) => None,
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
