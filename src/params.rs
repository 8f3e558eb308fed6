//! Typed parameter extraction for tool handlers.
//!
//! Every handler decodes its loosely-typed argument map through these functions
//! before touching a collaborator, so "missing", "wrong type" and "empty" are
//! reported the same way by every tool. Nothing here does I/O or mutates its
//! input.
//!
//! Explicit `null` is treated as absent by the optional extractors and as a
//! type mismatch by the required ones.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Error, Result};

/// Argument map accompanying a tool call.
pub type Arguments = serde_json::Map<String, Value>;

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: i64 = 30;

// =============================================================================
// Value conversion
// =============================================================================

/// A type that can be decoded from a single JSON argument.
///
/// `Default` supplies the zero value returned by [`optional`] when the key is
/// absent.
pub trait ParamValue: Sized + Default {
    /// JSON type name used in `WrongType` errors.
    const TYPE_NAME: &'static str;

    /// Decode, or `None` if the JSON value has the wrong shape.
    fn from_value(value: &Value) -> Option<Self>;

    /// Whether a present value counts as empty for [`required`].
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl ParamValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl ParamValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ParamValue for f64 {
    const TYPE_NAME: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

/// Agents send numbers as JSON floats; fractional parts are truncated.
/// Values outside the `i64` range are rejected rather than saturated.
impl ParamValue for i64 {
    const TYPE_NAME: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        let f = value.as_f64()?.trunc();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Extract a required argument.
///
/// Fails with `MissingParameter` when absent, `WrongType` when not a `T`, and
/// `EmptyValue` for an empty string.
pub fn required<T: ParamValue>(args: &Arguments, key: &str) -> Result<T> {
    let value = args.get(key).ok_or_else(|| Error::missing_parameter(key))?;
    let parsed = T::from_value(value).ok_or_else(|| Error::wrong_type(key, T::TYPE_NAME))?;
    if parsed.is_empty_value() {
        return Err(Error::empty_value(key));
    }
    Ok(parsed)
}

/// Extract an optional argument, keeping "absent" distinguishable from a
/// present zero value.
pub fn optional_param_ok<T: ParamValue>(args: &Arguments, key: &str) -> Result<Option<T>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::from_value(value)
            .map(Some)
            .ok_or_else(|| Error::wrong_type(key, T::TYPE_NAME)),
    }
}

/// Extract an optional argument, falling back to `T::default()`.
pub fn optional<T: ParamValue>(args: &Arguments, key: &str) -> Result<T> {
    Ok(optional_param_ok(args, key)?.unwrap_or_default())
}

/// Extract an optional argument, falling back to `default`.
pub fn optional_with_default<T: ParamValue>(args: &Arguments, key: &str, default: T) -> Result<T> {
    Ok(optional_param_ok(args, key)?.unwrap_or(default))
}

/// Extract a required integer, truncating any fractional part.
pub fn required_int(args: &Arguments, key: &str) -> Result<i64> {
    required::<i64>(args, key)
}

/// Extract an optional integer (truncated), zero when absent.
pub fn optional_int(args: &Arguments, key: &str) -> Result<i64> {
    optional::<i64>(args, key)
}

/// Extract an optional integer (truncated), `default` when absent.
pub fn optional_int_with_default(args: &Arguments, key: &str, default: i64) -> Result<i64> {
    optional_with_default::<i64>(args, key, default)
}

/// Extract an optional array of strings. Absent yields an empty vec.
pub fn optional_string_array(args: &Arguments, key: &str) -> Result<Vec<String>> {
    let items = match args.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::wrong_type(key, "array of strings")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::wrong_type(format!("{key}[{i}]"), "string"))
        })
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// Page selection shared by every list-style tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Extract `page` / `perPage`, defaulting to page 1 of 30.
pub fn pagination(args: &Arguments) -> Result<Pagination> {
    Ok(Pagination {
        page: optional_int_with_default(args, "page", DEFAULT_PAGE)?,
        per_page: optional_int_with_default(args, "perPage", DEFAULT_PER_PAGE)?,
    })
}

// =============================================================================
// Tests
// =============================================================================
