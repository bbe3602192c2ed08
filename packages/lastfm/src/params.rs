//! Request parameter extraction
//!
//! Typed requests describe their own wire parameters through [`ToParams`].
//! Ad-hoc records that derive `Serialize` go through [`flatten`] instead,
//! which enforces the same string-only rule at runtime.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{LastfmError, LastfmResult};

/// Flat request parameters, keyed by lowercase parameter name
pub type Params = BTreeMap<String, String>;

/// Conversion of a request type into its wire parameters
pub trait ToParams {
    /// Parameters for this request, excluding `method`, `api_key`, `api_sig`
    /// and `format`
    fn to_params(&self) -> Params;
}

impl ToParams for Params {
    fn to_params(&self) -> Params {
        self.clone()
    }
}

/// `auth.getMobileSession` request
#[derive(Debug, Clone)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl ToParams for LoginRequest<'_> {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("username".to_string(), self.username.to_string());
        params.insert("password".to_string(), self.password.to_string());
        params
    }
}

/// `track.scrobble` request for a single play
#[derive(Debug, Clone)]
pub(crate) struct ScrobbleRequest<'a> {
    pub artist: &'a str,
    pub track: &'a str,
    pub album: Option<&'a str>,
    pub timestamp: i64,
    pub session_key: &'a str,
}

impl ToParams for ScrobbleRequest<'_> {
    fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("artist".to_string(), self.artist.to_string());
        params.insert("track".to_string(), self.track.to_string());
        // Last.fm treats an empty album differently from a missing one
        if let Some(album) = self.album.filter(|a| !a.is_empty()) {
            params.insert("album".to_string(), album.to_string());
        }
        params.insert("timestamp".to_string(), self.timestamp.to_string());
        params.insert("sk".to_string(), self.session_key.to_string());
        params
    }
}

/// Flatten a record of string fields into request parameters.
///
/// Field names (after any serde renames) are lowercased; values are kept
/// verbatim, empty strings included.
///
/// # Errors
/// `LastfmError::UnsupportedFieldType` if the record is not a struct or map,
/// or if any field holds something other than a string. No partial mapping
/// is returned.
pub fn flatten<T>(record: &T) -> LastfmResult<Params>
where
    T: Serialize + ?Sized,
{
    // Serialization fails only for shapes with no flat string form, such as
    // maps keyed by non-strings
    let value = serde_json::to_value(record).map_err(|_| LastfmError::UnsupportedFieldType {
        field: "<record>".to_string(),
        kind: "map",
    })?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(LastfmError::UnsupportedFieldType {
                field: "<record>".to_string(),
                kind: kind_of(&other),
            })
        }
    };

    let mut params = Params::new();
    for (name, value) in fields {
        match value {
            Value::String(s) => {
                params.insert(name.to_lowercase(), s);
            }
            other => {
                return Err(LastfmError::UnsupportedFieldType {
                    field: name,
                    kind: kind_of(&other),
                })
            }
        }
    }
    Ok(params)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
