// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionInput;

/// Raw POST body: `{action, id?, ids?, year?, ...fields}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostBody {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "year_from_any")]
    pub year: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn year_from_any<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "year must be a string or number, got {}",
            other
        ))),
    }
}

/// A write request after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create { input: TransactionInput },
    Update { id: String, input: TransactionInput },
    Delete { ids: Vec<String> },
    Backup { year: Option<String> },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::Create { .. } => "create",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
            Request::Backup { .. } => "backup",
        }
    }

    pub fn from_json(raw: &str) -> LedgerResult<Request> {
        let body: PostBody = serde_json::from_str(raw)
            .map_err(|e| LedgerError::InvalidRequest(format!("Invalid request body: {}", e)))?;
        Request::from_body(body)
    }

    /// A missing `action` means create.
    pub fn from_body(body: PostBody) -> LedgerResult<Request> {
        let action = body.action.as_deref().unwrap_or("create");
        match action {
            "create" => Ok(Request::Create {
                input: fields_to_input(body.fields)?,
            }),
            "update" => {
                let id = body
                    .id
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| LedgerError::InvalidRequest("Update requires an id".into()))?;
                Ok(Request::Update {
                    id,
                    input: fields_to_input(body.fields)?,
                })
            }
            "delete" => {
                let ids = match (body.ids, body.id) {
                    (Some(ids), _) => ids,
                    (None, Some(id)) => vec![id],
                    (None, None) => {
                        return Err(LedgerError::InvalidRequest(
                            "Delete requires ids or id".into(),
                        ));
                    }
                };
                Ok(Request::Delete { ids })
            }
            "backup" => Ok(Request::Backup { year: body.year }),
            other => Err(LedgerError::InvalidRequest(format!(
                "Unknown action '{}'",
                other
            ))),
        }
    }

    /// The body a client sends for this request. `year` is the client's
    /// selected year; for a backup the request's own year wins.
    pub fn to_body(&self, selected_year: Option<&str>) -> LedgerResult<Value> {
        let mut body = Map::new();
        body.insert("action".into(), Value::from(self.action()));
        match self {
            Request::Create { input } => merge_fields(&mut body, input)?,
            Request::Update { id, input } => {
                merge_fields(&mut body, input)?;
                body.insert("id".into(), Value::from(id.as_str()));
            }
            Request::Delete { ids } => {
                body.insert("ids".into(), serde_json::to_value(ids)?);
            }
            Request::Backup { year } => {
                if let Some(y) = year {
                    body.insert("year".into(), Value::from(y.as_str()));
                }
                return Ok(Value::Object(body));
            }
        }
        if let Some(y) = selected_year {
            body.insert("year".into(), Value::from(y));
        }
        Ok(Value::Object(body))
    }
}

fn fields_to_input(fields: Map<String, Value>) -> LedgerResult<TransactionInput> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| LedgerError::InvalidRequest(format!("Invalid transaction fields: {}", e)))
}

fn merge_fields(body: &mut Map<String, Value>, input: &TransactionInput) -> LedgerResult<()> {
    if let Value::Object(fields) = serde_json::to_value(input)? {
        body.extend(fields);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Reply to a POST. Store-layer failures never cross the boundary as
/// anything but `{"result":"error","message":..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub result: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl Reply {
    pub fn success() -> Self {
        Reply {
            result: Status::Success,
            id: None,
            message: None,
            missing: Vec::new(),
        }
    }

    pub fn created(id: String) -> Self {
        Reply {
            id: Some(id),
            ..Reply::success()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn error(err: &LedgerError) -> Self {
        Reply {
            result: Status::Error,
            id: None,
            message: Some(err.to_string()),
            missing: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == Status::Success
    }
}
