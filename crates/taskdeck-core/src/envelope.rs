//! Response shapes used by the backend.
//!
//! Write endpoints (and the auth endpoints) wrap their payload in a
//! [`ResponseEnvelope`] carrying a `resultCode`. Collection endpoints answer
//! with a bare array (`GET /todo-lists`) or a [`TaskPage`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Task;

/// Domain-level outcome reported inside a 2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ResultCode {
    Success,
    Error,
    Captcha,
    /// Any code this client does not know; treated as a failure.
    Other(i64),
}

impl ResultCode {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Success)
    }

    pub fn code(&self) -> i64 {
        i64::from(*self)
    }
}

impl From<i64> for ResultCode {
    fn from(value: i64) -> Self {
        match value {
            0 => ResultCode::Success,
            1 => ResultCode::Error,
            10 => ResultCode::Captcha,
            other => ResultCode::Other(other),
        }
    }
}

impl From<ResultCode> for i64 {
    fn from(code: ResultCode) -> Self {
        match code {
            ResultCode::Success => 0,
            ResultCode::Error => 1,
            ResultCode::Captcha => 10,
            ResultCode::Other(other) => other,
        }
    }
}

/// Per-field validation message returned alongside a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub error: String,
}

/// Common response envelope: `{ data, messages, fieldsErrors, resultCode }`.
///
/// `data` is kept as raw JSON until the result code has been checked, because
/// failed responses carry `data: {}` regardless of the success payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default, alias = "fieldErrors")]
    pub fields_errors: Vec<FieldError>,
    pub result_code: ResultCode,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        self.result_code.is_success()
    }

    /// Check the result code, then decode `data`.
    pub fn into_data<D: DeserializeOwned>(self) -> Result<D> {
        let data = self.into_checked()?;
        Ok(serde_json::from_value(data)?)
    }

    /// Check the result code and discard `data`.
    pub fn into_unit(self) -> Result<()> {
        self.into_checked().map(|_| ())
    }

    fn into_checked(self) -> Result<serde_json::Value> {
        if self.result_code.is_success() {
            Ok(self.data)
        } else {
            Err(Error::domain(self.result_code.code(), self.messages))
        }
    }
}

/// `data` of create/update responses: `{ item }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload<T> {
    pub item: T,
}

/// Body of `GET /todo-lists/{id}/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    #[serde(default)]
    pub items: Vec<Task>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskPage {
    /// The page's items, or a domain error when the server filled `error`.
    pub fn into_items(self) -> Result<Vec<Task>> {
        match self.error {
            Some(message) if !message.trim().is_empty() => {
                Err(Error::domain(ResultCode::Error.code(), vec![message]))
            }
            _ => Ok(self.items),
        }
    }
}
