use serde_json::Value;

use crate::{errors::Error, Result};

/// Review states the status API is known to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Parse the wire name used by the API.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Fixed human-readable verdict for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Check the raw API payload shape and return the homework records.
///
/// An empty list is a valid "no updates" answer, not an error.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let obj = response
        .as_object()
        .ok_or_else(|| Error::TypeMismatch("response is not an object".into()))?;

    let (Some(homeworks), Some(_)) = (obj.get("homeworks"), obj.get("current_date")) else {
        return Err(Error::EmptyResponse(
            "`homeworks` or `current_date` key missing".into(),
        ));
    };

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::TypeMismatch("`homeworks` is not a list".into()))
}

/// Server-reported timestamp, used as the `from_date` watermark of the
/// next fetch.
pub fn current_date(response: &Value) -> Result<i64> {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::TypeMismatch("`current_date` is not an integer timestamp".into()))
}

/// Build the notification text for one homework record.
///
/// Pure function of its input; a missing status is reported the same way
/// as an unrecognized one.
pub fn parse_status(record: &Value) -> Result<String> {
    let name = record
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(Error::MissingField("homework_name"))?;

    let status = record.get("status").and_then(Value::as_str);
    let verdict = status
        .and_then(HomeworkStatus::from_wire)
        .ok_or_else(|| Error::UnknownStatus(status.unwrap_or("<missing>").to_string()))?
        .verdict();

    Ok(format!(
        "Изменился статус проверки работы \"{name}\" {verdict}"
    ))
}
