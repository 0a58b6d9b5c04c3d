//! Translation of collaborator responses into repository errors.

use carwash_core::application::{RepositoryError, Resource};
use reqwest::StatusCode;
use serde::Deserialize;

/// Error body the collaborator sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Human-readable reason for a failed response: the JSON `message` field
/// when present, else the raw body, else the status text.
pub(crate) fn reason(status: StatusCode, body: &[u8]) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_slice::<ErrorBody>(body)
    {
        return message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text.to_string()
    }
}

/// Map a non-2xx response to the repository taxonomy.
///
/// `key` names the record addressed by the route, if any.
pub(crate) fn status_error(
    resource: Resource,
    key: Option<&str>,
    status: StatusCode,
    body: &[u8],
) -> RepositoryError {
    let reason = reason(status, body);
    let key = key.unwrap_or(resource.path()).to_string();

    match status {
        s if s.is_server_error() => RepositoryError::Transport {
            resource,
            reason: format!("{}: {reason}", s.as_u16()),
        },
        StatusCode::NOT_FOUND => RepositoryError::NotFound { resource, key },
        StatusCode::CONFLICT => RepositoryError::Conflict {
            resource,
            key,
            reason,
        },
        _ => RepositoryError::Validation { resource, reason },
    }
}

/// Map a failure to send or read a request.
pub(crate) fn transport_error(resource: Resource, err: &reqwest::Error) -> RepositoryError {
    if err.is_decode() {
        RepositoryError::Decode {
            resource,
            reason: err.to_string(),
        }
    } else {
        RepositoryError::Transport {
            resource,
            reason: err.to_string(),
        }
    }
}
