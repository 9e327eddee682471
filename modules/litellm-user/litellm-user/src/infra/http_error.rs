use litellm_http::HttpError;
use litellm_user_sdk::UserResourceError;

/// Convert a client error into the resource error for `operation`.
///
/// Non-success statuses keep the response body preview so proxy
/// validation messages reach the caller.
#[must_use]
pub fn map_http_error(e: HttpError, operation: &'static str) -> UserResourceError {
    match e {
        HttpError::HttpStatus {
            status,
            body_preview,
            ..
        } => UserResourceError::Api {
            operation,
            status: status.as_u16(),
            body: body_preview,
        },
        HttpError::Json(err) => UserResourceError::Decode {
            operation,
            message: err.to_string(),
        },
        HttpError::Timeout(duration) => {
            transport(operation, format!("request timed out after {duration:?}"))
        }
        HttpError::Transport(err) => transport(operation, format!("transport error: {err}")),
        HttpError::Tls(err) => transport(operation, format!("TLS error: {err}")),
        HttpError::BodyTooLarge { limit, actual } => transport(
            operation,
            format!("response too large: limit {limit} bytes, got {actual} bytes"),
        ),
        HttpError::Overloaded => {
            transport(operation, "request rejected: client overloaded".to_owned())
        }
        HttpError::ServiceClosed => transport(operation, "client unavailable".to_owned()),
        HttpError::InvalidUri { url, reason, .. } => {
            transport(operation, format!("invalid URL '{url}': {reason}"))
        }
        HttpError::InvalidScheme { scheme, reason } => {
            transport(operation, format!("invalid scheme '{scheme}': {reason}"))
        }
        other => transport(operation, other.to_string()),
    }
}

fn transport(operation: &'static str, message: String) -> UserResourceError {
    UserResourceError::Transport { operation, message }
}
