//! Outcome of an API call that reached the server

use thiserror::Error;

/// Non-2xx response, with the server's message when it sent one
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (HTTP {status})")]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Either the decoded body of a 2xx response or the failure the server reported
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(ApiFailure),
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ApiResult::Success(value) => Some(value),
            ApiResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            ApiResult::Success(_) => None,
            ApiResult::Failure(f) => Some(f),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Success(value) => ApiResult::Success(f(value)),
            ApiResult::Failure(failure) => ApiResult::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, ApiFailure> {
        match self {
            ApiResult::Success(value) => Ok(value),
            ApiResult::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, ApiFailure>> for ApiResult<T> {
    fn from(result: Result<T, ApiFailure>) -> Self {
        match result {
            Ok(value) => ApiResult::Success(value),
            Err(failure) => ApiResult::Failure(failure),
        }
    }
}
