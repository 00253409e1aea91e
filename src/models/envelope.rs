//! Response envelope shared by every endpoint

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// `{ success, message, data?, errors?, pagination? }`
///
/// `success` and `message` are mandatory; a body without them is not an
/// envelope and is rejected at decode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
            pagination: None,
        }
    }

    /// Reject `success: false`, nothing else
    pub fn ensure_success(self) -> ApiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
                errors: self.errors.unwrap_or_default(),
            })
        }
    }

    /// Successful payload, or why there is none
    pub fn into_data(self) -> ApiResult<T> {
        let response = self.ensure_success()?;
        response
            .data
            .ok_or_else(|| ApiError::Malformed("envelope has no data".to_string()))
    }
}

/// Page of records plus the server's pagination block
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn from_response(response: ApiResponse<Vec<T>>) -> ApiResult<Self> {
        let pagination = response.pagination;
        let items = response.into_data()?;
        Ok(Self { items, pagination })
    }
}
