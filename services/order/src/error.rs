use std::fmt::{Debug, Display};

use ecommerce_common::error::{AppCfgError, AppConfidentialityError, AppErrorCode};

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub detail: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dp = self.detail.as_deref().unwrap_or("none");
        write!(f, "code:{:?}, detail:{}", self.code, dp)
    }
}

impl From<AppCfgError> for AppError {
    fn from(value: AppCfgError) -> Self {
        AppError {
            code: value.code,
            detail: value.detail,
        }
    }
}
impl From<AppConfidentialityError> for AppError {
    fn from(value: AppConfidentialityError) -> Self {
        AppError {
            code: value.code,
            detail: Some(value.detail),
        }
    }
}
impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError {
            code: AppErrorCode::IOerror(value.kind()),
            detail: Some(value.to_string()),
        }
    }
}
