use std::fmt::Display;

// error surface for configuration load and shared-state bootstrap,
// cart / checkout operations carry their own error enums in the
// usecase modules
#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorCode {
    MissingAppBasePath,
    MissingConfigPath,
    InvalidJsonFormat,
    InvalidInput,
    NoLogHandlerCfg,
    NoLoggerCfg,
    InvalidHandlerLoggerCfg,
    IOerror(std::io::ErrorKind),
}

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

impl From<(AppErrorCode, String)> for AppError {
    fn from(value: (AppErrorCode, String)) -> Self {
        AppError {
            code: value.0,
            detail: Some(value.1),
        }
    }
}
