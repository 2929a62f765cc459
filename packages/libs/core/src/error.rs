//! 공통 에러 타입
//!
//! cbx 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// cbx 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Configuration { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Rights Fetch Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("rights request failed{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    #[error("invalid rights response: {message}")]
    Decode { message: String },

    #[error("unknown identity")]
    UnknownIdentity,

    // ─────────────────────────────────────────────────────────────────────────────
    // Cube Model Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("unknown cube: {name}")]
    UnknownCube { name: String },

    #[error("cube '{cube}' has no dimension '{dimension}'")]
    UnknownDimension { cube: String, dimension: String },

    #[error("dimension '{dimension}' has no hierarchy '{hierarchy}'")]
    UnknownHierarchy { dimension: String, hierarchy: String },

    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    #[error("invalid cut '{cut}': {reason}")]
    InvalidCut { cut: String, reason: String },

    #[error("invalid dimension level reference: {value}")]
    InvalidLevel { value: String },

    #[error("can not combine cells of different cubes: '{left}' and '{right}'")]
    CubeMismatch { left: String, right: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Query Rewriting Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("unknown order '{order}' for attribute '{attribute}'")]
    InvalidOrder { order: String, attribute: String },

    #[error("query context error: {message}")]
    QueryContext { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn query_context(message: impl Into<String>) -> Self {
        Error::QueryContext {
            message: message.into(),
        }
    }

    /// 권한 데이터 조회 실패 여부 (전송/디코딩)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Decode { .. } | Error::UnknownIdentity
        )
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "CONFIGURATION_ERROR",
            Error::Transport { .. } => "TRANSPORT_ERROR",
            Error::Decode { .. } => "DECODE_ERROR",
            Error::UnknownIdentity => "UNKNOWN_IDENTITY",
            Error::UnknownCube { .. } => "UNKNOWN_CUBE",
            Error::UnknownDimension { .. } => "UNKNOWN_DIMENSION",
            Error::UnknownHierarchy { .. } => "UNKNOWN_HIERARCHY",
            Error::UnknownAttribute { .. } => "UNKNOWN_ATTRIBUTE",
            Error::InvalidCut { .. } => "INVALID_CUT",
            Error::InvalidLevel { .. } => "INVALID_LEVEL",
            Error::CubeMismatch { .. } => "CUBE_MISMATCH",
            Error::InvalidOrder { .. } => "INVALID_ORDER",
            Error::QueryContext { .. } => "QUERY_CONTEXT_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_includes_status() {
        let err = Error::Transport {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "rights request failed (503): unavailable");

        let err = Error::Transport {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "rights request failed: connection refused");
    }

    #[test]
    fn test_fetch_failure_classification() {
        assert!(Error::Decode { message: "eof".into() }.is_fetch_failure());
        assert!(Error::UnknownIdentity.is_fetch_failure());
        assert!(!Error::configuration("missing url").is_fetch_failure());
        assert_eq!(Error::configuration("x").code(), "CONFIGURATION_ERROR");
    }
}
