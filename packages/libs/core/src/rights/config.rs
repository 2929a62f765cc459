//! 권한 제공자 / Authorizer 설정

use std::env;

use serde::{Deserialize, Serialize};

use super::access_right::Precedence;
use crate::error::{Error, Result};

pub const DEFAULT_AUTHORIZE_METHOD: &str = "authorize";
pub const DEFAULT_RESTRICTED_CELL_METHOD: &str = "restricted-cell";
pub const DEFAULT_HIERARCHY_LIMITS_METHOD: &str = "hierarchy-limits";

/// Authorizer 설정
///
/// 모든 기본값은 인스턴스마다 새로 생성됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizerConfig {
    /// 권한 제공자 base URL (필수)
    #[serde(default)]
    pub url: Option<String>,

    /// 큐브 목록 권한 메서드 이름
    #[serde(default = "default_authorize_method")]
    pub authorize_method: String,

    /// 셀 제한 메서드 이름
    #[serde(default = "default_restricted_cell_method")]
    pub restricted_cell_method: String,

    /// hierarchy limit 메서드 이름
    #[serde(default = "default_hierarchy_limits_method")]
    pub hierarchy_limits_method: String,

    /// allow/deny 순서 (`allow_deny` | `deny_allow`, 기본: `deny_allow`)
    #[serde(default)]
    pub order: Option<String>,
}

fn default_authorize_method() -> String {
    DEFAULT_AUTHORIZE_METHOD.to_string()
}
fn default_restricted_cell_method() -> String {
    DEFAULT_RESTRICTED_CELL_METHOD.to_string()
}
fn default_hierarchy_limits_method() -> String {
    DEFAULT_HIERARCHY_LIMITS_METHOD.to_string()
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            url: None,
            authorize_method: default_authorize_method(),
            restricted_cell_method: default_restricted_cell_method(),
            hierarchy_limits_method: default_hierarchy_limits_method(),
            order: None,
        }
    }
}

impl AuthorizerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// 환경변수에서 설정 로드
    ///
    /// 설정되지 않은 항목은 기본값을 사용합니다. 검증은 Authorizer 생성 시 수행됩니다.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("CBX_RIGHTS_URL").ok(),
            authorize_method: env::var("CBX_AUTHORIZE_METHOD")
                .unwrap_or(defaults.authorize_method),
            restricted_cell_method: env::var("CBX_RESTRICTED_CELL_METHOD")
                .unwrap_or(defaults.restricted_cell_method),
            hierarchy_limits_method: env::var("CBX_HIERARCHY_LIMITS_METHOD")
                .unwrap_or(defaults.hierarchy_limits_method),
            order: env::var("CBX_RIGHTS_ORDER").ok(),
        }
    }

    /// 필수 URL
    pub fn require_url(&self) -> Result<&str> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(Error::configuration("missing authorizer url")),
        }
    }

    /// allow/deny 순서 결정
    pub fn precedence(&self) -> Result<Precedence> {
        match self.order.as_deref() {
            None | Some("") => Ok(Precedence::default()),
            Some(order) => order.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthorizerConfig::from_yaml_str("url: http://rights.local/api/").unwrap();
        assert_eq!(config.require_url().unwrap(), "http://rights.local/api/");
        assert_eq!(config.authorize_method, "authorize");
        assert_eq!(config.restricted_cell_method, "restricted-cell");
        assert_eq!(config.hierarchy_limits_method, "hierarchy-limits");
        assert_eq!(config.precedence().unwrap(), Precedence::DenyThenAllow);
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(
            AuthorizerConfig::default().require_url(),
            Err(Error::Configuration { .. })
        ));
        assert!(AuthorizerConfig::new("  ").require_url().is_err());
    }

    #[test]
    fn test_order() {
        let config = AuthorizerConfig::new("http://x/").with_order("allow_deny");
        assert_eq!(config.precedence().unwrap(), Precedence::AllowThenDeny);

        let config = AuthorizerConfig::new("http://x/").with_order("first_match");
        assert!(matches!(config.precedence(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_custom_methods() {
        let yaml = r#"
url: http://rights.local/
authorize_method: cubes
order: allow_deny
"#;
        let config = AuthorizerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.authorize_method, "cubes");
        assert_eq!(config.restricted_cell_method, "restricted-cell");
        assert_eq!(config.precedence().unwrap(), Precedence::AllowThenDeny);
    }
}
