//! CLI 설정
//!
//! `~/.cbx/config.json`에 저장된 기본값입니다. 우선순위는 CLI 옵션 > 환경변수 > 설정 파일입니다.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// CLI 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 기본 권한 제공자 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rights_url: Option<String>,

    /// 기본 allow/deny 순서
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,

    /// 기본 identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

impl CliConfig {
    /// 설정 파일 경로
    fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".cbx").join("config.json"))
    }

    /// 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 권한 제공자 URL 결정
    pub fn rights_url(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, std::env::var("CBX_RIGHTS_URL").ok(), self.rights_url.as_deref())
    }

    /// allow/deny 순서 결정
    pub fn order(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, std::env::var("CBX_RIGHTS_ORDER").ok(), self.order.as_deref())
    }

    /// identity 결정
    pub fn identity(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, std::env::var("CBX_IDENTITY").ok(), self.identity.as_deref())
    }
}

/// CLI 옵션 > 환경변수 > 설정 파일 (빈 값은 건너뜀)
fn pick(flag: Option<&str>, env: Option<String>, file: Option<&str>) -> Option<String> {
    flag.map(str::to_string)
        .or(env)
        .or_else(|| file.map(str::to_string))
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_precedence() {
        assert_eq!(
            pick(Some("flag"), Some("env".into()), Some("file")).as_deref(),
            Some("flag")
        );
        assert_eq!(pick(None, Some("env".into()), Some("file")).as_deref(), Some("env"));
        assert_eq!(pick(None, None, Some("file")).as_deref(), Some("file"));
        assert_eq!(pick(None, None, None), None);
        assert_eq!(pick(Some("  "), None, None), None);
    }

    #[test]
    fn test_config_json() {
        let config: CliConfig =
            serde_json::from_str(r#"{"rights_url": "http://rights.local/", "identity": "alice"}"#)
                .unwrap();
        assert_eq!(config.rights_url.as_deref(), Some("http://rights.local/"));
        assert_eq!(config.identity.as_deref(), Some("alice"));
        assert!(config.order.is_none());
    }
}
