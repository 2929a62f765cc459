//! 권한 제공자 클라이언트
//!
//! 판단마다 한 번의 블로킹 요청을 보냅니다. 재시도와 캐시는 하지 않습니다.

use std::collections::HashMap;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;

use super::config::AuthorizerConfig;
use super::document::RightsDocument;
use crate::error::{Error, Result};

/// 권한 제공자 엔드포인트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightsMethod {
    Authorize,
    RestrictedCell,
    HierarchyLimits,
}

impl RightsMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RightsMethod::Authorize => "authorize",
            RightsMethod::RestrictedCell => "restricted-cell",
            RightsMethod::HierarchyLimits => "hierarchy-limits",
        }
    }
}

/// 권한 데이터 소스
///
/// 구현체는 identity에 대한 권한 문서를 반환합니다.
pub trait RightsSource: Send + Sync {
    /// 권한 문서 조회
    ///
    /// # Errors
    ///
    /// 전송, HTTP 상태, 디코딩 실패 시 에러를 반환합니다.
    fn fetch(
        &self,
        identity: &str,
        method: RightsMethod,
        cube: Option<&str>,
    ) -> Result<RightsDocument>;

    /// 로깅용 소스 이름
    fn name(&self) -> &'static str;
}

/// HTTP 권한 제공자
///
/// `GET {url}{method}/[?cube=...]`, `Authorization: Token {identity}`.
pub struct HttpRightsProvider {
    base_url: String,
    methods: HashMap<RightsMethod, String>,
    client: Client,
}

impl HttpRightsProvider {
    /// 설정에서 생성
    ///
    /// # Errors
    ///
    /// URL이 없거나 HTTP 클라이언트를 초기화할 수 없으면 설정 에러를 반환합니다.
    pub fn from_config(config: &AuthorizerConfig) -> Result<Self> {
        let base_url = config.require_url()?.to_string();

        let methods = HashMap::from([
            (RightsMethod::Authorize, config.authorize_method.clone()),
            (RightsMethod::RestrictedCell, config.restricted_cell_method.clone()),
            (RightsMethod::HierarchyLimits, config.hierarchy_limits_method.clone()),
        ]);

        let client = Client::builder()
            .user_agent(concat!("cbx-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("cannot build http client: {}", e)))?;

        Ok(Self {
            base_url,
            methods,
            client,
        })
    }

    /// 요청 URL 생성
    pub fn endpoint(&self, method: RightsMethod, cube: Option<&str>) -> Result<Url> {
        let method_name = self
            .methods
            .get(&method)
            .map(String::as_str)
            .unwrap_or_else(|| method.as_str());

        let mut url = Url::parse(&format!("{}{}/", self.base_url, method_name))
            .map_err(|e| Error::configuration(format!("invalid rights url: {}", e)))?;
        if let Some(cube) = cube {
            url.query_pairs_mut().append_pair("cube", cube);
        }
        Ok(url)
    }
}

impl RightsSource for HttpRightsProvider {
    fn fetch(
        &self,
        identity: &str,
        method: RightsMethod,
        cube: Option<&str>,
    ) -> Result<RightsDocument> {
        let url = self.endpoint(method, cube)?;
        tracing::debug!(method = method.as_str(), %url, "fetching rights");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", identity))
            .send()
            .map_err(|e| Error::Transport {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unable to read rights response body".to_string());
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = response.bytes().map_err(|e| Error::Transport {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| Error::Decode {
            message: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// 정적 권한 소스
///
/// identity별 권한 문서를 YAML/JSON 파일에서 읽습니다. 로컬 개발과 테스트용입니다.
///
/// ```yaml
/// alice:
///   allowed_cubes: [sales, "*_test"]
///   cell_restrictions:
///     "*": ["region:EU"]
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRightsSource {
    documents: HashMap<String, RightsDocument>,
}

impl StaticRightsSource {
    pub fn new(documents: HashMap<String, RightsDocument>) -> Self {
        Self { documents }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Self::new(serde_yaml::from_str(yaml)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("cannot read rights file {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn with_identity(mut self, identity: impl Into<String>, document: RightsDocument) -> Self {
        self.documents.insert(identity.into(), document);
        self
    }
}

impl RightsSource for StaticRightsSource {
    fn fetch(
        &self,
        identity: &str,
        _method: RightsMethod,
        _cube: Option<&str>,
    ) -> Result<RightsDocument> {
        self.documents
            .get(identity)
            .cloned()
            .ok_or(Error::UnknownIdentity)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
