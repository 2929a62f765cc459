//! 실행 컨텍스트
//!
//! CLI 옵션과 설정을 합쳐 Authorizer와 큐브 카탈로그를 준비합니다.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use cbx_core::model::{Cube, CubeCatalog};
use cbx_core::rights::{Authorizer, AuthorizerConfig, RightsAuthorizer, StaticRightsSource};

use crate::config::CliConfig;

/// 최종 결정된 컨텍스트
pub struct EffectiveContext {
    pub authorizer: Box<dyn Authorizer>,
    pub catalog: CubeCatalog,
    pub identity: Option<String>,
}

impl EffectiveContext {
    /// identity 필수 검증
    pub fn require_identity(&self) -> anyhow::Result<&str> {
        self.identity
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Identity not specified. Use --identity or set CBX_IDENTITY"))
    }

    /// 카탈로그의 큐브 (공유 참조)
    pub fn cube(&self, name: &str) -> anyhow::Result<Arc<Cube>> {
        Ok(Arc::new(self.catalog.cube(name)?.clone()))
    }
}

/// CLI 옵션
pub struct ContextArgs<'a> {
    pub url: Option<&'a str>,
    pub order: Option<&'a str>,
    pub rights: Option<&'a PathBuf>,
    pub model: &'a PathBuf,
    pub identity: Option<&'a str>,
}

/// 컨텍스트 결정 (CLI 옵션 > 환경변수 > 설정 파일)
pub fn resolve_context(config: &CliConfig, args: ContextArgs<'_>) -> anyhow::Result<EffectiveContext> {
    let model = std::fs::read_to_string(args.model)
        .with_context(|| format!("cannot read model file {}", args.model.display()))?;
    let catalog = CubeCatalog::from_yaml_str(&model)
        .with_context(|| format!("invalid model file {}", args.model.display()))?;

    let mut authorizer_config = AuthorizerConfig::from_env();
    authorizer_config.url = config.rights_url(args.url);
    authorizer_config.order = config.order(args.order);

    let authorizer: Box<dyn Authorizer> = match args.rights {
        Some(path) => {
            tracing::debug!("Using static rights from {}", path.display());
            let source = StaticRightsSource::from_path(path)?;
            Box::new(RightsAuthorizer::new(source, authorizer_config.precedence()?))
        }
        None => Box::new(RightsAuthorizer::from_config(&authorizer_config)?),
    };

    Ok(EffectiveContext {
        authorizer,
        catalog,
        identity: config.identity(args.identity),
    })
}
