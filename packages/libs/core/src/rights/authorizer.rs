//! Authorizer 계약과 구현
//!
//! 쿼리 엔진이 사용하는 세 가지 연산을 정의합니다.
//!
//! - `authorize`: 조회 가능한 큐브 필터링. 권한 조회 실패 시 빈 목록 (fail closed)
//! - `restricted_cell`: 큐브에 적용할 제한 셀. 조회 실패는 호출자에게 전파
//! - `hierarchy_limits`: 큐브의 hierarchy limit. 조회 실패는 호출자에게 전파

use std::sync::Arc;

use super::access_right::{AccessRight, Precedence};
use super::config::AuthorizerConfig;
use super::provider::{HttpRightsProvider, RightsMethod, RightsSource};
use crate::cells::{Cell, Cut};
use crate::error::Result;
use crate::model::{Cube, DimensionLevelRef};

/// 쿼리 엔진이 사용하는 권한 판단 계약
pub trait Authorizer: Send + Sync {
    /// `identity`가 조회할 수 있는 큐브만 남깁니다.
    ///
    /// 권한 데이터를 가져오지 못하면 빈 목록을 반환합니다.
    fn authorize(&self, identity: &str, cubes: &[Arc<Cube>]) -> Vec<Arc<Cube>>;

    /// 큐브에 대한 제한 셀
    ///
    /// `cell`이 주어지면 `cell & restriction`, 아니면 제한 셀만 반환합니다.
    ///
    /// # Errors
    ///
    /// 권한 데이터 조회 실패 시 에러를 반환합니다. 호출자는 제한 없는 쿼리를
    /// 실행하지 말고 쿼리를 중단해야 합니다.
    fn restricted_cell(&self, identity: &str, cube: &Arc<Cube>, cell: Option<&Cell>)
        -> Result<Cell>;

    /// 큐브에 대한 hierarchy limit
    ///
    /// # Errors
    ///
    /// 권한 데이터 조회 실패 시 에러를 반환합니다.
    fn hierarchy_limits(&self, identity: &str, cube: &Cube) -> Result<Vec<DimensionLevelRef>>;

    /// 허용된 큐브 이름 목록
    fn authorize_names(&self, identity: &str, cubes: &[Arc<Cube>]) -> Vec<String> {
        self.authorize(identity, cubes)
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

/// 권한 제공자 기반 Authorizer
pub struct RightsAuthorizer<S = HttpRightsProvider> {
    source: S,
    precedence: Precedence,
}

impl RightsAuthorizer<HttpRightsProvider> {
    /// 설정에서 HTTP 권한 제공자 기반 Authorizer 생성
    ///
    /// # Errors
    ///
    /// URL 누락 또는 알 수 없는 `order` 값이면 설정 에러를 반환합니다.
    pub fn from_config(config: &AuthorizerConfig) -> Result<Self> {
        let precedence = config.precedence()?;
        let source = HttpRightsProvider::from_config(config)?;
        Ok(Self::new(source, precedence))
    }
}

impl<S: RightsSource> RightsAuthorizer<S> {
    pub fn new(source: S, precedence: Precedence) -> Self {
        Self { source, precedence }
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    fn fetch_right(
        &self,
        identity: &str,
        method: RightsMethod,
        cube: Option<&str>,
    ) -> Result<AccessRight> {
        let document = self.source.fetch(identity, method, cube)?;
        match method {
            RightsMethod::Authorize => AccessRight::from_cube_lists(&document),
            RightsMethod::RestrictedCell => AccessRight::from_cell_restrictions(&document),
            RightsMethod::HierarchyLimits => AccessRight::from_hierarchy_limits(&document),
        }
    }
}

impl<S: RightsSource> Authorizer for RightsAuthorizer<S> {
    fn authorize(&self, identity: &str, cubes: &[Arc<Cube>]) -> Vec<Arc<Cube>> {
        let right = match self.fetch_right(identity, RightsMethod::Authorize, None) {
            Ok(right) => right,
            Err(e) if e.is_fetch_failure() => {
                tracing::warn!(
                    source = self.source.name(),
                    code = e.code(),
                    "rights fetch failed, no cubes authorized: {}",
                    e
                );
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    code = e.code(),
                    "rights source misconfigured, no cubes authorized: {}",
                    e
                );
                return Vec::new();
            }
        };

        cubes
            .iter()
            .filter(|cube| right.is_allowed(&cube.name, self.precedence))
            .cloned()
            .collect()
    }

    fn restricted_cell(
        &self,
        identity: &str,
        cube: &Arc<Cube>,
        cell: Option<&Cell>,
    ) -> Result<Cell> {
        let right = self.fetch_right(identity, RightsMethod::RestrictedCell, Some(&cube.name))?;

        let cuts = right
            .cell_restrictions_for(&cube.name)
            .into_iter()
            .map(|spec| spec.resolve(cube).map(Cut::hidden))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(cube = %cube.name, cuts = cuts.len(), "resolved cell restriction");
        let restriction = Cell::with_cuts(Arc::clone(cube), cuts);

        match cell {
            Some(cell) => cell.intersect(&restriction),
            None => Ok(restriction),
        }
    }

    fn hierarchy_limits(&self, identity: &str, cube: &Cube) -> Result<Vec<DimensionLevelRef>> {
        let right = self.fetch_right(identity, RightsMethod::HierarchyLimits, Some(&cube.name))?;
        Ok(right.hierarchy_limits_for(&cube.name))
    }
}

/// 모든 큐브를 제한 없이 허용하는 Authorizer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuthorizer;

impl Authorizer for NoopAuthorizer {
    fn authorize(&self, _identity: &str, cubes: &[Arc<Cube>]) -> Vec<Arc<Cube>> {
        cubes.to_vec()
    }

    fn restricted_cell(
        &self,
        _identity: &str,
        cube: &Arc<Cube>,
        cell: Option<&Cell>,
    ) -> Result<Cell> {
        Ok(cell.cloned().unwrap_or_else(|| Cell::new(Arc::clone(cube))))
    }

    fn hierarchy_limits(&self, _identity: &str, _cube: &Cube) -> Result<Vec<DimensionLevelRef>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CutKind;
    use crate::error::Error;
    use crate::model::Dimension;
    use crate::rights::provider::StaticRightsSource;

    const RIGHTS: &str = r#"
alice:
  allowed_cubes: [sales, "*_test"]
  denied_cubes: [sales_test]
  cell_restrictions:
    "*":
      - { dimension: region, values: [EU] }
    sales:
      - "date:2010"
  hierarchy_limits:
    sales: ["date:month"]
"#;

    fn cube(name: &str) -> Arc<Cube> {
        Arc::new(
            Cube::new(name)
                .with_dimension(Dimension::new("date").with_levels(["year", "month", "day"]))
                .with_dimension(Dimension::new("region")),
        )
    }

    fn candidates() -> Vec<Arc<Cube>> {
        ["sales", "hr", "sales_test", "billing_test"]
            .into_iter()
            .map(cube)
            .collect()
    }

    fn authorizer(precedence: Precedence) -> RightsAuthorizer<StaticRightsSource> {
        RightsAuthorizer::new(StaticRightsSource::from_yaml_str(RIGHTS).unwrap(), precedence)
    }

    #[test]
    fn test_authorize_deny_allow() {
        let auth = authorizer(Precedence::DenyThenAllow);
        assert_eq!(
            auth.authorize_names("alice", &candidates()),
            vec!["sales", "hr", "sales_test", "billing_test"]
        );
    }

    #[test]
    fn test_authorize_allow_deny() {
        let auth = authorizer(Precedence::AllowThenDeny);
        assert_eq!(
            auth.authorize_names("alice", &candidates()),
            vec!["sales", "billing_test"]
        );
    }

    #[test]
    fn test_authorize_fails_closed() {
        let auth = authorizer(Precedence::DenyThenAllow);
        assert!(auth.authorize("mallory", &candidates()).is_empty());
    }

    #[test]
    fn test_operations_ignore_unrelated_fields() {
        let source = StaticRightsSource::default().with_identity(
            "dave",
            serde_json::from_str(
                r#"{"allowed_cubes": ["sales"], "hierarchy_limits": {"sales": ["date@:"]}}"#,
            )
            .unwrap(),
        );
        let auth = RightsAuthorizer::new(source, Precedence::AllowThenDeny);

        assert_eq!(auth.authorize_names("dave", &candidates()), vec!["sales"]);
        assert!(auth.restricted_cell("dave", &cube("sales"), None).unwrap().is_empty());
        assert!(matches!(
            auth.hierarchy_limits("dave", &cube("sales")),
            Err(Error::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_dotted_hierarchy_limit() {
        let source = StaticRightsSource::default().with_identity(
            "erin",
            serde_json::from_str(r#"{"hierarchy_limits": {"sales": ["date.month"]}}"#).unwrap(),
        );
        let auth = RightsAuthorizer::new(source, Precedence::DenyThenAllow);

        assert_eq!(
            auth.hierarchy_limits("erin", &cube("sales")).unwrap(),
            vec![DimensionLevelRef::new("date").with_level("month")]
        );
    }

    #[test]
    fn test_restricted_cell_wildcard_only() {
        let auth = authorizer(Precedence::DenyThenAllow);
        let hr = cube("hr");

        let cell = auth.restricted_cell("alice", &hr, None).unwrap();
        assert_eq!(cell.cuts().len(), 1);
        let cut = &cell.cuts()[0];
        assert_eq!(cut.dimension, "region");
        assert_eq!(
            cut.kind,
            CutKind::Set {
                paths: vec![vec!["EU".to_string()]]
            }
        );
        assert!(cut.hidden);
        assert_eq!(cell.visible_cuts().count(), 0);
    }

    #[test]
    fn test_restricted_cell_own_and_wildcard() {
        let auth = authorizer(Precedence::DenyThenAllow);
        let sales = cube("sales");

        let cell = auth.restricted_cell("alice", &sales, None).unwrap();
        let dims: Vec<&str> = cell.cuts().iter().map(|c| c.dimension.as_str()).collect();
        assert_eq!(dims, vec!["date", "region"]);
        assert!(cell.cuts().iter().all(|c| c.hidden));
    }

    #[test]
    fn test_restricted_cell_intersects_existing() {
        let auth = authorizer(Precedence::DenyThenAllow);
        let sales = cube("sales");
        let existing = Cell::with_cuts(
            Arc::clone(&sales),
            vec![Cut::point("date", vec!["2011".to_string(), "2".to_string()])],
        );

        let restricted = auth.restricted_cell("alice", &sales, Some(&existing)).unwrap();
        let expected = existing
            .intersect(&auth.restricted_cell("alice", &sales, None).unwrap())
            .unwrap();
        assert_eq!(restricted, expected);
        assert!(!restricted.cuts()[0].hidden);
        assert_eq!(restricted.visible_cuts().count(), 1);
    }

    #[test]
    fn test_restricted_cell_propagates_fetch_error() {
        let auth = authorizer(Precedence::DenyThenAllow);
        let result = auth.restricted_cell("mallory", &cube("sales"), None);
        assert!(matches!(result, Err(Error::UnknownIdentity)));
    }

    #[test]
    fn test_restricted_cell_unknown_dimension() {
        let source = StaticRightsSource::default().with_identity(
            "carol",
            serde_yaml::from_str(r#"cell_restrictions: {sales: ["customer:42"]}"#).unwrap(),
        );
        let auth = RightsAuthorizer::new(source, Precedence::DenyThenAllow);
        assert!(matches!(
            auth.restricted_cell("carol", &cube("sales"), None),
            Err(Error::UnknownDimension { .. })
        ));
    }

    #[test]
    fn test_hierarchy_limits() {
        let auth = authorizer(Precedence::DenyThenAllow);

        let limits = auth.hierarchy_limits("alice", &cube("sales")).unwrap();
        assert_eq!(limits, vec![DimensionLevelRef::new("date").with_level("month")]);

        assert!(auth.hierarchy_limits("alice", &cube("hr")).unwrap().is_empty());
        assert!(auth.hierarchy_limits("mallory", &cube("hr")).is_err());
    }

    #[test]
    fn test_from_config_validation() {
        let result = RightsAuthorizer::from_config(&AuthorizerConfig::default());
        assert!(matches!(result, Err(Error::Configuration { .. })));

        let config = AuthorizerConfig::new("http://rights.local/").with_order("deny_first");
        assert!(matches!(
            RightsAuthorizer::from_config(&config),
            Err(Error::Configuration { .. })
        ));

        let config = AuthorizerConfig::new("http://rights.local/").with_order("allow_deny");
        let auth = RightsAuthorizer::from_config(&config).unwrap();
        assert_eq!(auth.precedence(), Precedence::AllowThenDeny);
    }

    #[test]
    fn test_noop_authorizer() {
        let auth = NoopAuthorizer;
        let cubes = candidates();
        assert_eq!(auth.authorize("anyone", &cubes).len(), 4);

        let sales = cube("sales");
        assert!(auth.restricted_cell("anyone", &sales, None).unwrap().is_empty());
        assert!(auth.hierarchy_limits("anyone", &sales).unwrap().is_empty());
    }
}
