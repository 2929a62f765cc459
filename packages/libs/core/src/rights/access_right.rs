//! 큐브 접근 권한 판단
//!
//! 권한 제공자 응답으로부터 한 번의 판단에 쓰일 [`AccessRight`]를 만듭니다.
//! 생성 후에는 변경되지 않습니다.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::RightsDocument;
use crate::cells::CutSpec;
use crate::error::{Error, Result};
use crate::model::DimensionLevelRef;

/// 모든 큐브를 의미하는 와일드카드
pub const ALL_CUBES_WILDCARD: &str = "*";

/// allow/deny 평가 순서
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precedence {
    /// `allow_deny`: 명시적으로 허용되지 않으면 거부, deny가 항상 우선
    #[serde(rename = "allow_deny")]
    AllowThenDeny,

    /// `deny_allow`: 명시적으로 거부되지 않으면 허용, allow가 항상 우선
    #[default]
    #[serde(rename = "deny_allow")]
    DenyThenAllow,
}

impl Precedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precedence::AllowThenDeny => "allow_deny",
            Precedence::DenyThenAllow => "deny_allow",
        }
    }

    /// allow/deny 매칭 결과를 최종 판단으로 결합
    pub fn resolve(&self, allow_match: bool, deny_match: bool) -> bool {
        match self {
            Precedence::DenyThenAllow => allow_match || !deny_match,
            Precedence::AllowThenDeny => allow_match && !deny_match,
        }
    }
}

impl FromStr for Precedence {
    type Err = Error;

    /// 설정 문자열에서 파싱 (`allow_deny` | `deny_allow`)
    fn from_str(s: &str) -> Result<Self> {
        [Precedence::AllowThenDeny, Precedence::DenyThenAllow]
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::configuration(format!("unknown allow/deny order: {}", s)))
    }
}

impl std::fmt::Display for Precedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 큐브 이름 패턴 집합
///
/// 정확한 이름, `*name` (suffix), `name*` (prefix) 형태를 지원합니다.
/// 한 항목이 양쪽 패턴에 동시에 해당할 수 있습니다 (예: `*`).
#[derive(Debug, Clone, Default)]
struct CubePatterns {
    names: HashSet<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl CubePatterns {
    fn new(entries: Vec<String>) -> Self {
        let mut prefixes = Vec::new();
        let mut suffixes = Vec::new();

        for entry in &entries {
            if let Some(suffix) = entry.strip_prefix('*') {
                suffixes.push(suffix.to_string());
            }
            if let Some(prefix) = entry.strip_suffix('*') {
                prefixes.push(prefix.to_string());
            }
        }

        Self {
            names: entries.into_iter().collect(),
            prefixes,
            suffixes,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.names.contains(name)
            || self.names.contains(ALL_CUBES_WILDCARD)
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

/// 한 번의 권한 판단에 사용되는 접근 권한
#[derive(Debug, Clone, Default)]
pub struct AccessRight {
    allowed: CubePatterns,
    denied: CubePatterns,
    cell_restrictions: HashMap<String, Vec<CutSpec>>,
    hierarchy_limits: HashMap<String, Vec<DimensionLevelRef>>,
}

impl AccessRight {
    /// allow/deny 목록만으로 생성
    pub fn new(allowed_cubes: Vec<String>, denied_cubes: Vec<String>) -> Self {
        Self {
            allowed: CubePatterns::new(allowed_cubes),
            denied: CubePatterns::new(denied_cubes),
            ..Default::default()
        }
    }

    /// `authorize` 응답으로부터 생성 (allow/deny 필드만 사용)
    pub fn from_cube_lists(document: &RightsDocument) -> Result<Self> {
        Ok(Self::new(document.allowed_cubes()?, document.denied_cubes()?))
    }

    /// `restricted-cell` 응답으로부터 생성 (셀 제한 필드만 사용)
    pub fn from_cell_restrictions(document: &RightsDocument) -> Result<Self> {
        Ok(Self {
            cell_restrictions: document.cell_restrictions()?,
            ..Default::default()
        })
    }

    /// `hierarchy-limits` 응답으로부터 생성 (hierarchy limit 필드만 사용)
    pub fn from_hierarchy_limits(document: &RightsDocument) -> Result<Self> {
        Ok(Self {
            hierarchy_limits: document.hierarchy_limits()?,
            ..Default::default()
        })
    }

    /// 큐브 접근 허용 여부
    ///
    /// | allow | deny | deny_allow | allow_deny |
    /// |-------|------|------------|------------|
    /// | T     | F    | 허용       | 허용       |
    /// | F     | T    | 거부       | 거부       |
    /// | F     | F    | 허용       | 거부       |
    /// | T     | T    | 허용       | 거부       |
    pub fn is_allowed(&self, cube_name: &str, precedence: Precedence) -> bool {
        precedence.resolve(self.allowed.matches(cube_name), self.denied.matches(cube_name))
    }

    /// 큐브에 등록된 셀 제한 + 와일드카드(`*`)로 등록된 셀 제한
    pub fn cell_restrictions_for(&self, cube_name: &str) -> Vec<&CutSpec> {
        let own = self.cell_restrictions.get(cube_name).into_iter().flatten();
        // 큐브 이름이 "*" 자체인 경우 중복 수집하지 않음
        let any = if cube_name == ALL_CUBES_WILDCARD {
            None
        } else {
            self.cell_restrictions.get(ALL_CUBES_WILDCARD)
        };
        own.chain(any.into_iter().flatten()).collect()
    }

    /// 큐브에 등록된 hierarchy limit
    pub fn hierarchy_limits_for(&self, cube_name: &str) -> Vec<DimensionLevelRef> {
        self.hierarchy_limits
            .get(cube_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_truth_table() {
        // (allowed, denied, deny_allow, allow_deny)
        let cases = [
            (vec!["sales"], vec![], true, true),
            (vec![], vec!["sales"], false, false),
            (vec![], vec![], true, false),
            (vec!["sales"], vec!["sales"], true, false),
        ];

        for (allowed, denied, deny_allow, allow_deny) in cases {
            let right = AccessRight::new(strings(&allowed), strings(&denied));
            assert_eq!(
                right.is_allowed("sales", Precedence::DenyThenAllow),
                deny_allow,
                "deny_allow: allowed={:?} denied={:?}",
                allowed,
                denied
            );
            assert_eq!(
                right.is_allowed("sales", Precedence::AllowThenDeny),
                allow_deny,
                "allow_deny: allowed={:?} denied={:?}",
                allowed,
                denied
            );
        }
    }

    #[test]
    fn test_prefix_and_suffix_patterns() {
        let right = AccessRight::new(strings(&["sales*"]), vec![]);
        assert!(right.is_allowed("sales_eu", Precedence::AllowThenDeny));
        assert!(!right.is_allowed("hr", Precedence::AllowThenDeny));

        let right = AccessRight::new(strings(&["*_eu"]), vec![]);
        assert!(right.is_allowed("sales_eu", Precedence::AllowThenDeny));
        assert!(!right.is_allowed("sales_us", Precedence::AllowThenDeny));
    }

    #[test]
    fn test_universal_wildcard() {
        let right = AccessRight::new(strings(&["*"]), vec![]);
        for name in ["sales", "hr", "", "x*y"] {
            assert!(right.is_allowed(name, Precedence::AllowThenDeny));
        }

        let right = AccessRight::new(vec![], strings(&["*"]));
        assert!(!right.is_allowed("sales", Precedence::DenyThenAllow));
    }

    #[test]
    fn test_both_pattern_forms_coexist() {
        let right = AccessRight::new(strings(&["fin*", "*_test", "hr"]), strings(&["*_tmp"]));
        assert!(right.is_allowed("finance", Precedence::AllowThenDeny));
        assert!(right.is_allowed("billing_test", Precedence::AllowThenDeny));
        assert!(right.is_allowed("hr", Precedence::AllowThenDeny));
        assert!(!right.is_allowed("fin_tmp", Precedence::AllowThenDeny));
        assert!(right.is_allowed("fin_tmp", Precedence::DenyThenAllow));
        assert!(!right.is_allowed("ops_tmp", Precedence::DenyThenAllow));
    }

    #[test]
    fn test_scenarios() {
        let right = AccessRight::new(strings(&["sales", "*_test"]), strings(&["sales_test"]));
        let cubes = ["sales", "hr", "sales_test", "billing_test"];

        let deny_allow: Vec<&str> = cubes
            .iter()
            .copied()
            .filter(|c| right.is_allowed(c, Precedence::DenyThenAllow))
            .collect();
        assert_eq!(deny_allow, vec!["sales", "hr", "sales_test", "billing_test"]);

        let allow_deny: Vec<&str> = cubes
            .iter()
            .copied()
            .filter(|c| right.is_allowed(c, Precedence::AllowThenDeny))
            .collect();
        assert_eq!(allow_deny, vec!["sales", "billing_test"]);
    }

    const DOCUMENT: &str = r#"
allowed_cubes: [sales]
cell_restrictions:
  sales:
    - "region:EU"
  "*":
    - { dimension: org, values: [acme] }
hierarchy_limits:
  sales:
    - "date@ymd:month"
    - { dimension: region, level: continent }
"#;

    #[test]
    fn test_from_document_per_operation() {
        let document: RightsDocument = serde_yaml::from_str(DOCUMENT).unwrap();

        let right = AccessRight::from_cube_lists(&document).unwrap();
        assert!(right.is_allowed("sales", Precedence::AllowThenDeny));
        assert!(right.cell_restrictions_for("sales").is_empty());

        let right = AccessRight::from_cell_restrictions(&document).unwrap();
        assert_eq!(right.cell_restrictions_for("sales").len(), 2);
        assert_eq!(right.cell_restrictions_for("hr").len(), 1);
        assert_eq!(right.cell_restrictions_for("*").len(), 1);
        assert!(right.hierarchy_limits_for("sales").is_empty());

        let right = AccessRight::from_hierarchy_limits(&document).unwrap();
        assert_eq!(
            right.hierarchy_limits_for("sales"),
            vec![
                DimensionLevelRef::new("date").with_hierarchy("ymd").with_level("month"),
                DimensionLevelRef::new("region").with_level("continent"),
            ]
        );
        assert!(right.hierarchy_limits_for("hr").is_empty());
    }

    #[test]
    fn test_unused_fields_are_not_decoded() {
        let document: RightsDocument = serde_json::from_str(
            r#"{"allowed_cubes": ["sales"], "cell_restrictions": {"sales": 1}, "hierarchy_limits": {"sales": ["date@:"]}}"#,
        )
        .unwrap();

        let right = AccessRight::from_cube_lists(&document).unwrap();
        assert!(right.is_allowed("sales", Precedence::AllowThenDeny));
        assert!(AccessRight::from_cell_restrictions(&document).is_err());
        assert!(matches!(
            AccessRight::from_hierarchy_limits(&document),
            Err(Error::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_precedence_parsing() {
        assert_eq!("allow_deny".parse::<Precedence>().unwrap(), Precedence::AllowThenDeny);
        assert_eq!("deny_allow".parse::<Precedence>().unwrap(), Precedence::DenyThenAllow);
        assert!(matches!(
            "allow".parse::<Precedence>(),
            Err(Error::Configuration { .. })
        ));
        assert_eq!(Precedence::default(), Precedence::DenyThenAllow);
        assert_eq!(Precedence::AllowThenDeny.to_string(), "allow_deny");
    }
}
