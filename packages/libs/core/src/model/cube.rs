//! 큐브 / 차원 정의

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// 계층이 선언되지 않은 차원의 기본 계층 이름
pub const DEFAULT_HIERARCHY_NAME: &str = "default";

/// 권한 차원을 표시하는 `info.type` 값
const PERMISSION_TYPE_TAG: &str = "Permission";

/// 큐브 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// 큐브 이름
    pub name: String,

    /// Fact 테이블 이름 (기본: 큐브 이름)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact: Option<String>,

    /// Fact 테이블 PK 컬럼 (기본: `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

impl Cube {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fact: None,
            key: None,
            dimensions: Vec::new(),
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn fact_table(&self) -> &str {
        self.fact.as_deref().unwrap_or(&self.name)
    }

    pub fn key_column(&self) -> &str {
        self.key.as_deref().unwrap_or("id")
    }

    /// 이름으로 차원 조회
    pub fn dimension(&self, name: &str) -> Result<&Dimension> {
        self.dimensions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::UnknownDimension {
                cube: self.name.clone(),
                dimension: name.to_string(),
            })
    }

    /// `dimension.level` 형태의 속성 참조들을 속성 정의로 해석
    ///
    /// 참조 순서를 유지하며, 알 수 없는 참조가 하나라도 있으면 실패합니다.
    pub fn attributes(&self, refs: &[String]) -> Result<Vec<Attribute>> {
        refs.iter().map(|r| self.attribute(r)).collect()
    }

    fn attribute(&self, reference: &str) -> Result<Attribute> {
        let unknown = || Error::UnknownAttribute {
            name: reference.to_string(),
        };

        let (dim_name, level_name) = match reference.split_once('.') {
            Some((dim, level)) => (dim, Some(level)),
            None => (reference, None),
        };
        let dimension = self.dimension(dim_name).map_err(|_| unknown())?;
        let levels = dimension.levels();
        let level = match level_name {
            Some(name) => levels.iter().find(|l| l.as_str() == name).ok_or_else(unknown)?,
            // 레벨 없이 차원만 지정하면 단일 레벨 차원이어야 함
            None if levels.len() == 1 => &levels[0],
            None => return Err(unknown()),
        };

        // 기본 계층 우선
        let hierarchy = match dimension.hierarchy(None) {
            Ok(h) if h.levels.contains(level) => h.name,
            _ => dimension
                .hierarchies()
                .into_iter()
                .find(|h| h.levels.contains(level))
                .map(|h| h.name)
                .unwrap_or_else(|| DEFAULT_HIERARCHY_NAME.to_string()),
        };

        Ok(Attribute {
            dimension: dimension.name.clone(),
            hierarchy,
            level: level.clone(),
        })
    }
}

impl std::fmt::Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 차원 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,

    /// 차원 역할 (예: `time`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// 임의 메타데이터. `type: Permission`이면 권한 차원
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub info: Map<String, Value>,

    /// 레벨 이름 (상위 → 하위). 비어 있으면 차원 이름 하나
    #[serde(default)]
    pub levels: Vec<String>,

    #[serde(default)]
    pub hierarchies: Vec<Hierarchy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hierarchy: Option<String>,
}

/// 계층 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub name: String,
    pub levels: Vec<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            info: Map::new(),
            levels: Vec::new(),
            hierarchies: Vec::new(),
            default_hierarchy: None,
        }
    }

    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.hierarchies.push(hierarchy);
        self
    }

    /// 권한 차원으로 표시
    pub fn permission(mut self) -> Self {
        self.info
            .insert("type".to_string(), Value::String(PERMISSION_TYPE_TAG.to_string()));
        self
    }

    /// `info.type == "Permission"` 여부
    pub fn is_permission(&self) -> bool {
        self.info.get("type").and_then(Value::as_str) == Some(PERMISSION_TYPE_TAG)
    }

    /// 선언된 레벨 목록
    pub fn levels(&self) -> Vec<String> {
        if self.levels.is_empty() {
            vec![self.name.clone()]
        } else {
            self.levels.clone()
        }
    }

    /// 선언된 계층 목록. 없으면 전체 레벨을 가진 기본 계층 하나
    pub fn hierarchies(&self) -> Vec<Hierarchy> {
        if self.hierarchies.is_empty() {
            vec![Hierarchy {
                name: DEFAULT_HIERARCHY_NAME.to_string(),
                levels: self.levels(),
            }]
        } else {
            self.hierarchies.clone()
        }
    }

    /// 이름으로 계층 조회 (None = 기본 계층)
    pub fn hierarchy(&self, name: Option<&str>) -> Result<Hierarchy> {
        let hierarchies = self.hierarchies();
        let wanted = name.or(self.default_hierarchy.as_deref());

        let found = match wanted {
            Some(wanted) => hierarchies.into_iter().find(|h| h.name == wanted),
            None => hierarchies.into_iter().next(),
        };

        found.ok_or_else(|| Error::UnknownHierarchy {
            dimension: self.name.clone(),
            hierarchy: wanted.unwrap_or(DEFAULT_HIERARCHY_NAME).to_string(),
        })
    }
}

/// 해석된 속성 (차원의 한 레벨)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub dimension: String,
    pub hierarchy: String,
    pub level: String,
}

impl Attribute {
    /// `dimension.level` 참조 문자열
    pub fn reference(&self) -> String {
        format!("{}.{}", self.dimension, self.level)
    }
}

/// 큐브 카탈로그
///
/// CLI와 테스트에서 사용하는 모델 파일의 루트 구조입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeCatalog {
    #[serde(default)]
    pub cubes: Vec<Cube>,
}

impl CubeCatalog {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn cube(&self, name: &str) -> Result<&Cube> {
        self.cubes
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownCube {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> CubeCatalog {
        let yaml = r#"
cubes:
  - name: sales
    key: sale_id
    dimensions:
      - name: date
        role: time
        levels: [year, month, day]
        hierarchies:
          - name: ym
            levels: [year, month]
          - name: ymd
            levels: [year, month, day]
        default_hierarchy: ymd
      - name: region
        levels: [continent, country]
      - name: org
        info:
          type: Permission
      - name: product
"#;
        CubeCatalog::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_fact_defaults() {
        let catalog = sample_catalog();
        let sales = catalog.cube("sales").unwrap();
        assert_eq!(sales.fact_table(), "sales");
        assert_eq!(sales.key_column(), "sale_id");
        assert_eq!(Cube::new("hr").key_column(), "id");
        assert!(catalog.cube("hr").is_err());
    }

    #[test]
    fn test_permission_tag() {
        let catalog = sample_catalog();
        let sales = catalog.cube("sales").unwrap();
        assert!(sales.dimension("org").unwrap().is_permission());
        assert!(!sales.dimension("region").unwrap().is_permission());
        assert!(Dimension::new("tenant").permission().is_permission());
    }

    #[test]
    fn test_hierarchy_lookup() {
        let catalog = sample_catalog();
        let date = catalog.cube("sales").unwrap().dimension("date").unwrap();

        assert_eq!(date.hierarchy(None).unwrap().name, "ymd");
        assert_eq!(date.hierarchy(Some("ym")).unwrap().levels, vec!["year", "month"]);
        assert!(date.hierarchy(Some("weekly")).is_err());

        let product = catalog.cube("sales").unwrap().dimension("product").unwrap();
        let default = product.hierarchy(None).unwrap();
        assert_eq!(default.name, DEFAULT_HIERARCHY_NAME);
        assert_eq!(default.levels, vec!["product"]);
    }

    #[test]
    fn test_attribute_resolution() {
        let catalog = sample_catalog();
        let sales = catalog.cube("sales").unwrap();

        let attrs = sales
            .attributes(&["region.country".to_string(), "org".to_string()])
            .unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].reference(), "region.country");
        assert_eq!(attrs[1].level, "org");

        // 다중 레벨 차원은 레벨 지정 필요
        assert!(sales.attributes(&["region".to_string()]).is_err());
        assert!(sales.attributes(&["region.city".to_string()]).is_err());
    }
}
