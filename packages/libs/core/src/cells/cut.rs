//! 컷 정의 및 파싱

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Cube;

const PATH_SEPARATOR: &str = ",";
const SET_SEPARATOR: &str = ";";
const RANGE_SEPARATOR: &str = "-";

/// 해석된 컷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    pub dimension: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<String>,

    #[serde(flatten)]
    pub kind: CutKind,

    /// 조건 반전 (NOT)
    #[serde(default)]
    pub invert: bool,

    /// 사용자에게 보이는 셀 표시에서 제외 (필터로는 계속 적용)
    #[serde(default)]
    pub hidden: bool,
}

/// 컷 종류
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CutKind {
    /// 단일 경로
    Point { path: Vec<String> },

    /// 경로 집합
    Set { paths: Vec<Vec<String>> },

    /// 경로 범위 (양 끝은 선택)
    Range {
        from: Option<Vec<String>>,
        to: Option<Vec<String>>,
    },
}

impl Cut {
    pub fn point(dimension: impl Into<String>, path: Vec<String>) -> Self {
        Self::with_kind(dimension, CutKind::Point { path })
    }

    pub fn set(dimension: impl Into<String>, paths: Vec<Vec<String>>) -> Self {
        Self::with_kind(dimension, CutKind::Set { paths })
    }

    pub fn range(
        dimension: impl Into<String>,
        from: Option<Vec<String>>,
        to: Option<Vec<String>>,
    ) -> Self {
        Self::with_kind(dimension, CutKind::Range { from, to })
    }

    fn with_kind(dimension: impl Into<String>, kind: CutKind) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: None,
            kind,
            invert: false,
            hidden: false,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: impl Into<String>) -> Self {
        self.hierarchy = Some(hierarchy.into());
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// 컷이 닿는 가장 깊은 레벨 수
    pub fn level_depth(&self) -> usize {
        match &self.kind {
            CutKind::Point { path } => path.len(),
            CutKind::Set { paths } => paths.iter().map(Vec::len).max().unwrap_or(0),
            CutKind::Range { from, to } => {
                let from = from.as_ref().map_or(0, Vec::len);
                let to = to.as_ref().map_or(0, Vec::len);
                from.max(to)
            }
        }
    }

    /// 문자열 형태 파싱 (`[!]dim[@hier]:path`)
    ///
    /// 차원과 계층이 큐브에 존재하는지, 경로 깊이가 계층을 넘지 않는지 검증합니다.
    pub fn from_string(s: &str, cube: &Cube) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidCut {
            cut: s.to_string(),
            reason: reason.to_string(),
        };

        let (invert, body) = match s.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (head, path) = body
            .split_once(':')
            .ok_or_else(|| invalid("missing ':' between dimension and path"))?;
        let (dim_name, hier_name) = match head.split_once('@') {
            Some((dim, hier)) => (dim, Some(hier)),
            None => (head, None),
        };
        if dim_name.is_empty() || hier_name == Some("") {
            return Err(invalid("empty dimension or hierarchy name"));
        }

        let dimension = cube.dimension(dim_name)?;
        let hierarchy = dimension.hierarchy(hier_name)?;

        let kind = if path.contains(SET_SEPARATOR) {
            CutKind::Set {
                paths: path.split(SET_SEPARATOR).map(split_path).collect(),
            }
        } else if let Some((from, to)) = path.split_once(RANGE_SEPARATOR) {
            CutKind::Range {
                from: non_empty(from).map(split_path),
                to: non_empty(to).map(split_path),
            }
        } else {
            CutKind::Point {
                path: split_path(path),
            }
        };

        let cut = Cut {
            dimension: dimension.name.clone(),
            hierarchy: hier_name.map(str::to_string),
            kind,
            invert,
            hidden: false,
        };

        if cut.level_depth() > hierarchy.levels.len() {
            return Err(invalid(&format!(
                "path is deeper than hierarchy '{}' ({} levels)",
                hierarchy.name,
                hierarchy.levels.len()
            )));
        }

        Ok(cut)
    }
}

fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(PATH_SEPARATOR).map(str::to_string).collect()
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn join_path(path: &[String]) -> String {
    path.join(PATH_SEPARATOR)
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.invert {
            write!(f, "!")?;
        }
        write!(f, "{}", self.dimension)?;
        if let Some(hierarchy) = &self.hierarchy {
            write!(f, "@{}", hierarchy)?;
        }
        write!(f, ":")?;
        match &self.kind {
            CutKind::Point { path } => write!(f, "{}", join_path(path)),
            CutKind::Set { paths } => {
                let paths: Vec<String> = paths.iter().map(|p| join_path(p)).collect();
                write!(f, "{}", paths.join(SET_SEPARATOR))
            }
            CutKind::Range { from, to } => write!(
                f,
                "{}{}{}",
                from.as_deref().map(join_path).unwrap_or_default(),
                RANGE_SEPARATOR,
                to.as_deref().map(join_path).unwrap_or_default()
            ),
        }
    }
}

/// 권한 제공자가 전달하는 컷 표현
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CutSpec {
    /// 차원 메타데이터를 참조해 파싱해야 하는 문자열 형태
    Text(String),

    /// 직접 생성 가능한 구조화 형태
    Structured(StructuredCut),
}

impl CutSpec {
    /// 큐브 기준으로 컷 해석
    pub fn resolve(&self, cube: &Cube) -> Result<Cut> {
        match self {
            CutSpec::Text(text) => Cut::from_string(text, cube),
            CutSpec::Structured(structured) => structured.to_cut(),
        }
    }
}

/// 구조화된 컷
///
/// `type`이 없고 `values`만 있으면 단일 레벨 경로들의 set 컷으로 취급합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredCut {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub cut_type: Option<String>,

    pub dimension: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<Vec<Value>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,

    #[serde(default)]
    pub invert: bool,

    #[serde(default)]
    pub hidden: bool,
}

impl StructuredCut {
    pub fn to_cut(&self) -> Result<Cut> {
        let invalid = |reason: &str| Error::InvalidCut {
            cut: self.dimension.clone(),
            reason: reason.to_string(),
        };

        let kind = match self.cut_type.as_deref() {
            Some("point") => CutKind::Point {
                path: values_to_path(self.path.as_deref().unwrap_or_default())?,
            },
            Some("set") => CutKind::Set {
                paths: self
                    .paths
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(|p| values_to_path(p))
                    .collect::<Result<_>>()?,
            },
            Some("range") => CutKind::Range {
                from: self.from.as_deref().map(values_to_path).transpose()?,
                to: self.to.as_deref().map(values_to_path).transpose()?,
            },
            Some(other) => return Err(invalid(&format!("unknown cut type '{}'", other))),
            None => match (&self.values, &self.path) {
                (Some(values), _) => CutKind::Set {
                    paths: values
                        .iter()
                        .map(|v| value_to_string(v).map(|s| vec![s]))
                        .collect::<Result<_>>()?,
                },
                (None, Some(path)) => CutKind::Point {
                    path: values_to_path(path)?,
                },
                (None, None) => return Err(invalid("missing cut type")),
            },
        };

        Ok(Cut {
            dimension: self.dimension.clone(),
            hierarchy: self.hierarchy.clone(),
            kind,
            invert: self.invert,
            hidden: self.hidden,
        })
    }
}

fn values_to_path(values: &[Value]) -> Result<Vec<String>> {
    values.iter().map(value_to_string).collect()
}

fn value_to_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::InvalidCut {
            cut: other.to_string(),
            reason: "path elements must be scalars".to_string(),
        }),
    }
}
