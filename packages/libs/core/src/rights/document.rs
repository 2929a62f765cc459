//! 권한 제공자 응답 구조
//!
//! 필드는 엔드포인트별로 일부만 채워집니다. 누락되거나 `null`인 필드는
//! 호출마다 새로 만든 빈 컨테이너로 취급됩니다.
//!
//! 각 필드는 원본 JSON 값으로 보관되고, 해당 필드를 쓰는 연산에서만 디코딩됩니다.
//! 한 엔드포인트가 사용하지 않는 필드가 잘못되어 있어도 판단에 영향을 주지 않습니다.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cells::CutSpec;
use crate::error::{Error, Result};
use crate::model::DimensionLevelRef;

/// 권한 제공자 응답 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RightsDocument {
    /// 허용 큐브 (`authorize`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_cubes: Option<Value>,

    /// 거부 큐브 (`authorize`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    denied_cubes: Option<Value>,

    /// 큐브별 셀 제한 (`restricted-cell`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell_restrictions: Option<Value>,

    /// 큐브별 hierarchy limit (`hierarchy-limits`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hierarchy_limits: Option<Value>,
}

impl RightsDocument {
    pub fn allowed_cubes(&self) -> Result<Vec<String>> {
        decode_field("allowed_cubes", &self.allowed_cubes)
    }

    pub fn denied_cubes(&self) -> Result<Vec<String>> {
        decode_field("denied_cubes", &self.denied_cubes)
    }

    pub fn cell_restrictions(&self) -> Result<HashMap<String, Vec<CutSpec>>> {
        decode_field("cell_restrictions", &self.cell_restrictions)
    }

    /// 큐브별 hierarchy limit
    ///
    /// 문자열 형태는 이 시점에 구조화된 참조로 정규화됩니다.
    pub fn hierarchy_limits(&self) -> Result<HashMap<String, Vec<DimensionLevelRef>>> {
        let raw: HashMap<String, Vec<LevelSpec>> =
            decode_field("hierarchy_limits", &self.hierarchy_limits)?;

        raw.into_iter()
            .map(|(cube, specs)| {
                let limits = specs
                    .into_iter()
                    .map(LevelSpec::into_level_ref)
                    .collect::<Result<Vec<_>>>()?;
                Ok((cube, limits))
            })
            .collect()
    }
}

fn decode_field<T: DeserializeOwned + Default>(field: &str, value: &Option<Value>) -> Result<T> {
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| Error::Decode {
            message: format!("{}: {}", field, e),
        }),
    }
}

/// hierarchy limit 표현 (문자열 또는 구조화)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Text(String),
    Structured(DimensionLevelRef),
}

impl LevelSpec {
    pub fn into_level_ref(self) -> Result<DimensionLevelRef> {
        match self {
            LevelSpec::Text(text) => text.parse(),
            LevelSpec::Structured(level) => Ok(level),
        }
    }
}
