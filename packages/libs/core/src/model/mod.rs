//! 큐브 메타데이터 모델
//!
//! # 개요
//!
//! 권한 판단과 셀 해석에 필요한 최소한의 큐브 메타데이터입니다.
//! 차원(dimension), 계층(hierarchy), 레벨(level) 구조를 YAML/JSON으로 로드합니다.
//!
//! # 모듈 구조
//!
//! - `cube`: 큐브, 차원, 속성 정의 및 카탈로그
//! - `level`: 차원/계층/레벨 참조 (hierarchy limit)

mod cube;
mod level;

pub use cube::{Attribute, Cube, CubeCatalog, Dimension, Hierarchy, DEFAULT_HIERARCHY_NAME};
pub use level::DimensionLevelRef;
