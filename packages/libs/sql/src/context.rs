//! 쿼리 엔진 협력 계약
//!
//! star 스키마 조인 구성과 셀 → 관계형 조건 변환은 쿼리 엔진이 담당합니다.

use sea_query::{Condition, Iden, SelectStatement};

use cbx_core::cells::Cell;
use cbx_core::model::Attribute;
use cbx_core::Result;

/// 동적 테이블/컬럼 식별자
#[derive(Debug, Clone)]
pub struct DynIden(pub String);

impl DynIden {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Iden for DynIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        // fmt::Write to String은 실패하지 않음
        let _ = s.write_str(&self.0);
    }
}

/// 쿼리 엔진이 제공하는 쿼리 컨텍스트
pub trait QueryContext {
    /// 주어진 속성들을 덮는 star 스키마 조인을 FROM 절로 가진 SELECT 문
    ///
    /// 프로젝션과 WHERE 절은 비어 있어야 합니다.
    fn star_select(&self, attributes: &[Attribute]) -> Result<SelectStatement>;

    /// 셀과 동등한 관계형 조건
    fn condition_for_cell(&self, cell: &Cell) -> Result<Condition>;
}
