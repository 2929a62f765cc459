//! 행 수준 권한 적용
//!
//! 셀의 컷 중 권한 차원(`info.type == "Permission"`)에 대한 컷을 분리하고,
//! 분리된 권한 셀을 fact 테이블 PK 기준의 서브쿼리 조건으로 SELECT 문에 주입합니다.

use std::sync::Arc;

use sea_query::{ConditionalStatement, Expr, SelectStatement};

use cbx_core::cells::{Cell, Cut};
use cbx_core::model::Attribute;
use cbx_core::Result;

use crate::context::{DynIden, QueryContext};

/// 권한 서브쿼리의 fact key 컬럼 라벨
pub const FACT_KEY_LABEL: &str = "__fact_key__";

/// 셀을 (데이터 셀, 권한 셀)로 분리
///
/// 권한 컷이 없으면 원래 셀과 `None`을 반환합니다.
/// 큐브에 없는 차원의 컷은 데이터 컷으로 취급합니다.
pub fn split_permission_cell(cell: &Cell) -> (Cell, Option<Cell>) {
    let cube = cell.cube();

    let (permission_cuts, data_cuts): (Vec<Cut>, Vec<Cut>) =
        cell.cuts().iter().cloned().partition(|cut| {
            cube.dimension(&cut.dimension)
                .map(|d| d.is_permission())
                .unwrap_or(false)
        });

    if permission_cuts.is_empty() {
        return (cell.clone(), None);
    }

    (
        Cell::with_cuts(Arc::clone(cube), data_cuts),
        Some(Cell::with_cuts(Arc::clone(cube), permission_cuts)),
    )
}

/// 권한 셀을 SELECT 문에 적용하는 enforcer
pub struct PermissionEnforcer<'a> {
    context: Option<&'a dyn QueryContext>,
}

impl<'a> PermissionEnforcer<'a> {
    pub fn new(context: &'a dyn QueryContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    /// 쿼리 컨텍스트 없이 생성 (항상 no-op)
    pub fn unbound() -> Self {
        Self { context: None }
    }

    /// 권한 필터 주입
    ///
    /// 다음 형태의 조건을 기존 WHERE 절에 AND로 추가합니다.
    ///
    /// ```sql
    /// WHERE ... AND fact.key IN (SELECT DISTINCT fact.key AS __fact_key__
    ///                            FROM <star> WHERE <permission condition>)
    /// ```
    ///
    /// FROM/JOIN 절은 건드리지 않으므로 star 조인의 ON 조건은 그대로 유효합니다.
    ///
    /// 권한 셀, 문장, 컨텍스트 중 하나라도 없으면 아무것도 하지 않고 `false`를 반환합니다.
    /// 에러가 나면 문장은 변경되지 않습니다.
    pub fn enforce(
        &self,
        statement: Option<&mut SelectStatement>,
        permission_cell: Option<&Cell>,
    ) -> Result<bool> {
        let (Some(context), Some(statement), Some(cell)) =
            (self.context, statement, permission_cell)
        else {
            return Ok(false);
        };

        let cube = cell.cube();
        let refs = cell.attribute_refs()?;
        let attributes = cube.attributes(&refs)?;

        let fact = DynIden::new(cube.fact_table());
        let key = DynIden::new(cube.key_column());

        let mut allowed_records = context.star_select(&attributes)?;
        allowed_records
            .distinct()
            .expr_as(
                Expr::col((fact.clone(), key.clone())),
                DynIden::new(FACT_KEY_LABEL),
            )
            .cond_where(context.condition_for_cell(cell)?);

        statement.and_where(Expr::col((fact, key)).in_subquery(allowed_records));

        tracing::debug!(
            cube = %cube.name,
            cuts = cell.cuts().len(),
            attributes = ?attributes.iter().map(Attribute::reference).collect::<Vec<_>>(),
            "applied permission filter"
        );

        Ok(true)
    }
}
