//! cbx-sql: 큐브 SQL 문 재작성 라이브러리
//!
//! 쿼리 엔진이 만든 SeaQuery SELECT 문에 행 수준 권한 필터와 정렬을 적용합니다.
//!
//! # 모듈 구조
//!
//! - `context`: 쿼리 엔진이 제공하는 star 스키마 / 셀 조건 변환 계약
//! - `permission`: 권한 컷 분리 및 권한 서브쿼리 주입
//! - `order`: 명시적 정렬 + 자연 정렬 병합, 페이지네이션

pub mod context;
pub mod order;
pub mod permission;

pub use context::{DynIden, QueryContext};
pub use order::{
    order_column, order_query, paginate, Direction, LabeledColumn, NaturalOrder, OrderItem,
    OrderTerm, SPLIT_DIMENSION_NAME,
};
pub use permission::{split_permission_cell, PermissionEnforcer};
