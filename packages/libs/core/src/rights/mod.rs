//! 큐브 접근 권한과 Authorizer
//!
//! # 개요
//!
//! 외부 권한 제공자(HTTP/JSON)에서 identity별 권한 데이터를 가져와
//! 큐브 접근 허용 여부, 셀 제한, hierarchy limit을 결정합니다.
//!
//! # 모듈 구조
//!
//! - `access_right`: allow/deny 패턴 매칭과 판단
//! - `document`: 권한 제공자 응답 구조
//! - `provider`: 권한 데이터 소스 (HTTP, 정적 파일)
//! - `authorizer`: 쿼리 엔진용 Authorizer 계약과 구현
//! - `config`: Authorizer 설정

mod access_right;
mod authorizer;
mod config;
mod document;
mod provider;

pub use access_right::{AccessRight, Precedence, ALL_CUBES_WILDCARD};
pub use authorizer::{Authorizer, NoopAuthorizer, RightsAuthorizer};
pub use config::{
    AuthorizerConfig, DEFAULT_AUTHORIZE_METHOD, DEFAULT_HIERARCHY_LIMITS_METHOD,
    DEFAULT_RESTRICTED_CELL_METHOD,
};
pub use document::{LevelSpec, RightsDocument};
pub use provider::{HttpRightsProvider, RightsMethod, RightsSource, StaticRightsSource};
