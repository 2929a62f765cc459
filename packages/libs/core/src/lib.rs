//! cbx-core: 큐브 접근 권한 핵심 라이브러리
//!
//! 이 크레이트는 쿼리 엔진, SQL 재작성 계층, CLI가 공유하는 핵심 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `model`: 큐브/차원/레벨 메타데이터
//! - `cells`: 셀과 컷, 문자열/구조화 형태 파싱
//! - `rights`: 권한 제공자 클라이언트, 접근 권한 판단, Authorizer 계약
//! - `error`: 공통 에러 타입

pub mod cells;
pub mod error;
pub mod model;
pub mod rights;

pub use error::{Error, Result};
