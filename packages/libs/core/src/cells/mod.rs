//! 셀(Cell)과 컷(Cut)
//!
//! # 개요
//!
//! 셀은 하나의 큐브에 대한 컷들의 순서 있는 목록입니다.
//! 컷은 문자열 형태(`[!]dim[@hier]:path`) 또는 구조화된 형태(JSON 객체)로
//! 전달되며, [`CutSpec::resolve`]로 해석됩니다.
//!
//! # 모듈 구조
//!
//! - `cut`: 컷 정의, 문자열/구조화 형태 파싱
//! - `cell`: 셀 정의 및 교집합

mod cell;
mod cut;

pub use cell::Cell;
pub use cut::{Cut, CutKind, CutSpec, StructuredCut};
