//! 정렬 및 페이지네이션
//!
//! 명시적 정렬 요청을 SELECT 문의 컬럼에 맞춰 정규화하고,
//! 명시되지 않은 컬럼에는 속성의 자연 정렬(natural order)을 적용합니다.

use sea_query::{Expr, Order, OrderedStatement, SelectStatement};
use serde::{Deserialize, Serialize};

use cbx_core::{Error, Result};

use crate::context::DynIden;

/// split 쿼리 결과를 구분하는 합성 컬럼 이름
pub const SPLIT_DIMENSION_NAME: &str = "__within_split__";

/// 정렬 방향
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 데이터베이스 기본 정렬
    #[default]
    Unspecified,
    Asc,
    Desc,
}

impl Direction {
    /// 방향 문자열 파싱
    ///
    /// 비어 있으면 기본 정렬, 대소문자 무시하고 `asc*` / `desc*` 접두사로 판단합니다.
    pub fn parse(order: Option<&str>, attribute: &str) -> Result<Self> {
        let order = match order {
            None | Some("") => return Ok(Direction::Unspecified),
            Some(order) => order,
        };

        let lower = order.to_lowercase();
        if lower.starts_with("asc") {
            Ok(Direction::Asc)
        } else if lower.starts_with("desc") {
            Ok(Direction::Desc)
        } else {
            Err(Error::InvalidOrder {
                order: order.to_string(),
                attribute: attribute.to_string(),
            })
        }
    }

    /// SeaQuery 정렬 (기본 정렬은 ASC로 렌더링)
    pub fn to_order(self) -> Order {
        match self {
            Direction::Unspecified | Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// 명시적 정렬 요청 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub attribute: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl OrderItem {
    pub fn new(attribute: impl Into<String>, direction: Option<&str>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: direction.map(str::to_string),
        }
    }
}

/// SELECT 문의 컬럼 (논리 라벨 → 물리 컬럼 라벨)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledColumn {
    /// 속성 이름 (논리 라벨)
    pub label: String,

    /// SELECT 목록에 노출된 컬럼 이름
    pub name: String,
}

impl LabeledColumn {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }

    /// 라벨과 컬럼 이름이 같은 컬럼
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
        }
    }
}

/// 속성별 자연 정렬
///
/// 선언 순서를 보존하는 (속성, 방향) 목록입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaturalOrder {
    entries: Vec<(String, Option<String>)>,
}

impl NaturalOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 속성의 자연 정렬 추가 (같은 속성은 덮어씀)
    pub fn with(mut self, attribute: impl Into<String>, direction: Option<&str>) -> Self {
        let attribute = attribute.into();
        let direction = direction.map(str::to_string);
        match self.entries.iter_mut().find(|(a, _)| *a == attribute) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((attribute, direction)),
        }
        self
    }

    /// 선언된 자연 정렬 (`None` = 선언 없음, `Some(None)` = 기본 정렬)
    pub fn get(&self, attribute: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, d)| d.as_deref())
    }
}

/// 최종 정렬 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub attribute: String,
    pub column: String,
    pub direction: Direction,
}

/// 컬럼에 방향 문자열을 적용한 정렬 항목
pub fn order_column(column: &LabeledColumn, order: Option<&str>) -> Result<OrderTerm> {
    Ok(OrderTerm {
        attribute: column.label.clone(),
        column: column.name.clone(),
        direction: Direction::parse(order, &column.label)?,
    })
}

/// SELECT 문의 ORDER BY 결정
///
/// 1. split 컬럼이 있으면 가장 먼저 오름차순
/// 2. 명시적 정렬 (이미 배치된 속성은 건너뜀)
/// 3. 남은 컬럼 중 자연 정렬이 선언된 컬럼
///
/// 최종 목록이 비어 있으면 문장을 건드리지 않습니다. 에러가 나도 문장은 변경되지 않습니다.
pub fn order_query(
    statement: &mut SelectStatement,
    columns: &[LabeledColumn],
    order: &[OrderItem],
    natural_order: &NaturalOrder,
) -> Result<Vec<OrderTerm>> {
    let mut terms: Vec<OrderTerm> = Vec::new();
    let placed = |terms: &[OrderTerm], attribute: &str| terms.iter().any(|t| t.attribute == attribute);

    if let Some(split) = columns.iter().find(|c| c.name == SPLIT_DIMENSION_NAME) {
        terms.push(OrderTerm {
            attribute: split.label.clone(),
            column: split.name.clone(),
            direction: Direction::Asc,
        });
    }

    for item in order {
        let column = columns
            .iter()
            .find(|c| c.label == item.attribute)
            .ok_or_else(|| Error::UnknownAttribute {
                name: item.attribute.clone(),
            })?;
        let term = order_column(column, item.direction.as_deref())?;
        if !placed(&terms, &term.attribute) {
            terms.push(term);
        }
    }

    for column in columns {
        if placed(&terms, &column.label) {
            continue;
        }
        if let Some(direction) = natural_order.get(&column.label) {
            terms.push(order_column(column, direction)?);
        }
    }

    if terms.is_empty() {
        return Ok(terms);
    }

    statement.clear_order_by();
    for term in &terms {
        statement.order_by_expr(
            Expr::col(DynIden::new(term.column.as_str())).into(),
            term.direction.to_order(),
        );
    }

    Ok(terms)
}

/// 페이지네이션
///
/// `page`와 `page_size`가 모두 있을 때만 `OFFSET page*page_size LIMIT page_size`를 설정합니다.
pub fn paginate(
    statement: &mut SelectStatement,
    page: Option<u64>,
    page_size: Option<u64>,
) -> &mut SelectStatement {
    if let (Some(page), Some(page_size)) = (page, page_size) {
        statement
            .offset(page.saturating_mul(page_size))
            .limit(page_size);
    }
    statement
}
