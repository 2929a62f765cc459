//! 셀 정의

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::Cube;

use super::cut::Cut;

/// 하나의 큐브로 범위가 한정된 컷 목록
///
/// 컷이 없는 셀은 해당 큐브 전체(무제한)를 의미합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    cube: Arc<Cube>,
    cuts: Vec<Cut>,
}

impl Cell {
    /// 무제한 셀
    pub fn new(cube: Arc<Cube>) -> Self {
        Self {
            cube,
            cuts: Vec::new(),
        }
    }

    pub fn with_cuts(cube: Arc<Cube>, cuts: Vec<Cut>) -> Self {
        Self { cube, cuts }
    }

    pub fn cube(&self) -> &Arc<Cube> {
        &self.cube
    }

    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// 사용자에게 보이는 컷 (hidden 제외)
    pub fn visible_cuts(&self) -> impl Iterator<Item = &Cut> {
        self.cuts.iter().filter(|c| !c.hidden)
    }

    /// 교집합 (`self & other`)
    ///
    /// 결과 셀의 컷은 두 셀의 컷을 순서대로 이어 붙인 것입니다.
    pub fn intersect(&self, other: &Cell) -> Result<Cell> {
        if self.cube.name != other.cube.name {
            return Err(Error::CubeMismatch {
                left: self.cube.name.clone(),
                right: other.cube.name.clone(),
            });
        }

        let mut cuts = self.cuts.clone();
        cuts.extend(other.cuts.iter().cloned());
        Ok(Cell::with_cuts(Arc::clone(&self.cube), cuts))
    }

    /// 컷들이 참조하는 속성 (`dimension.level`) 목록
    ///
    /// 각 컷의 계층에서 컷 깊이까지의 레벨을 순서대로, 중복 없이 모읍니다.
    pub fn attribute_refs(&self) -> Result<Vec<String>> {
        let mut refs: Vec<String> = Vec::new();

        for cut in &self.cuts {
            let dimension = self.cube.dimension(&cut.dimension)?;
            let hierarchy = dimension.hierarchy(cut.hierarchy.as_deref())?;
            let depth = cut.level_depth().min(hierarchy.levels.len());

            for level in &hierarchy.levels[..depth] {
                let reference = format!("{}.{}", dimension.name, level);
                if !refs.contains(&reference) {
                    refs.push(reference);
                }
            }
        }

        Ok(refs)
    }
}
