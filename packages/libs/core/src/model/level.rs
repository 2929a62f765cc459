//! 차원 레벨 참조
//!
//! Hierarchy limit은 `dimension[@hierarchy][:level]` 문자열 또는
//! 구조화된 객체로 전달됩니다. 레벨 구분자로 `.`도 허용합니다 (`date.month`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 차원/계층/레벨 참조
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionLevelRef {
    pub dimension: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl DimensionLevelRef {
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: None,
            level: None,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: impl Into<String>) -> Self {
        self.hierarchy = Some(hierarchy.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl FromStr for DimensionLevelRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidLevel {
            value: s.to_string(),
        };

        let (head, level) = match s.split_once(':').or_else(|| s.split_once('.')) {
            Some((head, level)) => (head, Some(level)),
            None => (s, None),
        };
        let (dimension, hierarchy) = match head.split_once('@') {
            Some((dimension, hierarchy)) => (dimension, Some(hierarchy)),
            None => (head, None),
        };

        if !is_name(dimension)
            || !hierarchy.map_or(true, is_name)
            || !level.map_or(true, is_name)
        {
            return Err(invalid());
        }

        Ok(Self {
            dimension: dimension.to_string(),
            hierarchy: hierarchy.map(str::to_string),
            level: level.map(str::to_string),
        })
    }
}

impl std::fmt::Display for DimensionLevelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dimension)?;
        if let Some(hierarchy) = &self.hierarchy {
            write!(f, "@{}", hierarchy)?;
        }
        if let Some(level) = &self.level {
            write!(f, ":{}", level)?;
        }
        Ok(())
    }
}
