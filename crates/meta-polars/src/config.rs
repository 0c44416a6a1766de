//! Input column mapping

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Names of the input columns a study table is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Sample size column
    pub n: String,
    /// Inverse-variance weight column
    pub weight_factor: String,
    /// Standardized effect size column
    pub standardized_es: String,
    /// Grouping key columns, in key order
    pub group_by: Vec<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            n: "n".to_string(),
            weight_factor: "weight factor".to_string(),
            standardized_es: "standardized es".to_string(),
            group_by: vec!["specie_str".to_string(), "structure_renamed".to_string()],
        }
    }
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n(mut self, name: impl Into<String>) -> Self {
        self.n = name.into();
        self
    }

    pub fn with_weight_factor(mut self, name: impl Into<String>) -> Self {
        self.weight_factor = name.into();
        self
    }

    pub fn with_standardized_es(mut self, name: impl Into<String>) -> Self {
        self.standardized_es = name.into();
        self
    }

    pub fn with_group_by<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = names.into_iter().map(Into::into).collect();
        self
    }

    /// Grouped operations need at least one key column
    pub fn validate_grouping(&self) -> Result<()> {
        if self.group_by.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one group_by column is required".to_string(),
            ));
        }
        Ok(())
    }
}
