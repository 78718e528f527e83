//! Circuit hierarchy a run targets: subregion > substation > feeder.

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitScope {
    pub subregion: String,
    pub substation: Option<String>,
    pub feeder: Option<String>,
}

impl CircuitScope {
    /// Build a scope, rejecting a feeder without its substation.
    pub fn new(
        subregion: impl Into<String>,
        substation: Option<String>,
        feeder: Option<String>,
    ) -> CoreResult<Self> {
        let scope = Self {
            subregion: subregion.into(),
            substation,
            feeder,
        };
        scope.validate()?;
        Ok(scope)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.subregion.trim().is_empty() {
            return Err(CoreError::InvalidArg {
                what: "subregion must not be empty",
            });
        }
        if self.feeder.is_some() && self.substation.is_none() {
            return Err(CoreError::InvalidArg {
                what: "a feeder requires its substation",
            });
        }
        Ok(())
    }

    /// Most specific level supplied.
    pub fn name(&self) -> &str {
        self.feeder
            .as_deref()
            .or(self.substation.as_deref())
            .unwrap_or(&self.subregion)
    }

    /// Directory levels below the scenario's `opendss` folder.
    pub fn model_levels(&self) -> Vec<&str> {
        let mut levels = Vec::new();
        if let Some(substation) = &self.substation {
            levels.push(substation.as_str());
            if let Some(feeder) = &self.feeder {
                levels.push(feeder.as_str());
            }
        }
        levels
    }
}
