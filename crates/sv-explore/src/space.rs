//! Design space: named variables with bounds.

use crate::error::{ExploreError, ExploreResult};
use serde::{Deserialize, Serialize};
use sv_core::Real;
use sv_pipeline::DesignVector;

/// Name of the optional flywheel capacity variable, MJ.
pub const STORAGE_VARIABLE: &str = "storage_mj";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub lower: Real,
    pub upper: Real,
}

impl Variable {
    pub fn new(name: impl Into<String>, lower: Real, upper: Real) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// Maps `unit` in [0, 1] onto the variable bounds.
    pub fn at(&self, unit: Real) -> Real {
        self.lower + unit * (self.upper - self.lower)
    }

    pub fn contains(&self, value: Real) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Whether the hull is described by ratios or absolute dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    Ratios,
    Dimensions,
}

impl SpaceKind {
    pub fn required(self) -> [&'static str; 4] {
        match self {
            SpaceKind::Ratios => ["cb", "lb", "bt", "tl"],
            SpaceKind::Dimensions => ["cb", "length_m", "beam_m", "draft_m"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpace {
    pub kind: SpaceKind,
    pub variables: Vec<Variable>,
}

impl DesignSpace {
    /// Ratio-defined hulls with flywheel storage.
    pub fn ratio_space() -> Self {
        Self {
            kind: SpaceKind::Ratios,
            variables: vec![
                Variable::new("cb", 0.31, 0.59),
                Variable::new("lb", 2.0, 7.0),
                Variable::new("bt", 0.5, 6.0),
                Variable::new("tl", 0.1, 0.2),
                Variable::new(STORAGE_VARIABLE, 0.0, 1000.0),
            ],
        }
    }

    /// Hulls defined by absolute dimensions with flywheel storage.
    pub fn dimension_space() -> Self {
        Self {
            kind: SpaceKind::Dimensions,
            variables: vec![
                Variable::new("cb", 0.31, 0.59),
                Variable::new("length_m", 25.0, 50.0),
                Variable::new("beam_m", 3.0, 12.0),
                Variable::new("draft_m", 2.0, 5.0),
                Variable::new(STORAGE_VARIABLE, 0.0, 1000.0),
            ],
        }
    }

    pub fn dimensions(&self) -> usize {
        self.variables.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    pub fn validate(&self) -> ExploreResult<()> {
        for (i, v) in self.variables.iter().enumerate() {
            if !(v.lower.is_finite() && v.upper.is_finite() && v.lower <= v.upper) {
                return Err(ExploreError::InvalidSpace {
                    what: format!("variable '{}' has invalid bounds", v.name),
                });
            }
            if self.variables[..i].iter().any(|other| other.name == v.name) {
                return Err(ExploreError::InvalidSpace {
                    what: format!("variable '{}' declared twice", v.name),
                });
            }
            let known = self.kind.required().contains(&v.name.as_str()) || v.name == STORAGE_VARIABLE;
            if !known {
                return Err(ExploreError::InvalidSpace {
                    what: format!("unknown variable '{}' for {:?} space", v.name, self.kind),
                });
            }
        }
        for name in self.kind.required() {
            if self.index_of(name).is_none() {
                return Err(ExploreError::InvalidSpace {
                    what: format!("missing variable '{name}'"),
                });
            }
        }
        Ok(())
    }

    /// Scales a point of the unit hypercube onto the variable bounds.
    pub fn scale(&self, unit: &[Real]) -> Vec<Real> {
        self.variables
            .iter()
            .zip(unit)
            .map(|(v, &u)| v.at(u))
            .collect()
    }

    /// Builds the design vector for `values` given in variable order.
    pub fn design_at(&self, values: &[Real]) -> ExploreResult<DesignVector> {
        if values.len() != self.variables.len() {
            return Err(ExploreError::InvalidSpace {
                what: format!(
                    "expected {} values, got {}",
                    self.variables.len(),
                    values.len()
                ),
            });
        }
        let get = |name: &str| -> ExploreResult<Real> {
            self.index_of(name)
                .map(|i| values[i])
                .ok_or_else(|| ExploreError::InvalidSpace {
                    what: format!("missing variable '{name}'"),
                })
        };
        let [a, b, c, d] = self.kind.required();
        let (cb, x, y, z) = (get(a)?, get(b)?, get(c)?, get(d)?);
        let design = match self.kind {
            SpaceKind::Ratios => DesignVector::from_ratios(cb, x, y, z),
            SpaceKind::Dimensions => DesignVector::from_dimensions(cb, x, y, z),
        };
        Ok(match self.index_of(STORAGE_VARIABLE) {
            Some(i) => design.with_storage(values[i]),
            None => design,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_pipeline::DesignInput;

    #[test]
    fn presets_are_valid() {
        DesignSpace::ratio_space().validate().unwrap();
        DesignSpace::dimension_space().validate().unwrap();
    }

    #[test]
    fn design_at_maps_named_variables() {
        let space = DesignSpace::dimension_space();
        let d = space.design_at(&[0.4, 30.0, 6.0, 3.0, 250.0]).unwrap();
        assert_eq!(d.cb, 0.4);
        assert_eq!(
            d.input,
            DesignInput::Dimensions {
                length_m: 30.0,
                beam_m: 6.0,
                draft_m: 3.0
            }
        );
        assert_eq!(d.storage_capacity_mj, Some(250.0));
    }

    #[test]
    fn variable_order_is_free() {
        let space = DesignSpace {
            kind: SpaceKind::Ratios,
            variables: vec![
                Variable::new("tl", 0.1, 0.2),
                Variable::new("cb", 0.3, 0.6),
                Variable::new("bt", 1.0, 3.0),
                Variable::new("lb", 2.0, 7.0),
            ],
        };
        space.validate().unwrap();
        let d = space.design_at(&[0.15, 0.4, 2.0, 4.0]).unwrap();
        assert_eq!(d, DesignVector::from_ratios(0.4, 4.0, 2.0, 0.15));
    }

    #[test]
    fn validation_errors() {
        let mut space = DesignSpace::ratio_space();
        space.variables.remove(1);
        assert!(space.validate().unwrap_err().to_string().contains("'lb'"));

        let mut space = DesignSpace::dimension_space();
        space.variables.push(Variable::new("cb", 0.3, 0.4));
        assert!(space.validate().unwrap_err().to_string().contains("twice"));

        let mut space = DesignSpace::dimension_space();
        space.variables[1].upper = 10.0;
        assert!(space.validate().is_err());

        let mut space = DesignSpace::dimension_space();
        space.variables.push(Variable::new("lb", 2.0, 4.0));
        assert!(space.validate().unwrap_err().to_string().contains("unknown"));
    }

    #[test]
    fn scale_hits_bounds() {
        let space = DesignSpace::dimension_space();
        let lo = space.scale(&[0.0; 5]);
        let hi = space.scale(&[1.0; 5]);
        assert_eq!(lo, [0.31, 25.0, 3.0, 2.0, 0.0]);
        assert_eq!(hi, [0.59, 50.0, 12.0, 5.0, 1000.0]);
    }
}
