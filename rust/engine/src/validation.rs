// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room dimension policy checks.
//!
//! Validation never fails: it always produces a [`ValidationReport`] whose
//! messages name the violated bound, in width, length, height order.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RoomDimensions;

/// Inclusive range for one dimension, in feet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Policy bounds for room dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DimensionBounds {
    pub width: Range,
    pub length: Range,
    pub height: Range,
}

impl Default for DimensionBounds {
    fn default() -> Self {
        Self {
            width: Range::new(5.0, 50.0),
            length: Range::new(5.0, 50.0),
            height: Range::new(7.0, 20.0),
        }
    }
}

impl DimensionBounds {
    /// Check `dimensions` against these bounds.
    pub fn validate(&self, dimensions: &RoomDimensions) -> ValidationReport {
        let checks = [
            ("Width", dimensions.width, self.width),
            ("Length", dimensions.length, self.length),
            ("Height", dimensions.height, self.height),
        ];

        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, value, range)| !range.contains(*value))
            .map(|(name, _, range)| {
                format!("{} must be between {} and {} feet", name, range.min, range.max)
            })
            .collect();

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Outcome of a dimension check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Turn a failed report into [`Error::InvalidDimensions`].
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(Error::InvalidDimensions(self))
        }
    }
}

/// Validate against the default bounds (`5..=50` ft for width and length,
/// `7..=20` ft for height).
pub fn validate(dimensions: &RoomDimensions) -> ValidationReport {
    DimensionBounds::default().validate(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_whole_policy_box() {
        let corners = [5.0, 27.5, 50.0];
        let heights = [7.0, 13.0, 20.0];
        for &w in &corners {
            for &l in &corners {
                for &h in &heights {
                    let report = validate(&RoomDimensions::new(w, l, h));
                    assert!(report.is_valid, "{}x{}x{} rejected", w, l, h);
                    assert!(report.errors.is_empty());
                }
            }
        }
    }

    #[test]
    fn narrow_width_reports_only_width() {
        let report = validate(&RoomDimensions::new(4.0, 20.0, 8.0));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Width must be between 5 and 50 feet"]);
    }

    #[test]
    fn messages_name_the_bound_not_the_value() {
        let report = validate(&RoomDimensions::new(4.25, 20.0, 8.0));
        assert!(!report.errors[0].contains("4.25"));
    }

    #[test]
    fn errors_keep_width_length_height_order() {
        let report = validate(&RoomDimensions::new(60.0, 1.0, 25.0));
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].starts_with("Width"));
        assert!(report.errors[1].starts_with("Length"));
        assert!(report.errors[2].starts_with("Height must be between 7 and 20 feet"));
    }

    #[test]
    fn nan_is_rejected() {
        let report = validate(&RoomDimensions::new(10.0, 10.0, f64::NAN));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn custom_bounds() {
        let bounds = DimensionBounds {
            height: Range::new(8.0, 12.0),
            ..DimensionBounds::default()
        };
        let report = bounds.validate(&RoomDimensions::new(10.0, 10.0, 7.5));
        assert_eq!(report.errors, vec!["Height must be between 8 and 12 feet"]);
    }

    #[test]
    fn into_result_carries_report() {
        let err = validate(&RoomDimensions::new(4.0, 4.0, 8.0))
            .into_result()
            .unwrap_err();
        match err {
            Error::InvalidDimensions(report) => assert_eq!(report.errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(validate(&RoomDimensions::default()).into_result().is_ok());
    }
}
