use std::str::FromStr;

use anvilmap_geom::{Bounds, YRange};

use crate::config::ConfigError;

/// A `--from`/`--to` corner: `Y`, `X,Z` or `X,Y,Z` in absolute block coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    Y(i64),
    XZ(i64, i64),
    XYZ(i64, i64, i64),
}

impl FromStr for Corner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid coordinates {s:?}: {e}"))?;
        match values[..] {
            [y] => Ok(Corner::Y(y)),
            [x, z] => Ok(Corner::XZ(x, z)),
            [x, y, z] => Ok(Corner::XYZ(x, y, z)),
            _ => Err(format!("invalid coordinates {s:?}: expected Y, X,Z or X,Y,Z")),
        }
    }
}

/// Horizontal and vertical crop built from two corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crop {
    pub limits: Option<Bounds<i64>>,
    pub ylimits: YRange,
}

impl Crop {
    pub fn from_corners(from: Option<Corner>, to: Option<Corner>) -> Result<Crop, ConfigError> {
        let mismatch = || {
            ConfigError::Coordinates(
                "'from' and 'to' coordinates must be in the same format (Y, X,Z or X,Y,Z)".into(),
            )
        };
        let crop = match (from, to) {
            (None, None) => Crop::default(),
            (Some(Corner::Y(a)), Some(Corner::Y(b))) => Crop {
                limits: None,
                ylimits: YRange::new(a, b),
            },
            (Some(Corner::XZ(fx, fz)), Some(Corner::XZ(tx, tz))) => Crop {
                limits: Some(Bounds::from_corners((fx, fz), (tx, tz))),
                ylimits: YRange::FULL,
            },
            (Some(Corner::XYZ(fx, fy, fz)), Some(Corner::XYZ(tx, ty, tz))) => Crop {
                limits: Some(Bounds::from_corners((fx, fz), (tx, tz))),
                ylimits: YRange::new(fy, ty),
            },
            _ => return Err(mismatch()),
        };
        Ok(crop)
    }

    /// Human-readable summary for the startup log.
    pub fn describe(&self) -> Option<String> {
        match (&self.limits, self.ylimits.is_full()) {
            (None, true) => None,
            (None, false) => Some(format!(
                "Drawing from Y:{} to Y:{}",
                self.ylimits.min, self.ylimits.max
            )),
            (Some(l), true) => Some(format!(
                "Drawing from (X:{}, Z:{}) to (X:{}, Z:{})",
                l.min_x, l.min_z, l.max_x, l.max_z
            )),
            (Some(l), false) => Some(format!(
                "Drawing from (X:{}, Y:{}, Z:{}) to (X:{}, Y:{}, Z:{})",
                l.min_x, self.ylimits.min, l.min_z, l.max_x, self.ylimits.max, l.max_z
            )),
        }
    }
}
