//! N-way division table.

use heapless::Vec;

use crate::config::units::Degrees;
use crate::error::{ControllerError, Result};

/// Largest number of divisions a table holds.
pub const MAX_DIVISIONS: usize = 360;

/// Evenly spaced target angles and the selected entry.
///
/// A full-circle extent spaces `num_divs` entries over 360 degrees without
/// repeating the start; any other extent includes both end points.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionTable {
    num_divs: usize,
    start: Degrees,
    extent: Degrees,
    entries: Vec<Degrees, MAX_DIVISIONS>,
    selected: usize,
}

impl DivisionTable {
    /// Build a table of `num_divs` entries from `start` spanning `extent`.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidDivisionCount`] unless
    /// `2 <= num_divs <= MAX_DIVISIONS`, and
    /// [`ControllerError::AngleOutOfRange`] for a non-finite start or extent.
    pub fn new(num_divs: usize, start: Degrees, extent: Degrees) -> Result<Self> {
        if !(2..=MAX_DIVISIONS).contains(&num_divs) {
            return Err(ControllerError::InvalidDivisionCount(num_divs).into());
        }
        for angle in [start, extent] {
            if !angle.0.is_finite() {
                return Err(ControllerError::AngleOutOfRange(angle.0).into());
            }
        }

        let divisor = (if extent.0 == 360.0 { num_divs } else { num_divs - 1 }) as f64;

        let mut entries = Vec::new();
        for i in 0..num_divs {
            let angle = Degrees(i as f64 * extent.0 / divisor + start.0).normalized();
            entries
                .push(angle)
                .map_err(|_| ControllerError::InvalidDivisionCount(num_divs))?;
        }

        Ok(Self {
            num_divs,
            start,
            extent,
            entries,
            selected: 0,
        })
    }

    /// Table parameters `(num_divs, start, extent)`.
    #[inline]
    pub fn parameters(&self) -> (usize, Degrees, Degrees) {
        (self.num_divs, self.start, self.extent)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_divs
    }

    /// Always false; a table holds at least two entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All entry angles in `[0, 360)`.
    #[inline]
    pub fn entries(&self) -> &[Degrees] {
        &self.entries
    }

    /// Index of the selected entry.
    #[inline]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Angle of the selected entry.
    #[inline]
    pub fn selected_angle(&self) -> Degrees {
        self.entries[self.selected]
    }

    /// Entry position of raw operator input `index`.
    ///
    /// Accepts a float so the input can be validated here; it must be a
    /// whole number inside the table.
    pub fn checked_index(&self, index: f64) -> Result<usize> {
        let whole = libm::trunc(index) == index;
        if !whole || index < 0.0 || index >= self.num_divs as f64 {
            return Err(ControllerError::InvalidDivisionIndex {
                index,
                num_divs: self.num_divs,
            }
            .into());
        }
        Ok(index as usize)
    }

    /// Select entry `index`, validated as in [`checked_index`](Self::checked_index).
    pub fn select(&mut self, index: f64) -> Result<()> {
        self.selected = self.checked_index(index)?;
        Ok(())
    }
}

impl Default for DivisionTable {
    fn default() -> Self {
        let mut entries = Vec::new();
        let _ = entries.push(Degrees(0.0));
        let _ = entries.push(Degrees(180.0));
        Self {
            num_divs: 2,
            start: Degrees(0.0),
            extent: Degrees(360.0),
            entries,
            selected: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn angles(table: &DivisionTable) -> std::vec::Vec<f64> {
        table.entries().iter().map(|d| d.0).collect()
    }

    #[test]
    fn test_full_circle() {
        let table = DivisionTable::new(4, Degrees(0.0), Degrees(360.0)).unwrap();
        assert_eq!(angles(&table), [0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn test_partial_extent_includes_end() {
        let table = DivisionTable::new(4, Degrees(10.0), Degrees(90.0)).unwrap();
        assert_eq!(angles(&table), [10.0, 40.0, 70.0, 100.0]);
    }

    #[test]
    fn test_entries_wrap() {
        let table = DivisionTable::new(3, Degrees(300.0), Degrees(120.0)).unwrap();
        assert_eq!(angles(&table), [300.0, 0.0, 60.0]);

        let table = DivisionTable::new(2, Degrees(-90.0), Degrees(360.0)).unwrap();
        assert_eq!(angles(&table), [270.0, 90.0]);
    }

    #[test]
    fn test_default_matches_two_way_table() {
        let built = DivisionTable::new(2, Degrees(0.0), Degrees(360.0)).unwrap();
        assert_eq!(DivisionTable::default(), built);
    }

    #[test]
    fn test_invalid_count() {
        for n in [0, 1, MAX_DIVISIONS + 1] {
            assert_eq!(
                DivisionTable::new(n, Degrees(0.0), Degrees(360.0)),
                Err(Error::Controller(ControllerError::InvalidDivisionCount(n)))
            );
        }
        assert!(DivisionTable::new(MAX_DIVISIONS, Degrees(0.0), Degrees(360.0)).is_ok());
    }

    #[test]
    fn test_select() {
        let mut table = DivisionTable::new(6, Degrees(0.0), Degrees(360.0)).unwrap();
        table.select(4.0).unwrap();
        assert_eq!(table.selected(), 4);
        assert_eq!(table.selected_angle(), Degrees(240.0));

        for bad in [6.0, -1.0, 2.5, f64::NAN] {
            assert!(table.select(bad).is_err());
            assert_eq!(table.selected(), 4);
        }
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        for (start, extent) in [(f64::NAN, 360.0), (0.0, f64::INFINITY)] {
            assert!(matches!(
                DivisionTable::new(4, Degrees(start), Degrees(extent)),
                Err(Error::Controller(ControllerError::AngleOutOfRange(_)))
            ));
        }
    }
}
