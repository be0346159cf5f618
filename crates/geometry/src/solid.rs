//! Axis-aligned box solids

// crate modules
use crate::error::{Error, Result};
use crate::units::SURFACE_TOLERANCE;

// foiltools modules
use foiltools_format::f;

// external crates
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Box shape defined by its half-lengths
///
/// The box is centred on its own origin, so a placement only ever needs a
/// translation. No rotations are used anywhere in the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSolid {
    /// Name of the solid
    pub name: String,
    /// Half-lengths in x, y and z
    pub half: Vector3<f64>,
}

impl BoxSolid {
    /// Create a box from its half-lengths
    ///
    /// Every half-length must be finite and strictly positive.
    ///
    /// ```rust
    /// # use foiltools_geometry::BoxSolid;
    /// # use foiltools_geometry::units::{cm, um};
    /// let foil = BoxSolid::new("foilAl", 6.0 * cm, 6.0 * cm, 7.5 * um).unwrap();
    /// assert!(BoxSolid::new("flat", 1.0, 1.0, 0.0).is_err());
    /// ```
    pub fn new(name: &str, half_x: f64, half_y: f64, half_z: f64) -> Result<Self> {
        let half = Vector3::new(half_x, half_y, half_z);
        if half.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(Error::InvalidConfig(f!(
                "box \"{name}\" has non-positive half-lengths {:?}",
                half.as_slice()
            )));
        }

        Ok(Self {
            name: name.to_string(),
            half,
        })
    }

    /// Full size of the box in x, y and z
    pub fn size(&self) -> Vector3<f64> {
        self.half * 2.0
    }

    /// Is the local point inside or on the surface of the box
    pub fn contains(&self, local: &Vector3<f64>) -> bool {
        local
            .iter()
            .zip(self.half.iter())
            .all(|(p, h)| p.abs() <= h + SURFACE_TOLERANCE)
    }

    /// Does this box, placed at `offset`, sit entirely inside `mother`
    ///
    /// The offset is relative to the centre of the mother.
    pub fn fits_inside(&self, offset: &Vector3<f64>, mother: &BoxSolid) -> bool {
        (0..3).all(|i| offset[i].abs() + self.half[i] <= mother.half[i] + SURFACE_TOLERANCE)
    }

    /// Do two placed boxes share any volume
    ///
    /// Boxes that only touch on a face do not overlap.
    pub fn overlaps(
        &self,
        offset: &Vector3<f64>,
        other: &BoxSolid,
        other_offset: &Vector3<f64>,
    ) -> bool {
        (0..3).all(|i| {
            (offset[i] - other_offset[i]).abs() < self.half[i] + other.half[i] - SURFACE_TOLERANCE
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{cm, um};

    fn foil(half_z: f64) -> BoxSolid {
        BoxSolid::new("foil", 6.0 * cm, 6.0 * cm, half_z).unwrap()
    }

    #[test]
    fn contains_includes_surface() {
        let solid = foil(7.5 * um);
        assert!(solid.contains(&Vector3::new(0.0, 0.0, 7.5 * um)));
        assert!(solid.contains(&Vector3::new(6.0 * cm, -6.0 * cm, -7.5 * um)));
        assert!(!solid.contains(&Vector3::new(0.0, 0.0, 7.6 * um)));
        assert!(!solid.contains(&Vector3::new(6.1 * cm, 0.0, 0.0)));
    }

    #[test]
    fn touching_faces_do_not_overlap() {
        let a = foil(5.0 * um);
        let b = foil(5.0 * um);
        let origin = Vector3::zeros();
        assert!(!a.overlaps(&origin, &b, &Vector3::new(0.0, 0.0, 10.0 * um)));
        assert!(a.overlaps(&origin, &b, &Vector3::new(0.0, 0.0, 9.0 * um)));
        assert!(!a.overlaps(&origin, &b, &Vector3::new(12.0 * cm, 0.0, 0.0)));
    }

    #[test]
    fn fits_inside_mother() {
        let mother = BoxSolid::new("envelope", 100.0 * cm, 100.0 * cm, 150.0 * cm).unwrap();
        let daughter = foil(50.0 * um);
        assert!(daughter.fits_inside(&Vector3::new(0.0, 0.0, 1.0 * cm), &mother));
        assert!(!daughter.fits_inside(&Vector3::new(95.0 * cm, 0.0, 0.0), &mother));
        assert_eq!(mother.size(), Vector3::new(200.0 * cm, 200.0 * cm, 300.0 * cm));
    }

    #[test]
    fn rejects_degenerate_boxes() {
        assert!(BoxSolid::new("nan", f64::NAN, 1.0, 1.0).is_err());
        assert!(BoxSolid::new("negative", 1.0, -1.0, 1.0).is_err());
    }
}
