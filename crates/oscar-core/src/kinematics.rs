use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Energy-momentum four-vector in GeV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    pub p0: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

impl FourMomentum {
    pub fn new(p0: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { p0, px, py, pz }
    }

    /// `p0² − |p|²`.  May be negative for off-shell or rounded inputs.
    pub fn mass_squared(&self) -> f64 {
        invariant_mass_squared(self.p0, self.px, self.py, self.pz)
    }

    pub fn mass(&self) -> f64 {
        invariant_mass(self.p0, self.px, self.py, self.pz)
    }

    pub fn rapidity(&self) -> Option<f64> {
        rapidity(self.p0, self.pz)
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum {
            p0: self.p0 + rhs.p0,
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
        }
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: FourMomentum) {
        *self = *self + rhs;
    }
}

/// Longitudinal rapidity `y = ½ ln((p0 + pz) / (p0 − pz))`.
///
/// Returns `None` when the logarithm's argument is not strictly positive
/// or the result is not finite (e.g. `p0 == pz`).
pub fn rapidity(p0: f64, pz: f64) -> Option<f64> {
    let ratio = (p0 + pz) / (p0 - pz);
    if ratio.is_nan() || ratio <= 0.0 {
        return None;
    }
    let y = 0.5 * ratio.ln();
    y.is_finite().then_some(y)
}

/// Raw invariant mass squared `p0² − (px² + py² + pz²)`.
pub fn invariant_mass_squared(p0: f64, px: f64, py: f64, pz: f64) -> f64 {
    p0 * p0 - (px * px + py * py + pz * pz)
}

/// Invariant mass `√max(0, m²)`.  Space-like four-vectors map to `0`.
pub fn invariant_mass(p0: f64, px: f64, py: f64, pz: f64) -> f64 {
    invariant_mass_squared(p0, px, py, pz).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapidity_at_rest_is_zero() {
        assert_eq!(rapidity(1.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_rapidity_formula() {
        let y = rapidity(2.0, 1.0).unwrap();
        assert!((y - 0.5 * 3.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_rapidity_is_odd_in_pz() {
        let a = rapidity(5.0, 2.0).unwrap();
        let b = rapidity(5.0, -2.0).unwrap();
        assert!((a + b).abs() < 1e-12);
    }

    #[test]
    fn test_rapidity_light_cone_is_none() {
        assert_eq!(rapidity(1.0, 1.0), None);
        assert_eq!(rapidity(1.0, -1.0), None);
        assert_eq!(rapidity(0.0, 0.0), None);
    }

    #[test]
    fn test_mass_squared_raw() {
        assert!((invariant_mass_squared(1.0, 0.6, 0.0, 0.0) - 0.64).abs() < 1e-12);
        assert!(invariant_mass_squared(1.0, 2.0, 0.0, 0.0) < 0.0);
    }

    #[test]
    fn test_mass_clips_space_like_to_zero() {
        assert!((invariant_mass(1.0, 0.6, 0.0, 0.0) - 0.8).abs() < 1e-12);
        assert_eq!(invariant_mass(1.0, 2.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_four_momentum_sum() {
        let mut a = FourMomentum::new(1.0, 0.1, 0.1, 0.1);
        a += FourMomentum::new(0.9, -0.1, -0.1, -0.1);
        assert!((a.p0 - 1.9).abs() < 1e-12);
        assert!(a.px.abs() < 1e-12);
        assert!((a.mass() - 1.9).abs() < 1e-12);
        assert_eq!(a.rapidity(), Some(0.0));
    }
}
