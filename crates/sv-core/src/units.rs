// sv-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Force as UomForce, Length as UomLength, Mass as UomMass,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Mass = UomMass;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

/// Metric tonnes.
#[inline]
pub fn tonnes(v: f64) -> Mass {
    use uom::si::mass::ton;
    Mass::new::<ton>(v)
}

#[inline]
pub fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn as_tonnes(v: Mass) -> f64 {
    use uom::si::mass::ton;
    v.get::<ton>()
}

pub mod constants {
    /// Sea water density, kg/m^3
    pub const RHO_SEAWATER_KG_M3: f64 = 1026.0;
    /// Gravitational acceleration used by the regressions, m/s^2
    pub const G_MPS2: f64 = 9.81;
    /// Knots per m/s as used by the resistance regressions
    pub const KNOTS_PER_MPS: f64 = 1.944;
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    pub const HOURS_PER_DAY: f64 = 24.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_are_si() {
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(m2(400.0).value, 400.0);
        assert_eq!(newtons(1.5).value, 1.5);
    }

    #[test]
    fn tonnes_round_trip() {
        let w = tonnes(650.0);
        assert!((w.value - 650_000.0).abs() < 1e-6);
        assert!((as_tonnes(w) - 650.0).abs() < 1e-9);
    }
}
