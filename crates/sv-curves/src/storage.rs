//! Flywheel energy storage sizing.

use sv_core::Real;
use sv_core::constants::SECONDS_PER_HOUR;

/// Specific energy of commercial flywheel units, MJ/kg.
const FLYWHEEL_SPECIFIC_ENERGY: [(Real, Real); 3] = [
    // (stored MJ, unit mass kg)
    (115.2, 4536.0),
    (66.0, 5103.0),
    (360.0, 8600.0),
];

/// Mean specific energy over the reference flywheel units, MJ/kg.
pub fn specific_energy() -> Real {
    let sum: Real = FLYWHEEL_SPECIFIC_ENERGY
        .iter()
        .map(|(mj, kg)| mj / kg)
        .sum();
    sum / FLYWHEEL_SPECIFIC_ENERGY.len() as Real
}

/// Mass in tonnes of a flywheel bank storing `capacity_mj`.
pub fn storage_mass(capacity_mj: Real) -> Real {
    capacity_mj / specific_energy() / 1000.0
}

/// Energy in MJ delivered by `power_kw` sustained for `hours`.
pub fn energy_from_power(power_kw: Real, hours: Real) -> Real {
    power_kw * 1000.0 * hours * SECONDS_PER_HOUR / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_masses() {
        assert!((storage_mass(100.0) - 3.741_07).abs() < 1e-4);
        assert!((storage_mass(360.0) - 13.467_87).abs() < 1e-4);
        assert_eq!(storage_mass(0.0), 0.0);
    }

    #[test]
    fn mass_scales_linearly() {
        let one = storage_mass(50.0);
        assert!((storage_mass(150.0) - 3.0 * one).abs() < 1e-12);
    }

    #[test]
    fn one_kw_hour() {
        assert!((energy_from_power(1.0, 1.0) - 3.6).abs() < 1e-12);
        assert!((energy_from_power(50.0, 2.0) - 360.0).abs() < 1e-9);
    }
}
