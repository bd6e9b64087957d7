// tv-core/src/units.rs

use crate::numeric::Centivolts;
use uom::si::f64::ElectricPotential as UomElectricPotential;

pub type Voltage = UomElectricPotential;

#[inline]
pub fn cv(v: Centivolts) -> Voltage {
    use uom::si::electric_potential::centivolt;
    Voltage::new::<centivolt>(v as f64)
}

/// Value in volts, for display.
#[inline]
pub fn as_volts(v: Voltage) -> f64 {
    use uom::si::electric_potential::volt;
    v.get::<volt>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centivolts_to_volts() {
        assert!((as_volts(cv(550)) - 5.5).abs() < 1e-12);
        assert!((as_volts(cv(1200)) - 12.0).abs() < 1e-12);
        assert_eq!(as_volts(cv(0)), 0.0);
    }
}
