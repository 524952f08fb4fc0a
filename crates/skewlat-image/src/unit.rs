use std::fmt;

/// A physical unit raised to an integer power, e.g. `m` or `m^-1`.
///
/// Spectra carry the reciprocal of the lateral unit of the image they were
/// computed from, so the power is tracked explicitly.
///
/// # Examples
///
/// ```
/// use skewlat_image::Unit;
///
/// let metre = Unit::new("m");
/// let inverse = metre.powi(-1);
///
/// assert_eq!(inverse.to_string(), "m^-1");
/// assert_eq!(inverse.powi(-1), metre);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unit {
    /// Base unit symbol. Empty for dimensionless quantities.
    pub symbol: String,
    /// Power the base unit is raised to.
    pub power: i32,
}

impl Unit {
    /// Create a unit with power one.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            power: 1,
        }
    }

    /// Return the unit raised to the given power.
    pub fn powi(&self, power: i32) -> Self {
        Self {
            symbol: self.symbol.clone(),
            power: self.power * power,
        }
    }

    /// Whether the unit carries no symbol.
    pub fn is_dimensionless(&self) -> bool {
        self.symbol.is_empty() || self.power == 0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return Ok(());
        }
        match self.power {
            1 => write!(f, "{}", self.symbol),
            p => write!(f, "{}^{}", self.symbol, p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Unit;

    #[test]
    fn unit_display() {
        assert_eq!(Unit::new("m").to_string(), "m");
        assert_eq!(Unit::new("m").powi(-1).to_string(), "m^-1");
        assert_eq!(Unit::default().to_string(), "");
    }

    #[test]
    fn unit_power_roundtrip() {
        let u = Unit::new("nm").powi(-1).powi(-1);
        assert_eq!(u, Unit::new("nm"));
    }
}
