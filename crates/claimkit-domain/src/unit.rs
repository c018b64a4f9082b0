//! Amount units

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of an amount claim, from a closed vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AmountUnit {
    /// Dimensionless count
    None,
    /// Unit described elsewhere (by a meta claim)
    Custom,
    /// Ratio between two quantities of the same dimension
    Ratio,
    /// Kilogram
    Kilogram,
    /// Kilogram per kilogram
    KilogramPerKilogram,
    /// Kilogram per cubic metre
    KilogramPerCubicMetre,
    /// Metre
    Metre,
    /// Square metre
    SquareMetre,
    /// Metre per second
    MetrePerSecond,
    /// Volt
    Volt,
    /// Watt
    Watt,
    /// Pascal
    Pascal,
    /// Coulomb
    Coulomb,
    /// Joule
    Joule,
    /// Degree Celsius
    Celsius,
    /// Radian
    Radian,
    /// Hertz
    Hertz,
    /// US dollar
    Dollar,
    /// Byte
    Byte,
    /// Pixel
    Pixel,
    /// Second
    Second,
}

impl AmountUnit {
    /// Canonical symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            AmountUnit::None => "1",
            AmountUnit::Custom => "@",
            AmountUnit::Ratio => "/",
            AmountUnit::Kilogram => "kg",
            AmountUnit::KilogramPerKilogram => "kg/kg",
            AmountUnit::KilogramPerCubicMetre => "kg/m³",
            AmountUnit::Metre => "m",
            AmountUnit::SquareMetre => "m²",
            AmountUnit::MetrePerSecond => "m/s",
            AmountUnit::Volt => "V",
            AmountUnit::Watt => "W",
            AmountUnit::Pascal => "Pa",
            AmountUnit::Coulomb => "C",
            AmountUnit::Joule => "J",
            AmountUnit::Celsius => "°C",
            AmountUnit::Radian => "rad",
            AmountUnit::Hertz => "Hz",
            AmountUnit::Dollar => "$",
            AmountUnit::Byte => "B",
            AmountUnit::Pixel => "px",
            AmountUnit::Second => "s",
        }
    }

    /// Parse a unit symbol; canonical symbols and a few ASCII aliases are accepted
    pub fn parse(s: &str) -> Option<Self> {
        let unit = match s.trim() {
            "1" | "none" => AmountUnit::None,
            "@" | "custom" => AmountUnit::Custom,
            "/" | "ratio" => AmountUnit::Ratio,
            "kg" => AmountUnit::Kilogram,
            "kg/kg" => AmountUnit::KilogramPerKilogram,
            "kg/m³" | "kg/m3" => AmountUnit::KilogramPerCubicMetre,
            "m" => AmountUnit::Metre,
            "m²" | "m2" => AmountUnit::SquareMetre,
            "m/s" => AmountUnit::MetrePerSecond,
            "V" => AmountUnit::Volt,
            "W" => AmountUnit::Watt,
            "Pa" => AmountUnit::Pascal,
            "C" => AmountUnit::Coulomb,
            "J" => AmountUnit::Joule,
            "°C" | "degC" => AmountUnit::Celsius,
            "rad" => AmountUnit::Radian,
            "Hz" => AmountUnit::Hertz,
            "$" | "usd" => AmountUnit::Dollar,
            "B" => AmountUnit::Byte,
            "px" => AmountUnit::Pixel,
            "s" => AmountUnit::Second,
            _ => return None,
        };
        Some(unit)
    }
}

impl std::str::FromStr for AmountUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnknownUnit(s.to_string()))
    }
}

impl TryFrom<String> for AmountUnit {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AmountUnit> for String {
    fn from(unit: AmountUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
