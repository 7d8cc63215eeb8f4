//! Area, depth and tonnage conversions for hot-mix asphalt.

use serde::Serialize;

use crate::util::finite_or_zero;

/// Standard mix density in pounds per cubic foot.
pub const DEFAULT_DENSITY_PCF: f64 = 145.0;

const INCHES_PER_FOOT: f64 = 12.0;
const POUNDS_PER_TON: f64 = 2000.0;

/// US tons of mix needed to cover `area` square feet at `depth_inches`.
///
/// Returns 0 when depth or density is zero or negative.
pub fn tons_from_area(area: f64, depth_inches: f64, density_pcf: f64) -> f64 {
    let (area, depth, density) = (
        finite_or_zero(area),
        finite_or_zero(depth_inches),
        finite_or_zero(density_pcf),
    );
    if depth <= 0.0 || density <= 0.0 {
        return 0.0;
    }
    finite_or_zero((area * depth * density) / (INCHES_PER_FOOT * POUNDS_PER_TON))
}

/// Square feet covered by `tons` of mix at `depth_inches`.
///
/// The inverse of [`tons_from_area`]; zero depth or density yields 0.
pub fn area_from_tons(tons: f64, depth_inches: f64, density_pcf: f64) -> f64 {
    let (tons, depth, density) = (
        finite_or_zero(tons),
        finite_or_zero(depth_inches),
        finite_or_zero(density_pcf),
    );
    if depth <= 0.0 || density <= 0.0 {
        return 0.0;
    }
    finite_or_zero((tons * POUNDS_PER_TON * INCHES_PER_FOOT) / (depth * density))
}

/// An asphalt mix offered in the mix calculator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AsphaltMix {
    pub name: &'static str,
    pub density_pcf: f64,
    pub description: &'static str,
}

pub const MIXES: &[AsphaltMix] = &[
    AsphaltMix {
        name: "Standard Mix",
        density_pcf: DEFAULT_DENSITY_PCF,
        description: "General purpose dense-graded hot mix",
    },
    AsphaltMix {
        name: "Surface Course",
        density_pcf: 148.0,
        description: "Fine 9.5mm top course",
    },
    AsphaltMix {
        name: "Binder Course",
        density_pcf: 146.0,
        description: "Intermediate 19mm layer",
    },
    AsphaltMix {
        name: "Base Course",
        density_pcf: 147.0,
        description: "Coarse 25mm structural layer",
    },
    AsphaltMix {
        name: "Porous Mix",
        density_pcf: 140.0,
        description: "Open-graded drainage mix",
    },
    AsphaltMix {
        name: "Cold Patch",
        density_pcf: 142.0,
        description: "Stockpiled repair mix",
    },
];

pub fn default_mix() -> &'static AsphaltMix {
    &MIXES[0]
}

/// Case-insensitive lookup by mix name.
pub fn find_mix(name: &str) -> Option<&'static AsphaltMix> {
    let needle = name.trim();
    MIXES
        .iter()
        .find(|mix| mix.name.eq_ignore_ascii_case(needle))
}

impl AsphaltMix {
    pub fn tons_for(&self, area: f64, depth_inches: f64) -> f64 {
        tons_from_area(area, depth_inches, self.density_pcf)
    }

    pub fn area_for(&self, tons: f64, depth_inches: f64) -> f64 {
        area_from_tons(tons, depth_inches, self.density_pcf)
    }
}
