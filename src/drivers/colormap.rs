use std::fmt;
use std::str::FromStr;
use once_cell::sync::Lazy;
use crate::drivers::SpectrogramError;
/// Scalar to colour strategy used for every non-marker pixel.
pub trait Colormap {
    /// `value` is expected in `[0, 1]`; anything outside is clamped.
    fn evaluate(&self, value: f64) -> [u8; 3];
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Terrain,
}
type Stop = (f64, [u8; 3]);
const LUT_SIZE: usize = 256;
const VIRIDIS_STOPS: &[Stop] = &[
    (0.0, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.5, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.0, [253, 231, 37]),
];
const PLASMA_STOPS: &[Stop] = &[
    (0.0, [13, 8, 135]),
    (0.25, [126, 3, 168]),
    (0.5, [204, 71, 120]),
    (0.75, [248, 149, 64]),
    (1.0, [240, 249, 33]),
];
const INFERNO_STOPS: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [87, 16, 110]),
    (0.5, [188, 55, 84]),
    (0.75, [249, 142, 9]),
    (1.0, [252, 255, 164]),
];
const MAGMA_STOPS: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [81, 18, 124]),
    (0.5, [183, 55, 121]),
    (0.75, [252, 137, 97]),
    (1.0, [252, 253, 191]),
];
const TERRAIN_STOPS: &[Stop] = &[
    (0.0, [51, 51, 153]),
    (0.15, [0, 153, 255]),
    (0.25, [0, 204, 102]),
    (0.5, [255, 255, 153]),
    (0.75, [128, 92, 84]),
    (1.0, [255, 255, 255]),
];
static VIRIDIS: Lazy<Vec<[u8; 3]>> = Lazy::new(|| build_lut(VIRIDIS_STOPS));
static PLASMA: Lazy<Vec<[u8; 3]>> = Lazy::new(|| build_lut(PLASMA_STOPS));
static INFERNO: Lazy<Vec<[u8; 3]>> = Lazy::new(|| build_lut(INFERNO_STOPS));
static MAGMA: Lazy<Vec<[u8; 3]>> = Lazy::new(|| build_lut(MAGMA_STOPS));
static TERRAIN: Lazy<Vec<[u8; 3]>> = Lazy::new(|| build_lut(TERRAIN_STOPS));
impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Viridis,
        Palette::Plasma,
        Palette::Inferno,
        Palette::Magma,
        Palette::Terrain,
    ];
    pub fn name(&self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Plasma => "plasma",
            Palette::Inferno => "inferno",
            Palette::Magma => "magma",
            Palette::Terrain => "terrain",
        }
    }
    fn lut(&self) -> &'static [[u8; 3]] {
        match self {
            Palette::Viridis => VIRIDIS.as_slice(),
            Palette::Plasma => PLASMA.as_slice(),
            Palette::Inferno => INFERNO.as_slice(),
            Palette::Magma => MAGMA.as_slice(),
            Palette::Terrain => TERRAIN.as_slice(),
        }
    }
}
impl Colormap for Palette {
    fn evaluate(&self, value: f64) -> [u8; 3] {
        let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let idx = (v * (LUT_SIZE - 1) as f64).round() as usize;
        self.lut()[idx.min(LUT_SIZE - 1)]
    }
}
impl FromStr for Palette {
    type Err = SpectrogramError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Palette::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| SpectrogramError::UnknownColormap(s.to_owned()))
    }
}
impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
fn build_lut(stops: &[Stop]) -> Vec<[u8; 3]> {
    (0..LUT_SIZE)
        .map(|i| interpolate(stops, i as f64 / (LUT_SIZE - 1) as f64))
        .collect()
}
fn interpolate(stops: &[Stop], t: f64) -> [u8; 3] {
    let upper = stops
        .iter()
        .position(|(pos, _)| *pos >= t)
        .unwrap_or(stops.len() - 1);
    if upper == 0 {
        return stops[0].1;
    }
    let (p0, c0) = stops[upper - 1];
    let (p1, c1) = stops[upper];
    let frac = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
    let mut out = [0u8; 3];
    for (channel, slot) in out.iter_mut().enumerate() {
        let a = c0[channel] as f64;
        let b = c1[channel] as f64;
        *slot = (a + (b - a) * frac).round().clamp(0.0, 255.0) as u8;
    }
    out
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn endpoints_match_stops() {
        assert_eq!(Palette::Viridis.evaluate(0.0), [68, 1, 84]);
        assert_eq!(Palette::Viridis.evaluate(1.0), [253, 231, 37]);
        assert_eq!(Palette::Terrain.evaluate(1.0), [255, 255, 255]);
    }
    #[test]
    fn out_of_range_values_are_clamped() {
        for palette in Palette::ALL {
            assert_eq!(palette.evaluate(-3.0), palette.evaluate(0.0));
            assert_eq!(palette.evaluate(7.0), palette.evaluate(1.0));
            assert_eq!(palette.evaluate(f64::NAN), palette.evaluate(0.0));
        }
    }
    #[test]
    fn parses_known_names_only() {
        assert_eq!("Magma".parse::<Palette>().unwrap(), Palette::Magma);
        assert_eq!(" terrain ".parse::<Palette>().unwrap(), Palette::Terrain);
        assert!(matches!(
            "jet".parse::<Palette>(),
            Err(SpectrogramError::UnknownColormap(_))
        ));
    }
}
