//! Pick a random point "inside" a country, knowing only a representative center and the
//! country's total area.
//!
//! This is a deliberately crude approximation. The country is pretended to be a square of side
//! `sqrt(area)` kilometers centered on its representative point. Latitude is perturbed by up to
//! half that side, converted to degrees with a constant 111 km per degree. Longitude depends on
//! the chosen `LongitudeModel`.

use std::f64::consts::PI;
use std::str::FromStr;

use anyhow::Result;
use rand::Rng;
use rand_xorshift::XorShiftRng;

use crate::{LonLat, EARTH_RADIUS_METERS, KM_PER_DEGREE_LATITUDE};

/// How the east-west half-width of a country is turned into degrees of longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongitudeModel {
    /// `acos(180 * (side / 2) / PI / R)`, with the half-side in kilometers and R the Earth's
    /// radius in meters. This isn't dimensionally sound; it yields a half-width of roughly 1.57
    /// degrees for nearly every country. Kept so datasets match ones generated before the
    /// equirectangular model existed.
    Legacy,
    /// `(side / 2) / (111 * cos(latitude))`, the usual small-area equirectangular approximation.
    /// Undefined at the poles.
    Equirectangular,
}

impl FromStr for LongitudeModel {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<LongitudeModel> {
        match x {
            "legacy" => Ok(LongitudeModel::Legacy),
            "equirectangular" => Ok(LongitudeModel::Equirectangular),
            _ => bail!(
                "unknown longitude model {}; must be legacy or equirectangular",
                x
            ),
        }
    }
}

/// Returns the maximum (latitude, longitude) perturbation in degrees for a country of this area,
/// centered at `center`. Fails when the area is negative or not finite, or when the longitude
/// model can't express the half-width.
pub fn half_widths(center: LonLat, area_km2: f64, model: LongitudeModel) -> Result<(f64, f64)> {
    if !area_km2.is_finite() || area_km2 < 0.0 {
        bail!("area {} km^2 isn't a usable area", area_km2);
    }
    let half_side_km = area_km2.sqrt() / 2.0;
    let lat = half_side_km / KM_PER_DEGREE_LATITUDE;

    let lon = match model {
        LongitudeModel::Legacy => {
            let x = 180.0 * half_side_km / PI / EARTH_RADIUS_METERS;
            if !(-1.0..=1.0).contains(&x) {
                bail!(
                    "half-side of {} km puts acos({}) outside its domain",
                    half_side_km,
                    x
                );
            }
            x.acos()
        }
        LongitudeModel::Equirectangular => {
            let cos_lat = center.latitude.to_radians().cos();
            // Within about a meter of a pole, a degree of longitude has no meaningful length.
            if cos_lat < 1e-7 {
                bail!(
                    "can't convert a longitude half-width at latitude {}",
                    center.latitude
                );
            }
            half_side_km / (KM_PER_DEGREE_LATITUDE * cos_lat)
        }
    };
    Ok((lat, lon))
}

/// Picks a random point near `center`, bounded by the area of the country. Without an area, the
/// center is returned exactly. Errors come from `half_widths`, before any randomness is drawn.
pub fn scatter(
    center: LonLat,
    area_km2: Option<f64>,
    model: LongitudeModel,
    rng: &mut XorShiftRng,
) -> Result<LonLat> {
    let area = match area_km2 {
        Some(area) => area,
        None => {
            return Ok(center);
        }
    };
    let (max_lat, max_lon) = half_widths(center, area, model)?;
    let d_lat = rng.gen_range(-max_lat..=max_lat);
    let d_lon = rng.gen_range(-max_lon..=max_lon);
    Ok(center.offset(d_lon, d_lat))
}
