//! Coordinates on the Earth's surface, and the crude geometry used to scatter synthetic people
//! around a country.

#[macro_use]
extern crate anyhow;

pub use crate::gps::LonLat;
pub use crate::scatter::{half_widths, scatter, LongitudeModel};

mod gps;
mod scatter;

/// Length of one degree of latitude, assumed constant everywhere.
pub const KM_PER_DEGREE_LATITUDE: f64 = 111.0;
/// WGS84 equatorial radius. The Earth is treated as a perfect sphere of this radius.
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;
