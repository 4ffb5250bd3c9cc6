use std::fmt;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// The source data lists latitude first, so this is often more natural to call.
    pub fn from_lat_lon(lat: f64, lon: f64) -> LonLat {
        LonLat::new(lon, lat)
    }

    pub fn offset(self, d_lon: f64, d_lat: f64) -> LonLat {
        LonLat::new(self.longitude + d_lon, self.latitude + d_lat)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}
