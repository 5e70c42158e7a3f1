//! Geographic coordinate type and geodesy helpers.
//!
//! `GeoPoint` is double precision: taxi separation works at the metre scale
//! and headings between nodes a few tens of metres apart must stay stable.

/// WGS-84 semi-major axis, metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 first eccentricity squared.
const WGS84_E2: f64 = 6.694_379_990_14e-3;
/// Mean Earth radius for great-circle work, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate with elevation.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat:    f64,
    pub lon:    f64,
    pub elev_m: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, elev_m: 0.0 }
    }

    #[inline]
    pub fn with_elevation(lat: f64, lon: f64, elev_m: f64) -> Self {
        Self { lat, lon, elev_m }
    }

    /// Haversine great-circle distance in metres (elevation ignored).
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial true course from `self` towards `other`, degrees in `[0, 360)`.
    pub fn course_deg(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        y.atan2(x).to_degrees().rem_euclid(360.0)
    }

    /// Earth-centred, earth-fixed cartesian position in metres.
    pub fn to_ecef(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let n = WGS84_A / (1.0 - WGS84_E2 * lat.sin().powi(2)).sqrt();
        [
            (n + self.elev_m) * lat.cos() * lon.cos(),
            (n + self.elev_m) * lat.cos() * lon.sin(),
            (n * (1.0 - WGS84_E2) + self.elev_m) * lat.sin(),
        ]
    }

    /// Straight-line (chord) distance between the ECEF positions, metres.
    pub fn ecef_distance_m(self, other: GeoPoint) -> f64 {
        let a = self.to_ecef();
        let b = other.to_ecef();
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    }
}

/// Smallest absolute difference between two headings, degrees in `[0, 180]`.
pub fn angle_between_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 { 360.0 - diff } else { diff }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
