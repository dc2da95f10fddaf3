use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Minimal rectangle containing every extended coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    sw: Option<LatLng>,
    ne: Option<LatLng>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: LatLng) {
        match (self.sw, self.ne) {
            (Some(sw), Some(ne)) => {
                self.sw = Some(LatLng::new(sw.lat.min(point.lat), sw.lng.min(point.lng)));
                self.ne = Some(LatLng::new(ne.lat.max(point.lat), ne.lng.max(point.lng)));
            }
            _ => {
                self.sw = Some(point);
                self.ne = Some(point);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sw.is_none()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.sw
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.ne
    }

    pub fn contains(&self, point: LatLng) -> bool {
        match (self.sw, self.ne) {
            (Some(sw), Some(ne)) => {
                (sw.lat..=ne.lat).contains(&point.lat) && (sw.lng..=ne.lng).contains(&point.lng)
            }
            _ => false,
        }
    }
}

impl FromIterator<LatLng> for Bounds {
    fn from_iter<T: IntoIterator<Item = LatLng>>(iter: T) -> Self {
        let mut bounds = Bounds::new();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinates() {
        assert!(LatLng::new(37.56, 126.97).is_valid());
        assert!(!LatLng::new(f64::NAN, 126.97).is_valid());
        assert!(!LatLng::new(126.97, 37.56).is_valid());
        assert!(!LatLng::new(37.56, 181.0).is_valid());
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let points = [
            LatLng::new(37.5, 127.0),
            LatLng::new(37.7, 126.9),
            LatLng::new(37.6, 127.1),
        ];
        let bounds: Bounds = points.iter().copied().collect();

        assert_eq!(bounds.south_west(), Some(LatLng::new(37.5, 126.9)));
        assert_eq!(bounds.north_east(), Some(LatLng::new(37.7, 127.1)));
        assert!(points.iter().all(|p| bounds.contains(*p)));
        assert!(!bounds.contains(LatLng::new(38.0, 127.0)));
    }

    #[test]
    fn test_empty_bounds() {
        let bounds = Bounds::new();
        assert!(bounds.is_empty());
        assert!(!bounds.contains(LatLng::new(0.0, 0.0)));
    }
}
