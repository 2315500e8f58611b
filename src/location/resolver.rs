use log::{error, info, warn};

use super::geocoder::Geocoder;
use super::{Coordinates, FALLBACK};
use crate::config::settings::{LocationConfig, LocationMode};

/// Works through the sources for the configured mode and settles on the
/// first usable answer, or [`FALLBACK`] once they're exhausted.
///
/// * auto: IP geolocation
/// * manual: the configured coordinates, then a ZIP/region lookup
pub fn resolve(config: &LocationConfig, geocoder: &dyn Geocoder) -> Coordinates {
    info!("Updating location ({:?} mode)...", config.mode);
    let found = match config.mode {
        LocationMode::Auto => from_ip(geocoder),
        LocationMode::Manual => from_manual(config).or_else(|| from_zip(config, geocoder)),
    };

    match found {
        Some(coords) => {
            info!("Location: {}", coords);
            coords
        }
        None => {
            warn!("No location source succeeded. Using fallback {}", FALLBACK);
            FALLBACK
        }
    }
}

fn from_ip(geocoder: &dyn Geocoder) -> Option<Coordinates> {
    match geocoder.locate_ip() {
        Ok(Some(coords)) if coords.is_valid() => Some(coords),
        Ok(Some(coords)) => {
            warn!("IP geolocation returned out-of-range {}", coords);
            None
        }
        Ok(None) => {
            warn!("Automatic location failed.");
            None
        }
        Err(e) => {
            error!("Error fetching automatic location: {:#}", e);
            None
        }
    }
}

fn from_manual(config: &LocationConfig) -> Option<Coordinates> {
    let coords = Coordinates::new(config.latitude, config.longitude);
    if coords.is_valid() {
        Some(coords)
    } else {
        warn!("Manual coordinates {} are not usable", coords);
        None
    }
}

fn from_zip(config: &LocationConfig, geocoder: &dyn Geocoder) -> Option<Coordinates> {
    let zip = config.zip.trim();
    if zip.is_empty() {
        info!("No valid coordinates or ZIP code provided.");
        return None;
    }
    let region = config.region.trim();
    let query = if region.is_empty() {
        zip.to_string()
    } else {
        format!("{}, {}", zip, region)
    };

    info!("Fetching location for query: {}", query);
    match geocoder.lookup(&query) {
        Ok(Some(coords)) if coords.is_valid() => Some(coords),
        Ok(_) => {
            warn!("Location lookup for '{}' found nothing usable.", query);
            None
        }
        Err(e) => {
            error!("Error fetching location for query '{}': {:#}", query, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockGeocoder {
        ip: Option<Coordinates>,
        place: Option<Coordinates>,
        fail: bool,
        queries: RefCell<Vec<String>>,
    }

    impl Geocoder for MockGeocoder {
        fn locate_ip(&self) -> Result<Option<Coordinates>> {
            if self.fail {
                return Err(anyhow!("network down"));
            }
            Ok(self.ip)
        }

        fn lookup(&self, query: &str) -> Result<Option<Coordinates>> {
            self.queries.borrow_mut().push(query.to_string());
            if self.fail {
                return Err(anyhow!("network down"));
            }
            Ok(self.place)
        }
    }

    fn manual(lat: f64, lng: f64, zip: &str, region: &str) -> LocationConfig {
        LocationConfig {
            mode: LocationMode::Manual,
            latitude: lat,
            longitude: lng,
            zip: zip.to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn auto_mode_uses_ip_lookup() {
        let geo = MockGeocoder {
            ip: Some(Coordinates::new(51.5, -0.12)),
            ..Default::default()
        };
        let config = LocationConfig::default();
        assert_eq!(resolve(&config, &geo), Coordinates::new(51.5, -0.12));
    }

    #[test]
    fn auto_mode_falls_back_on_error_or_no_result() {
        let failing = MockGeocoder {
            fail: true,
            ..Default::default()
        };
        let empty = MockGeocoder::default();
        let config = LocationConfig::default();
        assert_eq!(resolve(&config, &failing), FALLBACK);
        assert_eq!(resolve(&config, &empty), FALLBACK);
    }

    #[test]
    fn manual_coordinates_win_over_zip() {
        let geo = MockGeocoder {
            place: Some(Coordinates::new(1.0, 1.0)),
            ..Default::default()
        };
        let config = manual(33.69, 73.06, "10001", "USA");
        assert_eq!(resolve(&config, &geo), Coordinates::new(33.69, 73.06));
        assert!(geo.queries.borrow().is_empty());
    }

    #[test]
    fn bad_coordinates_fall_through_to_zip_query() {
        let geo = MockGeocoder {
            place: Some(Coordinates::new(40.75, -73.99)),
            ..Default::default()
        };
        let config = manual(f64::NAN, 200.0, " 10001 ", "USA");
        assert_eq!(resolve(&config, &geo), Coordinates::new(40.75, -73.99));
        assert_eq!(geo.queries.borrow().as_slice(), ["10001, USA"]);

        let no_region = manual(999.0, 0.0, "10001", "");
        resolve(&no_region, &geo);
        assert_eq!(geo.queries.borrow().last().unwrap(), "10001");
    }

    #[test]
    fn exhausted_chain_returns_mecca() {
        let geo = MockGeocoder {
            fail: true,
            ..Default::default()
        };
        assert_eq!(resolve(&manual(999.0, 0.0, "", "USA"), &geo), FALLBACK);
        assert_eq!(resolve(&manual(999.0, 0.0, "10001", "USA"), &geo), FALLBACK);
        assert_eq!(FALLBACK, Coordinates::new(21.3891, 39.8579));
    }
}
