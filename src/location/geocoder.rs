use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::time::Duration;

use super::Coordinates;

const IPINFO_URL: &str = "https://ipinfo.io/json";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// A source of coordinates. `Ok(None)` means the provider answered but had
/// no match.
pub trait Geocoder {
    /// Position of this machine, judged from its public IP.
    fn locate_ip(&self) -> Result<Option<Coordinates>>;

    /// Position of a free-text place query such as "10001, USA".
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct IpInfo {
    /// "lat,lng"
    loc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// ipinfo.io for IP lookups, OpenStreetMap Nominatim for place queries.
pub struct HttpGeocoder {
    client: reqwest::blocking::Client,
}

impl HttpGeocoder {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("adhaan/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;
        Ok(Self { client })
    }
}

impl Geocoder for HttpGeocoder {
    fn locate_ip(&self) -> Result<Option<Coordinates>> {
        let info: IpInfo = self
            .client
            .get(IPINFO_URL)
            .send()
            .context("GET ipinfo.io")?
            .error_for_status()?
            .json()
            .context("Decoding ipinfo.io response")?;

        info.loc.as_deref().map(parse_loc).transpose()
    }

    fn lookup(&self, query: &str) -> Result<Option<Coordinates>> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .with_context(|| format!("GET nominatim for '{}'", query))?
            .error_for_status()?
            .json()
            .context("Decoding nominatim response")?;

        match places.first() {
            None => Ok(None),
            Some(place) => {
                let latitude: f64 = place.lat.parse()?;
                let longitude: f64 = place.lon.parse()?;
                Ok(Some(Coordinates::new(latitude, longitude)))
            }
        }
    }
}

fn parse_loc(loc: &str) -> Result<Coordinates> {
    let (lat, lng) = loc
        .split_once(',')
        .ok_or_else(|| anyhow!("Malformed loc '{}'", loc))?;
    Ok(Coordinates::new(lat.trim().parse()?, lng.trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipinfo_loc() {
        let c = parse_loc("40.7143,-74.0060").unwrap();
        assert_eq!(c, Coordinates::new(40.7143, -74.006));
        assert!(parse_loc("40.7143").is_err());
        assert!(parse_loc("north,west").is_err());
    }
}
