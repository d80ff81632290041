//! Turns a [`Target`] into parameters the weather lookup can consume.
//!
//! `CurrentLocation` goes through the [`Geolocator`] capability; a named city
//! is just validated. No retries happen here: a geolocation failure is
//! forwarded verbatim to the controller as a fetch failure.

use async_trait::async_trait;
use ipgeolocate::{Locator, Service};
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::{FetchError, GeolocationError},
    model::{Coordinates, Target},
};

/// Parameters for one weather lookup: either a coordinate pair or a city
/// query string.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchParams {
    Coordinates(Coordinates),
    City(String),
}

/// The device geolocation capability.
///
/// Single-shot and asynchronous; implementations either yield coordinates or
/// fail with a [`GeolocationError`]. Kept as a trait so frontends and tests
/// can substitute their own capability.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// IP-based geolocation via the free IpApi service. No key required; the
/// accuracy is city-level, which is all the weather lookup needs.
#[derive(Debug, Clone, Default)]
pub struct IpApiGeolocator;

#[async_trait]
impl Geolocator for IpApiGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        // Empty IP means "geolocate the caller".
        let loc = Locator::get("", Service::IpApi).await.map_err(|e| {
            warn!(error = %e, "IP geolocation request failed");
            GeolocationError::Unavailable
        })?;

        // IpApi reports coordinates as strings.
        let latitude = loc.latitude.parse::<f64>();
        let longitude = loc.longitude.parse::<f64>();

        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => {
                debug!(latitude, longitude, city = %loc.city, "geolocation resolved");
                Ok(Coordinates { latitude, longitude })
            }
            _ => {
                warn!(
                    raw_lat = %loc.latitude,
                    raw_lon = %loc.longitude,
                    "IP geolocation returned unparseable coordinates"
                );
                Err(GeolocationError::Unavailable)
            }
        }
    }
}

/// Map a target to fetch parameters.
///
/// An empty (or whitespace-only) city name is rejected as
/// [`FetchError::InvalidTarget`] without touching the network; the
/// geolocator is only consulted for `CurrentLocation`.
pub async fn resolve(
    target: &Target,
    geolocator: &dyn Geolocator,
) -> Result<FetchParams, FetchError> {
    match target {
        Target::CurrentLocation => {
            let coords = geolocator.current_position().await?;
            Ok(FetchParams::Coordinates(coords))
        }
        Target::NamedCity(name) => {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(FetchError::InvalidTarget);
            }
            Ok(FetchParams::City(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingGeolocator {
        calls: AtomicUsize,
        fail: Option<GeolocationError>,
    }

    #[async_trait]
    impl Geolocator for CountingGeolocator {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail {
                Some(err) => Err(err),
                None => Ok(Coordinates { latitude: 48.85, longitude: 2.35 }),
            }
        }
    }

    #[tokio::test]
    async fn current_location_uses_geolocator() {
        let geo = CountingGeolocator::default();
        let params = resolve(&Target::CurrentLocation, &geo).await.unwrap();

        assert_eq!(
            params,
            FetchParams::Coordinates(Coordinates { latitude: 48.85, longitude: 2.35 })
        );
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn geolocation_failure_is_forwarded_verbatim() {
        let geo = CountingGeolocator { fail: Some(GeolocationError::Denied), ..Default::default() };
        let err = resolve(&Target::CurrentLocation, &geo).await.unwrap_err();

        assert_eq!(err, FetchError::Geolocation(GeolocationError::Denied));
    }

    #[tokio::test]
    async fn named_city_never_calls_the_geolocator() {
        let geo = CountingGeolocator::default();
        let params = resolve(&Target::NamedCity("Sydney".into()), &geo).await.unwrap();

        assert_eq!(params, FetchParams::City("Sydney".into()));
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_city_name_is_invalid_without_network() {
        let geo = CountingGeolocator::default();

        for name in ["", "   ", "\t"] {
            let err = resolve(&Target::NamedCity(name.into()), &geo).await.unwrap_err();
            assert_eq!(err, FetchError::InvalidTarget);
        }
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn city_name_is_trimmed() {
        let geo = CountingGeolocator::default();
        let params = resolve(&Target::NamedCity("  Seoul ".into()), &geo).await.unwrap();

        assert_eq!(params, FetchParams::City("Seoul".into()));
    }
}
