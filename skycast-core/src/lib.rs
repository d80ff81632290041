//! Core library for the `skycast` weather viewer.
//!
//! This crate defines:
//! - Configuration (API key, city list)
//! - The view-state machine governing loading/error/data transitions
//! - The location/city resolver and the geolocation capability
//! - The weather lookup abstraction and its OpenWeather implementation
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod config;
pub mod controller;
pub mod error;
pub mod lookup;
pub mod model;
pub mod resolver;

pub use config::Config;
pub use controller::{Controller, RequestToken, Session};
pub use error::{FetchError, GeolocationError};
pub use lookup::{OpenWeatherLookup, WeatherLookup};
pub use model::{Coordinates, Phase, Target, ViewState, WeatherSnapshot};
pub use resolver::{FetchParams, Geolocator, IpApiGeolocator, resolve};
