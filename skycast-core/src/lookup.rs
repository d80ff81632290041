use crate::{error::FetchError, model::WeatherSnapshot, resolver::FetchParams};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherLookup;

/// The weather lookup collaborator: one HTTP request per call, typed errors,
/// normalized [`WeatherSnapshot`] on success.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn fetch(&self, params: &FetchParams) -> Result<WeatherSnapshot, FetchError>;
}
