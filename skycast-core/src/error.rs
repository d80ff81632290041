use reqwest::StatusCode;

/// Failures of the device geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation permission denied")]
    Denied,
    #[error("Geolocation service unavailable")]
    Unavailable,
}

/// Everything that can go wrong between selecting a target and getting a
/// snapshot back.
///
/// All variants are terminal for the current fetch attempt only; nothing is
/// retried automatically. The controller maps each variant to a user-facing
/// message at the transition boundary, so raw transport errors never reach
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// Empty city name; detected before any network call.
    #[error("Invalid target: city name is empty")]
    InvalidTarget,

    #[error("Weather lookup failed with status {status}")]
    LookupHttpError { status: StatusCode },

    #[error("Weather lookup returned a malformed payload")]
    LookupMalformedPayload,

    #[error("Weather lookup failed: network error")]
    LookupNetworkError,
}

impl FetchError {
    /// The message shown to the user when this error lands the view in
    /// `Failed`.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Geolocation(_) => {
                "Unable to retrieve your current location. Please try again."
            }
            FetchError::InvalidTarget => "Please enter a city name.",
            FetchError::LookupHttpError { .. }
            | FetchError::LookupMalformedPayload
            | FetchError::LookupNetworkError => {
                "Failed to fetch weather data. Please try again later."
            }
        }
    }
}
