use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What weather to fetch next: the device's own location, or a named city.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    CurrentLocation,
    NamedCity(String),
}

impl Target {
    /// Label shown to the user for this target.
    pub fn label(&self) -> &str {
        match self {
            Target::CurrentLocation => "Current Location",
            Target::NamedCity(name) => name,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coordinate pair produced by the geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The minimal normalized weather shape the presentation layer needs.
///
/// The raw API payload carries many more fields; they are not part of this
/// crate's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub condition: String,
    pub location_label: String,
    pub observation_time: DateTime<Utc>,
}

/// Where the view currently is in the fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Everything the presentation layer needs to render.
///
/// Outside `Loading`, exactly one of `snapshot` / `error_message` is `Some`.
/// Only the controller constructs and replaces this value; consumers read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub phase: Phase,
    pub snapshot: Option<WeatherSnapshot>,
    pub error_message: Option<String>,
    pub target: Target,
}

impl ViewState {
    /// The state the app starts in: fetching for the device location.
    pub fn initial() -> Self {
        Self::loading(Target::CurrentLocation)
    }

    pub(crate) fn loading(target: Target) -> Self {
        Self { phase: Phase::Loading, snapshot: None, error_message: None, target }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_loading_for_current_location() {
        let state = ViewState::initial();

        assert_eq!(state.phase, Phase::Loading);
        assert_eq!(state.target, Target::CurrentLocation);
        assert!(state.snapshot.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn target_labels() {
        assert_eq!(Target::CurrentLocation.label(), "Current Location");
        assert_eq!(Target::NamedCity("Sydney".into()).label(), "Sydney");
    }
}
