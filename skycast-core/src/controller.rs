//! The view-state machine: `Loading` → `Ready` / `Failed`, driven by target
//! selections and fetch completions.
//!
//! The controller is the only writer of [`ViewState`]. Selections apply
//! synchronously; completions are guarded by a request sequence number so a
//! slow fetch for a superseded target can never overwrite a newer state
//! (cancellation by ignoring, since the transports offer no true abort).

use tracing::debug;

use crate::{
    error::FetchError,
    lookup::WeatherLookup,
    model::{Phase, Target, ViewState, WeatherSnapshot},
    resolver::{self, Geolocator},
};

/// Handle for one issued fetch. A completion is only applied when its token
/// still matches the controller's current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    seq: u64,
}

#[derive(Debug)]
pub struct Controller {
    state: ViewState,
    seq: u64,
    pending: bool,
}

impl Controller {
    /// Start in `Loading` for the device location. The startup fetch itself
    /// is issued by the first [`select`](Self::select), conventionally for
    /// [`Target::CurrentLocation`].
    pub fn new() -> Self {
        Self { state: ViewState::initial(), seq: 0, pending: false }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Target selection: from any state, enter `Loading(target)` synchronously.
    ///
    /// Clears any previous error, bumps the sequence number and returns the
    /// token for the one fetch that may now be issued. Any earlier token is
    /// thereby superseded; its completion becomes a no-op.
    pub fn select(&mut self, target: Target) -> RequestToken {
        self.seq += 1;
        self.pending = true;
        self.state = ViewState::loading(target);

        debug!(seq = self.seq, selected = %self.state.target, "entering Loading");
        RequestToken { seq: self.seq }
    }

    /// Apply a fetch outcome: `Ready` on success, `Failed` on error.
    ///
    /// Returns whether the outcome was applied. A token that no longer
    /// matches the current request, or a request that was already completed,
    /// leaves the state untouched.
    pub fn complete(
        &mut self,
        token: &RequestToken,
        outcome: Result<WeatherSnapshot, FetchError>,
    ) -> bool {
        if token.seq != self.seq || !self.pending {
            debug!(token_seq = token.seq, current_seq = self.seq, "discarding stale completion");
            return false;
        }
        self.pending = false;

        let target = self.state.target.clone();
        self.state = match outcome {
            Ok(snapshot) => ViewState {
                phase: Phase::Ready,
                snapshot: Some(snapshot),
                error_message: None,
                target,
            },
            Err(err) => {
                debug!(error = %err, "fetch failed");
                ViewState {
                    phase: Phase::Failed,
                    snapshot: None,
                    error_message: Some(err.user_message().to_string()),
                    target,
                }
            }
        };
        true
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives one full fetch cycle per target selection: select → resolve →
/// lookup → complete.
///
/// Geolocation and the HTTP call are the only suspension points, both on the
/// same task. Because `refresh` awaits its own fetch, stale completions can
/// only arise for callers that drive the controller directly; the session
/// exists so frontends don't have to.
#[derive(Debug)]
pub struct Session {
    controller: Controller,
    geolocator: Box<dyn Geolocator>,
    lookup: Box<dyn WeatherLookup>,
}

impl Session {
    pub fn new(geolocator: Box<dyn Geolocator>, lookup: Box<dyn WeatherLookup>) -> Self {
        Self { controller: Controller::new(), geolocator, lookup }
    }

    pub fn state(&self) -> &ViewState {
        &self.controller.state
    }

    /// Select `target` and run its fetch to completion.
    pub async fn refresh(&mut self, target: Target) -> &ViewState {
        let token = self.controller.select(target);

        let outcome = fetch_once(
            &self.controller.state.target,
            self.geolocator.as_ref(),
            self.lookup.as_ref(),
        )
        .await;

        self.controller.complete(&token, outcome);
        self.state()
    }
}

async fn fetch_once(
    target: &Target,
    geolocator: &dyn Geolocator,
    lookup: &dyn WeatherLookup,
) -> Result<WeatherSnapshot, FetchError> {
    let params = resolver::resolve(target, geolocator).await?;
    lookup.fetch(&params).await
}
