// Session state and the vocabulary of the request state machine.
//
// SessionState is the single value consumers read: current result, loading
// flag, last failure, trend and history. Its mutators are crate-private so the
// coordinator's transitions are the only writers, and each transition is one
// `&mut` call, so readers never see half an update.

use serde::Serialize;

use super::history::{AnalysisHistoryStore, HistoryEntry};
use super::trend::{ToxicityTrendBuffer, TrendPoint};
use crate::predictor::traits::AnalysisResult;

/// Monotonic request sequence number. 0 means "nothing issued yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What started a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trigger {
    /// Debounced text change.
    Realtime,
    /// Explicit "analyze" action.
    Manual,
}

/// A request as captured at trigger time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub text: String,
    pub trigger: Trigger,
}

/// Where the latest request cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Debounce timer pending for this request.
    Armed(RequestId),
    /// Predictor call outstanding for this request.
    InFlight(RequestId),
}

/// What the resolution step did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response belonged to the latest request and is now current.
    Applied,
    /// A newer request exists; the response was dropped untouched.
    Stale,
    /// The latest request failed; the previous result stays on display.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub request: AnalysisRequest,
    pub outcome: Outcome,
}

/// One unit of progress reported by `RequestCoordinator::step`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The debounce timer fired and this request went out.
    Dispatched(AnalysisRequest),
    /// A predictor response came back and was resolved.
    Resolved(Resolution),
}

/// A transport or service failure for the latest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub request: RequestId,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Option<AnalysisResult>,
    loading: bool,
    failure: Option<Failure>,
    trend: ToxicityTrendBuffer,
    history: AnalysisHistoryStore,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The result on display, if any.
    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Failure of the latest request, cleared once a newer request starts.
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn trend(&self) -> &ToxicityTrendBuffer {
        &self.trend
    }

    pub fn history(&self) -> &AnalysisHistoryStore {
        &self.history
    }

    /// Input no longer qualifies for analysis: show nothing.
    pub(crate) fn clear(&mut self) {
        self.current = None;
        self.loading = false;
        self.failure = None;
    }

    /// A newer cycle started; whatever was pending no longer owns the
    /// loading flag or the failure slot.
    pub(crate) fn supersede(&mut self) {
        self.loading = false;
        self.failure = None;
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
        self.failure = None;
    }

    pub(crate) fn commit(
        &mut self,
        request: &AnalysisRequest,
        result: AnalysisResult,
        point: TrendPoint,
    ) {
        if request.trigger == Trigger::Manual {
            self.history
                .append(HistoryEntry::from_result(&request.text, &result));
        }
        self.trend.append(point);
        self.current = Some(result);
        self.loading = false;
        self.failure = None;
    }

    pub(crate) fn fail(&mut self, request: RequestId, detail: String) {
        self.loading = false;
        self.failure = Some(Failure { request, detail });
    }
}
