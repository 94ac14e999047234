// Request coordinator: decides when to call the predictor and makes sure
// only the freshest response is ever applied.
//
// Every trigger (text change, real-time toggle, manual analyze) allocates the
// next RequestId. Timers and predictor calls run as tokio tasks that report
// back over a channel; `step` applies them one at a time. A response is only
// committed if its captured id still equals the live counter ("last request
// wins"). Superseded calls are not aborted, their responses are just dropped.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::Duration;
use tracing::{debug, info, warn};

use super::debounce::DebounceTimer;
use super::state::{
    AnalysisRequest, Outcome, Phase, RequestId, Resolution, SessionState, Step, Trigger,
};
use super::trend::TrendPoint;
use crate::output::truncate_chars;
use crate::predictor::traits::{AnalysisResult, Predictor};

/// Tunables for the real-time path.
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Quiet period after the last edit before a real-time call goes out.
    pub debounce: Duration,
    /// Minimum trimmed length, in characters, for a real-time call.
    pub min_chars: usize,
    /// Whether text changes trigger analysis at all.
    pub realtime: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1200),
            min_chars: 5,
            realtime: true,
        }
    }
}

enum Event {
    TimerFired(RequestId),
    Resolved {
        request: AnalysisRequest,
        response: Result<AnalysisResult>,
    },
}

pub struct RequestCoordinator {
    predictor: Arc<dyn Predictor>,
    settings: CoordinatorSettings,
    text: String,
    realtime: bool,
    /// Live counter: the id of the most recently issued request.
    latest: RequestId,
    phase: Phase,
    timer: Option<DebounceTimer>,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    state: SessionState,
}

impl RequestCoordinator {
    pub fn new(predictor: Arc<dyn Predictor>, settings: CoordinatorSettings) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            predictor,
            realtime: settings.realtime,
            settings,
            text: String::new(),
            latest: RequestId::default(),
            phase: Phase::Idle,
            timer: None,
            events_tx,
            events_rx,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active text value.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn realtime(&self) -> bool {
        self.realtime
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Id of the most recently issued request.
    pub fn latest_id(&self) -> RequestId {
        self.latest
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Replace the active text and run the real-time trigger.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_text(&mut self, text: impl Into<String>) -> RequestId {
        self.text = text.into();
        self.trigger_realtime()
    }

    /// Turn real-time analysis on or off and re-run the trigger for the
    /// current text.
    pub fn set_realtime(&mut self, realtime: bool) -> RequestId {
        self.realtime = realtime;
        self.trigger_realtime()
    }

    /// Analyze the current text right away, bypassing the debounce.
    /// Returns None (and does nothing) when the text is blank.
    pub fn analyze_now(&mut self) -> Option<RequestId> {
        if self.text.trim().is_empty() {
            return None;
        }

        let id = self.allocate();
        self.timer = None;
        self.dispatch(AnalysisRequest {
            id,
            text: self.text.clone(),
            trigger: Trigger::Manual,
        });
        Some(id)
    }

    /// Put a history entry's text back into the pipeline as a fresh cycle.
    pub fn replay(&mut self, index: usize) -> Option<RequestId> {
        let text = self.state.history().get(index)?.text.clone();
        Some(self.set_text(text))
    }

    /// Wait for the next timer firing or predictor response and apply it.
    ///
    /// Returns None only if the event channel closed, which cannot happen
    /// while the coordinator holds its own sender.
    pub async fn step(&mut self) -> Option<Step> {
        loop {
            match self.events_rx.recv().await? {
                Event::TimerFired(id) => {
                    if id != self.latest {
                        debug!(request_id = %id, "Ignoring superseded timer");
                        continue;
                    }
                    self.timer = None;
                    let request = AnalysisRequest {
                        id,
                        text: self.text.clone(),
                        trigger: Trigger::Realtime,
                    };
                    self.dispatch(request.clone());
                    return Some(Step::Dispatched(request));
                }
                Event::Resolved { request, response } => {
                    let outcome = self.resolve(request.clone(), response);
                    return Some(Step::Resolved(Resolution { request, outcome }));
                }
            }
        }
    }

    /// The resolution step: decide whether a response is applied, dropped as
    /// stale, or recorded as a failure.
    pub fn resolve(
        &mut self,
        request: AnalysisRequest,
        response: Result<AnalysisResult>,
    ) -> Outcome {
        if request.id != self.latest {
            self.discard(&request);
            return Outcome::Stale;
        }

        match response {
            Ok(result) => {
                self.commit(&request, result);
                Outcome::Applied
            }
            Err(e) => {
                let detail = format!("{e:#}");
                self.fail(&request, detail.clone());
                Outcome::Failed(detail)
            }
        }
    }

    /// Cancel any pending debounce timer and drop the coordinator.
    /// Responses still in flight are ignored when they land.
    pub fn dispose(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        debug!(latest = %self.latest, "Coordinator disposed");
    }

    fn allocate(&mut self) -> RequestId {
        self.latest = self.latest.next();
        self.latest
    }

    fn trigger_realtime(&mut self) -> RequestId {
        let id = self.allocate();
        if !self.realtime || self.text.trim().chars().count() < self.settings.min_chars {
            self.skip(id);
        } else {
            self.arm(id);
        }
        id
    }

    // --- transitions ---

    fn skip(&mut self, id: RequestId) {
        self.timer = None;
        self.phase = Phase::Idle;
        self.state.clear();
        debug!(request_id = %id, realtime = self.realtime, "Input below threshold, result cleared");
    }

    fn arm(&mut self, id: RequestId) {
        // Drop the old handle first so its callback can never fire.
        self.timer = None;
        let tx = self.events_tx.clone();
        self.timer = Some(DebounceTimer::arm(self.settings.debounce, move || {
            let _ = tx.send(Event::TimerFired(id));
        }));
        self.phase = Phase::Armed(id);
        self.state.supersede();
    }

    fn dispatch(&mut self, request: AnalysisRequest) {
        debug!(
            request_id = %request.id,
            trigger = ?request.trigger,
            text_preview = %truncate_chars(&request.text, 50),
            "Dispatching prediction"
        );

        self.phase = Phase::InFlight(request.id);
        self.state.begin_loading();

        let predictor = self.predictor.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let response = predictor.predict(&request.text).await;
            // The receiver is gone once the coordinator is disposed.
            let _ = tx.send(Event::Resolved { request, response });
        });
    }

    fn commit(&mut self, request: &AnalysisRequest, result: AnalysisResult) {
        let result = result.normalized();
        let point = TrendPoint::now(result.percent());
        info!(
            request_id = %request.id,
            trigger = ?request.trigger,
            toxic = result.toxic,
            confidence = result.confidence,
            "Applied prediction"
        );
        self.state.commit(request, result, point);
        self.phase = Phase::Idle;
    }

    fn discard(&self, request: &AnalysisRequest) {
        debug!(
            request_id = %request.id,
            latest = %self.latest,
            "Discarding stale response"
        );
    }

    fn fail(&mut self, request: &AnalysisRequest, detail: String) {
        warn!(
            request_id = %request.id,
            trigger = ?request.trigger,
            error = %detail,
            "Prediction failed"
        );
        self.state.fail(request.id, detail);
        self.phase = Phase::Idle;
    }
}
