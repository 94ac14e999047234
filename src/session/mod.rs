// Analysis session: the coordinator and the state it owns.
//
// RequestCoordinator is the only writer. Everything a renderer needs (current
// result, loading flag, failure, trend, history) is read from SessionState.

pub mod coordinator;
pub mod debounce;
pub mod history;
pub mod state;
pub mod trend;
