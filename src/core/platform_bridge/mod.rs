//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the window host and the core frame loop.
//
// Components:
// - `interface`: event and error types
// - `event_collector`: core-side draining of the event channel
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub use event_collector::TickControl;
pub use interface::PlatformError;

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::PlatformEvent;
