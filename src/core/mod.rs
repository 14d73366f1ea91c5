//! Core data structures for event timestamp analysis.

mod events;

pub use events::{
    events_from_datetimes, events_from_f64, PrepareOptions, SortedEvents, MIN_EVENTS,
};
