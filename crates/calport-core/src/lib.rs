//! Core types: normalized events, location merging, ICS encoding, calendar links

pub mod error;
pub mod event;
pub mod ics;
pub mod links;
pub mod location;
pub mod time;
pub mod tracing;

pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use error::{CoreError, CoreResult};
pub use event::{NormalizedEvent, Reminder};
pub use ics::{Disposition, ICS_CONTENT_TYPE, IcsEncoder, IcsExport};
pub use links::{CalendarLinkBuilder, CalendarLinks};
pub use location::merge_location;
