//! Microsoft Graph: payload mapping and the event creation client.

mod client;
mod mapper;

pub use client::{GRAPH_API_BASE, MicrosoftCalendar};
pub use mapper::{DateTimeTimeZone, ItemBody, MicrosoftEvent, MicrosoftLocation, to_microsoft_event};
