//! Google Calendar: payload mapping and the insert client.

mod client;
mod mapper;

pub use client::{CALENDAR_API_BASE, GoogleCalendar};
pub use mapper::{
    GoogleEvent, GoogleEventTime, GoogleReminderOverride, GoogleReminders, to_google_event,
};
