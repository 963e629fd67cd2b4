//! Provider payload mappers, API clients and the bulk dispatcher.
//!
//! - [`CalendarProvider`] - map a [`calport_core::NormalizedEvent`] and create it remotely
//! - [`GoogleCalendar`] / [`MicrosoftCalendar`] - the two API-based providers
//! - [`CredentialSource`] - where the per-batch access token comes from
//! - [`BulkDispatcher`] - sequential batch creation with per-item results
//!
//! # Architecture
//!
//! ```text
//!   [BatchItem]                     CredentialSource
//!        │                                │ once per batch
//!        ▼                                ▼
//! ┌──────────────────────────────────────────────┐
//! │                BulkDispatcher                │
//! │  for each item: map_event → create_event     │
//! └──────────────┬───────────────────────────────┘
//!                │
//!       ┌────────┴─────────┐
//!       ▼                  ▼
//! ┌─────────────┐   ┌────────────────┐
//! │ Google v3   │   │ Microsoft Graph│
//! └─────────────┘   └────────────────┘
//!                │
//!                ▼
//!         DispatchResponse
//! ```
//!
//! # Example
//!
//! ```ignore
//! use calport_providers::{BatchItem, BulkDispatcher, GoogleCalendar, OAuthRefresher, StoredCredentials};
//!
//! let refresher = OAuthRefresher::new(timeout)?;
//! let credentials = StoredCredentials::new(refresher).with_google(stored);
//! let dispatcher = BulkDispatcher::new(GoogleCalendar::new(timeout)?, credentials);
//! let response = dispatcher.dispatch(&items).await;
//! ```

pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod google;
pub mod http;
pub mod microsoft;
pub mod provider;

pub use credentials::{
    AccessToken, CredentialSource, OAuthRefresher, StoredCredential, StoredCredentials, TokenGrant,
};
pub use dispatch::{BatchItem, BulkDispatcher, DispatchResponse, ItemResult};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use google::{GoogleCalendar, GoogleEvent, to_google_event};
pub use microsoft::{MicrosoftCalendar, MicrosoftEvent, to_microsoft_event};
pub use provider::{BoxFuture, CalendarProvider, CreatedEvent, ProviderKind};
