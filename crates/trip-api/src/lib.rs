//! Trip API Client
//!
//! Thin client for the remote trip planner API:
//! - transport: request/response abstraction and the reqwest implementation
//! - client: authenticated requests with a single refresh-and-retry on 401
//! - auth: login, logout, current user
//! - trips: the user's trips, create/edit/join, itinerary day summary
//! - resources: per-trip resources (members, expenses, packing, checklist, itinerary)

mod auth;
mod client;
mod config;
mod error;
mod http;
mod transport;
mod trips;

pub mod resources;

pub use auth::User;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, FieldErrors};
pub use http::HttpTransport;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
pub use trips::{DaySummary, Trip, TripDraft};
