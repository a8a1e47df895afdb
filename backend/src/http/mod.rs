//! HTTP server module for the DestinyPath backend.
//!
//! Exposes the fate computation, persistence, chat, catalog and payment links
//! as a small JSON API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing, locale resolution                     │
//! │  - Error mapping to {code, message, details}              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Domain (fate/, ephemeris/)                               │
//! │  - Profile and compatibility computation                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Outbound (submission/, chat/)                            │
//! │  - Storage service, text-generation endpoint              │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
