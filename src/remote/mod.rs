//! Access to the support desk backend.
//!
//! The backend exposes webhook-style REST endpoints returning loosely typed
//! JSON. [`wire`] normalizes those payloads; [`client`] fetches them.
//! Tickets are only ever read here; mutations go through the backend.

pub mod client;
pub mod error;
pub mod wire;

pub use client::WebhookClient;
pub use error::ApiError;
pub use wire::{
    catalog_from_value, parse_catalog_payload, parse_ticket_payload, parse_timestamp,
    tickets_from_value,
};
