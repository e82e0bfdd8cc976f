//! Client side of the visitor location tracker.
//!
//! A capture asks a [`position::PositionProvider`] for coordinates, enriches them with a
//! [`geocoding::ReverseGeocoder`] and hands the result to a [`store::LocationStore`], which is
//! either the HTTP server ([`api::RemoteStore`]) or a local JSON file ([`local_store::LocalStore`]).
//! Enrichment and submission failures are logged and never undo the capture itself.

pub mod admin;
pub mod api;
pub mod capture;
pub mod display;
pub mod geocoding;
pub mod local_store;
pub mod position;
pub mod store;
