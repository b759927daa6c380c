//! API Module
//!
//! Cached client for the PokeAPI.
//!
//! # Endpoints
//! - `GET /location-area/?offset&limit` - Paged list of location areas
//! - `GET /location-area/{name}` - Pokemon encounters in one area
//! - `GET /pokemon/{name}` - A single pokemon

pub mod client;

pub use client::PokeApi;
