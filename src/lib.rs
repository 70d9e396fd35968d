//! Client core for a chatbot service.
//!
//! Holds everything below the presentation layer: the access-token
//! preference store, the HTTP API client and its wire schema, the
//! repositories, and one view-state controller per screen. A UI (or the
//! `chatbot` binary) renders controller snapshots and forwards user events.

pub mod api;
pub mod app;
pub mod config;
pub mod genai;
pub mod prefs;
pub mod repo;
pub mod state;

#[cfg(test)]
mod test_helpers;
