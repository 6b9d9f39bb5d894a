// src/backend/mod.rs — Backend client and stream decoding

pub mod client;
pub mod decoder;

use serde::{Deserialize, Serialize};

pub use client::BackendClient;
pub use decoder::StreamDecoder;

/// Wire shape a backend speaks. Fixed per backend at construction; the
/// decoder never sniffs payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    /// `POST /api/chat`; stream events carry `{"message":{"content":..}}`.
    #[default]
    Chat,
    /// `POST /api/generate`; stream events carry `{"response":..}`.
    Generate,
}
