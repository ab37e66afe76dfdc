//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! Every message is a JSON text frame tagged with `"type"`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::flock::QuailProfile;
use crate::ledger::model::{DayRecord, EggInput};
use crate::ledger::stats::EggStats;
use crate::ledger::timeline::TimelineDay;
use crate::render::{EggVisual, RenderedEgg};

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Most recent recorded days.
    ListDays {
        /// How many days. Defaults to 5.
        #[serde(default)]
        days: Option<usize>,
    },

    /// Seven-day timeline with rendered eggs.
    Timeline {
        /// Last day of the timeline. Defaults to the server's local date.
        #[serde(default)]
        today: Option<NaiveDate>,
    },

    /// Log one or more eggs for a day.
    AddEggs(AddEggsRequest),

    /// Replace an existing egg.
    UpdateEgg(UpdateEggRequest),

    /// Remove an egg.
    DeleteEgg {
        /// Row to remove.
        row_index: usize,
    },

    /// Aggregate statistics.
    Stats,

    /// Flock profiles.
    Flock {
        /// Restrict to one bird.
        #[serde(default)]
        id: Option<String>,
    },

    /// Render a single egg without storing it (previews).
    Render(EggVisual),

    /// Ping for latency measurement.
    Ping {
        /// Client timestamp, echoed back.
        timestamp: u64,
    },
}

/// Add request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEggsRequest {
    /// Collection day.
    pub date: NaiveDate,
    /// Eggs, appended in order.
    pub eggs: Vec<EggInput>,
}

/// Update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEggRequest {
    /// Row to replace.
    pub row_index: usize,
    /// New values.
    pub egg: EggInput,
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Recorded days, newest first.
    Days {
        /// Days with their eggs.
        days: Vec<DayRecord>,
    },

    /// Timeline, newest first.
    Timeline {
        /// Exactly seven days.
        days: Vec<TimelineDay>,
    },

    /// Eggs were appended.
    EggsAdded {
        /// Day they were logged under.
        date: NaiveDate,
        /// Row index of each new egg, in request order.
        rows: Vec<usize>,
    },

    /// An egg was replaced.
    EggUpdated {
        /// Row that changed.
        row_index: usize,
    },

    /// An egg was removed. Later rows moved up by one.
    EggDeleted {
        /// Row that was removed.
        row_index: usize,
    },

    /// Aggregate statistics.
    Stats(EggStats),

    /// Flock profiles.
    Flock {
        /// Matching profiles.
        quails: Vec<QuailProfile>,
    },

    /// Render output.
    Rendered(RenderedEgg),

    /// Pong response.
    Pong {
        /// Client timestamp.
        timestamp: u64,
        /// Server time, Unix milliseconds.
        server_time: u64,
    },

    /// Error message.
    Error(ServerError),

    /// Server is shutting down.
    Shutdown {
        /// Why.
        reason: String,
    },
}

/// Server error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed frame or invalid field values.
    InvalidInput,
    /// Row or profile does not exist.
    NotFound,
    /// The store failed to read or write.
    StorageError,
    /// Connection limit reached.
    ServerOverloaded,
    /// Internal error.
    InternalError,
}

impl ServerMessage {
    /// Build an error message.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error(ServerError {
            code,
            message: message.into(),
        })
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
