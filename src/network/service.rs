//! Ledger Service
//!
//! Maps each [`ClientMessage`] onto the store and the ledger functions, and
//! turns the outcome into a single [`ServerMessage`]. Connection handling
//! lives in `server.rs`; this layer knows nothing about sockets.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::ledger::flock::{default_flock, find_quail, QuailProfile};
use crate::ledger::model::{Egg, EggInput, EggRow};
use crate::ledger::stats::compute_stats;
use crate::ledger::timeline::{
    build_timeline, group_by_day, last_n_days, DEFAULT_DAYS_QUERY, TIMELINE_DAYS,
};
use crate::network::protocol::{
    AddEggsRequest, ClientMessage, ErrorCode, ServerMessage, UpdateEggRequest,
};
use crate::render::{render_egg, SpeckleTuning};
use crate::store::{EggStore, StoreError};

/// Shared handle to the configured store.
pub type SharedStore = Arc<RwLock<Box<dyn EggStore>>>;

/// Request handler shared by every connection.
#[derive(Clone)]
pub struct LedgerService {
    store: SharedStore,
    tuning: SpeckleTuning,
    flock: Arc<Vec<QuailProfile>>,
}

impl LedgerService {
    /// Wrap a store.
    pub fn new(store: Box<dyn EggStore>, tuning: SpeckleTuning) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tuning,
            flock: Arc::new(default_flock()),
        }
    }

    /// Speckle tuning used for rendering.
    pub fn tuning(&self) -> SpeckleTuning {
        self.tuning
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Handle one request.
    #[instrument(skip(self), level = "debug")]
    pub async fn handle(&self, msg: ClientMessage) -> ServerMessage {
        let result = match msg {
            ClientMessage::ListDays { days } => self.list_days(days).await,
            ClientMessage::Timeline { today } => self.timeline(today).await,
            ClientMessage::AddEggs(req) => self.add_eggs(req).await,
            ClientMessage::UpdateEgg(req) => self.update_egg(req).await,
            ClientMessage::DeleteEgg { row_index } => self.delete_egg(row_index).await,
            ClientMessage::Stats => self.stats().await,
            ClientMessage::Flock { id } => Ok(self.flock(id.as_deref())),
            ClientMessage::Render(visual) => {
                Ok(ServerMessage::Rendered(render_egg(&visual, self.tuning)))
            }
            ClientMessage::Ping { timestamp } => Ok(ServerMessage::Pong {
                timestamp,
                server_time: unix_millis(),
            }),
        };

        result.unwrap_or_else(|e| {
            let code = error_code(&e);
            if code == ErrorCode::StorageError {
                warn!("Store failure: {}", e);
            } else {
                debug!("Rejected request: {}", e);
            }
            ServerMessage::error(code, e.to_string())
        })
    }

    async fn rows(&self) -> Result<Vec<EggRow>, StoreError> {
        self.store.read().await.rows()
    }

    async fn list_days(&self, days: Option<usize>) -> Result<ServerMessage, StoreError> {
        let rows = self.rows().await?;
        let days = last_n_days(&rows, days.unwrap_or(DEFAULT_DAYS_QUERY));
        Ok(ServerMessage::Days { days })
    }

    async fn timeline(&self, today: Option<NaiveDate>) -> Result<ServerMessage, StoreError> {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        // The whole week must be representable.
        if today
            .checked_sub_days(Days::new(TIMELINE_DAYS as u64 - 1))
            .is_none()
        {
            return Ok(ServerMessage::error(
                ErrorCode::InvalidInput,
                format!("timeline date {today} is out of range"),
            ));
        }

        let rows = self.rows().await?;
        Ok(ServerMessage::Timeline {
            days: build_timeline(&rows, today, self.tuning),
        })
    }

    async fn stats(&self) -> Result<ServerMessage, StoreError> {
        let rows = self.rows().await?;
        Ok(ServerMessage::Stats(compute_stats(&group_by_day(&rows))))
    }

    async fn add_eggs(&self, req: AddEggsRequest) -> Result<ServerMessage, StoreError> {
        if req.eggs.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let rows = {
            let mut rng = rand::thread_rng();
            req.eggs
                .into_iter()
                .map(|input| {
                    input.into_egg(&mut rng).map(|egg| EggRow {
                        date: req.date,
                        egg,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let count = rows.len();
        let first = self.store.write().await.append(rows)?;
        info!("Logged {} eggs for {}", count, req.date);

        Ok(ServerMessage::EggsAdded {
            date: req.date,
            rows: (first..first + count).collect(),
        })
    }

    async fn update_egg(&self, req: UpdateEggRequest) -> Result<ServerMessage, StoreError> {
        let egg = validate(req.egg)?;
        self.store.write().await.update(req.row_index, egg)?;
        info!("Updated row {}", req.row_index);
        Ok(ServerMessage::EggUpdated {
            row_index: req.row_index,
        })
    }

    async fn delete_egg(&self, row_index: usize) -> Result<ServerMessage, StoreError> {
        let removed = self.store.write().await.delete(row_index)?;
        info!("Deleted row {} ({})", row_index, removed.date);
        Ok(ServerMessage::EggDeleted { row_index })
    }

    fn flock(&self, id: Option<&str>) -> ServerMessage {
        match id {
            None => ServerMessage::Flock {
                quails: self.flock.as_ref().clone(),
            },
            Some(id) => match find_quail(&self.flock, id) {
                Some(quail) => ServerMessage::Flock {
                    quails: vec![quail.clone()],
                },
                None => ServerMessage::error(ErrorCode::NotFound, format!("no quail with id {id}")),
            },
        }
    }
}

fn validate(input: EggInput) -> Result<Egg, StoreError> {
    Ok(input.into_egg(&mut rand::thread_rng())?)
}

/// Protocol code for a store error.
pub fn error_code(err: &StoreError) -> ErrorCode {
    match err {
        StoreError::RowNotFound { .. } => ErrorCode::NotFound,
        StoreError::InvalidEgg(_) | StoreError::EmptyBatch => ErrorCode::InvalidInput,
        StoreError::Io(_) | StoreError::Json(_) => ErrorCode::StorageError,
    }
}

fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
