use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::holiday::Holiday;
use crate::service::holiday_service::HolidaySource;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HolidayQueryState {
    #[default]
    Idle,
    Loading {
        year: i32,
    },
    Ready {
        year: i32,
        holidays: Arc<Vec<Holiday>>,
    },
    Failed {
        year: i32,
        message: String,
    },
}

impl HolidayQueryState {
    pub fn year(&self) -> Option<i32> {
        match self {
            HolidayQueryState::Idle => None,
            HolidayQueryState::Loading { year }
            | HolidayQueryState::Ready { year, .. }
            | HolidayQueryState::Failed { year, .. } => Some(*year),
        }
    }
}

/// Holidays of the selected year, fetched in the background.
///
/// Each year change bumps a generation counter; a fetch that completes for an
/// older generation is dropped instead of overwriting newer state. Dropping the
/// query does the same for anything still in flight. The HTTP request itself
/// is never cancelled.
pub struct HolidayQuery {
    source: Arc<dyn HolidaySource>,
    tx: Arc<watch::Sender<HolidayQueryState>>,
    generation: Arc<AtomicU64>,
}

impl HolidayQuery {
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        let (tx, _rx) = watch::channel(HolidayQueryState::Idle);
        Self {
            source,
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts a fetch for `year` unless that year is already loading or loaded.
    pub fn request_year(&self, year: i32) {
        if self.tx.borrow().year() == Some(year) {
            return;
        }
        self.refetch(year);
    }

    /// Starts a fetch for `year` unconditionally.
    pub fn refetch(&self, year: i32) {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = HolidayQueryState::Loading { year };
        });
        tracing::debug!(year, generation, "fetching holidays");

        let source = self.source.clone();
        let tx = self.tx.clone();
        let current = self.generation.clone();
        tokio::spawn(async move {
            let next = match source.holidays_for_year(year).await {
                Ok(holidays) => HolidayQueryState::Ready {
                    year,
                    holidays: Arc::new(holidays),
                },
                Err(err) => {
                    tracing::warn!(year, error = %err, "holiday fetch failed");
                    HolidayQueryState::Failed {
                        year,
                        message: err.to_string(),
                    }
                }
            };
            let applied = tx.send_if_modified(|state| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *state = next;
                true
            });
            if !applied {
                tracing::debug!(year, generation, "discarding stale holiday result");
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<HolidayQueryState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> HolidayQueryState {
        self.tx.borrow().clone()
    }

    /// Loaded holidays, or an empty list while loading or after a failure.
    pub fn holidays(&self) -> Arc<Vec<Holiday>> {
        match &*self.tx.borrow() {
            HolidayQueryState::Ready { holidays, .. } => holidays.clone(),
            _ => Arc::new(Vec::new()),
        }
    }

    pub fn has_error(&self) -> bool {
        matches!(&*self.tx.borrow(), HolidayQueryState::Failed { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(&*self.tx.borrow(), HolidayQueryState::Loading { .. })
    }

    /// Waits until the current fetch leaves `Loading`.
    pub async fn settled(&self) -> HolidayQueryState {
        let mut rx = self.tx.subscribe();
        let settled = match rx
            .wait_for(|state| !matches!(state, HolidayQueryState::Loading { .. }))
            .await
        {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }
}

impl Drop for HolidayQuery {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
