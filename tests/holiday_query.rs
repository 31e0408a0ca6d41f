use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout, Duration};
use workoutBooking::error::HolidayFetchError;
use workoutBooking::models::holiday::{Holiday, HolidayType};
use workoutBooking::service::holiday_service::HolidaySource;
use workoutBooking::tasks::holiday_query::{HolidayQuery, HolidayQueryState};

struct ScriptedHolidays {
    calls: StdMutex<Vec<i32>>,
    gates: StdMutex<HashMap<i32, oneshot::Receiver<()>>>,
    fail: bool,
}

impl ScriptedHolidays {
    fn new(fail: bool) -> Self {
        Self {
            calls: StdMutex::new(Vec::new()),
            gates: StdMutex::new(HashMap::new()),
            fail,
        }
    }

    fn gate(&self, year: i32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(year, rx);
        tx
    }

    fn calls(&self) -> Vec<i32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HolidaySource for ScriptedHolidays {
    async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, HolidayFetchError> {
        self.calls.lock().unwrap().push(year);
        let gate = self.gates.lock().unwrap().remove(&year);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail {
            return Err(HolidayFetchError::Status(500));
        }
        Ok(vec![Holiday {
            name: format!("New Year {}", year),
            date: format!("{}-01-01", year),
            holiday_type: HolidayType::NationalHoliday,
            country: "Poland".to_string(),
        }])
    }
}

async fn settled(query: &HolidayQuery) -> HolidayQueryState {
    timeout(Duration::from_secs(2), query.settled())
        .await
        .expect("holiday query did not settle")
}

#[tokio::test]
async fn loads_holidays_for_requested_year() {
    let source = Arc::new(ScriptedHolidays::new(false));
    let query = HolidayQuery::new(source.clone());
    assert_eq!(query.state(), HolidayQueryState::Idle);

    query.request_year(2026);
    let state = settled(&query).await;

    assert!(matches!(state, HolidayQueryState::Ready { year: 2026, .. }));
    assert_eq!(query.holidays().len(), 1);
    assert_eq!(query.holidays()[0].date, "2026-01-01");
    assert!(!query.has_error());
    assert_eq!(source.calls(), vec![2026]);
}

#[tokio::test]
async fn same_year_is_fetched_once() {
    let source = Arc::new(ScriptedHolidays::new(false));
    let query = HolidayQuery::new(source.clone());

    query.request_year(2026);
    query.request_year(2026);
    settled(&query).await;
    query.request_year(2026);
    sleep(Duration::from_millis(20)).await;

    assert_eq!(source.calls(), vec![2026]);
}

#[tokio::test]
async fn failed_fetch_sets_error_flag_without_retry() {
    let source = Arc::new(ScriptedHolidays::new(true));
    let query = HolidayQuery::new(source.clone());

    query.request_year(2026);
    let state = settled(&query).await;

    assert!(matches!(state, HolidayQueryState::Failed { year: 2026, .. }));
    assert!(query.has_error());
    assert!(query.holidays().is_empty());

    query.request_year(2026);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(source.calls(), vec![2026]);
}

#[tokio::test]
async fn stale_year_result_is_discarded() {
    let source = Arc::new(ScriptedHolidays::new(false));
    let release_2026 = source.gate(2026);
    let query = HolidayQuery::new(source.clone());

    query.request_year(2026);
    assert!(query.is_loading());
    query.request_year(2027);
    let state = settled(&query).await;
    assert!(matches!(state, HolidayQueryState::Ready { year: 2027, .. }));

    release_2026.send(()).unwrap();
    sleep(Duration::from_millis(50)).await;

    assert!(matches!(query.state(), HolidayQueryState::Ready { year: 2027, .. }));
    assert_eq!(query.holidays()[0].date, "2027-01-01");
    assert_eq!(source.calls(), vec![2026, 2027]);
}

#[tokio::test]
async fn result_after_drop_is_ignored() {
    let source = Arc::new(ScriptedHolidays::new(false));
    let release = source.gate(2026);
    let query = HolidayQuery::new(source.clone());
    let rx = query.subscribe();

    query.request_year(2026);
    drop(query);
    release.send(()).unwrap();
    sleep(Duration::from_millis(50)).await;

    assert_eq!(*rx.borrow(), HolidayQueryState::Loading { year: 2026 });
    assert_eq!(source.calls(), vec![2026]);
}
