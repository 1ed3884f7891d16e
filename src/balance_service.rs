use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use log::{debug, warn};

use crate::hr_api::HrApiClient;
use crate::leave_balance::{build_cards, merge_balances, BalanceCard, BalanceFigures};

/// What the leave-balance page gets back for one run of the pipeline.
#[derive(Debug, Clone)]
pub enum GridView {
    Cards(Vec<BalanceCard>),
    NoData,
    Error(String),
}

/// Where the aggregator gets its two upstream responses from.
/// [`HrApiClient`] is the real source; tests plug in fakes.
pub trait BalanceSource {
    fn leave_types(&self, employee_number: &str) -> Result<Vec<String>>;
    fn leave_balances(&self, employee_number: &str) -> Result<HashMap<String, BalanceFigures>>;
}

impl BalanceSource for HrApiClient {
    fn leave_types(&self, employee_number: &str) -> Result<Vec<String>> {
        self.fetch_leave_types(employee_number)
    }

    fn leave_balances(&self, employee_number: &str) -> Result<HashMap<String, BalanceFigures>> {
        self.fetch_leave_balances(employee_number)
    }
}

/// Runs the leave-balance aggregation pipeline: two sequential upstream
/// fetches, a keyed merge, and card filtering.
///
/// Runs may overlap when the page refreshes in quick succession. Each run
/// takes a generation ticket and only the newest generation may commit to
/// the shared `last_view` slot, so a slow stale run cannot overwrite a
/// newer result. Every run still returns its own view to its caller.
pub struct BalanceService<S: BalanceSource> {
    source: S,
    generation: AtomicU64,
    last_view: Mutex<(u64, Option<GridView>)>,
}

impl<S: BalanceSource> BalanceService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
            last_view: Mutex::new((0, None)),
        }
    }

    /// One full pipeline run. Any upstream failure aborts the whole run and
    /// yields an error view; there is no partial grid.
    pub fn load(&self, employee_number: &str) -> GridView {
        let ticket = self.issue_ticket();
        let view = self.run(employee_number);
        self.commit(ticket, view.clone());
        view
    }

    /// The most recently committed view, if any run has finished.
    pub fn last_view(&self) -> Option<GridView> {
        self.last_view.lock().unwrap().1.clone()
    }

    fn run(&self, employee_number: &str) -> GridView {
        let types = match self.source.leave_types(employee_number) {
            Ok(types) => types,
            Err(e) => {
                warn!("leave-type fetch failed for {}: {:#}", employee_number, e);
                return GridView::Error("Error loading leave balances".to_string());
            }
        };
        debug!("fetched {} leave types for {}", types.len(), employee_number);

        let balances = match self.source.leave_balances(employee_number) {
            Ok(balances) => balances,
            Err(e) => {
                warn!("balance fetch failed for {}: {:#}", employee_number, e);
                return GridView::Error("Error loading leave balances".to_string());
            }
        };

        let merged = merge_balances(&types, &balances);
        let cards = build_cards(&merged);
        if cards.is_empty() {
            GridView::NoData
        } else {
            GridView::Cards(cards)
        }
    }

    fn issue_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commits a finished run unless a newer run has started since its
    /// ticket was issued.
    fn commit(&self, ticket: u64, view: GridView) {
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!("dropping stale balance view (generation {})", ticket);
            return;
        }
        let mut last = self.last_view.lock().unwrap();
        if ticket > last.0 {
            *last = (ticket, Some(view));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::AtomicUsize;

    struct FakeSource {
        types: Result<Vec<String>, String>,
        balances: Result<HashMap<String, BalanceFigures>, String>,
        type_calls: AtomicUsize,
        balance_calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(
            types: Result<Vec<String>, String>,
            balances: Result<HashMap<String, BalanceFigures>, String>,
        ) -> Self {
            Self {
                types,
                balances,
                type_calls: AtomicUsize::new(0),
                balance_calls: AtomicUsize::new(0),
            }
        }
    }

    impl BalanceSource for FakeSource {
        fn leave_types(&self, _employee_number: &str) -> Result<Vec<String>> {
            self.type_calls.fetch_add(1, Ordering::SeqCst);
            self.types.clone().map_err(|e| anyhow!(e))
        }

        fn leave_balances(
            &self,
            _employee_number: &str,
        ) -> Result<HashMap<String, BalanceFigures>> {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            self.balances.clone().map_err(|e| anyhow!(e))
        }
    }

    fn casual_balances() -> HashMap<String, BalanceFigures> {
        let mut map = HashMap::new();
        map.insert(
            "casual".to_string(),
            BalanceFigures { total: 10.0, taken: 2.0, available: 8.0, pending: 0.0 },
        );
        map
    }

    #[test]
    fn test_happy_path_renders_cards() {
        let service = BalanceService::new(FakeSource::new(
            Ok(vec!["Casual Leave".to_string()]),
            Ok(casual_balances()),
        ));
        match service.load("EMP001") {
            GridView::Cards(cards) => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].leave_type.key, "casual");
            }
            other => panic!("expected cards, got {:?}", other),
        }
        assert!(service.last_view().is_some());
    }

    #[test]
    fn test_all_zero_data_is_no_data() {
        let service = BalanceService::new(FakeSource::new(
            Ok(vec!["Annual Leave".to_string()]),
            Ok(HashMap::new()),
        ));
        assert!(matches!(service.load("EMP001"), GridView::NoData));
    }

    #[test]
    fn test_type_fetch_failure_aborts_pipeline() {
        let source = FakeSource::new(Err("connection refused".to_string()), Ok(casual_balances()));
        let service = BalanceService::new(source);
        assert!(matches!(service.load("EMP001"), GridView::Error(_)));
        // the second fetch never runs
        assert_eq!(service.source.balance_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_balance_fetch_failure_aborts_pipeline() {
        let service = BalanceService::new(FakeSource::new(
            Ok(vec!["Casual Leave".to_string()]),
            Err("timed out".to_string()),
        ));
        assert!(matches!(service.load("EMP001"), GridView::Error(_)));
    }

    #[test]
    fn test_retry_reruns_from_first_fetch() {
        let service = BalanceService::new(FakeSource::new(
            Err("down".to_string()),
            Ok(HashMap::new()),
        ));
        service.load("EMP001");
        service.load("EMP001");
        assert_eq!(service.source.type_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stale_run_cannot_overwrite_newer_view() {
        let service = BalanceService::new(FakeSource::new(
            Ok(vec!["Casual Leave".to_string()]),
            Ok(casual_balances()),
        ));

        // two overlapping runs: the older ticket finishes last
        let stale = service.issue_ticket();
        let fresh = service.issue_ticket();
        service.commit(fresh, GridView::NoData);
        service.commit(stale, GridView::Error("slow loser".to_string()));

        match service.last_view() {
            Some(GridView::NoData) => {}
            other => panic!("stale run overwrote the committed view: {:?}", other),
        }
    }
}
