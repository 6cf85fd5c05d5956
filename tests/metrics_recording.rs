//! Metric accounting for workflows that fail after submission.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use algorand_workflows::abi::AbiValue;
use algorand_workflows::blockchain::LedgerError;
use algorand_workflows::observability::metrics::{FAILURES_TOTAL, SUBMISSIONS_TOTAL};
use algorand_workflows::wallet::Account;
use algorand_workflows::workflows::PaymentRequest;
use metrics::{
    Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};

use common::{start_mock_ledger, MockBehavior};

type Counts = Arc<Mutex<HashMap<String, u64>>>;

/// Counts counter increments as `name{label values}`.
#[derive(Default)]
struct CountingRecorder {
    counts: Counts,
}

struct CountHandle {
    key: String,
    counts: Counts,
}

impl CounterFn for CountHandle {
    fn increment(&self, value: u64) {
        *self.counts.lock().unwrap().entry(self.key.clone()).or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.counts.lock().unwrap().insert(self.key.clone(), value);
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        let labels: Vec<&str> = key.labels().map(|label| label.value()).collect();
        Counter::from_arc(Arc::new(CountHandle {
            key: format!("{}{{{}}}", key.name(), labels.join(",")),
            counts: self.counts.clone(),
        }))
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

/// Run `work` on a single-threaded runtime with `recorder` installed.
fn with_recorder<T>(
    recorder: &CountingRecorder,
    work: impl std::future::Future<Output = T>,
) -> T {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    metrics::with_local_recorder(recorder, || runtime.block_on(work))
}

#[test]
fn test_method_call_timeout_counts_submission_and_failure() {
    let recorder = CountingRecorder::default();

    let err = with_recorder(&recorder, async {
        let ledger = start_mock_ledger(MockBehavior {
            never_confirm: true,
            ..MockBehavior::default()
        })
        .await;
        ledger
            .runner()
            .call_method(
                Arc::new(Account::generate()),
                77,
                "add(uint64,uint64)uint64",
                vec![AbiValue::Uint(2), AbiValue::Uint(3)],
            )
            .await
            .unwrap_err()
    });

    assert!(matches!(err, LedgerError::ConfirmationTimeout(5)));
    let counts = recorder.counts.lock().unwrap();
    assert_eq!(
        counts.get(&format!("{}{{call_method}}", SUBMISSIONS_TOTAL)),
        Some(&1)
    );
    assert_eq!(
        counts.get(&format!("{}{{call_method}}", FAILURES_TOTAL)),
        Some(&1)
    );
}

#[test]
fn test_pool_rejection_counts_like_payment() {
    let recorder = CountingRecorder::default();

    with_recorder(&recorder, async {
        let ledger = start_mock_ledger(MockBehavior {
            pool_error: Some("overspend".to_string()),
            ..MockBehavior::default()
        })
        .await;
        let runner = ledger.runner();
        let alice = Account::generate();
        let receiver = Account::generate().address();

        assert!(runner
            .send_payment(&alice, PaymentRequest::new(receiver, 1))
            .await
            .is_err());
        assert!(runner
            .call_method(
                Arc::new(alice),
                77,
                "add(uint64,uint64)uint64",
                vec![AbiValue::Uint(2), AbiValue::Uint(3)],
            )
            .await
            .is_err());
    });

    let counts = recorder.counts.lock().unwrap();
    for operation in ["send_payment", "call_method"] {
        assert_eq!(
            counts.get(&format!("{}{{{}}}", SUBMISSIONS_TOTAL, operation)),
            Some(&1),
            "{} submissions",
            operation
        );
        assert_eq!(
            counts.get(&format!("{}{{{}}}", FAILURES_TOTAL, operation)),
            Some(&1),
            "{} failures",
            operation
        );
    }
}
