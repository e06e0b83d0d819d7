//! End-to-end dataflow scenarios driven through the public API
//!
//! Covers the execution contract a flow author relies on:
//! - Chain order is call order, record by record
//! - Drops are final and short-circuit the chain
//! - Inspect stages are identity taps
//! - Frontier tracking over repeated and advancing epochs
//! - Callback failure and epoch regression reporting
//! - Empty sources

use epochflow::{
    CallbackError, Dataflow, EngineError, Executor, FlowStats, FrontierError, IteratorSource,
    OperatorError, Value,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn double(value: Value) -> Result<Value, CallbackError> {
    match value.as_i64() {
        Some(n) => Ok(json!(n * 2)),
        None => Err(format!("cannot double {value}").into()),
    }
}

fn minus_one(value: Value) -> Result<Value, CallbackError> {
    match value.as_i64() {
        Some(n) => Ok(json!(n - 1)),
        None => Err(format!("cannot subtract from {value}").into()),
    }
}

#[test]
fn test_map_chain_transforms_in_declared_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "doubles",
        IteratorSource::from_pairs(vec![(0, 0), (0, 1), (0, 2)]),
    )
    .map(double)
    .map(minus_one)
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    // 0,1,2 doubled then decremented: -1, 1, 3 in source order.
    assert_eq!(*seen.lock().unwrap(), vec![json!(-1), json!(1), json!(3)]);
    assert_eq!(report.flows[0].stats.records_completed, 3);
    assert_eq!(report.flows[0].frontier, Some(0));
}

#[test]
fn test_operator_order_is_call_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let flow = Dataflow::named("double-first", IteratorSource::from_pairs(vec![(0, 3)]))
        .map(double)
        .map(minus_one)
        .inspect(move |v| {
            sink.lock().unwrap().push(v.clone());
            Ok(())
        });
    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    executor.build_and_run().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![json!(5)]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let flow = Dataflow::named("minus-first", IteratorSource::from_pairs(vec![(0, 3)]))
        .map(minus_one)
        .map(double)
        .inspect(move |v| {
            sink.lock().unwrap().push(v.clone());
            Ok(())
        });
    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    executor.build_and_run().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![json!(4)]);
}

#[test]
fn test_callback_failure_reports_position_epoch_and_value() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "bad-record",
        IteratorSource::from_pairs(vec![(0, json!(0)), (0, json!(1)), (0, json!("a"))]),
    )
    .map(double)
    .map(minus_one)
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let err = executor.build_and_run().unwrap_err();

    match err {
        EngineError::Operator(OperatorError::Callback {
            index,
            operator,
            epoch,
            value,
            source,
        }) => {
            assert_eq!(index, 0);
            assert_eq!(operator, "map");
            assert_eq!(epoch, 0);
            assert_eq!(value, json!("a"));
            assert!(source.to_string().contains("cannot double"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Records ahead of the failure were fully processed; nothing is rolled back.
    assert_eq!(*seen.lock().unwrap(), vec![json!(-1), json!(1)]);
}

#[test]
fn test_mid_chain_failure_reports_transformed_value() {
    let flow = Dataflow::named("capped", IteratorSource::from_pairs(vec![(0, 3)]))
        .map(double)
        .map(|v| match v.as_i64() {
            Some(n) if n < 5 => Ok(json!(n)),
            _ => Err(format!("too large: {v}").into()),
        });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let err = executor.build_and_run().unwrap_err();

    match err {
        EngineError::Operator(OperatorError::Callback {
            index,
            operator,
            epoch,
            value,
            source,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(operator, "map");
            assert_eq!(epoch, 0);
            // The failing map received the doubled value, not the record
            // the source produced.
            assert_eq!(value, json!(6));
            assert!(source.to_string().contains("too large"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_drops_are_final() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "evens-only",
        IteratorSource::from_pairs(vec![(0, 1), (0, 2), (0, 3), (0, 4)]),
    )
    .filter(|v| Ok(v.as_i64().unwrap_or(0) % 2 == 0))
    .map(double)
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![json!(4), json!(8)]);
    assert_eq!(report.flows[0].stats.records_dropped, 2);
    assert_eq!(report.flows[0].stats.records_completed, 2);
}

#[test]
fn test_inspect_does_not_change_downstream_values() {
    let plain = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&plain);
    let flow = Dataflow::named("plain", IteratorSource::from_pairs(vec![(0, 3), (0, 4)]))
        .map(double)
        .map(minus_one)
        .inspect(move |v| {
            sink.lock().unwrap().push(v.clone());
            Ok(())
        });
    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    executor.build_and_run().unwrap();

    let tapped = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&tapped);
    let flow = Dataflow::named("tapped", IteratorSource::from_pairs(vec![(0, 3), (0, 4)]))
        .map(double)
        .inspect(|_| Ok(()))
        .inspect_epoch(|_, _| Ok(()))
        .map(minus_one)
        .inspect(move |v| {
            sink.lock().unwrap().push(v.clone());
            Ok(())
        });
    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    executor.build_and_run().unwrap();

    assert_eq!(*plain.lock().unwrap(), *tapped.lock().unwrap());
}

#[test]
fn test_frontier_tracks_monotonic_epochs() {
    let epochs = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&epochs);

    let flow = Dataflow::named(
        "monotonic",
        IteratorSource::from_pairs(vec![(0, 1), (0, 2), (0, 3), (1, 4), (1, 5), (2, 6)]),
    )
    .inspect_epoch(move |epoch, _| {
        sink.lock().unwrap().push(epoch);
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    // Records run strictly in source order, so the epoch trail never dips.
    assert_eq!(*epochs.lock().unwrap(), vec![0, 0, 0, 1, 1, 2]);
    assert_eq!(report.flows[0].frontier, Some(2));
    assert_eq!(report.flows[0].stats.records_pulled, 6);
}

#[test]
fn test_epoch_regression_aborts_before_processing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "regressing",
        IteratorSource::from_pairs(vec![(1, "first"), (0, "late")]),
    )
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let err = executor.build_and_run().unwrap_err();

    match err {
        EngineError::Frontier(FrontierError::EpochRegression {
            frontier,
            offending,
        }) => {
            assert_eq!(frontier, 1);
            assert_eq!(offending, 0);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The offending record never reached the chain.
    assert_eq!(*seen.lock().unwrap(), vec![json!("first")]);
}

#[test]
fn test_flat_map_fans_out_and_drops_empty() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "words",
        IteratorSource::from_pairs(vec![(0, "a b"), (0, ""), (1, "c")]),
    )
    .flat_map(|v| {
        let words = v.as_str().unwrap_or("").split_whitespace();
        Ok(words.map(|w| json!(w)).collect())
    })
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![json!("a"), json!("b"), json!("c")]
    );
    assert_eq!(report.flows[0].stats.records_dropped, 1);
    assert_eq!(report.flows[0].stats.records_completed, 2);
}

#[test]
fn test_filter_map_parses_and_drops() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let flow = Dataflow::named(
        "parsed",
        IteratorSource::from_pairs(vec![(0, "12"), (0, "x"), (1, "30")]),
    )
    .filter_map(|v| {
        Ok(v.as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| json!(n)))
    })
    .inspect(move |v| {
        sink.lock().unwrap().push(v.clone());
        Ok(())
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![json!(12), json!(30)]);
    assert_eq!(report.flows[0].stats.records_dropped, 1);
}

#[test]
fn test_empty_source_completes_immediately() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&calls);

    let flow = Dataflow::named("empty", IteratorSource::empty()).map(move |v| {
        *counter.lock().unwrap() += 1;
        Ok(v)
    });

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run().unwrap();

    assert_eq!(*calls.lock().unwrap(), 0);
    assert_eq!(report.flows[0].frontier, None);
    assert_eq!(report.flows[0].stats, FlowStats::default());
}
