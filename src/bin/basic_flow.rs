//! Reference dataflow: double, minus-one, stringify, peek
//!
//! Runs the chain twice: once over a clean numeric stream, then over a
//! stream ending in a string record to show how a callback failure is
//! reported.

use anyhow::Result;
use epochflow::{CallbackError, Dataflow, Executor, IteratorSource, Value};
use serde_json::json;
use tracing_subscriber::EnvFilter;

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

fn stringy(value: Value) -> Result<Value, CallbackError> {
    Ok(json!(format!("<dance>{value}</dance>")))
}

fn peek(value: &Value) -> Result<(), CallbackError> {
    println!("peekin at {value}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Clean run: every record survives the chain.
    let numbers = IteratorSource::from_pairs((0..5).map(|n| (0, json!(n))));
    let flow = Dataflow::named("basic", numbers)
        .map(double)
        .map(minus_one)
        .map(stringy)
        .inspect(peek);

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    let report = executor.build_and_run()?;
    println!("run finished: {}", serde_json::to_string_pretty(&report)?);

    // Same chain, but the last record is a string the first map rejects.
    let mixed = IteratorSource::from_pairs(
        (0..5)
            .map(|n| (0, json!(n)))
            .chain(std::iter::once((0, json!("a")))),
    );
    let flow = Dataflow::named("basic-bad-input", mixed)
        .map(double)
        .map(minus_one)
        .map(stringy)
        .inspect(peek);

    let mut executor = Executor::new();
    executor.add_dataflow(flow);
    match executor.build_and_run() {
        Ok(_) => println!("unexpectedly clean run"),
        Err(err) => println!("run failed: {err}"),
    }

    Ok(())
}
