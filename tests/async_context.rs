// SPDX-License-Identifier: MIT OR Apache-2.0
//! Context carried by futures.

use logaware::context::{self, Context, ContextFutureExt};
use logaware::{AwareLogger, ContextValue, InMemoryLogger, Level};
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Poll, Waker};

/// Polls a future that never waits on anything external.
fn run<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let mut cx = std::task::Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
    }
}

#[test_executors::async_test]
async fn log_async_carries_context() {
    let memory = Arc::new(InMemoryLogger::new());
    let log = AwareLogger::new().with_logger(memory.clone());
    let record = async {
        log.log_async(
            Level::Info,
            logaware::location!(),
            "step {n}",
            logaware::fields!(n = 2),
        )
        .await
    }
    .in_context(logaware::fields!(job = "import"))
    .await
    .unwrap();

    assert_eq!(record.message(), "step 2");
    assert_eq!(record.field("job"), Some(&ContextValue::from("import")));
    assert_eq!(memory.len(), 1);
}

#[test]
fn future_keeps_context_on_another_thread() {
    Context::reset();
    let memory = Arc::new(InMemoryLogger::new());
    let log = AwareLogger::new().with_logger(memory.clone());

    let future = {
        let _scope = logaware::scope!(request_id = "r-11");
        async move {
            logaware::info!(log, "handled");
        }
        .in_current_context()
    };
    assert!(context::current().is_empty());

    std::thread::spawn(move || {
        run(future);
        assert!(context::current().is_empty());
    })
    .join()
    .unwrap();

    let record = &memory.drain_records()[0];
    assert_eq!(record.field("request_id"), Some(&ContextValue::from("r-11")));
}

#[test]
fn scope_inside_future_does_not_leak() {
    Context::reset();
    let _outer = logaware::scope!(service = "api");
    let seen = run(
        async {
            let _inner = logaware::scope!(job = 1);
            context::current()
        }
        .in_context(logaware::fields!(task = "sync")),
    );
    assert_eq!(seen, logaware::fields!(job = 1, service = "api", task = "sync"));
    assert_eq!(context::current(), logaware::fields!(service = "api"));
}
