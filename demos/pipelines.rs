//! Reactive pipeline walkthrough — every primitive, one at a time.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example pipelines

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use brook::{Solo, Stream, failure};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    solo_pipeline().await;
    solo_supplier_divergence().await;
    stream_pipeline().await;
    observing_events().await;
    generator().await;
    ticks().await;
}

// A Solo emits exactly one item or one failure. Pipelines are lazy: nothing
// runs until subscribe, and the delay hands the continuation to the timer,
// so main keeps going while the pipeline finishes elsewhere.
async fn solo_pipeline() {
    let handle = Solo::of(1)
        .transform(|i| {
            println!("t1 on {:?}", std::thread::current().id());
            format!("hello{i}")
        })
        .delay(Duration::from_millis(300))
        .invoke(|_| println!("t2 on {:?}", std::thread::current().id()))
        .subscribe_with(
            |item| println!("finished: {item} on {:?}", std::thread::current().id()),
            |e| println!("finished: failed with {e}"),
        );

    println!("main continues while the pipeline sleeps (cancelled: {})", handle.is_cancelled());
    tokio::time::sleep(Duration::from_millis(400)).await;
}

// The supplier runs once per subscription, so each subscriber gets a
// different value out of the shared counter.
async fn solo_supplier_divergence() {
    let counter = Arc::new(AtomicUsize::new(0));
    let shared = Arc::clone(&counter);
    let numbered = Solo::from_supplier(move || shared.fetch_add(1, Ordering::SeqCst));

    println!("first subscriber saw  {}", numbered.clone().await.unwrap());
    println!("second subscriber saw {}", numbered.await.unwrap());
}

// A Stream emits 0..n items then completes or fails. The recovery stage is
// inert here since nothing fails upstream.
async fn stream_pipeline() {
    let doubled = Stream::from_items([1, 2, 3, 4, 5])
        .transform(|i| {
            println!("transform: {i}");
            i * 2
        })
        .select_first(3)
        .recover_with_item(|| 0);

    println!("subscribing");
    println!("{:?}", doubled.collect_to_vec().await.unwrap());

    // with an actual failure, recovery substitutes one item then completes
    let recovered = Stream::<i32>::failure(failure::message("boom"))
        .recover_with_item(|| 0)
        .collect_to_vec()
        .await
        .unwrap();
    println!("recovered: {recovered:?}");
}

// Lifecycle hooks are pure side channels: they observe the transitions
// without altering the events.
async fn observing_events() {
    let handle = Stream::from_items([1, 2, 3])
        .on_subscription(|| println!("⬇ subscribed"))
        .on_item(|i| println!("⬇ received item: {i}"))
        .on_failure(|e| println!("⬇ failed with {e}"))
        .on_completion(|| println!("⬇ completed"))
        .on_cancellation(|| println!("⬆ cancelled"))
        .on_request(|n| println!("⬆ requested: {n}"))
        .subscribe(|i| println!("finished {i}"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(handle);
}

// The generator is the general recursive-sequence constructor: the step
// function decides per call whether to emit or complete, and returns the
// next state.
async fn generator() {
    let sequence = Stream::generate(
        || 1,
        |n, em| {
            let next = n + n / 2 + 1;
            if n < 50 {
                em.emit(next);
            } else {
                em.complete();
            }
            next
        },
    );
    for n in sequence.collect_to_vec().await.unwrap() {
        print!("{n} ");
    }
    println!();
}

// Ticks are infinite; the subscription ends when the consumer cancels.
async fn ticks() {
    let ticking = Stream::ticks(Duration::from_millis(100)).subscribe(|n| println!("tick {n}"));
    tokio::time::sleep(Duration::from_millis(350)).await;
    ticking.cancel();
    println!("ticks cancelled");
}
