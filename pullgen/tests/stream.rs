#![cfg(all(feature = "stream", feature = "macros"))]

use std::time::{Duration, Instant};

use futures_util::{stream::FusedStream, StreamExt};
use pullgen::{adapters::map, generator, LazyGenerator, Status, Yielder};

#[generator(lazy)]
fn countdown(from: u32) -> u32 {
    for i in (0..from).rev() {
        tokio::time::sleep(Duration::from_millis(20)).await;
        yield_!(i);
    }
}

#[tokio::test]
async fn producer_awaits_a_timer() {
    let start = Instant::now();
    let values: Vec<u32> = countdown(3).map(Result::unwrap).collect().await;
    assert_eq!(values, [2, 1, 0]);
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn failure_is_the_last_item() {
    let mut gen = LazyGenerator::new(|co: Yielder<u32, String>| async move {
        co.produce(7).await;
        Err("closed".to_string())
    });

    assert_eq!(gen.next().await, Some(Ok(7)));
    assert_eq!(gen.next().await, Some(Err("closed".to_string())));
    assert!(gen.is_terminated());
    assert_eq!(gen.next().await, None);
    assert_eq!(gen.status(), Status::Terminated);
}

#[tokio::test]
async fn chained_producer_passes_pending_through() {
    let mut doubled = map(countdown(4), |i| i * 2);
    let mut out = vec![];
    while let Some(item) = doubled.next().await {
        out.push(item.unwrap());
    }
    assert_eq!(out, [6, 4, 2, 0]);
}

#[tokio::test]
async fn producer_receives_from_a_channel() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    let received = LazyGenerator::new(move |co: Yielder<String>| async move {
        while let Some(message) = rx.recv().await {
            co.produce(message).await;
        }
        Ok(())
    });

    tokio::spawn(async move {
        for word in ["pull", "driven"] {
            tx.send(word.to_string()).await.unwrap();
        }
    });

    let words: Vec<String> = received.map(Result::unwrap).collect().await;
    assert_eq!(words, ["pull", "driven"]);
}

#[tokio::test]
async fn disengaged_handle_is_an_empty_stream() {
    let mut gen = countdown(2);
    let moved = LazyGenerator::take(&mut gen);
    assert_eq!(gen.status(), Status::Disengaged);
    assert!(gen.is_terminated());
    assert_eq!(gen.next().await, None);

    let rest: Vec<_> = moved.collect().await;
    assert_eq!(rest, [Ok(1), Ok(0)]);
}
