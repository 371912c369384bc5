use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting(window: Duration) -> (Debouncer, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let debouncer = Debouncer::spawn(window, move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    (debouncer, fired)
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn single_trigger_fires_after_window() {
    let (debouncer, fired) = counting(Duration::from_millis(500));
    debouncer.trigger();

    sleep_ms(499).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    sleep_ms(2).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rapid_triggers_collapse_into_one() {
    let (debouncer, fired) = counting(Duration::from_millis(500));
    for _ in 0..5 {
        debouncer.trigger();
        sleep_ms(100).await;
    }

    // Last trigger at t=400ms, so nothing before t=900ms.
    sleep_ms(350).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    sleep_ms(100).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    sleep_ms(2_000).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn separated_bursts_fire_separately() {
    let (debouncer, fired) = counting(Duration::from_millis(500));
    debouncer.trigger();
    sleep_ms(600).await;
    debouncer.trigger();
    debouncer.trigger();
    sleep_ms(600).await;
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn drop_abandons_pending_window() {
    let (debouncer, fired) = counting(Duration::from_millis(500));
    debouncer.trigger();
    sleep_ms(100).await;
    drop(debouncer);

    sleep_ms(1_000).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
