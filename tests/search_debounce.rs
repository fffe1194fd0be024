use std::sync::{Arc, Mutex};

use laptop_store_admin::{
    config::AppConfig,
    search::{Debouncer, SearchAndFilter, SearchQuery},
};
use tokio::time::{Duration, Instant, sleep};

type Seen = Arc<Mutex<Vec<(String, u128)>>>;

fn recorder(start: Instant) -> (Seen, impl Fn(SearchQuery) + Send + Sync + 'static) {
    let seen: Seen = Arc::default();
    let sink = seen.clone();
    let on_change = move |query: SearchQuery| {
        sink.lock()
            .unwrap()
            .push((query.search, start.elapsed().as_millis()));
    };
    (seen, on_change)
}

#[tokio::test(start_paused = true)]
async fn only_the_last_keystroke_of_each_idle_gap_is_reported() {
    let start = Instant::now();
    let (seen, on_change) = recorder(start);
    let window = AppConfig::for_base_url("http://localhost/api").search_debounce();
    assert_eq!(window, Duration::from_millis(300));
    let mut widget = SearchAndFilter::new(window, on_change);

    widget.on_search_input("a");
    sleep(Duration::from_millis(50)).await;
    widget.on_search_input("ab");
    sleep(Duration::from_millis(50)).await;
    widget.on_search_input("abc");
    // Display text follows every keystroke without waiting.
    assert_eq!(widget.search_text(), "abc");

    sleep(Duration::from_millis(300)).await;
    widget.on_search_input("abcd");
    sleep(Duration::from_millis(600)).await;

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![("abc".to_string(), 400), ("abcd".to_string(), 700)]
    );
}

#[tokio::test(start_paused = true)]
async fn apply_and_clear_report_immediately() {
    let start = Instant::now();
    let (seen, on_change) = recorder(start);
    let mut widget = SearchAndFilter::new(Duration::from_millis(300), on_change);

    widget.pending_filters_mut().brand = "Asus".into();
    widget.pending_filters_mut().max_price = Some(1500.0);
    // Pending edits are not reported until applied.
    assert_eq!(widget.active_filter_count(), 0);

    widget.apply_filters();
    assert_eq!(widget.active_filter_count(), 2);
    assert_eq!(widget.applied_filters().brand, "Asus");

    widget.clear();
    assert_eq!(widget.active_filter_count(), 0);
    assert_eq!(widget.search_text(), "");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![(String::new(), 0), (String::new(), 0)]);
}

#[tokio::test(start_paused = true)]
async fn debounced_report_carries_applied_filters() {
    let reports: Arc<Mutex<Vec<SearchQuery>>> = Arc::default();
    let sink = reports.clone();
    let mut widget = SearchAndFilter::new(Duration::from_millis(300), move |query| {
        sink.lock().unwrap().push(query);
    });

    widget.pending_filters_mut().category = "Gaming".into();
    widget.apply_filters();
    widget.on_search_input("rog");
    sleep(Duration::from_millis(400)).await;

    let reports = reports.lock().unwrap().clone();
    assert_eq!(reports.len(), 2);
    let last = &reports[1];
    assert_eq!(last.search, "rog");
    assert_eq!(last.filters.category, "Gaming");

    let filter = last.to_product_filter();
    assert_eq!(filter.search, "rog");
    assert_eq!(filter.category, "Gaming");
}

#[tokio::test(start_paused = true)]
async fn closing_drops_the_pending_report() {
    let start = Instant::now();
    let (seen, on_change) = recorder(start);
    let mut widget = SearchAndFilter::new(Duration::from_millis(300), on_change);

    widget.on_search_input("thinkpad");
    sleep(Duration::from_millis(100)).await;
    widget.close();
    sleep(Duration::from_secs(1)).await;

    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropped_debouncer_never_fires() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let debouncer = Debouncer::new(Duration::from_millis(300), move |value: u32| {
        sink.lock().unwrap().push(value);
    });

    debouncer.push(1);
    sleep(Duration::from_millis(10)).await;
    drop(debouncer);
    sleep(Duration::from_secs(1)).await;

    assert!(fired.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_debouncer_ignores_later_input() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let debouncer = Debouncer::new(Duration::from_millis(300), move |value: u32| {
        sink.lock().unwrap().push(value);
    });

    debouncer.push(1);
    sleep(Duration::from_millis(400)).await;
    debouncer.cancel();
    assert!(debouncer.is_cancelled());
    debouncer.push(2);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(*fired.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn clearing_discards_a_search_still_waiting_out_the_window() {
    let start = Instant::now();
    let (seen, on_change) = recorder(start);
    let mut widget = SearchAndFilter::new(Duration::from_millis(300), on_change);

    widget.on_search_input("dell");
    sleep(Duration::from_millis(100)).await;
    widget.clear();
    sleep(Duration::from_millis(500)).await;

    let searches: Vec<String> = seen.lock().unwrap().iter().map(|(s, _)| s.clone()).collect();
    assert_eq!(searches, vec![String::new()]);
    assert_eq!(widget.search_text(), "");

    // Typing again after a clear is debounced as usual.
    widget.on_search_input("hp");
    sleep(Duration::from_millis(400)).await;
    let searches: Vec<String> = seen.lock().unwrap().iter().map(|(s, _)| s.clone()).collect();
    assert_eq!(searches, vec![String::new(), "hp".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn reset_drops_the_pending_value_but_keeps_the_debouncer_alive() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    let debouncer = Debouncer::new(Duration::from_millis(300), move |value: u32| {
        sink.lock().unwrap().push(value);
    });

    debouncer.push(1);
    sleep(Duration::from_millis(50)).await;
    debouncer.reset();
    sleep(Duration::from_millis(500)).await;
    assert!(fired.lock().unwrap().is_empty());
    assert!(!debouncer.is_cancelled());

    debouncer.push(2);
    sleep(Duration::from_millis(400)).await;
    assert_eq!(*fired.lock().unwrap(), vec![2]);
}
