mod support;

use std::collections::VecDeque;
use std::time::Duration;

use harvester_core::{HarvestLimits, Row, TerminationSignal};
use harvester_engine::{
    catalog::{ids, texts, Catalog},
    harvest, Bounds, Device, DriverError, ListSource, Pacer, Point, ScreenList, ScrollAxis,
    Selector,
};
use pretty_assertions::assert_eq;

use support::{at, init_logging, text, FakeDevice, RecordingPacer};

/// Replays batches in order; once the script runs out every read is empty.
struct ScriptedList {
    reads: VecDeque<Result<Vec<Row>, DriverError>>,
    scrolls: usize,
    scroll_error: Option<DriverError>,
}

impl ScriptedList {
    fn new(reads: Vec<Result<Vec<Row>, DriverError>>) -> Self {
        Self {
            reads: reads.into(),
            scrolls: 0,
            scroll_error: None,
        }
    }

    fn pages(pages: &[&[&str]]) -> Self {
        Self::new(pages.iter().map(|page| Ok(rows(page))).collect())
    }
}

impl ListSource for ScriptedList {
    fn read_batch(&mut self, _pacer: &mut dyn Pacer) -> Result<Vec<Row>, DriverError> {
        self.reads.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn scroll(&mut self, _pacer: &mut dyn Pacer) -> Result<(), DriverError> {
        self.scrolls += 1;
        match &self.scroll_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn rows(values: &[&str]) -> Vec<Row> {
    values
        .iter()
        .map(|v| {
            if *v == "SENTINEL" {
                Row::Sentinel
            } else {
                Row::item(*v)
            }
        })
        .collect()
}

fn limits(amount: Option<usize>) -> HarvestLimits {
    HarvestLimits {
        amount,
        max_stalls: 3,
        startup_timeout: Duration::from_secs(3),
        poll_interval: Duration::from_secs(1),
    }
}

#[test]
fn overlapping_pages_stop_at_the_requested_amount() {
    init_logging();
    let mut source = ScriptedList::pages(&[
        &["a", "b"],
        &["b", "c"],
        &["c", "d"],
        &["d", "e"],
        &["SENTINEL", "f"],
    ]);
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(Some(5)), &mut pacer, "Followers").unwrap();

    assert_eq!(result.names(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(result.signal, TerminationSignal::CountThreshold);
    assert_eq!(source.scrolls, 3);
}

#[test]
fn sentinel_triggers_one_last_read() {
    init_logging();
    let mut source = ScriptedList::pages(&[&["a", "b"], &["c", "SENTINEL"], &["c", "d"], &["x"]]);
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(None), &mut pacer, "Following").unwrap();

    assert_eq!(result.names(), vec!["a", "b", "c", "d"]);
    assert_eq!(result.signal, TerminationSignal::SentinelRowSeen);
    assert_eq!(source.scrolls, 1);
}

#[test]
fn startup_waits_for_the_first_rows() {
    init_logging();
    let mut source = ScriptedList::pages(&[&[], &[], &["a", "SENTINEL"]]);
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(None), &mut pacer, "Notifications").unwrap();

    assert_eq!(result.names(), vec!["a"]);
    assert_eq!(&pacer.pauses[..2], &[Duration::from_secs(1), Duration::from_secs(1)]);
}

#[test]
fn empty_screen_gives_up_after_the_startup_timeout() {
    init_logging();
    let mut source = ScriptedList::pages(&[]);
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(None), &mut pacer, "Hashtags").unwrap();

    assert!(result.is_empty());
    assert_eq!(result.signal, TerminationSignal::SourceExhausted);
    assert_eq!(pacer.pauses.len(), 3);
    assert_eq!(source.scrolls, 0);
}

#[test]
fn stalled_list_ends_with_what_was_collected() {
    init_logging();
    let page: &[&str] = &["a", "b"];
    let mut source = ScriptedList::pages(&[page; 10]);
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(None), &mut pacer, "Least interacted").unwrap();

    assert_eq!(result.names(), vec!["a", "b"]);
    assert_eq!(result.signal, TerminationSignal::NoProgress);
    assert_eq!(source.scrolls, 3);
}

#[test]
fn transient_misses_are_absorbed() {
    init_logging();
    let mut source = ScriptedList::new(vec![
        Ok(rows(&["a"])),
        Err(DriverError::NotFound("[id=row]".to_string())),
        Ok(rows(&["b", "SENTINEL"])),
        Ok(rows(&["b"])),
    ]);
    source.scroll_error = Some(DriverError::Timeout {
        what: "rows".to_string(),
        after: Duration::from_secs(1),
    });
    let mut pacer = RecordingPacer::default();

    let result = harvest(&mut source, limits(None), &mut pacer, "Followers").unwrap();

    assert_eq!(result.names(), vec!["a", "b"]);
    assert_eq!(result.signal, TerminationSignal::SentinelRowSeen);
}

#[test]
fn device_failures_end_the_harvest() {
    init_logging();
    let mut source = ScriptedList::new(vec![
        Ok(rows(&["a"])),
        Err(DriverError::Device("adb went away".to_string())),
    ]);
    let mut pacer = RecordingPacer::default();

    let err = harvest(&mut source, limits(None), &mut pacer, "Followers").unwrap_err();

    assert_eq!(err, DriverError::Device("adb went away".to_string()));
}

#[test]
fn screen_list_reads_rows_and_the_end_marker() {
    init_logging();
    let catalog = Catalog::new("com.example.app");
    let device = FakeDevice::installed("1.0");
    let username = catalog.id(ids::FOLLOW_LIST_USERNAME);
    let header = catalog
        .id(ids::ROW_HEADER)
        .with_text(texts::SUGGESTIONS_FOR_YOU);
    device
        .show(username.clone(), vec![text("alice"), text(" bob "), text("")])
        .show(header.clone(), vec![text(texts::SUGGESTIONS_FOR_YOU)]);

    let mut source = ScreenList::new(&device, username).sentinel(header);
    let mut pacer = RecordingPacer::default();
    let result = harvest(&mut source, limits(None), &mut pacer, "Followers").unwrap();

    assert_eq!(result.names(), vec!["alice", "bob"]);
    assert_eq!(result.signal, TerminationSignal::SentinelRowSeen);
}

#[test]
fn screen_list_presses_retry_after_a_pause() {
    init_logging();
    let device = FakeDevice::installed("1.0");
    let rows_selector = Selector::resource_id("rows");
    let retry = Selector::description(texts::RETRY);
    device
        .show(rows_selector.clone(), vec![text("alice")])
        .show(retry.clone(), vec![text("")])
        .on_click(retry.clone(), support::Reaction::Hide(retry.clone()));

    let mut source = ScreenList::new(&device, rows_selector)
        .retry(retry, Duration::from_secs(10))
        .sentinel(Selector::resource_id("rows"));
    let mut pacer = RecordingPacer::default();
    harvest(&mut source, limits(None), &mut pacer, "Followers").unwrap();

    assert_eq!(pacer.pauses.first(), Some(&Duration::from_secs(10)));
    assert!(device.called("click [desc=\"Retry\"]"));
}

#[test]
fn vertical_scroll_drags_the_last_row_onto_the_first() {
    let device = FakeDevice::installed("1.0");
    let first = Bounds::new(0, 100, 400, 200);
    let last = Bounds::new(0, 500, 400, 600);

    let gesture = device
        .compute_scroll_vector(&first, &last, ScrollAxis::Vertical)
        .unwrap();

    assert_eq!(gesture.from, Point { x: 200, y: 500 });
    assert_eq!(gesture.to, Point { x: 200, y: 200 });
}

#[test]
fn horizontal_scroll_follows_the_left_edges() {
    let device = FakeDevice::installed("1.0");
    let first = Bounds::new(0, 200, 100, 300);
    let last = Bounds::new(300, 200, 400, 300);

    let gesture = device
        .compute_scroll_vector(&first, &last, ScrollAxis::Horizontal)
        .unwrap();

    assert_eq!(gesture.from, Point { x: 300, y: 200 });
    assert_eq!(gesture.to, Point { x: 0, y: 300 });
}

#[test]
fn touching_rows_give_no_gesture() {
    let device = FakeDevice::installed("1.0");
    let first = Bounds::new(0, 0, 400, 100);
    let last = Bounds::new(0, 100, 400, 200);

    assert_eq!(
        device.compute_scroll_vector(&first, &last, ScrollAxis::Vertical),
        None
    );
}

#[test]
fn screen_list_scrolls_with_the_computed_gesture() {
    init_logging();
    let device = FakeDevice::installed("1.0");
    let rows_selector = Selector::resource_id("rows");
    device.show(
        rows_selector.clone(),
        vec![
            at(Bounds::new(0, 100, 400, 200)),
            at(Bounds::new(0, 500, 400, 600)),
        ],
    );

    let mut source = ScreenList::new(&device, rows_selector);
    source.scroll(&mut RecordingPacer::default()).unwrap();

    assert_eq!(device.calls(), vec!["swipe 200,500 -> 200,200".to_string()]);
}

#[test]
fn screen_list_swipes_inside_the_list_when_rows_touch() {
    init_logging();
    let device = FakeDevice::installed("1.0");
    let rows_selector = Selector::resource_id("rows");
    device.show(
        rows_selector.clone(),
        vec![
            at(Bounds::new(0, 0, 400, 100)),
            at(Bounds::new(0, 100, 400, 200)),
        ],
    );

    let mut source = ScreenList::new(&device, rows_selector);
    source.scroll(&mut RecordingPacer::default()).unwrap();

    assert_eq!(device.calls(), vec!["swipe_within [id=rows] Up".to_string()]);
}

#[test]
fn too_few_rows_skip_the_scroll_and_stall() {
    init_logging();
    let device = FakeDevice::installed("1.0");
    let rows_selector = Selector::resource_id("rows");
    device.show(rows_selector.clone(), vec![text("alice")]);

    let mut source = ScreenList::new(&device, rows_selector).min_rows(2);
    let mut pacer = RecordingPacer::default();
    let result = harvest(&mut source, limits(None), &mut pacer, "Followers").unwrap();

    assert_eq!(result.names(), vec!["alice"]);
    assert_eq!(result.signal, TerminationSignal::NoProgress);
    assert!(!device.called("swipe"));
}

#[test]
fn screen_list_goes_back_when_the_title_drifts() {
    init_logging();
    let device = FakeDevice::installed("1.0");
    let rows_selector = Selector::resource_id("rows");
    let title = Selector::resource_id("title");
    device
        .show(rows_selector.clone(), vec![text("#rustlang")])
        .show(title.clone(), vec![text("rustlang")]);

    let mut source = ScreenList::new(&device, rows_selector).stay_on(title.clone(), "Hashtags");
    let mut pacer = RecordingPacer::default();
    source.read_batch(&mut pacer).unwrap();
    assert_eq!(device.count("back"), 1);

    device.show(title, vec![text("Hashtags")]);
    source.read_batch(&mut pacer).unwrap();
    assert_eq!(device.count("back"), 1);
}
