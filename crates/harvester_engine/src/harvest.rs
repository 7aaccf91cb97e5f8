//! IO side of a list harvest: feeds screen batches into
//! [`HarvestState`] and scrolls until it says stop.
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use harvester_core::{Harvest, HarvestLimits, HarvestState, Identity, Row, Step, TerminationSignal};

use crate::device::Device;
use crate::pacer::Pacer;
use crate::types::{DriverError, Element, ScrollAxis, Selector, SwipeDirection};

const MIN_POLL: Duration = Duration::from_millis(1);

/// A scrollable list on screen.
pub trait ListSource {
    /// Rows currently rendered. Zero matches is an empty batch, not an error.
    fn read_batch(&mut self, pacer: &mut dyn Pacer) -> Result<Vec<Row>, DriverError>;

    /// One bounded advance of the list.
    fn scroll(&mut self, pacer: &mut dyn Pacer) -> Result<(), DriverError>;
}

/// Runs one harvest to completion.
///
/// Driver misses and timeouts are absorbed (an empty batch, a skipped
/// scroll); any other driver failure aborts the harvest.
pub fn harvest(
    source: &mut dyn ListSource,
    limits: HarvestLimits,
    pacer: &mut dyn Pacer,
    label: &str,
) -> Result<Harvest, DriverError> {
    let poll = limits.poll_interval.max(MIN_POLL);
    let startup_timeout = limits.startup_timeout;
    let mut state = HarvestState::new(limits);

    let mut waited = Duration::ZERO;
    let mut batch = loop {
        let batch = read(source, pacer)?;
        if !batch.is_empty() {
            break batch;
        }
        if waited >= startup_timeout {
            engine_info!("{label}: nothing showed up within {startup_timeout:?}");
            state.abandon(TerminationSignal::SourceExhausted);
            return Ok(state.into_harvest());
        }
        pacer.pause(poll);
        waited += poll;
    };

    loop {
        match state.observe(batch) {
            Step::Scroll => {
                engine_debug!("{label}: {}", state.found().len());
                advance(source, pacer)?;
                pacer.pause(poll);
                batch = read(source, pacer)?;
            }
            Step::Recapture => {
                let last = read(source, pacer)?;
                state.recapture(last);
                break;
            }
            Step::Finish(_) => break,
        }
    }

    let result = state.into_harvest();
    engine_info!("{label}: {} ({:?})", result.len(), result.signal);
    Ok(result)
}

fn read(source: &mut dyn ListSource, pacer: &mut dyn Pacer) -> Result<Vec<Row>, DriverError> {
    match source.read_batch(pacer) {
        Ok(batch) => Ok(batch),
        Err(err) if err.is_transient() => {
            engine_debug!("read skipped: {err}");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

fn advance(source: &mut dyn ListSource, pacer: &mut dyn Pacer) -> Result<(), DriverError> {
    match source.scroll(pacer) {
        Err(err) if err.is_transient() => {
            engine_debug!("scroll skipped: {err}");
            Ok(())
        }
        other => other,
    }
}

/// How an identity is read off a matched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The whole text, trimmed.
    Text,
    /// First whitespace-separated word of the text ("alice liked your photo.").
    FirstWord,
    /// The n-th word of the content description.
    DescriptionWord(usize),
}

impl Extract {
    pub fn apply(self, element: &Element) -> Option<Identity> {
        let word = match self {
            Extract::Text => element.text.as_deref().map(str::trim),
            Extract::FirstWord => element
                .text
                .as_deref()
                .and_then(|text| text.split_whitespace().next()),
            Extract::DescriptionWord(n) => element
                .description
                .as_deref()
                .and_then(|text| text.split_whitespace().nth(n)),
        }?;
        (!word.is_empty()).then(|| Identity::new(word))
    }
}

/// A list read straight from matched rows of the current screen.
pub struct ScreenList<'d, D: ?Sized> {
    device: &'d D,
    rows: Selector,
    extract: Extract,
    sentinel: Option<Selector>,
    scroll_over: Selector,
    min_rows: usize,
    retry: Option<(Selector, Duration)>,
    stay_on: Option<(Selector, String)>,
}

impl<'d, D: Device + ?Sized> ScreenList<'d, D> {
    /// Reads `rows` and scrolls by dragging across the `rows` matches.
    pub fn new(device: &'d D, rows: Selector) -> Self {
        Self {
            device,
            scroll_over: rows.clone(),
            rows,
            extract: Extract::Text,
            sentinel: None,
            min_rows: 2,
            retry: None,
            stay_on: None,
        }
    }

    pub fn extract(mut self, extract: Extract) -> Self {
        self.extract = extract;
        self
    }

    /// Marks the end of the list once visible.
    pub fn sentinel(mut self, selector: Selector) -> Self {
        self.sentinel = Some(selector);
        self
    }

    /// Uses other matches than the rows for the scroll geometry.
    pub fn scroll_over(mut self, selector: Selector) -> Self {
        self.scroll_over = selector;
        self
    }

    /// Below this many visible rows a scroll is skipped.
    pub fn min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows.max(1);
        self
    }

    /// Presses `control` after `pause` whenever the list failed to load.
    pub fn retry(mut self, control: Selector, pause: Duration) -> Self {
        self.retry = Some((control, pause));
        self
    }

    /// Presses back whenever `title` stops reading `expected`.
    pub fn stay_on(mut self, title: Selector, expected: impl Into<String>) -> Self {
        self.stay_on = Some((title, expected.into()));
        self
    }

    fn restore_screen(&self) -> Result<(), DriverError> {
        let Some((title, expected)) = &self.stay_on else {
            return Ok(());
        };
        if let Some(current) = self.device.elements(title)?.first() {
            if current.text_or_empty() != expected {
                engine_debug!("left {expected:?} for {:?}, going back", current.text_or_empty());
                self.device.press_back()?;
            }
        }
        Ok(())
    }
}

impl<D: Device + ?Sized> ListSource for ScreenList<'_, D> {
    fn read_batch(&mut self, pacer: &mut dyn Pacer) -> Result<Vec<Row>, DriverError> {
        self.restore_screen()?;
        if let Some((control, pause)) = &self.retry {
            if self.device.exists(control)? {
                engine_debug!("list failed to load, retrying in {pause:?}");
                pacer.pause(*pause);
                self.device.click(control, Duration::ZERO)?;
            }
        }

        let mut batch: Vec<Row> = self
            .device
            .elements(&self.rows)?
            .iter()
            .filter_map(|element| self.extract.apply(element))
            .map(Row::Item)
            .collect();
        if let Some(sentinel) = &self.sentinel {
            if self.device.exists(sentinel)? {
                batch.push(Row::Sentinel);
            }
        }
        Ok(batch)
    }

    fn scroll(&mut self, _pacer: &mut dyn Pacer) -> Result<(), DriverError> {
        scroll_across(self.device, &self.scroll_over, self.min_rows)
    }
}

/// Drags the last match of `selector` onto the first one, falling back to a
/// swipe inside the first match when the two edges line up.
pub(crate) fn scroll_across<D: Device + ?Sized>(
    device: &D,
    selector: &Selector,
    min_rows: usize,
) -> Result<(), DriverError> {
    let rows = device.elements(selector)?;
    if rows.len() < min_rows {
        return Ok(());
    }
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Ok(());
    };
    match device.compute_scroll_vector(&first.bounds, &last.bounds, ScrollAxis::Vertical) {
        Some(gesture) => device.swipe(&gesture),
        None => device.swipe_within(selector, SwipeDirection::Up),
    }
}
