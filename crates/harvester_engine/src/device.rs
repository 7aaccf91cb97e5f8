//! The UI driver this crate consumes. The host environment implements
//! [`Device`]; nothing in here talks to a phone directly.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::types::{
    AppInfo, Bounds, DriverError, Element, Point, ScrollAxis, ScrollVector, Selector,
    SwipeDirection,
};

const WAIT_POLL: Duration = Duration::from_millis(200);

pub trait Device {
    fn exists(&self, selector: &Selector) -> Result<bool, DriverError>;

    /// All current matches, in screen order. No match is an empty vector.
    fn elements(&self, selector: &Selector) -> Result<Vec<Element>, DriverError>;

    /// Descendants of the first `parent` match that satisfy `child`.
    fn children(&self, parent: &Selector, child: &Selector) -> Result<Vec<Element>, DriverError>;

    /// Clicks the first match, waiting up to `timeout` for it to appear.
    fn click(&self, selector: &Selector, timeout: Duration) -> Result<(), DriverError>;

    fn click_at(&self, point: Point) -> Result<(), DriverError>;

    fn long_click(&self, selector: &Selector, hold: Duration) -> Result<(), DriverError>;

    fn send_keys(&self, selector: &Selector, text: &str) -> Result<(), DriverError>;

    fn swipe(&self, gesture: &ScrollVector) -> Result<(), DriverError>;

    /// Swipes inside the first match of `selector`.
    fn swipe_within(
        &self,
        selector: &Selector,
        direction: SwipeDirection,
    ) -> Result<(), DriverError>;

    fn press_back(&self) -> Result<(), DriverError>;

    fn launch(&self, app_id: &str) -> Result<(), DriverError>;

    fn stop_all(&self) -> Result<(), DriverError>;

    fn clear_data(&self, app_id: &str) -> Result<(), DriverError>;

    fn is_installed(&self, app_id: &str) -> Result<bool, DriverError>;

    fn shell(&self, command: &str) -> Result<String, DriverError>;

    fn screenshot(&self, path: &Path) -> Result<(), DriverError>;

    fn dump_view_tree(&self) -> Result<String, DriverError>;

    fn app_info(&self, app_id: &str) -> Result<AppInfo, DriverError>;

    /// Polls [`Device::exists`] until it holds or `timeout` runs out.
    /// Drivers with a native wait should override this.
    fn wait_exists(&self, selector: &Selector, timeout: Duration) -> Result<bool, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.exists(selector)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(WAIT_POLL);
        }
    }

    /// Gesture that drags the last visible row onto the first one.
    ///
    /// Vertically the drag runs from the top edge of the last row up to the
    /// bottom edge of the first, at half the last row's right edge. `None`
    /// when both edges coincide and a plain swipe is needed instead.
    fn compute_scroll_vector(
        &self,
        first: &Bounds,
        last: &Bounds,
        axis: ScrollAxis,
    ) -> Option<ScrollVector> {
        let (from, to) = match axis {
            ScrollAxis::Vertical => {
                let x = last.right / 2;
                (Point { x, y: last.top }, Point { x, y: first.bottom })
            }
            ScrollAxis::Horizontal => (
                Point {
                    x: last.left,
                    y: last.top,
                },
                Point {
                    x: first.left,
                    y: first.bottom,
                },
            ),
        };
        if from == to {
            return None;
        }
        Some(ScrollVector {
            from,
            to,
            duration: Duration::ZERO,
        })
    }

    fn query(&self, selector: Selector) -> ViewHandle<'_, Self>
    where
        Self: Sized,
    {
        ViewHandle {
            device: self,
            selector,
        }
    }
}

/// A selector bound to a device.
pub struct ViewHandle<'d, D: ?Sized> {
    device: &'d D,
    selector: Selector,
}

impl<'d, D: Device + ?Sized> ViewHandle<'d, D> {
    pub fn new(device: &'d D, selector: Selector) -> Self {
        Self { device, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn exists(&self) -> Result<bool, DriverError> {
        self.device.exists(&self.selector)
    }

    pub fn wait(&self, timeout: Duration) -> Result<bool, DriverError> {
        self.device.wait_exists(&self.selector, timeout)
    }

    pub fn count(&self) -> Result<usize, DriverError> {
        Ok(self.elements()?.len())
    }

    pub fn elements(&self) -> Result<Vec<Element>, DriverError> {
        self.device.elements(&self.selector)
    }

    pub fn first(&self) -> Result<Element, DriverError> {
        self.elements()?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::not_found(&self.selector))
    }

    /// Text of the first match; a match without text reads as "".
    pub fn text(&self) -> Result<String, DriverError> {
        Ok(self.first()?.text.unwrap_or_default())
    }

    pub fn texts(&self) -> Result<Vec<String>, DriverError> {
        Ok(self
            .elements()?
            .into_iter()
            .filter_map(|element| element.text)
            .collect())
    }

    pub fn children(&self, child: &Selector) -> Result<Vec<Element>, DriverError> {
        self.device.children(&self.selector, child)
    }

    pub fn bounds(&self) -> Result<Bounds, DriverError> {
        Ok(self.first()?.bounds)
    }

    pub fn click(&self, timeout: Duration) -> Result<(), DriverError> {
        self.device.click(&self.selector, timeout)
    }

    pub fn long_click(&self, hold: Duration) -> Result<(), DriverError> {
        self.device.long_click(&self.selector, hold)
    }

    pub fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        self.device.send_keys(&self.selector, text)
    }

    pub fn swipe(&self, direction: SwipeDirection) -> Result<(), DriverError> {
        self.device.swipe_within(&self.selector, direction)
    }
}
