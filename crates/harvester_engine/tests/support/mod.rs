#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use harvester_engine::{
    AppInfo, Bounds, Device, DriverError, Element, Pacer, Point, ScrollVector, Selector,
    SwipeDirection,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Records pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

pub fn text(value: &str) -> Element {
    Element {
        text: Some(value.to_string()),
        bounds: Bounds::new(0, 0, 100, 100),
        ..Element::default()
    }
}

pub fn described(value: &str) -> Element {
    Element {
        description: Some(value.to_string()),
        bounds: Bounds::new(0, 0, 100, 100),
        ..Element::default()
    }
}

pub fn at(bounds: Bounds) -> Element {
    Element {
        bounds,
        ..Element::default()
    }
}

/// What a click changes on screen.
#[derive(Debug, Clone)]
pub enum Reaction {
    Show(Selector, Vec<Element>),
    Hide(Selector),
    /// Removes the last child registered under `(parent, child)`.
    DropChild(Selector, Selector),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub installed: bool,
    pub version: String,
    pub screen: HashMap<Selector, Vec<Element>>,
    pub children: HashMap<(Selector, Selector), Vec<Element>>,
    pub reactions: HashMap<Selector, Vec<Reaction>>,
    pub calls: Vec<String>,
    pub failing: Option<String>,
}

/// Scripted device: a flat map from selectors to what they match.
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeDevice {
    pub fn installed(version: &str) -> Self {
        let device = Self::default();
        {
            let mut state = device.state.borrow_mut();
            state.installed = true;
            state.version = version.to_string();
        }
        device
    }

    pub fn show(&self, selector: Selector, elements: Vec<Element>) -> &Self {
        self.state.borrow_mut().screen.insert(selector, elements);
        self
    }

    pub fn show_children(&self, parent: Selector, child: Selector, elements: Vec<Element>) -> &Self {
        self.state
            .borrow_mut()
            .children
            .insert((parent, child), elements);
        self
    }

    pub fn on_click(&self, selector: Selector, reaction: Reaction) -> &Self {
        self.state
            .borrow_mut()
            .reactions
            .entry(selector)
            .or_default()
            .push(reaction);
        self
    }

    /// Every device call after this one fails hard.
    pub fn break_down(&self, message: &str) {
        self.state.borrow_mut().failing = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.starts_with(prefix))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.failing {
            return Err(DriverError::Device(message.clone()));
        }
        state.calls.push(call);
        Ok(())
    }

    fn lookup(&self, selector: &Selector) -> Result<Vec<Element>, DriverError> {
        let state = self.state.borrow();
        if let Some(message) = &state.failing {
            return Err(DriverError::Device(message.clone()));
        }
        Ok(state.screen.get(selector).cloned().unwrap_or_default())
    }

    fn react(&self, selector: &Selector) {
        let mut state = self.state.borrow_mut();
        let reactions = state.reactions.get(selector).cloned().unwrap_or_default();
        for reaction in reactions {
            match reaction {
                Reaction::Show(target, elements) => {
                    state.screen.insert(target, elements);
                }
                Reaction::Hide(target) => {
                    state.screen.remove(&target);
                }
                Reaction::DropChild(parent, child) => {
                    if let Some(children) = state.children.get_mut(&(parent, child)) {
                        children.pop();
                    }
                }
            }
        }
    }
}

impl Device for FakeDevice {
    fn exists(&self, selector: &Selector) -> Result<bool, DriverError> {
        Ok(!self.lookup(selector)?.is_empty())
    }

    fn elements(&self, selector: &Selector) -> Result<Vec<Element>, DriverError> {
        self.lookup(selector)
    }

    fn children(&self, parent: &Selector, child: &Selector) -> Result<Vec<Element>, DriverError> {
        let state = self.state.borrow();
        Ok(state
            .children
            .get(&(parent.clone(), child.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn click(&self, selector: &Selector, _timeout: Duration) -> Result<(), DriverError> {
        if self.lookup(selector)?.is_empty() {
            return Err(DriverError::not_found(selector));
        }
        self.record(format!("click {selector}"))?;
        self.react(selector);
        Ok(())
    }

    fn click_at(&self, point: Point) -> Result<(), DriverError> {
        self.record(format!("click_at {},{}", point.x, point.y))
    }

    fn long_click(&self, selector: &Selector, _hold: Duration) -> Result<(), DriverError> {
        self.record(format!("long_click {selector}"))
    }

    fn send_keys(&self, selector: &Selector, text: &str) -> Result<(), DriverError> {
        self.record(format!("send_keys {selector} {text}"))
    }

    fn swipe(&self, gesture: &ScrollVector) -> Result<(), DriverError> {
        self.record(format!(
            "swipe {},{} -> {},{}",
            gesture.from.x, gesture.from.y, gesture.to.x, gesture.to.y
        ))
    }

    fn swipe_within(&self, selector: &Selector, direction: SwipeDirection) -> Result<(), DriverError> {
        self.record(format!("swipe_within {selector} {direction:?}"))
    }

    fn press_back(&self) -> Result<(), DriverError> {
        self.record("back".to_string())
    }

    fn launch(&self, app_id: &str) -> Result<(), DriverError> {
        self.record(format!("launch {app_id}"))
    }

    fn stop_all(&self) -> Result<(), DriverError> {
        self.record("stop_all".to_string())
    }

    fn clear_data(&self, app_id: &str) -> Result<(), DriverError> {
        self.record(format!("clear_data {app_id}"))
    }

    fn is_installed(&self, _app_id: &str) -> Result<bool, DriverError> {
        Ok(self.state.borrow().installed)
    }

    fn shell(&self, command: &str) -> Result<String, DriverError> {
        self.record(format!("shell {command}"))?;
        Ok(String::new())
    }

    fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.record("screenshot".to_string())?;
        fs::write(path, b"jpeg").map_err(|err| DriverError::Device(err.to_string()))
    }

    fn dump_view_tree(&self) -> Result<String, DriverError> {
        Ok("<hierarchy rotation=\"0\"/>".to_string())
    }

    fn app_info(&self, _app_id: &str) -> Result<AppInfo, DriverError> {
        Ok(AppInfo {
            version_name: self.state.borrow().version.clone(),
        })
    }

    fn wait_exists(&self, selector: &Selector, _timeout: Duration) -> Result<bool, DriverError> {
        self.exists(selector)
    }
}
