use std::thread;
use std::time::Duration;

use engine_logging::engine_trace;

/// Blocking pauses between device actions. Swapped out in tests.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        engine_trace!("pausing for {:?}", duration);
        thread::sleep(duration);
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration);
    }
}
