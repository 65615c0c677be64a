use crate::host::FrameScheduler;
use crate::time::{FrameClock, FrameTime};

/// Continuous self-rescheduling loop on top of a [`FrameScheduler`].
///
/// Every completed frame asks the host for the next one. Once stopped the
/// loop never asks again; there is no restart.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    clock: FrameClock,
    running: bool,
    stopped: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            clock: FrameClock::new(),
            running: false,
            stopped: false,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Requests the first frame. No effect once running or stopped.
    pub fn start(&mut self) {
        if self.running || self.stopped {
            return;
        }
        self.running = true;
        self.clock.reset();
        self.scheduler.request_frame();
    }

    /// Timing for the frame being produced.
    pub fn tick(&mut self) -> FrameTime {
        self.clock.tick()
    }

    /// Requests the next frame.
    pub fn reschedule(&mut self) {
        if self.running {
            self.scheduler.request_frame();
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.stopped = true;
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }
}
