use std::cell::Cell;
use std::rc::Rc;

/// Yield-to-host primitive driving the render loop.
///
/// `request_frame` asks the host to call back once at its next display
/// refresh. The effect calls it again from inside every frame, which makes
/// the loop continuous without recursion.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Single-threaded frame request flag.
///
/// The effect holds one clone and raises it; the host polls [`take`] on each
/// refresh tick and runs a frame when it was raised.
///
/// [`take`]: FrameSignal::take
#[derive(Debug, Clone, Default)]
pub struct FrameSignal(Rc<Cell<bool>>);

impl FrameSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a frame was requested and clears the request.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
}

impl FrameScheduler for FrameSignal {
    #[inline]
    fn request_frame(&mut self) {
        self.0.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_request() {
        let host_side = FrameSignal::new();
        let mut effect_side = host_side.clone();

        assert!(!host_side.is_requested());
        effect_side.request_frame();
        assert!(host_side.is_requested());
        assert!(host_side.take());
        assert!(!host_side.take());
    }
}
