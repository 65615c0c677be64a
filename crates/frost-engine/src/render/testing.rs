//! Recording backend for tests that need no GPU.

use crate::coords::{ColorRgba, PixelViewport};

use super::{GpuBackend, RegionDraw, RenderError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    Resize(u32, u32),
    Viewport(PixelViewport),
    Begin(ColorRgba),
    Draw(RegionDraw),
    End,
}

/// Records every call; optionally fails `end_frame` once armed.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    pub fail_end_frame: bool,
    in_frame: bool,
}

impl RecordingBackend {
    pub fn draws(&self) -> Vec<RegionDraw> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Draw(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == BackendCall::End).count()
    }
}

impl GpuBackend for RecordingBackend {
    fn resize_canvas(&mut self, width: u32, height: u32) {
        self.calls.push(BackendCall::Resize(width, height));
    }

    fn set_viewport(&mut self, viewport: PixelViewport) {
        self.calls.push(BackendCall::Viewport(viewport));
    }

    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), RenderError> {
        self.in_frame = true;
        self.calls.push(BackendCall::Begin(clear));
        Ok(())
    }

    fn draw_region(&mut self, draw: &RegionDraw) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::NoActiveFrame);
        }
        self.calls.push(BackendCall::Draw(*draw));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !std::mem::take(&mut self.in_frame) {
            return Err(RenderError::NoActiveFrame);
        }
        if self.fail_end_frame {
            return Err(RenderError::Backend("device lost".into()));
        }
        self.calls.push(BackendCall::End);
        Ok(())
    }
}
