use crate::config::EffectConfig;
use crate::coords::ColorRgba;
use crate::host::{Document, GeometryOracle};
use crate::tracking::{RegionEntry, parse_strength};
use crate::viewport::ViewportState;

use super::{GpuBackend, RegionShape, RenderError};

/// Per-frame counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub drawn: usize,
    /// Regions without geometry this frame (detached elements).
    pub skipped: usize,
}

/// Draws the published regions through a [`GpuBackend`].
///
/// Geometry is never cached: every frame asks the host for each element's
/// rectangle and radius, so scrolling, animation and layout edits show up on
/// the next frame without any notification.
pub struct RegionRenderer<B: GpuBackend> {
    backend: B,
    regions: Vec<RegionEntry>,
    strength_attribute: String,
    clear_color: ColorRgba,
    guard_band_px: i32,
}

impl<B: GpuBackend> RegionRenderer<B> {
    pub fn new(backend: B, config: &EffectConfig) -> Self {
        Self {
            backend,
            regions: Vec::new(),
            strength_attribute: config.strength_attribute.clone(),
            clear_color: config.clear_color,
            guard_band_px: config.guard_band_px,
        }
    }

    /// Replaces the region list; the next frame draws exactly these, in this order.
    pub fn publish(&mut self, regions: Vec<RegionEntry>) {
        log::debug!("renderer: {} region(s) published", regions.len());
        self.regions = regions;
    }

    #[inline]
    pub fn regions(&self) -> &[RegionEntry] {
        &self.regions
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Renders one frame: clear, one draw per region, submit.
    pub fn render<H>(
        &mut self,
        host: &H,
        viewport: ViewportState,
        frame_index: u64,
    ) -> Result<FrameStats, RenderError>
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let mut stats = FrameStats {
            frame_index,
            ..FrameStats::default()
        };

        self.backend.begin_frame(self.clear_color)?;

        for entry in &self.regions {
            let Some(rect) = host.bounding_rect(entry.element) else {
                stats.skipped += 1;
                continue;
            };

            let strength = host
                .attribute(entry.element, &self.strength_attribute)
                .and_then(|v| parse_strength(&v))
                .unwrap_or(entry.strength);

            let shape = RegionShape::resolve(
                rect,
                host.border_radius(entry.element),
                viewport.scale,
                self.guard_band_px,
                viewport.canvas_height,
            );

            self.backend
                .draw_region(&shape.to_draw(viewport.canvas_size(), strength))?;
            stats.drawn += 1;
        }

        self.backend.end_frame()?;

        log::trace!(
            "frame {}: {} drawn, {} skipped",
            stats.frame_index,
            stats.drawn,
            stats.skipped
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{BorderRadius, Rect, Viewport};
    use crate::host::{Document, ElementId, MemoryDocument};
    use crate::render::testing::{BackendCall, RecordingBackend};

    fn state() -> ViewportState {
        ViewportState {
            scale: 0.5,
            canvas_width: 400,
            canvas_height: 300,
        }
    }

    fn page() -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new(Viewport::new(800.0, 600.0));
        let body = doc.body();
        let el = doc.create_with("div", "frost", Rect::new(100.0, 50.0, 40.0, 20.0));
        doc.append_child(body, el);
        (doc, el)
    }

    fn entry(element: ElementId, strength: f32) -> RegionEntry {
        RegionEntry { element, strength }
    }

    fn renderer() -> RegionRenderer<RecordingBackend> {
        RegionRenderer::new(RecordingBackend::default(), &EffectConfig::default())
    }

    #[test]
    fn frame_is_clear_draws_submit() {
        let (mut doc, el) = page();
        doc.set_attribute(el, "data-frost-strength", "7.5");

        let mut r = renderer();
        r.publish(vec![entry(el, 1.0)]);
        let stats = r.render(&doc, state(), 3).unwrap();

        let expected = FrameStats {
            frame_index: 3,
            drawn: 1,
            skipped: 0,
        };
        assert_eq!(stats, expected);
        let calls = &r.backend().calls;
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], BackendCall::Begin(ColorRgba::transparent()));
        assert_eq!(calls[2], BackendCall::End);

        let draw = r.backend().draws()[0];
        // Box {49, 24, 22, 12}; center y flipped against 300.
        assert_eq!(draw.shape, [60.0, 270.0, 11.0, 6.0]);
        assert_eq!(draw.resolution, [400.0, 300.0]);
        assert_eq!(draw.strength, 7.5);
    }

    #[test]
    fn strength_falls_back_to_snapshot() {
        let (doc, el) = page();
        let mut r = renderer();
        r.publish(vec![entry(el, 4.0)]);
        r.render(&doc, state(), 0).unwrap();
        assert_eq!(r.backend().draws()[0].strength, 4.0);
    }

    #[test]
    fn detached_elements_are_skipped() {
        let (mut doc, el) = page();
        doc.remove(el);

        let mut r = renderer();
        r.publish(vec![entry(el, 1.0)]);
        let stats = r.render(&doc, state(), 0).unwrap();

        assert_eq!((stats.drawn, stats.skipped), (0, 1));
        assert!(r.backend().draws().is_empty());
        assert_eq!(r.backend().frames(), 1);
    }

    #[test]
    fn geometry_is_read_every_frame() {
        let (mut doc, el) = page();
        let mut r = renderer();
        r.publish(vec![entry(el, 1.0)]);

        r.render(&doc, state(), 0).unwrap();
        doc.set_rect(el, Rect::new(0.0, 0.0, 40.0, 20.0));
        r.render(&doc, state(), 1).unwrap();

        let draws = r.backend().draws();
        assert_ne!(draws[0].shape, draws[1].shape);
        assert_eq!(draws[1].shape[0], -1.0 + 22.0 / 2.0);
    }

    #[test]
    fn circular_radius_yields_circle() {
        let (mut doc, el) = page();
        doc.set_border_radius(el, BorderRadius::Percent(50.0));
        let mut r = renderer();
        r.publish(vec![entry(el, 1.0)]);
        r.render(&doc, state(), 0).unwrap();
        assert!(r.backend().draws()[0].is_circle());
    }

    #[test]
    fn draws_follow_snapshot_order() {
        let (mut doc, a) = page();
        let body = doc.body();
        let b = doc.create_with("div", "frost", Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.append_child(body, b);

        let mut r = renderer();
        r.publish(vec![entry(b, 2.0), entry(a, 3.0)]);
        r.render(&doc, state(), 0).unwrap();

        let strengths: Vec<f32> = r.backend().draws().iter().map(|d| d.strength).collect();
        assert_eq!(strengths, vec![2.0, 3.0]);
    }

    #[test]
    fn backend_failure_propagates() {
        let (doc, el) = page();
        let mut r = renderer();
        r.backend_mut().fail_end_frame = true;
        r.publish(vec![entry(el, 1.0)]);
        assert!(matches!(
            r.render(&doc, state(), 0),
            Err(RenderError::Backend(_))
        ));
    }
}
