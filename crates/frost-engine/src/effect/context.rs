use crate::config::EffectConfig;
use crate::host::{Document, ElementId, FrameScheduler, GeometryOracle, MutationRecord};
use crate::render::{BackendFactory, FrameStats, GpuBackend, RegionRenderer};
use crate::tracking::{Classifier, DomObserver, ReconcileSummary, RegionEntry, TrackedRegions};
use crate::viewport::{ScaleError, ViewportController, ViewportState};

use super::FrameLoop;

/// Lifecycle stage of a [`BlurEffect`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EffectStage {
    /// No region has been tracked yet: no canvas, no backend, no frames.
    Dormant,
    /// Canvas mounted, backend live, frames scheduled.
    Running,
    /// A fatal initialization or render failure occurred. Nothing is retried.
    Disabled,
}

enum Stage<B: GpuBackend> {
    Dormant,
    Running(Active<B>),
    Disabled,
}

struct Active<B: GpuBackend> {
    renderer: RegionRenderer<B>,
    canvas: ElementId,
}

/// Blur-behind effect bound to one document.
///
/// Nothing happens on the GPU until the tracked set first becomes non-empty.
/// At that point the backend is created, the canvas is mounted as the body's
/// first child, the canvas is sized once, and the frame loop starts. From
/// then on every membership change republishes the region list to the
/// renderer before the next frame reads it.
pub struct BlurEffect<F: BackendFactory, S: FrameScheduler> {
    config: EffectConfig,
    regions: TrackedRegions,
    observer: DomObserver,
    viewport: ViewportController,
    factory: F,
    frames: FrameLoop<S>,
    stage: Stage<F::Backend>,
}

impl<F: BackendFactory, S: FrameScheduler> BlurEffect<F, S> {
    /// Scans the document, connects the observer and starts rendering if any
    /// element already opts in.
    ///
    /// Only an invalid resolution scale in `config` is reported. GPU
    /// initialization failures disable the effect and are logged.
    pub fn bootstrap<H>(
        host: &mut H,
        config: EffectConfig,
        factory: F,
        scheduler: S,
    ) -> Result<Self, ScaleError>
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let viewport = ViewportController::new(config.resolution_scale)?;
        let classifier = Classifier::new(config.marker.clone(), config.default_strength);
        let regions = TrackedRegions::new(classifier, config.strength_attribute.clone());

        let mut effect = Self {
            config,
            regions,
            observer: DomObserver::new(),
            viewport,
            factory,
            frames: FrameLoop::new(scheduler),
            stage: Stage::Dormant,
        };

        let summary = effect.regions.reconcile_all(host);
        effect.observer.connect();
        log::info!("blur effect bootstrapped with {} region(s)", summary.added);

        effect.publish(host);
        Ok(effect)
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn stage(&self) -> EffectStage {
        match self.stage {
            Stage::Dormant => EffectStage::Dormant,
            Stage::Running(_) => EffectStage::Running,
            Stage::Disabled => EffectStage::Disabled,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.stage, Stage::Running(_))
    }

    #[inline]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    #[inline]
    pub fn tracked(&self) -> &TrackedRegions {
        &self.regions
    }

    #[inline]
    pub fn observer(&self) -> &DomObserver {
        &self.observer
    }

    #[inline]
    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    /// The mounted canvas element, once running.
    pub fn canvas(&self) -> Option<ElementId> {
        match &self.stage {
            Stage::Running(active) => Some(active.canvas),
            _ => None,
        }
    }

    pub fn backend(&self) -> Option<&F::Backend> {
        match &self.stage {
            Stage::Running(active) => Some(active.renderer.backend()),
            _ => None,
        }
    }

    pub fn backend_mut(&mut self) -> Option<&mut F::Backend> {
        match &mut self.stage {
            Stage::Running(active) => Some(active.renderer.backend_mut()),
            _ => None,
        }
    }

    /// Frames rendered so far.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames.frames()
    }

    // ── set membership ────────────────────────────────────────────────────

    /// Manual full reconciliation, for class edits the observer cannot see.
    ///
    /// This is also the only way an element that lost its marker class leaves
    /// the set.
    pub fn refresh<H>(&mut self, host: &mut H) -> ReconcileSummary
    where
        H: Document + GeometryOracle + ?Sized,
    {
        if matches!(self.stage, Stage::Disabled) {
            return ReconcileSummary::default();
        }
        let summary = self.regions.reconcile_all(host);
        if summary.changed() {
            self.publish(host);
        }
        summary
    }

    /// Feeds one mutation batch to the observer. Returns the number of newly
    /// tracked elements.
    pub fn on_mutations<H>(&mut self, host: &mut H, records: &[MutationRecord]) -> usize
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let added = self.observer.process(host, &mut self.regions, records);
        if added > 0 {
            self.publish(host);
        }
        added
    }

    /// Tracks `element` explicitly. It must carry the marker class.
    pub fn track<H>(&mut self, host: &mut H, element: ElementId) -> bool
    where
        H: Document + GeometryOracle + ?Sized,
    {
        if matches!(self.stage, Stage::Disabled) {
            return false;
        }
        let added = self.regions.add(host, element);
        if added {
            self.publish(host);
        }
        added
    }

    /// Stops tracking `element` regardless of its classes.
    pub fn untrack<H>(&mut self, host: &mut H, element: ElementId) -> bool
    where
        H: Document + GeometryOracle + ?Sized,
    {
        if matches!(self.stage, Stage::Disabled) {
            return false;
        }
        let removed = self.regions.remove(host, element);
        if removed {
            self.publish(host);
        }
        removed
    }

    // ── host events ───────────────────────────────────────────────────────

    /// Frame callback. Renders, then asks for the next frame.
    ///
    /// Returns `None` when the effect is not running. A backend failure
    /// disables the effect and ends the loop.
    pub fn on_frame<H>(&mut self, host: &H) -> Option<FrameStats>
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let Stage::Running(active) = &mut self.stage else {
            return None;
        };

        let time = self.frames.tick();
        match active
            .renderer
            .render(host, self.viewport.state(), time.frame_index)
        {
            Ok(stats) => {
                self.frames.reschedule();
                Some(stats)
            }
            Err(e) => {
                log::error!("blur effect disabled after frame {}: {e}", time.frame_index);
                self.disable();
                None
            }
        }
    }

    /// Window resize: re-derives the canvas size from the host viewport.
    pub fn on_resize<H>(&mut self, host: &H) -> ViewportState
    where
        H: GeometryOracle + ?Sized,
    {
        let logical = host.viewport_size();
        let target = match &mut self.stage {
            Stage::Running(active) => Some(active.renderer.backend_mut()),
            _ => None,
        };
        self.viewport.resize(target, logical)
    }

    /// Changes the resolution scale and resizes immediately.
    pub fn set_resolution_scale<H>(
        &mut self,
        host: &H,
        scale: f32,
    ) -> Result<ViewportState, ScaleError>
    where
        H: GeometryOracle + ?Sized,
    {
        let logical = host.viewport_size();
        let target = match &mut self.stage {
            Stage::Running(active) => Some(active.renderer.backend_mut()),
            _ => None,
        };
        let state = self.viewport.set_resolution_scale(target, scale, logical)?;
        self.config.resolution_scale = scale;
        log::info!(
            "resolution scale {scale}: canvas {}x{}",
            state.canvas_width,
            state.canvas_height
        );
        Ok(state)
    }

    /// Page teardown: disconnects the observer. The frame loop keeps running
    /// for as long as the host keeps delivering frames.
    pub fn teardown(&mut self) {
        self.observer.disconnect();
        log::info!("blur effect torn down");
    }

    // ── internals ─────────────────────────────────────────────────────────

    /// Hands the current set to the renderer, starting it on first use.
    fn publish<H>(&mut self, host: &mut H)
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let snapshot = self.regions.snapshot();
        if let Stage::Running(active) = &mut self.stage {
            active.renderer.publish(snapshot);
            return;
        }
        if matches!(self.stage, Stage::Dormant) && !snapshot.is_empty() {
            self.start(host, snapshot);
        }
    }

    fn start<H>(&mut self, host: &mut H, snapshot: Vec<RegionEntry>)
    where
        H: Document + GeometryOracle + ?Sized,
    {
        let backend = match self.factory.create() {
            Ok(b) => b,
            Err(e) => {
                log::error!("blur effect disabled: {e}");
                self.disable();
                return;
            }
        };

        let canvas = host.mount_canvas();
        let mut renderer = RegionRenderer::new(backend, &self.config);
        let state = self
            .viewport
            .resize(Some(renderer.backend_mut()), host.viewport_size());
        renderer.publish(snapshot);

        self.stage = Stage::Running(Active { renderer, canvas });
        self.frames.start();

        log::info!(
            "blur effect running: canvas {canvas:?} {}x{} @ {}",
            state.canvas_width,
            state.canvas_height,
            state.scale
        );
    }

    fn disable(&mut self) {
        self.stage = Stage::Disabled;
        self.frames.stop();
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{PixelViewport, Rect, Viewport};
    use crate::host::{FrameSignal, MemoryDocument};
    use crate::render::InitError;
    use crate::render::testing::{BackendCall, RecordingBackend};

    type Factory = fn() -> Result<RecordingBackend, InitError>;

    fn working() -> Result<RecordingBackend, InitError> {
        Ok(RecordingBackend::default())
    }

    fn broken() -> Result<RecordingBackend, InitError> {
        Err(InitError::ShaderCompile("unexpected token".into()))
    }

    fn page() -> MemoryDocument {
        MemoryDocument::new(Viewport::new(800.0, 600.0))
    }

    fn boot(
        doc: &mut MemoryDocument,
        factory: Factory,
    ) -> (BlurEffect<Factory, FrameSignal>, FrameSignal) {
        let signal = FrameSignal::new();
        let effect =
            BlurEffect::bootstrap(doc, EffectConfig::default(), factory, signal.clone()).unwrap();
        (effect, signal)
    }

    fn add_panel(doc: &mut MemoryDocument, class: &str) -> ElementId {
        let body = doc.body();
        let el = doc.create_with("div", class, Rect::new(100.0, 50.0, 40.0, 20.0));
        doc.append_child(body, el);
        el
    }

    #[test]
    fn empty_page_stays_dormant() {
        let mut doc = page();
        let (mut effect, signal) = boot(&mut doc, working);

        assert_eq!(effect.stage(), EffectStage::Dormant);
        assert!(effect.canvas().is_none());
        assert!(!signal.is_requested());
        assert_eq!(doc.children(doc.body()).len(), 0);
        assert!(effect.on_frame(&doc).is_none());
    }

    #[test]
    fn scripted_element_plus_refresh_starts_rendering() {
        let mut doc = page();
        let (mut effect, signal) = boot(&mut doc, working);

        let el = add_panel(&mut doc, "frost");
        let summary = effect.refresh(&mut doc);
        assert_eq!(summary.added, 1);

        assert_eq!(effect.stage(), EffectStage::Running);
        assert_eq!(effect.tracked().len(), 1);
        assert!(effect.tracked().contains(el));

        let canvas = effect.canvas().unwrap();
        assert_eq!(doc.children(doc.body())[0], canvas);
        assert_eq!(doc.tag(canvas), Some("canvas"));

        // Eager sizing before the first frame.
        let calls = &effect.backend().unwrap().calls;
        assert_eq!(calls[0], BackendCall::Resize(400, 300));

        for i in 0..3 {
            assert!(signal.take(), "frame {i} requested");
            let stats = effect.on_frame(&doc).unwrap();
            assert_eq!(stats.frame_index, i);
            assert_eq!(stats.drawn, 1);
        }
        assert!(signal.is_requested());
        assert_eq!(effect.backend().unwrap().frames(), 3);
    }

    #[test]
    fn element_present_at_bootstrap_starts_immediately() {
        let mut doc = page();
        add_panel(&mut doc, "frost-7.5");
        let (effect, signal) = boot(&mut doc, working);

        assert!(effect.is_running());
        assert!(signal.is_requested());
        let el = effect.tracked().iter().next().unwrap();
        assert_eq!(
            doc.attribute(el, "data-frost-strength").as_deref(),
            Some("7.5")
        );
    }

    #[test]
    fn observer_picks_up_inserted_elements() {
        let mut doc = page();
        let (mut effect, _signal) = boot(&mut doc, working);

        let body = doc.body();
        let wrapper = doc.create_element("section");
        let inner = doc.create_with("div", "frost-3", Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.append_child(wrapper, inner);
        doc.append_child(body, wrapper);

        let records = doc.take_records();
        assert_eq!(effect.on_mutations(&mut doc, &records), 1);
        assert!(effect.is_running());
        assert_eq!(effect.tracked().strength(inner), Some(3.0));
    }

    #[test]
    fn class_removal_needs_refresh() {
        let mut doc = page();
        let el = add_panel(&mut doc, "frost");
        let (mut effect, _signal) = boot(&mut doc, working);
        doc.take_records();

        doc.remove_class(el, "frost");
        let records = doc.take_records();
        effect.on_mutations(&mut doc, &records);
        assert!(effect.tracked().contains(el));

        let summary = effect.refresh(&mut doc);
        assert_eq!(summary.removed, 1);
        assert!(!effect.tracked().contains(el));
        assert_eq!(doc.attribute(el, "data-frost-strength"), None);

        // Still running with an empty set: frames clear the canvas.
        let stats = effect.on_frame(&doc).unwrap();
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn factory_failure_disables() {
        let mut doc = page();
        add_panel(&mut doc, "frost");
        let (mut effect, signal) = boot(&mut doc, broken);

        assert_eq!(effect.stage(), EffectStage::Disabled);
        assert!(!signal.is_requested());
        assert!(!effect.observer().is_connected());
        assert!(effect.canvas().is_none());
        assert_eq!(doc.children(doc.body()).len(), 1, "no canvas mounted");

        let late = add_panel(&mut doc, "frost");
        assert_eq!(effect.refresh(&mut doc), ReconcileSummary::default());
        assert!(!effect.track(&mut doc, late));
        assert!(effect.on_frame(&doc).is_none());
    }

    #[test]
    fn render_failure_stops_the_loop() {
        let mut doc = page();
        add_panel(&mut doc, "frost");
        let (mut effect, signal) = boot(&mut doc, working);
        signal.take();

        effect.backend_mut().unwrap().fail_end_frame = true;
        assert!(effect.on_frame(&doc).is_none());
        assert_eq!(effect.stage(), EffectStage::Disabled);
        assert!(!signal.is_requested());
    }

    #[test]
    fn resize_and_scale_reach_the_backend() {
        let mut doc = page();
        add_panel(&mut doc, "frost");
        let (mut effect, _signal) = boot(&mut doc, working);

        doc.set_viewport_size(Viewport::new(1001.0, 500.0));
        let state = effect.on_resize(&doc);
        assert_eq!(state.canvas_size(), (501, 250));

        let state = effect.set_resolution_scale(&doc, 1.0).unwrap();
        assert_eq!(state.canvas_size(), (1001, 500));
        let viewport = BackendCall::Viewport(PixelViewport::new(0, 0, 1001, 500));
        assert_eq!(effect.backend().unwrap().calls.last(), Some(&viewport));

        assert!(effect.set_resolution_scale(&doc, -2.0).is_err());
        assert_eq!(effect.viewport().scale, 1.0);
    }

    #[test]
    fn dormant_scale_change_applies_on_start() {
        let mut doc = page();
        let (mut effect, _signal) = boot(&mut doc, working);
        effect.set_resolution_scale(&doc, 0.25).unwrap();

        add_panel(&mut doc, "frost");
        effect.refresh(&mut doc);
        let calls = &effect.backend().unwrap().calls;
        assert_eq!(calls[0], BackendCall::Resize(200, 150));
    }

    #[test]
    fn explicit_track_and_untrack() {
        let mut doc = page();
        let (mut effect, _signal) = boot(&mut doc, working);

        let plain = add_panel(&mut doc, "card");
        assert!(!effect.track(&mut doc, plain));
        assert!(effect.canvas().is_none());

        let el = add_panel(&mut doc, "card frost-2");
        assert!(effect.track(&mut doc, el));
        assert!(!effect.track(&mut doc, el));
        assert!(effect.is_running());

        assert!(effect.untrack(&mut doc, el));
        assert!(effect.tracked().is_empty());
    }

    #[test]
    fn teardown_only_disconnects_observer() {
        let mut doc = page();
        add_panel(&mut doc, "frost");
        let (mut effect, signal) = boot(&mut doc, working);
        signal.take();

        effect.teardown();
        let late = add_panel(&mut doc, "frost");
        let records = doc.take_records();
        assert_eq!(effect.on_mutations(&mut doc, &records), 0);
        assert!(!effect.tracked().contains(late));

        assert!(effect.on_frame(&doc).is_some());
        assert!(signal.is_requested());
    }
}
