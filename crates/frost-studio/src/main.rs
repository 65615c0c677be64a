//! frost-studio: an animated in-memory page rendered through the blur effect.
//!
//! Keys: `=` / `-` change the resolution scale, `R` forces a refresh,
//! `Esc` quits.

mod page;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use frost_engine::config::EffectConfig;
use frost_engine::coords::{ColorRgba, Viewport};
use frost_engine::core::{App, AppControl, FrameCtx};
use frost_engine::device::GpuInit;
use frost_engine::effect::BlurEffect;
use frost_engine::host::FrameSignal;
use frost_engine::logging::{LoggingConfig, init_logging};
use frost_engine::render::gpu::{CanvasPresenter, WgpuBackendFactory};
use frost_engine::window::{Runtime, RuntimeConfig};

use page::Page;

const BACKGROUND: ColorRgba = ColorRgba::new(0.05, 0.07, 0.12, 1.0);
const SCALE_STEPS: [f32; 6] = [0.125, 0.25, 0.5, 0.75, 1.0, 2.0];

type Effect = BlurEffect<WgpuBackendFactory, FrameSignal>;

struct StudioApp {
    page: Page,
    effect: Option<Effect>,
    signal: FrameSignal,
    presenter: CanvasPresenter,
    scale_step: usize,
    refresh_requested: bool,
}

impl StudioApp {
    fn new() -> Self {
        Self {
            page: Page::new(Viewport::new(1280.0, 720.0)),
            effect: None,
            signal: FrameSignal::new(),
            presenter: CanvasPresenter::new(),
            scale_step: 2,
            refresh_requested: false,
        }
    }

    fn step_scale(&mut self, delta: isize) {
        let next = self.scale_step.saturating_add_signed(delta).min(SCALE_STEPS.len() - 1);
        if next == self.scale_step {
            return;
        }
        self.scale_step = next;
        let Some(effect) = self.effect.as_mut() else {
            return;
        };
        if let Err(e) = effect.set_resolution_scale(&self.page.doc, SCALE_STEPS[next]) {
            log::warn!("{e}");
        }
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Equal) => self.step_scale(1),
            PhysicalKey::Code(KeyCode::Minus) => self.step_scale(-1),
            PhysicalKey::Code(KeyCode::KeyR) => self.refresh_requested = true,
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            _ => {}
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, _window_id: WindowId, viewport: Viewport) {
        self.page.doc.set_viewport_size(viewport);
        if let Some(effect) = self.effect.as_mut() {
            effect.on_resize(&self.page.doc);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.effect.is_none() {
            let factory = WgpuBackendFactory::for_gpu(ctx.gpu);
            let config = EffectConfig {
                resolution_scale: SCALE_STEPS[self.scale_step],
                ..EffectConfig::default()
            };
            match BlurEffect::bootstrap(&mut self.page.doc, config, factory, self.signal.clone()) {
                Ok(effect) => self.effect = Some(effect),
                Err(e) => {
                    log::error!("cannot start blur effect: {e}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(effect) = self.effect.as_mut() else {
            return AppControl::Exit;
        };

        if self.page.advance(ctx.time.dt) {
            self.refresh_requested = true;
        }

        let records = self.page.doc.take_records();
        effect.on_mutations(&mut self.page.doc, &records);

        if std::mem::take(&mut self.refresh_requested) {
            let summary = effect.refresh(&mut self.page.doc);
            log::info!("refresh: +{} -{}", summary.added, summary.removed);
        }

        if self.signal.take() {
            effect.on_frame(&self.page.doc);
        }

        let presenter = &mut self.presenter;
        ctx.render(BACKGROUND, |rctx, target| {
            if let Some(canvas) = effect.backend().and_then(|b| b.canvas()) {
                presenter.present(rctx, target, canvas);
            }
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "frost studio".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), StudioApp::new())
}
