use frost_engine::coords::{BorderRadius, Rect, Vec2, Viewport};
use frost_engine::host::{ElementId, MemoryDocument};

/// A panel whose box drifts horizontally over time.
struct Panel {
    element: ElementId,
    base: Rect,
    phase: f32,
}

#[derive(Copy, Clone)]
enum Action {
    Insert {
        class: &'static str,
        rect: Rect,
        radius: BorderRadius,
    },
    AddClass(usize, &'static str),
    RemoveClass(usize, &'static str),
    Detach(usize),
    Refresh,
}

/// Demo page: a handful of panels plus a timed script of document edits.
///
/// The script covers each path into the tracked set: insertion picked up by
/// the observer, a class added after insertion, a class removed (only seen
/// by a refresh), and a detached element.
pub struct Page {
    pub doc: MemoryDocument,
    panels: Vec<Panel>,
    script: Vec<(f32, Action)>,
    next_step: usize,
    elapsed: f32,
}

impl Page {
    pub fn new(viewport: Viewport) -> Self {
        let mut page = Self {
            doc: MemoryDocument::new(viewport),
            panels: Vec::new(),
            script: Vec::new(),
            next_step: 0,
            elapsed: 0.0,
        };

        page.insert(
            "card frost",
            Rect::new(80.0, 80.0, 320.0, 180.0),
            BorderRadius::Px(16.0),
        );
        page.insert(
            "card frost-8",
            Rect::new(460.0, 120.0, 220.0, 220.0),
            BorderRadius::Percent(50.0),
        );
        page.insert(
            "card",
            Rect::new(760.0, 90.0, 300.0, 140.0),
            BorderRadius::Percent(20.0),
        );

        page.script = vec![
            (
                1.5,
                Action::Insert {
                    class: "toast frost-4",
                    rect: Rect::new(120.0, 420.0, 380.0, 90.0),
                    radius: BorderRadius::Px(24.0),
                },
            ),
            (3.0, Action::AddClass(2, "frost-14")),
            (5.0, Action::RemoveClass(0, "frost")),
            (6.0, Action::Refresh),
            (8.0, Action::Detach(1)),
            (9.0, Action::Refresh),
        ];
        page
    }

    fn insert(&mut self, class: &str, rect: Rect, radius: BorderRadius) -> ElementId {
        let body = self.doc.body();
        let element = self.doc.create_with("div", class, rect);
        self.doc.set_border_radius(element, radius);
        self.doc.append_child(body, element);
        self.panels.push(Panel {
            element,
            base: rect,
            phase: self.panels.len() as f32 * 1.3,
        });
        element
    }

    /// Advances animation and script by `dt` seconds.
    ///
    /// Returns `true` when the script asks for a manual refresh.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;

        for panel in &self.panels {
            let dx = (self.elapsed * 0.8 + panel.phase).sin() * 40.0;
            let dy = (self.elapsed * 0.5 + panel.phase).cos() * 12.0;
            self.doc.set_rect(panel.element, panel.base.translated(Vec2::new(dx, dy)));
        }

        let mut refresh = false;
        while let Some((at, _)) = self.script.get(self.next_step) {
            if *at > self.elapsed {
                break;
            }
            let step = self.next_step;
            self.next_step += 1;
            refresh |= self.run(step);
        }
        refresh
    }

    fn run(&mut self, step: usize) -> bool {
        let (at, action) = self.script[step];
        match action {
            Action::Insert { class, rect, radius } => {
                let el = self.insert(class, rect, radius);
                log::info!("[{at:>4.1}s] inserted {el:?} \"{class}\"");
            }
            Action::AddClass(i, token) => {
                if let Some(p) = self.panels.get(i) {
                    self.doc.add_class(p.element, token);
                    log::info!("[{at:>4.1}s] {:?} += {token}", p.element);
                }
            }
            Action::RemoveClass(i, token) => {
                if let Some(p) = self.panels.get(i) {
                    self.doc.remove_class(p.element, token);
                    log::info!(
                        "[{at:>4.1}s] {:?} -= {token} (stays blurred until refresh)",
                        p.element
                    );
                }
            }
            Action::Detach(i) => {
                if let Some(p) = self.panels.get(i) {
                    self.doc.remove(p.element);
                    log::info!("[{at:>4.1}s] detached {:?}", p.element);
                }
            }
            Action::Refresh => {
                log::info!("[{at:>4.1}s] manual refresh");
                return true;
            }
        }
        false
    }
}
