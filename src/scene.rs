//! Demo page: a few cards snow can settle on, and the stuck snow drawn over them

use snow_accumulation::{AccumulationPainter, PileLayout, SnowStore};
use snow_regions::{AccumulationArea, RegionOptions, RegionTracker};
use snow_surface::{mocha, snow, Color, DrawSurface, Mesh, MeshSurface, Rect, Viewport};
use std::cell::Cell;
use std::rc::Rc;

/// A card positioned in fractions of the window
struct Card {
    id: &'static str,
    color: Color,
    /// left, top, right, bottom as fractions of the viewport
    frame: [f32; 4],
    options: RegionOptions,
}

impl Card {
    fn rect(&self, viewport: Viewport) -> Rect {
        let [l, t, r, b] = self.frame;
        Rect::from_ltrb(
            l * viewport.width,
            t * viewport.height,
            r * viewport.width,
            b * viewport.height,
        )
    }
}

fn cards() -> [Card; 3] {
    [
        Card {
            id: "welcome",
            color: mocha::SURFACE0,
            frame: [0.08, 0.45, 0.40, 0.75],
            options: RegionOptions::default(),
        },
        Card {
            id: "pricing",
            color: mocha::SURFACE1,
            frame: [0.55, 0.35, 0.92, 0.65],
            options: RegionOptions::default(),
        },
        // Sits on top of "pricing" and wins where they overlap
        Card {
            id: "badge",
            color: mocha::MAUVE,
            frame: [0.70, 0.28, 0.86, 0.40],
            options: RegionOptions::default()
                .with_area(AccumulationArea::All)
                .with_priority(10),
        },
    ]
}

pub struct Scene {
    viewport: Rc<Cell<Viewport>>,
    backdrop: MeshSurface,
    overlay: MeshSurface,
    painter: AccumulationPainter,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        let mut backdrop = MeshSurface::new();
        let mut overlay = MeshSurface::new();
        backdrop.resize(viewport);
        overlay.resize(viewport);

        Self {
            viewport: Rc::new(Cell::new(viewport)),
            backdrop,
            overlay,
            painter: AccumulationPainter::default().with_pile_layout(PileLayout::default()),
        }
    }

    /// Register every card as a region whose box follows the window size
    pub fn register(&self, tracker: &mut RegionTracker) {
        for card in cards() {
            let viewport = self.viewport.clone();
            let (id, options) = (card.id, card.options);
            tracker.register(id, move || card.rect(viewport.get()), options);
        }
    }

    /// Call before refreshing the tracker so region boxes see the new size
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport.set(viewport);
        self.backdrop.resize(viewport);
        self.overlay.resize(viewport);
    }

    /// Redraw the cards and the snow stuck to them
    pub fn draw(&mut self, tracker: &RegionTracker, store: &SnowStore, now: u64) {
        let viewport = self.viewport.get();

        self.backdrop.clear_rect(viewport.rect());
        for card in cards() {
            self.backdrop.set_fill_color(card.color);
            self.backdrop.fill_rect(card.rect(viewport));
        }

        let config = store.config();
        self.painter
            .set_color(config.palette.first().copied().unwrap_or(snow::WHITE));
        self.painter.set_fade_duration(config.fade_duration_ms);

        self.overlay.clear_rect(viewport.rect());
        for id in tracker.ids() {
            let Some(rect) = tracker.box_of(id) else {
                continue;
            };
            self.painter
                .paint(&mut self.overlay, rect.origin(), store.stuck(id), now);
        }
    }

    pub fn backdrop(&self) -> &Mesh {
        self.backdrop.mesh()
    }

    pub fn overlay(&self) -> &Mesh {
        self.overlay.mesh()
    }
}
