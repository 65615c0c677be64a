//! Layout rectangle -> kernel shape conversion.
//!
//! Runs once per region per frame; nothing here is cached because layout can
//! change between any two frames.

use crate::coords::{BorderRadius, Rect, Vec2};

use super::RegionDraw;

/// Integer device-pixel box, top-left origin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelBox {
    /// Scales a logical rectangle into device pixels and inflates it by
    /// `guard` pixels on every side.
    ///
    /// The origin rounds down and the extent rounds up, so the box always
    /// covers every device pixel the element touches.
    pub fn from_rect(rect: Rect, scale: f32, guard: i32) -> Self {
        let rect = rect.normalized();
        Self {
            left: (rect.left() * scale).floor() as i32 - guard,
            top: (rect.top() * scale).floor() as i32 - guard,
            width: (rect.width() * scale).ceil() as i32 + 2 * guard,
            height: (rect.height() * scale).ceil() as i32 + 2 * guard,
        }
    }

    /// Center in device pixels with the Y axis flipped against `canvas_height`.
    #[inline]
    pub fn flipped_center(self, canvas_height: u32) -> Vec2 {
        let cx = self.left as f32 + self.width as f32 / 2.0;
        let cy = canvas_height as f32 - (self.top as f32 + self.height as f32 / 2.0);
        Vec2::new(cx, cy)
    }
}

/// Shape handed to the kernel, in bottom-left-origin device pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RegionShape {
    RoundedRect { center: Vec2, half: Vec2, radius: f32 },
    Circle { center: Vec2, radius: f32 },
}

impl RegionShape {
    /// Resolves the shape of one element for the current frame.
    ///
    /// A percentage radius of 50% or more yields a circle whose radius is half
    /// the padded box width. Anything else is a rounded rectangle whose corner
    /// radius is scaled like the box and capped at the shorter half-extent.
    pub fn resolve(
        rect: Rect,
        radius: BorderRadius,
        scale: f32,
        guard: i32,
        canvas_height: u32,
    ) -> Self {
        let px = PixelBox::from_rect(rect, scale, guard);
        let center = px.flipped_center(canvas_height);
        let half = Vec2::new(px.width as f32 / 2.0, px.height as f32 / 2.0);

        if radius.is_circular() {
            return RegionShape::Circle {
                center,
                radius: half.x,
            };
        }

        let rect = rect.normalized();
        let corner = radius.to_px(rect.width(), rect.height()) * scale;
        RegionShape::RoundedRect {
            center,
            half,
            radius: corner.min(half.x.min(half.y)),
        }
    }

    /// `(cx, cy, hw, hh)` as the kernel expects it; circles set `hh = 0`.
    #[inline]
    pub fn shape_vector(self) -> [f32; 4] {
        match self {
            RegionShape::RoundedRect { center, half, .. } => [center.x, center.y, half.x, half.y],
            RegionShape::Circle { center, radius } => [center.x, center.y, radius, 0.0],
        }
    }

    #[inline]
    pub fn corner_radius(self) -> f32 {
        match self {
            RegionShape::RoundedRect { radius, .. } | RegionShape::Circle { radius, .. } => radius,
        }
    }

    /// Packs the shape with the per-frame uniforms into a draw.
    pub fn to_draw(self, canvas: (u32, u32), strength: f32) -> RegionDraw {
        RegionDraw {
            shape: self.shape_vector(),
            corner_radius: self.corner_radius(),
            resolution: [canvas.0 as f32, canvas.1 as f32],
            strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_and_padded_box() {
        let px = PixelBox::from_rect(Rect::new(100.0, 50.0, 40.0, 20.0), 0.5, 1);
        assert_eq!((px.left, px.top, px.width, px.height), (49, 24, 22, 12));
    }

    #[test]
    fn fractional_edges_round_outward() {
        let px = PixelBox::from_rect(Rect::new(10.5, 3.3, 7.1, 2.2), 1.0, 0);
        assert_eq!((px.left, px.top, px.width, px.height), (10, 3, 8, 3));
    }

    #[test]
    fn center_flips_y() {
        let px = PixelBox {
            left: 49,
            top: 24,
            width: 22,
            height: 12,
        };
        assert_eq!(px.flipped_center(300), Vec2::new(60.0, 300.0 - 30.0));
    }

    #[test]
    fn half_percent_is_circle() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        for pct in [50.0, 75.0, 100.0] {
            let shape = RegionShape::resolve(rect, BorderRadius::Percent(pct), 1.0, 1, 100);
            let v = shape.shape_vector();
            assert_eq!(v[3], 0.0, "{pct}%");
            assert_eq!(v[2], 21.0);
            assert_eq!(shape.corner_radius(), 21.0);
        }
    }

    #[test]
    fn below_half_percent_is_rounded_rect() {
        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        let shape = RegionShape::resolve(rect, BorderRadius::Percent(49.0), 1.0, 1, 100);
        let v = shape.shape_vector();
        assert_eq!((v[2], v[3]), (21.0, 11.0));
        // 49% of the 20px short side.
        assert!((shape.corner_radius() - 9.8).abs() < 1e-4);
    }

    #[test]
    fn pixel_radius_is_scaled_and_capped() {
        let rect = Rect::new(100.0, 50.0, 40.0, 20.0);
        let shape = RegionShape::resolve(rect, BorderRadius::Px(8.0), 0.5, 1, 300);
        assert_eq!(shape.corner_radius(), 4.0);

        let huge = RegionShape::resolve(rect, BorderRadius::Px(500.0), 0.5, 1, 300);
        assert_eq!(huge.corner_radius(), 6.0);
    }

    #[test]
    fn to_draw_carries_uniforms() {
        let rect = Rect::new(100.0, 50.0, 40.0, 20.0);
        let draw = RegionShape::resolve(rect, BorderRadius::Px(0.0), 0.5, 1, 300)
            .to_draw((400, 300), 7.5);
        assert_eq!(draw.shape, [60.0, 270.0, 11.0, 6.0]);
        assert_eq!(draw.resolution, [400.0, 300.0]);
        assert_eq!(draw.strength, 7.5);
        assert!(!draw.is_circle());
    }
}
