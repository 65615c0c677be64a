//! CPU reference of the blur kernel.
//!
//! Mirrors `shaders/blur.wgsl` operation for operation. The GPU path is the
//! one used for display; this module exists so the kernel's clipping and
//! normalization can be checked without a device.

use crate::config::MAX_KERNEL_RADIUS;
use crate::coords::Vec2;

use super::RegionDraw;

/// Signed distance from `p` to a circle of radius `r` centered at the origin.
#[inline]
pub fn sd_circle(p: Vec2, r: f32) -> f32 {
    p.length() - r
}

/// Signed distance from `p` to a box with half-extents `half` and corner
/// radius `r`, centered at the origin.
#[inline]
pub fn sd_rounded_box(p: Vec2, half: Vec2, r: f32) -> f32 {
    let q = p.abs() - half + Vec2::new(r, r);
    q.max(Vec2::zero()).length() + q.x.max(q.y).min(0.0) - r
}

/// Signed distance from a bottom-left-origin device pixel to the region.
pub fn region_distance(frag: Vec2, draw: &RegionDraw) -> f32 {
    let [cx, cy, hw, hh] = draw.shape;
    let p = frag - Vec2::new(cx, cy);
    if draw.is_circle() {
        sd_circle(p, hw)
    } else {
        let r = draw.corner_radius.min(hw.min(hh));
        sd_rounded_box(p, Vec2::new(hw, hh), r)
    }
}

/// Unnormalized isotropic gaussian weight of offset `(x, y)`.
#[inline]
pub fn gaussian_weight(x: i32, y: i32, sigma: f32) -> f32 {
    let d2 = (x * x + y * y) as f32;
    (-d2 / (2.0 * sigma * sigma)).exp()
}

/// Shades one fragment.
///
/// `frag` is the pixel center in bottom-left-origin device pixels; `source`
/// returns straight RGBA for an integer offset from that pixel. Returns `None`
/// when the fragment lies outside the region (discarded, not blended), and
/// otherwise the premultiplied output color.
pub fn shade<S>(frag: Vec2, draw: &RegionDraw, source: S) -> Option<[f32; 4]>
where
    S: Fn(i32, i32) -> [f32; 4],
{
    if region_distance(frag, draw) > 0.0 {
        return None;
    }

    let s = draw.strength;
    let sigma = (s / 3.0).max(1e-4);
    let r2 = s * s;

    let mut acc = [0.0f32; 4];
    let mut total = 0.0f32;

    for y in -MAX_KERNEL_RADIUS..=MAX_KERNEL_RADIUS {
        for x in -MAX_KERNEL_RADIUS..=MAX_KERNEL_RADIUS {
            if ((x * x + y * y) as f32) > r2 {
                continue;
            }
            let w = gaussian_weight(x, y, sigma);
            let texel = source(x, y);
            for (a, t) in acc.iter_mut().zip(texel) {
                *a += t * w;
            }
            total += w;
        }
    }

    let [r, g, b, a] = acc.map(|c| c / total);
    Some([r * a, g * a, b * a, a])
}

/// Number of offsets the kernel includes for `strength`.
pub fn sample_count(strength: f32) -> usize {
    let r2 = strength * strength;
    let mut n = 0;
    for y in -MAX_KERNEL_RADIUS..=MAX_KERNEL_RADIUS {
        for x in -MAX_KERNEL_RADIUS..=MAX_KERNEL_RADIUS {
            if ((x * x + y * y) as f32) <= r2 {
                n += 1;
            }
        }
    }
    n
}
