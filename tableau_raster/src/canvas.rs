// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A software render target.

use kurbo::{Point, Rect};
use tableau_core::surface::Surface;

use crate::blend::blend_over;
use crate::pixmap::Pixmap;

/// Integer pixel rectangle, half-open on the right and bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelRect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl PixelRect {
    fn sized(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + i64::from(width),
            y1: y + i64::from(height),
        }
    }

    /// Smallest pixel rectangle covering `r`.
    fn covering(r: Rect) -> Self {
        let r = r.abs();
        Self {
            x0: to_i64(r.x0.floor()),
            y0: to_i64(r.y0.floor()),
            x1: to_i64(r.x1.ceil()),
            y1: to_i64(r.y1.ceil()),
        }
    }

    fn intersect(self, other: Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    fn to_rect(self) -> Rect {
        Rect::new(
            self.x0 as f64,
            self.y0 as f64,
            self.x1 as f64,
            self.y1 as f64,
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "values are whole numbers; out-of-range coordinates saturate and are clipped"
)]
fn to_i64(v: f64) -> i64 {
    v as i64
}

/// An opaque pixmap that sprites are blitted onto.
///
/// Blits are clipped to the canvas and composited source-over, so
/// translucent sprite pixels blend with what is underneath.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    target: Pixmap,
}

impl Canvas {
    /// Creates a canvas filled with `color`.
    #[must_use]
    pub fn new(width: u32, height: u32, color: u32) -> Self {
        Self {
            target: Pixmap::filled(width, height, color),
        }
    }

    /// Returns the pixels drawn so far.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.target
    }

    /// Consumes the canvas, returning its pixels.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.target
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.target.pixel(x, y)
    }

    /// Overwrites `rect` (clipped to the canvas) with `color` and returns the
    /// area written.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) -> Rect {
        let clipped = PixelRect::covering(rect).intersect(self.bounds());
        if clipped.is_empty() {
            return Rect::ZERO;
        }
        let stride = self.target.width() as usize;
        let pixels = self.target.pixels_mut();
        for y in clipped.y0..clipped.y1 {
            let row = to_index(y) * stride;
            pixels[row + to_index(clipped.x0)..row + to_index(clipped.x1)].fill(color);
        }
        clipped.to_rect()
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::sized(0, 0, self.target.width(), self.target.height())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "called on coordinates already clipped to the pixmap"
)]
fn to_index(v: i64) -> usize {
    v as usize
}

impl Surface for Canvas {
    type Image = Pixmap;

    fn blit(&mut self, image: &Pixmap, top_left: Point) -> Rect {
        let area = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
        self.blit_area(image, top_left, area)
    }

    fn blit_area(&mut self, image: &Pixmap, top_left: Point, area: Rect) -> Rect {
        let src = PixelRect::covering(area)
            .intersect(PixelRect::sized(0, 0, image.width(), image.height()));
        if src.is_empty() {
            return Rect::ZERO;
        }
        let (dx, dy) = (to_i64(top_left.x.floor()), to_i64(top_left.y.floor()));
        // Source pixel (x, y) lands on (x + ox, y + oy).
        let (ox, oy) = (dx - src.x0, dy - src.y0);
        let dst = PixelRect {
            x0: dx,
            y0: dy,
            x1: src.x1 + ox,
            y1: src.y1 + oy,
        }
        .intersect(self.bounds());
        if dst.is_empty() {
            return Rect::ZERO;
        }

        let src_stride = image.width() as usize;
        let dst_stride = self.target.width() as usize;
        let source = image.pixels();
        let target = self.target.pixels_mut();
        for y in dst.y0..dst.y1 {
            let src_row = to_index(y - oy) * src_stride;
            let dst_row = to_index(y) * dst_stride;
            for x in dst.x0..dst.x1 {
                let s = source[src_row + to_index(x - ox)];
                let d = &mut target[dst_row + to_index(x)];
                *d = blend_over(s, *d);
            }
        }
        dst.to_rect()
    }
}

#[cfg(test)]
mod tests {
    use tableau_core::anchor::Anchor;
    use tableau_core::scene::Scene;
    use tableau_core::surface::Background;

    use super::*;
    use crate::argb;

    const SKY: u32 = 0xFF33_66CC;
    const BALL: u32 = 0xFFFF_0000;

    #[test]
    fn blit_copies_and_reports_area() {
        let mut canvas = Canvas::new(10, 10, SKY);
        let sprite = Pixmap::filled(3, 2, BALL);
        let region = canvas.blit(&sprite, Point::new(4.0, 5.0));
        assert_eq!(region, Rect::new(4.0, 5.0, 7.0, 7.0));
        assert_eq!(canvas.pixel(4, 5), Some(BALL));
        assert_eq!(canvas.pixel(6, 6), Some(BALL));
        assert_eq!(canvas.pixel(7, 6), Some(SKY));
        assert_eq!(canvas.pixel(4, 7), Some(SKY));
    }

    #[test]
    fn blit_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(10, 10, SKY);
        let sprite = Pixmap::filled(4, 4, BALL);
        let region = canvas.blit(&sprite, Point::new(-2.0, 8.0));
        assert_eq!(region, Rect::new(0.0, 8.0, 2.0, 10.0));
        assert_eq!(canvas.pixel(0, 9), Some(BALL));
        assert_eq!(canvas.pixel(2, 9), Some(SKY));

        let region = canvas.blit(&sprite, Point::new(20.0, 20.0));
        assert!(region.is_zero_area(), "fully outside draws nothing");
    }

    #[test]
    fn transparent_pixels_keep_background() {
        let mut canvas = Canvas::new(4, 4, SKY);
        let mut sprite = Pixmap::new(2, 1);
        sprite.set_pixel(1, 0, BALL);
        canvas.blit(&sprite, Point::ZERO);
        assert_eq!(canvas.pixel(0, 0), Some(SKY));
        assert_eq!(canvas.pixel(1, 0), Some(BALL));

        canvas.blit(&Pixmap::filled(1, 1, argb(128, 255, 255, 255)), Point::new(2.0, 0.0));
        let blended = canvas.pixel(2, 0).unwrap();
        assert_ne!(blended, SKY);
        assert_eq!(blended >> 24, 0xFF);
    }

    #[test]
    fn blit_area_copies_same_region() {
        let mut backdrop = Pixmap::filled(8, 8, SKY);
        backdrop.set_pixel(3, 3, BALL);
        let mut canvas = Canvas::new(8, 8, 0xFF00_0000);
        let area = Rect::new(2.0, 2.0, 5.0, 5.0);
        let region = canvas.blit_area(&backdrop, area.origin(), area);
        assert_eq!(region, area);
        assert_eq!(canvas.pixel(3, 3), Some(BALL));
        assert_eq!(canvas.pixel(2, 4), Some(SKY));
        assert_eq!(canvas.pixel(1, 1), Some(0xFF00_0000));
        assert_eq!(canvas.pixel(5, 5), Some(0xFF00_0000));
    }

    #[test]
    fn fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4, SKY);
        let written = canvas.fill_rect(Rect::new(2.0, 2.0, 9.0, 9.0), BALL);
        assert_eq!(written, Rect::new(2.0, 2.0, 4.0, 4.0));
        assert_eq!(canvas.pixel(3, 3), Some(BALL));
        assert_eq!(canvas.pixel(1, 1), Some(SKY));
    }

    #[test]
    fn ball_is_drawn_then_erased() {
        let mut screen = Canvas::new(700, 700, SKY);
        let backdrop = screen.pixmap().clone();
        let mut scene: Scene<Pixmap> = Scene::new();
        let group = scene.create_group();
        let ball = scene.create_sprite_with_image(Pixmap::filled(64, 64, BALL));
        scene.set_anchor(ball, Anchor::Center).unwrap();
        scene.move_to(ball, Point::new(350.0, 350.0)).unwrap();
        scene.group_add(group, ball);

        scene.draw_group(group, &mut screen);
        let region = Rect::new(318.0, 318.0, 382.0, 382.0);
        assert_eq!(scene.drawn_region(group, ball), Some(region));
        assert_eq!(screen.pixel(350, 350), Some(BALL));
        assert_eq!(screen.pixel(318, 318), Some(BALL));
        assert_eq!(screen.pixel(317, 318), Some(SKY));

        scene.group_remove(group, ball);
        scene.clear_group(group, &mut screen, &mut Background::Image(&backdrop));
        assert_eq!(screen, Canvas::new(700, 700, SKY), "ball fully erased");
    }

    #[test]
    fn painter_background_erases_moved_sprite() {
        let mut screen = Canvas::new(100, 100, SKY);
        let mut scene: Scene<Pixmap> = Scene::new();
        let group = scene.create_group();
        let ball = scene.create_sprite_with_image(Pixmap::filled(10, 10, BALL));
        scene.move_to(ball, Point::new(10.0, 10.0)).unwrap();
        scene.group_add(group, ball);
        scene.draw_group(group, &mut screen);

        let mut paint = |canvas: &mut Canvas, r: Rect| {
            canvas.fill_rect(r, SKY);
        };
        scene.move_to(ball, Point::new(50.0, 10.0)).unwrap();
        scene.clear_group(group, &mut screen, &mut Background::Paint(&mut paint));
        let damage = scene.draw_group(group, &mut screen);

        assert_eq!(screen.pixel(15, 15), Some(SKY), "old position erased");
        assert_eq!(screen.pixel(55, 15), Some(BALL));
        assert_eq!(damage.rects().len(), 2);
    }

    #[test]
    fn rotated_ball_stays_centered() {
        let mut screen = Canvas::new(200, 200, SKY);
        let mut scene: Scene<Pixmap> = Scene::new();
        let ball = scene.create_sprite_with_image(Pixmap::filled(40, 20, BALL));
        scene.set_anchor(ball, Anchor::Center).unwrap();
        scene.move_to(ball, Point::new(100.0, 100.0)).unwrap();
        scene.set_rotation(ball, 90);
        scene.set_scale(ball, 2.0).unwrap();

        let region = scene.draw_sprite(ball, &mut screen).unwrap();
        assert_eq!(region, Rect::new(80.0, 60.0, 120.0, 140.0));
        assert_eq!(screen.pixel(100, 61), Some(BALL));
        assert_eq!(screen.pixel(79, 100), Some(SKY));
    }
}
