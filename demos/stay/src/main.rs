// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that keeps one ball sprite anchored at the centre of
//! the screen while it is scaled, rotated, re-anchored and hidden.
//!
//! Input is scripted per frame instead of read from a keyboard. Each frame
//! erases the previous frame's regions, runs the ball's behavior, and draws,
//! printing trace events through a
//! [`PrettyPrintSink`](tableau_debug::pretty::PrettyPrintSink). Pass a path
//! to also write the final frame as a binary PPM image.

use std::fs::File;
use std::io::{BufWriter, Write};

use kurbo::{Point, Rect};
use tableau_core::anchor::Anchor;
use tableau_core::scene::{Scene, SpriteId};
use tableau_core::surface::Background;
use tableau_core::trace::Tracer;
use tableau_debug::pretty::PrettyPrintSink;
use tableau_raster::{Canvas, Pixmap};

const SCREEN_SIZE: u32 = 700;
const SCALE_STEP: f64 = 0.1;
const SCALE_MIN: f64 = 0.3;
const SCALE_MAX: f64 = 7.0;
const ROTATE_STEP: i64 = 5;
const FRAME_COUNT: u64 = 120;

const BACKGROUND: u32 = 0xFFE1_E1E1;
const SQUARE: u32 = 0xFF00_0000;
const BALL_SIZE: u32 = 64;

/// Keys held during a frame, as `-1`, `0` or `+1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Held {
    scale: i8,
    rotate: i8,
}

/// One-shot key releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Release {
    ToggleAnchor,
    ToggleVisibility,
}

fn script(frame: u64) -> (Held, Option<Release>) {
    let held = match frame {
        0..20 => Held { scale: 1, rotate: 0 },
        20..40 => Held { scale: 0, rotate: 1 },
        40..60 => Held { scale: 0, rotate: -1 },
        70..90 => Held { scale: -1, rotate: 0 },
        _ => Held::default(),
    };
    let release = match frame {
        40 | 90 => Some(Release::ToggleAnchor),
        60 | 70 => Some(Release::ToggleVisibility),
        _ => None,
    };
    (held, release)
}

/// Applies held keys, staying within the allowed scale range.
fn steer(scene: &mut Scene<Pixmap, Held>, ball: SpriteId, held: &Held) {
    if held.scale != 0 {
        let delta = SCALE_STEP * f64::from(held.scale);
        let next = scene.scale(ball) + delta;
        if SCALE_MIN < next
            && next < SCALE_MAX
            && let Err(err) = scene.scale_by(ball, delta)
        {
            eprintln!("scale rejected: {err}");
        }
    }
    if held.rotate != 0 {
        scene.rotate_by(ball, ROTATE_STEP * i64::from(held.rotate));
    }
}

/// A filled disc with a transparent surround, as tightly packed RGBA.
fn ball_rgba(size: u32) -> Vec<u8> {
    let r = f64::from(size) / 2.0;
    let mut data = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) + 0.5 - r;
            let dy = f64::from(y) + 0.5 - r;
            let inside = dx * dx + dy * dy <= r * r;
            let shade = if dx + dy < 0.0 { 230 } else { 180 };
            let px: [u8; 4] = if inside {
                [shade, 40, 40, 255]
            } else {
                [0, 0, 0, 0]
            };
            data.extend_from_slice(&px);
        }
    }
    data
}

/// Background with corner marks around the centre at three distances.
fn backdrop() -> Canvas {
    let mut canvas = Canvas::new(SCREEN_SIZE, SCREEN_SIZE, BACKGROUND);
    let centre = f64::from(SCREEN_SIZE) / 2.0;
    let line = 5.0;
    for size in [100.0, 250.0, 500.0] {
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                let x = centre + sx * size / 2.0;
                let y = centre + sy * size / 2.0;
                canvas.fill_rect(span(x, y - sy * line, x, y), SQUARE);
                canvas.fill_rect(span(x - sx * line, y, x, y), SQUARE);
            }
        }
    }
    canvas
}

/// One-pixel-wide line between two points on the same row or column,
/// endpoints included.
fn span(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::new(x0.min(x1), y0.min(y1), x0.max(x1) + 1.0, y0.max(y1) + 1.0)
}

fn write_ppm(canvas: &Canvas, path: &str) -> std::io::Result<()> {
    let pixmap = canvas.pixmap();
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "P6 {} {} 255", pixmap.width(), pixmap.height())?;
    for &p in pixmap.pixels() {
        let [_, r, g, b] = p.to_be_bytes();
        out.write_all(&[r, g, b])?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args().nth(1);

    // -- surfaces ----------------------------------------------------------
    let background = backdrop();
    let mut screen = background.clone();
    let background = background.into_pixmap();

    // -- scene -------------------------------------------------------------
    let mut scene: Scene<Pixmap, Held> = Scene::new();
    let image = Pixmap::from_rgba8(BALL_SIZE, BALL_SIZE, &ball_rgba(BALL_SIZE))?;
    let ball = scene.create_sprite_with_image(image);
    scene.set_anchor(ball, Anchor::Center)?;
    let centre = f64::from(SCREEN_SIZE) / 2.0;
    scene.move_to(ball, Point::new(centre, centre))?;
    scene.set_behavior(ball, steer);
    let all = scene.create_group_with(ball);

    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut damaged = 0.0;

    // -- frame loop --------------------------------------------------------
    for frame in 0..FRAME_COUNT {
        let (held, release) = script(frame);
        match release {
            Some(Release::ToggleAnchor) => {
                let next = if scene.anchor(ball) == Anchor::Center {
                    Anchor::TopLeft
                } else {
                    Anchor::Center
                };
                scene.set_anchor(ball, next)?;
            }
            Some(Release::ToggleVisibility) => scene.toggle_visibility(ball),
            None => {}
        }

        pretty.set_frame(frame);
        let mut tracer = Tracer::new(&mut pretty);
        scene.clear_group_traced(
            all,
            &mut screen,
            &mut Background::Image(&background),
            &mut tracer,
        );
        scene.update_group_traced(all, &held, &mut tracer);
        let damage = scene.draw_group_traced(all, &mut screen, &mut tracer);
        damaged += damage.rects().iter().map(Rect::area).sum::<f64>();
    }

    println!(
        "{FRAME_COUNT} frames, scale {:.1}, rotation {}, {damaged} px presented",
        scene.scale(ball),
        scene.rotation(ball),
    );
    if let Some(path) = output {
        write_ppm(&screen, &path)?;
        println!("wrote {path}");
    }
    Ok(())
}
