// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use kurbo::Rect;
use tableau_core::scene::GroupId;
use tableau_core::trace::{GroupClearEvent, GroupDrawEvent, GroupUpdateEvent, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    frame: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, frame: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, frame: 0 }
    }

    /// Sets the frame number printed with subsequent events.
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn group_label(group: GroupId) -> String {
    format!("{}.{}", group.index(), group.generation())
}

fn rect_label(r: &Rect) -> String {
    format!("({},{} {}x{})", r.x0, r.y0, r.width(), r.height())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_group_update(&mut self, e: &GroupUpdateEvent) {
        let _ = writeln!(
            self.writer,
            "[update] frame={} group={} updated={}",
            self.frame,
            group_label(e.group),
            e.updated,
        );
    }

    fn on_group_clear(&mut self, e: &GroupClearEvent) {
        let _ = writeln!(
            self.writer,
            "[clear] frame={} group={} lost={} previous={}",
            self.frame,
            group_label(e.group),
            e.lost,
            e.previous,
        );
    }

    fn on_group_draw(&mut self, e: &GroupDrawEvent) {
        let _ = writeln!(
            self.writer,
            "[draw] frame={} group={} drawn={} skipped={} lost={} damage={}",
            self.frame,
            group_label(e.group),
            e.drawn,
            e.skipped,
            e.lost_discarded,
            e.damage_rects,
        );
    }

    fn on_damage_rects(&mut self, group: GroupId, rects: &[Rect]) {
        let list: Vec<String> = rects.iter().map(rect_label).collect();
        let _ = writeln!(
            self.writer,
            "[damage] frame={} group={} rects=[{}]",
            self.frame,
            group_label(group),
            list.join(" "),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_core::image::Image;
    use tableau_core::scene::Scene;

    #[derive(Clone, Debug)]
    struct Blank;

    impl Image for Blank {
        fn dimensions(&self) -> (u32, u32) {
            (1, 1)
        }

        fn resize(&self, _width: u32, _height: u32) -> Self {
            Self
        }

        fn rotate(&self, _degrees: u32) -> Self {
            Self
        }
    }

    fn group() -> GroupId {
        Scene::<Blank>::new().create_group()
    }

    #[test]
    fn pretty_print_draw() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.set_frame(3);
        sink.on_group_draw(&GroupDrawEvent {
            group: group(),
            drawn: 2,
            skipped: 1,
            lost_discarded: 0,
            damage_rects: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "[draw] frame=3 group=0.0 drawn=2 skipped=1 lost=0 damage=2\n"
        );
    }

    #[test]
    fn pretty_print_damage_rects() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_damage_rects(
            group(),
            &[
                Rect::new(318.0, 318.0, 382.0, 382.0),
                Rect::new(0.0, 0.0, 10.0, 5.0),
            ],
        );
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[damage] frame=0"), "got: {output}");
        assert!(
            output.contains("rects=[(318,318 64x64) (0,0 10x5)]"),
            "got: {output}"
        );
    }

    #[test]
    fn pretty_print_update_and_clear() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let group = group();
        sink.on_group_update(&GroupUpdateEvent { group, updated: 4 });
        sink.on_group_clear(&GroupClearEvent {
            group,
            lost: 1,
            previous: 3,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[update]") && lines[0].contains("updated=4"));
        assert!(lines[1].contains("lost=1 previous=3"), "got: {}", lines[1]);
    }
}
