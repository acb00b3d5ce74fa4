// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame group passes: update, clear, draw.

use alloc::vec::Vec;

use kurbo::Rect;

use super::id::{GroupId, SpriteId};
use super::store::Scene;
use crate::damage::Damage;
use crate::image::Image;
use crate::surface::{Background, Surface};
use crate::trace::{GroupClearEvent, GroupDrawEvent, GroupUpdateEvent, Tracer};

#[expect(
    clippy::cast_possible_truncation,
    reason = "per-frame counts are bounded by the number of sprites"
)]
fn count(n: usize) -> u32 {
    n as u32
}

impl<I, A> Scene<I, A> {
    /// Runs every member's behavior with `args`.
    ///
    /// Members are visited in no particular order. Behaviors may change the
    /// group while it is being updated; the set of sprites visited is the one
    /// present when the pass started, minus any destroyed along the way.
    pub fn update_group(&mut self, group: GroupId, args: &A) {
        self.update_group_traced(group, args, &mut Tracer::none());
    }

    /// Like [`update_group`](Self::update_group), reporting to `tracer`.
    pub fn update_group_traced(&mut self, group: GroupId, args: &A, tracer: &mut Tracer<'_>) {
        self.validate_group(group);
        let members: Vec<SpriteId> = self.group_sprites(group).collect();
        let mut updated = 0;
        for sprite in members {
            if !self.is_alive(sprite) {
                continue;
            }
            if self.behavior[sprite.idx as usize].is_some() {
                updated += 1;
            }
            self.update_sprite(sprite, args);
        }
        tracer.group_update(&GroupUpdateEvent { group, updated });
    }

    /// Erases what the group drew last frame.
    ///
    /// Repaints every lost region, then every member's last drawn region,
    /// with `background`. Call it before [`draw_group`](Self::draw_group),
    /// which replaces those regions with the new frame's.
    pub fn clear_group<S>(
        &self,
        group: GroupId,
        surface: &mut S,
        background: &mut Background<'_, S>,
    ) where
        S: Surface<Image = I>,
    {
        self.clear_group_traced(group, surface, background, &mut Tracer::none());
    }

    /// Like [`clear_group`](Self::clear_group), reporting to `tracer`.
    pub fn clear_group_traced<S>(
        &self,
        group: GroupId,
        surface: &mut S,
        background: &mut Background<'_, S>,
        tracer: &mut Tracer<'_>,
    ) where
        S: Surface<Image = I>,
    {
        self.validate_group(group);
        let state = &self.groups[group.idx as usize];
        for &region in &state.lost {
            background.repaint(surface, region);
        }
        let mut previous = 0;
        for region in state.members.values().flatten() {
            background.repaint(surface, *region);
            previous += 1;
        }
        tracer.group_clear(&GroupClearEvent {
            group,
            lost: count(state.lost.len()),
            previous,
        });
    }
}

impl<I: Image, A> Scene<I, A> {
    /// Draws one sprite and returns the area it covered.
    ///
    /// A leaf blits its rendered image at its bounding box. A composite draws
    /// its children in order and returns the union of their regions. Hidden
    /// sprites, leaves without an image, and unplaced leaves draw nothing and
    /// return `None`.
    pub fn draw_sprite<S>(&mut self, id: SpriteId, surface: &mut S) -> Option<Rect>
    where
        S: Surface<Image = I>,
    {
        self.validate(id);
        self.draw_at(id.idx as usize, surface)
    }

    /// Draws every member and records the regions for the next clear.
    ///
    /// Lost regions are discarded. The returned [`Damage`] covers everything
    /// that changed on screen: the discarded lost regions and each member's
    /// previous and new regions.
    pub fn draw_group<S>(&mut self, group: GroupId, surface: &mut S) -> Damage
    where
        S: Surface<Image = I>,
    {
        self.draw_group_traced(group, surface, &mut Tracer::none())
    }

    /// Like [`draw_group`](Self::draw_group), reporting to `tracer`.
    pub fn draw_group_traced<S>(
        &mut self,
        group: GroupId,
        surface: &mut S,
        tracer: &mut Tracer<'_>,
    ) -> Damage
    where
        S: Surface<Image = I>,
    {
        self.validate_group(group);
        let mut damage = Damage::new(self.config.max_damage_rects);
        let lost = core::mem::take(&mut self.groups[group.idx as usize].lost);
        for &region in &lost {
            damage.add(region);
        }

        let members: Vec<SpriteId> = self.group_sprites(group).collect();
        let mut drawn = 0;
        for &sprite in &members {
            let region = self.draw_at(sprite.idx as usize, surface);
            if let Some(slot) = self.groups[group.idx as usize].members.get_mut(&sprite)
                && let Some(old) = core::mem::replace(slot, region)
            {
                damage.add(old);
            }
            if let Some(new) = region {
                damage.add(new);
                drawn += 1;
            }
        }

        tracer.group_draw(&GroupDrawEvent {
            group,
            drawn,
            skipped: count(members.len()) - drawn,
            lost_discarded: count(lost.len()),
            damage_rects: count(damage.rects().len()),
        });
        #[cfg(feature = "trace-rich")]
        tracer.damage_rects(group, damage.rects());
        damage
    }

    fn draw_at<S>(&mut self, i: usize, surface: &mut S) -> Option<Rect>
    where
        S: Surface<Image = I>,
    {
        if !self.visible[i] {
            return None;
        }
        if let Some(children) = self.children[i].take() {
            let region = children
                .iter()
                .filter_map(|c| self.draw_at(c.idx as usize, surface))
                .reduce(|a, b| a.union(b));
            self.children[i] = Some(children);
            return region;
        }
        self.refresh(i);
        let top_left = self.origin[i]?;
        let image = self.engine[i].rendered()?;
        let region = surface.blit(image, top_left);
        (!region.is_zero_area()).then_some(region)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use kurbo::{Point, Size};

    use super::*;
    use crate::anchor::Anchor;
    use crate::scene::SceneConfig;
    use crate::testing::{Blit, RecordingSurface, TestImage};

    #[test]
    fn centered_sprite_lifecycle() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let ball = s.create_sprite_with_image(TestImage::new(64, 64));
        s.set_anchor(ball, Anchor::Center).unwrap();
        s.move_to(ball, Point::new(350.0, 350.0)).unwrap();
        s.group_add(g, ball);

        let mut screen = RecordingSurface::new();
        let damage = s.draw_group(g, &mut screen);
        let region = Rect::new(318.0, 318.0, 382.0, 382.0);
        assert_eq!(s.drawn_region(g, ball), Some(region));
        assert_eq!(damage.rects(), [region]);

        s.group_remove(g, ball);
        assert_eq!(s.lost_regions(g), [region]);

        let backdrop = TestImage::new(700, 700);
        let mut screen = RecordingSurface::new();
        s.clear_group(g, &mut screen, &mut Background::Image(&backdrop));
        assert_eq!(screen.repainted(), [region], "lost region repainted once");

        let damage = s.draw_group(g, &mut screen);
        assert!(s.lost_regions(g).is_empty());
        assert_eq!(damage.rects(), [region], "erased area is still damage");
    }

    #[test]
    fn clear_repaints_lost_then_previous() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let a = s.create_sprite_with_image(TestImage::new(10, 10));
        let b = s.create_sprite_with_image(TestImage::new(10, 10));
        s.move_to(a, Point::new(0.0, 0.0)).unwrap();
        s.move_to(b, Point::new(50.0, 0.0)).unwrap();
        s.group_add(g, [a, b]);
        s.draw_group(g, &mut RecordingSurface::new());
        s.group_remove(g, a);

        let mut seen = Vec::new();
        let mut paint = |_: &mut RecordingSurface, r: Rect| seen.push(r);
        s.clear_group(g, &mut RecordingSurface::new(), &mut Background::Paint(&mut paint));
        assert_eq!(
            seen,
            [
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rect::new(50.0, 0.0, 60.0, 10.0)
            ]
        );
    }

    #[test]
    fn clear_does_not_consume_regions() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let a = s.create_sprite_with_image(TestImage::new(10, 10));
        s.move_to(a, Point::ZERO).unwrap();
        s.group_add(g, a);
        s.draw_group(g, &mut RecordingSurface::new());

        let backdrop = TestImage::new(100, 100);
        let mut screen = RecordingSurface::new();
        s.clear_group(g, &mut screen, &mut Background::Image(&backdrop));
        s.clear_group(g, &mut screen, &mut Background::Image(&backdrop));
        assert_eq!(screen.repainted().len(), 2);
        assert!(s.drawn_region(g, a).is_some());
    }

    #[test]
    fn draw_skips_hidden_unplaced_and_imageless() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let hidden = s.create_sprite_with_image(TestImage::new(4, 4));
        s.move_to(hidden, Point::ZERO).unwrap();
        s.set_visible(hidden, false);
        let unplaced = s.create_sprite_with_image(TestImage::new(4, 4));
        let imageless = s.create_sprite();
        s.move_to(imageless, Point::ZERO).unwrap();
        s.group_add(g, [hidden, unplaced, imageless]);

        let mut screen = RecordingSurface::new();
        let damage = s.draw_group(g, &mut screen);
        assert!(screen.blits.is_empty());
        assert!(damage.is_empty());
        for id in [hidden, unplaced, imageless] {
            assert_eq!(s.drawn_region(g, id), None);
            assert!(s.is_dirty(id), "drawing never clears dirty flags");
        }
    }

    #[test]
    fn hidden_sprite_keeps_state() {
        let mut s: Scene<TestImage> = Scene::new();
        let a = s.create_sprite_with_image(TestImage::new(4, 4));
        s.move_to(a, Point::new(2.0, 2.0)).unwrap();
        s.set_scale(a, 2.0).unwrap();
        s.toggle_visibility(a);
        assert_eq!(s.draw_sprite(a, &mut RecordingSurface::new()), None);
        s.toggle_visibility(a);
        assert_eq!(
            s.draw_sprite(a, &mut RecordingSurface::new()),
            Some(Rect::new(2.0, 2.0, 10.0, 10.0))
        );
    }

    #[test]
    fn moved_sprite_damages_old_and_new() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let a = s.create_sprite_with_image(TestImage::new(10, 10));
        s.move_to(a, Point::ZERO).unwrap();
        s.group_add(g, a);
        s.draw_group(g, &mut RecordingSurface::new());

        s.move_to(a, Point::new(5.0, 0.0)).unwrap();
        let damage = s.draw_group(g, &mut RecordingSurface::new());
        assert_eq!(damage.rects(), [Rect::new(0.0, 0.0, 15.0, 10.0)]);

        s.move_to(a, Point::new(100.0, 0.0)).unwrap();
        let damage = s.draw_group(g, &mut RecordingSurface::new());
        assert_eq!(
            damage.rects(),
            [
                Rect::new(5.0, 0.0, 15.0, 10.0),
                Rect::new(100.0, 0.0, 110.0, 10.0)
            ]
        );
    }

    #[test]
    fn damage_collapses_past_configured_limit() {
        let mut s: Scene<TestImage> =
            Scene::with_config(SceneConfig { max_damage_rects: 2 });
        let g = s.create_group();
        for n in 0..3 {
            let id = s.create_sprite_with_image(TestImage::new(10, 10));
            s.move_to(id, Point::new(f64::from(n) * 100.0, 0.0)).unwrap();
            s.group_add(g, id);
        }
        let damage = s.draw_group(g, &mut RecordingSurface::new());
        assert_eq!(damage.rects(), [Rect::new(0.0, 0.0, 210.0, 10.0)]);
    }

    #[test]
    fn composite_draws_children_in_order() {
        let mut s: Scene<TestImage> = Scene::new();
        let composite = s.create_composite();
        let a = s.create_sprite_with_image(TestImage::new(10, 10));
        let b = s.create_sprite_with_image(TestImage::new(4, 4));
        let hidden = s.create_sprite_with_image(TestImage::new(50, 50));
        for child in [a, b, hidden] {
            s.add_child(composite, child);
        }
        s.move_to(composite, Point::new(20.0, 20.0)).unwrap();
        s.set_visible(hidden, false);

        let mut screen = RecordingSurface::new();
        let region = s.draw_sprite(composite, &mut screen);
        assert_eq!(region, Some(Rect::new(20.0, 20.0, 30.0, 30.0)));
        assert_eq!(
            screen.blits,
            [
                Blit::Image {
                    top_left: Point::new(20.0, 20.0),
                    size: Size::new(10.0, 10.0)
                },
                Blit::Image {
                    top_left: Point::new(20.0, 20.0),
                    size: Size::new(4.0, 4.0)
                },
            ]
        );
    }

    #[test]
    fn nested_composite_keeps_children_across_draws() {
        let mut s: Scene<TestImage> = Scene::new();
        let outer = s.create_composite();
        let inner = s.create_composite();
        let leaf = s.create_sprite_with_image(TestImage::new(6, 6));
        s.add_child(outer, inner);
        s.add_child(outer, inner);
        s.add_child(inner, leaf);
        s.move_to(outer, Point::new(5.0, 5.0)).unwrap();

        for _ in 0..2 {
            let mut screen = RecordingSurface::new();
            let region = s.draw_sprite(outer, &mut screen);
            assert_eq!(region, Some(Rect::new(5.0, 5.0, 11.0, 11.0)));
            assert_eq!(screen.blits.len(), 2, "listed twice, drawn twice");
        }
        assert_eq!(s.children(outer), [inner, inner]);
        assert_eq!(s.children(inner), [leaf]);
    }

    #[test]
    fn hidden_composite_draws_nothing() {
        let mut s: Scene<TestImage> = Scene::new();
        let composite = s.create_composite();
        let child = s.create_sprite_with_image(TestImage::new(10, 10));
        s.add_child(composite, child);
        s.move_to(composite, Point::ZERO).unwrap();
        s.set_visible(composite, false);
        s.set_visible(child, true);

        let mut screen = RecordingSurface::new();
        assert_eq!(s.draw_sprite(composite, &mut screen), None);
        assert!(screen.blits.is_empty());
    }

    #[test]
    fn empty_composite_draws_nothing() {
        let mut s: Scene<TestImage> = Scene::new();
        let composite = s.create_composite();
        assert_eq!(s.draw_sprite(composite, &mut RecordingSurface::new()), None);
    }

    #[test]
    fn update_forwards_args_to_every_member() {
        let mut s: Scene<TestImage, (i64, &'static str)> = Scene::new();
        let g = s.create_group();
        let log = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..3 {
            let id = s.create_sprite();
            let log = Rc::clone(&log);
            s.set_behavior(
                id,
                move |_: &mut Scene<TestImage, (i64, &'static str)>,
                      me: SpriteId,
                      args: &(i64, &'static str)| {
                    log.borrow_mut().push((me, *args));
                },
            );
            s.group_add(g, id);
        }
        let plain = s.create_sprite();
        s.group_add(g, plain);

        s.update_group(g, &(7, "tick"));
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(log.iter().all(|(_, args)| *args == (7, "tick")));
    }

    #[test]
    fn update_survives_members_killing_each_other() {
        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let ids: Vec<SpriteId> = (0..4).map(|_| s.create_sprite()).collect();
        for &id in &ids {
            let victims = ids.clone();
            s.set_behavior(id, move |scene: &mut Scene<TestImage>, me: SpriteId, _args: &()| {
                for &v in &victims {
                    if v != me && scene.is_alive(v) {
                        scene.destroy_sprite(v);
                    }
                }
            });
            s.group_add(g, id);
        }
        s.update_group(g, &());
        assert_eq!(s.group_len(g), 1);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traced_passes_report_counts() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            update: Vec<GroupUpdateEvent>,
            clear: Vec<GroupClearEvent>,
            draw: Vec<GroupDrawEvent>,
        }
        impl TraceSink for Counts {
            fn on_group_update(&mut self, e: &GroupUpdateEvent) {
                self.update.push(*e);
            }
            fn on_group_clear(&mut self, e: &GroupClearEvent) {
                self.clear.push(*e);
            }
            fn on_group_draw(&mut self, e: &GroupDrawEvent) {
                self.draw.push(*e);
            }
        }

        let mut s: Scene<TestImage> = Scene::new();
        let g = s.create_group();
        let a = s.create_sprite_with_image(TestImage::new(10, 10));
        let b = s.create_sprite();
        s.move_to(a, Point::ZERO).unwrap();
        s.set_behavior(a, |_: &mut Scene<TestImage>, _: SpriteId, _: &()| {});
        s.group_add(g, [a, b]);

        let mut sink = Counts::default();
        let mut tracer = Tracer::new(&mut sink);
        let mut screen = RecordingSurface::new();
        s.update_group_traced(g, &(), &mut tracer);
        s.draw_group_traced(g, &mut screen, &mut tracer);
        s.clear_group_traced(
            g,
            &mut screen,
            &mut Background::Image(&TestImage::new(1, 1)),
            &mut tracer,
        );
        drop(tracer);

        assert_eq!(sink.update[0].updated, 1);
        assert_eq!(
            sink.draw[0],
            GroupDrawEvent {
                group: g,
                drawn: 1,
                skipped: 1,
                lost_discarded: 0,
                damage_rects: 1,
            }
        );
        assert_eq!(sink.clear[0].previous, 1);
    }
}
