//! Collision detection and response for axis-aligned objects
//!
//! Detection is a linear scan with a cheap horizontal prune. Response depends
//! on the other side of the pair:
//! - entity: no correction, both sides just get `on_collision`
//! - static collider: the mover is snapped flush against it on the axis it
//!   moved along, then both sides get `on_collision`

use glam::Vec2;

use super::object::{Body, GameObject};
use crate::consts::{PRUNE_DISTANCE, PRUNE_WIDE_COLLIDER};

/// Proximity prune for candidate gathering
///
/// Uses the signed difference `subject.x - candidate.x`, not the absolute
/// distance: every candidate to the subject's right passes, candidates to
/// the left pass only when closer than [`PRUNE_DISTANCE`]. Wide colliders
/// (floors, long platforms) always pass.
#[inline]
pub fn near_enough(subject: &Body, candidate: &Body) -> bool {
    subject.rect.pos.x - candidate.rect.pos.x < PRUNE_DISTANCE
        || candidate.rect.w > PRUNE_WIDE_COLLIDER
}

/// Indices of all colliders overlapping `objects[subject]`, in list order
///
/// A subject without a collider collides with nothing, and objects without a
/// collider are never returned.
pub fn get_collisions(objects: &[GameObject], subject: usize) -> Vec<usize> {
    let col = &objects[subject].body;
    if !col.has_collider {
        return Vec::new();
    }

    objects
        .iter()
        .enumerate()
        .filter(|&(i, other)| {
            let other = &other.body;
            i != subject && other.has_collider && near_enough(col, other) && col.rect.overlaps(&other.rect)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Snap `col` flush against the face of `other` it moved into
///
/// `delta` is the single-axis move that caused the overlap; x takes
/// precedence when both components are set.
pub fn snap_out(col: &mut Body, other: &Body, delta: Vec2) {
    let rect = &mut col.rect;
    if delta.x > 0.0 {
        rect.pos.x = other.rect.left() - rect.w as f32;
    } else if delta.x < 0.0 {
        rect.pos.x = other.rect.right();
    } else if delta.y > 0.0 {
        rect.pos.y = other.rect.top() - rect.h as f32;
    } else if delta.y < 0.0 {
        rect.pos.y = other.rect.bottom();
    }
}

/// Resolve one detected pair
pub fn resolve_pair(objects: &mut [GameObject], col: usize, other: usize, delta: Vec2) {
    let (col, other) = pair_mut(objects, col, other);
    if !other.body.is_entity {
        snap_out(&mut col.body, &other.body, delta);
    }
    col.on_collision(&other.body, delta);
    other.on_collision(&col.body, delta);
}

/// Detect and resolve every collision of `objects[subject]` after a move
///
/// Pairs are resolved in list order against the overlap set found right
/// after the move, so with several static colliders the last one snapped
/// against decides the final position.
pub fn handle_collisions(objects: &mut [GameObject], subject: usize, delta: Vec2) -> usize {
    let hits = get_collisions(objects, subject);
    for &other in &hits {
        resolve_pair(objects, subject, other, delta);
    }
    hits.len()
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b, "an object cannot collide with itself");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::Behavior;
    use proptest::prelude::*;
    use crate::sim::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(String, String, Vec2)>>>;

    /// Records every callback as (self tag, other tag, delta)
    #[derive(Debug)]
    struct Recorder(Log);

    impl Behavior for Recorder {
        fn on_collision(&mut self, body: &mut Body, other: &Body, delta: Vec2) {
            self.0.borrow_mut().push((body.tag.clone(), other.tag.clone(), delta));
        }
    }

    fn obj(log: &Log, body: Body) -> GameObject {
        GameObject::new(body, Recorder(log.clone()))
    }

    #[test]
    fn test_falling_onto_platform_snaps_to_top() {
        let log = Log::default();
        let mut objects = vec![
            obj(&log, Body::new("platform", Rect::new(100.0, 200.0, 50, 20))),
            obj(&log, Body::new("faller", Rect::new(110.0, 190.0, 16, 16)).as_entity()),
        ];
        let delta = Vec2::new(0.0, 0.5);
        assert_eq!(handle_collisions(&mut objects, 1, delta), 1);
        assert_eq!(objects[1].body.rect.pos.y, 184.0);
        assert_eq!(objects[1].body.rect.pos.x, 110.0);

        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], ("faller".into(), "platform".into(), delta));
        assert_eq!(log[1], ("platform".into(), "faller".into(), delta));
    }

    #[test]
    fn test_snap_faces() {
        let wall = Body::new("wall", Rect::new(100.0, 100.0, 50, 50));
        let mut b = Body::new("b", Rect::new(90.0, 110.0, 16, 16));
        snap_out(&mut b, &wall, Vec2::new(0.2, 0.0));
        assert_eq!(b.rect.pos.x, 84.0);

        let mut b = Body::new("b", Rect::new(140.0, 110.0, 16, 16));
        snap_out(&mut b, &wall, Vec2::new(-0.2, 0.0));
        assert_eq!(b.rect.pos.x, 150.0);

        let mut b = Body::new("b", Rect::new(110.0, 140.0, 16, 16));
        snap_out(&mut b, &wall, Vec2::new(0.0, -0.5));
        assert_eq!(b.rect.pos.y, 150.0);

        let mut b = Body::new("b", Rect::new(110.0, 90.0, 16, 16));
        snap_out(&mut b, &wall, Vec2::new(0.0, 0.5));
        assert_eq!(b.rect.pos.y, 84.0);
    }

    #[test]
    fn test_entity_pair_gets_callbacks_without_correction() {
        let log = Log::default();
        let mut objects = vec![
            obj(&log, Body::new("mario", Rect::new(0.0, 0.0, 48, 48)).as_entity()),
            obj(&log, Body::new("goomba", Rect::new(30.0, 10.0, 48, 48)).as_entity()),
        ];
        let delta = Vec2::new(0.2, 0.0);
        handle_collisions(&mut objects, 0, delta);

        assert_eq!(objects[0].body.rect, Rect::new(0.0, 0.0, 48, 48));
        assert_eq!(objects[1].body.rect, Rect::new(30.0, 10.0, 48, 48));
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].0, "mario");
        assert_eq!(log[1].0, "goomba");
    }

    #[test]
    fn test_colliderless_objects_are_ignored() {
        let log = Log::default();
        let mut objects = vec![
            obj(&log, Body::new("ghost", Rect::new(0.0, 0.0, 48, 48)).without_collider()),
            obj(&log, Body::new("block", Rect::new(10.0, 10.0, 48, 48))),
        ];
        // Not a subject
        assert!(get_collisions(&objects, 0).is_empty());
        // Not a candidate
        assert!(get_collisions(&objects, 1).is_empty());
        assert_eq!(handle_collisions(&mut objects, 0, Vec2::X), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_prune_is_directional() {
        let subject = Body::new("s", Rect::new(500.0, 0.0, 16, 16));
        // Far to the right: passes the prune
        assert!(near_enough(&subject, &Body::new("c", Rect::new(900.0, 0.0, 16, 16))));
        // Far to the left: pruned
        assert!(!near_enough(&subject, &Body::new("c", Rect::new(380.0, 0.0, 16, 16))));
        // Close on the left: passes
        assert!(near_enough(&subject, &Body::new("c", Rect::new(420.0, 0.0, 16, 16))));
        // Wide collider: always passes
        assert!(near_enough(&subject, &Body::new("c", Rect::new(0.0, 0.0, 101, 16))));
        assert!(!near_enough(&subject, &Body::new("c", Rect::new(0.0, 0.0, 100, 16))));
    }

    #[test]
    fn test_pruned_candidate_cannot_overlap() {
        // Exactly PRUNE_DISTANCE to the left with a narrow width: pruned, and
        // its right edge only touches the subject
        let log = Log::default();
        let objects = vec![
            obj(&log, Body::new("left", Rect::new(399.0, 0.0, 100, 16))),
            obj(&log, Body::new("s", Rect::new(499.0, 0.0, 16, 16))),
            obj(&log, Body::new("near", Rect::new(505.0, 0.0, 16, 16))),
        ];
        assert!(!near_enough(&objects[1].body, &objects[0].body));
        assert_eq!(get_collisions(&objects, 1), vec![2]);
    }

    #[test]
    fn test_last_static_collider_wins() {
        let log = Log::default();
        let mut objects = vec![
            obj(&log, Body::new("mover", Rect::new(95.0, 0.0, 20, 20)).as_entity()),
            obj(&log, Body::new("far", Rect::new(110.0, 0.0, 30, 30))),
            obj(&log, Body::new("near", Rect::new(100.0, 0.0, 30, 30))),
        ];
        handle_collisions(&mut objects, 0, Vec2::new(0.5, 0.0));
        // Snapped against "far" first (x=90), then "near" (x=80)
        assert_eq!(objects[0].body.rect.pos.x, 80.0);
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut v = [1, 2, 3];
        let (a, b) = pair_mut(&mut v, 2, 0);
        std::mem::swap(a, b);
        assert_eq!(v, [3, 2, 1]);
    }

    proptest! {
        #[test]
        fn prop_prune_never_hides_an_overlap(
            subject in (0i32..400, 0i32..100, 1i32..120, 1i32..120),
            others in prop::collection::vec((0i32..400, 0i32..100, 1i32..200, 1i32..120, any::<bool>()), 0..12),
        ) {
            let log = Log::default();
            let mut objects = vec![obj(&log, Body::new("s", Rect::new(subject.0 as f32, subject.1 as f32, subject.2, subject.3)))];
            for (x, y, w, h, collider) in others {
                let mut body = Body::new("o", Rect::new(x as f32, y as f32, w, h));
                body.has_collider = collider;
                objects.push(obj(&log, body));
            }
            let brute: Vec<usize> = (1..objects.len())
                .filter(|&i| objects[i].body.has_collider && objects[0].body.rect.overlaps(&objects[i].body.rect))
                .collect();
            prop_assert_eq!(get_collisions(&objects, 0), brute);
        }
    }
}
