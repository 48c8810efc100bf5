use pixel_viewport::config::ViewportParams;
use pixel_viewport::context::{MapContext, MapGeometry};
use pixel_viewport::entity::EntityKind;
use pixel_viewport::viewport::ViewportController;

fn setup(width: u32, height: u32) -> (ViewportController, MapContext) {
    (
        ViewportController::new(&ViewportParams::default()),
        MapContext::new(MapGeometry::new(width, height)),
    )
}

#[test]
fn test_follow_stops_at_the_map_edge_while_bound() {
    let (mut vp, mut ctx) = setup(30, 30);
    ctx.entities.add(1, EntityKind::Player, 15.0, 6.0);
    vp.lock_to(&mut ctx, 1);

    let cx = vp.center_x(&ctx);
    assert_eq!(vp.display_offset().x, 15.0 - cx);

    // walk east until well past where centering would push the camera out
    for _ in 0..20 {
        ctx.entities.move_by(1, 1.0, 0.0);
        vp.update(&mut ctx);
        let limit = 30.0 - vp.screen_tile_extent_x(&ctx);
        assert!(vp.display_offset().x >= 0.0);
        assert!(vp.display_offset().x <= limit);
    }
    // camera parked on the edge, not centered anymore
    assert_eq!(vp.display_offset().x, 30.0 - vp.screen_tile_extent_x(&ctx));
}

#[test]
fn test_unbound_follow_keeps_target_centered_past_edges() {
    let (mut vp, mut ctx) = setup(30, 30);
    ctx.entities.add(7, EntityKind::Vehicle, 2.0, 2.0);
    vp.set_bound(false);
    vp.lock_to(&mut ctx, 7);

    assert_eq!(vp.display_offset().x, 2.0 - vp.center_x(&ctx));
    assert!(vp.display_offset().x < 0.0);

    ctx.entities.move_to(7, 0.0, 0.0);
    vp.update(&mut ctx);
    assert_eq!(vp.display_offset().x, -vp.center_x(&ctx));
    assert_eq!(vp.display_offset().y, -vp.center_y(&ctx));
}

#[test]
fn test_follow_wraps_across_loop_seam() {
    let (mut vp, mut ctx) = setup(30, 30);
    ctx.map.loop_horizontal = true;
    ctx.entities.add(1, EntityKind::Player, 1.0, 6.0);
    vp.lock_to(&mut ctx, 1);

    let cx = vp.center_x(&ctx);
    // centering on x=1 wraps the display behind the seam
    assert_eq!(vp.display_offset().x, (1.0f32 - cx).rem_euclid(30.0));

    ctx.entities.move_to(1, 29.0, 6.0);
    vp.update(&mut ctx);
    assert_eq!(vp.display_offset().x, 29.0 - cx);
    assert!(vp.display_offset().x >= 0.0 && vp.display_offset().x < 30.0);
}

#[test]
fn test_follow_toggle_suspends_recentring() {
    let (mut vp, mut ctx) = setup(60, 60);
    ctx.entities.add(1, EntityKind::Player, 30.0, 30.0);
    vp.lock_to(&mut ctx, 1);
    let parked = vp.display_offset();

    vp.set_follow(false);
    ctx.entities.move_by(1, 5.0, 5.0);
    vp.update(&mut ctx);
    assert_eq!(vp.display_offset(), parked);

    // re-enabling picks the target back up on its next move
    vp.set_follow(true);
    ctx.entities.move_by(1, 1.0, 0.0);
    vp.update(&mut ctx);
    assert_eq!(vp.display_offset().x, 36.0 - vp.center_x(&ctx));
}

#[test]
fn test_set_target_while_locked_migrates_the_hook() {
    let (mut vp, mut ctx) = setup(60, 60);
    ctx.entities.add(1, EntityKind::Player, 10.0, 10.0);
    ctx.entities.add(2, EntityKind::Follower, 40.0, 40.0);
    vp.lock_to(&mut ctx, 1);

    vp.set_target(&mut ctx, 2);
    assert_eq!(vp.target(), Some(2));
    assert!(vp.is_locked());
    assert_eq!(ctx.entities.get(1).unwrap().on_move.subscriber_count(), 0);
    assert_eq!(ctx.entities.get(2).unwrap().on_move.subscriber_count(), 1);

    // the old entity can move without dragging the camera
    let parked = vp.display_offset();
    ctx.entities.move_by(1, 5.0, 0.0);
    vp.update(&mut ctx);
    assert_eq!(vp.display_offset(), parked);
}

#[test]
fn test_scene_reset_between_map_and_battle() {
    let (mut vp, mut ctx) = setup(30, 30);
    ctx.entities.add(1, EntityKind::Player, 15.0, 15.0);
    vp.lock_to(&mut ctx, 1);
    vp.set_scale(&ctx, 2.0);
    vp.begin_pan_zoom(pixel_viewport::util::PointF32::new(2.0, 0.0), 1.5, 30);

    // entering battle suppresses zoom and drops the follow hook
    vp.reset(&mut ctx);
    assert_eq!(vp.scale(), 1.0);
    assert!(!vp.has_active_job());
    assert!(!vp.is_locked());
    assert_eq!(ctx.entities.get(1).unwrap().on_move.subscriber_count(), 0);

    // the map scene re-locks on re-entry, exactly like scene start
    vp.lock_to(&mut ctx, 1);
    assert!(vp.is_locked());
}
