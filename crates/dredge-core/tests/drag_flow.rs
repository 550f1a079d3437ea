//! End-to-end gesture flows: pointer stream in, session events and host
//! effects out. Everything runs on virtual time via the harness driver.

use std::rc::Rc;
use std::time::Duration;

use dredge_core::event::EventKind;
use dredge_core::geometry::{Point, Rect, Vec2};
use dredge_core::ghost::RETURN_DURATION;
use dredge_core::magnet::Direction;
use dredge_core::scene::{ItemGeometry, NodeId, Scene};
use dredge_core::target::{
    DragSource, DropList, DropMask, DropTarget, DropZone, ListOperation, SourceId, TargetId,
    TypeFilter,
};
use dredge_core::tracker::TrackerConfig;
use dredge_harness::{GestureDriver, TestScene};

const SOURCE_NODE: NodeId = NodeId(1);
const ZONE_NODE: NodeId = NodeId(2);
const INNER_NODE: NodeId = NodeId(3);
const LIST_NODE: NodeId = NodeId(10);

fn scene() -> TestScene {
    let mut scene = TestScene::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    scene
        .node(SOURCE_NODE, Rect::new(10.0, 10.0, 40.0, 40.0))
        .node(ZONE_NODE, Rect::new(200.0, 0.0, 200.0, 200.0))
        .node(INNER_NODE, Rect::new(250.0, 50.0, 50.0, 50.0))
        .node(LIST_NODE, Rect::new(500.0, 0.0, 100.0, 120.0))
        .list_items(
            LIST_NODE,
            (0..3)
                .map(|i| ItemGeometry {
                    rect: Rect::new(500.0, i as f32 * 40.0, 100.0, 40.0),
                    hosts_drop: false,
                })
                .collect(),
        );
    scene
}

fn item_source() -> Rc<DragSource> {
    Rc::new(DragSource::new(
        SourceId(1),
        SOURCE_NODE,
        "item",
        Rc::new(String::from("payload")),
    ))
}

fn accepting_zone(id: u64, node: NodeId) -> Rc<dyn DropTarget> {
    Rc::new(DropZone::new(TargetId(id), node).with_filter(TypeFilter::One("item".into())))
}

#[test]
fn full_cycle_over_accepting_zone() {
    let mut driver = GestureDriver::new(scene(), item_source(), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(accepting_zone(1, ZONE_NODE), None);
    let log = driver.record_events();

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(100.0, 30.0).unwrap();
    driver.drag_to(300.0, 150.0).unwrap();
    driver.release(300.0, 150.0).unwrap();
    driver.tick().unwrap();

    assert_eq!(driver.ctx.session.success(), Some(true));
    assert_eq!(
        *log.borrow(),
        vec![
            EventKind::DragStart,
            EventKind::TopChanged, // null top at start
            EventKind::PositionChanged,
            EventKind::TopChanged, // entered the zone
            EventKind::PositionChanged,
            EventKind::Drop,
            EventKind::DragEnd,
        ]
    );
    assert_eq!(driver.host.live_count(), 0);
    assert!(driver.tracker.consume_ignored_click());
}

#[test]
fn innermost_target_owns_the_pointer() {
    let mut driver = GestureDriver::new(scene(), item_source(), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(accepting_zone(1, ZONE_NODE), None);
    driver
        .ctx
        .registry
        .register(accepting_zone(2, INNER_NODE), Some(TargetId(1)));

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(275.0, 75.0).unwrap();
    assert_eq!(
        driver.ctx.session.top().map(|t| t.id()),
        Some(TargetId(2))
    );

    driver.drag_to(210.0, 150.0).unwrap();
    assert_eq!(
        driver.ctx.session.top().map(|t| t.id()),
        Some(TargetId(1))
    );
}

#[test]
fn mask_blocks_without_disqualifying() {
    let mut driver = GestureDriver::new(scene(), item_source(), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(accepting_zone(1, ZONE_NODE), None);
    driver.ctx.registry.register(
        Rc::new(DropMask::new(TargetId(2), INNER_NODE)) as Rc<dyn DropTarget>,
        Some(TargetId(1)),
    );

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(275.0, 75.0).unwrap();
    assert!(driver.ctx.session.top().is_none());

    // Off the mask but still inside the zone.
    driver.drag_to(210.0, 150.0).unwrap();
    assert_eq!(
        driver.ctx.session.top().map(|t| t.id()),
        Some(TargetId(1))
    );
}

#[test]
fn left_margin_autoscrolls_until_pinned() {
    const VIEWPORT: NodeId = NodeId(20);
    let mut scene = TestScene::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    scene
        .node(VIEWPORT, Rect::new(0.0, 0.0, 200.0, 200.0))
        .scrollable(VIEWPORT, Vec2::new(600.0, 200.0))
        .node(SOURCE_NODE, Rect::new(120.0, 80.0, 40.0, 40.0))
        .scrolled_by(SOURCE_NODE, VIEWPORT);
    scene.set_scroll(VIEWPORT, Vec2::new(40.0, 0.0));

    let mut driver = GestureDriver::new(scene, item_source(), TrackerConfig::default());
    driver.press(140.0, 100.0).unwrap();
    driver.drag_to(10.0, 100.0).unwrap();

    let after_first = driver.scene.scroll(VIEWPORT).x;
    assert!(after_first < 40.0);

    // Repeats keep firing on the timer until the container pins at 0.
    for _ in 0..40 {
        driver.advance(Duration::from_millis(5)).unwrap();
    }
    assert_eq!(driver.scene.scroll(VIEWPORT).x, 0.0);
}

#[test]
fn reorder_drop_resolves_list_operation() {
    let list = Rc::new(
        DropList::builder(TargetId(5), LIST_NODE, Direction::Column)
            .item_slot()
            .feedback_slot()
            .filter(TypeFilter::One("item".into()))
            .build()
            .unwrap(),
    );
    let source = Rc::new(
        DragSource::new(
            SourceId(1),
            SOURCE_NODE,
            "item",
            Rc::new(String::from("payload")),
        )
        .with_reorder_origin(TargetId(5), 0),
    );

    let mut driver = GestureDriver::new(scene(), Rc::clone(&source), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(Rc::clone(&list) as Rc<dyn DropTarget>, None);

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(550.0, 110.0).unwrap();
    assert!(list.is_reordering());
    assert_eq!(driver.ctx.session.top().map(|t| t.id()), Some(TargetId(5)));

    let op = list
        .resolve_drop("item", driver.ctx.session.position(), &driver.scene)
        .unwrap();
    assert_eq!(
        op,
        ListOperation::Reorder(dredge_core::target::ReorderOperation { from: 0, to: 2 })
    );

    driver.release(550.0, 110.0).unwrap();
    driver.tick().unwrap();
    assert_eq!(driver.ctx.session.success(), Some(true));
    assert!(!list.is_reordering());
}

#[test]
fn reorder_grid_survives_mid_drag_scroll() {
    let mut base = scene();
    base.scrollable(LIST_NODE, Vec2::new(100.0, 240.0));
    let list = Rc::new(
        DropList::builder(TargetId(5), LIST_NODE, Direction::Column)
            .item_slot()
            .feedback_slot()
            .filter(TypeFilter::One("item".into()))
            .build()
            .unwrap(),
    );

    let mut driver = GestureDriver::new(base, item_source(), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(Rc::clone(&list) as Rc<dyn DropTarget>, None);

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(550.0, 30.0).unwrap();
    let before = list.closest_index(Point::new(550.0, 100.0), &driver.scene);

    // The list scrolls down 35px: content and a content-following pointer
    // both shift up by 35.
    driver.scene.set_scroll(LIST_NODE, Vec2::new(0.0, 35.0));
    driver.scene.shift_items(LIST_NODE, Vec2::new(0.0, -35.0));
    let after = list.closest_index(Point::new(550.0, 65.0), &driver.scene);
    assert_eq!(before, after);
}

#[test]
fn rejected_drop_glides_ghost_home() {
    let source = Rc::new(
        DragSource::new(
            SourceId(1),
            SOURCE_NODE,
            "item",
            Rc::new(String::from("payload")),
        )
        .with_go_back(),
    );
    let mut driver = GestureDriver::new(scene(), source, TrackerConfig::default());

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(300.0, 300.0).unwrap();
    driver.advance(Duration::from_millis(1)).unwrap();
    assert_eq!(driver.host.live_count(), 1);

    driver.release(300.0, 300.0).unwrap();
    driver.tick().unwrap();
    assert_eq!(driver.ctx.session.success(), Some(false));
    assert!(driver.ctx.ghosts.is_returning());
    assert_eq!(driver.host.live_count(), 1);

    driver.advance(RETURN_DURATION).unwrap();
    assert_eq!(driver.host.live_count(), 0);
    assert_eq!(driver.ctx.ghosts.clone_count(), 0);
}

#[test]
fn hold_delay_gesture_via_virtual_time() {
    let delay = Duration::from_millis(250);
    let mut driver = GestureDriver::new(
        scene(),
        item_source(),
        TrackerConfig {
            delay: Some(delay),
            ..TrackerConfig::default()
        },
    );

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(31.0, 31.0).unwrap();
    assert!(!driver.ctx.session.is_active());

    // Holding still through the delay arms the gesture but starts nothing.
    driver.advance(delay).unwrap();
    assert!(!driver.ctx.session.is_active());

    // The first threshold move after the hold starts the drag.
    driver.drag_to(60.0, 30.0).unwrap();
    assert!(driver.ctx.session.is_active());
    assert_eq!(driver.ctx.session.position(), Point::new(60.0, 30.0));
}

#[test]
fn document_autoscrolls_when_no_container_scrolls() {
    let mut base = scene();
    base.scrollable(NodeId(0), Vec2::new(2000.0, 600.0));
    base.set_scroll(NodeId(0), Vec2::new(40.0, 0.0));

    // The source has no scroll parent, so edge scrolling falls through to
    // the document root.
    let mut driver = GestureDriver::new(base, item_source(), TrackerConfig::default());
    driver.press(30.0, 300.0).unwrap();
    driver.drag_to(10.0, 300.0).unwrap();

    assert!(driver.scene.scroll(NodeId(0)).x < 40.0);
    assert!(driver.ctx.scroller.is_active());
}

#[test]
fn repeated_cycles_leak_nothing() {
    let mut driver = GestureDriver::new(scene(), item_source(), TrackerConfig::default());
    driver
        .ctx
        .registry
        .register(accepting_zone(1, ZONE_NODE), None);

    let handlers_before = driver.ctx.session.handler_count();
    for _ in 0..10 {
        driver.press(30.0, 30.0).unwrap();
        driver.drag_to(300.0, 150.0).unwrap();
        driver.release(300.0, 150.0).unwrap();
        driver.advance(Duration::from_millis(1)).unwrap();
        assert!(driver.tracker.consume_ignored_click());
    }

    assert_eq!(driver.ctx.session.handler_count(), handlers_before);
    assert_eq!(driver.host.live_count(), 0);
    assert_eq!(driver.ctx.ghosts.clone_count(), 0);
    assert!(!driver.ctx.scroller.is_active());
    assert!(driver.tracker.is_idle());
}
