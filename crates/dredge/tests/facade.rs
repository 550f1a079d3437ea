//! Smoke test: a full interaction built purely from the facade surface.

use std::rc::Rc;

use dredge::prelude::*;
use dredge_harness::{GestureDriver, TestScene};

#[test]
fn facade_types_drive_a_full_cycle() {
    let mut scene = TestScene::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    scene
        .node(NodeId(1), Rect::new(10.0, 10.0, 40.0, 40.0))
        .node(NodeId(2), Rect::new(200.0, 0.0, 200.0, 200.0));

    let source = Rc::new(DragSource::new(
        SourceId(1),
        NodeId(1),
        "card",
        Rc::new(String::from("ace")),
    ));
    let mut driver = GestureDriver::new(scene, source, TrackerConfig::default());

    let zone: Rc<dyn DropTarget> = Rc::new(
        DropZone::new(TargetId(1), NodeId(2)).with_filter(TypeFilter::One("card".into())),
    );
    driver.ctx.registry.register(zone, None);

    let dropped = {
        use std::cell::RefCell;
        let dropped = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&dropped);
        driver.ctx.on(EventKind::Drop, move |ev: &DragEvent| {
            let payload = ev.data.downcast_ref::<String>().cloned();
            *sink.borrow_mut() = payload;
        });
        dropped
    };

    driver.press(30.0, 30.0).unwrap();
    driver.drag_to(300.0, 100.0).unwrap();
    driver.release(300.0, 100.0).unwrap();
    driver.tick().unwrap();

    assert_eq!(driver.ctx.session.success(), Some(true));
    assert_eq!(dropped.borrow().as_deref(), Some("ace"));
}

#[test]
fn config_error_converts_to_facade_error() {
    let err = DropList::builder(TargetId(1), NodeId(1), Direction::Column)
        .build()
        .unwrap_err();
    let top: dredge::Error = err.into();
    assert!(top.to_string().contains("item renderer"));
}
