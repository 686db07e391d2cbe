use scrollchain_core::{ChainingConfig, EventDisposition, InputKind, OverscrollBehavior, StyleTarget};
use scrollchain_testing::{FakeScrollElement, TestPlatform};

#[test]
fn attach_registers_three_touch_listeners_and_one_scroll_listener() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);

    let handle = chaining.attach(Some(element.clone()));

    assert!(!handle.is_inert());
    assert_eq!(handle.listener_count(), 4);
    for kind in [
        InputKind::TouchStart,
        InputKind::TouchMove,
        InputKind::TouchEnd,
        InputKind::Scroll,
    ] {
        assert_eq!(element.listener_count_for(kind), 1);
    }
}

#[test]
fn attaching_same_element_twice_is_idempotent() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);

    let first = chaining.attach(Some(element.clone()));
    let second = chaining.attach(Some(element.clone()));

    assert_eq!(element.listener_count(), 4);
    assert_eq!(chaining.attached_count(), 1);

    // Both handles share one attachment.
    second.detach();
    assert!(first.is_detached());
    assert_eq!(element.listener_count(), 0);
}

#[test]
fn reattaching_after_detach_registers_fresh_listeners() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);

    chaining.attach(Some(element.clone())).detach();
    let handle = chaining.attach(Some(element.clone()));

    assert!(!handle.is_detached());
    assert_eq!(element.listener_count(), 4);
}

#[test]
fn non_ios_platform_stays_inert() {
    let platform = TestPlatform::desktop();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);

    let handle = chaining.attach(Some(element.clone()));

    assert!(handle.is_inert());
    assert_eq!(element.listener_count(), 0);
    assert!(platform.page.body().properties().is_empty());
    assert!(element.styles().properties().is_empty());

    let mut robot = platform.robot(element);
    assert_eq!(robot.press(100.0), EventDisposition::Default);
    assert_eq!(robot.drag_to(140.0, 10.0), EventDisposition::Default);
    robot.release();
    robot.settle(100);
    assert!(platform.page.scroll_calls().is_empty());

    handle.detach();
    handle.detach();
}

#[test]
fn missing_element_is_a_logged_no_op() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());

    let handle = chaining.attach(None);

    assert!(handle.is_inert());
    assert!(handle.is_detached());
    assert!(handle.snapshot().is_none());
    assert!(platform.page.body().properties().is_empty());
    handle.detach();
}

#[test]
fn detach_mid_gesture_cancels_momentum() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);
    let handle = chaining.attach(Some(element.clone()));

    let mut robot = platform.robot(element.clone());
    robot.press(100.0);
    robot.drag_to(130.0, 10.0);
    robot.advance_frame();
    let scrolled_before_detach = platform.page.scroll_calls().len();
    assert_eq!(scrolled_before_detach, 1);

    handle.detach();
    assert_eq!(platform.frames.pending_count(), 0);
    for _ in 0..20 {
        robot.advance_frame();
    }

    assert_eq!(platform.page.scroll_calls().len(), scrolled_before_detach);
    assert_eq!(element.listener_count(), 0);
    assert_eq!(robot.drag_to(160.0, 10.0), EventDisposition::Default);
}

#[test]
fn detach_is_safe_to_repeat_and_after_element_removal() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default());
    let element = FakeScrollElement::scroller(1, 0.0);
    let handle = chaining.attach(Some(element.clone()));

    element.remove_from_document();
    handle.detach();
    handle.detach();

    assert!(handle.is_detached());
    assert_eq!(element.listener_count(), 0);
    assert_eq!(chaining.attached_count(), 0);
}

#[test]
fn detach_restores_prior_styles_exactly() {
    let platform = TestPlatform::ios();
    let body = platform.page.body();
    body.set_style_property("overflow", "hidden");
    body.set_style_property("color", "black");
    body.add_class("modal-open");
    body.add_class("theme-dark");

    let element = FakeScrollElement::scroller(1, 0.0);
    element.set_style_property("touch-action", "pan-y");

    let before_body = (body.properties(), body.classes());
    let before_element = element.styles().properties();

    let mut chaining = platform.chaining(
        ChainingConfig::default().with_overscroll_behavior(OverscrollBehavior::Contain),
    );
    let handle = chaining.attach(Some(element.clone()));

    assert_eq!(body.style_property("overflow").as_deref(), Some("auto"));
    assert_eq!(body.style_property("position").as_deref(), Some("static"));
    assert!(!body.has_class("modal-open"));
    assert!(body.has_class("theme-dark"));
    assert_eq!(element.style_property("touch-action").as_deref(), Some("manipulation"));
    assert_eq!(
        element.style_property("-webkit-overflow-scrolling").as_deref(),
        Some("touch")
    );
    assert_eq!(
        element.style_property("overscroll-behavior").as_deref(),
        Some("contain")
    );

    handle.detach();

    assert_eq!((body.properties(), body.classes()), before_body);
    assert_eq!(element.styles().properties(), before_element);
}

#[test]
fn style_overrides_can_be_disabled() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default().without_style_overrides());
    let element = FakeScrollElement::scroller(1, 0.0);

    let handle = chaining.attach(Some(element.clone()));

    assert_eq!(handle.listener_count(), 4);
    assert!(platform.page.body().properties().is_empty());
    assert!(element.styles().properties().is_empty());
}

#[test]
fn attachments_on_different_elements_are_independent() {
    let platform = TestPlatform::ios();
    let mut chaining = platform.chaining(ChainingConfig::default().without_style_overrides());
    let top = FakeScrollElement::scroller(1, 0.0);
    let middle = FakeScrollElement::scroller(2, 300.0);

    let top_handle = chaining.attach(Some(top.clone()));
    let _middle_handle = chaining.attach(Some(middle.clone()));
    assert_eq!(chaining.attached_count(), 2);

    let mut middle_robot = platform.robot(middle.clone());
    middle_robot.press(100.0);
    assert_eq!(
        middle_robot.drag_to(130.0, 10.0),
        EventDisposition::PreventDefault
    );

    top_handle.detach();
    assert_eq!(middle.listener_count(), 4);
    assert_eq!(chaining.attached_count(), 1);

    chaining.detach_all();
    assert_eq!(middle.listener_count(), 0);
    assert_eq!(chaining.attached_count(), 0);
}

#[test]
fn body_is_restored_when_attachments_detach_in_attach_order() {
    let platform = TestPlatform::ios();
    let body = platform.page.body();
    body.set_style_property("overflow", "hidden");
    body.add_class("modal-open");
    let before = (body.properties(), body.classes());

    let mut chaining = platform.chaining(ChainingConfig::default());
    let first = chaining.attach(Some(FakeScrollElement::scroller(1, 0.0)));
    let second = chaining.attach(Some(FakeScrollElement::scroller(2, 0.0)));
    assert_eq!(body.style_property("overflow").as_deref(), Some("auto"));

    first.detach();
    // The remaining attachment still needs the body unlocked.
    assert_eq!(body.style_property("overflow").as_deref(), Some("auto"));
    assert!(!body.has_class("modal-open"));

    second.detach();
    assert_eq!((body.properties(), body.classes()), before);
}

#[test]
fn body_is_unlocked_again_after_every_attachment_detached() {
    let platform = TestPlatform::ios();
    let body = platform.page.body();
    body.set_style_property("position", "fixed");

    let mut chaining = platform.chaining(ChainingConfig::default());
    chaining.attach(Some(FakeScrollElement::scroller(1, 0.0))).detach();
    assert_eq!(body.style_property("position").as_deref(), Some("fixed"));

    let handle = chaining.attach(Some(FakeScrollElement::scroller(2, 0.0)));
    assert_eq!(body.style_property("position").as_deref(), Some("static"));
    handle.detach();
    assert_eq!(body.style_property("position").as_deref(), Some("fixed"));
}
