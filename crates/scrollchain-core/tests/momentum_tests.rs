use scrollchain_core::{ChainingConfig, ScrollChainController};
use scrollchain_testing::{FakeScrollElement, TestPlatform};

fn controller(platform: &TestPlatform) -> ScrollChainController<FakeScrollElement, scrollchain_testing::FakePage> {
    ScrollChainController::new(
        FakeScrollElement::scroller(1, 0.0),
        platform.page.clone(),
        &platform.env,
        ChainingConfig::default(),
    )
}

#[test]
fn velocity_inside_dead_zone_never_scrolls() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    assert!(!controller.transfer_momentum_to_page(0.05));
    platform.frames.run_until_idle(100);

    assert!(platform.page.scroll_calls().is_empty());
}

#[test]
fn momentum_decays_until_below_one_pixel() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    assert!(controller.transfer_momentum_to_page(2.0));
    platform.frames.run_until_idle(1_000);

    let steps = platform.page.scroll_calls();
    assert!((steps[0] - 60.0).abs() < 1e-9);
    assert!((steps[1] - 55.2).abs() < 1e-9);
    assert!(steps.windows(2).all(|pair| pair[1].abs() < pair[0].abs()));
    assert!(steps.iter().all(|step| step.abs() >= 1.0));
    // 60 * 0.92^49 is still above one pixel, 60 * 0.92^50 is not.
    assert_eq!(steps.len(), 50);
    assert_eq!(platform.frames.pending_count(), 0);
    assert!(!controller.animator().is_running());
}

#[test]
fn negative_velocity_scrolls_page_up() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    controller.transfer_momentum_to_page(-1.0);
    platform.frames.advance_frame();
    platform.frames.advance_frame();

    let steps = platform.page.scroll_calls();
    assert_eq!(steps.len(), 2);
    assert!((steps[0] + 30.0).abs() < 1e-9);
    assert!((steps[1] + 27.6).abs() < 1e-9);
}

#[test]
fn new_hand_off_replaces_running_animation() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    controller.transfer_momentum_to_page(2.0);
    platform.frames.advance_frame();
    controller.transfer_momentum_to_page(-1.0);
    assert_eq!(platform.frames.pending_count(), 1);

    platform.frames.run_until_idle(1_000);
    let steps = platform.page.scroll_calls();
    assert!((steps[0] - 60.0).abs() < 1e-9);
    assert!(steps[1..].iter().all(|step| *step < 0.0));
    assert!((steps[1] + 30.0).abs() < 1e-9);
}

#[test]
fn cancel_stops_pending_frames() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    controller.transfer_momentum_to_page(2.0);
    platform.frames.advance_frame();
    controller.cancel_pending_frames();
    platform.frames.run_until_idle(100);

    assert_eq!(platform.page.scroll_calls(), vec![60.0]);
    assert!(!controller.animator().is_running());
}

#[test]
fn custom_momentum_parameters_are_respected() {
    let platform = TestPlatform::ios();
    let controller = ScrollChainController::new(
        FakeScrollElement::scroller(1, 0.0),
        platform.page.clone(),
        &platform.env,
        ChainingConfig::default()
            .with_momentum(10.0, 0.5)
            .with_stop_velocity(2.0),
    );

    controller.transfer_momentum_to_page(1.0);
    platform.frames.run_until_idle(100);

    assert_eq!(platform.page.scroll_calls(), vec![10.0, 5.0, 2.5]);
}

#[test]
fn refused_frame_request_leaves_no_running_animation() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);
    platform.frames.set_refusing(true);

    controller.transfer_momentum_to_page(2.0);

    assert_eq!(platform.frames.pending_count(), 0);
    assert!(!controller.animator().is_running());
    assert!(!controller.snapshot().animating);
}

#[test]
fn refused_reschedule_ends_animation_after_last_step() {
    let platform = TestPlatform::ios();
    let controller = controller(&platform);

    controller.transfer_momentum_to_page(2.0);
    platform.frames.set_refusing(true);
    platform.frames.advance_frame();

    assert_eq!(platform.page.scroll_calls(), vec![60.0]);
    assert!(!controller.animator().is_running());
}
