mod common;

use common::*;
use key_lib::action::{Action, BasicAction};
use key_lib::debounce::Edges;
use key_lib::engine::Engine;
use key_lib::keycodes::KeyCode;
use key_lib::keymap::KeymapTable;
use key_lib::tap_hold::{InterruptPolicy, Resolution, TapHoldMachine, TapHoldState};
use key_lib::{Tick, Transition};
use rstest::rstest;

const THRESHOLD: Tick = 200;

// Key 1: B. Key 7: tap X / hold layer 1. Key 8: Z on base, Y on layer 1.
// Key 9: tap Q / hold layer 2. Key 10: tap Escape / hold LeftCtrl.
fn keymap() -> KeymapTable {
    let mut km = KeymapTable::new();
    km.set(C0, L0, k(1), Action::Emit(KeyCode::B));
    km.set(
        C0,
        L0,
        k(7),
        Action::TapHold(BasicAction::Emit(KeyCode::X), BasicAction::LayerHold(L1)),
    );
    km.set(C0, L0, k(8), Action::Emit(KeyCode::Z));
    km.set(C0, L1, k(8), Action::Emit(KeyCode::Y));
    km.set(
        C0,
        L0,
        k(9),
        Action::TapHold(BasicAction::Emit(KeyCode::Q), BasicAction::LayerHold(L2)),
    );
    km.set(C0, L2, k(8), Action::Emit(KeyCode::W));
    km.set(
        C0,
        L0,
        k(10),
        Action::TapHold(
            BasicAction::Emit(KeyCode::Escape),
            BasicAction::Emit(KeyCode::LeftCtrl),
        ),
    );
    km
}

fn driver(km: &KeymapTable, policy: InterruptPolicy) -> Driver<'_> {
    Driver::new(Engine::new(km, &settings(THRESHOLD, policy)).unwrap())
}

#[test]
fn test_quick_release_emits_tap_once() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::default());

    let out = d.step(&press(&[7]));
    assert!(out.report.is_empty());
    assert!(!out.changed);

    for out in d.idle_until(150) {
        assert!(out.report.is_empty());
        assert!(!d.engine.layers().is_active(L1));
    }

    let out = d.step(&release(&[7]));
    assert_eq!(codes(&out), vec![KeyCode::X]);
    assert!(out.changed);
    assert!(!d.engine.layers().is_active(L1));

    let out = d.step(&NO_EDGES);
    assert!(out.report.is_empty());
    assert!(out.changed);
    assert_eq!(d.engine.tap_hold_state(k(7)), TapHoldState::Idle);

    for out in d.idle_until(400) {
        assert!(out.report.is_empty());
        assert!(!d.engine.layers().is_active(L1));
    }
}

#[test]
fn test_held_past_threshold_activates_hold() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::default());

    d.step(&press(&[7]));
    d.idle_until(THRESHOLD);
    assert!(!d.engine.layers().is_active(L1));

    let out = d.step(&NO_EDGES);
    assert!(out.report.is_empty());
    assert!(d.engine.layers().is_active(L1));
    assert!(matches!(
        d.engine.tap_hold_state(k(7)),
        TapHoldState::ResolvedHold { .. }
    ));

    let out = d.step(&press(&[8]));
    assert_eq!(codes(&out), vec![KeyCode::Y]);

    d.step(&release(&[8]));
    let out = d.step(&release(&[7]));
    assert!(out.report.is_empty());
    assert!(!d.engine.layers().is_active(L1));
    assert_eq!(d.engine.resolver().hold_count(L1), 0);
}

#[rstest]
#[case(1, true)]
#[case(150, true)]
#[case(199, true)]
#[case(200, false)]
#[case(350, false)]
fn test_threshold_boundary(#[case] release_at: Tick, #[case] expect_tap: bool) {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::default());

    d.step(&press(&[7]));
    let mut seen_x = d
        .idle_until(release_at)
        .iter()
        .any(|o| o.report.contains(KeyCode::X));
    let out = d.step(&release(&[7]));
    seen_x |= out.report.contains(KeyCode::X);

    assert_eq!(seen_x, expect_tap);
    assert!(!d.engine.layers().is_active(L1));
}

#[test]
fn test_other_press_forces_hold() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::HoldOnOtherKeyPress);

    d.step(&press(&[7]));
    d.idle_until(50);
    let out = d.step(&press(&[8]));

    assert_eq!(codes(&out), vec![KeyCode::Y]);
    assert!(d.engine.layers().is_active(L1));
}

#[test]
fn test_timeout_only_ignores_other_press() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::TimeoutOnly);

    d.step(&press(&[7]));
    d.idle_until(50);
    let out = d.step(&press(&[8]));
    assert_eq!(codes(&out), vec![KeyCode::Z]);
    assert!(!d.engine.layers().is_active(L1));

    d.idle_until(100);
    let out = d.step(&release(&[7]));
    assert!(out.report.contains(KeyCode::X));
    assert!(out.report.contains(KeyCode::Z));

    let out = d.step(&NO_EDGES);
    assert_eq!(codes(&out), vec![KeyCode::Z]);
}

#[test]
fn test_timeout_only_still_times_out() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::TimeoutOnly);

    d.step(&press(&[7]));
    d.step(&press(&[8]));
    d.idle_until(THRESHOLD + 1);

    assert!(d.engine.layers().is_active(L1));
    // Key 8 keeps what it resolved to on press.
    assert_eq!(codes(&d.step(&NO_EDGES)), vec![KeyCode::Z]);
}

#[test]
fn test_release_after_hold_is_symmetric() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::HoldOnOtherKeyPress);

    d.step(&press(&[7]));
    assert_eq!(codes(&d.step(&press(&[8]))), vec![KeyCode::Y]);

    let out = d.step(&release(&[7]));
    assert!(!d.engine.layers().is_active(L1));
    assert_eq!(codes(&out), vec![KeyCode::Y]);

    let out = d.step(&release(&[8]));
    assert!(out.report.is_empty());
}

#[test]
fn test_second_pending_key_stays_pending() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::HoldOnOtherKeyPress);

    d.step(&press(&[7]));
    d.step(&press(&[9]));
    assert!(d.engine.layers().is_active(L1));
    assert!(matches!(
        d.engine.tap_hold_state(k(9)),
        TapHoldState::PendingDecision { .. }
    ));

    let out = d.step(&release(&[9]));
    assert_eq!(codes(&out), vec![KeyCode::Q]);
    assert!(!d.engine.layers().is_active(L2));
}

#[test]
fn test_modifier_hold() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::HoldOnOtherKeyPress);

    d.step(&press(&[10]));
    let out = d.step(&press(&[0]));
    assert_eq!(codes(&out), vec![KeyCode::LeftCtrl]);
    assert_eq!(out.report.modifiers(), 0x01);

    let out = d.step(&release(&[10]));
    assert!(out.report.is_empty());
}

fn release_and_press(up: usize, down: usize) -> Edges {
    let mut edges = release(&[up]);
    edges[down] = Some(Transition::Pressed);
    edges
}

#[rstest]
fn test_tap_survives_lower_key_press_in_same_cycle(
    #[values(InterruptPolicy::HoldOnOtherKeyPress, InterruptPolicy::TimeoutOnly)]
    policy: InterruptPolicy,
) {
    let km = keymap();
    let mut d = driver(&km, policy);

    d.step(&press(&[10]));
    d.idle_until(40);
    let out = d.step(&release_and_press(10, 1));
    assert_eq!(codes(&out), vec![KeyCode::B, KeyCode::Escape]);
    assert_eq!(out.report.modifiers(), 0);

    let out = d.step(&NO_EDGES);
    assert_eq!(codes(&out), vec![KeyCode::B]);
    assert_eq!(d.engine.tap_hold_state(k(10)), TapHoldState::Idle);
}

#[rstest]
fn test_tap_survives_higher_key_press_in_same_cycle(
    #[values(InterruptPolicy::HoldOnOtherKeyPress, InterruptPolicy::TimeoutOnly)]
    policy: InterruptPolicy,
) {
    let km = keymap();
    let mut d = driver(&km, policy);

    d.step(&press(&[7]));
    d.idle_until(40);
    let out = d.step(&release_and_press(7, 8));
    // Key 8 resolves on the base layer.
    assert_eq!(codes(&out), vec![KeyCode::X, KeyCode::Z]);
    assert!(!d.engine.layers().is_active(L1));

    let out = d.step(&NO_EDGES);
    assert_eq!(codes(&out), vec![KeyCode::Z]);
    assert_eq!(d.engine.resolver().hold_count(L1), 0);
}

#[rstest]
fn test_tap_hold_release_and_tap_hold_press_together(
    #[values(InterruptPolicy::HoldOnOtherKeyPress, InterruptPolicy::TimeoutOnly)]
    policy: InterruptPolicy,
) {
    let km = keymap();
    let mut d = driver(&km, policy);

    d.step(&press(&[7]));
    d.idle_until(40);
    let out = d.step(&release_and_press(7, 9));
    assert_eq!(codes(&out), vec![KeyCode::X]);
    assert!(!d.engine.layers().is_active(L1));
    assert!(matches!(
        d.engine.tap_hold_state(k(9)),
        TapHoldState::PendingDecision { .. }
    ));

    d.idle_until(80);
    let out = d.step(&release(&[9]));
    assert_eq!(codes(&out), vec![KeyCode::Q]);
    assert!(!d.engine.layers().is_active(L2));
}

#[test]
fn test_two_pending_keys_released_together_both_tap() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::TimeoutOnly);

    d.step(&press(&[7, 9]));
    d.idle_until(60);
    let out = d.step(&release(&[7, 9]));
    assert_eq!(codes(&out), vec![KeyCode::X, KeyCode::Q]);
    assert!(d.engine.layers().is_empty());

    assert!(d.step(&NO_EDGES).report.is_empty());
}

#[test]
fn test_repress_in_cycle_after_tap() {
    let km = keymap();
    let mut d = driver(&km, InterruptPolicy::default());

    d.step(&press(&[7]));
    assert_eq!(codes(&d.step(&release(&[7]))), vec![KeyCode::X]);

    // The tap is released before the new press begins.
    let out = d.step(&press(&[7]));
    assert!(out.report.is_empty());
    assert!(matches!(
        d.engine.tap_hold_state(k(7)),
        TapHoldState::PendingDecision { .. }
    ));

    assert_eq!(codes(&d.step(&release(&[7]))), vec![KeyCode::X]);
}

#[test]
fn test_machine_timeout_across_clock_wrap() {
    let mut m = TapHoldMachine::new(THRESHOLD, InterruptPolicy::TimeoutOnly);
    let tap = BasicAction::Emit(KeyCode::X);
    let hold = BasicAction::LayerHold(L1);
    let start = Tick::MAX - 10;

    m.begin(k(7), tap, hold, start);

    let mut fired = Vec::new();
    m.poll(188, |key, r| fired.push((key, r)));
    assert!(fired.is_empty());

    m.poll(189, |key, r| fired.push((key, r)));
    assert_eq!(fired, vec![(k(7), Resolution::HoldPressed(hold))]);
    assert_eq!(m.release(k(7)), Some(Resolution::HoldReleased(hold)));
    assert!(!m.is_tracking(k(7)));
}

#[test]
fn test_machine_tap_lifecycle() {
    let mut m = TapHoldMachine::default();
    let tap = BasicAction::Emit(KeyCode::X);
    let hold = BasicAction::LayerHold(L1);

    m.begin(k(3), tap, hold, 0);
    assert!(m.has_pending());
    assert_eq!(m.release(k(3)), Some(Resolution::TapPressed(tap)));
    assert!(!m.has_pending());
    assert_eq!(m.state(k(3)), TapHoldState::ResolvedTap { tap });

    let mut fired = Vec::new();
    m.poll(1, |key, r| fired.push((key, r)));
    assert_eq!(fired, vec![(k(3), Resolution::TapReleased(tap))]);
    assert_eq!(m.state(k(3)), TapHoldState::Idle);
}
