mod common;

use common::*;
use key_lib::action::{Action, BasicAction};
use key_lib::keycodes::KeyCode;
use key_lib::keymap::KeymapTable;
use key_lib::layer::LayerStack;
use key_lib::resolver::ActionResolver;
use key_lib::{LayerIndex, Transition};
use rstest::rstest;

// --- PRECEDENCE ---

fn precedence_keymap() -> KeymapTable {
    let mut km = KeymapTable::new();
    km.set(C0, L0, k(5), Action::Emit(KeyCode::A));
    km.set(C0, L3, k(5), Action::Emit(KeyCode::B));
    // Layer 2 stays transparent on key 5.
    km.set(C0, L2, k(6), Action::Emit(KeyCode::C));
    km
}

fn stack(order: &[LayerIndex]) -> LayerStack {
    let mut layers = LayerStack::new();
    for &layer in order {
        layers.activate(layer);
    }
    layers
}

#[rstest]
#[case(&[], KeyCode::A)]
#[case(&[L2], KeyCode::A)]
#[case(&[L3], KeyCode::B)]
#[case(&[L2, L3], KeyCode::B)]
#[case(&[L3, L2], KeyCode::B)] // top layer transparent, falls to 3
fn test_first_non_transparent_wins(#[case] order: &[LayerIndex], #[case] expected: KeyCode) {
    let km = precedence_keymap();
    let layers = stack(order);
    assert_eq!(
        ActionResolver::lookup(&km, k(5), C0, &layers),
        Action::Emit(expected)
    );
}

#[test]
fn test_most_recent_layer_wins() {
    let mut km = precedence_keymap();
    km.set(C0, L2, k(5), Action::Emit(KeyCode::C));

    assert_eq!(
        ActionResolver::lookup(&km, k(5), C0, &stack(&[L2, L3])),
        Action::Emit(KeyCode::B)
    );
    assert_eq!(
        ActionResolver::lookup(&km, k(5), C0, &stack(&[L3, L2])),
        Action::Emit(KeyCode::C)
    );
}

#[test]
fn test_all_transparent_is_noop() {
    let km = precedence_keymap();
    assert_eq!(
        ActionResolver::lookup(&km, k(20), C0, &stack(&[L1, L2, L3])),
        Action::NoOp
    );
}

#[test]
fn test_lookup_reads_requested_config() {
    let mut km = precedence_keymap();
    km.set(C1, L0, k(5), Action::Emit(KeyCode::Z));
    assert_eq!(
        ActionResolver::lookup(&km, k(5), C1, &stack(&[L3])),
        Action::Emit(KeyCode::Z)
    );
}

// --- LAYER HOLD / TOGGLE ---

fn layer_keymap() -> KeymapTable {
    let mut km = KeymapTable::new();
    km.set(C0, L0, k(0), Action::LayerHold(L1));
    km.set(C0, L0, k(1), Action::LayerHold(L1));
    km.set(C0, L0, k(2), Action::LayerToggle(L1));
    km.set(C0, L0, k(3), Action::ConfigSwitch(C1));
    // Layer 1 puts something else under the hold key.
    km.set(C0, L1, k(0), Action::Emit(KeyCode::Q));
    km
}

#[test]
fn test_hold_release_is_symmetric() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    let a = r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    assert_eq!(a, Action::LayerHold(L1));
    assert!(layers.is_active(L1));

    // Release undoes the latched hold, not what layer 1 now shows.
    let a = r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    assert_eq!(a, Action::LayerHold(L1));
    assert!(!layers.is_active(L1));
    assert_eq!(r.hold_count(L1), 0);
}

#[test]
fn test_hold_is_reference_counted() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    r.resolve(&km, k(1), Transition::Pressed, C0, &mut layers);
    assert_eq!(r.hold_count(L1), 2);

    r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    assert!(layers.is_active(L1));

    r.resolve(&km, k(1), Transition::Released, C0, &mut layers);
    assert!(!layers.is_active(L1));
}

#[test]
fn test_toggle_survives_hold_release() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    r.resolve(&km, k(2), Transition::Pressed, C0, &mut layers);
    r.resolve(&km, k(2), Transition::Released, C0, &mut layers);
    assert!(r.is_toggled(L1));

    r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    assert!(layers.is_active(L1));

    r.resolve(&km, k(2), Transition::Pressed, C0, &mut layers);
    assert!(!r.is_toggled(L1));
    assert!(!layers.is_active(L1));
}

#[test]
fn test_emit_is_latched_until_release() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    r.resolve(&km, k(1), Transition::Pressed, C0, &mut layers);
    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    assert_eq!(r.latched(k(0)), Some(BasicAction::Emit(KeyCode::Q)));
    assert_eq!(r.emitting().collect::<Vec<_>>(), vec![KeyCode::Q]);

    r.resolve(&km, k(1), Transition::Released, C0, &mut layers);
    assert_eq!(r.emitting().collect::<Vec<_>>(), vec![KeyCode::Q]);

    r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    assert_eq!(r.emitting().count(), 0);
}

#[test]
fn test_config_switch_is_requested_once() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    let a = r.resolve(&km, k(3), Transition::Pressed, C0, &mut layers);
    assert_eq!(a, Action::ConfigSwitch(C1));
    assert_eq!(r.take_config_request(), Some(C1));
    assert_eq!(r.take_config_request(), None);
}

#[test]
fn test_release_without_press_is_noop() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    let a = r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    assert_eq!(a, Action::NoOp);
    assert_eq!(r.hold_count(L1), 0);
}

#[test]
fn test_combined_reads_other_key_on_press() {
    let mut km = KeymapTable::new();
    km.set(
        C0,
        L0,
        k(0),
        Action::Combined {
            other: k(1),
            normal: KeyCode::A,
            combined: KeyCode::B,
        },
    );
    km.set(C0, L0, k(1), Action::LayerHold(L1));
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    r.resolve(&km, k(1), Transition::Pressed, C0, &mut layers);
    assert!(r.is_down(k(1)));
    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    assert_eq!(r.latched(k(0)), Some(BasicAction::Emit(KeyCode::B)));

    r.resolve(&km, k(1), Transition::Released, C0, &mut layers);
    assert!(!r.is_down(k(1)));
    assert_eq!(r.emitting().collect::<Vec<_>>(), vec![KeyCode::B]);

    r.resolve(&km, k(0), Transition::Released, C0, &mut layers);
    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    assert_eq!(r.latched(k(0)), Some(BasicAction::Emit(KeyCode::A)));
}

#[test]
fn test_reset_keeps_key_levels() {
    let km = layer_keymap();
    let mut r = ActionResolver::new();
    let mut layers = LayerStack::new();

    r.resolve(&km, k(0), Transition::Pressed, C0, &mut layers);
    r.reset();
    assert!(r.is_down(k(0)));
    assert_eq!(r.latched(k(0)), None);

    r.key_up(k(0));
    assert!(!r.is_down(k(0)));
}
