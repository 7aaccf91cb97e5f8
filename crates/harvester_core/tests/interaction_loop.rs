use std::sync::Once;

use harvester_core::{update, Effect, LoopPhase, LoopState, Msg, RecoveryVerdict};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn apply(state: LoopState, msgs: impl IntoIterator<Item = Msg>) -> (LoopState, Vec<Effect>) {
    let mut state = state;
    let mut last = Vec::new();
    for msg in msgs {
        let (next, effects) = update(state, msg);
        state = next;
        last = effects;
    }
    (state, last)
}

#[test]
fn start_with_zero_target_is_done() {
    init_logging();
    let (state, effects) = update(LoopState::new(0), Msg::Started);
    assert_eq!(state.phase(), LoopPhase::Done);
    assert_eq!(effects, vec![Effect::Finish]);
}

#[test]
fn actionable_scan_enacts_then_backs_off() {
    init_logging();
    let (state, effects) = update(LoopState::new(3), Msg::Started);
    assert_eq!(effects, vec![Effect::Scan]);

    let (state, effects) = update(state, Msg::Scanned { actionable: true });
    assert_eq!(state.phase(), LoopPhase::Acting);
    assert_eq!(effects, vec![Effect::EnactOne]);

    let (mut state, effects) = update(state, Msg::Enacted { units: 1 });
    assert_eq!(state.phase(), LoopPhase::Scanning);
    assert_eq!(effects, vec![Effect::Backoff, Effect::Scan]);
    assert_eq!(state.counted(), 1);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn nothing_actionable_scrolls() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(2),
        [Msg::Started, Msg::Scanned { actionable: false }],
    );
    assert_eq!(state.phase(), LoopPhase::Scrolling);
    assert_eq!(effects, vec![Effect::Scroll]);

    let (state, effects) = update(state, Msg::Scrolled);
    assert_eq!(state.phase(), LoopPhase::Scanning);
    assert_eq!(effects, vec![Effect::Scan]);
    assert_eq!(state.view().scrolls, 1);
}

#[test]
fn sponsored_offset_costs_one_extra_action() {
    init_logging();
    let mut state = update(LoopState::new(5), Msg::Started).0;
    let mut actions = 0;
    let mut item = 0;
    while state.phase() != LoopPhase::Done {
        state = update(state, Msg::Scanned { actionable: true }).0;
        item += 1;
        // Item 3 is counted, then turns out to be sponsored.
        let units = if item == 3 { 0 } else { 1 };
        state = update(state, Msg::Enacted { units }).0;
        actions += 1;
        assert!(actions < 20, "loop did not converge");
    }
    let view = state.view();
    assert_eq!(view.counted, 5);
    assert_eq!(view.actions, 6);
    assert_eq!(actions, 6);
}

#[test]
fn negative_units_are_applied_after_counting() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(2),
        [
            Msg::Started,
            Msg::Scanned { actionable: true },
            Msg::Enacted { units: 1 },
            Msg::Scanned { actionable: true },
            Msg::Enacted { units: -1 },
        ],
    );
    assert_eq!(state.counted(), 0);
    assert_eq!(state.phase(), LoopPhase::Scanning);
    assert_eq!(effects, vec![Effect::Backoff, Effect::Scan]);
}

#[test]
fn missing_element_routes_through_classifier() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(2),
        [
            Msg::Started,
            Msg::Scanned { actionable: true },
            Msg::ElementMissing,
        ],
    );
    assert_eq!(state.phase(), LoopPhase::Recovering);
    assert_eq!(effects, vec![Effect::ClassifyFailure]);

    let (state, effects) = update(
        state.clone(),
        Msg::Classified(RecoveryVerdict::NavigateBack),
    );
    assert_eq!(state.phase(), LoopPhase::Scanning);
    assert_eq!(effects, vec![Effect::NavigateBack, Effect::Scan]);
    assert_eq!(state.view().recoveries, 1);
}

#[test]
fn ignored_miss_resumes_scanning() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(1),
        [
            Msg::Started,
            Msg::ElementMissing,
            Msg::Classified(RecoveryVerdict::Ignore),
        ],
    );
    assert_eq!(state.phase(), LoopPhase::Scanning);
    assert_eq!(effects, vec![Effect::Scan]);
}

#[test]
fn abort_is_terminal_and_silences_everything() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(10),
        [
            Msg::Started,
            Msg::Scanned { actionable: true },
            Msg::ElementMissing,
            Msg::Classified(RecoveryVerdict::Abort),
        ],
    );
    assert_eq!(state.phase(), LoopPhase::Aborted);
    assert_eq!(effects, vec![Effect::Abort]);

    for msg in [
        Msg::Scanned { actionable: true },
        Msg::Enacted { units: 1 },
        Msg::Scrolled,
        Msg::ElementMissing,
        Msg::Started,
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }
}

#[test]
fn rate_limit_dialog_aborts_from_any_phase() {
    init_logging();
    let (state, effects) = apply(
        LoopState::new(10),
        [
            Msg::Started,
            Msg::Scanned { actionable: false },
            Msg::RateLimitDetected,
        ],
    );
    assert_eq!(state.phase(), LoopPhase::Aborted);
    assert_eq!(effects, vec![Effect::Abort]);
    assert_eq!(state.view().actions, 0);
}

#[test]
fn stray_classification_outside_recovery_is_ignored() {
    init_logging();
    let (state, _) = update(LoopState::new(3), Msg::Started);
    let (next, effects) = update(state.clone(), Msg::Classified(RecoveryVerdict::Abort));
    assert_eq!(next, state);
    assert!(effects.is_empty());
}
