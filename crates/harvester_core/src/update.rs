use crate::{Effect, LoopPhase, LoopState, Msg, RecoveryVerdict};

/// Pure update function: applies a message to the loop state and returns the
/// effects the runner must perform, in order.
pub fn update(mut state: LoopState, msg: Msg) -> (LoopState, Vec<Effect>) {
    if state.phase().is_terminal() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Started => settle(&mut state, Vec::new()),
        Msg::RateLimitDetected => abort(&mut state),
        Msg::Scanned { actionable } => {
            if state.phase() != LoopPhase::Scanning {
                return (state, Vec::new());
            }
            if actionable {
                state.set_phase(LoopPhase::Acting);
                vec![Effect::EnactOne]
            } else {
                state.set_phase(LoopPhase::Scrolling);
                vec![Effect::Scroll]
            }
        }
        Msg::Enacted { units } => {
            state.record_enact(units);
            // Pace every performed action, including the final one.
            settle(&mut state, vec![Effect::Backoff])
        }
        Msg::Scrolled => {
            state.record_scroll();
            settle(&mut state, Vec::new())
        }
        Msg::ElementMissing => {
            state.record_recovery();
            state.set_phase(LoopPhase::Recovering);
            vec![Effect::ClassifyFailure]
        }
        Msg::Classified(verdict) => {
            if state.phase() != LoopPhase::Recovering {
                return (state, Vec::new());
            }
            match verdict {
                RecoveryVerdict::Abort => abort(&mut state),
                RecoveryVerdict::NavigateBack => settle(&mut state, vec![Effect::NavigateBack]),
                RecoveryVerdict::Ignore => settle(&mut state, Vec::new()),
            }
        }
    };

    (state, effects)
}

/// Finishes when the target is met, otherwise goes back to scanning.
fn settle(state: &mut LoopState, mut effects: Vec<Effect>) -> Vec<Effect> {
    if state.target_reached() {
        state.set_phase(LoopPhase::Done);
        effects.push(Effect::Finish);
    } else {
        state.set_phase(LoopPhase::Scanning);
        effects.push(Effect::Scan);
    }
    effects
}

fn abort(state: &mut LoopState) -> Vec<Effect> {
    state.set_phase(LoopPhase::Aborted);
    vec![Effect::Abort]
}
