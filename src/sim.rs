use crate::model::{Pet, RandomEvent};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerAction {
    Feed,
    Play,
    Nap,
    TimePasses,
}

impl PlayerAction {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PlayerAction::Feed => "feed",
            PlayerAction::Play => "play",
            PlayerAction::Nap => "nap",
            PlayerAction::TimePasses => "time passes",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CycleOutcome {
    pub(crate) event: Option<&'static RandomEvent>,
    /// The pet was alive when the cycle began and is dead now.
    pub(crate) died: bool,
}

/// One interaction cycle: the chosen action, then the decay tick every
/// redraw applies.
pub(crate) fn run_cycle<R: Rng + ?Sized>(
    pet: &mut Pet,
    action: PlayerAction,
    rng: &mut R,
) -> CycleOutcome {
    let was_alive = pet.alive;
    let mut event = None;

    match action {
        PlayerAction::Feed => pet.feed(),
        PlayerAction::Play => pet.play(),
        PlayerAction::Nap => pet.nap(),
        PlayerAction::TimePasses => {
            pet.decay();
            event = pet.random_event(rng);
        }
    }
    pet.decay();

    CycleOutcome {
        event,
        died: was_alive && !pet.alive,
    }
}

/// The redraw right after a pet is named or restored, before any action.
pub(crate) fn first_render(pet: &mut Pet) -> CycleOutcome {
    let was_alive = pet.alive;
    pet.decay();
    CycleOutcome {
        event: None,
        died: was_alive && !pet.alive,
    }
}
