use rand::seq::SliceRandom;
use rand::Rng;

pub(crate) const ATTR_MIN: u32 = 0;
pub(crate) const ATTR_MAX: u32 = 100;
pub(crate) const START_LEVEL: u32 = 50;

pub(crate) const FEED_GAIN: i32 = 20;
pub(crate) const PLAY_GAIN: i32 = 20;
pub(crate) const PLAY_COST: i32 = 20;
pub(crate) const NAP_GAIN: i32 = 30;

pub(crate) const DECAY_EVERY: u64 = 5;
pub(crate) const DECAY_AMOUNT: i32 = 5;

pub(crate) const EVENT_CHANCE: f64 = 0.3;
pub(crate) const DARK_MODE_CHANCE: f64 = 0.01;

pub(crate) const SAD_BELOW: u32 = 30;
pub(crate) const HAPPY_ABOVE: u32 = 70;
pub(crate) const COOL_AGE: u64 = 30;

pub(crate) const NAME_MAX: usize = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Prompt,
    Main,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Attribute {
    Hunger,
    Happiness,
    Energy,
}

impl Attribute {
    pub(crate) const ALL: [Attribute; 3] =
        [Attribute::Hunger, Attribute::Happiness, Attribute::Energy];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Attribute::Hunger => "Hunger",
            Attribute::Happiness => "Happiness",
            Attribute::Energy => "Energy",
        }
    }

    pub(crate) fn get(self, pet: &Pet) -> u32 {
        match self {
            Attribute::Hunger => pet.hunger,
            Attribute::Happiness => pet.happiness,
            Attribute::Energy => pet.energy,
        }
    }

    fn slot(self, pet: &mut Pet) -> &mut u32 {
        match self {
            Attribute::Hunger => &mut pet.hunger,
            Attribute::Happiness => &mut pet.happiness,
            Attribute::Energy => &mut pet.energy,
        }
    }

    /// Adds `delta` to the attribute and clamps the result to `[0, 100]`.
    pub(crate) fn adjust(self, pet: &mut Pet, delta: i32) {
        let slot = self.slot(pet);
        let next = (*slot as i64 + delta as i64).clamp(ATTR_MIN as i64, ATTR_MAX as i64);
        *slot = next as u32;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RandomEvent {
    pub(crate) label: &'static str,
    pub(crate) emoji: &'static str,
    pub(crate) attribute: Attribute,
    pub(crate) delta: i32,
}

const fn event(
    label: &'static str,
    emoji: &'static str,
    attribute: Attribute,
    delta: i32,
) -> RandomEvent {
    RandomEvent {
        label,
        emoji,
        attribute,
        delta,
    }
}

pub(crate) static EVENTS: [RandomEvent; 8] = [
    event("Found a shiny rock", "🪨", Attribute::Happiness, 10),
    event("Existential crisis", "😵", Attribute::Happiness, -15),
    event("Chased a butterfly", "🦋", Attribute::Happiness, 5),
    event("Ate a rotten pixel", "🤢", Attribute::Hunger, -10),
    event("Listened to dissonant jazz", "🎷", Attribute::Energy, -5),
    event("Had a beautiful dream", "🌈", Attribute::Happiness, 15),
    event("Read Kant", "📖", Attribute::Energy, -15),
    event("Watched Matrix", "🕶️", Attribute::Happiness, -10),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Dead,
    Dark,
    Sad,
    Happy,
    Cool,
    Neutral,
}

impl Face {
    pub(crate) fn glyph(self) -> &'static str {
        match self {
            Face::Dead => "💀 (x_x)",
            Face::Dark => "☠️ (>_<)",
            Face::Sad => "😢 (；一_一)",
            Face::Happy => "😄 (•‿•)",
            Face::Cool => "😎 (⌐■_■)",
            Face::Neutral => "🙂 (•_•)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pet {
    pub(crate) name: String,
    pub(crate) hunger: u32,
    pub(crate) happiness: u32,
    pub(crate) energy: u32,
    pub(crate) age: u64,
    pub(crate) alive: bool,
    pub(crate) dark_mode: bool,
}

impl Pet {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hunger: START_LEVEL,
            happiness: START_LEVEL,
            energy: START_LEVEL,
            age: 0,
            alive: true,
            dark_mode: false,
        }
    }

    pub(crate) fn feed(&mut self) {
        if !self.alive {
            return;
        }
        Attribute::Hunger.adjust(self, FEED_GAIN);
    }

    pub(crate) fn play(&mut self) {
        if !self.alive || self.energy < PLAY_COST as u32 {
            return;
        }
        Attribute::Happiness.adjust(self, PLAY_GAIN);
        Attribute::Energy.adjust(self, -PLAY_COST);
    }

    pub(crate) fn nap(&mut self) {
        if !self.alive {
            return;
        }
        Attribute::Energy.adjust(self, NAP_GAIN);
    }

    /// One decay tick. Runs whether or not the pet is alive; only this tick
    /// can kill it.
    pub(crate) fn decay(&mut self) {
        self.age += 1;
        if self.age % DECAY_EVERY == 0 {
            for attr in Attribute::ALL {
                attr.adjust(self, -DECAY_AMOUNT);
            }
        }

        if Attribute::ALL.iter().any(|a| a.get(self) == ATTR_MIN) {
            self.alive = false;
        }
    }

    /// Rolls for a random event. Liveness is not checked, so a dead pet can
    /// still be perturbed.
    pub(crate) fn random_event<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<&'static RandomEvent> {
        if !rng.gen_bool(EVENT_CHANCE) {
            return None;
        }
        let ev = EVENTS.choose(rng)?;
        ev.attribute.adjust(self, ev.delta);

        if !self.dark_mode && rng.gen_bool(DARK_MODE_CHANCE) {
            self.dark_mode = true;
        }
        Some(ev)
    }

    pub(crate) fn face(&self) -> Face {
        if !self.alive {
            return Face::Dead;
        }
        if self.dark_mode {
            Face::Dark
        } else if Attribute::ALL.iter().any(|a| a.get(self) < SAD_BELOW) {
            Face::Sad
        } else if Attribute::ALL.iter().all(|a| a.get(self) > HAPPY_ABOVE) {
            Face::Happy
        } else if self.age > COOL_AGE {
            Face::Cool
        } else {
            Face::Neutral
        }
    }
}
