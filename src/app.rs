use crate::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use crate::input::{map_event, wait_for_input, Command};
use crate::model::{Pet, RandomEvent, Scene, NAME_MAX};
use crate::render::{draw_view, Terminal, View};
use crate::session::{SessionId, SessionStore};
use crate::sim::{first_render, run_cycle, CycleOutcome, PlayerAction};
use crate::storage::{load_or_discard, save_atomic};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    store: SessionStore,
    session: SessionId,
    rng: StdRng,
    scene: Scene,
    name_edit: String,
    last_event: Option<&'static RandomEvent>,
    should_quit: bool,
}

impl App {
    fn init(paths: Paths, settings: Settings) -> Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut store = SessionStore::default();
        let session = store.open();
        debug!(%session, sessions = store.len(), "session opened");

        let mut app = Self {
            settings,
            paths,
            store,
            session,
            rng,
            scene: Scene::Prompt,
            name_edit: String::new(),
            last_event: None,
            should_quit: false,
        };

        // A readable save resumes that pet under its stored name; the prompt
        // only runs when there is nothing to resume.
        if let Some(pet) = load_or_discard(&app.paths.save_path) {
            info!(name = %pet.name, age = pet.age, alive = pet.alive, "restored pet");
            app.start(pet)?;
        }

        Ok(app)
    }

    fn start(&mut self, pet: Pet) -> Result<()> {
        self.store.adopt(self.session, pet);
        self.name_edit.clear();
        self.last_event = None;
        self.scene = Scene::Main;

        if let Some(pet) = self.store.pet_mut(self.session) {
            let outcome = first_render(pet);
            self.after_cycle(outcome);
        }
        self.persist()
    }

    pub(crate) fn handle(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Act(action) => self.act(action)?,
            Command::PromptChar(ch) => {
                if self.name_edit.chars().count() < NAME_MAX {
                    self.name_edit.push(ch);
                }
            }
            Command::PromptBackspace => {
                self.name_edit.pop();
            }
            Command::PromptCommit => {
                let name = self.name_edit.trim().to_string();
                if !name.is_empty() {
                    info!(%name, "new pet");
                    self.start(Pet::new(name))?;
                }
            }
            Command::NewPet => {
                if let Some(old) = self.store.release(self.session) {
                    info!(name = %old.name, age = old.age, "starting over");
                }
                self.last_event = None;
                self.scene = Scene::Prompt;
            }
            Command::Redraw => {}
            Command::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn act(&mut self, action: PlayerAction) -> Result<()> {
        let Some(pet) = self.store.pet_mut(self.session) else {
            return Ok(());
        };
        let outcome = run_cycle(pet, action, &mut self.rng);
        debug!(
            action = action.label(),
            hunger = pet.hunger,
            happiness = pet.happiness,
            energy = pet.energy,
            age = pet.age,
            "cycle"
        );
        self.after_cycle(outcome);
        self.persist()
    }

    fn after_cycle(&mut self, outcome: CycleOutcome) {
        self.last_event = outcome.event;
        if let Some(ev) = outcome.event {
            info!(
                event = ev.label,
                attribute = ev.attribute.label(),
                delta = ev.delta,
                "random event"
            );
        }
        if outcome.died {
            info!("pet died");
        }
        if self.store.pet(self.session).is_some_and(|p| !p.alive) {
            self.scene = Scene::Dead;
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(pet) = self.store.pet(self.session) {
            save_atomic(&self.paths.save_path, pet)
                .with_context(|| format!("saving {}", self.paths.save_path.display()))?;
        }
        Ok(())
    }

    pub(crate) fn scene(&self) -> Scene {
        self.scene
    }

    fn view(&self) -> View<'_> {
        View {
            scene: self.scene,
            pet: self.store.pet(self.session),
            name_edit: &self.name_edit,
            last_event: self.last_event,
        }
    }

    fn run(&mut self, term: &mut Terminal) -> Result<()> {
        while !self.should_quit {
            term.resize_if_needed()?;
            draw_view(&mut term.cur, &self.view(), &self.settings);
            term.present(true)?;

            let ev = wait_for_input()?;
            if let Some(cmd) = map_event(self.scene(), ev) {
                self.handle(cmd)?;
            }
        }
        Ok(())
    }

    fn shutdown(mut self) -> Result<()> {
        if let Some(pet) = self.store.end(self.session) {
            save_atomic(&self.paths.save_path, &pet)?;
        }
        save_settings_atomic(&self.paths.settings_path, &self.settings)
    }
}

fn init_logging(path: &Path, default_level: &str) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

pub(crate) fn run() -> Result<()> {
    let paths = project_paths()?;
    let settings = load_settings(&paths.settings_path);
    init_logging(&paths.log_path, &settings.log_level)?;
    info!(save = %paths.save_path.display(), "pocketpet starting");

    let mut app = App::init(paths, settings)?;
    let mut term = Terminal::begin()?;
    let result = app.run(&mut term);
    term.end()?;
    result?;

    app.shutdown()?;
    info!("pocketpet stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::load;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let settings = Settings {
            seed: Some(1),
            ..Settings::default()
        };
        App::init(Paths::in_dir(dir.path()), settings).unwrap()
    }

    fn type_name(app: &mut App, name: &str) {
        for ch in name.chars() {
            app.handle(Command::PromptChar(ch)).unwrap();
        }
        app.handle(Command::PromptCommit).unwrap();
    }

    #[test]
    fn fresh_start_waits_for_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert_eq!(app.scene(), Scene::Prompt);

        app.handle(Command::PromptChar(' ')).unwrap();
        app.handle(Command::PromptCommit).unwrap();
        assert_eq!(app.scene(), Scene::Prompt);
        assert!(load(&app.paths.save_path).unwrap().is_none());
    }

    #[test]
    fn naming_creates_renders_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_name(&mut app, "Mochi");

        assert_eq!(app.scene(), Scene::Main);
        let saved = load(&app.paths.save_path).unwrap().unwrap();
        assert_eq!(saved.name, "Mochi");
        assert_eq!(saved.age, 1);
    }

    #[test]
    fn name_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        for _ in 0..40 {
            app.handle(Command::PromptChar('a')).unwrap();
        }
        assert_eq!(app.name_edit.len(), NAME_MAX);
    }

    #[test]
    fn every_action_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_name(&mut app, "Mochi");

        app.handle(Command::Act(PlayerAction::Feed)).unwrap();
        let saved = load(&app.paths.save_path).unwrap().unwrap();
        assert_eq!(saved.hunger, 70);
        assert_eq!(saved.age, 2);
    }

    #[test]
    fn restart_resumes_the_saved_pet_without_prompting() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut app = app_in(&dir);
            type_name(&mut app, "Mochi");
            app.handle(Command::Act(PlayerAction::Nap)).unwrap();
            app.shutdown().unwrap();
        }

        let app = app_in(&dir);
        assert_eq!(app.scene(), Scene::Main);
        let pet = app.store.pet(app.session).unwrap();
        assert_eq!(pet.name, "Mochi");
        assert_eq!(pet.energy, 80);
        assert_eq!(pet.age, 3);
    }

    #[test]
    fn corrupt_save_starts_over_at_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Paths::in_dir(dir.path()).save_path, "not a save").unwrap();
        let app = app_in(&dir);
        assert_eq!(app.scene(), Scene::Prompt);
    }

    #[test]
    fn death_moves_to_game_over_and_new_pet_reprompts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        type_name(&mut app, "Mochi");
        app.store.pet_mut(app.session).unwrap().energy = 20;

        app.handle(Command::Act(PlayerAction::Play)).unwrap();
        assert_eq!(app.scene(), Scene::Dead);
        assert!(!load(&app.paths.save_path).unwrap().unwrap().alive);

        app.handle(Command::NewPet).unwrap();
        assert_eq!(app.scene(), Scene::Prompt);
        type_name(&mut app, "Tofu");
        let saved = load(&app.paths.save_path).unwrap().unwrap();
        assert_eq!(saved.name, "Tofu");
        assert!(saved.alive);
    }

    #[test]
    fn dead_pet_restores_onto_the_game_over_screen() {
        let dir = tempfile::tempdir().unwrap();
        let dead = Pet {
            alive: false,
            ..Pet::new("Mochi")
        };
        save_atomic(&Paths::in_dir(dir.path()).save_path, &dead).unwrap();
        let app = app_in(&dir);
        assert_eq!(app.scene(), Scene::Dead);
    }
}
