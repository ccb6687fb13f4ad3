//! Terminal frontend for Fragments of the Lattice.

mod audio;
mod surface;
mod terminal;
mod title;

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use lattice_core::{GameState, NODE_COMPLETE};
use lattice_engine::{
    Director, EngineConfig, EngineError, EngineResult, Notice, NullAudio, SaveManager,
    SceneContext, SessionEnd, Surface, TextStyle, UiError, confirm_disconnect,
};

use crate::audio::LogAudio;
use crate::surface::CrosstermSurface;
use crate::terminal::TerminalGuard;
use crate::title::TitleOutcome;

#[derive(Parser)]
#[command(
    name = "lattice",
    about = "Fragments of the Lattice, a terminal horror story",
    version
)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Save slot to read and write
    #[arg(long)]
    slot: Option<u32>,

    /// Jump straight into a scene id, skipping the title screen
    #[arg(long)]
    scene: Option<String>,

    /// Skip the startup boot sequence
    #[arg(long)]
    skip_startup: bool,

    /// Disable all audio cues
    #[arg(long)]
    no_audio: bool,
}

fn main() {
    let args = Args::parse();
    init_logging();

    let mut config = EngineConfig::load(&args.config);
    if let Some(slot) = args.slot {
        config.save_slot = slot;
    }
    if let Some(scene) = args.scene {
        config.test_scene = Some(scene);
    }
    if args.skip_startup {
        config.skip_startup = true;
    }
    if args.no_audio {
        config.enable_music = false;
        config.enable_sounds = false;
    }

    match run(config) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

/// Route the log facade to a file: stderr belongs to the story while the
/// terminal is in raw mode.
fn init_logging() {
    let _ = fs::create_dir_all("logs");
    let target = match fs::File::create("logs/lattice.log") {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Stderr,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(target)
        .init();
}

fn run(config: EngineConfig) -> EngineResult<()> {
    let saves = SaveManager::new(config.save_dir.clone());
    let registry = lattice_story::registry();

    let _guard = TerminalGuard::enter()?;
    let mut surface = CrosstermSurface::new(&config)?;

    let Some((mut state, start)) = choose_session(&mut surface, &saves, &config)? else {
        return Ok(());
    };

    let sounds = LogAudio::new(
        config.enable_sounds,
        config.enable_music,
        config.master_volume,
    );
    sounds.wait_ready();
    let silent = NullAudio;
    let audio: &dyn lattice_engine::AudioSink = if config.enable_sounds || config.enable_music {
        &sounds
    } else {
        &silent
    };

    let end = {
        let mut ctx = SceneContext {
            surface: &mut surface,
            state: &mut state,
            audio,
            config: &config,
        };
        Director::new(&registry, &saves, config.save_slot).run(&mut ctx, &start)?
    };

    // An interrupt while dismissing the closing readout is just leaving.
    match report_session(&mut surface, &state, &end) {
        Err(EngineError::Ui(UiError::Interrupted)) => Ok(()),
        other => other,
    }
}

/// Run the pre-director flow until it yields a state and a starting
/// scene, the player quits from the title, or an interrupt is confirmed.
///
/// A Ctrl-C anywhere in the boot banner, title screen, or its notices
/// lands here and gets the same disconnect confirmation the director
/// gives in-scene; declining returns to the title menu.
fn choose_session(
    surface: &mut dyn Surface,
    saves: &SaveManager,
    config: &EngineConfig,
) -> EngineResult<Option<(GameState, String)>> {
    let mut boot = !config.skip_startup;
    loop {
        match session_setup(surface, saves, config, boot) {
            Ok(setup) => return Ok(setup),
            Err(EngineError::Ui(UiError::Interrupted)) => {
                if confirm_disconnect(surface)? {
                    return Ok(None);
                }
                boot = false;
            }
            Err(err) => return Err(err),
        }
    }
}

/// One pass through the setup flow: admin override, or boot banner plus
/// title screen. `None` means the player chose to leave.
fn session_setup(
    surface: &mut dyn Surface,
    saves: &SaveManager,
    config: &EngineConfig,
    boot: bool,
) -> EngineResult<Option<(GameState, String)>> {
    if let Some(scene) = config.test_scene.clone() {
        title::admin_override(surface, &scene)?;
        return Ok(Some((GameState::new(), scene)));
    }
    if boot {
        title::boot_sequence(surface)?;
    }
    match title::title_screen(surface, saves, config.save_slot)? {
        TitleOutcome::Quit => Ok(None),
        TitleOutcome::NewGame => Ok(Some((
            GameState::new(),
            lattice_story::FIRST_SCENE.to_string(),
        ))),
        TitleOutcome::Continue(record) => {
            if record.scene_id == NODE_COMPLETE {
                title::playthrough_complete(surface)?;
                Ok(Some((
                    GameState::new(),
                    lattice_story::FIRST_SCENE.to_string(),
                )))
            } else {
                Ok(Some((
                    GameState::from_snapshot(record.state),
                    record.scene_id,
                )))
            }
        }
    }
}

/// Close out the session in-world: every ending, clean or not, gets the
/// final readout.
fn report_session(
    surface: &mut dyn Surface,
    state: &GameState,
    end: &SessionEnd,
) -> EngineResult<()> {
    match end {
        SessionEnd::Completed => session_summary(surface, state),
        SessionEnd::Disconnected => {
            let notice = Notice::new("CONNECTION TERMINATED")
                .line("The Lattice releases you.", TextStyle::Narration)
                .blank()
                .line("For now.", TextStyle::Whisper)
                .hold_for(Duration::from_secs(2));
            let _ = surface.message_box(&notice)?;
            Ok(())
        }
        SessionEnd::Faulted { scene_id } => {
            let notice = Notice::new("NODE FAILURE")
                .line(format!("NODE {scene_id} IS UNRECOVERABLE"), TextStyle::Alert)
                .blank()
                .line("The connection collapses around you.", TextStyle::Narration)
                .line("Your last synchronized fragment survives.", TextStyle::Plain);
            let _ = surface.message_box(&notice)?;
            session_summary(surface, state)
        }
    }
}

/// The end-of-session readout: ending, stats, and collected fragments.
fn session_summary(surface: &mut dyn Surface, state: &GameState) -> EngineResult<()> {
    let playtime = state.playtime_seconds() as u64;
    let mut notice = Notice::new("SESSION RECORD")
        .line(
            format!("TRAJECTORY: {}", state.ending().to_string().to_uppercase()),
            TextStyle::System,
        )
        .blank()
        .line(format!("Stability  {}/10", state.stability()), TextStyle::Plain)
        .line(
            format!("Corruption {}/10", state.corruption_level()),
            TextStyle::Plain,
        )
        .line(
            format!(
                "Puzzles    {} solved, {} failed",
                state.puzzles_solved(),
                state.puzzles_failed()
            ),
            TextStyle::Plain,
        )
        .line(
            format!("Connected  {:02}:{:02}", playtime / 60, playtime % 60),
            TextStyle::Plain,
        );
    if !state.identity_fragments().is_empty() {
        notice = notice.blank().line(
            format!("Fragments: {}", state.identity_fragments().join(", ")),
            TextStyle::Success,
        );
    }
    let _ = surface.message_box(&notice)?;
    Ok(())
}
