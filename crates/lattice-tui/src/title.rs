//! Boot sequence and title screen.

use std::time::Duration;

use lattice_engine::{
    ChoiceMenu, EngineResult, Notice, SaveManager, SaveRecord, Surface, TextStyle,
};

const TITLE_ART: [&str; 6] = [
    "  ███████ ██████   █████   ██████  ███    ███ ███████ ███    ██ ████████ ███████",
    "  ██      ██   ██ ██   ██ ██       ████  ████ ██      ████   ██    ██    ██     ",
    "  █████   ██████  ███████ ██   ███ ██ ████ ██ █████   ██ ██  ██    ██    ███████",
    "  ██      ██   ██ ██   ██ ██    ██ ██  ██  ██ ██      ██  ██ ██    ██         ██",
    "  ██      ██   ██ ██   ██  ██████  ██      ██ ███████ ██   ████    ██    ███████",
    "                        o f   t h e   L a t t i c e                             ",
];

/// What the player picked on the title screen.
pub enum TitleOutcome {
    /// Resume from this validated save.
    Continue(SaveRecord),
    /// Start a fresh playthrough.
    NewGame,
    /// Leave without playing.
    Quit,
}

/// The pre-title boot banner. Skippable via config or flag.
pub fn boot_sequence(surface: &mut dyn Surface) -> EngineResult<()> {
    surface.clear()?;
    surface.line("LATTICE TERMINAL v1.1.0", TextStyle::System)?;
    surface.line("(c) 2147 ARCHIVE CUSTODIAL SYSTEMS", TextStyle::Narration)?;
    surface.pause(Duration::from_millis(750))?;
    surface.line("", TextStyle::Plain)?;
    surface.type_out("[BOOT] Locating caretaker interface...", TextStyle::System)?;
    surface.type_out("[BOOT] Checking node integrity... DEGRADED", TextStyle::Warning)?;
    surface.type_out("[BOOT] Anomalous process detected. Ignoring.", TextStyle::Alert)?;
    surface.pause(Duration::from_secs(1))?;
    Ok(())
}

/// Title screen loop: continue from a save if one loads, or start over.
pub fn title_screen(
    surface: &mut dyn Surface,
    saves: &SaveManager,
    slot: u32,
) -> EngineResult<TitleOutcome> {
    loop {
        surface.clear()?;
        for row in TITLE_ART {
            surface.line(row, TextStyle::Whisper)?;
        }
        surface.line("", TextStyle::Plain)?;

        let has_save = saves.has_save(slot);
        let options: Vec<&str> = if has_save {
            vec!["CONTINUE", "NEW GAME", "EXIT"]
        } else {
            vec!["NEW GAME", "EXIT"]
        };
        let mut menu = ChoiceMenu::new(options.clone(), 0)?;
        let picked = options[surface.choose(None, &mut menu)?];

        match picked {
            "CONTINUE" => {
                // A file that fails validation loads as None; tell the
                // player in-world and fall back to the menu.
                match saves.load_game(slot) {
                    Some(record) => {
                        let notice = Notice::new("SYNC SUCCESS")
                            .line("FRAGMENT RESTORED", TextStyle::Success)
                            .blank()
                            .line(
                                format!("Welcome back, {}.", record.state.player_name),
                                TextStyle::Plain,
                            )
                            .hold_for(Duration::from_secs(2));
                        let _ = surface.message_box(&notice)?;
                        return Ok(TitleOutcome::Continue(record));
                    }
                    None => {
                        let notice = Notice::new("NODE FAILURE")
                            .line("FRAGMENT UNRECOVERABLE", TextStyle::Alert)
                            .blank()
                            .line("The stored identity no longer parses.", TextStyle::Plain)
                            .line("Some things do not come back.", TextStyle::Whisper);
                        let _ = surface.message_box(&notice)?;
                    }
                }
            }
            "NEW GAME" => {
                if has_save {
                    let notice = Notice::new("OVERWRITE")
                        .line("ERASE THE STORED FRAGMENT?", TextStyle::Alert)
                        .blank()
                        .line("The previous caretaker will be forgotten.", TextStyle::Plain)
                        .choices(["CANCEL", "CONFIRM"]);
                    if surface.message_box(&notice)? != Some(1) {
                        continue;
                    }
                    saves.delete_save(slot);
                }
                return Ok(TitleOutcome::NewGame);
            }
            _ => return Ok(TitleOutcome::Quit),
        }
    }
}

/// Banner for the `--scene` developer bypass.
pub fn admin_override(surface: &mut dyn Surface, scene: &str) -> EngineResult<()> {
    let notice = Notice::new("ADMIN OVERRIDE")
        .line("DIRECT NODE ENTRY", TextStyle::Warning)
        .blank()
        .line(format!("Target: {scene}"), TextStyle::System)
        .hold_for(Duration::from_secs(1));
    let _ = surface.message_box(&notice)?;
    Ok(())
}

/// Shown when a continue lands on an already-finished playthrough.
pub fn playthrough_complete(surface: &mut dyn Surface) -> EngineResult<()> {
    let notice = Notice::new("ARCHIVE SEALED")
        .line("THIS FRAGMENT HAS REACHED ITS END", TextStyle::System)
        .blank()
        .line("The Lattice begins again.", TextStyle::Whisper);
    let _ = surface.message_box(&notice)?;
    Ok(())
}
