use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use timeline_player::core::{Document, EditorState, PlayerConfig, Resolution};
use timeline_player::player::{Clock, Engine, PlayerEvent, SystemClock};
use timeline_player::sources::SimulatedDevice;

const SAMPLE_DOCUMENT: &str = r#"[
    {"type": "paragraph_start", "speaker": "Host"},
    {"type": "word", "source": "interview", "source_start": 12.0, "length": 0.6, "word": "Welcome"},
    {"type": "word", "source": "interview", "source_start": 12.6, "length": 0.4, "word": "back"},
    {"type": "artificial_silence", "length": 0.5},
    {"type": "paragraph_end"},
    {"type": "paragraph_start", "speaker": "Guest"},
    {"type": "word", "source": "broll", "source_start": 3.0, "length": 1.2, "word": "Thanks"},
    {"type": "paragraph_end"}
]"#;

fn load_document(path: Option<PathBuf>) -> anyhow::Result<Document> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read document {}: {}", path.display(), e))?;
            Document::from_json(&json).map_err(|e| anyhow::anyhow!("Invalid document {}: {}", path.display(), e))
        }
        None => Ok(Document::from_json(SAMPLE_DOCUMENT)?),
    }
}

/// Applies a player event the way the editor store would. Returns whether the
/// state the engine watches changed.
fn apply_event(state: &mut EditorState, player_time: &mut f64, event: PlayerEvent) -> bool {
    match event {
        PlayerEvent::SetPlayerTime(time) => {
            *player_time = time;
            false
        }
        PlayerEvent::SetPlay(playing) => {
            let changed = state.playing != playing;
            state.playing = playing;
            changed
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PlayerConfig::load();
    let document = load_document(std::env::args().nth(1).map(PathBuf::from))?;
    log::info!("Loaded document with {} items", document.len());

    let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
    let (mut engine, mut events) = Engine::new(&config, clock.clone());

    // One simulated device per source, standing in for mounted media elements.
    // The registry only holds weak handles, so the map keeps them alive.
    let mut devices = HashMap::new();
    for source in document.sources() {
        let device = Rc::new(RefCell::new(
            SimulatedDevice::new(clock.clone(), 600.0).with_resolution(Resolution::new(1920, 1080)),
        ));
        engine.register_source(source.clone(), &device);
        devices.insert(source, device);
    }
    log::info!(
        "Registered {} sources, target resolution {}x{}",
        engine.player().sources().len(),
        engine.target_resolution().x,
        engine.target_resolution().y
    );

    let mut state = EditorState {
        document,
        ..Default::default()
    };
    engine.on_state_change(&state)?;
    state.playing = true;
    engine.on_state_change(&state)?;

    let mut player_time = 0.0;
    let mut frames = tokio::time::interval(config.frame_interval());
    loop {
        frames.tick().await;
        engine.run_frame()?;

        let mut changed = false;
        while let Ok(event) = events.try_recv() {
            changed |= apply_event(&mut state, &mut player_time, event);
        }
        if changed {
            engine.on_state_change(&state)?;
        }

        if let Some(segment) = engine.current_render_item() {
            log::debug!(
                "{:.3}s in {}",
                player_time,
                segment.source.as_deref().unwrap_or("silence")
            );
        }

        if !state.playing && !engine.has_pending_work() {
            break;
        }
    }

    println!("Playback finished at {:.3}s", player_time);
    Ok(())
}
