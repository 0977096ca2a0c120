// Desktop front end: an SDL2 window driving a GameWorld
//
// Only built with the `desktop` feature. All game rules live in the library;
// this module turns key presses into GameWorld calls and draws rectangles.

mod input;
mod render;

use input::{GameAction, InputSystem, intents_from_keyboard};
use problematic::game::{GameWorld, Screen};
use problematic::session::SessionEvent;
use render::{Viewport, dim, render_level_select, render_session};
use sdl2::pixels::Color;
use std::time::{Duration, Instant};

pub fn run(world: &mut GameWorld) -> Result<(), String> {
    let window_config = world.config().window;

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let window = video_subsystem
        .window("Problematic", window_config.width, window_config.height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut input_system = InputSystem::new();
    let frame_time = Duration::from_secs_f32(1.0 / window_config.target_fps.max(1) as f32);
    let mut last_frame = Instant::now();
    let mut title = String::new();

    'running: loop {
        input_system.update_context(world.screen());
        for action in input_system.poll_events(&mut event_pump) {
            match action {
                GameAction::Quit => break 'running,
                GameAction::SelectLevel(id) => {
                    if let Err(e) = world.start(Some(id)) {
                        log::warn!("Cannot start level {}: {}", id, e);
                    }
                }
                GameAction::StartDefault => {
                    if let Err(e) = world.start(None) {
                        log::warn!("Cannot start: {}", e);
                    }
                }
                GameAction::TogglePause => world.toggle_pause(),
                GameAction::BackToLevelSelect => world.return_to_level_select(),
                GameAction::ResolveChallenge(outcome) => {
                    if let Err(e) = world.resolve_challenge(outcome) {
                        log::warn!("Challenge result ignored: {}", e);
                    }
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let intents = intents_from_keyboard(&event_pump.keyboard_state());
        match world.frame(dt, intents) {
            SessionEvent::Died => log::info!("Player died, waiting for the challenge"),
            SessionEvent::LevelComplete { next } => log::info!("Level complete, on to {}", next),
            SessionEvent::GameFinished => log::info!("All levels complete"),
            SessionEvent::None => {}
        }

        match world.screen() {
            Screen::LevelSelect => {
                render_level_select(&mut canvas, &world.progression().level_select())?;
            }
            Screen::Playing(_) | Screen::Challenge(_) => {
                if let Some(session) = world.session() {
                    let viewport = Viewport::new(&window_config, session.camera());
                    render_session(&mut canvas, &viewport, session)?;
                }
                if matches!(world.screen(), Screen::Challenge(_)) {
                    dim(&mut canvas, Color::RGBA(120, 0, 0, 140))?;
                }
            }
            Screen::Finished => {
                canvas.set_draw_color(Color::RGB(30, 60, 30));
                canvas.clear();
            }
        }
        canvas.present();

        let status = status_line(world);
        if status != title {
            canvas
                .window_mut()
                .set_title(&status)
                .map_err(|e| e.to_string())?;
            title = status;
        }

        std::thread::sleep(frame_time);
    }

    Ok(())
}

fn status_line(world: &GameWorld) -> String {
    match world.screen() {
        Screen::LevelSelect => "Problematic - pick a level (1-9, Enter)".to_string(),
        Screen::Playing(id) => {
            let paused = world.session().is_some_and(|s| s.is_paused());
            format!(
                "Problematic - level {} - deaths {}{}",
                id,
                world.progression().deaths(),
                if paused { " - paused" } else { "" }
            )
        }
        Screen::Challenge(id) => {
            format!("Problematic - level {} - challenge: Enter to pass, Backspace to fail", id)
        }
        Screen::Finished => "Problematic - all levels complete! Any key to continue".to_string(),
    }
}
