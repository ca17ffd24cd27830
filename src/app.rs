use crate::terminal::{to_color, Terminal};
use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::prelude::*;
use treeglow::canvas::Canvas;
use treeglow::config::TreeConfig;
use treeglow::settings::Settings;
use treeglow::{AnimationState, FrameTime, Palette, Result, Scene, Timestamp};

/// How long a status message stays on screen
const STATUS_MS: Timestamp = 2000;

/// Run the tree animation
pub fn run(config: TreeConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| {
        // Clamp so a clock set before 1970 still yields a seed
        chrono::Utc::now().timestamp().max(0) as u64
    });
    log::info!("growing tree with seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    if config.print {
        run_print_mode(&config, &mut rng)
    } else {
        run_interactive(&config, &mut rng)
    }
}

fn now_ms() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

fn frame_delay_ms(time_step: f32) -> Timestamp {
    ((time_step * 1000.0).round() as Timestamp).max(1)
}

/// Simulate a fixed number of frames on a virtual clock, then print the last one
fn run_print_mode(config: &TreeConfig, rng: &mut StdRng) -> Result<()> {
    let mut term = Terminal::new(false)?;
    let (width, height) = term.canvas_size();
    let mut canvas = Canvas::new(width, height);
    let scene = Scene::new(config.style, config.growth_limit);

    let step = frame_delay_ms(config.time_step);
    let mut state: Option<AnimationState> = None;
    for frame in 0..config.frames.max(1) {
        let time = FrameTime {
            now: frame as Timestamp * step,
            animation_start: 0,
            delta_ms: step,
        };
        state = Some(scene.tick(&mut canvas, state, &config.palette, time, rng)?);
    }

    if let Some(state) = &state {
        log::info!(
            "printed tree: {} branches, {} decorations, {} presents",
            state.tree.branches.len(),
            state.tree.decorations.len(),
            state.presents.len()
        );
    }

    term.blit(&canvas);
    term.print_to_stdout();
    Ok(())
}

fn run_interactive(config: &TreeConfig, rng: &mut StdRng) -> Result<()> {
    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let scene = Scene::new(config.style, config.growth_limit);
    let mut palette = config.palette.clone();
    let mut preset = 0usize;
    let mut paused = false;
    let mut status: Option<(String, Timestamp)> = None;

    let (width, height) = term.canvas_size();
    let mut canvas = Canvas::new(width, height);

    let animation_start = now_ms();
    let mut last_frame = animation_start;
    let mut state: Option<AnimationState> = None;

    loop {
        let (new_w, new_h) = crossterm::terminal::size().unwrap_or(term.size());
        if (new_w, new_h) != term.size() {
            term.resize(new_w, new_h);
            term.clear_screen()?;
            let (width, height) = term.canvas_size();
            canvas.resize(width, height);
        }

        if let Some((code, _)) = term.check_key()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => paused = !paused,
                KeyCode::Char('c') => {
                    preset += 1;
                    let (name, next) = Palette::preset(preset);
                    palette = next;
                    status = Some((format!("palette: {name}"), now_ms()));
                }
                KeyCode::Char('r') => {
                    let message = match Settings::load().palette() {
                        Ok(Some(loaded)) => {
                            palette = loaded;
                            "palette reloaded".to_string()
                        }
                        Ok(None) => "no palette in settings".to_string(),
                        Err(err) => err.to_string(),
                    };
                    status = Some((message, now_ms()));
                }
                _ => {}
            }
        }

        let now = now_ms();
        if paused {
            last_frame = now;
            term.sleep(0.1);
            continue;
        }

        let time = FrameTime {
            now,
            animation_start,
            delta_ms: now - last_frame,
        };
        last_frame = now;
        state = Some(scene.tick(&mut canvas, state, &palette, time, rng)?);

        term.blit(&canvas);
        if status.as_ref().is_some_and(|(_, shown_at)| now - shown_at >= STATUS_MS) {
            status = None;
        }
        if let Some((message, _)) = &status {
            term.set_str(1, 0, message, Some(Color::White), Some(to_color(config.style.background)));
        }

        term.render()?;
        term.sleep(config.time_step);
    }

    Ok(())
}
