//! Blinkers Demo: nested layouts in the terminal.
//!
//! Demonstrates:
//! - A Grid of rows splitting the screen
//! - A nested Box and a Scroller (wheel to scroll)
//! - Widgets as plain threads owning an `Env`
//! - Closing the master to shut everything down
//!
//! Click a cell to make it blink. Press Esc or Ctrl+C to exit.
//! Logs go to stderr: `RUST_LOG=panemux=debug cargo run --example blinkers 2>log`.

use panemux::backend;
use panemux::layout::mount;
use panemux::{BoxLayout, Env, Event, Grid, Key, Rect, Rgba, Scroller};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A pseudo-random opaque color.
fn color(seed: u64) -> Rgba {
    let mut x = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1;
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    Rgba::from_u32((x & 0x00ff_ffff) as u32)
}

/// Shared blinker state: where it is and which color it shows.
struct Blink {
    area: Rect,
    lit: bool,
}

/// Fill the area on every resize; blink six times when clicked.
fn blinker(env: Env, seed: u64) {
    let idle = color(seed);
    let lit = color(seed.wrapping_add(7919));
    let env = Arc::new(env);
    let state = Arc::new(Mutex::new(Blink {
        area: Rect::ZERO,
        lit: false,
    }));

    let redraw = move |env: &Env, state: &Blink| {
        let (area, fill) = (state.area, if state.lit { lit } else { idle });
        env.draw(move |canvas| canvas.fill(area, fill))
    };

    while let Some(event) = env.next_event() {
        match event {
            Event::Resize(r) => {
                let mut s = state.lock();
                s.area = r;
                if redraw(&env, &s).is_err() {
                    break;
                }
            }
            Event::MouseDown { at, .. } if state.lock().area.contains(at) => {
                let (env, state) = (Arc::clone(&env), Arc::clone(&state));
                thread::spawn(move || {
                    for _ in 0..6 {
                        {
                            let mut s = state.lock();
                            s.lit = !s.lit;
                            if redraw(&env, &s).is_err() {
                                return;
                            }
                        }
                        thread::sleep(Duration::from_millis(330));
                    }
                });
            }
            _ => {}
        }
    }
    // Events are closed: hand the draw sink back by dropping the env.
}

/// Run a nested mux's master: nothing to draw, close when the parent does.
fn idle_master(master: Env) {
    thread::spawn(move || {
        for _ in master.events().iter() {}
        master.close();
    });
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let (root, terminal) = backend::open_default()?;

    let grid = Grid {
        rows: vec![1, 2, 3],
        gap: 1,
        background: Rgba::from_u32(0xf4a460),
        ..Grid::default()
    };
    let (master, cells) = mount(root, grid);

    let mut seed = 1;
    for (i, cell) in cells.into_iter().enumerate() {
        match i {
            // Top row: a stack of blinkers scrolled with the wheel.
            0 => {
                let scroller = Scroller {
                    gap: 1,
                    background: Rgba::from_u32(0xadd8e6),
                    scroll_step: 2,
                    ..Scroller::new(40, 3)
                };
                let (nested, items) = mount(cell, scroller);
                idle_master(nested);
                for item in items {
                    seed += 1;
                    thread::spawn(move || blinker(item, seed));
                }
            }
            // Middle-right: three blinkers in a column.
            2 => {
                let column = BoxLayout {
                    gap: 1,
                    background: Rgba::from_u32(0xffc0cb),
                    ..BoxLayout::column(3)
                };
                let (nested, items) = mount(cell, column);
                idle_master(nested);
                for item in items {
                    seed += 1;
                    thread::spawn(move || blinker(item, seed));
                }
            }
            _ => {
                seed += 1;
                thread::spawn(move || blinker(cell, seed));
            }
        }
    }

    // The master sees every event; it decides when to quit.
    while let Some(event) = master.next_event() {
        match event {
            Event::WindowClose
            | Event::KeyDown {
                key: Key::Escape, ..
            } => break,
            _ => {}
        }
    }
    master.close();
    terminal.wait();
    Ok(())
}
