//! Two ingredient lists wiping in and out of a terminal.
//!
//! The first list staggers top to bottom, the second bottom to top with a
//! heavier belt. Activation flips every two seconds.
//!
//! Run with `RUST_LOG=slide_wipe=debug` to watch the phase transitions.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use slide_wipe::prelude::*;

const ITEMS: [&str; 4] = ["Water", "Sugar", "Salt", "Pepper"];
const TOGGLE_EVERY: Duration = Duration::from_secs(2);
const TOGGLES: usize = 6;
/// Terminal columns per em
const COLUMNS_PER_EM: f32 = 2.0;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut top: SequenceController =
        SequenceController::new(SequenceConfig::new(), ITEMS.len()).map_err(to_io)?;

    let count = ITEMS.len();
    let bottom_config = SequenceConfig::new()
        .delay_fn(move |i| (count - 1 - i) as f32 * 80.0)
        .belt_spring(SpringConfig::BELT.mass(1.0));
    let mut bottom: SequenceController =
        SequenceController::new(bottom_config, ITEMS.len()).map_err(to_io)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut last_frame = Instant::now();
    let mut last_toggle: Option<Instant> = None;
    let mut toggles = 0;

    loop {
        if last_toggle.map_or(true, |at| at.elapsed() >= TOGGLE_EVERY) {
            if toggles == TOGGLES {
                break;
            }
            top.toggle();
            bottom.toggle();
            log::info!("active = {}", top.is_active());
            last_toggle = Some(Instant::now());
            toggles += 1;
        }

        let dt_ms = last_frame.elapsed().as_secs_f32() * 1000.0;
        last_frame = Instant::now();

        let changes = top.tick(dt_ms) | bottom.tick(dt_ms);
        if !changes.is_empty() {
            write!(out, "\x1b[2J\x1b[H")?;
            draw(&mut out, &top, '█')?;
            writeln!(out)?;
            draw(&mut out, &bottom, '▓')?;
            out.flush()?;
        }

        // Short sleep to avoid busy-looping
        std::thread::sleep(Duration::from_millis(16));
    }

    Ok(())
}

fn draw(out: &mut impl Write, wipe: &SequenceController, belt: char) -> io::Result<()> {
    for (word, frame) in ITEMS.iter().zip(wipe.frames()) {
        writeln!(out, "{}", render_item(word, &frame, belt))?;
    }
    Ok(())
}

/// Lay out one item: the belt covers a window of the item's width shifted by
/// its offset, and visible content shows through wherever the belt is not.
fn render_item(word: &str, frame: &ItemFrame, belt: char) -> String {
    let chars: Vec<char> = word.chars().collect();
    let width = chars.len() as f32 + COLUMNS_PER_EM;
    let belt_start = frame.belt_offset / 100.0 * width;
    let shift = (frame.content_offset * COLUMNS_PER_EM).round() as isize;

    (0..width as usize)
        .map(|column| {
            let x = column as f32;
            if x >= belt_start && x < belt_start + width {
                return belt;
            }
            if !frame.visibility.is_visible() {
                return ' ';
            }
            usize::try_from(column as isize - shift)
                .ok()
                .and_then(|i| chars.get(i).copied())
                .unwrap_or(' ')
        })
        .collect()
}

fn to_io(err: ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}
