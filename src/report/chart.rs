//! Loss/accuracy curves rendered straight to PNG.
//!
//! The image has two side-by-side panels, loss on the left and accuracy on
//! the right. Each shows the training curve (blue) and the validation curve
//! (orange) against the epoch on the x axis. Non-finite points are skipped.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::train::epoch_stats::History;

pub const PANEL_WIDTH: u32 = 600;
pub const PANEL_HEIGHT: u32 = 420;
const MARGIN: u32 = 48;
const GRID_LINES: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
pub const TRAIN_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub const VAL_COLOR: Rgb<u8> = Rgb([255, 127, 14]);

/// Renders `history` and writes it as a PNG to `path`.
pub fn plot_history(history: &History, path: &Path) -> Result<()> {
    let img = render_history(history)?;
    img.save(path)?;
    tracing::info!(path = %path.display(), epochs = history.len(), "wrote training curves");
    Ok(())
}

/// Renders `history` into an in-memory image of `2 * PANEL_WIDTH × PANEL_HEIGHT`.
pub fn render_history(history: &History) -> Result<RgbImage> {
    if history.is_empty() {
        return Err(Error::InvalidData("cannot plot an empty history".into()));
    }

    let mut img = RgbImage::from_pixel(PANEL_WIDTH * 2, PANEL_HEIGHT, BACKGROUND);

    let loss_range = value_range(&[&history.train_loss, &history.val_loss]);
    draw_panel(&mut img, 0, loss_range, &[
        (&history.train_loss, TRAIN_COLOR),
        (&history.val_loss, VAL_COLOR),
    ]);
    draw_panel(&mut img, PANEL_WIDTH, (0.0, 1.0), &[
        (&history.train_accuracy, TRAIN_COLOR),
        (&history.val_accuracy, VAL_COLOR),
    ]);

    Ok(img)
}

/// Plot area of a panel starting at `x0`: `(left, top, right, bottom)`.
fn plot_area(x0: u32) -> (u32, u32, u32, u32) {
    (x0 + MARGIN, MARGIN / 2, x0 + PANEL_WIDTH - MARGIN / 2, PANEL_HEIGHT - MARGIN)
}

fn draw_panel(img: &mut RgbImage, x0: u32, (lo, hi): (f64, f64), series: &[(&Vec<f64>, Rgb<u8>)]) {
    let (left, top, right, bottom) = plot_area(x0);

    for i in 0..=GRID_LINES {
        let y = top + (bottom - top) * i / GRID_LINES;
        draw_line(img, (left as i64, y as i64), (right as i64, y as i64), GRID);
    }
    draw_line(img, (left as i64, top as i64), (left as i64, bottom as i64), AXIS);
    draw_line(img, (left as i64, bottom as i64), (right as i64, bottom as i64), AXIS);

    // Legend swatches in the top-right corner: train above validation.
    for (row, (_, color)) in series.iter().enumerate() {
        let y = top as i64 + 10 + 12 * row as i64;
        for dy in 0..2 {
            draw_line(img, (right as i64 - 40, y + dy), (right as i64 - 10, y + dy), *color);
        }
    }

    let span = if hi > lo { hi - lo } else { 1.0 };
    for (values, color) in series {
        let n = values.len();
        let to_px = |i: usize, v: f64| -> (i64, i64) {
            let fx = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
            let fy = (v - lo) / span;
            let x = left as f64 + fx * (right - left) as f64;
            let y = bottom as f64 - fy * (bottom - top) as f64;
            (x.round() as i64, y.round() as i64)
        };

        let mut prev: Option<(i64, i64)> = None;
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                prev = None;
                continue;
            }
            let p = to_px(i, v);
            match prev {
                Some(q) => {
                    draw_line(img, q, p, *color);
                    draw_line(img, (q.0, q.1 + 1), (p.0, p.1 + 1), *color);
                }
                None => draw_dot(img, p, *color),
            }
            prev = Some(p);
        }
    }
}

/// Min/max over every finite value, padded by 5%; `(0, 1)` if none are finite.
fn value_range(series: &[&Vec<f64>]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-6);
    (lo - pad, hi + pad)
}

fn put(img: &mut RgbImage, (x, y): (i64, i64), color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_dot(img: &mut RgbImage, (x, y): (i64, i64), color: Rgb<u8>) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            put(img, (x + dx, y + dy), color);
        }
    }
}

// Bresenham.
fn draw_line(img: &mut RgbImage, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, (x0, y0), color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> History {
        History {
            train_loss: vec![0.69, 0.5, 0.3, 0.2],
            train_accuracy: vec![0.5, 0.7, 0.9, 0.95],
            val_loss: vec![0.7, 0.55, f64::NAN, 0.25],
            val_accuracy: vec![0.45, 0.65, 0.85, 0.9],
        }
    }

    fn count(img: &RgbImage, color: Rgb<u8>, xs: std::ops::Range<u32>) -> usize {
        img.enumerate_pixels().filter(|(x, _, p)| xs.contains(x) && **p == color).count()
    }

    #[test]
    fn renders_two_panels_with_both_curves() {
        let img = render_history(&history()).unwrap();
        assert_eq!(img.dimensions(), (PANEL_WIDTH * 2, PANEL_HEIGHT));

        // Beyond the legend swatches, each panel carries both curves.
        for xs in [0..PANEL_WIDTH, PANEL_WIDTH..PANEL_WIDTH * 2] {
            assert!(count(&img, TRAIN_COLOR, xs.clone()) > 200);
            assert!(count(&img, VAL_COLOR, xs) > 200);
        }
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(matches!(render_history(&History::default()), Err(Error::InvalidData(_))));
    }

    #[test]
    fn single_epoch_and_all_nan_loss_still_render() {
        let h = History {
            train_loss: vec![f64::NAN],
            train_accuracy: vec![0.5],
            val_loss: vec![f64::INFINITY],
            val_accuracy: vec![0.5],
        };
        assert!(render_history(&h).is_ok());
        assert_eq!(value_range(&[&h.train_loss, &h.val_loss]), (0.0, 1.0));
    }

    #[test]
    fn plot_writes_a_png() {
        let path = std::env::temp_dir().join(format!("ferrite-mlp-chart-{}.png", std::process::id()));
        plot_history(&history(), &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), PANEL_WIDTH * 2);
        std::fs::remove_file(&path).unwrap();
    }
}
