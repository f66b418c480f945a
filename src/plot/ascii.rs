//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed spectrum: `.` samples
//! - synthetic traces: one marker per molecule (`1`, `2`, ... then letters),
//!   drawn as connected lines that never overwrite the observation

use crate::overlay::Overlay;

const MARKERS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyz";

/// Marker character for the i-th synthetic trace.
fn marker(index: usize) -> char {
    MARKERS[index % MARKERS.len()] as char
}

/// Render the overlay into a fixed-size character grid.
pub fn render_ascii_overlay(overlay: &Overlay, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (f_min, f_max) = frequency_range(&overlay.frequency).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = value_range(overlay).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Observation first; synthetic lines fill the remaining blank cells so
    // the data is never hidden behind a model trace.
    for (&f, &y) in overlay.frequency.iter().zip(overlay.observed.values.iter()) {
        let x = map_x(f, f_min, f_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = '.';
    }

    for (i, series) in overlay.synthetic.iter().enumerate() {
        draw_series(
            &mut grid,
            &overlay.frequency,
            &series.values,
            f_min,
            f_max,
            y_min,
            y_max,
            marker(i),
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: freq=[{f_min:.3}, {f_max:.3}] MHz | flux=[{y_min:.3}, {y_max:.3}]\n"
    ));
    out.push_str(&format_legend(overlay));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn format_legend(overlay: &Overlay) -> String {
    let mut out = format!(". {}", overlay.observed.label);
    for (i, series) in overlay.synthetic.iter().enumerate() {
        out.push_str(&format!("  {} {}", marker(i), series.label));
    }
    out.push('\n');
    out
}

fn frequency_range(frequency: &[f64]) -> Option<(f64, f64)> {
    match (frequency.first(), frequency.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => Some((lo, hi)),
        _ => None,
    }
}

fn value_range(overlay: &Overlay) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &v in overlay
        .observed
        .values
        .iter()
        .chain(overlay.synthetic.iter().flat_map(|s| s.values.iter()))
    {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(f: f64, f_min: f64, f_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((f - f_min) / (f_max - f_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

#[allow(clippy::too_many_arguments)]
fn draw_series(
    grid: &mut [Vec<char>],
    frequency: &[f64],
    values: &[f64],
    f_min: f64,
    f_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (&f, &v) in frequency.iter().zip(values.iter()) {
        let x = map_x(f, f_min, f_max, width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else if grid[y][x] == ' ' {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish); only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

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
    use crate::overlay::Series;

    #[test]
    fn plot_golden_snapshot_small() {
        let overlay = Overlay {
            frequency: (0..10).map(|i| i as f64).collect(),
            observed: Series {
                label: "obs".to_string(),
                values: vec![0.0; 10],
            },
            synthetic: vec![Series {
                label: "M1".to_string(),
                values: vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            }],
            skipped: Vec::new(),
        };

        let txt = render_ascii_overlay(&overlay, 10, 5);
        let expected = concat!(
            "Plot: freq=[0.000, 9.000] MHz | flux=[-0.050, 1.050]\n",
            ". obs  1 M1\n",
            "    1     \n",
            "    1     \n",
            "    11    \n",
            "   1 1    \n",
            "..........\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn legend_lists_every_molecule_in_order() {
        let overlay = Overlay {
            frequency: vec![0.0, 1.0],
            observed: Series {
                label: "obs".to_string(),
                values: vec![0.0, 1.0],
            },
            synthetic: vec![
                Series { label: "A".to_string(), values: vec![0.0, 0.0] },
                Series { label: "B".to_string(), values: vec![0.0, 0.0] },
            ],
            skipped: Vec::new(),
        };
        let txt = render_ascii_overlay(&overlay, 10, 5);
        assert!(txt.contains(". obs  1 A  2 B"));
    }
}
