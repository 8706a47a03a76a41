//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks from `precios show` without a TUI
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - line between consecutive observations: `-`

use crate::detail::ChartSeries;
use crate::report::format::format_amount;

/// Render a price series: x is the observation index, y the price.
pub fn render_series_plot(series: &ChartSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((lo, hi)) = series.value_range() else {
        return "Plot: no finite prices\n".to_string();
    };
    let (y_min, y_max) = pad_range(lo, hi, 0.05);
    let n = series.len();

    let mut grid = vec![vec![' '; width]; height];

    // Line first so observation markers overlay it.
    let cells: Vec<(usize, usize)> = series
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
        .collect();

    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let first = series.labels.first().map(String::as_str).unwrap_or("-");
    let last = series.labels.last().map(String::as_str).unwrap_or("-");

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {first} .. {last} | price=[{}, {}]\n",
        format_amount(lo),
        format_amount(hi)
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    // Flat series: give the line a visible band around the single value.
    let span = if span < 1e-12 { min.abs().max(1.0) } else { span };
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
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

    #[test]
    fn plot_golden_snapshot_small() {
        let series = ChartSeries {
            labels: vec!["5 ene".to_string(), "12 ene".to_string()],
            values: vec![100.0, 110.0],
        };

        let txt = render_series_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: 5 ene .. 12 ene | price=[₡ 100, ₡ 110]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_series_stays_inside_grid() {
        let series = ChartSeries {
            labels: vec!["1 mar".to_string(), "2 mar".to_string(), "3 mar".to_string()],
            values: vec![500.0, 500.0, 500.0],
        };
        let txt = render_series_plot(&series, 12, 6);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 6);
        let markers: usize = rows.iter().map(|r| r.matches('o').count()).sum();
        assert_eq!(markers, 3);
    }
}
