//! Unicode block sparklines and horizontal bar charts.

/// Eight block heights, lowest first.
pub const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Character used for every point of a flat series.
pub const FLAT_CHAR: char = SPARK_CHARS[3];

/// Map each value onto a block height, scaled between the window's min and max.
///
/// With `width`, only the most recent `width` values are drawn. A flat window
/// draws [`FLAT_CHAR`] throughout. Non-finite values draw as the lowest block.
pub fn sparkline(values: &[f64], width: Option<usize>) -> String {
    let window = match width {
        Some(w) if w < values.len() => &values[values.len() - w..],
        _ => values,
    };
    let finite = window.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return window.iter().map(|_| SPARK_CHARS[0]).collect();
    }
    let span = max - min;
    let top = (SPARK_CHARS.len() - 1) as f64;
    window
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                SPARK_CHARS[0]
            } else if span == 0.0 {
                FLAT_CHAR
            } else {
                let idx = ((v - min) / span * top).round() as usize;
                SPARK_CHARS[idx.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

/// Integer-series convenience.
pub fn sparkline_i64(values: &[i64], width: Option<usize>) -> String {
    let floats: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sparkline(&floats, width)
}

/// Labelled horizontal bars scaled so the largest value spans `width` cells.
pub fn bar_chart(rows: &[(String, f64)], width: usize) -> String {
    if rows.is_empty() {
        return "No data.\n".to_string();
    }
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (label, value) in rows {
        let cells = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * width as f64).round().max(1.0) as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{label:<label_width$} | {}{} {}\n",
            "█".repeat(cells),
            " ".repeat(width.saturating_sub(cells)),
            trim_float(*value)
        ));
    }
    out
}

/// `3` for integral values, `2.5` otherwise.
pub(crate) fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}
