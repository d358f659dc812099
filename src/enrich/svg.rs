//! SVG dimensions from the root `<svg>` element.

use scraper::{Html, Selector};

/// `width`/`height` of the root `<svg>`, in pixels. A missing side is derived
/// from the `viewBox` aspect ratio; with neither attribute the `viewBox`
/// size itself is used. `None` when the payload is not SVG or has no usable
/// size.
pub(super) fn dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let text = std::str::from_utf8(bytes).ok()?;
    if !text.contains("<svg") {
        return None;
    }

    let document = Html::parse_document(text);
    let selector = Selector::parse("svg").ok()?;
    let root = document.select(&selector).next()?.value();

    let width = root.attr("width").and_then(length);
    let height = root.attr("height").and_then(length);
    // The HTML parser restores SVG attribute case, but accept either spelling.
    let view_box = root
        .attr("viewBox")
        .or_else(|| root.attr("viewbox"))
        .and_then(view_box_size);

    let (width, height) = match (width, height, view_box) {
        (Some(w), Some(h), _) => (w, h),
        (Some(w), None, Some((vw, vh))) => (w, w * vh / vw),
        (None, Some(h), Some((vw, vh))) => (h * vw / vh, h),
        (None, None, Some(size)) => size,
        _ => return None,
    };
    Some((width.round() as u32, height.round() as u32))
}

/// A plain or `px` length. Percentages and font-relative units have no
/// intrinsic pixel size.
fn length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    positive(number.parse().ok()?)
}

/// Width and height from `min-x min-y width height`.
fn view_box_size(value: &str) -> Option<(f64, f64)> {
    let parts: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts[..] {
        [_, _, w, h] => Some((positive(w)?, positive(h)?)),
        _ => None,
    }
}

fn positive(n: f64) -> Option<f64> {
    (n.is_finite() && n > 0.0).then_some(n)
}
