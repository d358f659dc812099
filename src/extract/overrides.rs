//! Rules this service layers on top of the base bundles: page language and a
//! favicon fallback for the logo.

use scraper::Selector;
use url::Url;

use super::{Bundle, Context, Field};

/// Appended last, so these only apply when nothing earlier matched.
pub fn bundle() -> Bundle {
    Bundle::new()
        .rule(Field::Lang, Box::new(|ctx: &Context<'_>| lang(ctx)))
        .rule(Field::Logo, Box::new(|ctx: &Context<'_>| favicon(ctx)))
}

/// The root element's `lang` attribute, verbatim.
fn lang(ctx: &Context<'_>) -> Option<String> {
    let root = ctx.document.root_element();
    if root.value().name() != "html" {
        return None;
    }
    root.value().attr("lang").map(str::to_string)
}

fn link_href(ctx: &Context<'_>, rel: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"link[rel="{rel}"]"#)).ok()?;
    ctx.document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// `rel="icon"` first, then `rel="shortcut icon"`.
fn favicon(ctx: &Context<'_>) -> Option<String> {
    let href = link_href(ctx, "icon").or_else(|| link_href(ctx, "shortcut icon"))?;
    Some(resolve_against_origin(&href, ctx.url))
}

/// Absolute references (anything starting with `http`) pass through.
/// Everything else is appended to the page origin with exactly one `/`
/// between them.
pub fn resolve_against_origin(href: &str, page_url: &Url) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    let origin = page_url.origin().ascii_serialization();
    let separator = if href.starts_with('/') { "" } else { "/" };
    format!("{origin}{separator}{href}")
}
