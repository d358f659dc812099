//! Base rule bundles: one per field, ordered from most to least specific
//! source (Open Graph, Twitter cards, plain meta tags, microdata, markup).

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use scraper::{ElementRef, Selector};

use super::{Bundle, Context, Field, Rule};

// ── Rule builders ──────────────────────────────────────────────────────────

fn first<'a>(ctx: &Context<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    ctx.document.select(&selector).next()
}

/// Collapse runs of whitespace and trim.
pub fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(cleaned).filter(|s| !s.is_empty())
}

/// Resolve a possibly relative reference against the page URL. Only http(s)
/// results are kept.
pub fn absolute(ctx: &Context<'_>, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let resolved = ctx.url.join(reference).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// `<meta property=KEY>` or `<meta name=KEY>` content.
pub fn meta(key: &'static str) -> Rule {
    Box::new(move |ctx: &Context<'_>| {
        let selector = format!(r#"meta[property="{key}"], meta[name="{key}"]"#);
        first(ctx, &selector)?
            .value()
            .attr("content")
            .and_then(clean_text)
    })
}

/// Attribute of the first element matching `selector`.
pub fn attr(selector: &'static str, name: &'static str) -> Rule {
    Box::new(move |ctx: &Context<'_>| {
        first(ctx, selector)?.value().attr(name).and_then(clean_text)
    })
}

/// Text content of the first element matching `selector`.
pub fn text(selector: &'static str) -> Rule {
    Box::new(move |ctx: &Context<'_>| {
        clean_text(&first(ctx, selector)?.text().collect::<String>())
    })
}

/// Microdata value: `content`, then the text of the element.
pub fn itemprop(selector: &'static str) -> Rule {
    Box::new(move |ctx: &Context<'_>| {
        let el = first(ctx, selector)?;
        el.value()
            .attr("content")
            .and_then(clean_text)
            .or_else(|| clean_text(&el.text().collect::<String>()))
    })
}

/// Wrap a rule so its value is resolved to an absolute URL.
pub fn as_url(rule: Rule) -> Rule {
    Box::new(move |ctx: &Context<'_>| rule(ctx).and_then(|v| absolute(ctx, &v)))
}

/// Wrap a rule so its value is normalized to an RFC 3339 UTC timestamp.
pub fn as_date(rule: Rule) -> Rule {
    Box::new(move |ctx: &Context<'_>| rule(ctx).and_then(|v| normalize_date(&v)))
}

/// URL-bearing microdata: `content`, `src` or `href`.
fn itemprop_url(selector: &'static str) -> Rule {
    Box::new(move |ctx: &Context<'_>| {
        let el = first(ctx, selector)?;
        let value = el.value();
        let raw = value
            .attr("content")
            .or_else(|| value.attr("src"))
            .or_else(|| value.attr("href"))?;
        absolute(ctx, raw)
    })
}

/// Parse the handful of date shapes pages actually use. Unparseable input
/// yields `None` rather than a garbage date.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let parsed: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        dt.with_timezone(&Utc)
    } else if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        naive.and_utc()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        naive.and_utc()
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
    };
    Some(parsed.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ── Bundles ────────────────────────────────────────────────────────────────

pub fn base_bundles() -> Vec<Bundle> {
    vec![
        author(),
        date(),
        description(),
        image(),
        logo(),
        publisher(),
        title(),
        url(),
    ]
}

fn author() -> Bundle {
    Bundle::new()
        .rule(Field::Author, meta("author"))
        .rule(Field::Author, meta("article:author"))
        .rule(Field::Author, itemprop(r#"[itemprop="author"] [itemprop="name"]"#))
        .rule(Field::Author, itemprop(r#"[itemprop="author"]"#))
        .rule(Field::Author, text(r#"a[rel="author"]"#))
}

fn date() -> Bundle {
    Bundle::new()
        .rule(Field::Date, as_date(meta("article:published_time")))
        .rule(Field::Date, as_date(meta("date")))
        .rule(Field::Date, as_date(itemprop(r#"[itemprop="datePublished"]"#)))
        .rule(Field::Date, as_date(attr("time[datetime]", "datetime")))
        .rule(Field::Date, as_date(meta("article:modified_time")))
}

fn description() -> Bundle {
    Bundle::new()
        .rule(Field::Description, meta("og:description"))
        .rule(Field::Description, meta("twitter:description"))
        .rule(Field::Description, meta("description"))
        .rule(Field::Description, itemprop(r#"[itemprop="description"]"#))
}

fn image() -> Bundle {
    Bundle::new()
        .rule(Field::Image, as_url(meta("og:image:secure_url")))
        .rule(Field::Image, as_url(meta("og:image")))
        .rule(Field::Image, as_url(meta("twitter:image")))
        .rule(Field::Image, as_url(meta("twitter:image:src")))
        .rule(Field::Image, as_url(attr(r#"link[rel="image_src"]"#, "href")))
        .rule(Field::Image, itemprop_url(r#"[itemprop="image"]"#))
}

fn logo() -> Bundle {
    Bundle::new()
        .rule(Field::Logo, as_url(meta("og:logo")))
        .rule(Field::Logo, itemprop_url(r#"[itemprop="logo"]"#))
        .rule(Field::Logo, as_url(attr(r#"link[rel="apple-touch-icon"]"#, "href")))
        .rule(
            Field::Logo,
            as_url(attr(r#"link[rel="apple-touch-icon-precomposed"]"#, "href")),
        )
}

fn publisher() -> Bundle {
    Bundle::new()
        .rule(Field::Publisher, meta("og:site_name"))
        .rule(Field::Publisher, meta("application-name"))
        .rule(Field::Publisher, meta("publisher"))
        .rule(Field::Publisher, meta("twitter:app:name:iphone"))
}

fn title() -> Bundle {
    Bundle::new()
        .rule(Field::Title, meta("og:title"))
        .rule(Field::Title, meta("twitter:title"))
        .rule(Field::Title, text("title"))
        .rule(Field::Title, text("h1"))
}

fn url() -> Bundle {
    Bundle::new()
        .rule(Field::Url, as_url(meta("og:url")))
        .rule(Field::Url, as_url(attr(r#"link[rel="canonical"]"#, "href")))
        .rule(Field::Url, Box::new(|ctx: &Context<'_>| Some(ctx.url.to_string())))
}
