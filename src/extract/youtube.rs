//! YouTube pages: fixed publisher, channel author and a thumbnail derived
//! from the video id when the page itself offers no image.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::rules::{attr, itemprop};
use super::{Bundle, Context, Field};

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("video id pattern is valid")
});

pub fn is_youtube(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
        }
        None => false,
    }
}

pub fn video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn bundle() -> Bundle {
    Bundle::new()
        .only_for(is_youtube)
        .rule(
            Field::Author,
            itemprop(r#"[itemprop="author"] link[itemprop="name"]"#),
        )
        .rule(Field::Author, attr(r#"link[itemprop="name"]"#, "content"))
        .rule(
            Field::Publisher,
            Box::new(|_: &Context<'_>| Some("YouTube".to_string())),
        )
        .rule(
            Field::Image,
            Box::new(|ctx: &Context<'_>| {
                video_id(ctx.url.as_str())
                    .map(|id| format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"))
            }),
        )
}
