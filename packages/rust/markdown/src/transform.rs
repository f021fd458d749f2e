//! Content transformation passes.
//!
//! Each pass is a pure function `&str -> String`. [`transform_content`] runs
//! them in a fixed order; later passes rely on the normalization done by
//! earlier ones (links are rewritten after images have moved to `/assets`).

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::compat;
use crate::paths::rewrite_numbered_file_links;

/// `[text](url)`; for image embeds the match starts after the `!`.
pub(crate) static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").expect("valid regex"));

/// Asset paths produced by [`fix_image_paths`]; their case is kept.
const ASSETS_PREFIX: &str = "/assets/";

/// Links pointing off-site are never rewritten.
pub(crate) fn is_external(url: &str) -> bool {
    url.starts_with("http")
}

/// Run every pass over a document body.
pub fn transform_content(text: &str) -> String {
    let mut result = fix_image_paths(text);

    result = wrap_video_links(&result);
    result = rewrite_numbered_file_links(&result);
    result = process_content_links(&result);
    result = strip_html_comments(&result);
    result = escape_mdx(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Image paths
// ---------------------------------------------------------------------------

/// Point relative `_images/` references and the legacy operator tutorial
/// screenshots at `/assets/`.
///
/// SVG references are retargeted to a PNG rendered under the same name.
pub fn fix_image_paths(text: &str) -> String {
    static IMAGES_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(^|[\s("'=\[])(?:[\w.-]+/)*_images/([\w.-]+?)\.(?:png|svg)\b"#)
            .expect("valid regex")
    });
    static OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"(^|[\s("'=\[])(?:[\w.-]+/)*resources/(?:[\w.-]+/)*?(?:\d+_)?create-pepr-operator/(light|dark)\.png"#,
        )
        .expect("valid regex")
    });

    let result = IMAGES_RE.replace_all(text, "${1}/assets/${2}.png");
    OPERATOR_RE
        .replace_all(&result, "${1}/assets/${2}.png")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Video links
// ---------------------------------------------------------------------------

/// Wrap bare `.mp4` URLs in a `<video>` element. A query string or
/// fragment after `.mp4` stays part of the URL.
///
/// URLs inside an attribute (`src="..."`), in either kind of quotes, or used
/// as a Markdown link target are left alone, so running the pass twice
/// changes nothing.
pub fn wrap_video_links(text: &str) -> String {
    static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r#"(src=["']|["']|\]\()?(https?://[^\s"'<>()\]]+\.mp4(?:[?#][^\s"'<>()\]]*|\b))"#,
        )
        .expect("valid regex")
    });

    VIDEO_RE
        .replace_all(text, |caps: &Captures| {
            let followed_by_quote = caps
                .get(0)
                .is_some_and(|m| text[m.end()..].starts_with(['"', '\'']));
            if caps.get(1).is_some() || followed_by_quote {
                return caps[0].to_string();
            }
            video_snippet(&caps[2])
        })
        .into_owned()
}

fn video_snippet(url: &str) -> String {
    format!(r#"<video class="video" controls src="{url}"></video>"#)
}

// ---------------------------------------------------------------------------
// Pass 3: Markdown links
// ---------------------------------------------------------------------------

/// Rewrite relative Markdown link targets for the site's URL layout.
///
/// Image embeds are rewritten like links. External targets and targets
/// already under `/assets/` pass through untouched.
pub fn process_content_links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures| {
            let url = &caps[2];
            if is_external(url) || url.starts_with(ASSETS_PREFIX) {
                return caps[0].to_string();
            }
            format!("[{}]({})", &caps[1], rewrite_link_target(url))
        })
        .into_owned()
}

/// Rewrite one relative link target. The `#fragment` is kept verbatim.
///
/// Order matters:
/// 1. `../../<root file>` → `./<canonical name>`
/// 2. trailing `README.md` dropped
/// 3. leading `_images` → `__images`
/// 4. leading `docs/`, `./docs/`, `/docs/` dropped
/// 5. trailing `.md` dropped
/// 6. path lowercased
pub fn rewrite_link_target(url: &str) -> String {
    let (path, fragment) = match url.split_once('#') {
        Some((path, frag)) => (path, Some(frag)),
        None => (url, None),
    };

    let path = if path.is_empty() {
        String::new()
    } else {
        rewrite_link_path(path)
    };

    match fragment {
        Some(frag) => format!("{path}#{frag}"),
        None => path,
    }
}

fn rewrite_link_path(path: &str) -> String {
    if let Some(name) = path.strip_prefix("../../") {
        if !name.contains('/') {
            if let Some(canonical) = compat::root_file_canonical(name) {
                return format!("./{canonical}");
            }
        }
    }

    let mut p = path.to_string();

    if p == "README.md" {
        p = "./".to_string();
    } else if let Some(dir) = p.strip_suffix("/README.md") {
        p = format!("{dir}/");
    }

    if p.starts_with("_images") {
        p.insert(0, '_');
    }

    if let Some(rest) = p.strip_prefix("/docs/") {
        p = format!("/{rest}");
    } else if let Some(rest) = p.strip_prefix("./docs/").or_else(|| p.strip_prefix("docs/")) {
        p = rest.to_string();
    }

    if let Some(stem) = p.strip_suffix(".md") {
        p = stem.to_string();
    }

    if p.is_empty() {
        return "./".to_string();
    }

    p.to_lowercase()
}

// ---------------------------------------------------------------------------
// Pass 4: HTML comments
// ---------------------------------------------------------------------------

/// Remove `<!-- ... -->` blocks, innermost first, until none are left.
///
/// Concatenated sources can produce textually nested markers; removing the
/// innermost pair first means the outer pair is removed on a later step
/// instead of leaving a dangling `-->` behind.
pub fn strip_html_comments(text: &str) -> String {
    let mut result = text.to_string();
    let mut search_from = 0;

    while let Some(offset) = result[search_from..].find("-->") {
        let close = search_from + offset;
        match result[..close].rfind("<!--") {
            Some(open) => {
                result.replace_range(open..close + 3, "");
                search_from = open;
            }
            None => search_from = close + 3,
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Pass 5: MDX escaping
// ---------------------------------------------------------------------------

/// Escape sequences the MDX renderer would misread as syntax.
pub fn escape_mdx(text: &str) -> String {
    static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})>").expect("valid regex")
    });
    static ANGLE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<([^<>\n]*[@!][^<>\n]*)>").expect("valid regex"));

    let result = text.replace("**@param", r"**\@param");
    let result = EMAIL_RE.replace_all(&result, "&lt;${1}&gt;");
    ANGLE_RE
        .replace_all(&result, |caps: &Captures| {
            // Tags emitted by `wrap_video_links` stay intact.
            if caps[1].starts_with("video ") {
                return caps[0].to_string();
            }
            format!("&lt;{}&gt;", &caps[1])
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
