//! Front-matter synthesis.
//!
//! Titles come from the first heading of a document, which is then removed
//! from the body so the site does not render it twice.

use std::sync::LazyLock;

use regex::Regex;

use docsite_shared::{DocsiteError, Result, VERSION_LATEST};

/// Label used for section index pages.
pub const OVERVIEW: &str = "Overview";

/// Metadata block prefixed to every generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub slug: Option<String>,
    pub sidebar_label: Option<String>,
}

impl FrontMatter {
    /// Render as a `---` delimited YAML block, ending with a newline.
    pub fn render(&self) -> String {
        let mut fm = String::from("---\n");
        fm.push_str(&format!("title: \"{}\"\n", escape_yaml_string(&self.title)));
        fm.push_str(&format!(
            "description: \"{}\"\n",
            escape_yaml_string(&self.description)
        ));
        if let Some(slug) = &self.slug {
            fm.push_str(&format!("slug: \"{}\"\n", escape_yaml_string(slug)));
        }
        if let Some(label) = &self.sidebar_label {
            fm.push_str("sidebar:\n");
            fm.push_str(&format!("  label: \"{}\"\n", escape_yaml_string(label)));
        }
        fm.push_str("---\n");
        fm
    }
}

/// Front matter plus the body with its heading removed.
#[derive(Debug, Clone)]
pub struct FrontMatterResult {
    pub front: FrontMatter,
    pub content_without_heading: String,
}

/// Build front matter for a docs page.
///
/// `source` is the path inside the core `docs/` directory and `dest` the
/// mapped site path. A `README.md` that became an `index.md` is a section
/// overview: its title is forced to `Overview` and the sidebar label is set.
/// Pages collapsed out of single-file directories keep their heading.
pub fn generate_front_matter(
    content: &str,
    source: &str,
    dest: &str,
    version: &str,
) -> Result<FrontMatterResult> {
    let overview = basename(source) == "README.md" && basename(dest) == "index.md";
    build(content, source, dest, version, overview)
}

/// Build front matter for a version's landing page, titled by its heading.
pub fn landing_front_matter(content: &str, version: &str) -> Result<FrontMatterResult> {
    build(content, "README.md", "index.md", version, false)
}

/// Join a front-matter block and a body.
pub fn render_document(front: &FrontMatter, body: &str) -> String {
    format!(
        "{}\n{}",
        front.render(),
        body.trim_start_matches(['\r', '\n'])
    )
}

/// `v<major>.<minor>[/<path>]` for versioned pages, `None` for `latest`.
pub fn version_slug(dest: &str, version: &str) -> Option<String> {
    if version == VERSION_LATEST {
        return None;
    }

    let path = dest.strip_suffix(".md").unwrap_or(dest);
    let path = if path == "index" {
        ""
    } else {
        path.strip_suffix("/index").unwrap_or(path)
    };

    let slug = format!("{}/{}", docsite_versions::version_dir(version), path);
    Some(slug.trim_matches('/').to_string())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build(
    content: &str,
    source: &str,
    dest: &str,
    version: &str,
    overview: bool,
) -> Result<FrontMatterResult> {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+(.+)$").expect("valid regex"));

    let caps = HEADING_RE
        .captures(content)
        .ok_or_else(|| DocsiteError::MissingHeading {
            path: source.to_string(),
        })?;
    let heading_line = &caps[0];
    let heading_title = clean_title(&caps[1]);

    let title = if overview {
        OVERVIEW.to_string()
    } else {
        heading_title
    };

    let front = FrontMatter {
        description: title.clone(),
        title,
        slug: version_slug(dest, version),
        sidebar_label: overview.then(|| OVERVIEW.to_string()),
    };

    Ok(FrontMatterResult {
        front,
        content_without_heading: content.replacen(heading_line, "", 1),
    })
}

/// Heading text without backticks or colons.
fn clean_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '`' && *c != ':')
        .collect::<String>()
        .trim()
        .to_string()
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Escape special characters in a YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_is_overview_with_sidebar_label() {
        let content = "# Pepr User Guide\n\nIntro.\n\n## Details\n";
        let result =
            generate_front_matter(content, "010_user-guide/README.md", "user-guide/index.md", "latest")
                .unwrap();

        assert_eq!(result.front.title, "Overview");
        assert_eq!(result.front.description, "Overview");
        assert_eq!(result.front.sidebar_label.as_deref(), Some("Overview"));
        assert_eq!(result.front.slug, None);
        assert_eq!(result.content_without_heading, "\n\nIntro.\n\n## Details\n");
    }

    #[test]
    fn title_strips_backticks_and_colons() {
        let content = "# `npx pepr init`: scaffold\n\nBody\n";
        let result =
            generate_front_matter(content, "010_user-guide/init.md", "user-guide/init.md", "latest")
                .unwrap();
        assert_eq!(result.front.title, "npx pepr init scaffold");
        assert_eq!(result.front.description, result.front.title);
        assert_eq!(result.front.sidebar_label, None);
    }

    #[test]
    fn heading_removed_exactly_once() {
        let content = "# Repeat\n\nText\n\n# Repeat\n";
        let result = generate_front_matter(content, "a.md", "a.md", "latest").unwrap();
        assert_eq!(result.content_without_heading, "\n\nText\n\n# Repeat\n");
    }

    #[test]
    fn collapsed_readme_keeps_heading_title() {
        let content = "# Best Practices\n\nBody\n";
        let result = generate_front_matter(
            content,
            "050_best-practices/README.md",
            "reference/best-practices.md",
            "latest",
        )
        .unwrap();
        assert_eq!(result.front.title, "Best Practices");
        assert_eq!(result.front.sidebar_label, None);
    }

    #[test]
    fn missing_heading_is_an_error() {
        let err = generate_front_matter("no heading here\n", "x/README.md", "x/index.md", "latest")
            .unwrap_err();
        assert!(matches!(err, DocsiteError::MissingHeading { .. }));
        assert!(err.to_string().contains("x/README.md"));
    }

    #[test]
    fn slugs_for_versioned_pages() {
        assert_eq!(version_slug("user-guide/index.md", "latest"), None);
        assert_eq!(
            version_slug("user-guide/index.md", "v0.54.2").as_deref(),
            Some("v0.54/user-guide")
        );
        assert_eq!(version_slug("index.md", "v0.54.2").as_deref(), Some("v0.54"));
        assert_eq!(
            version_slug("reference/best-practices.md", "v1.2.0-rc.1").as_deref(),
            Some("v1.2/reference/best-practices")
        );
    }

    #[test]
    fn render_emits_yaml_block() {
        let content = "# Guide\n\nBody\n";
        let result =
            generate_front_matter(content, "010_guide/README.md", "guide/index.md", "v0.54.2")
                .unwrap();
        let doc = render_document(&result.front, &result.content_without_heading);
        assert_eq!(
            doc,
            "---\ntitle: \"Overview\"\ndescription: \"Overview\"\nslug: \"v0.54/guide\"\nsidebar:\n  label: \"Overview\"\n---\n\nBody\n"
        );
    }

    #[test]
    fn landing_page_uses_heading() {
        let result = landing_front_matter("# Pepr\n\nWelcome\n", "latest").unwrap();
        assert_eq!(result.front.title, "Pepr");
        assert_eq!(result.front.sidebar_label, None);
    }

    #[test]
    fn quotes_are_escaped() {
        let front = FrontMatter {
            title: r#"Say "hi""#.into(),
            description: r#"Say "hi""#.into(),
            slug: None,
            sidebar_label: None,
        };
        assert!(front.render().contains(r#"title: "Say \"hi\"""#));
    }
}
