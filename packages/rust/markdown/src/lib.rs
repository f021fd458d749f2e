//! Markdown rewriting for the documentation site.
//!
//! Turns a document from the core repository into a site page:
//! 1. Maps its source path to a site path ([`paths`])
//! 2. Runs the text passes ([`transform`])
//! 3. Derives front matter from its heading ([`frontmatter`])
//!
//! Everything here is pure string processing; reading and writing files is
//! left to the caller.

pub mod compat;
pub mod frontmatter;
pub mod paths;
pub mod transform;

use tracing::{debug, instrument};

use docsite_shared::Result;

pub use frontmatter::{
    FrontMatter, FrontMatterResult, OVERVIEW, generate_front_matter, landing_front_matter,
    render_document, version_slug,
};
pub use paths::{
    FileMetadata, generate_file_metadata, rewrite_numbered_file_links, strip_numeric_prefix,
};
pub use transform::{
    escape_mdx, fix_image_paths, process_content_links, rewrite_link_target, strip_html_comments,
    transform_content, wrap_video_links,
};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A source document ready to be written into the site.
#[derive(Debug, Clone)]
pub struct TransformedDocument {
    /// Path relative to the version directory.
    pub path: String,
    /// Generated front matter.
    pub front: FrontMatter,
    /// Rewritten body, heading removed.
    pub body: String,
}

impl TransformedDocument {
    /// Full file content: front matter followed by the body.
    pub fn render(&self) -> String {
        render_document(&self.front, &self.body)
    }
}

// ---------------------------------------------------------------------------
// Document conversion
// ---------------------------------------------------------------------------

/// Convert one docs page for `version`.
///
/// `source` is relative to the core repository's `docs/` directory.
/// Fails when the document has no heading.
#[instrument(skip(content))]
pub fn transform_document(source: &str, content: &str, version: &str) -> Result<TransformedDocument> {
    let meta = generate_file_metadata(source);
    let body = transform_content(content);
    let fm = generate_front_matter(&body, source, &meta.newfile, version)?;

    debug!(dest = %meta.newfile, title = %fm.front.title, collapsed = meta.collapsed, "document transformed");

    Ok(TransformedDocument {
        path: meta.newfile,
        front: fm.front,
        body: fm.content_without_heading,
    })
}

/// Convert a page that is placed at `dest` verbatim (landing page, community
/// files, examples). Its title always comes from its heading.
pub fn transform_page(
    source: &str,
    dest: &str,
    content: &str,
    version: &str,
) -> Result<TransformedDocument> {
    let body = transform_content(content);
    let fm = generate_front_matter(&body, source, dest, version)?;

    Ok(TransformedDocument {
        path: dest.to_string(),
        front: fm.front,
        body: fm.content_without_heading,
    })
}

/// Convert the core repository's root `README.md` into a version landing page.
pub fn transform_landing_page(content: &str, version: &str) -> Result<TransformedDocument> {
    let body = transform_content(content);
    let fm = landing_front_matter(&body, version)?;

    Ok(TransformedDocument {
        path: "index.md".to_string(),
        front: fm.front,
        body: fm.content_without_heading,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_guide_readme_maps_to_index() {
        assert_eq!(
            generate_file_metadata("010_user-guide/README.md").newfile,
            "user-guide/index.md"
        );
    }

    #[test]
    fn transform_document_maps_path_and_front_matter() {
        let content = "# User Guide\n\nRead the [CLI docs](./020_pepr-cli.md).\n";
        let doc = transform_document("010_user-guide/README.md", content, "v0.54.2").unwrap();

        assert_eq!(doc.path, "user-guide/index.md");
        assert_eq!(doc.front.title, "Overview");
        assert_eq!(doc.front.slug.as_deref(), Some("v0.54/user-guide"));
        assert!(doc.body.contains("[CLI docs](./pepr-cli)"));
        assert!(!doc.body.contains("# User Guide"));

        let rendered = doc.render();
        assert!(rendered.starts_with("---\ntitle: \"Overview\"\n"));
        assert!(rendered.ends_with("Read the [CLI docs](./pepr-cli).\n"));
    }

    #[test]
    fn comment_before_heading_is_ignored_for_title() {
        let content = "<!-- # Draft title -->\n# Real Title\n\nText\n";
        let doc = transform_document("030_reference/module.md", content, "latest").unwrap();
        assert_eq!(doc.front.title, "Real Title");
    }

    #[test]
    fn transform_document_requires_heading() {
        let err = transform_document("010_user-guide/intro.md", "no heading", "latest").unwrap_err();
        assert!(err.to_string().contains("010_user-guide/intro.md"));
    }

    #[test]
    fn landing_page_keeps_heading_title() {
        let doc = transform_landing_page("# Pepr\n\nSee [docs](docs/README.md).\n", "latest").unwrap();
        assert_eq!(doc.path, "index.md");
        assert_eq!(doc.front.title, "Pepr");
        assert!(doc.body.contains("[docs](./)"));
    }

    #[test]
    fn community_page_is_placed_verbatim() {
        let doc = transform_page(
            "CODE_OF_CONDUCT.md",
            "community/code-of-conduct.md",
            "# Code of Conduct\n\nBe kind.\n",
            "v0.54.2",
        )
        .unwrap();
        assert_eq!(doc.path, "community/code-of-conduct.md");
        assert_eq!(doc.front.title, "Code of Conduct");
        assert_eq!(doc.front.slug.as_deref(), Some("v0.54/community/code-of-conduct"));
    }
}
