//! Render a single post to stdout

use anyhow::Result;

use crate::content::PostPage;
use crate::Site;

/// Load, render and link `slug` into a full page
pub fn page(site: &Site, slug: &str) -> Result<PostPage> {
    let repository = site.repository();
    let Some(post) = repository.get_one(slug)? else {
        anyhow::bail!("Post not found: {}", slug);
    };

    let adjacent = repository.adjacent(&post.meta.slug)?;
    let rendered = site.renderer().render(&post.body);
    Ok(PostPage::new(post.meta, rendered, adjacent))
}

/// Print the post HTML, or its table of contents as JSON
pub fn run(site: &Site, slug: &str, toc: bool) -> Result<()> {
    let page = page(site, slug)?;
    if toc {
        println!("{}", serde_json::to_string_pretty(&page.toc)?);
    } else {
        println!("{}", page.content_html);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_page() {
        let temp = TempDir::new().unwrap();
        let site = Site::with_config(temp.path(), SiteConfig::default());
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(
            site.posts_dir.join("2024-01-01-guide.md"),
            "---\ntitle: Guide\ndate: 2024-01-01\n---\n## Setup\n### Install\ntext\n",
        )
        .unwrap();

        let page = page(&site, "guide").unwrap();
        assert_eq!(page.meta.title, "Guide");
        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "install"]);
        assert!(page.content_html.contains(r#"<h3 id="install">"#));

        assert!(run(&site, "missing", false).is_err());
    }
}
