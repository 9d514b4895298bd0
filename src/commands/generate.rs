//! Generate the feeds and the post index

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Load every post and write the derived files
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = site.repository().get_all()?;
    tracing::info!("Loaded {} posts from {:?}", posts.len(), site.posts_dir);

    Generator::new(site).generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_from_posts_dir() {
        let temp = TempDir::new().unwrap();
        let site = Site::with_config(temp.path(), SiteConfig::default());
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(
            site.posts_dir.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-15\n---\nBody",
        )
        .unwrap();
        fs::write(site.posts_dir.join("notes.md"), "no metadata here").unwrap();

        run(&site).unwrap();

        let feed = fs::read_to_string(site.public_dir.join("feed.xml")).unwrap();
        assert_eq!(feed.matches("<item>").count(), 1);
        assert!(feed.contains("<title>Hello</title>"));
    }

    #[test]
    fn test_generate_without_posts() {
        let temp = TempDir::new().unwrap();
        let site = Site::with_config(temp.path(), SiteConfig::default());

        run(&site).unwrap();

        let index = fs::read_to_string(site.public_dir.join("posts.json")).unwrap();
        assert_eq!(index, "[]");
    }
}
