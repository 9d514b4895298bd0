//! Generator module - RSS feed, sitemap and post index derived from the posts

use anyhow::Result;
use std::fs;

use crate::config::SiteConfig;
use crate::content::PostMeta;
use crate::helpers::{date_rfc2822, date_xml, escape_xml};
use crate::Site;

/// Path of a writing page relative to the site root
pub fn post_path(slug: &str) -> String {
    format!("/writings/{}", slug)
}

/// Writes the derived feeds into the public directory
pub struct Generator {
    site: Site,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Generate every feed for `posts` (expected newest first)
    pub fn generate(&self, posts: &[PostMeta]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        let feed = rss_feed(&self.site.config, posts);
        fs::write(self.site.public_dir.join("feed.xml"), feed)?;
        tracing::info!("Generated feed.xml");

        let map = sitemap(&self.site.config, posts);
        fs::write(self.site.public_dir.join("sitemap.xml"), map)?;
        tracing::info!("Generated sitemap.xml");

        let index = serde_json::to_string_pretty(posts)?;
        fs::write(self.site.public_dir.join("posts.json"), index)?;
        tracing::info!("Generated posts.json");

        Ok(())
    }
}

/// RSS 2.0 feed of the given posts
pub fn rss_feed(config: &SiteConfig, posts: &[PostMeta]) -> String {
    let site_url = config.full_url("");
    let limit = if config.feed_limit == 0 {
        posts.len()
    } else {
        config.feed_limit
    };

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:dc="http://purl.org/dc/elements/1.1/">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&site_url)));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&config.full_url("/feed.xml"))
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.language)
    ));

    for post in posts.iter().take(limit) {
        let link = escape_xml(&config.full_url(&post_path(&post.slug)));

        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            escape_xml(&post.excerpt)
        ));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", link));
        feed.push_str(&format!(
            "      <dc:creator>{}</dc:creator>\n",
            escape_xml(&config.author)
        ));
        if let Some(date) = post.published() {
            feed.push_str(&format!("      <pubDate>{}</pubDate>\n", date_rfc2822(&date)));
        }
        for tag in &post.tags {
            feed.push_str(&format!("      <category>{}</category>\n", escape_xml(tag)));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}

/// Sitemap listing the home page, the writings index and every post
pub fn sitemap(config: &SiteConfig, posts: &[PostMeta]) -> String {
    let mut map = String::new();
    map.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    map.push('\n');
    map.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    map.push('\n');

    push_url(&mut map, &config.full_url(""), None, "weekly", "1.0");
    push_url(&mut map, &config.full_url("/writings"), None, "weekly", "0.8");
    for post in posts {
        let lastmod = post.published().map(|d| date_xml(&d));
        push_url(
            &mut map,
            &config.full_url(&post_path(&post.slug)),
            lastmod.as_deref(),
            "monthly",
            "0.6",
        );
    }

    map.push_str("</urlset>\n");
    map
}

fn push_url(map: &mut String, loc: &str, lastmod: Option<&str>, changefreq: &str, priority: &str) {
    map.push_str("  <url>\n");
    map.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    if let Some(lastmod) = lastmod {
        map.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    }
    map.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    map.push_str(&format!("    <priority>{}</priority>\n", priority));
    map.push_str("  </url>\n");
}
