//! Scaffold a new post

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::content::slugify;
use crate::Site;

/// Front-matter skeleton for a fresh post
fn scaffold(title: &str, date: NaiveDate, tags: &[String]) -> String {
    format!(
        "---\ntitle: \"{}\"\ndate: {}\nexcerpt: \"\"\ntags: [{}]\n---\n\n",
        title.replace('"', "'"),
        date.format("%Y-%m-%d"),
        tags.join(", ")
    )
}

/// Create `<date>-<slug>.md` in the posts directory
pub fn create_post(site: &Site, title: &str, tags: &[String], date: NaiveDate) -> Result<PathBuf> {
    let slug = slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    fs::create_dir_all(&site.posts_dir)?;

    let file_path = site
        .posts_dir
        .join(format!("{}-{}.md", date.format("%Y-%m-%d"), slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(title, date, tags))?;
    tracing::debug!("Created post {} at {:?}", slug, file_path);

    Ok(file_path)
}

/// Run the new command with today's date
pub fn run(site: &Site, title: &str, tags: &[String]) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let file_path = create_post(site, title, tags, today)?;
    println!("Created: {:?}", file_path);
    Ok(())
}
