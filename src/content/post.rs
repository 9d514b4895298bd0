//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::parse_date_string;

/// Summary of one writing, as listed on index pages and feeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// Identifier derived from the file name
    pub slug: String,

    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    pub excerpt: String,

    /// Tags in source order
    pub tags: Vec<String>,

    /// Estimated minutes to read the body
    pub reading_time: u32,
}

impl PostMeta {
    /// Publication date, if the front-matter value parses
    pub fn published(&self) -> Option<DateTime<Utc>> {
        parse_date_string(&self.date)
    }
}

/// A loaded post: metadata plus the markdown body following it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub meta: PostMeta,
    pub body: String,
}

/// One table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Rendered body of a post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPost {
    pub content_html: String,
    pub toc: Vec<TocEntry>,
}

/// Link to a neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostLink {
    pub slug: String,
    pub title: String,
}

impl From<&PostMeta> for PostLink {
    fn from(meta: &PostMeta) -> Self {
        Self {
            slug: meta.slug.clone(),
            title: meta.title.clone(),
        }
    }
}

/// Neighbours of a post in date-descending order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacent {
    /// The next older post
    pub prev: Option<PostLink>,
    /// The next newer post
    pub next: Option<PostLink>,
}

impl Adjacent {
    /// Find the neighbours of `slug` in a list sorted newest first
    pub fn find(posts: &[PostMeta], slug: &str) -> Self {
        let Some(pos) = posts.iter().position(|p| p.slug == slug) else {
            return Self::default();
        };

        Self {
            prev: posts.get(pos + 1).map(PostLink::from),
            next: pos.checked_sub(1).map(|i| PostLink::from(&posts[i])),
        }
    }
}

/// Everything a writing page needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    #[serde(flatten)]
    pub meta: PostMeta,
    pub toc: Vec<TocEntry>,
    pub content_html: String,
    pub prev_post: Option<PostLink>,
    pub next_post: Option<PostLink>,
}

impl PostPage {
    pub fn new(meta: PostMeta, rendered: RenderedPost, adjacent: Adjacent) -> Self {
        Self {
            meta,
            toc: rendered.toc,
            content_html: rendered.content_html,
            prev_post: adjacent.prev,
            next_post: adjacent.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str, date: &str) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: date.to_string(),
            excerpt: String::new(),
            tags: Vec::new(),
            reading_time: 1,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(meta("a", "2024-01-01")).unwrap();
        assert_eq!(json["readingTime"], 1);
        assert!(json.get("reading_time").is_none());
    }

    #[test]
    fn test_adjacent() {
        let posts = vec![
            meta("newest", "2023-05-15"),
            meta("middle", "2023-03-22"),
            meta("oldest", "2023-01-10"),
        ];

        let adj = Adjacent::find(&posts, "middle");
        assert_eq!(adj.prev.unwrap().slug, "oldest");
        assert_eq!(adj.next.unwrap().slug, "newest");

        let adj = Adjacent::find(&posts, "newest");
        assert_eq!(adj.next, None);
        assert_eq!(adj.prev.unwrap().title, "MIDDLE");

        let adj = Adjacent::find(&posts, "oldest");
        assert_eq!(adj.prev, None);

        assert_eq!(Adjacent::find(&posts, "missing"), Adjacent::default());
    }

    #[test]
    fn test_post_page_json_shape() {
        let page = PostPage::new(
            meta("a", "2024-01-01"),
            RenderedPost {
                content_html: "<p>x</p>".to_string(),
                toc: vec![],
            },
            Adjacent::default(),
        );
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["slug"], "a");
        assert_eq!(json["contentHtml"], "<p>x</p>");
        assert!(json["prevPost"].is_null());
        assert!(json["nextPost"].is_null());
    }
}
