//! Content module - front-matter parsing, post loading and markdown rendering

mod frontmatter;
mod markdown;
mod post;
pub mod repository;
mod slugs;

pub use frontmatter::{calculate_reading_time, parse_frontmatter, Parsed, WORDS_PER_MINUTE};
pub use markdown::{extract_toc, heading_id, MarkdownRenderer, DEFAULT_THEME};
pub use post::{Adjacent, Post, PostLink, PostMeta, PostPage, RenderedPost, TocEntry};
pub use repository::{ContentError, PostRepository};
pub use slugs::{slug_from_filename, slugify};
