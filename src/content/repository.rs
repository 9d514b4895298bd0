//! Post repository - lists and loads markdown posts from a directory

use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{parse_frontmatter, slug_from_filename, Adjacent, Post, PostMeta};

/// Errors raised while reading the content directory
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

impl ContentError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::InvalidData {
            ContentError::NotUtf8 {
                path: path.to_path_buf(),
            }
        } else {
            ContentError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// A markdown file in the posts directory
#[derive(Debug, Clone)]
struct PostFile {
    path: PathBuf,
    slug: String,
}

/// Reads posts from a flat directory of `*.md` files
///
/// Nothing is cached: every call goes back to the filesystem.
#[derive(Debug, Clone)]
pub struct PostRepository {
    dir: PathBuf,
}

impl PostRepository {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slugs of every markdown file, in directory enumeration order
    pub fn list_slugs(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.files()?.into_iter().map(|f| f.slug).collect())
    }

    /// Metadata of every post with a front-matter block, newest first
    ///
    /// Posts whose date does not parse sort after all dated posts; ties are
    /// broken by slug.
    pub fn get_all(&self) -> Result<Vec<PostMeta>, ContentError> {
        let mut posts = Vec::new();

        for file in self.files()? {
            match load_file(&file) {
                Ok(Some(post)) => posts.push(post.meta),
                Ok(None) => {
                    tracing::debug!("Skipping {:?}: no front-matter", file.path);
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", file.path, e);
                }
            }
        }

        posts.sort_by_cached_key(|p| (Reverse(p.published()), p.slug.clone()));
        Ok(posts)
    }

    /// Load one post by slug
    ///
    /// `slug.md` is tried first, then every other file whose normalized name
    /// equals `slug`. Files without front-matter never match.
    pub fn get_one(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if slug.is_empty() || slug.contains(['/', '\\']) || slug.contains("..") {
            return Ok(None);
        }

        let exact = self.dir.join(format!("{}.md", slug));
        if exact.is_file() {
            let file = PostFile {
                slug: slug_from_filename(&format!("{}.md", slug)),
                path: exact.clone(),
            };
            if let Some(post) = load_file(&file)? {
                return Ok(Some(post));
            }
        }

        for file in self.files()? {
            if file.slug != slug || file.path == exact {
                continue;
            }
            if let Some(post) = load_file(&file)? {
                return Ok(Some(post));
            }
        }
        Ok(None)
    }

    /// Previous (older) and next (newer) posts around `slug`
    pub fn adjacent(&self, slug: &str) -> Result<Adjacent, ContentError> {
        Ok(Adjacent::find(&self.get_all()?, slug))
    }

    fn files(&self) -> Result<Vec<PostFile>, ContentError> {
        if !self.dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", self.dir);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                ContentError::io(&path, e.into())
            })?;

            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(PostFile {
                    slug: slug_from_filename(name),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(files)
    }
}

fn load_file(file: &PostFile) -> Result<Option<Post>, ContentError> {
    let content = fs::read_to_string(&file.path).map_err(|e| ContentError::io(&file.path, e))?;
    Ok(parse_frontmatter(&content, &file.slug).into_post())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
