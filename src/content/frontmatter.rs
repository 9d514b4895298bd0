//! Front-matter parsing
//!
//! A post starts with a block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Hello"
//! date: 2024-01-15
//! excerpt: A short summary
//! tags: [rust, 'systems']
//! ---
//! Body text...
//! ```
//!
//! The block is read line by line. Content that does not open with a fence,
//! or never closes it, carries no metadata and is reported as
//! [`Parsed::NoFrontMatter`].

use super::{Post, PostMeta};

/// Fence line delimiting the metadata block
const FENCE: &str = "---";

/// Reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Outcome of parsing a content file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A metadata block was found
    Post(Post),
    /// The content has no (closed) metadata block at its very start
    NoFrontMatter,
}

impl Parsed {
    pub fn into_post(self) -> Option<Post> {
        match self {
            Parsed::Post(post) => Some(post),
            Parsed::NoFrontMatter => None,
        }
    }
}

/// Raw key/value pairs of a metadata block, in source order
#[derive(Debug, Default)]
struct FrontMatterBlock<'a> {
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> FrontMatterBlock<'a> {
    fn from_lines(lines: &[&'a str]) -> Self {
        let fields = lines
            .iter()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key, value.trim()))
            })
            .collect();
        Self { fields }
    }

    /// First non-empty value for `key`, unquoted
    fn get(&self, key: &str) -> Option<&'a str> {
        self.raw(key).map(strip_quotes).filter(|v| !v.is_empty())
    }

    fn raw(&self, key: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|(k, v)| *k == key && !v.is_empty())
            .map(|(_, v)| *v)
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// `tags: [a, b]` wins over `tag: a, b`
    fn tags(&self) -> Vec<String> {
        let list = self
            .raw("tags")
            .and_then(|v| v.strip_prefix('['))
            .and_then(|v| v.split_once(']'))
            .map(|(inner, _)| inner);

        let raw = match list.or_else(|| self.raw("tag")) {
            Some(raw) => raw,
            None => return Vec::new(),
        };

        raw.split(',')
            .map(|t| t.trim().replace(['"', '\''], ""))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Strip one surrounding quote character from each end
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    value.trim()
}

/// Split `content` into the metadata lines and the body that follows
fn split_block(content: &str) -> Option<(Vec<&str>, &str)> {
    let mut offset = 0;
    let mut block = Vec::new();
    let mut opened = false;

    for raw_line in content.split_inclusive('\n') {
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if !opened {
            if line != FENCE {
                return None;
            }
            opened = true;
            continue;
        }

        if line == FENCE {
            return Some((block, &content[offset..]));
        }
        block.push(line);
    }

    None
}

/// Parse the metadata block of `content`; `slug` becomes the post identifier
pub fn parse_frontmatter(content: &str, slug: &str) -> Parsed {
    let Some((lines, body)) = split_block(content) else {
        return Parsed::NoFrontMatter;
    };

    let block = FrontMatterBlock::from_lines(&lines);
    let excerpt = block
        .get("excerpt")
        .or_else(|| block.get("description"))
        .unwrap_or_default()
        .to_string();

    Parsed::Post(Post {
        meta: PostMeta {
            slug: slug.to_string(),
            title: block.text("title"),
            date: block.text("date"),
            excerpt,
            tags: block.tags(),
            reading_time: calculate_reading_time(body),
        },
        body: body.to_string(),
    })
}

/// Estimated minutes to read `body`, never less than one
pub fn calculate_reading_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}
