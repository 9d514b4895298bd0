//! Site data model - the JSON document describing profile, projects and work

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Post summary carried inside the site-data blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Film {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letterboxd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

/// Everything the home page shows
///
/// Every field is optional on the wire; missing or `null` values fall back
/// to empty defaults so a partial document still renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteData {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub about: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite_films: Vec<Film>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub blog_posts: Vec<BlogPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub social_links: SocialLinks,
}

impl SiteData {
    /// Give every blog post a body, synthesized from its title and excerpt
    pub fn fill_defaults(mut self) -> Self {
        for post in &mut self.blog_posts {
            if post.content.as_deref().map_or(true, str::is_empty) {
                post.content = Some(format!("# {}\n\n{}", post.title, post.excerpt));
            }
        }
        self
    }

    /// Blog post summary by slug
    pub fn blog_post(&self, slug: &str) -> Option<&BlogPost> {
        self.blog_posts.iter().find(|p| p.slug == slug)
    }
}

/// Static record served when the remote document is unreachable and nothing
/// has been cached yet
pub fn fallback_site_data() -> SiteData {
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn film(title: &str, director: &str) -> Film {
        Film {
            title: title.to_string(),
            director: Some(director.to_string()),
        }
    }

    fn project(id: &str, title: &str, description: &str, tags: &[&str], github: &str) -> Project {
        Project {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tags: strings(tags),
            github_url: Some(github.to_string()),
            demo_url: None,
        }
    }

    fn job(title: &str, company: &str, period: &str, description: &str, tags: &[&str]) -> WorkExperience {
        WorkExperience {
            title: title.to_string(),
            company: company.to_string(),
            period: period.to_string(),
            description: description.to_string(),
            tags: strings(tags),
        }
    }

    SiteData {
        name: "Nima".to_string(),
        tagline: "Rust programmer. Low-level compute enthusiast. A curious George living in Berlin."
            .to_string(),
        about: strings(&[
            "I write low-level Rust and occasionally look up to remember why. Low-level computing resonates with my curiosity to understand how things truly work. I like knowing what's underneath, how it moves, and how I can build something real from it. I love creating. It's the one thing that always makes sense to me. I think about film and philosophy more than I talk about them. They shape how I see the world, and I try to let that shape my work too.",
        ]),
        languages: Vec::new(),
        technologies: Vec::new(),
        interests: strings(&["cinema", "virtual machines", "blockchains", "philosophy"]),
        favorite_films: vec![
            film("Stalker", "Andrei Tarkovsky"),
            film("Dogville", "Lars von Trier"),
            film("Dune: Part Two", "Denis Villeneuve"),
            film("Birds", "Alfred Hitchcock"),
        ],
        projects: vec![
            project(
                "liquity-ir",
                "Liquity Autonomous IR Manager",
                "An immutable and trustless autonomous interest rate management protocol for Liquity V2.",
                &["defi", "rust"],
                "https://github.com/liquity/bold-ir-management",
            ),
            project(
                "DAB",
                "DAB",
                "Collection of on-chain data registries for tokens on the Internet Computer Protocol.",
                &["infra", "rust"],
                "https://github.com/psychedelic/dab",
            ),
            project(
                "NFA",
                "Non-Fungible Apps",
                "Trustless onchain access to web3 frontends.",
                &["solidity", "infra"],
                "https://github.com/fleekxyz/non-fungible-apps",
            ),
        ],
        work_experience: vec![
            job(
                "EIR",
                "Code & State",
                "2025 - Present",
                "Building a probabilistic privacy solution for Ethereum.",
                &["rust", "blockchain", "infra"],
            ),
            job(
                "Technology Lead",
                "Code & State",
                "2024 - 2025",
                "Built an autonomous rate adjustment mechanism for Liquity V2 (contractor).",
                &["rust", "blockchain", "defi"],
            ),
            job(
                "Security Researcher",
                "Solidstate (Contractor)",
                "2023 - Present",
                "Auditing smart contracts.",
                &["security", "rust"],
            ),
            job(
                "Software Engineer",
                "Fleek",
                "2021 - 2024",
                "Built Rust infrastructure tools and WASM-compiled smart contracts.",
                &["rust", "blockchain", "infra"],
            ),
        ],
        blog_posts: Vec::new(),
        location: None,
        social_links: SocialLinks {
            github: Some("https://github.com/EmperorOrokuSaki".to_string()),
            twitter: Some("https://twitter.com/0xNimaRa".to_string()),
            linkedin: Some("https://www.linkedin.com/in/nima-rasooli/".to_string()),
            email: Some("mailto:me@nimara.xyz".to_string()),
            letterboxd: Some("https://letterboxd.com/nimara/".to_string()),
            telegram: Some("https://t.me/Emperororokusaki".to_string()),
        },
    }
}
