//! Remote data - the site-data JSON blob and the ASCII art banner

mod client;
mod site_data;

pub use client::{optimize_ascii, AsciiClient, FetchError, SiteDataCheck, SiteDataClient};
pub use site_data::{
    fallback_site_data, BlogPost, Film, Project, SiteData, SocialLinks, WorkExperience,
};
