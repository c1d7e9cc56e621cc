use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::effects::ImageContent;
use crate::error::{Result, SiteError};
use crate::form::FormContent;
use crate::nav::NavLink;
use crate::typing::TypingTimings;

static CONTENT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/content");

pub const DEFAULT_CONTENT: &str = "site.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroContent {
    /// text before the typed word, e.g. "Secure your"
    pub lead: String,
    pub words: Vec<String>,
    #[serde(default)]
    pub tagline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    #[serde(default)]
    pub blurb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Text { body: String },
    Stats { counters: Vec<String> },
    Video { caption: String },
    Gallery { images: Vec<ImageContent> },
    Services { offers: Vec<Offer> },
    Testimonials { items: Vec<Testimonial> },
    Contact { form: FormContent },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    pub id: String,
    pub title: String,
    /// fade the section in the first time it scrolls into view
    #[serde(default)]
    pub reveal: bool,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Everything the page shows, loaded from a JSON content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    pub title: String,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    pub hero: Option<HeroContent>,
    #[serde(default)]
    pub typing: TypingTimings,
    #[serde(default)]
    pub sections: Vec<SectionContent>,
}

impl SiteContent {
    /// Content bundled with the binary.
    pub fn embedded() -> Result<Self> {
        Self::embedded_file(DEFAULT_CONTENT)
    }

    pub fn embedded_file(name: &str) -> Result<Self> {
        let file = CONTENT_DIR
            .get_file(name)
            .ok_or_else(|| SiteError::MissingContent(name.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| SiteError::MissingContent(name.to_string()))?;
        Self::from_json(text)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn section(&self, id: &str) -> Option<&SectionContent> {
        self.sections.iter().find(|s| s.id == id)
    }
}
