//! Image source: turns a manifest, probe results or generated placeholders
//! into the ordered list handed to [`GalleryState::load`].
//!
//! [`GalleryState::load`]: crate::gallery::GalleryState::load

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::ProbeConfig;
use crate::model::Image;

pub const CATEGORIES: [&str; 3] = ["portrait", "animals", "general"];

const PLACEHOLDER_HOST: &str = "https://via.placeholder.com";
const PLACEHOLDER_WIDTH: u32 = 400;
const PLACEHOLDER_HEIGHTS: [u32; 10] = [300, 400, 500, 600, 700, 800, 350, 450, 550, 650];
const PLACEHOLDER_COLOURS: [&str; 8] = [
    "00ffff", "ff00ff", "00ff41", "0080ff", "ff4500", "ffd700", "ff1493", "00ced1",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid placeholder url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub file_name: String,
}

/// URLs the shell should test for existence, grouped the way the catalog
/// reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbePlan {
    /// `img{n}.{ext}` per number, extensions in preference order.
    numbered: Vec<(u32, Vec<Candidate>)>,
    /// `{name}.{ext}` per common name.
    named: Vec<(String, Vec<Candidate>)>,
}

impl ProbePlan {
    #[must_use]
    pub fn new(config: &ProbeConfig) -> Self {
        let base = config.base_path.trim_end_matches('/');
        let candidates = |stem: &str| -> Vec<Candidate> {
            config
                .extensions
                .iter()
                .map(|ext| {
                    let file_name = format!("{stem}.{ext}");
                    let url = if base.is_empty() {
                        file_name.clone()
                    } else {
                        format!("{base}/{file_name}")
                    };
                    Candidate { url, file_name }
                })
                .collect()
        };

        Self {
            numbered: (1..=config.max_numbered)
                .map(|n| (n, candidates(&format!("img{n}"))))
                .collect(),
            named: config
                .common_names
                .iter()
                .map(|name| (name.clone(), candidates(name)))
                .collect(),
        }
    }

    /// Every candidate URL, numbered ones first.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.numbered
            .iter()
            .flat_map(|(_, c)| c)
            .chain(self.named.iter().flat_map(|(_, c)| c))
            .map(|candidate| candidate.url.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numbered
            .iter()
            .map(|(_, c)| c.len())
            .chain(self.named.iter().map(|(_, c)| c.len()))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Catalog;

impl Catalog {
    /// A static list is used as given.
    #[must_use]
    pub fn from_manifest(images: Vec<Image>) -> Vec<Image> {
        images
    }

    /// Builds the gallery from the candidate URLs the shell found.
    ///
    /// Numbered assets win: each number contributes its first existing
    /// extension. Common names are only consulted when no numbered asset
    /// exists, and contribute every existing extension.
    #[instrument(skip_all, fields(found = found.len()))]
    pub fn from_probe(plan: &ProbePlan, found: &[String]) -> Vec<Image> {
        let found: HashSet<&str> = found.iter().map(String::as_str).collect();
        let mut images = Vec::new();

        for (n, candidates) in &plan.numbered {
            if let Some(hit) = candidates.iter().find(|c| found.contains(c.url.as_str())) {
                let category = category_for(*n as usize);
                images.push(Image::new(
                    *n,
                    hit.url.clone(),
                    format!("{} {n}", capitalize(category)),
                    hit.file_name.clone(),
                    category,
                ));
            }
        }

        if images.is_empty() {
            for (name, candidates) in &plan.named {
                for hit in candidates.iter().filter(|c| found.contains(c.url.as_str())) {
                    let category = category_for(images.len());
                    let id = u32::try_from(images.len() + 1).unwrap_or(u32::MAX);
                    images.push(Image::new(
                        id,
                        hit.url.clone(),
                        format!("{} - {}", capitalize(category), capitalize(name)),
                        hit.file_name.clone(),
                        category,
                    ));
                }
            }
        }

        info!(images = images.len(), "probed gallery assets");
        images
    }

    /// Demo entries shown when no real asset could be found.
    pub fn placeholders(count: u32, seed: u64) -> Result<Vec<Image>, CatalogError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut images = Vec::with_capacity(count as usize);

        for i in 1..=count {
            let colour = PLACEHOLDER_COLOURS[i as usize % PLACEHOLDER_COLOURS.len()];
            let height = PLACEHOLDER_HEIGHTS[rng.gen_range(0..PLACEHOLDER_HEIGHTS.len())];
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let label = capitalize(category);

            let mut url = Url::parse(&format!(
                "{PLACEHOLDER_HOST}/{PLACEHOLDER_WIDTH}x{height}/{colour}/ffffff"
            ))?;
            url.query_pairs_mut()
                .append_pair("text", &format!("{label} {i}"));

            images.push(Image::new(
                i,
                url.to_string(),
                format!("{label} Image {i}"),
                format!("placeholder{i}.jpg"),
                category,
            ));
        }

        debug!(count, seed, "generated placeholder images");
        Ok(images)
    }
}

fn category_for(n: usize) -> &'static str {
    CATEGORIES[n % CATEGORIES.len()]
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ProbeConfig {
        ProbeConfig {
            base_path: "photos/".into(),
            max_numbered: 4,
            extensions: vec!["jpg".into(), "png".into()],
            common_names: vec!["photo1".into(), "demo2".into()],
        }
    }

    #[test]
    fn plan_lists_numbered_then_named_candidates() {
        let plan = ProbePlan::new(&small_config());
        let urls = plan.urls();

        assert_eq!(plan.len(), 12);
        assert_eq!(urls[0], "photos/img1.jpg");
        assert_eq!(urls[1], "photos/img1.png");
        assert_eq!(urls[7], "photos/img4.png");
        assert_eq!(urls[8], "photos/photo1.jpg");
        assert_eq!(urls[11], "photos/demo2.png");
    }

    #[test]
    fn default_plan_covers_every_extension() {
        let plan = ProbePlan::new(&ProbeConfig::default());
        assert_eq!(plan.len(), 50 * 5 + 18 * 5);
    }

    #[test]
    fn numbered_pass_prefers_first_extension() {
        let plan = ProbePlan::new(&small_config());
        let found = vec![
            "photos/img1.png".to_string(),
            "photos/img3.jpg".to_string(),
            "photos/img3.png".to_string(),
            "photos/photo1.jpg".to_string(),
        ];

        let images = Catalog::from_probe(&plan, &found);

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id.get(), 1);
        assert_eq!(images[0].url, "photos/img1.png");
        assert_eq!(images[0].category, "animals");
        assert_eq!(images[0].title, "Animals 1");
        assert_eq!(images[1].url, "photos/img3.jpg");
        assert_eq!(images[1].name, "img3.jpg");
        assert_eq!(images[1].category, "portrait");
    }

    #[test]
    fn named_pass_runs_only_without_numbered_hits() {
        let plan = ProbePlan::new(&small_config());
        let found = vec![
            "photos/photo1.jpg".to_string(),
            "photos/photo1.png".to_string(),
            "photos/demo2.png".to_string(),
        ];

        let images = Catalog::from_probe(&plan, &found);

        let ids: Vec<u32> = images.iter().map(|image| image.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(images[0].category, "portrait");
        assert_eq!(images[0].title, "Portrait - Photo1");
        assert_eq!(images[1].category, "animals");
        assert_eq!(images[2].title, "General - Demo2");
    }

    #[test]
    fn nothing_found_is_empty() {
        let plan = ProbePlan::new(&small_config());
        assert!(Catalog::from_probe(&plan, &[]).is_empty());
    }

    #[test]
    fn placeholders_are_deterministic_per_seed() {
        let a = Catalog::placeholders(24, 7).unwrap();
        let b = Catalog::placeholders(24, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn placeholder_shape() {
        let images = Catalog::placeholders(3, 1).unwrap();
        let first = &images[0];

        assert_eq!(first.id.get(), 1);
        assert_eq!(first.name, "placeholder1.jpg");
        assert!(CATEGORIES.contains(&first.category.as_str()));
        assert!(first.url.starts_with("https://via.placeholder.com/400x"));
        assert!(first.url.contains("/ff00ff/ffffff?text="));
        assert!(first.url.ends_with("+1"));
        assert!(first.title.ends_with(" Image 1"));
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("animals"), "Animals");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}
