use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bookmarks::BookmarkStore;
use crate::config::GalleryConfig;
use crate::gallery::{GalleryState, PageTicket};

/// Stable identifier of a gallery entry within one load of the catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u32);

impl ImageId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    /// Opaque location of the asset; never parsed by the core.
    pub url: String,
    pub title: String,
    pub name: String,
    pub category: String,
}

impl Image {
    pub fn new(
        id: u32,
        url: impl Into<String>,
        title: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ImageId(id),
            url: url.into(),
            title: title.into(),
            name: name.into(),
            category: category.into(),
        }
    }

    /// File name offered when the image is downloaded.
    #[must_use]
    pub fn download_name(&self) -> String {
        if self.name.is_empty() {
            format!("image-{}.jpg", self.id)
        } else {
            self.name.clone()
        }
    }

    /// Text copied to the clipboard when native sharing is unavailable.
    #[must_use]
    pub fn share_text(&self) -> String {
        format!("{} - {}", self.title, self.url)
    }
}

/// Category restriction of the visible set.
///
/// Travels over the bridge as the plain `data-filter` string, `"all"` being
/// the sentinel for the unrestricted view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    pub const ALL: &'static str = "all";

    pub fn parse(value: &str) -> Self {
        Self::from(value.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Category(category) => category.as_str(),
        }
    }

    #[must_use]
    pub fn matches(&self, image: &Image) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => image.category == *category,
        }
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            Self::All
        } else {
            Self::Category(value)
        }
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => Filter::ALL.to_string(),
            Filter::Category(category) => category,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastMessage {
    pub fn new(message: impl Into<String>, kind: ToastKind, duration_ms: u64) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms,
        }
    }
}

/// Everything the gallery core owns for one page view.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Model {
    pub config: GalleryConfig,
    pub gallery: GalleryState,
    pub bookmarks: BookmarkStore,

    /// Page requested by "load more" and not yet delivered by the shell.
    pub pending_page: Option<PageTicket>,

    pub active_toast: Option<ToastMessage>,
}

impl Model {
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            gallery: GalleryState::new(config.lightbox_edge),
            config,
            bookmarks: BookmarkStore::default(),
            pending_page: None,
            active_toast: None,
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(
            message,
            kind,
            self.config.toast_duration_ms,
        ));
    }

    #[must_use]
    pub fn is_page_loading(&self) -> bool {
        self.pending_page.is_some()
    }
}
