use serde::{Deserialize, Serialize};

use crate::capabilities::{KvReadResult, KvWriteResult};
use crate::config::GalleryConfig;
use crate::gallery::{Direction, PageTicket};
use crate::model::{Filter, Image, ImageId};

/// Keys the lightbox reacts to while open.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Configure(Box<GalleryConfig>),
    Started,

    // Image source
    ManifestLoaded {
        images: Vec<Image>,
    },
    AssetsProbed {
        found: Vec<String>,
    },
    SourceFailed {
        reason: String,
    },

    // Grid
    FilterSelected {
        filter: Filter,
    },
    LoadMoreRequested,
    PageDelivered {
        ticket: PageTicket,
    },

    // Lightbox
    ImageClicked {
        index: usize,
    },
    LightboxNavigated {
        direction: Direction,
    },
    LightboxClosed,
    KeyPressed {
        key: Key,
    },

    // Saved images
    BookmarkToggled {
        id: ImageId,
    },
    ToastDismissed,

    // Capability responses
    BookmarksRead(Box<KvReadResult>),
    BookmarksWritten(Box<KvWriteResult>),
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Started => "started",
            Self::ManifestLoaded { .. } => "manifest_loaded",
            Self::AssetsProbed { .. } => "assets_probed",
            Self::SourceFailed { .. } => "source_failed",
            Self::FilterSelected { .. } => "filter_selected",
            Self::LoadMoreRequested => "load_more_requested",
            Self::PageDelivered { .. } => "page_delivered",
            Self::ImageClicked { .. } => "image_clicked",
            Self::LightboxNavigated { .. } => "lightbox_navigated",
            Self::LightboxClosed => "lightbox_closed",
            Self::KeyPressed { .. } => "key_pressed",
            Self::BookmarkToggled { .. } => "bookmark_toggled",
            Self::ToastDismissed => "toast_dismissed",
            Self::BookmarksRead(_) => "bookmarks_read",
            Self::BookmarksWritten(_) => "bookmarks_written",
        }
    }
}
