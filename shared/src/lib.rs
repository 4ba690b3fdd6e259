//! Shared core of the portfolio gallery.
//!
//! The core owns the gallery state and all transitions; a platform shell
//! renders the [`ViewModel`] and executes the effects the core requests
//! (render, key-value storage).

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod bookmarks;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod event;
pub mod gallery;
pub mod model;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use bookmarks::{BookmarkError, BookmarkStore, Toggled};
pub use capabilities::{Capabilities, Effect};
pub use catalog::{Catalog, CatalogError, ProbePlan};
pub use config::{ConfigError, GalleryConfig, ProbeConfig};
pub use event::{Event, Key};
pub use gallery::{Direction, GalleryError, GalleryState, LightboxEdge, Page, PageTicket};
pub use model::{Filter, Image, ImageId, Model, ToastKind, ToastMessage};

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_PLACEHOLDER_COUNT: u32 = 24;
pub const MAX_PLACEHOLDER_COUNT: u32 = 200;
pub const MAX_NUMBERED_PROBES: u32 = 500;
pub const PAGE_DELAY_MS: u64 = 500;
pub const TOAST_DURATION_MS: u64 = 3000;
pub const BOOKMARK_STORAGE_KEY: &str = "savedImages";

pub const SAVED_MESSAGE: &str = "Image saved to collection!";
pub const REMOVED_MESSAGE: &str = "Removed from saved images";
pub const SAVE_FAILED_MESSAGE: &str = "Could not update saved images";
pub const EMPTY_GALLERY_MESSAGE: &str = "No images found";
pub const EMPTY_FILTER_MESSAGE: &str = "No images in this category";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewPhase {
    /// Waiting for the image source. Shells that probe for assets test these
    /// URLs and report the ones that exist.
    Loading { probe_urls: Vec<String> },
    Ready,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FilterChip {
    pub label: String,
    pub filter: Filter,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageCard {
    /// Position in the visible set; what `ImageClicked` expects back.
    pub index: usize,
    pub id: ImageId,
    pub url: String,
    pub title: String,
    pub name: String,
    pub category: String,
    pub saved: bool,
    pub download_name: String,
    pub share_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LightboxView {
    pub image: ImageCard,
    /// 1-based, for "3 / 12" style counters.
    pub position: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// A "load more" page the shell must deliver back after `delay_ms`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PendingPageView {
    pub ticket: PageTicket,
    pub delay_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub phase: ViewPhase,
    pub filters: Vec<FilterChip>,
    pub cards: Vec<ImageCard>,
    pub has_more: bool,
    pub is_loading: bool,
    pub pending_page: Option<PendingPageView>,
    pub empty_message: Option<String>,
    pub lightbox: Option<LightboxView>,
    pub toast: Option<ToastMessage>,
    pub saved_count: usize,
}

pub mod app {
    use super::*;
    use crate::capabilities::{Capabilities, KvError};
    use crate::catalog::capitalize;
    use tracing::{debug, info, warn};

    #[derive(Default)]
    pub struct App;

    impl App {
        fn load_catalog(model: &mut Model, images: Vec<Image>) {
            let images = if images.is_empty() && model.config.placeholder_fallback {
                match Catalog::placeholders(
                    model.config.placeholder_count,
                    model.config.placeholder_seed,
                ) {
                    Ok(placeholders) => {
                        info!(count = placeholders.len(), "no gallery assets, using placeholders");
                        placeholders
                    }
                    Err(e) => {
                        warn!(error = %e, "placeholder generation failed");
                        Vec::new()
                    }
                }
            } else {
                images
            };

            model.pending_page = None;
            model.gallery.load(images);
            let page = model.gallery.load_more(model.config.page_size);
            debug!(images = page.len(), exhausted = page.exhausted, "initial page");
        }

        fn read_bookmarks(model: &Model, caps: &Capabilities) {
            caps.key_value
                .get(model.config.bookmark_key.clone(), |result| {
                    Event::BookmarksRead(Box::new(result.map_err(KvError::storage)))
                });
        }

        fn persist_bookmarks(model: &Model, caps: &Capabilities) {
            match model.bookmarks.encode() {
                Ok(bytes) => caps.key_value.set(
                    model.config.bookmark_key.clone(),
                    bytes,
                    |result| {
                        Event::BookmarksWritten(Box::new(
                            result.map(|_| ()).map_err(KvError::storage),
                        ))
                    },
                ),
                Err(e) => warn!(error = %e, "saved images not persisted"),
            }
        }

        fn navigate(model: &mut Model, direction: Direction) {
            match model.gallery.advance_lightbox(direction) {
                Ok(image) => debug!(id = %image.id, ?direction, "lightbox moved"),
                Err(e) => warn!(error = %e, "lightbox navigation ignored"),
            }
        }

        fn image_card(model: &Model, index: usize, image: &Image) -> ImageCard {
            ImageCard {
                index,
                id: image.id,
                url: image.url.clone(),
                title: image.title.clone(),
                name: image.name.clone(),
                category: image.category.clone(),
                saved: model.bookmarks.contains(image.id),
                download_name: image.download_name(),
                share_text: image.share_text(),
            }
        }

        fn filter_chips(model: &Model) -> Vec<FilterChip> {
            let active = model.gallery.active_filter();
            let all = FilterChip {
                label: "All".into(),
                filter: Filter::All,
                active: *active == Filter::All,
            };

            std::iter::once(all)
                .chain(model.gallery.categories().into_iter().map(|category| {
                    let filter = Filter::parse(category);
                    FilterChip {
                        label: capitalize(category),
                        active: *active == filter,
                        filter,
                    }
                }))
                .collect()
        }

        fn lightbox_view(model: &Model) -> Option<LightboxView> {
            let gallery = &model.gallery;
            let cursor = gallery.lightbox_cursor()?;
            let image = gallery.visible_image(cursor)?;
            let total = gallery.visible_len();
            let edge = gallery.lightbox_edge();

            Some(LightboxView {
                image: Self::image_card(model, cursor, image),
                position: cursor + 1,
                total,
                has_previous: edge.can_step(cursor, total, Direction::Previous),
                has_next: edge.can_step(cursor, total, Direction::Next),
            })
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "update");

            match event {
                Event::Configure(config) => {
                    match config.validate() {
                        Ok(()) => {
                            model.gallery.set_lightbox_edge(config.lightbox_edge);
                            model.config = *config;
                            info!("gallery configured");
                        }
                        Err(e) => warn!(error = %e, "configuration rejected"),
                    }
                    caps.render.render();
                }

                Event::Started => {
                    Self::read_bookmarks(model, caps);
                    caps.render.render();
                }

                Event::ManifestLoaded { .. }
                | Event::AssetsProbed { .. }
                | Event::SourceFailed { .. }
                    if model.gallery.is_loaded() =>
                {
                    warn!(event = event.name(), "image source already completed");
                }

                Event::ManifestLoaded { images } => {
                    Self::load_catalog(model, Catalog::from_manifest(images));
                    caps.render.render();
                }

                Event::AssetsProbed { found } => {
                    let plan = ProbePlan::new(&model.config.probe);
                    let images = Catalog::from_probe(&plan, &found);
                    Self::load_catalog(model, images);
                    caps.render.render();
                }

                Event::SourceFailed { reason } => {
                    warn!(%reason, "image source failed");
                    Self::load_catalog(model, Vec::new());
                    caps.render.render();
                }

                Event::FilterSelected { filter } => {
                    if !model.gallery.is_loaded() {
                        debug!("filter ignored before the gallery is loaded");
                        return;
                    }
                    model.pending_page = None;
                    let page = model.gallery.set_filter(filter, model.config.page_size);
                    debug!(images = page.len(), exhausted = page.exhausted, "filtered page");
                    caps.render.render();
                }

                Event::LoadMoreRequested => {
                    if !model.gallery.is_loaded() || model.gallery.is_exhausted() {
                        debug!("nothing more to load");
                        return;
                    }
                    if model.is_page_loading() {
                        debug!("page already in flight");
                        return;
                    }
                    let ticket = model.gallery.request_page(model.config.page_size);
                    model.pending_page = Some(ticket);
                    caps.render.render();
                }

                Event::PageDelivered { ticket } => {
                    if model.pending_page != Some(ticket) {
                        debug!(generation = ticket.generation, "dropping page that is no longer pending");
                        return;
                    }
                    model.pending_page = None;
                    match model.gallery.complete_page(ticket) {
                        Ok(page) => {
                            debug!(images = page.len(), exhausted = page.exhausted, "page appended");
                        }
                        Err(e) => warn!(error = %e, "page discarded"),
                    }
                    caps.render.render();
                }

                Event::ImageClicked { index } => {
                    match model.gallery.open_lightbox(index) {
                        Ok(image) => debug!(id = %image.id, index, "lightbox opened"),
                        Err(e) => {
                            warn!(error = %e, "lightbox not opened");
                            return;
                        }
                    }
                    caps.render.render();
                }

                Event::LightboxNavigated { direction } => {
                    Self::navigate(model, direction);
                    caps.render.render();
                }

                Event::LightboxClosed => {
                    model.gallery.close_lightbox();
                    caps.render.render();
                }

                Event::KeyPressed { key } => {
                    if model.gallery.lightbox_cursor().is_none() {
                        return;
                    }
                    match key {
                        Key::Escape => model.gallery.close_lightbox(),
                        Key::ArrowLeft => Self::navigate(model, Direction::Previous),
                        Key::ArrowRight => Self::navigate(model, Direction::Next),
                        Key::Other => return,
                    }
                    caps.render.render();
                }

                Event::BookmarkToggled { id } => {
                    if !model.gallery.contains(id) && !model.bookmarks.contains(id) {
                        warn!(%id, "bookmark toggle for unknown image");
                        return;
                    }
                    match model.bookmarks.toggle(id) {
                        Toggled::Saved => model.show_toast(SAVED_MESSAGE, ToastKind::Success),
                        Toggled::Removed => model.show_toast(REMOVED_MESSAGE, ToastKind::Info),
                    }
                    Self::persist_bookmarks(model, caps);
                    caps.render.render();
                }

                Event::ToastDismissed => {
                    model.active_toast = None;
                    caps.render.render();
                }

                Event::BookmarksRead(result) => {
                    match *result {
                        Ok(Some(bytes)) => match BookmarkStore::decode(&bytes) {
                            Ok(stored) => {
                                info!(saved = stored.len(), "saved images restored");
                                if model.bookmarks.merge(stored) {
                                    debug!("stored saved images were behind, rewriting");
                                    Self::persist_bookmarks(model, caps);
                                }
                            }
                            Err(e) => warn!(error = %e, "ignoring unreadable saved images"),
                        },
                        Ok(None) => debug!("no saved images yet"),
                        Err(e) => warn!(error = %e, "saved images unavailable"),
                    }
                    caps.render.render();
                }

                Event::BookmarksWritten(result) => {
                    if let Err(e) = *result {
                        warn!(error = %e, "saved images not persisted");
                        model.show_toast(SAVE_FAILED_MESSAGE, ToastKind::Error);
                        caps.render.render();
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let gallery = &model.gallery;

            let phase = if gallery.is_loaded() {
                ViewPhase::Ready
            } else {
                ViewPhase::Loading {
                    probe_urls: ProbePlan::new(&model.config.probe).urls(),
                }
            };

            let empty_message = (gallery.is_loaded() && gallery.visible_len() == 0).then(|| {
                if gallery.all_images().is_empty() {
                    EMPTY_GALLERY_MESSAGE.to_string()
                } else {
                    EMPTY_FILTER_MESSAGE.to_string()
                }
            });

            ViewModel {
                phase,
                filters: Self::filter_chips(model),
                cards: gallery
                    .rendered_images()
                    .enumerate()
                    .map(|(index, image)| Self::image_card(model, index, image))
                    .collect(),
                has_more: gallery.is_loaded() && !gallery.is_exhausted(),
                is_loading: model.is_page_loading(),
                pending_page: model.pending_page.map(|ticket| PendingPageView {
                    ticket,
                    delay_ms: model.config.page_delay_ms,
                }),
                empty_message,
                lightbox: Self::lightbox_view(model),
                toast: model.active_toast.clone(),
                saved_count: model.bookmarks.len(),
            }
        }
    }
}
