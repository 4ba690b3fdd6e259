//! Image-set state machine: load, filter, paginate and lightbox-navigate.
//!
//! `GalleryState` never touches a rendering surface. Every transition returns
//! the data the shell needs (a page of images, the focused image) and the
//! shell materializes it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::model::{Filter, Image, ImageId};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GalleryError {
    #[error("lightbox index {index} is out of range for {len} visible images")]
    OutOfRange { index: usize, len: usize },

    #[error("lightbox navigation requires an open lightbox")]
    InvalidState,

    #[error("stale page: ticket generation {ticket_generation}, current generation {current_generation}")]
    StalePage {
        ticket_generation: u64,
        current_generation: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Previous,
    Next,
}

/// What lightbox navigation does at either end of the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightboxEdge {
    /// Stay on the boundary image.
    #[default]
    Clamp,
    /// Continue from the opposite end.
    Wrap,
}

impl LightboxEdge {
    /// Cursor after one step. `len` must be non-zero and `cursor < len`.
    #[must_use]
    pub fn step(self, cursor: usize, len: usize, direction: Direction) -> usize {
        let last = len.saturating_sub(1);
        match (self, direction) {
            (Self::Clamp, Direction::Next) => cursor.saturating_add(1).min(last),
            (Self::Clamp, Direction::Previous) => cursor.saturating_sub(1),
            (Self::Wrap, Direction::Next) => {
                if cursor >= last {
                    0
                } else {
                    cursor + 1
                }
            }
            (Self::Wrap, Direction::Previous) => {
                if cursor == 0 {
                    last
                } else {
                    cursor - 1
                }
            }
        }
    }

    /// Whether a step in `direction` would land on a different image.
    #[must_use]
    pub fn can_step(self, cursor: usize, len: usize, direction: Direction) -> bool {
        len > 1 && self.step(cursor, len, direction) != cursor
    }
}

/// Batch of images to append to the rendered grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Index in the visible set of the first image of the page.
    pub start: usize,
    pub images: Vec<Image>,
    /// Every visible image has been handed out.
    pub exhausted: bool,
}

impl Page {
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A page computed against one generation of the visible set.
///
/// Only applied if the gallery is still at that generation and has not
/// rendered anything since the ticket was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageTicket {
    pub generation: u64,
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryState {
    all_images: Vec<Image>,
    active_filter: Filter,
    /// Positions in `all_images`, in load order.
    visible: Vec<usize>,
    rendered_count: usize,
    lightbox_cursor: Option<usize>,
    lightbox_edge: LightboxEdge,
    generation: u64,
    loaded: bool,
}

impl GalleryState {
    #[must_use]
    pub fn new(lightbox_edge: LightboxEdge) -> Self {
        Self {
            lightbox_edge,
            ..Self::default()
        }
    }

    pub fn set_lightbox_edge(&mut self, edge: LightboxEdge) {
        self.lightbox_edge = edge;
    }

    #[must_use]
    pub fn lightbox_edge(&self) -> LightboxEdge {
        self.lightbox_edge
    }

    /// Replaces the master list. Later duplicates of an id are dropped.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub fn load(&mut self, images: Vec<Image>) {
        let mut seen: HashSet<ImageId> = HashSet::with_capacity(images.len());
        let mut all_images = Vec::with_capacity(images.len());
        for image in images {
            if seen.insert(image.id) {
                all_images.push(image);
            } else {
                warn!(id = %image.id, "dropping image with duplicate id");
            }
        }

        self.visible = (0..all_images.len()).collect();
        self.all_images = all_images;
        self.active_filter = Filter::All;
        self.rendered_count = 0;
        self.lightbox_cursor = None;
        self.bump_generation();
        self.loaded = true;

        debug!(
            images = self.all_images.len(),
            generation = self.generation,
            "gallery loaded"
        );
    }

    /// Applies `filter` and returns the first page of the new visible set.
    ///
    /// Closes the lightbox and invalidates every outstanding page ticket.
    #[instrument(skip(self, filter), fields(filter = %filter))]
    pub fn set_filter(&mut self, filter: Filter, page_size: NonZeroUsize) -> Page {
        self.visible = self
            .all_images
            .iter()
            .enumerate()
            .filter(|(_, image)| filter.matches(image))
            .map(|(position, _)| position)
            .collect();
        self.active_filter = filter;
        self.rendered_count = 0;
        self.lightbox_cursor = None;
        self.bump_generation();

        debug!(
            visible = self.visible.len(),
            generation = self.generation,
            "filter applied"
        );

        self.load_more(page_size)
    }

    /// Hands out the next page and advances the rendered count.
    ///
    /// Once exhausted this keeps returning an empty, exhausted page.
    pub fn load_more(&mut self, page_size: NonZeroUsize) -> Page {
        let ticket = self.request_page(page_size);
        self.take_page(ticket)
    }

    /// Computes the next page without advancing.
    #[must_use]
    pub fn request_page(&self, page_size: NonZeroUsize) -> PageTicket {
        let remaining = self.visible.len() - self.rendered_count;
        PageTicket {
            generation: self.generation,
            start: self.rendered_count,
            len: remaining.min(page_size.get()),
        }
    }

    /// Applies a ticket from [`request_page`](Self::request_page).
    pub fn complete_page(&mut self, ticket: PageTicket) -> Result<Page, GalleryError> {
        if ticket.generation != self.generation || ticket.start != self.rendered_count {
            return Err(GalleryError::StalePage {
                ticket_generation: ticket.generation,
                current_generation: self.generation,
            });
        }
        Ok(self.take_page(ticket))
    }

    fn take_page(&mut self, ticket: PageTicket) -> Page {
        let end = (ticket.start + ticket.len).min(self.visible.len());
        let images: Vec<Image> = self.visible[ticket.start..end]
            .iter()
            .map(|&position| self.all_images[position].clone())
            .collect();

        self.rendered_count = end;
        Page {
            start: ticket.start,
            images,
            exhausted: self.is_exhausted(),
        }
    }

    pub fn open_lightbox(&mut self, index: usize) -> Result<&Image, GalleryError> {
        let len = self.visible.len();
        if index >= len {
            return Err(GalleryError::OutOfRange { index, len });
        }
        self.lightbox_cursor = Some(index);
        Ok(&self.all_images[self.visible[index]])
    }

    pub fn advance_lightbox(&mut self, direction: Direction) -> Result<&Image, GalleryError> {
        let cursor = self.lightbox_cursor.ok_or(GalleryError::InvalidState)?;
        let next = self
            .lightbox_edge
            .step(cursor, self.visible.len(), direction);
        self.lightbox_cursor = Some(next);
        Ok(&self.all_images[self.visible[next]])
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox_cursor = None;
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn active_filter(&self) -> &Filter {
        &self.active_filter
    }

    #[must_use]
    pub fn all_images(&self) -> &[Image] {
        &self.all_images
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.all_images.iter().any(|image| image.id == id)
    }

    pub fn visible_images(&self) -> impl Iterator<Item = &Image> + '_ {
        self.visible
            .iter()
            .map(move |&position| &self.all_images[position])
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn visible_image(&self, index: usize) -> Option<&Image> {
        self.visible
            .get(index)
            .map(|&position| &self.all_images[position])
    }

    /// The prefix of the visible set currently materialized by the shell.
    pub fn rendered_images(&self) -> impl Iterator<Item = &Image> + '_ {
        self.visible_images().take(self.rendered_count)
    }

    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.rendered_count
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.rendered_count == self.visible.len()
    }

    #[must_use]
    pub fn lightbox_cursor(&self) -> Option<usize> {
        self.lightbox_cursor
    }

    #[must_use]
    pub fn lightbox_image(&self) -> Option<&Image> {
        self.lightbox_cursor
            .and_then(|cursor| self.visible_image(cursor))
    }

    /// Categories present in the master list, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.all_images
            .iter()
            .map(|image| image.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
