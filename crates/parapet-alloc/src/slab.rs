// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The slab allocator: many small secrets per guarded page.
//!
//! Each slab page is a single page-allocator allocation carved into objects
//! of one size class. The last slot of every page is reserved as that page's
//! random canary template; every handed-out object carries the template's
//! prefix in its tail, verified on free.
//!
//! # Security caveat
//!
//! `protect` is a no-op here: flipping page protection would freeze every
//! object on the page, not just the one being frozen. Containers backed by
//! this allocator keep their mutability state machine, but the read-only
//! state is enforced by convention, not by the MMU.

use std::sync::Mutex;

use parapet_crypto::{ct_copy, ct_equal, scramble, wipe};
use parapet_mem::{self as mem, Region};

use crate::error::AllocError;
use crate::guarded::PageAllocator;
use crate::traits::Allocator;

/// Minimum number of canary bytes appended to every slab object.
pub const MIN_CANARY_SIZE: usize = 16;

const DEFAULT_CLASSES: &[usize] = &[64, 128, 256, 512, 1024, 2048];

/// Size-class configuration for [`SlabAllocator`].
#[derive(Debug, Clone)]
pub struct SlabConfig {
    classes: Vec<usize>,
}

impl SlabConfig {
    /// Builds a configuration from an ascending list of class sizes.
    ///
    /// # Panics
    ///
    /// Panics if `classes` is empty, unsorted, or contains a class that does
    /// not fit at least two slots (object + template) into a page.
    pub fn new(classes: &[usize]) -> Self {
        assert!(!classes.is_empty(), "at least one size class required");
        assert!(
            classes.windows(2).all(|w| w[0] < w[1]),
            "size classes must be strictly ascending"
        );
        assert!(
            2 * classes[classes.len() - 1] <= mem::page_size(),
            "largest class must fit two slots per page"
        );

        Self {
            classes: classes.to_vec(),
        }
    }

    fn max_class(&self) -> usize {
        self.classes[self.classes.len() - 1]
    }

    fn class_for(&self, required: usize) -> Option<usize> {
        self.classes.iter().copied().find(|&s| s >= required)
    }
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSES)
    }
}

/// One guarded page carved into `class`-sized slots.
struct SlabPage {
    /// Full-page data region from the page allocator.
    page: Region,
    class: usize,
    /// Offsets of slots available for allocation.
    free: Vec<usize>,
    /// Offsets currently handed out, with their user sizes.
    used: Vec<(usize, usize)>,
}

impl SlabPage {
    fn slot_count(class: usize) -> usize {
        // One slot is the canary template
        (mem::page_size() - class) / class
    }

    fn new(page_alloc: &PageAllocator, class: usize) -> Result<Self, AllocError> {
        let page = page_alloc.alloc(mem::page_size())?;
        let slots = Self::slot_count(class);

        // Template occupies the slot after the last usable one
        let template = page.subregion(slots * class, class);
        scramble(unsafe { template.as_mut_slice() });

        Ok(Self {
            page,
            class,
            free: (0..slots).map(|i| i * class).collect(),
            used: Vec::new(),
        })
    }

    fn template(&self) -> Region {
        let slots = Self::slot_count(self.class);
        self.page.subregion(slots * self.class, self.class)
    }

    fn contains(&self, addr: usize) -> bool {
        let base = self.page.addr();
        addr >= base && addr < base + self.page.len()
    }

    fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    fn take_slot(&mut self, user_size: usize) -> Region {
        let offset = self.free.pop().expect("take_slot on a full page");
        self.used.push((offset, user_size));

        let slot = self.page.subregion(offset, self.class);
        let tail_region = slot.subregion(user_size, self.class - user_size);
        let tail = unsafe { tail_region.as_mut_slice() };
        let template = self.template();
        ct_copy(tail, unsafe { template.as_slice() });

        slot.subregion(0, user_size)
    }

    /// Wipes and verifies the slot at `offset`; returns canary integrity.
    fn release_slot(&mut self, offset: usize, user_size: usize) -> bool {
        let slot = self.page.subregion(offset, self.class);

        let data_region = slot.subregion(0, user_size);
        wipe(unsafe { data_region.as_mut_slice() });

        let tail_region = slot.subregion(user_size, self.class - user_size);
        let tail = unsafe { tail_region.as_slice() };
        let template_region = self.template();
        let template = unsafe { template_region.as_slice() };
        let intact = ct_equal(tail, &template[..self.class - user_size]);

        wipe(unsafe { slot.as_mut_slice() });
        self.free.push(offset);

        intact
    }
}

/// Higher-density allocator for many small secrets.
///
/// Fronts a [`PageAllocator`]: slab pages come from it, and requests larger
/// than the biggest size class are delegated to it outright.
pub struct SlabAllocator {
    page_alloc: PageAllocator,
    config: SlabConfig,
    pages: Mutex<Vec<SlabPage>>,
}

impl SlabAllocator {
    /// Creates a slab allocator with the default size classes.
    pub fn new() -> Self {
        Self::with_config(SlabConfig::default())
    }

    /// Creates a slab allocator with explicit size classes.
    pub fn with_config(config: SlabConfig) -> Self {
        Self {
            page_alloc: PageAllocator::new(),
            config,
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Number of live slab pages. Test and diagnostics hook.
    pub fn live_pages(&self) -> usize {
        self.pages.lock().expect("slab state poisoned").len()
    }

    fn delegates(&self, user_size: usize) -> bool {
        user_size
            .checked_add(MIN_CANARY_SIZE)
            .is_none_or(|required| required > self.config.max_class())
    }
}

impl Default for SlabAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for SlabAllocator {
    fn alloc(&self, user_size: usize) -> Result<Region, AllocError> {
        if user_size == 0 {
            return Err(AllocError::NullAlloc);
        }

        if self.delegates(user_size) {
            return self.page_alloc.alloc(user_size);
        }

        let class = self
            .config
            .class_for(user_size + MIN_CANARY_SIZE)
            .expect("delegation check covers all larger requests");

        let mut pages = self.pages.lock().expect("slab state poisoned");

        // Best fit: the fullest page of this class that still has a slot
        let candidate = pages
            .iter_mut()
            .filter(|p| p.class == class && !p.free.is_empty())
            .min_by_key(|p| p.free.len());

        if let Some(page) = candidate {
            return Ok(page.take_slot(user_size));
        }

        let mut page = SlabPage::new(&self.page_alloc, class)?;
        let slot = page.take_slot(user_size);
        pages.push(page);

        Ok(slot)
    }

    /// No-op: page protection is too coarse for slot granularity.
    fn protect(&self, _data: Region, _read_only: bool) -> Result<(), AllocError> {
        Ok(())
    }

    fn free(&self, data: Region) -> Result<(), AllocError> {
        if self.delegates(data.len()) {
            return self.page_alloc.free(data);
        }

        let mut pages = self.pages.lock().expect("slab state poisoned");

        let index = pages
            .iter()
            .position(|p| p.contains(data.addr()))
            .ok_or(AllocError::NotOwnedByAllocator)?;

        let page = &mut pages[index];
        let offset = data.addr() - page.page.addr();

        let used_index = page
            .used
            .iter()
            .position(|&(o, size)| o == offset && size == data.len())
            .ok_or(AllocError::NotOwnedByAllocator)?;

        let (offset, user_size) = page.used.swap_remove(used_index);
        let intact = page.release_slot(offset, user_size);

        let mut result = if intact {
            Ok(())
        } else {
            Err(AllocError::BufferOverflow)
        };

        if page.is_empty() {
            let region = page.page;
            pages.swap_remove(index);
            drop(pages);

            if let Err(e) = self.page_alloc.free(region) {
                // Keep the first failure; a canary error outranks a late one
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        result
    }
}
