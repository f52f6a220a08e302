use crate::mems::error::MapError;
use crate::mems::mapper::{PageMapping, PhysicalMemory};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::rc::Rc;

#[derive(Debug, Default)]
struct State {
    pages: BTreeMap<u32, Box<[u32]>>, // page base -> words
    denied: BTreeSet<u32>,
    fail_unmaps: bool,
    map_count: usize,
    unmap_count: usize,
}

impl State {
    fn page_mut(&mut self, base: u32, words: usize) -> &mut [u32] {
        self.pages
            .entry(base)
            .or_insert_with(|| vec![0; words].into_boxed_slice())
    }
}

/// In-process physical memory, zero-filled and created page by page on
/// demand.
///
/// Clones share the same memory, so a caller can keep a handle for
/// inspection after handing one to a [`RegisterMapper`](crate::RegisterMapper).
///
/// Meant for tests only: no hardware is touched, and misuse such as an
/// invalid page size panics instead of returning an error.
#[derive(Debug, Clone)]
pub struct SimulatedMemory {
    page_size: u32,
    state: Rc<RefCell<State>>,
}

impl SimulatedMemory {
    /// # Panics
    ///
    /// If `page_size` is not a non-zero multiple of 4.
    pub fn new(page_size: u32) -> Self {
        assert!(
            page_size >= 4 && page_size % 4 == 0,
            "invalid page size {page_size}"
        );
        Self {
            page_size,
            state: Rc::default(),
        }
    }

    fn words_per_page(&self) -> usize {
        (self.page_size / 4) as usize
    }

    fn locate(&self, address: u32) -> (u32, usize) {
        let base = address / self.page_size * self.page_size;
        (base, ((address - base) / 4) as usize)
    }

    /// Read a word without going through a mapping.
    pub fn peek(&self, address: u32) -> u32 {
        let (base, index) = self.locate(address);
        self.state
            .borrow()
            .pages
            .get(&base)
            .map_or(0, |page| page[index])
    }

    /// Write a word without going through a mapping.
    pub fn poke(&self, address: u32, value: u32) {
        let (base, index) = self.locate(address);
        let words = self.words_per_page();
        self.state.borrow_mut().page_mut(base, words)[index] = value;
    }

    /// Make mapping of the page at `base` fail.
    pub fn deny_page(&self, base: u32) {
        self.state.borrow_mut().denied.insert(base);
    }

    pub fn fail_unmaps(&self, fail: bool) {
        self.state.borrow_mut().fail_unmaps = fail;
    }

    /// Number of successful mappings so far.
    pub fn map_count(&self) -> usize {
        self.state.borrow().map_count
    }

    pub fn unmap_count(&self) -> usize {
        self.state.borrow().unmap_count
    }
}

impl PhysicalMemory for SimulatedMemory {
    type Mapping = SimulatedPage;

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn map_page(&mut self, page: u32) -> Result<SimulatedPage, MapError> {
        let words = self.words_per_page();
        let mut state = self.state.borrow_mut();
        if state.denied.contains(&page) {
            return Err(MapError::map_failed(
                page,
                io::Error::from_raw_os_error(libc::EPERM),
            ));
        }
        state.page_mut(page, words);
        state.map_count += 1;

        Ok(SimulatedPage {
            base: page,
            words,
            state: Rc::clone(&self.state),
        })
    }

    fn unmap_page(&mut self, page: u32, _mapping: SimulatedPage) -> Result<(), MapError> {
        let mut state = self.state.borrow_mut();
        if state.fail_unmaps {
            return Err(MapError::unmap_failed(
                page,
                io::Error::from_raw_os_error(libc::EINVAL),
            ));
        }
        state.unmap_count += 1;
        Ok(())
    }
}

/// A mapping handed out by [`SimulatedMemory`].
#[derive(Debug)]
pub struct SimulatedPage {
    base: u32,
    words: usize,
    state: Rc<RefCell<State>>,
}

impl PageMapping for SimulatedPage {
    fn words(&self) -> usize {
        self.words
    }

    fn read_word(&self, index: usize) -> u32 {
        assert!(index < self.words, "word {index} outside page");
        self.state
            .borrow()
            .pages
            .get(&self.base)
            .map_or(0, |page| page[index])
    }

    fn write_word(&mut self, index: usize, value: u32) {
        assert!(index < self.words, "word {index} outside page");
        let words = self.words;
        self.state.borrow_mut().page_mut(self.base, words)[index] = value;
    }
}
