use crate::mems::error::MapError;

const WORD_SIZE: u32 = 4;

/// A single mapped page, addressed in 32-bit words.
pub trait PageMapping {
    /// Number of words in the page.
    fn words(&self) -> usize;

    /// Volatile read. Panics if `index >= self.words()`.
    fn read_word(&self, index: usize) -> u32;

    /// Volatile write. Panics if `index >= self.words()`.
    fn write_word(&mut self, index: usize, value: u32);
}

/// Source of page mappings over physical memory.
pub trait PhysicalMemory {
    type Mapping: PageMapping;

    fn page_size(&self) -> u32;
    fn map_page(&mut self, page: u32) -> Result<Self::Mapping, MapError>;
    fn unmap_page(&mut self, page: u32, mapping: Self::Mapping) -> Result<(), MapError>;
}

struct MappedPage<P> {
    base: u32,
    mapping: P,
}

/// Translates physical addresses into word accessors, keeping the most
/// recently used page mapped.
pub struct RegisterMapper<M: PhysicalMemory> {
    memory: M,
    page_size: u32,
    current: Option<MappedPage<M::Mapping>>,
}

impl<M: PhysicalMemory> RegisterMapper<M> {
    pub fn new(memory: M) -> Self {
        let page_size = memory.page_size();
        Self {
            memory,
            page_size,
            current: None,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Base of the page currently mapped, if any.
    pub fn mapped_page(&self) -> Option<u32> {
        self.current.as_ref().map(|page| page.base)
    }

    pub fn access(&mut self, address: u32) -> Result<WordRef<'_, M::Mapping>, MapError> {
        let target = address / self.page_size * self.page_size;

        let page = match self.current.take() {
            Some(page) if page.base == target => {
                log::trace!("Page 0x{target:08x} already mapped");
                page
            }
            stale => {
                if let Some(old) = stale {
                    self.unmap(old)?;
                }
                log::debug!("Mapping page 0x{target:08x} ({} bytes)", self.page_size);
                MappedPage {
                    base: target,
                    mapping: self.memory.map_page(target)?,
                }
            }
        };

        let page = self.current.insert(page);
        WordRef::new(&mut page.mapping, page.base, address)
    }

    /// Unmap the cached page, if any.
    pub fn release(&mut self) -> Result<(), MapError> {
        match self.current.take() {
            Some(page) => self.unmap(page),
            None => Ok(()),
        }
    }

    fn unmap(&mut self, page: MappedPage<M::Mapping>) -> Result<(), MapError> {
        log::debug!("Unmapping page 0x{:08x}", page.base);
        self.memory.unmap_page(page.base, page.mapping)
    }
}

/// Accessor for one register word inside a mapped page.
#[derive(Debug)]
pub struct WordRef<'a, P: PageMapping> {
    mapping: &'a mut P,
    index: usize,
    address: u32,
}

impl<'a, P: PageMapping> WordRef<'a, P> {
    fn new(mapping: &'a mut P, page: u32, address: u32) -> Result<Self, MapError> {
        let index = address
            .checked_sub(page)
            .map(|offset| (offset / WORD_SIZE) as usize)
            .filter(|&index| index < mapping.words())
            .ok_or_else(|| MapError::outside_page(address, page))?;
        Ok(Self {
            mapping,
            index,
            address,
        })
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn read(&self) -> u32 {
        self.mapping.read_word(self.index)
    }

    pub fn write(&mut self, value: u32) {
        self.mapping.write_word(self.index, value);
    }
}
