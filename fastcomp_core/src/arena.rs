use std::io::{self, Read};

use bytemuck::{Pod, Zeroable};

/// Size of a memory page, the unit of arena allocation and of layout
/// perturbation.
pub const PAGE_SIZE: usize = 4096;

/// Bytes per MiB, used for throughput reporting.
pub const MIB: f64 = (1u64 << 20) as f64;

/// One page-aligned page of bytes.
///
/// Arenas are `Vec<Page>`, so every arena starts on a page boundary and can be
/// permuted page by page without touching the bytes inside a page.
#[derive(Clone, Copy)]
#[repr(C, align(4096))]
pub struct Page(pub [u8; PAGE_SIZE]);

// SAFETY: Page is repr(C) with one [u8; PAGE_SIZE] field and size equal to its
// alignment, so it has no padding and any bit pattern is valid.
unsafe impl Zeroable for Page {}
unsafe impl Pod for Page {}

/// Page-aligned byte arena owned by the benchmark driver.
///
/// Codecs only ever see borrowed slices of an arena.
pub struct PageArena {
    pages: Vec<Page>,
}

impl PageArena {
    /// Allocate a zero-filled arena of `count` pages.
    pub fn with_pages(count: usize) -> Self {
        Self {
            pages: vec![Page::zeroed(); count],
        }
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pages)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.pages)
    }

    /// Fill the whole arena from `reader`.
    ///
    /// Reads exactly the arena's length in bytes; anything the reader holds past that
    /// is left unread.
    pub fn fill_from<R: Read>(&mut self, mut reader: R) -> io::Result<()> {
        reader.read_exact(self.as_bytes_mut())
    }
}
