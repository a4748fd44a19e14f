//! Bulk program and data images, plus a loader that writes them through any bus.

use std::collections::BTreeMap;

use super::{Address, Bus, ADDRESS_MASK};
use crate::fault::MemoryError;

/// Start address to contiguous byte sequence mapping used to seed memory.
///
/// Segments are kept in ascending start-address order. Inserting an empty
/// sequence is a no-op and leaves any existing segment at that start in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    segments: BTreeMap<Address, Vec<u8>>,
}

impl MemoryImage {
    /// Creates an empty image.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the sequence starting at `start`. Empty sequences are ignored.
    pub fn insert(&mut self, start: Address, bytes: Vec<u8>) {
        if !bytes.is_empty() {
            self.segments.insert(start, bytes);
        }
    }

    /// Builder form of [`MemoryImage::insert`].
    #[must_use]
    pub fn with_segment(mut self, start: Address, bytes: Vec<u8>) -> Self {
        self.insert(start, bytes);
        self
    }

    /// Iterates `(start, bytes)` pairs in ascending start order.
    pub fn segments(&self) -> impl Iterator<Item = (Address, &[u8])> + '_ {
        self.segments
            .iter()
            .map(|(start, bytes)| (*start, bytes.as_slice()))
    }

    /// Number of non-empty segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` when the image holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromIterator<(Address, Vec<u8>)> for MemoryImage {
    fn from_iter<T: IntoIterator<Item = (Address, Vec<u8>)>>(iter: T) -> Self {
        let mut image = Self::new();
        for (start, bytes) in iter {
            image.insert(start, bytes);
        }
        image
    }
}

/// Copies `image` into any [`Bus`] one byte at a time.
///
/// Unlike [`Memory::load_image`](super::Memory::load_image) this is not
/// atomic: bytes before the first failing address stay written.
///
/// # Errors
///
/// Returns the first [`MemoryError`] reported by the bus.
pub fn load_image(bus: &mut dyn Bus, image: &MemoryImage) -> Result<(), MemoryError> {
    for (start, bytes) in image.segments() {
        let mut address = start;
        for byte in bytes {
            bus.write_byte(address, *byte)?;
            address = address.wrapping_add(1) & ADDRESS_MASK;
        }
    }
    Ok(())
}
