//! Fixed-size slot buffers.
//!
//! Every persistent structure in this crate is a flat file of equally sized
//! slots with no header. A slot is the unit of I/O: one slot read or written
//! is one transfer.

/// A slot index (0-indexed position within a slot file).
///
/// The byte offset of a slot is `index * slot_size`.
pub type SlotIndex = u64;

/// A raw slot buffer of `N` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Slot<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> Slot<N> {
    /// Slot size in bytes.
    pub const SIZE: usize = N;

    /// Slot size as u64 for offset calculations.
    #[allow(clippy::cast_possible_truncation)]
    pub const SIZE_U64: u64 = N as u64;

    /// Create a new zeroed slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: [0u8; N] }
    }

    /// Get the raw slot data.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }

    /// Get mutable access to the raw slot data.
    pub const fn as_bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Read bytes at a specific offset.
    #[must_use]
    pub fn read_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Write bytes at a specific offset.
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Read an i32 (little-endian) at the given offset.
    #[must_use]
    pub const fn read_i32(&self, offset: usize) -> i32 {
        i32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Write an i32 (little-endian) at the given offset.
    pub fn write_i32(&mut self, offset: usize, value: i32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Read an i64 (little-endian) at the given offset.
    #[must_use]
    pub const fn read_i64(&self, offset: usize) -> i64 {
        i64::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
            self.data[offset + 4],
            self.data[offset + 5],
            self.data[offset + 6],
            self.data[offset + 7],
        ])
    }

    /// Write an i64 (little-endian) at the given offset.
    pub fn write_i64(&mut self, offset: usize, value: i64) {
        self.data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }
}

impl<const N: usize> Default for Slot<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> std::fmt::Debug for Slot<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("size", &N)
            .field("first_bytes", &&self.data[..N.min(16)])
            .finish_non_exhaustive()
    }
}
