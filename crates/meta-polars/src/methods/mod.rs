//! DataFrame conversions and the extension trait implementation

mod analysis;
mod extract;
mod frames;
