//! Input sources for validation.
//!
//! Only the filesystem source exists today (`fs` module). Sessions themselves
//! accept any `Read`, so other sources plug in without touching the core.

pub mod fs;
