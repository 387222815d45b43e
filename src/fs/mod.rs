//! Filesystem utilities for forta-tasks.

pub mod atomic;

pub use atomic::atomic_write_file;
