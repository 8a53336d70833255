//! Components that live outside the mount point and react to Store events.

pub mod header;

pub use header::Header;
