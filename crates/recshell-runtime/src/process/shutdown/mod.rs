//! Graceful worker shutdown.
//!
//! SIGTERM first so the worker can close files it is downloading into, then a
//! hard kill once the grace period runs out.

mod child;

pub use child::shutdown_child;
