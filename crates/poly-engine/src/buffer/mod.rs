//! Free-space bookkeeping for linear vertex and index buffers.
//!
//! A buffer hands out contiguous [`Zone`]s from a [`FreeList`] and returns
//! them on delete. Released zones coalesce with their neighbours so that
//! shape churn keeps producing long contiguous runs.

mod free_list;
mod zone;

pub use free_list::FreeList;
pub use zone::Zone;
