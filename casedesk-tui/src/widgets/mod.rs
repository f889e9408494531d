//! Reusable widget components.

pub mod detail;
pub mod pager;

pub use detail::DetailPanel;
pub use pager::PageBar;
