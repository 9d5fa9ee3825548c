//! Dashboard client: summary panels, the sortable score table and the ticker search, rendered
//! into an owned page model that serializes to HTML.

pub mod filter;
pub mod format;
pub mod html;
pub mod page;
pub mod summary;
pub mod table;

pub use page::{Dashboard, PageLayout};
