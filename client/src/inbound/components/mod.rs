//! Presentational pieces shared by the pages.

mod form_field;
mod image_card;
mod sidebar;

pub use form_field::{FieldKind, FormField};
pub use image_card::{DeleteState, ImageCard, data_url, format_date};
pub use sidebar::{NavItem, NavTarget, Sidebar, UserBadge};
