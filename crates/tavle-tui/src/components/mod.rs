pub mod banner;
pub mod popup;

pub use banner::{Banner, BannerVariant};
pub use popup::{centered_rect, render_popup_block};
