pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, FooterStatus};
pub use header::{draw_header, header_title};
pub use utils::{card_color, grid_rows, source_label, step_selection, truncate};
