pub mod aggregate;
pub mod counts;
pub mod render;

pub use aggregate::{PullRequestSource, aggregate};
pub use counts::{Counts, Tally};
pub use render::render_page;
