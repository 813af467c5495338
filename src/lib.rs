pub mod dashboard;
pub mod github;
pub mod server;
pub mod util;
