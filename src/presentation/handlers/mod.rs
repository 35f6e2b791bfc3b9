mod analyze_query;
mod dynamic_query;
mod extract;
mod health;
mod multipart_form;
mod root;
mod templates;

pub use analyze_query::analyze_query_handler;
pub use dynamic_query::{dynamic_query_advanced_handler, dynamic_query_handler};
pub use extract::extract_handler;
pub use health::health_handler;
pub use root::root_handler;
pub use templates::templates_handler;
