pub mod ip;
pub mod text;

pub use ip::extract_client_ip;
pub use text::{clip, contains_ignore_case, strip_html, take_words};
