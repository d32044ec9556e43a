// Adapters layer: concrete implementations for external systems (marketplace pages, http)

pub mod html;
pub mod http_source;

pub use html::ListingHtmlParser;
pub use http_source::HttpListingSource;
