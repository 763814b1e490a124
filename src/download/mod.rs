pub mod downloader;
pub mod listing;
pub mod transport;

pub use downloader::Downloader;
pub use listing::{local_path, parse_listing, resolve_url, ListingCache};
pub use transport::{HttpTransport, Transport};
