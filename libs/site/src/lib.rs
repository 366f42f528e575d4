//! Public site client
//!
//! Loads published content from the API (or the local fallback cache),
//! resolves the seasonal theme into presentation variables and groups
//! projects into category galleries.
//!
//! ```rust,no_run
//! use site::{LocalCache, RemoteSource, SiteSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let remote = RemoteSource::from_env()?;
//!     let local = LocalCache::from_env();
//!     let settings = SiteSettings::load(&remote, &local).await;
//!     println!("{}", settings.css());
//!     for section in settings.gallery() {
//!         println!("{}: {} of {}", section.label, section.items.len(), section.total);
//!     }
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod error;
pub mod gallery;
pub mod local;
pub mod remote;
pub mod settings;
pub mod snapshot;
pub mod theme;

pub use error::{SiteError, SiteResult};
pub use gallery::{GallerySection, ITEMS_PER_CATEGORY};
pub use local::{CachedSettings, LocalCache};
pub use remote::RemoteSource;
pub use settings::{ContentSource, SiteSettings};
pub use snapshot::Snapshot;
