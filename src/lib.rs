//! Scraper and flat-file cache for Diablo III armory profiles.
//!
//! ```no_run
//! use d3armory::{ArmoryConfig, ProfileService};
//!
//! let mut service = ProfileService::from_config(ArmoryConfig::default())?;
//! let entry = service.get_tag("Mytag-1234")?;
//! if let Some(career) = entry.career.parsed() {
//!     println!("{} elite kills", career.kills.elites);
//! }
//! service.get_hero("Mytag-1234", "1234567")?;
//! # Ok::<(), d3armory::ArmoryError>(())
//! ```

use std::sync::Once;

pub mod address;
pub mod config;
pub mod dom;
mod errors;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod service;
pub mod storage;

pub use address::profile_url;
pub use config::ArmoryConfig;
pub use errors::{ArmoryError, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use model::{
    CareerData, HeroPortrait, HeroSummary, ProfileCache, ProfileEntry, Scraped,
};
pub use service::ProfileService;
pub use storage::{FileStorage, ProfileStore};

static INIT: Once = Once::new();

/// Install `env_logger` once, later calls are no-ops.
///
/// Applications with their own logger can skip this.
pub fn initialize() {
    INIT.call_once(|| {
        if env_logger::try_init().is_ok() {
            log::info!("Initializing d3armory");
        }
    });
}
