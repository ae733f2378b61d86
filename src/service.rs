use url::Url;

use crate::address::profile_url;
use crate::config::ArmoryConfig;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::model::{ProfileCache, ProfileEntry, Scraped};
use crate::parser::{parse_hero_page, parse_tag_page};
use crate::storage::{FileStorage, ProfileStore};
use crate::{ArmoryError, Result};

/// Fetches armory profiles and keeps them cached.
///
/// The cache is loaded from the store on first use and written back in full
/// after every change. A service owns its cache: two services (or two
/// processes) pointed at the same file will overwrite each other.
pub struct ProfileService<F, S> {
    config: ArmoryConfig,
    fetcher: F,
    store: S,
    profiles: Option<ProfileCache>,
}

impl ProfileService<HttpFetcher, FileStorage> {
    /// Service talking to the armory over HTTP, cached in `config.datafile`
    pub fn from_config(config: ArmoryConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        let store = FileStorage::new("profiles".to_owned(), &config.datafile);
        Ok(Self::new(config, fetcher, store))
    }
}

impl<F: PageFetcher, S: ProfileStore> ProfileService<F, S> {
    pub fn new(config: ArmoryConfig, fetcher: F, store: S) -> Self {
        Self {
            config,
            fetcher,
            store,
            profiles: None,
        }
    }

    /// Career data of a tag, fetched only when the tag is not cached yet.
    ///
    /// A failed fetch is cached and returned as [`Scraped::Failed`], so
    /// check `entry.career` before using it.
    pub fn get_tag(&mut self, tag: &str) -> Result<&ProfileEntry> {
        if self.loaded()?.contains_key(tag) {
            log::debug!("{} served from cache", tag);
        } else {
            let url = profile_url(&self.config, tag, None)?;
            let career = parse_tag_page(self.fetch_page(&url))?;

            self.loaded()?
                .insert(tag.to_owned(), ProfileEntry::new(career));
            if let Err(e) = self.persist() {
                self.loaded()?.remove(tag);
                return Err(e);
            }
        }

        self.loaded()?.get(tag).ok_or_else(|| {
            ArmoryError::Storage(
                "profiles".to_owned(),
                format!("{tag} vanished"),
            )
        })
    }

    /// Fetch one hero of a tag and store it under `entry.heroes[hero]`.
    ///
    /// The tag is fetched first when it is not cached. The hero page itself
    /// is fetched on every call, even when the hero is already cached.
    pub fn get_hero(&mut self, tag: &str, hero: &str) -> Result<()> {
        if !self.loaded()?.contains_key(tag) {
            self.get_tag(tag)?;
        }

        let url = profile_url(&self.config, tag, Some(hero))?;
        let summary = parse_hero_page(hero, self.fetch_page(&url))?;

        let entry = self.loaded()?.get_mut(tag).ok_or_else(|| {
            ArmoryError::Storage(
                "profiles".to_owned(),
                format!("{tag} vanished"),
            )
        })?;
        let previous = entry.heroes.insert(hero.to_owned(), summary);

        if let Err(e) = self.persist() {
            if let Some(entry) = self.loaded()?.get_mut(tag) {
                match previous {
                    Some(previous) => {
                        entry.heroes.insert(hero.to_owned(), previous);
                    }
                    None => {
                        entry.heroes.remove(hero);
                    }
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Profiles in memory, `None` until the first lookup loads them
    pub fn profiles(&self) -> Option<&ProfileCache> {
        self.profiles.as_ref()
    }

    pub fn config(&self) -> &ArmoryConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cache, loaded from the store on first access
    fn loaded(&mut self) -> Result<&mut ProfileCache> {
        if self.profiles.is_none() {
            let profiles = self.store.load()?;
            log::info!("loaded {} cached profiles", profiles.len());
            self.profiles = Some(profiles);
        }
        Ok(self.profiles.get_or_insert_with(ProfileCache::new))
    }

    fn persist(&mut self) -> Result<()> {
        match &self.profiles {
            Some(profiles) => self.store.save(profiles),
            None => Ok(()),
        }
    }

    /// Turn a fetch failure into a cacheable error marker
    fn fetch_page(&self, url: &Url) -> Scraped<String> {
        match self.fetcher.fetch(url) {
            Ok(markup) => Scraped::Parsed(markup),
            Err(e) => {
                log::warn!("failed to fetch {}: {}", url, e);
                Scraped::failed(e.to_string())
            }
        }
    }
}
