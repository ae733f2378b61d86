#[cfg(test)]
mod tests {
    use d3armory::{
        ArmoryConfig, ArmoryError, FileStorage, PageFetcher, ProfileService,
        ProfileStore, Result,
    };
    use std::cell::Cell;
    use tempdir::TempDir;
    use url::Url;

    const CAREER: &str = include_str!("fixtures/career.html");
    const HERO: &str = include_str!("fixtures/hero.html");

    #[derive(Default)]
    struct CountingFetcher {
        calls: Cell<usize>,
    }

    impl PageFetcher for CountingFetcher {
        fn fetch(&self, url: &Url) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            if url.path().ends_with('/') {
                Ok(CAREER.to_owned())
            } else {
                Ok(HERO.to_owned())
            }
        }
    }

    fn file_service(
        dir: &TempDir,
    ) -> ProfileService<CountingFetcher, FileStorage> {
        d3armory::initialize();
        let config = ArmoryConfig {
            datafile: dir.path().join("profiles.json"),
            ..Default::default()
        };
        let store = FileStorage::new("profiles".to_string(), &config.datafile);
        ProfileService::new(config, CountingFetcher::default(), store)
    }

    #[test]
    fn test_cache_survives_restart() {
        let temp_dir = TempDir::new("d3armory_test")
            .expect("Failed to create temporary directory");

        let mut first = file_service(&temp_dir);
        let entry = first
            .get_tag("Grom-1234")
            .expect("Failed to fetch tag")
            .clone();
        first
            .get_hero("Grom-1234", "1001")
            .expect("Failed to fetch hero");
        let written = first.profiles().cloned().unwrap();
        assert_eq!(first.fetcher().calls.get(), 2);
        assert_eq!(entry.career.parsed().unwrap().heroes.len(), 4);

        let mut second = file_service(&temp_dir);
        let reloaded = second
            .get_tag("Grom-1234")
            .expect("Failed to read cached tag")
            .clone();
        assert_eq!(second.fetcher().calls.get(), 0);
        assert_eq!(second.profiles(), Some(&written));
        assert!(reloaded.heroes.contains_key("1001"));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let temp_dir = TempDir::new("d3armory_test")
            .expect("Failed to create temporary directory");

        let mut service = file_service(&temp_dir);
        service.get_hero("Grom-1234", "1002").expect("Failed to fetch hero");
        service.get_tag("Other-42").expect("Failed to fetch tag");
        let in_memory = service.profiles().cloned().unwrap();

        let mut storage = FileStorage::new(
            "profiles".to_string(),
            &temp_dir.path().join("profiles.json"),
        );
        let on_disk = storage.load().expect("Failed to read data from disk");
        assert_eq!(in_memory, on_disk);

        storage.save(&on_disk).expect("Failed to write data to disk");
        assert_eq!(storage.load().unwrap(), in_memory);
    }

    #[test]
    fn test_corrupt_cache_fails_lookup() {
        let temp_dir = TempDir::new("d3armory_test")
            .expect("Failed to create temporary directory");
        std::fs::write(temp_dir.path().join("profiles.json"), "not json")
            .unwrap();

        let mut service = file_service(&temp_dir);
        assert!(matches!(
            service.get_tag("Grom-1234"),
            Err(ArmoryError::Storage(..))
        ));
        assert_eq!(service.fetcher().calls.get(), 0);
    }
}
