use url::Url;

use crate::config::ArmoryConfig;
use crate::Result;

/// Formulate an armory URL for a tag, or for one hero of that tag.
///
/// Sample: `http://eu.battle.net/d3/en/profile/Mytag-1234/`. The slash after
/// the tag must stay even without a hero, the armory answers 404 otherwise.
pub fn profile_url(
    config: &ArmoryConfig,
    tag: &str,
    hero: Option<&str>,
) -> Result<Url> {
    let raw = format!(
        "{}://{}.{}/{}/{}/profile/{}/{}",
        config.scheme,
        config.realm,
        config.base,
        config.game,
        config.lang,
        tag,
        hero.unwrap_or_default(),
    );
    log::debug!("profile url for {}: {}", tag, raw);
    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_tag_url_keeps_trailing_slash() {
        let url = profile_url(&ArmoryConfig::default(), "Foo-1234", None)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://eu.battle.net/d3/en/profile/Foo-1234/"
        );
    }

    #[rstest]
    #[case(
        "us",
        "de",
        "https",
        None,
        "https://us.battle.net/d3/de/profile/Bar-42/"
    )]
    #[case(
        "eu",
        "en",
        "http",
        Some("1234567"),
        "http://eu.battle.net/d3/en/profile/Bar-42/1234567"
    )]
    #[case(
        "kr",
        "ko",
        "http",
        Some(""),
        "http://kr.battle.net/d3/ko/profile/Bar-42/"
    )]
    fn overridden_config(
        #[case] realm: &str,
        #[case] lang: &str,
        #[case] scheme: &str,
        #[case] hero: Option<&str>,
        #[case] expected: &str,
    ) {
        let config = ArmoryConfig {
            realm: realm.to_owned(),
            lang: lang.to_owned(),
            scheme: scheme.to_owned(),
            ..Default::default()
        };
        let url = profile_url(&config, "Bar-42", hero).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn malformed_tag_passes_through() {
        let url = profile_url(&ArmoryConfig::default(), "no_digits", None)
            .unwrap();
        assert_eq!(url.path(), "/d3/en/profile/no_digits/");
    }

    #[test]
    fn broken_scheme_is_rejected() {
        let config = ArmoryConfig {
            scheme: "not a scheme".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            profile_url(&config, "Foo-1234", None),
            Err(crate::ArmoryError::Url(_))
        ));
    }
}
