//! Extraction rules for armory pages.
//!
//! Offsets, lengths and selectors below mirror the armory markup exactly.
//! They are not derivable from anything else, so change them only against
//! a fresh page sample.

use scraper::Html;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::dom::{document_title, Query};
use crate::model::{
    ArtisanLevels, CareerData, Gender, HeroPortrait, HeroSummary, Kills,
    Progress, ProgressTracks, Scraped, TimeDistribution,
};
use crate::{ArmoryError, Result};

pub const PROFILE_SCOPE: &str = ".profile-body";

pub const HERO_CLASSES: [&str; 5] =
    ["barbarian", "demon-hunter", "monk", "witch-doctor", "wizard"];
pub const ARTISANS: [&str; 2] = ["blacksmith", "jeweler"];

/// Length of the unit after the number in `span.skill-measure`
const SKILL_UNIT_LEN: usize = 12;
/// Length of `hero-portrait ` in front of `<class>-<gender>`
const PORTRAIT_CLASS_OFFSET: usize = 14;
/// Length of the shared class prefix on other-heroes columns
const COLUMN_CLASS_OFFSET: usize = 5;

/// "Not yet trained" placeholder shown instead of an artisan level
const EN_DASH: &str = "\u{2013}";
const EN_DASH_ENTITY: &str = "&#8211;";

/// Digit grouping used by the localized armories: `12,345`, `12.345`,
/// `12 345` and the no-break space variants
const GROUP_SEPARATORS: [&str; 6] =
    ["&nbsp;", ",", ".", " ", "\u{a0}", "\u{202f}"];

const HEADER_END: &str = "</h3>";
const LINE_BREAK: &str = "<br>";

/// Parse a career profile page.
///
/// A failed fetch is passed through as is, nothing gets extracted from it.
pub fn parse_tag_page(page: Scraped<String>) -> Result<Scraped<CareerData>> {
    page.try_map(|markup| {
        let html = Html::parse_document(&markup);
        let profile = html.root_element().require(PROFILE_SCOPE)?;
        parse_career(&profile)
    })
}

/// Parse a hero page into the fields known to be stable across heroes.
pub fn parse_hero_page(
    hero: &str,
    page: Scraped<String>,
) -> Result<Scraped<HeroSummary>> {
    page.try_map(|markup| {
        let html = Html::parse_document(&markup);
        html.root_element().require(PROFILE_SCOPE)?;
        Ok(HeroSummary {
            id: hero.to_owned(),
            title: document_title(&html)?,
        })
    })
}

/// Extract career data from an element scoped to `.profile-body`
pub fn parse_career<N: Query>(profile: &N) -> Result<CareerData> {
    let kills = Kills {
        lifetime: number_at(profile, ".lifetime .num-kills")?,
        elites: number_at(profile, ".elite .num-kills")?,
    };

    let mut played = BTreeMap::new();
    for class in HERO_CLASSES {
        let selector = format!("#tooltip-bar-{class}");
        let tooltip = profile.require(&selector)?;
        played.insert(
            class.to_owned(),
            time_distribution(&selector, &tooltip.inner_html())?,
        );
    }

    let mut heroes = BTreeMap::new();
    for wrapper in profile.find_all("a.hero-portrait-wrapper")? {
        let hero = top_hero(&wrapper)?;
        log::trace!("top hero {} ({})", hero.id, hero.name);
        heroes.insert(hero.id.clone(), hero);
    }
    for item in profile.find_all(".other-heroes li")? {
        let hero = other_hero(&item)?;
        log::trace!("other hero {} ({})", hero.id, hero.name);
        heroes.insert(hero.id.clone(), hero);
    }

    let progress = ProgressTracks {
        normal: progression(profile, 1)?,
        hardcore: progression(profile, 2)?,
    };

    let mut artisans = BTreeMap::new();
    for artisan in ARTISANS {
        let levels = ArtisanLevels {
            normal: artisan_at(profile, &format!(".{artisan} .normal .value"))?,
            hardcore: artisan_at(
                profile,
                &format!(".{artisan} .hardcore .value"),
            )?,
        };
        artisans.insert(artisan.to_owned(), levels);
    }

    log::debug!(
        "parsed career with {} heroes, {} lifetime kills",
        heroes.len(),
        kills.lifetime
    );
    Ok(CareerData {
        kills,
        played,
        heroes,
        progress,
        artisans,
    })
}

/// Split a time-played tooltip into its three lines.
///
/// Input looks like
/// `<h3>Time Played</h3>42%<br />Highest Level: 60<br />Difficulty: Hell`.
pub fn time_distribution(
    field: &str,
    markup: &str,
) -> Result<TimeDistribution> {
    let header_end = markup
        .find(HEADER_END)
        .ok_or_else(|| ArmoryError::missing(format!("{field} h3")))?;
    let body = markup[header_end + HEADER_END.len()..]
        .replace("<br />", LINE_BREAK)
        .replace("<br/>", LINE_BREAK);

    let lines: Vec<&str> = body.split(LINE_BREAK).collect();
    let [percent, level, difficulty] = lines.as_slice() else {
        return Err(ArmoryError::invalid(field, body.as_str()));
    };

    Ok(TimeDistribution {
        time_percent: parse_number(field, &percent.replace('%', ""))?,
        max_level: parse_number(field, strip_label(level))?,
        max_difficulty: strip_label(difficulty).to_owned(),
    })
}

/// Artisan level, the en-dash placeholder counts as zero
pub fn artisan_level(field: &str, raw: &str) -> Result<u32> {
    let value = raw.trim();
    if value == EN_DASH || value == EN_DASH_ENTITY {
        return Ok(0);
    }
    parse_number(field, value)
}

fn top_hero<N: Query>(wrapper: &N) -> Result<HeroPortrait> {
    const FIELD: &str = "a.hero-portrait-wrapper";

    let href = wrapper
        .attr("href")
        .ok_or_else(|| ArmoryError::missing(format!("{FIELD}[href]")))?;
    let id = last_segment(href).to_owned();

    let mut name = None;
    let mut skill = None;
    let mut level = None;
    let mut portrait = None;
    for span in wrapper.find_all("span")? {
        let Some(class) = span.attr("class") else {
            continue;
        };
        match class {
            "name" => name = Some(span.text().trim().to_owned()),
            "skill-measure" => {
                skill =
                    Some(drop_last_chars(&span.inner_html(), SKILL_UNIT_LEN))
            }
            "level" => {
                level = Some(parse_number::<u32>(
                    &format!("{FIELD} span.level"),
                    &span.inner_html(),
                )?)
            }
            other => portrait = Some(portrait_class(other)?),
        }
    }

    let (class, gender) = portrait.ok_or_else(|| {
        ArmoryError::missing(format!("{FIELD} span.hero-portrait"))
    })?;
    Ok(HeroPortrait {
        id,
        name: name.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.name"))
        })?,
        skill: skill.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.skill-measure"))
        })?,
        level: level.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.level"))
        })?,
        class,
        gender,
    })
}

/// `hero-portrait demon-hunter-female` -> (`demon-hunter`, female)
fn portrait_class(class_attr: &str) -> Result<(String, Gender)> {
    let invalid = || ArmoryError::invalid("hero portrait class", class_attr);
    let tail = class_attr.get(PORTRAIT_CLASS_OFFSET..).ok_or_else(invalid)?;
    let (class, gender) = tail.rsplit_once('-').ok_or_else(invalid)?;
    Ok((class.to_owned(), gender.parse::<Gender>()?))
}

fn other_hero<N: Query>(item: &N) -> Result<HeroPortrait> {
    const FIELD: &str = ".other-heroes li";

    let link = item.require(&format!("{FIELD} a"))?;
    let href = link
        .attr("href")
        .ok_or_else(|| ArmoryError::missing(format!("{FIELD} a[href]")))?;
    let id = last_segment(href).to_owned();

    let mut skill = None;
    let mut name = None;
    let mut level_and_class = None;
    let mut gender = None;
    for span in item.find_all("span")? {
        let class = span.attr("class").unwrap_or_default();
        match class.get(COLUMN_CLASS_OFFSET..).unwrap_or_default() {
            "col-measure" => {
                let text = span.inner_html();
                let value = text.trim().split(' ').next().unwrap_or_default();
                skill = Some(value.to_owned());
            }
            "col-hero" => name = Some(span.text().trim().to_owned()),
            "col-class" => {
                level_and_class = Some(level_and_class_words(&span.text())?)
            }
            "icon-frame" => {
                gender = Some(if span.inner_html().contains("female.png") {
                    Gender::Female
                } else {
                    Gender::Male
                })
            }
            _ => {}
        }
    }

    let (level, class) = level_and_class.ok_or_else(|| {
        ArmoryError::missing(format!("{FIELD} span.col-class"))
    })?;
    Ok(HeroPortrait {
        id,
        name: name.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.col-hero"))
        })?,
        skill: skill.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.col-measure"))
        })?,
        level,
        class,
        gender: gender.ok_or_else(|| {
            ArmoryError::missing(format!("{FIELD} span.icon-frame"))
        })?,
    })
}

/// `60 Demon Hunter` -> (60, `Demon Hunter`)
fn level_and_class_words(text: &str) -> Result<(u32, String)> {
    const FIELD: &str = ".other-heroes li span.col-class";

    let mut words = text.split_whitespace();
    let level = parse_number(FIELD, words.next().unwrap_or_default())?;
    let class = words.collect::<Vec<_>>().join(" ");
    if class.is_empty() {
        return Err(ArmoryError::invalid(FIELD, text));
    }
    Ok((level, class))
}

fn progression<N: Query>(profile: &N, track: u8) -> Result<Progress> {
    let block = format!("#progression-tooltip-{track}");

    let header_selector = format!("{block} h3");
    let header = profile.require(&header_selector)?.inner_html();
    let words: Vec<&str> = header.split(' ').collect();
    let [difficulty, _, act, ..] = words.as_slice() else {
        return Err(ArmoryError::invalid(header_selector, header.as_str()));
    };

    Ok(Progress {
        difficulty: difficulty.trim().to_owned(),
        act: act.trim().to_owned(),
        hero: profile
            .require(&format!("{block} p.hero-name"))?
            .text()
            .trim()
            .to_owned(),
    })
}

fn number_at<N: Query, T: FromStr>(profile: &N, selector: &str) -> Result<T> {
    parse_count(selector, &profile.require(selector)?.inner_html())
}

fn artisan_at<N: Query>(profile: &N, selector: &str) -> Result<u32> {
    artisan_level(selector, &profile.require(selector)?.inner_html())
}

/// Counter with digit grouping, see [`GROUP_SEPARATORS`]
fn parse_count<T: FromStr>(field: &str, raw: &str) -> Result<T> {
    let digits = GROUP_SEPARATORS
        .iter()
        .fold(raw.trim().to_owned(), |text, sep| text.replace(sep, ""));
    digits
        .parse()
        .map_err(|_| ArmoryError::invalid(field, raw))
}

/// Integer with optional surrounding whitespace and thousands separators
fn parse_number<T: FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .replace(',', "")
        .parse()
        .map_err(|_| ArmoryError::invalid(field, raw))
}

/// Drop `Highest Level:`, `Difficulty:` and similar labels
fn strip_label(line: &str) -> &str {
    let line = line.trim();
    match line.split_once(':') {
        Some((_, value)) => value.trim(),
        None => line,
    }
}

fn last_segment(href: &str) -> &str {
    match href.rfind('/') {
        Some(slash) => &href[slash + 1..],
        None => href,
    }
}

fn drop_last_chars(text: &str, count: usize) -> String {
    let keep = text.chars().count().saturating_sub(count);
    text.chars().take(keep).collect()
}
