use scraper::{ElementRef, Html, Selector};

use crate::{ArmoryError, Result};

/// Selector queries over a parsed document.
///
/// Extraction code only talks to this trait, so it can run against
/// fixture documents or another DOM engine.
pub trait Query: Sized {
    /// First descendant matching `selector`
    fn find_first(&self, selector: &str) -> Result<Option<Self>>;

    /// All descendants matching `selector`, in document order
    fn find_all(&self, selector: &str) -> Result<Vec<Self>>;

    /// Raw markup between the element's tags
    fn inner_html(&self) -> String;

    /// Concatenated text of the element, tags stripped
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<&str>;

    /// Like [`Query::find_first`], but a miss is a `FieldMissing` error
    fn require(&self, selector: &str) -> Result<Self> {
        self.find_first(selector)?
            .ok_or_else(|| ArmoryError::missing(selector))
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ArmoryError::Selector(format!("{selector}: {e:?}")))
}

impl<'a> Query for ElementRef<'a> {
    fn find_first(&self, selector: &str) -> Result<Option<Self>> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).next())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).collect())
    }

    fn inner_html(&self) -> String {
        ElementRef::inner_html(self)
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

/// Text of the document `<title>`, if any
pub fn document_title(html: &Html) -> Result<Option<String>> {
    let selector = compile("title")?;
    Ok(html
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_owned()))
}
