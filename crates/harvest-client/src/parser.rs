use harvest_core::error::AppError;
use harvest_core::models::ListingStub;
use harvest_core::traits::{ListParser, PriceParser};
use scraper::{ElementRef, Html, Selector};

/// Attributes of the hidden details block that identify one listing.
const STUB_ATTRS: [&str; 5] = [
    "data-id",
    "data-mark-name",
    "data-model-name",
    "data-year",
    "data-link-to-view",
];

/// Extracts listing stubs from a search-results page.
///
/// Each result is a `section.ticket-item` inside `div#searchResults`; the
/// identifying fields live as `data-*` attributes on a hidden `div.hide`
/// block inside the section.
pub struct ScraperListParser {
    results: Selector,
    ticket: Selector,
    details: Selector,
}

impl ScraperListParser {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            results: compile("#searchResults")?,
            ticket: compile("section.ticket-item")?,
            details: compile("div.hide")?,
        })
    }

    fn parse_stub(&self, ticket: ElementRef<'_>) -> Result<ListingStub, AppError> {
        let details = ticket
            .select(&self.details)
            .next()
            .ok_or_else(|| AppError::ParseError("ticket-item has no div.hide block".into()))?;

        let attr = |name: &str| {
            details.value().attr(name).map(str::to_string).ok_or_else(|| {
                AppError::ParseError(format!("ticket-item details block is missing {name}"))
            })
        };

        Ok(ListingStub {
            id: attr(STUB_ATTRS[0])?,
            make: attr(STUB_ATTRS[1])?,
            model: attr(STUB_ATTRS[2])?,
            year: attr(STUB_ATTRS[3])?,
            link: attr(STUB_ATTRS[4])?,
        })
    }
}

impl ListParser for ScraperListParser {
    fn parse_listings(&self, html: &str) -> Result<Vec<ListingStub>, AppError> {
        let document = Html::parse_document(html);

        let results = document
            .select(&self.results)
            .next()
            .ok_or_else(|| AppError::ParseError("no #searchResults container".into()))?;

        results
            .select(&self.ticket)
            .map(|ticket| self.parse_stub(ticket))
            .collect()
    }
}

/// Recovers the price from a listing's detail page.
///
/// The price is the text of the first `<strong>` whose `class` attribute is
/// empty or absent; every other `<strong>` on the page carries a class.
pub struct ScraperPriceParser {
    strong: Selector,
}

impl ScraperPriceParser {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            strong: compile("strong")?,
        })
    }
}

impl PriceParser for ScraperPriceParser {
    fn parse_price(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.strong)
            .find(|el| {
                el.value()
                    .attr("class")
                    .is_none_or(|class| class.trim().is_empty())
            })
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

fn compile(selector: &str) -> Result<Selector, AppError> {
    Selector::parse(selector)
        .map_err(|e| AppError::ParseError(format!("Invalid selector '{selector}': {e}")))
}
