use chrono::{DateTime, Utc};

/// Identifying fields of one listing as they appear on a search-results page.
///
/// All fields are the raw `data-*` attribute values from the markup. `year`
/// stays a string on purpose: the site emits it as free text and the harvester
/// passes site data through untouched.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListingStub {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: String,
    /// Site-relative link to the listing's detail page.
    pub link: String,
}

/// A fully assembled listing record, ready for the sinks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Listing {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub link: String,
    /// Price text from the detail page, or `"N/A"` when none was found.
    pub price: String,
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    /// Column names, in canonical record order.
    pub const FIELD_NAMES: [&'static str; 7] =
        ["id", "make", "model", "year", "link", "price", "scraped_at"];

    /// Assemble a record from a stub and the price recovered from its
    /// detail page, stamped with the current time.
    pub fn from_stub(stub: ListingStub, price: Option<String>) -> Self {
        Self {
            id: stub.id,
            make: stub.make,
            model: stub.model,
            year: stub.year,
            link: stub.link,
            price: price.unwrap_or_else(|| "N/A".to_string()),
            scraped_at: Utc::now(),
        }
    }

    /// Record cells in canonical order, for delimited sinks.
    pub fn fields(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.make.clone(),
            self.model.clone(),
            self.year.clone(),
            self.link.clone(),
            self.price.clone(),
            self.scraped_at.to_rfc3339(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> ListingStub {
        ListingStub {
            id: "12345".into(),
            make: "Audi".into(),
            model: "A4".into(),
            year: "2018".into(),
            link: "/auto_audi_a4_12345.html".into(),
        }
    }

    #[test]
    fn test_from_stub_with_price() {
        let listing = Listing::from_stub(stub(), Some("15 500 $".into()));
        assert_eq!(listing.id, "12345");
        assert_eq!(listing.price, "15 500 $");
    }

    #[test]
    fn test_from_stub_without_price_fills_na() {
        let listing = Listing::from_stub(stub(), None);
        assert_eq!(listing.price, "N/A");
    }

    #[test]
    fn test_fields_match_header_order() {
        let listing = Listing::from_stub(stub(), Some("100".into()));
        let fields = listing.fields();
        assert_eq!(fields.len(), Listing::FIELD_NAMES.len());
        assert_eq!(fields[0], "12345");
        assert_eq!(fields[5], "100");
        // scraped_at renders as RFC 3339
        assert!(fields[6].contains('T'));
    }
}
