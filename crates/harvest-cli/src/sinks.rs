use std::fs::File;
use std::path::Path;

use harvest_core::error::AppError;
use harvest_core::models::Listing;
use harvest_core::traits::ListingSink;
use harvest_db::ListingRepository;

/// CSV file sink.
///
/// The header row is written (and flushed) at creation, so an interrupted
/// crawl still leaves a well-formed file behind.
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Create (truncating) the output file and write the header row.
    pub fn create(path: &Path) -> Result<Self, AppError> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| AppError::CsvError(format!("Failed to create {}: {e}", path.display())))?;
        writer
            .write_record(Listing::FIELD_NAMES)
            .map_err(|e| AppError::CsvError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| AppError::CsvError(e.to_string()))?;
        Ok(Self { writer })
    }
}

impl ListingSink for CsvSink {
    async fn write(&mut self, listing: &Listing) -> Result<(), AppError> {
        self.writer
            .write_record(listing.fields())
            .map_err(|e| AppError::CsvError(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.writer
            .flush()
            .map_err(|e| AppError::CsvError(e.to_string()))
    }
}

/// Console sink: one tab-delimited line per record.
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl ListingSink for StdoutSink {
    async fn write(&mut self, listing: &Listing) -> Result<(), AppError> {
        println!("{}", listing.fields().join("\t"));
        Ok(())
    }
}

/// The concrete sinks the CLI can wire up, behind one type so the crawl
/// loop stays statically dispatched.
pub enum SinkKind {
    Csv(CsvSink),
    Db(ListingRepository),
    Stdout(StdoutSink),
}

impl ListingSink for SinkKind {
    async fn write(&mut self, listing: &Listing) -> Result<(), AppError> {
        match self {
            SinkKind::Csv(sink) => sink.write(listing).await,
            SinkKind::Db(sink) => sink.write(listing).await,
            SinkKind::Stdout(sink) => sink.write(listing).await,
        }
    }

    async fn close(&mut self) -> Result<(), AppError> {
        match self {
            SinkKind::Csv(sink) => sink.close().await,
            SinkKind::Db(sink) => sink.close().await,
            SinkKind::Stdout(sink) => sink.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::models::ListingStub;

    fn listing(id: &str, price: Option<&str>) -> Listing {
        Listing::from_stub(
            ListingStub {
                id: id.into(),
                make: "Audi".into(),
                model: "A4".into(),
                year: "2018".into(),
                link: format!("/auto_audi_a4_{id}.html"),
            },
            price.map(Into::into),
        )
    }

    #[tokio::test]
    async fn csv_sink_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write(&listing("1", Some("10 000 $"))).await.unwrap();
        sink.write(&listing("2", None)).await.unwrap();
        sink.close().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,make,model,year,link,price,scraped_at");
        assert!(lines[1].starts_with("1,Audi,A4,2018,/auto_audi_a4_1.html,10 000 $,"));
        assert!(lines[2].contains(",N/A,"));
    }

    #[tokio::test]
    async fn csv_sink_header_survives_abandoned_crawl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");

        // Created but never written to or closed, as after an early abort.
        let sink = CsvSink::create(&path).unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,make,model"));
    }

    #[tokio::test]
    async fn csv_sink_create_fails_on_bad_path() {
        let err = CsvSink::create(Path::new("/nonexistent-dir/cars.csv")).unwrap_err();
        assert!(matches!(err, AppError::CsvError(_)));
    }

    #[tokio::test]
    async fn stdout_sink_accepts_writes() {
        let mut sink = StdoutSink;
        sink.write(&listing("1", Some("100"))).await.unwrap();
        sink.close().await.unwrap();
    }

    #[tokio::test]
    async fn sink_kind_dispatches_to_db() {
        let repo = ListingRepository::in_memory().await.unwrap();
        let mut sink = SinkKind::Db(repo.clone());
        sink.write(&listing("1", Some("100"))).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
