use std::sync::Arc;

use filmdelta_core::{FilmdeltaScraper, MetadataSource, MovieRecord, UNKNOWN};

/// Stand-in for the IMDb/TVDB collaborators so the example only exercises
/// the filmdelta and CDON pipelines.
struct NoSource;

#[async_trait::async_trait]
impl MetadataSource for NoSource {
    async fn scan(&self, _record: &mut MovieRecord) -> bool {
        true
    }
}

fn shown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = FilmdeltaScraper::new(Arc::new(NoSource), Arc::new(NoSource))?;

    let mut record = MovieRecord::new();
    record.title = Some("Låt den rätte komma in".to_string());
    record.year = Some("2008".to_string());

    println!("🔍 Söker efter '{}'...\n", shown(&record.title));
    scraper.scan(&mut record).await;

    match record.id("filmdelta") {
        Some(id) => println!("Filmdelta-id: {}", id),
        None => println!("Ingen träff på filmdelta."),
    }

    println!("Titel: {}", shown(&record.title));
    println!("Originaltitel: {}", shown(&record.original_title));
    println!("Land: {}", shown(&record.country));
    println!("År: {}", shown(&record.year));
    println!("Längd: {} min", shown(&record.runtime));
    if record.rating >= 0 {
        println!("Betyg: {}/100", record.rating);
    }
    if !record.genres.is_empty() {
        println!("Genre: {}", record.genres.join(", "));
    }
    println!("Regissör: {}", shown(&record.director));
    if !record.cast.is_empty() {
        println!("Skådespelare: {}", record.cast.join(", "));
    }
    println!("Handling: {}", shown(&record.plot));
    println!("Omslag: {}", shown(&record.poster_url));

    Ok(())
}
