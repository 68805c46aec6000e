use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use funding_desk::config::AppConfig;
use funding_desk::error::AppError;
use funding_desk::programs::ProgramCatalog;
use funding_desk::store::{BookRecord, BookStore, MemoryStore};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builtin catalog, optionally extended with operator JSON files from
/// `APP_PROGRAMS_DIR`.
pub(crate) fn build_catalog(config: &AppConfig) -> Result<ProgramCatalog, AppError> {
    let mut catalog = ProgramCatalog::builtin();
    if let Some(dir) = &config.programs_dir {
        let loaded = catalog.load_dir(dir)?;
        info!(dir = %dir.display(), loaded, "layered program configurations from disk");
    }
    Ok(catalog)
}

/// Starter catalog rows so the books endpoints answer with data out of the
/// box.
pub(crate) fn seed_books(store: &MemoryStore) {
    store.seed_books([
        book("book-001", "Wuthering Heights", "auth-001", "Emily Bronte", 12.5, 250),
        book("book-002", "Jane Eyre", "auth-002", "Charlotte Bronte", 24.0, 150),
        book("book-003", "The Raven", "auth-003", "Edgar Allen Poe", 55.0, 40),
        book("book-004", "Eleonora", "auth-003", "Edgar Allen Poe", 18.0, 120),
        book("book-005", "Howards End", "auth-004", "E. M. Forster", 35.0, 300),
    ]);
}

fn book(id: &str, title: &str, author_id: &str, author: &str, price: f64, stock: i64) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: title.to_string(),
        author_id: author_id.to_string(),
        author_name: author.to_string(),
        price,
        stock,
    }
}

pub(crate) type BooksHandle = Arc<dyn BookStore>;
