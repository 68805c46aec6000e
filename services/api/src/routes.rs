use crate::infra::{AppState, BooksHandle};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use funding_desk::error::AppError;
use funding_desk::listing::books::{BookFilter, BookRow, BookSort, NewBook, PriceTier, StockTier};
use funding_desk::listing::ListQueryState;
use funding_desk::store::{ApplicationStore, NotificationSink};
use funding_desk::wizard::router::{intake_router, IntakeState};

pub(crate) fn with_intake_routes<S, N>(state: Arc<IntakeState<S, N>>) -> axum::Router
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    intake_router(state)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/catalog/books",
            axum::routing::get(list_books_endpoint).post(create_book_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BookListParams {
    search: Option<String>,
    stock: Option<String>,
    price: Option<String>,
    author: Option<String>,
    sort: Option<String>,
}

fn parse_stock_tier(value: &str) -> Option<StockTier> {
    match value {
        "high" => Some(StockTier::High),
        "medium" => Some(StockTier::Medium),
        "low" => Some(StockTier::Low),
        _ => None,
    }
}

fn parse_price_tier(value: &str) -> Option<PriceTier> {
    match value {
        "budget" => Some(PriceTier::Budget),
        "midrange" => Some(PriceTier::Midrange),
        "premium" => Some(PriceTier::Premium),
        _ => None,
    }
}

fn parse_book_sort(value: &str) -> Option<BookSort> {
    match value {
        "title_asc" => Some(BookSort::TitleAsc),
        "title_desc" => Some(BookSort::TitleDesc),
        "author_asc" => Some(BookSort::AuthorAsc),
        "author_desc" => Some(BookSort::AuthorDesc),
        "price_asc" => Some(BookSort::PriceAsc),
        "price_desc" => Some(BookSort::PriceDesc),
        "stock_desc" => Some(BookSort::StockDesc),
        _ => None,
    }
}

fn book_query(params: &BookListParams) -> Result<ListQueryState<BookFilter, BookSort>, String> {
    let mut query = ListQueryState::new();
    if let Some(search) = &params.search {
        query.set_search(search.clone());
    }

    let mut filters = Vec::new();
    if let Some(stock) = &params.stock {
        for value in stock.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let tier =
                parse_stock_tier(value).ok_or_else(|| format!("unknown stock tier '{value}'"))?;
            filters.push(BookFilter::Stock(tier));
        }
    }
    if let Some(price) = &params.price {
        for value in price.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let tier =
                parse_price_tier(value).ok_or_else(|| format!("unknown price tier '{value}'"))?;
            filters.push(BookFilter::Price(tier));
        }
    }
    if let Some(author) = &params.author {
        filters.push(BookFilter::Author(author.clone()));
    }
    query.set_filters(filters);

    if let Some(sort) = &params.sort {
        let sort = parse_book_sort(sort).ok_or_else(|| format!("unknown sort '{sort}'"))?;
        query.set_sort(Some(sort));
    }
    Ok(query)
}

pub(crate) async fn list_books_endpoint(
    Extension(books): Extension<BooksHandle>,
    Query(params): Query<BookListParams>,
) -> Response {
    let query = match book_query(&params) {
        Ok(query) => query,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };
    let records = match books.list_books() {
        Ok(records) => records,
        Err(error) => return AppError::from(error).into_response(),
    };
    let rows: Vec<BookRow> = records.iter().map(BookRow::from_record).collect();
    (StatusCode::OK, Json(query.apply(&rows))).into_response()
}

pub(crate) async fn create_book_endpoint(
    Extension(books): Extension<BooksHandle>,
    Json(entry): Json<NewBook>,
) -> Response {
    if let Err(errors) = entry.validate() {
        let payload = json!({
            "error": "book entry has validation errors",
            "details": errors,
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }
    match books.create_book(entry.into_record()) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
