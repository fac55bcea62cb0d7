//! Read-only catalog route handlers: home, category pages, and search.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::catalog::{CatalogItem, CatalogService, Category};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Catalog listing template, shared by home, category pages, and search.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub heading: String,
    pub products: Vec<CatalogItem>,
    pub search_query: Option<String>,
    pub current_user: Option<CurrentUser>,
}

/// Display the full active catalog.
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(current_user): OptionalUser,
) -> Result<CatalogTemplate> {
    let products = CatalogService::new(state.stripe()).list_all().await?;

    Ok(CatalogTemplate {
        heading: "Produktet tona".to_string(),
        products,
        search_query: None,
        current_user,
    })
}

/// Shared handler body for the fixed category pages.
async fn category_page(
    state: &AppState,
    current_user: Option<CurrentUser>,
    category: Category,
) -> Result<CatalogTemplate> {
    let products = CatalogService::new(state.stripe())
        .list_by_category(category)
        .await?;

    Ok(CatalogTemplate {
        heading: category.title().to_string(),
        products,
        search_query: None,
        current_user,
    })
}

/// Dairy products.
pub async fn produkte_bulmeti(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Bulmet).await
}

/// Animal products.
pub async fn produkte_shtazore(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Shtazore).await
}

/// Fruit.
pub async fn fruta(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Fruta).await
}

/// Vegetables.
pub async fn perime(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Perime).await
}

/// Drinks.
pub async fn pije(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Pije).await
}

/// Everything else.
pub async fn tjera(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<CatalogTemplate> {
    category_page(&state, user, Category::Tjera).await
}

/// Name-substring search across active products.
pub async fn search(
    State(state): State<AppState>,
    OptionalUser(current_user): OptionalUser,
    Query(query): Query<SearchQuery>,
) -> Result<CatalogTemplate> {
    let q = query.q.unwrap_or_default();
    let products = CatalogService::new(state.stripe()).search(&q).await?;

    Ok(CatalogTemplate {
        heading: "Rezultatet e kërkimit".to_string(),
        products,
        search_query: Some(q),
        current_user,
    })
}
