//! Walks through every operation against a running bookshelf backend.
//!
//! Run with: `BOOKSHELF_API_URL=http://127.0.0.1:8001/api cargo run --example crud_tour`

use bookshelf_client::{Client, Error, DEFAULT_BASE_URL_ENV};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("bookshelf_client=debug,crud_tour=info")
        .init();

    let client = Client::builder()
        .base_url_from_env(DEFAULT_BASE_URL_ENV)?
        .build()?;

    println!("=== Categories ===");
    let category = client
        .categories()
        .create(&json!({"title": "Science Fiction"}))
        .await?;
    let category_id = category.data["id"].clone();
    println!("Created category: {}", category.data);

    println!("=== Authors ===");
    let nationalities = client.authors().list_nationalities().await?;
    println!("Known nationalities: {}", nationalities.data);

    let author = client
        .authors()
        .create(&json!({"name": "Frank Herbert", "nationality": "US"}))
        .await?;
    let author_id = author.data["id"].clone();
    println!("Created author: {}", author.data);

    println!("=== Books ===");
    let book = client
        .books()
        .create(&json!({
            "title": "Dune",
            "author": author_id,
            "category": category_id,
        }))
        .await?;
    let book_id = display_id(&book.data["id"]);
    println!("Created book {} in {:?}", book_id, book.latency);

    let updated = client
        .books()
        .update(&book_id, &json!({"title": "Dune (1965)"}))
        .await?;
    println!("Updated book: {}", updated.data);

    let books = client.books().list().await?;
    println!("All books: {}", books.data);

    println!("=== Cleanup ===");
    client.books().delete(&book_id).await?;
    client.authors().delete(display_id(&author_id)).await?;
    client.categories().delete(display_id(&category_id)).await?;

    match client.books().get(&book_id).await {
        Err(e) if e.is_not_found() => println!("Book {} is gone", book_id),
        Ok(response) => println!("Book still present: {}", response.data),
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Backend ids may be numbers or strings; strip the JSON quoting from the latter.
fn display_id(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
