mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::TestApp;

#[tokio::test]
async fn health_reports_store_ok() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/health").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "ok");

    Ok(())
}

#[tokio::test]
async fn empty_listing_has_zero_pages() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body = app.get("/api/articles").await?.json::<Value>().await?;
    assert_eq!(body["articles"], Value::Array(vec![]));
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["currentPage"], 1);

    Ok(())
}

#[tokio::test]
async fn listing_pages_by_six_newest_first() -> Result<()> {
    let app = TestApp::spawn().await?;
    for i in 1..=7 {
        app.seed(&format!("Article {}", i)).await?;
    }

    let first = app.get("/api/articles?page=1").await?.json::<Value>().await?;
    let articles = first["articles"].as_array().cloned().unwrap_or_default();
    assert_eq!(articles.len(), 6);
    assert_eq!(articles[0]["title"], "Article 7");
    assert_eq!(first["totalPages"], 2);
    assert_eq!(first["currentPage"], 1);

    // Summaries carry only the listing fields
    assert!(articles[0].get("_id").is_some());
    assert!(articles[0].get("createdAt").is_some());
    assert!(articles[0].get("coverImage").is_some());
    assert!(articles[0].get("author").is_none());
    assert!(articles[0].get("hashtags").is_none());

    let second = app.get("/api/articles?page=2").await?.json::<Value>().await?;
    let articles = second["articles"].as_array().cloned().unwrap_or_default();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], "Article 1");
    assert_eq!(second["currentPage"], 2);

    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.seed("Only one").await?;

    let body = app.get("/api/articles?page=5").await?.json::<Value>().await?;
    assert_eq!(body["articles"], Value::Array(vec![]));
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["currentPage"], 5);

    Ok(())
}

#[tokio::test]
async fn non_numeric_page_means_first_page() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.seed("First").await?;

    for query in ["?page=abc", "?page=0", "?page=-3", ""] {
        let body = app.get(&format!("/api/articles{}", query)).await?.json::<Value>().await?;
        assert_eq!(body["currentPage"], 1, "query {:?}", query);
        assert_eq!(body["articles"].as_array().map(Vec::len), Some(1));
    }

    Ok(())
}

#[tokio::test]
async fn page_takes_leading_digits() -> Result<()> {
    let app = TestApp::spawn().await?;
    for i in 1..=7 {
        app.seed(&format!("Article {}", i)).await?;
    }

    for query in ["?page=2.5", "?page=2abc", "?page=%202"] {
        let body = app.get(&format!("/api/articles{}", query)).await?.json::<Value>().await?;
        assert_eq!(body["currentPage"], 2, "query {:?}", query);
        assert_eq!(body["articles"][0]["title"], "Article 1", "query {:?}", query);
    }

    Ok(())
}

#[tokio::test]
async fn article_detail_includes_author() -> Result<()> {
    let app = TestApp::spawn().await?;
    let article = app.seed("Detailed").await?;

    let res = app.get(&format!("/api/articles/{}", article.id)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["_id"], article.id.to_string());
    assert_eq!(body["title"], "Detailed");
    assert_eq!(body["author"], "Original Author");
    assert_eq!(body["coverImage"], Value::Null);
    assert!(body.get("hashtags").is_none());

    Ok(())
}

#[tokio::test]
async fn unknown_article_is_404() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get(&format!("/api/articles/{}", uuid::Uuid::new_v4())).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Article not found");

    Ok(())
}

#[tokio::test]
async fn malformed_article_id_is_server_error() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/articles/not-an-id").await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Internal server error");

    Ok(())
}

#[tokio::test]
async fn recent_articles_are_capped() -> Result<()> {
    let app = TestApp::spawn().await?;
    for i in 1..=7 {
        app.seed(&format!("Recent {}", i)).await?;
    }

    let recent = app.get("/api/recent-articles").await?.json::<Value>().await?;
    let articles = recent["articles"].as_array().cloned().unwrap_or_default();
    assert_eq!(articles.len(), 5);
    assert_eq!(articles[0]["title"], "Recent 7");
    // Full documents, not summaries
    assert_eq!(articles[0]["hashtags"], serde_json::json!(["rust", "web"]));

    let index = app.get("/api/recent-articles/index").await?.json::<Value>().await?;
    let articles = index["articles"].as_array().cloned().unwrap_or_default();
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[2]["title"], "Recent 5");

    Ok(())
}

#[tokio::test]
async fn site_directory_is_the_fallback() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/").await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, common::INDEX_PAGE);

    Ok(())
}
