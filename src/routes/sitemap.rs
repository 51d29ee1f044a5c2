use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::content::{BlogPost, PortfolioItem, Service};
use crate::markup::{escape_xml, w3c_date};
use crate::repo::Stored;
use crate::state::AppState;

/// Pages that always exist: (path, changefreq, priority).
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("", "weekly", "1.0"),
    ("/about", "monthly", "0.8"),
    ("/services", "monthly", "0.9"),
    ("/portfolio", "weekly", "0.9"),
    ("/blog", "daily", "0.8"),
    ("/contact", "yearly", "0.7"),
];

struct UrlEntry {
    loc: String,
    lastmod: Option<DateTime<Utc>>,
    changefreq: &'static str,
    priority: &'static str,
}

/// Slug and last update of every public record in a collection. A store
/// failure drops the section instead of the whole sitemap.
async fn public_pages<T: Stored>(state: &AppState) -> Vec<(String, DateTime<Utc>)> {
    match state.content.repo::<T>().get_all().await {
        Ok(items) => items
            .iter()
            .filter(|item| item.is_public())
            .filter_map(|item| item.slug().map(|s| (s.to_string(), item.updated_at())))
            .collect(),
        Err(e) => {
            tracing::error!(collection = T::COLLECTION, "Sitemap could not load records: {}", e);
            Vec::new()
        }
    }
}

fn render(entries: &[UrlEntry]) -> String {
    let mut urls = String::new();
    for entry in entries {
        urls.push_str("  <url>\n");
        urls.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            urls.push_str(&format!("    <lastmod>{}</lastmod>\n", w3c_date(lastmod)));
        }
        urls.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        urls.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        urls.push_str("  </url>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         {}</urlset>\n",
        urls
    )
}

pub async fn sitemap(State(state): State<AppState>) -> Response {
    let base_url = state.config.site_url.trim_end_matches('/').to_string();

    let mut entries: Vec<UrlEntry> = STATIC_PAGES
        .iter()
        .map(|&(path, changefreq, priority)| UrlEntry {
            loc: format!("{}{}", base_url, path),
            lastmod: None,
            changefreq,
            priority,
        })
        .collect();

    let sections = [
        ("services", "monthly", "0.8", public_pages::<Service>(&state).await),
        ("portfolio", "monthly", "0.7", public_pages::<PortfolioItem>(&state).await),
        ("blog", "weekly", "0.6", public_pages::<BlogPost>(&state).await),
    ];

    for (section, changefreq, priority, pages) in sections {
        entries.extend(pages.into_iter().map(|(slug, updated_at)| UrlEntry {
            loc: format!("{}/{}/{}", base_url, section, slug),
            lastmod: Some(updated_at),
            changefreq,
            priority,
        }));
    }

    (
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600, stale-while-revalidate=600",
            ),
        ],
        render(&entries),
    )
        .into_response()
}
