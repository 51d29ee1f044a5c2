use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::content::{BlogPost, Entity, ListQuery};
use crate::markup::{escape_xml, rfc822};
use crate::state::AppState;

const FEED_SIZE: usize = 50;

fn render_item(base_url: &str, post: &BlogPost) -> String {
    let post_url = format!("{}/blog/{}", base_url, post.slug);
    format!(
        "    <item>\n\
               <title>{}</title>\n\
               <link>{}</link>\n\
               <description>{}</description>\n\
               <category>{}</category>\n\
               <pubDate>{}</pubDate>\n\
               <guid isPermaLink=\"true\">{}</guid>\n\
             </item>\n",
        escape_xml(&post.title),
        escape_xml(&post_url),
        escape_xml(&post.excerpt),
        escape_xml(&post.category),
        rfc822(&post.published_or_created()),
        escape_xml(&post_url),
    )
}

pub async fn rss_feed(State(state): State<AppState>) -> Response {
    let posts = match state.content.blog.get_all().await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("RSS feed could not load posts: {}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CONTENT_TYPE, "text/plain")],
                "Service unavailable",
            )
                .into_response();
        }
    };

    // newest published first
    let published: Vec<BlogPost> = ListQuery::default()
        .apply(posts.into_iter().filter(Entity::is_public).collect())
        .into_iter()
        .take(FEED_SIZE)
        .collect();

    let config = &state.config;
    let base_url = config.site_url.trim_end_matches('/');
    let feed_url = format!("{}/rss.xml", base_url);
    let blog_url = format!("{}/blog", base_url);

    let items: String = published
        .iter()
        .map(|post| render_item(base_url, post))
        .collect();

    let last_build_date = published
        .first()
        .map(|post| {
            format!(
                "    <lastBuildDate>{}</lastBuildDate>\n",
                rfc822(&post.published_or_created())
            )
        })
        .unwrap_or_default();

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <language>en-us</language>
    <atom:link href="{}" rel="self" type="application/rss+xml"/>
{}{}  </channel>
</rss>"#,
        escape_xml(&config.site_title),
        escape_xml(&blog_url),
        escape_xml(&config.site_description),
        escape_xml(&feed_url),
        last_build_date,
        items,
    );

    (
        [
            (header::CONTENT_TYPE, "application/rss+xml; charset=utf-8"),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600, stale-while-revalidate=600",
            ),
        ],
        xml,
    )
        .into_response()
}
