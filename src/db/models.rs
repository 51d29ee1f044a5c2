//! Table mappings for the relational store: one table per content type,
//! one column per field.

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    types::Json,
    FromRow, Postgres,
};

use crate::content::{
    BlogPost, ContactSubmission, Entity, PortfolioItem, Service, TeamMember, Testimonial,
};

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A content type stored in its own table.
pub trait Relational: Entity + for<'r> FromRow<'r, PgRow> {
    const TABLE: &'static str;
    /// Column order shared by `bind_columns`; `id` always comes first.
    const COLUMNS: &'static [&'static str];
    const HAS_SLUG: bool = false;

    /// Bind every column value in `COLUMNS` order.
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl Relational for TeamMember {
    const TABLE: &'static str = "team_members";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "designation",
        "bio",
        "image_url",
        "linkedin_url",
        "twitter_url",
        "github_url",
        "website_url",
        "order_index",
        "created_at",
        "updated_at",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.name)
            .bind(&self.designation)
            .bind(&self.bio)
            .bind(&self.image_url)
            .bind(&self.linkedin_url)
            .bind(&self.twitter_url)
            .bind(&self.github_url)
            .bind(&self.website_url)
            .bind(self.order_index)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Relational for Service {
    const TABLE: &'static str = "services";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "slug",
        "short_description",
        "description",
        "features",
        "technologies",
        "pricing",
        "delivery_time",
        "gradient",
        "seo_title",
        "seo_description",
        "og_image",
        "created_at",
        "updated_at",
    ];
    const HAS_SLUG: bool = true;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.slug)
            .bind(&self.short_description)
            .bind(&self.description)
            .bind(&self.features)
            .bind(&self.technologies)
            .bind(&self.pricing)
            .bind(&self.delivery_time)
            .bind(&self.gradient)
            .bind(&self.seo_title)
            .bind(&self.seo_description)
            .bind(&self.og_image)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Relational for PortfolioItem {
    const TABLE: &'static str = "portfolio_items";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "slug",
        "short_description",
        "description",
        "image_url",
        "gallery_urls",
        "tags",
        "category",
        "client",
        "year",
        "technologies",
        "results",
        "testimonial",
        "featured",
        "seo_title",
        "seo_description",
        "og_image",
        "created_at",
        "updated_at",
    ];
    const HAS_SLUG: bool = true;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.slug)
            .bind(&self.short_description)
            .bind(&self.description)
            .bind(&self.image_url)
            .bind(&self.gallery_urls)
            .bind(&self.tags)
            .bind(&self.category)
            .bind(&self.client)
            .bind(self.year)
            .bind(Json(&self.technologies))
            .bind(Json(&self.results))
            .bind(Json(&self.testimonial))
            .bind(self.featured)
            .bind(&self.seo_title)
            .bind(&self.seo_description)
            .bind(&self.og_image)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Relational for BlogPost {
    const TABLE: &'static str = "blog_posts";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "slug",
        "excerpt",
        "content",
        "author",
        "category",
        "published",
        "published_at",
        "created_at",
        "updated_at",
    ];
    const HAS_SLUG: bool = true;

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.title)
            .bind(&self.slug)
            .bind(&self.excerpt)
            .bind(&self.content)
            .bind(&self.author)
            .bind(&self.category)
            .bind(self.published)
            .bind(self.published_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Relational for Testimonial {
    const TABLE: &'static str = "testimonials";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "designation",
        "company",
        "content",
        "rating",
        "featured",
        "order_index",
        "created_at",
        "updated_at",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.name)
            .bind(&self.designation)
            .bind(&self.company)
            .bind(&self.content)
            .bind(self.rating)
            .bind(self.featured)
            .bind(self.order_index)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Relational for ContactSubmission {
    const TABLE: &'static str = "contact_submissions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "company",
        "service",
        "budget",
        "message",
        "status",
        "created_at",
        "updated_at",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.id)
            .bind(&self.name)
            .bind(&self.email)
            .bind(&self.company)
            .bind(&self.service)
            .bind(&self.budget)
            .bind(&self.message)
            .bind(self.status.as_str())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
