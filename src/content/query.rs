use serde::Deserialize;

use super::Entity;

/// Query parameters accepted by every list route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring matched against the entity's text fields.
    pub q: Option<String>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    pub category: Option<String>,
}

impl ListQuery {
    /// Filter `items` and sort them into display order.
    pub fn apply<T: Entity>(&self, items: Vec<T>) -> Vec<T> {
        let needle = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));

        let mut items: Vec<T> = items
            .into_iter()
            .filter(|item| self.featured.map_or(true, |f| item.is_featured() == f))
            .filter(|item| self.published.map_or(true, |p| item.is_public() == p))
            .filter(|item| match (category, item.category()) {
                (Some(wanted), Some(own)) => own.eq_ignore_ascii_case(wanted),
                _ => true,
            })
            .filter(|item| {
                needle.as_deref().map_or(true, |n| {
                    item.search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .collect();

        items.sort_by(T::display_order);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        BlogPost, BlogPostDraft, PortfolioDraft, PortfolioItem, Service, ServiceDraft, TeamMember,
        TeamMemberDraft,
    };
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn portfolio(title: &str, category: &str, featured: bool) -> PortfolioItem {
        PortfolioItem::create(
            Uuid::new_v4(),
            PortfolioDraft {
                title: title.into(),
                category: category.into(),
                featured,
                tags: vec!["Next.js".into()],
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = vec![
            portfolio("Fintech Dashboard", "web", false),
            portfolio("Travel App", "mobile", true),
        ];
        let query = ListQuery {
            q: Some("DASH".into()),
            ..Default::default()
        };
        let found = query.apply(items);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Fintech Dashboard");
    }

    #[test]
    fn test_search_matches_tags() {
        let items = vec![portfolio("Fintech Dashboard", "web", false)];
        let query = ListQuery {
            q: Some("next".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(items).len(), 1);
    }

    #[test]
    fn test_featured_and_category_filters() {
        let items = vec![
            portfolio("A", "web", true),
            portfolio("B", "web", false),
            portfolio("C", "Mobile", true),
        ];

        let featured = ListQuery {
            featured: Some(true),
            ..Default::default()
        };
        assert_eq!(featured.apply(items.clone()).len(), 2);

        let mobile = ListQuery {
            category: Some("mobile".into()),
            ..Default::default()
        };
        let found = mobile.apply(items.clone());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "C");

        let all = ListQuery {
            category: Some("All".into()),
            ..Default::default()
        };
        assert_eq!(all.apply(items).len(), 3);
    }

    #[test]
    fn test_published_filter_and_blog_order() {
        let now = Utc::now();
        let older = BlogPost::create(
            Uuid::new_v4(),
            BlogPostDraft {
                title: "Older".into(),
                published: true,
                ..Default::default()
            },
            now - Duration::days(2),
        );
        let newer = BlogPost::create(
            Uuid::new_v4(),
            BlogPostDraft {
                title: "Newer".into(),
                published: true,
                ..Default::default()
            },
            now,
        );
        let draft = BlogPost::create(
            Uuid::new_v4(),
            BlogPostDraft {
                title: "Draft".into(),
                ..Default::default()
            },
            now,
        );

        let query = ListQuery {
            published: Some(true),
            ..Default::default()
        };
        let titles: Vec<String> = query
            .apply(vec![older, draft, newer])
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[test]
    fn test_team_sorted_by_order_index() {
        let member = |name: &str, order_index| {
            TeamMember::create(
                Uuid::new_v4(),
                TeamMemberDraft {
                    name: name.into(),
                    designation: "Engineer".into(),
                    order_index,
                    ..Default::default()
                },
                Utc::now(),
            )
        };
        let sorted =
            ListQuery::default().apply(vec![member("Zed", 2), member("Amy", 1), member("Bob", 1)]);
        let names: Vec<&str> = sorted.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Bob", "Zed"]);
    }

    #[test]
    fn test_category_is_ignored_by_uncategorised_collections() {
        let service = Service::create(
            Uuid::new_v4(),
            ServiceDraft {
                title: "Web Development".into(),
                ..Default::default()
            },
            Utc::now(),
        );
        let query = ListQuery {
            category: Some("web".into()),
            ..Default::default()
        };
        assert_eq!(query.apply(vec![service]).len(), 1);
    }
}
