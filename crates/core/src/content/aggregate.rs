//! Aggregation of flat per-language rows into the partitioned response
//! shapes the site consumes.
//!
//! Every function here normalizes its input order before grouping, so the
//! output is a deterministic function of the row *set* — repeated fetches
//! of unchanged data, in whatever order the store returns it, produce
//! byte-identical responses.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::language::Language;
use super::model::{Career, CareerRow, Catalog, Faq, FaqGroup, FaqRow, Product, ProductRow};
use super::normalize;

/// Partition active product rows by language, canonicalizing categories.
pub fn partition_products(mut rows: Vec<ProductRow>) -> Catalog<Product> {
    rows.retain(|row| row.is_active);
    rows.sort_by(|a, b| {
        a.content_id
            .cmp(&b.content_id)
            .then_with(|| a.language.cmp(&b.language))
    });

    let mut catalog = Catalog::default();
    for row in &rows {
        let product = normalize::canonicalize_product(normalize::product_to_client(row));
        catalog.push(row.language, product);
    }
    catalog
}

/// Partition active career rows by language, ordered by `published_at`
/// descending with nulls last, then content id, then language.
pub fn partition_careers(mut rows: Vec<CareerRow>) -> Catalog<Career> {
    rows.retain(|row| row.is_active);
    rows.sort_by(|a, b| {
        let recency = match (a.published_at, b.published_at) {
            (Some(a_ts), Some(b_ts)) => b_ts.cmp(&a_ts),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        recency
            .then_with(|| a.content_id.cmp(&b.content_id))
            .then_with(|| a.language.cmp(&b.language))
    });

    let mut catalog = Catalog::default();
    for row in &rows {
        catalog.push(row.language, normalize::career_to_client(row));
    }
    catalog
}

/// Partition active FAQ rows by language, then group each partition by
/// exact category match. Categories come out lexicographically; questions
/// within a category by `order_index` ascending, ties in storage-key
/// order.
pub fn group_faqs(mut rows: Vec<FaqRow>) -> Catalog<FaqGroup> {
    rows.retain(|row| row.is_active);
    // Normalize to the storage fetch order so grouping is independent of
    // the order rows arrive in.
    rows.sort_by(|a, b| {
        a.content_id
            .cmp(&b.content_id)
            .then_with(|| a.language.cmp(&b.language))
    });

    let mut catalog = Catalog::default();
    for language in Language::ALL {
        let mut by_category: BTreeMap<&str, Vec<Faq>> = BTreeMap::new();
        for row in rows.iter().filter(|row| row.language == language) {
            by_category
                .entry(row.category.as_str())
                .or_default()
                .push(normalize::faq_to_client(row));
        }
        for (category, mut questions) in by_category {
            questions.sort_by_key(|faq| faq.order_index);
            catalog.push(
                language,
                FaqGroup {
                    category: category.to_string(),
                    questions,
                },
            );
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn faq_row(content_id: &str, language: Language, category: &str, order_index: i32) -> FaqRow {
        FaqRow {
            id: Uuid::nil(),
            content_id: content_id.to_string(),
            language,
            question: format!("Q {content_id}"),
            answer: format!("A {content_id}"),
            category: category.to_string(),
            order_index,
            is_active: true,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    fn career_row(
        content_id: &str,
        language: Language,
        published_at: Option<DateTime<Utc>>,
    ) -> CareerRow {
        CareerRow {
            id: Uuid::nil(),
            content_id: content_id.to_string(),
            language,
            title: format!("Job {content_id}"),
            location: None,
            employment_type: None,
            description: None,
            requirements: Vec::new(),
            is_published: published_at.is_some(),
            published_at,
            is_active: true,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    fn product_row(content_id: &str, language: Language, category: &str) -> ProductRow {
        ProductRow {
            id: Uuid::nil(),
            content_id: content_id.to_string(),
            language,
            name: content_id.to_uppercase(),
            category: Some(category.to_string()),
            description: None,
            specs: serde_json::json!({}),
            features: Vec::new(),
            applications: Vec::new(),
            downloads: serde_json::json!([]),
            image_url: None,
            is_active: true,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn faq_grouping_is_input_order_independent() {
        let rows = vec![
            faq_row("shipping", Language::De, "Versand", 2),
            faq_row("returns", Language::De, "Versand", 1),
            faq_row("warranty", Language::De, "Service", 5),
            faq_row("shipping", Language::En, "Shipping", 2),
            faq_row("payment", Language::De, "Versand", 1),
        ];

        let mut shuffled = rows.clone();
        shuffled.reverse();
        shuffled.swap(0, 2);

        let a = group_faqs(rows);
        let b = group_faqs(shuffled);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn faq_categories_sort_lexicographically_questions_by_order_index() {
        let catalog = group_faqs(vec![
            faq_row("shipping", Language::De, "Versand", 2),
            faq_row("returns", Language::De, "Versand", 1),
            faq_row("warranty", Language::De, "Service", 5),
        ]);

        let categories: Vec<&str> = catalog.de.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Service", "Versand"]);
        let versand: Vec<&str> = catalog.de[1]
            .questions
            .iter()
            .map(|q| q.content_id.as_str())
            .collect();
        assert_eq!(versand, vec!["returns", "shipping"]);
        assert!(catalog.en.is_empty());
    }

    #[test]
    fn faq_order_index_ties_break_by_storage_key_order() {
        let catalog = group_faqs(vec![
            faq_row("zeta", Language::En, "General", 1),
            faq_row("alpha", Language::En, "General", 1),
        ]);
        let ids: Vec<&str> = catalog.en[0]
            .questions
            .iter()
            .map(|q| q.content_id.as_str())
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn careers_order_newest_first_nulls_last() {
        let t1 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap();
        let catalog = partition_careers(vec![
            career_row("a-draft", Language::De, None),
            career_row("b-old", Language::De, Some(t1)),
            career_row("c-new", Language::De, Some(t2)),
        ]);
        let ids: Vec<&str> = catalog.de.iter().map(|c| c.content_id.as_str()).collect();
        assert_eq!(ids, vec!["c-new", "b-old", "a-draft"]);
    }

    #[test]
    fn careers_tie_break_is_content_id_then_language() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let catalog = partition_careers(vec![
            career_row("b", Language::En, Some(t)),
            career_row("a", Language::En, Some(t)),
            career_row("a", Language::De, Some(t)),
        ]);
        let de: Vec<&str> = catalog.de.iter().map(|c| c.content_id.as_str()).collect();
        let en: Vec<&str> = catalog.en.iter().map(|c| c.content_id.as_str()).collect();
        assert_eq!(de, vec!["a"]);
        assert_eq!(en, vec!["a", "b"]);
    }

    #[test]
    fn inactive_rows_are_excluded_everywhere() {
        let mut inactive = product_row("mvpulse-2", Language::De, "Laser");
        inactive.is_active = false;
        let catalog = partition_products(vec![
            inactive,
            product_row("ld-650-5", Language::En, "Punktlaser"),
        ]);
        assert!(catalog.de.is_empty());
        assert_eq!(catalog.en.len(), 1);
    }

    #[test]
    fn partitioned_products_carry_canonical_categories() {
        let catalog = partition_products(vec![
            product_row("mvpulse-2", Language::De, "Laser"),
            product_row("mvpulse-2", Language::En, "Lasers"),
        ]);
        assert_eq!(catalog.de[0].category, "Machine Vision Lasermodule");
        assert_eq!(catalog.en[0].category, "Machine Vision Laser Modules");
    }
}
