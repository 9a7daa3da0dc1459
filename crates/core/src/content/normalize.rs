//! Bidirectional mapping between storage rows and client shapes.
//!
//! `*_to_client` is total: a missing optional field becomes an empty
//! string, array, or object — null never reaches the client shape.
//! `*_to_storage` takes the editor input plus an explicit language and
//! defaults everything it does not carry. Surrogate id and timestamps on
//! the produced rows are placeholders; the store assigns real values on
//! write.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::family;
use super::language::Language;
use super::model::{
    Career, CareerInput, CareerRow, DownloadRef, Faq, FaqInput, FaqRow, Product, ProductInput,
    ProductRow,
};

fn placeholder_timestamp() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Force the canonical category label onto a product whose content id
/// belongs to a known family. Applied on every read path, never persisted.
pub fn canonicalize_product(mut product: Product) -> Product {
    if let Some(label) = family::canonical_category(&product.content_id, product.language) {
        product.category = label.to_string();
    }
    product
}

pub fn product_to_client(row: &ProductRow) -> Product {
    Product {
        content_id: row.content_id.clone(),
        language: row.language,
        name: row.name.clone(),
        category: row.category.clone().unwrap_or_default(),
        description: row.description.clone().unwrap_or_default(),
        specs: row.specs.as_object().cloned().unwrap_or_default(),
        features: row.features.clone(),
        applications: row.applications.clone(),
        downloads: serde_json::from_value::<Vec<DownloadRef>>(row.downloads.clone())
            .unwrap_or_default(),
        image_url: row.image_url.clone().unwrap_or_default(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn product_to_storage(input: &ProductInput, language: Language) -> ProductRow {
    ProductRow {
        id: Uuid::nil(),
        content_id: input.content_id.trim().to_string(),
        language,
        name: input.name.clone(),
        category: input.category.clone(),
        description: input.description.clone(),
        specs: Value::Object(input.specs.clone().unwrap_or_default()),
        features: input.features.clone().unwrap_or_default(),
        applications: input.applications.clone().unwrap_or_default(),
        downloads: serde_json::to_value(input.downloads.clone().unwrap_or_default())
            .unwrap_or(Value::Array(Vec::new())),
        image_url: input.image_url.clone(),
        is_active: true,
        created_at: placeholder_timestamp(),
        updated_at: placeholder_timestamp(),
    }
}

pub fn career_to_client(row: &CareerRow) -> Career {
    Career {
        content_id: row.content_id.clone(),
        language: row.language,
        title: row.title.clone(),
        location: row.location.clone().unwrap_or_default(),
        employment_type: row.employment_type.clone().unwrap_or_default(),
        description: row.description.clone().unwrap_or_default(),
        requirements: row.requirements.clone(),
        is_published: row.is_published,
        published_at: row.published_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn career_to_storage(input: &CareerInput, language: Language) -> CareerRow {
    CareerRow {
        id: Uuid::nil(),
        content_id: input.content_id.trim().to_string(),
        language,
        title: input.title.clone(),
        location: input.location.clone(),
        employment_type: input.employment_type.clone(),
        description: input.description.clone(),
        requirements: input.requirements.clone().unwrap_or_default(),
        is_published: input.is_published,
        // Derived by the store on write; see RecordStore::upsert_career.
        published_at: None,
        is_active: true,
        created_at: placeholder_timestamp(),
        updated_at: placeholder_timestamp(),
    }
}

pub fn faq_to_client(row: &FaqRow) -> Faq {
    Faq {
        content_id: row.content_id.clone(),
        language: row.language,
        question: row.question.clone(),
        answer: row.answer.clone(),
        category: row.category.clone(),
        order_index: row.order_index,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn faq_to_storage(input: &FaqInput, language: Language) -> FaqRow {
    FaqRow {
        id: Uuid::nil(),
        content_id: input.content_id.trim().to_string(),
        language,
        question: input.question.clone(),
        answer: input.answer.clone(),
        category: input.category.clone().unwrap_or_default(),
        order_index: input.order_index.unwrap_or(0),
        is_active: true,
        created_at: placeholder_timestamp(),
        updated_at: placeholder_timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;

    fn sample_input() -> ProductInput {
        let mut specs = Map::new();
        specs.insert("wavelength".to_string(), json!("650 nm"));
        specs.insert("power".to_string(), json!("5 mW"));
        ProductInput {
            content_id: "mvpulse-2".to_string(),
            name: "MVpulse 2".to_string(),
            category: Some("Laser".to_string()),
            description: Some("Gepulstes Lasermodul".to_string()),
            specs: Some(specs),
            features: Some(vec!["TTL-Modulation".to_string()]),
            applications: Some(vec!["Bildverarbeitung".to_string()]),
            downloads: Some(vec![DownloadRef {
                label: "Datenblatt".to_string(),
                url: "https://assets.example.com/mvpulse-2.pdf".to_string(),
            }]),
            image_url: Some("https://assets.example.com/mvpulse-2.jpg".to_string()),
        }
    }

    #[test]
    fn storage_client_round_trip_preserves_fields() {
        let input = sample_input();
        let row = product_to_storage(&input, Language::De);
        let client = product_to_client(&row);

        assert_eq!(client.content_id, input.content_id);
        assert_eq!(client.language, Language::De);
        assert_eq!(client.name, input.name);
        assert_eq!(client.category, "Laser");
        assert_eq!(client.description, "Gepulstes Lasermodul");
        assert_eq!(Some(client.specs), input.specs);
        assert_eq!(Some(client.features), input.features);
        assert_eq!(Some(client.applications), input.applications);
        assert_eq!(Some(client.downloads), input.downloads);
        assert_eq!(client.image_url, "https://assets.example.com/mvpulse-2.jpg");
    }

    #[test]
    fn client_shape_is_total_over_sparse_rows() {
        let input = ProductInput {
            content_id: "ld-650-5".to_string(),
            name: "LD-650-5".to_string(),
            ..ProductInput::default()
        };
        let client = product_to_client(&product_to_storage(&input, Language::En));
        assert_eq!(client.category, "");
        assert_eq!(client.description, "");
        assert!(client.specs.is_empty());
        assert!(client.features.is_empty());
        assert!(client.downloads.is_empty());
        assert_eq!(client.image_url, "");
    }

    #[test]
    fn canonicalization_overrides_stored_category() {
        let row = product_to_storage(&sample_input(), Language::De);
        let client = canonicalize_product(product_to_client(&row));
        assert_eq!(client.category, "Machine Vision Lasermodule");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let row = product_to_storage(&sample_input(), Language::En);
        let once = canonicalize_product(product_to_client(&row));
        let twice = canonicalize_product(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn canonicalization_leaves_unknown_families_alone() {
        let input = ProductInput {
            content_id: "ld-650-5".to_string(),
            name: "LD-650-5".to_string(),
            category: Some("Punktlaser".to_string()),
            ..ProductInput::default()
        };
        let client = canonicalize_product(product_to_client(&product_to_storage(
            &input,
            Language::De,
        )));
        assert_eq!(client.category, "Punktlaser");
    }

    #[test]
    fn career_round_trip_defaults_published_at() {
        let input = CareerInput {
            content_id: "dev-embedded".to_string(),
            title: "Embedded Developer".to_string(),
            is_published: true,
            ..CareerInput::default()
        };
        let row = career_to_storage(&input, Language::En);
        assert_eq!(row.published_at, None);
        let client = career_to_client(&row);
        assert_eq!(client.title, "Embedded Developer");
        assert_eq!(client.location, "");
        assert!(client.is_published);
    }

    #[test]
    fn faq_round_trip_defaults_order_index() {
        let input = FaqInput {
            content_id: "shipping".to_string(),
            question: "How long does shipping take?".to_string(),
            answer: "2-3 business days".to_string(),
            ..FaqInput::default()
        };
        let row = faq_to_storage(&input, Language::En);
        assert_eq!(row.order_index, 0);
        assert_eq!(row.category, "");
        assert_eq!(faq_to_client(&row).question, input.question);
    }
}
