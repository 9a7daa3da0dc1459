//! Product family rules for category canonicalization.
//!
//! Historically the stored category strings for a handful of product
//! families drifted between spellings. Any `content_id` equal to or
//! prefixed by a known family name presents one fixed label per language
//! at read time, regardless of what is persisted.

use super::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFamily {
    /// Lowercase family name; matched against the start of the content id.
    pub id: &'static str,
    pub label_de: &'static str,
    pub label_en: &'static str,
}

impl ProductFamily {
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::De => self.label_de,
            Language::En => self.label_en,
        }
    }
}

/// Known families. Longer names first so a more specific family wins over
/// a shorter one that happens to be its prefix.
pub const PRODUCT_FAMILIES: &[ProductFamily] = &[
    ProductFamily {
        id: "mvpulse",
        label_de: "Machine Vision Lasermodule",
        label_en: "Machine Vision Laser Modules",
    },
    ProductFamily {
        id: "mvnano",
        label_de: "Machine Vision Lasermodule",
        label_en: "Machine Vision Laser Modules",
    },
    ProductFamily {
        id: "mvtube",
        label_de: "Machine Vision Lasermodule",
        label_en: "Machine Vision Laser Modules",
    },
    ProductFamily {
        id: "lumiline",
        label_de: "Linienlaser",
        label_en: "Line Lasers",
    },
];

/// Find the canonical category label for a content id, if any family
/// matches. Matching is case-insensitive equality or prefix.
pub fn canonical_category(content_id: &str, language: Language) -> Option<&'static str> {
    let id = content_id.trim().to_ascii_lowercase();
    PRODUCT_FAMILIES
        .iter()
        .find(|family| id.starts_with(family.id))
        .map(|family| family.label(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_family_name_matches() {
        assert_eq!(
            canonical_category("mvpulse", Language::De),
            Some("Machine Vision Lasermodule")
        );
    }

    #[test]
    fn prefixed_ids_match() {
        assert_eq!(
            canonical_category("mvpulse-2", Language::De),
            Some("Machine Vision Lasermodule")
        );
        assert_eq!(
            canonical_category("mvnano-05-green", Language::En),
            Some("Machine Vision Laser Modules")
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            canonical_category("MVpulse-2", Language::En),
            Some("Machine Vision Laser Modules")
        );
    }

    #[test]
    fn unknown_ids_do_not_match() {
        assert_eq!(canonical_category("ld-650-5", Language::De), None);
        assert_eq!(canonical_category("", Language::En), None);
    }
}
