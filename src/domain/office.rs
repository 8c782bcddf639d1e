// src/domain/office.rs
use serde::Serialize;

/// Static description of the office. Built per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OfficeInfo {
    pub name: &'static str,
    pub address: &'static str,
    pub description: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub whatsapp: &'static str,
    pub facebook: &'static str,
    pub instagram: &'static str,
}

impl Default for OfficeInfo {
    fn default() -> Self {
        Self {
            name: "מי נדל\"ן",
            address: "בן צבי 24, בית שמש",
            description: "ב\"מי נדל\"ן\", בן צבי 24, עומד לרשותכם צוות הסוכנים איתמר, מתן, עדן וליטל. \
                          אנו מתמחים בשוק הנדל\"ן בבית שמש ומתחייבים למקצועיות, יחס אישי ושקיפות מלאה. \
                          בואו להגשים את החלום שלכם איתנו.",
            phone: "052-1234567",
            email: "info@minadlan.co.il",
            whatsapp: "052-1234567",
            facebook: "https://facebook.com/minadlan",
            instagram: "https://instagram.com/minadlan",
        }
    }
}
