use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, NaiveDate};

use crate::domain::EventRecord;

/// Category shown in the card's corner badge. Records carry no type field
/// yet, so every card gets the same label.
pub const CATEGORY_LABEL: &str = "EVENT";
/// Platform short name, used when a record names no organizer.
pub const PLATFORM_LABEL: &str = "RPN";
pub const CURRENCY_UNIT: &str = "FLOW";
pub const DETAIL_ROUTE_TEMPLATE: &str = "/events/:eventId";

const ROUTE_PARAM: &str = ":eventId";

#[derive(Debug)]
pub enum CardError {
    MalformedDate(String),
}

impl Display for CardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::MalformedDate(raw) => write!(f, "unparseable event date: {raw:?}"),
        }
    }
}

impl std::error::Error for CardError {}

/// Calendar-square badge: 3-letter uppercase English month plus day of month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBadge {
    pub month: String,
    pub day: u32,
}

/// Derives the badge from the record's raw date string. Accepts RFC 3339
/// timestamps and bare `%Y-%m-%d` dates. The badge reflects the calendar date
/// as written, in the timestamp's own offset; it never shifts a day to the
/// viewer's time zone.
pub fn derive_date_badge(raw: &str) -> Result<DateBadge, CardError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(DateBadge {
            month: timestamp.format("%b").to_string().to_uppercase(),
            day: timestamp.day(),
        });
    }

    if let Ok(day) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return Ok(DateBadge {
            month: day.format("%b").to_string().to_uppercase(),
            day: day.day(),
        });
    }

    Err(CardError::MalformedDate(raw.to_string()))
}

/// Image region: a photo when the record supplies a usable URI, otherwise a
/// fixed decorative placeholder that needs no network at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRegion {
    Photo { uri: String, alt: String },
    Placeholder,
}

pub fn select_media(image: Option<&str>, title: &str) -> MediaRegion {
    match image {
        Some(uri) if !uri.trim().is_empty() => MediaRegion::Photo {
            uri: uri.to_string(),
            alt: title.to_string(),
        },
        _ => MediaRegion::Placeholder,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceBadge {
    Paid { amount: f64, unit: &'static str },
    Free,
}

/// Anything at or below zero is shown as free; negative prices are display
/// permissiveness inherited from the data, not an error here.
pub fn derive_price_badge(price: f64) -> PriceBadge {
    if price > 0.0 {
        PriceBadge::Paid {
            amount: price,
            unit: CURRENCY_UNIT,
        }
    } else {
        PriceBadge::Free
    }
}

impl PriceBadge {
    pub fn label(&self) -> String {
        match self {
            PriceBadge::Paid { amount, unit } => format!("{} {unit}", format_amount(*amount)),
            PriceBadge::Free => "FREE".to_string(),
        }
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount}")
    }
}

pub fn organizer_label(organizer: Option<&str>) -> String {
    match organizer {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => PLATFORM_LABEL.to_string(),
    }
}

/// "<count> / <quota>", never clamped; an oversubscribed event reads
/// "12 / 10" exactly as stored.
pub fn attendance_line(count: usize, quota: u32) -> String {
    format!("{count} / {quota}")
}

/// Link descriptor for the detail view. Building it performs no navigation;
/// following it is the host's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub href: String,
    pub event_id: String,
}

/// External routing capability: turn an event id into a detail link. The
/// presenter supplies the stringified id and does not know whether the route
/// exists.
pub trait DetailRouter {
    fn detail_link(&self, event_id: &str) -> DetailLink;
}

pub struct TemplateRouter {
    template: String,
}

impl TemplateRouter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Default for TemplateRouter {
    fn default() -> Self {
        Self::new(DETAIL_ROUTE_TEMPLATE)
    }
}

impl DetailRouter for TemplateRouter {
    fn detail_link(&self, event_id: &str) -> DetailLink {
        DetailLink {
            href: self.template.replace(ROUTE_PARAM, event_id),
            event_id: event_id.to_string(),
        }
    }
}

/// Everything a card renders, fully derived. `date` is `None` when the
/// record's date would not parse; renderers show a dash there instead of
/// dropping the card.
#[derive(Debug, Clone)]
pub struct CardView {
    pub media: MediaRegion,
    pub category: &'static str,
    pub date: Option<DateBadge>,
    pub location: String,
    pub title: String,
    pub description: String,
    pub organizer: String,
    pub attendance: String,
    pub price: PriceBadge,
    pub detail_link: DetailLink,
}

impl CardView {
    pub fn date_month(&self) -> &str {
        self.date.as_ref().map(|badge| badge.month.as_str()).unwrap_or("—")
    }

    pub fn date_day(&self) -> String {
        self.date
            .as_ref()
            .map(|badge| badge.day.to_string())
            .unwrap_or_else(|| "—".to_string())
    }
}

/// One record in, one render description out. Pure and idempotent; the host
/// re-invokes this on every render pass.
pub fn compose(event: &EventRecord, router: &dyn DetailRouter) -> CardView {
    tracing::debug!(
        event_id = %event.id,
        title = %event.title,
        date = %event.date,
        price = event.price,
        "composing event card"
    );

    let date = match derive_date_badge(&event.date) {
        Ok(badge) => Some(badge),
        Err(CardError::MalformedDate(_)) => None,
    };

    CardView {
        media: select_media(event.image.as_deref(), &event.title),
        category: CATEGORY_LABEL,
        date,
        location: event.location.clone(),
        title: event.title.clone(),
        description: event.description.clone(),
        organizer: organizer_label(event.organizer.as_deref()),
        attendance: attendance_line(event.attendee_count(), event.quota),
        price: derive_price_badge(event.price),
        detail_link: router.detail_link(&event.id),
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::EventRecord;

    use super::{
        DetailRouter, MediaRegion, PriceBadge, TemplateRouter, attendance_line, compose,
        derive_date_badge, derive_price_badge, organizer_label, select_media,
    };

    fn record() -> EventRecord {
        EventRecord {
            id: "42".to_string(),
            title: "Launch Party".to_string(),
            description: String::new(),
            date: "2024-03-15T00:00:00Z".to_string(),
            location: "Jakarta".to_string(),
            image: None,
            organizer: None,
            price: 0.0,
            quota: 100,
            attendees: Some(Vec::new()),
        }
    }

    #[test]
    fn derives_uppercase_month_and_day() {
        let badge = derive_date_badge("2024-03-15T00:00:00Z").expect("date should parse");
        assert_eq!(badge.month, "MAR");
        assert_eq!(badge.day, 15);

        let badge = derive_date_badge("2026-12-01").expect("date should parse");
        assert_eq!(badge.month, "DEC");
        assert_eq!(badge.day, 1);
    }

    #[test]
    fn keeps_the_written_calendar_date_regardless_of_offset() {
        // Late evening in a -07:00 offset is already the 16th in UTC; the
        // badge must show the date as written.
        let badge = derive_date_badge("2024-03-15T23:30:00-07:00").expect("date should parse");
        assert_eq!(badge.month, "MAR");
        assert_eq!(badge.day, 15);
    }

    #[test]
    fn rejects_unparseable_dates() {
        assert!(derive_date_badge("TBA").is_err());
        assert!(derive_date_badge("").is_err());
        assert!(derive_date_badge("15-03-2024").is_err());
    }

    #[test]
    fn selects_photo_only_for_nonempty_uris() {
        assert_eq!(select_media(None, "Launch Party"), MediaRegion::Placeholder);
        assert_eq!(select_media(Some(""), "Launch Party"), MediaRegion::Placeholder);
        assert_eq!(
            select_media(Some("https://x/y.png"), "Launch Party"),
            MediaRegion::Photo {
                uri: "https://x/y.png".to_string(),
                alt: "Launch Party".to_string(),
            }
        );
    }

    #[test]
    fn treats_zero_and_negative_prices_as_free() {
        assert_eq!(derive_price_badge(0.0), PriceBadge::Free);
        assert_eq!(derive_price_badge(-5.0), PriceBadge::Free);
        assert_eq!(derive_price_badge(0.0).label(), "FREE");
    }

    #[test]
    fn labels_paid_prices_with_the_currency_unit() {
        assert_eq!(derive_price_badge(1.0).label(), "1 FLOW");
        assert_eq!(derive_price_badge(250.0).label(), "250 FLOW");
        assert_eq!(derive_price_badge(2.5).label(), "2.5 FLOW");
    }

    #[test]
    fn falls_back_to_platform_organizer() {
        assert_eq!(organizer_label(None), "RPN");
        assert_eq!(organizer_label(Some("")), "RPN");
        assert_eq!(organizer_label(Some("   ")), "RPN");
        assert_eq!(organizer_label(Some("Acme")), "Acme");
    }

    #[test]
    fn renders_attendance_without_clamping() {
        assert_eq!(attendance_line(0, 50), "0 / 50");
        assert_eq!(attendance_line(3, 10), "3 / 10");
        assert_eq!(attendance_line(12, 10), "12 / 10");
    }

    #[test]
    fn builds_detail_links_from_the_route_template() {
        let router = TemplateRouter::default();
        let link = router.detail_link("42");
        assert_eq!(link.href, "/events/42");
        assert_eq!(link.event_id, "42");
    }

    #[test]
    fn composes_the_full_card_with_fallbacks() {
        let card = compose(&record(), &TemplateRouter::default());

        assert_eq!(card.date_month(), "MAR");
        assert_eq!(card.date_day(), "15");
        assert_eq!(card.media, MediaRegion::Placeholder);
        assert_eq!(card.category, "EVENT");
        assert_eq!(card.price.label(), "FREE");
        assert_eq!(card.organizer, "RPN");
        assert_eq!(card.attendance, "0 / 100");
        assert_eq!(card.detail_link.href, "/events/42");
        assert_eq!(card.location, "Jakarta");
    }

    #[test]
    fn degrades_the_date_slot_when_the_date_is_malformed() {
        let mut event = record();
        event.date = "when we feel like it".to_string();
        let card = compose(&event, &TemplateRouter::default());

        assert!(card.date.is_none());
        assert_eq!(card.date_month(), "—");
        assert_eq!(card.date_day(), "—");
        // Everything else still renders.
        assert_eq!(card.title, "Launch Party");
        assert_eq!(card.attendance, "0 / 100");
    }
}
