use chrono::{DateTime, Duration, Utc};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};

const ID_LEN: usize = 8;

/// One listed happening, as supplied by whatever fetched it. The presenter
/// treats records as read-only; `date` stays a raw string and is only parsed
/// when a card is composed, so one bad record cannot poison catalog loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quota: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
}

impl EventRecord {
    pub fn attendee_count(&self) -> usize {
        self.attendees.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn short_title(&self) -> String {
        self.title
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .unwrap_or("(untitled)")
            .to_string()
    }
}

/// Writable fields for a new record; `add_event` assigns the id.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub image: Option<String>,
    pub organizer: Option<String>,
    pub price: f64,
    pub quota: u32,
    pub attendees: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogHeader {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_catalog_name")]
    pub name: String,
}

fn default_catalog_name() -> String {
    "Events".to_string()
}

impl CatalogHeader {
    pub fn new() -> Self {
        Self {
            schema_version: 1,
            created_at: Utc::now(),
            name: default_catalog_name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventCatalog {
    pub header: CatalogHeader,
    pub events: Vec<EventRecord>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self {
            header: CatalogHeader::new(),
            events: Vec::new(),
        }
    }

    pub fn event(&self, id: &str) -> Option<&EventRecord> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn add_event(&mut self, draft: EventDraft) -> String {
        let id = generate_id();
        self.events.push(EventRecord {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            date: draft.date,
            location: draft.location,
            image: draft.image,
            organizer: draft.organizer,
            price: draft.price,
            quota: draft.quota,
            attendees: draft.attendees,
        });
        id
    }
}

pub fn generate_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

struct SampleSeed {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    organizer: Option<&'static str>,
    image: Option<&'static str>,
    // None means the date is computed from today; Some overrides it verbatim,
    // which lets the fixtures include a not-yet-announced date.
    fixed_date: Option<&'static str>,
    price: f64,
    quota: u32,
    attendee_count: usize,
}

const SAMPLE_SEEDS: [SampleSeed; 6] = [
    SampleSeed {
        title: "Launch Party",
        description: "Celebrate the mainnet launch with the core team.",
        location: "Jakarta",
        organizer: None,
        image: None,
        fixed_date: None,
        price: 0.0,
        quota: 100,
        attendee_count: 0,
    },
    SampleSeed {
        title: "Builders Workshop",
        description: "Hands-on smart contract session, laptops required.",
        location: "Bandung",
        organizer: Some("Dev Guild"),
        image: Some("https://cdn.example.net/workshop.png"),
        fixed_date: None,
        price: 25.0,
        quota: 40,
        attendee_count: 12,
    },
    SampleSeed {
        title: "Community Meetup",
        description: "Monthly open meetup, everyone welcome.",
        location: "Surabaya",
        organizer: Some("Acme"),
        image: None,
        fixed_date: None,
        price: 0.0,
        quota: 60,
        attendee_count: 61,
    },
    SampleSeed {
        title: "Governance Call",
        description: "Quarterly proposals review.",
        location: "Online",
        organizer: None,
        image: Some("https://cdn.example.net/governance.png"),
        fixed_date: Some("TBA"),
        price: 0.0,
        quota: 500,
        attendee_count: 37,
    },
    SampleSeed {
        title: "NFT Gallery Night",
        description: "Curated showcase with the artists present.",
        location: "Yogyakarta",
        organizer: Some("Gallery 21"),
        image: Some("https://cdn.example.net/gallery.png"),
        fixed_date: None,
        price: 250.0,
        quota: 80,
        attendee_count: 54,
    },
    SampleSeed {
        title: "Validator Summit",
        description: "",
        location: "Bali",
        organizer: Some("Node Ops"),
        image: None,
        fixed_date: None,
        price: 120.0,
        quota: 30,
        attendee_count: 30,
    },
];

/// Demo records cycling through fixtures that exercise every card fallback:
/// missing image, missing organizer, free and paid, full and empty rosters,
/// and one date that does not parse.
pub fn sample_events(count: usize) -> Vec<EventDraft> {
    let today = Utc::now();
    (0..count)
        .map(|index| {
            let seed = &SAMPLE_SEEDS[index % SAMPLE_SEEDS.len()];
            let date = match seed.fixed_date {
                Some(raw) => raw.to_string(),
                None => (today + Duration::days(3 * (index as i64 + 1))).to_rfc3339(),
            };
            let attendees = if seed.attendee_count == 0 {
                None
            } else {
                Some((0..seed.attendee_count).map(|_| generate_id()).collect())
            };

            EventDraft {
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                date,
                location: seed.location.to_string(),
                image: seed.image.map(str::to_string),
                organizer: seed.organizer.map(str::to_string),
                price: seed.price,
                quota: seed.quota,
                attendees,
            }
        })
        .collect()
}
