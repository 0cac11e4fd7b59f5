//! Content-type registry.
//!
//! Every manager page of the console is the same editor configured by one
//! [`ContentType`]: where the document lives, how its records are wrapped,
//! what a new record looks like, which fields are required, and whether
//! removals hit the server immediately.
//!
//! | Name           | Resource             | Shape      | Deletion  |
//! |----------------|----------------------|------------|-----------|
//! | careers        | `careers`            | collection | deferred  |
//! | news           | `news`               | collection | immediate |
//! | team           | `team`               | collection | immediate |
//! | sectors        | `sectors`            | collection | deferred  |
//! | pillars        | `pillars`            | collection | deferred  |
//! | sustainability | `sustainability`     | collection | deferred  |
//! | expertise      | `expertise`          | collection | deferred  |
//! | businesses     | `home-business`      | collection | deferred  |
//! | messages       | `messages`           | collection | immediate |
//! | hero           | `hero`               | document   |           |
//! | about          | `about`              | document   |           |
//! | vision         | `vision`             | document   |           |
//! | company        | `company-info`       | document   |           |
//! | community      | `community-settings` | document   |           |
//! | settings       | `settings`           | document   |           |

pub mod templates;

use serde_json::Value;

use crate::api::UploadTarget;
use crate::error::ContentError;

// =============================================================================
// Descriptor
// =============================================================================

/// Whether the resource holds a list of records or one settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Collection,
    Document,
}

/// How a collection is wrapped on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{ "<key>": [...], ...other fields }`. Other fields are kept as-is.
    Key(&'static str),
    /// The body is the array itself.
    Bare,
}

/// Where `add_record` puts the new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Front,
    Back,
}

/// When removing a persisted record reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// `DELETE /<resource>/<id>` before the record leaves local state.
    Immediate,
    /// Local removal only; the next bulk save persists it.
    Deferred,
}

/// Upload endpoint a content type's image fields use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRoute {
    Resource(&'static str),
    Section(&'static str),
}

impl UploadRoute {
    pub fn target(&self) -> UploadTarget {
        match self {
            UploadRoute::Resource(r) => UploadTarget::Resource((*r).to_string()),
            UploadRoute::Section(s) => UploadTarget::Section((*s).to_string()),
        }
    }
}

/// Status texts shown while working on a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTexts {
    pub load_failed: &'static str,
    pub saving: &'static str,
    pub saved: &'static str,
    pub save_failed: &'static str,
    pub delete_prompt: &'static str,
    pub deleting: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

const DEFAULT_TEXTS: StatusTexts = StatusTexts {
    load_failed: "Failed to load data",
    saving: "Saving...",
    saved: "Saved successfully!",
    save_failed: "Error saving data",
    delete_prompt: "Are you sure you want to remove this item? Remember to save changes after!",
    deleting: "Deleting from database...",
    deleted: "Deleted successfully!",
    delete_failed: "Could not delete item.",
};

/// Configuration of one editable content type.
pub struct ContentType {
    /// CLI name.
    pub name: &'static str,
    /// Human-readable title.
    pub label: &'static str,
    /// Endpoint path relative to the API root.
    pub resource: &'static str,
    pub shape: Shape,
    pub envelope: Envelope,
    pub insert_at: InsertAt,
    pub deletion: Deletion,
    /// Reload after a successful save so new records get their `_id`.
    pub refetch_after_save: bool,
    /// `false` for read-only resources (the inbox).
    pub writable: bool,
    /// New record for collections (given the current records),
    /// default document for documents (given nothing).
    pub template: fn(&[Value]) -> Value,
    /// Records shown when the server has none yet.
    pub seed: Option<fn() -> Vec<Value>>,
    /// Embedded record schema (JSON Schema draft 7) with required fields.
    pub schema: Option<&'static str>,
    pub upload: Option<UploadRoute>,
    pub texts: StatusTexts,
}

impl std::fmt::Debug for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentType")
            .field("name", &self.name)
            .field("resource", &self.resource)
            .field("shape", &self.shape)
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

impl ContentType {
    pub fn is_collection(&self) -> bool {
        self.shape == Shape::Collection
    }

    /// Key of the record array inside the envelope, if any.
    pub fn items_key(&self) -> Option<&'static str> {
        match self.envelope {
            Envelope::Key(key) => Some(key),
            Envelope::Bare => None,
        }
    }

    /// A fresh record (or default document).
    pub fn new_record(&self, existing: &[Value]) -> Value {
        (self.template)(existing)
    }
}

// =============================================================================
// Registry
// =============================================================================

const fn collection(
    name: &'static str,
    label: &'static str,
    resource: &'static str,
    envelope: Envelope,
    template: fn(&[Value]) -> Value,
) -> ContentType {
    ContentType {
        name,
        label,
        resource,
        shape: Shape::Collection,
        envelope,
        insert_at: InsertAt::Back,
        deletion: Deletion::Deferred,
        refetch_after_save: false,
        writable: true,
        template,
        seed: None,
        schema: None,
        upload: None,
        texts: DEFAULT_TEXTS,
    }
}

const fn document(
    name: &'static str,
    label: &'static str,
    resource: &'static str,
    defaults: fn(&[Value]) -> Value,
) -> ContentType {
    ContentType {
        shape: Shape::Document,
        envelope: Envelope::Bare,
        ..collection(name, label, resource, Envelope::Bare, defaults)
    }
}

pub static CAREERS: ContentType = ContentType {
    insert_at: InsertAt::Front,
    schema: Some(include_str!("../../schemas/careers.json")),
    texts: StatusTexts {
        load_failed: "Could not load the job board",
        saving: "Publishing vacancies...",
        saved: "Job board updated!",
        save_failed: "Could not save jobs",
        delete_prompt: "Remove this listing? Remember to save changes after!",
        ..DEFAULT_TEXTS
    },
    ..collection("careers", "Careers & Recruitment", "careers", Envelope::Key("jobs"), templates::job)
};

pub static NEWS: ContentType = ContentType {
    insert_at: InsertAt::Front,
    deletion: Deletion::Immediate,
    refetch_after_save: true,
    texts: StatusTexts {
        load_failed: "Error fetching news",
        saving: "Publishing updates...",
        saved: "News feed updated!",
        save_failed: "Failed to save news",
        delete_prompt: "Are you sure you want to permanently delete this story?",
        deleting: "Deleting article from database...",
        deleted: "Article deleted successfully!",
        delete_failed: "Could not delete article.",
    },
    ..collection("news", "News & Insights", "news", Envelope::Key("articles"), templates::article)
};

pub static TEAM: ContentType = ContentType {
    deletion: Deletion::Immediate,
    refetch_after_save: true,
    texts: StatusTexts {
        load_failed: "Error loading team data",
        saving: "Saving changes...",
        saved: "Team updated successfully!",
        save_failed: "Could not save team data.",
        delete_prompt: "Are you sure you want to permanently delete this team member?",
        deleting: "Deleting member from database...",
        deleted: "Member deleted successfully!",
        delete_failed: "Could not delete member.",
    },
    ..collection("team", "Leadership Team", "team", Envelope::Key("members"), templates::member)
};

pub static SECTORS: ContentType = ContentType {
    seed: Some(templates::seed_sectors),
    texts: StatusTexts {
        saving: "Saving to Database...",
        saved: "All changes saved!",
        save_failed: "Could not save to database",
        delete_prompt: "Are you sure you want to remove this sector?",
        ..DEFAULT_TEXTS
    },
    ..collection("sectors", "Sectors & Services", "sectors", Envelope::Key("sectors"), templates::sector)
};

pub static PILLARS: ContentType = ContentType {
    seed: Some(templates::seed_pillars),
    texts: StatusTexts {
        saving: "Saving Pillars and Images...",
        saved: "Strategic Pillars updated!",
        save_failed: "Error saving pillars",
        ..DEFAULT_TEXTS
    },
    ..collection("pillars", "Strategic Pillars", "pillars", Envelope::Key("pillars"), templates::pillar)
};

pub static SUSTAINABILITY: ContentType = ContentType {
    seed: Some(templates::seed_focus_areas),
    texts: StatusTexts {
        saved: "Sustainability updated successfully!",
        ..DEFAULT_TEXTS
    },
    ..collection(
        "sustainability",
        "Sustainability",
        "sustainability",
        Envelope::Key("focusAreas"),
        templates::focus_area,
    )
};

pub static EXPERTISE: ContentType = ContentType {
    upload: Some(UploadRoute::Section("expertise")),
    texts: StatusTexts {
        load_failed: "Failed to load Expertise data",
        saved: "Expertise section saved successfully!",
        save_failed: "Failed to save settings",
        delete_prompt: "Are you sure you want to remove this expertise? Remember to click 'Save Changes' after!",
        ..DEFAULT_TEXTS
    },
    ..collection("expertise", "Expertise", "expertise", Envelope::Key("items"), templates::expertise)
};

pub static BUSINESSES: ContentType = ContentType {
    upload: Some(UploadRoute::Resource("home-business")),
    texts: StatusTexts {
        saved: "Settings saved successfully!",
        save_failed: "Failed to save settings",
        delete_prompt: "Are you sure you want to remove this business? Remember to click 'Save Changes' after!",
        ..DEFAULT_TEXTS
    },
    ..collection(
        "businesses",
        "Home Businesses",
        "home-business",
        Envelope::Key("businesses"),
        templates::business,
    )
};

pub static MESSAGES: ContentType = ContentType {
    deletion: Deletion::Immediate,
    writable: false,
    texts: StatusTexts {
        load_failed: "Failed to load messages.",
        delete_prompt: "Are you sure you want to permanently delete this message?",
        deleting: "Deleting message...",
        deleted: "Message deleted successfully.",
        delete_failed: "Failed to delete message.",
        ..DEFAULT_TEXTS
    },
    ..collection("messages", "Inbox", "messages", Envelope::Bare, templates::message)
};

pub static HERO: ContentType = ContentType {
    upload: Some(UploadRoute::Resource("hero")),
    texts: StatusTexts {
        load_failed: "Failed to load settings",
        saved: "Settings saved successfully!",
        save_failed: "Failed to save settings",
        ..DEFAULT_TEXTS
    },
    ..document("hero", "Hero Banner", "hero", templates::hero)
};

pub static ABOUT: ContentType = ContentType {
    texts: StatusTexts {
        load_failed: "Error loading about data",
        ..DEFAULT_TEXTS
    },
    ..document("about", "About (General)", "about", templates::about)
};

pub static VISION: ContentType = document("vision", "Vision & Mission", "vision", templates::vision);

pub static COMPANY: ContentType = ContentType {
    texts: StatusTexts {
        save_failed: "Error saving",
        ..DEFAULT_TEXTS
    },
    ..document("company", "Company Info", "company-info", templates::company)
};

pub static COMMUNITY: ContentType = ContentType {
    texts: StatusTexts {
        saving: "Updating Community Page...",
        saved: "Community settings updated!",
        save_failed: "Failed to save settings",
        ..DEFAULT_TEXTS
    },
    ..document("community", "Community Page", "community-settings", templates::community)
};

pub static SETTINGS: ContentType = ContentType {
    texts: StatusTexts {
        saving: "Saving configurations...",
        saved: "Settings updated!",
        save_failed: "Save failed",
        ..DEFAULT_TEXTS
    },
    ..document("settings", "System Settings", "settings", templates::settings)
};

/// Every registered content type, in sidebar order.
pub static CONTENT_TYPES: [&ContentType; 15] = [
    &HERO,
    &VISION,
    &PILLARS,
    &BUSINESSES,
    &COMMUNITY,
    &NEWS,
    &ABOUT,
    &TEAM,
    &COMPANY,
    &SECTORS,
    &EXPERTISE,
    &CAREERS,
    &SUSTAINABILITY,
    &MESSAGES,
    &SETTINGS,
];

/// Look a content type up by name or resource path.
pub fn content_type(name: &str) -> Result<&'static ContentType, ContentError> {
    let wanted = name.trim().trim_matches('/').to_lowercase();
    CONTENT_TYPES
        .iter()
        .copied()
        .find(|ct| ct.name == wanted || ct.resource == wanted)
        .ok_or_else(|| ContentError::UnknownContentType(name.to_string()))
}

/// Like [`content_type`], but only collections.
pub fn collection_type(name: &str) -> Result<&'static ContentType, ContentError> {
    let ct = content_type(name)?;
    if !ct.is_collection() {
        return Err(ContentError::NotACollection(ct.name.to_string()));
    }
    Ok(ct)
}

/// Like [`content_type`], but only single documents.
pub fn document_type(name: &str) -> Result<&'static ContentType, ContentError> {
    let ct = content_type(name)?;
    if ct.is_collection() {
        return Err(ContentError::NotADocument(ct.name.to_string()));
    }
    Ok(ct)
}

/// Upload endpoint for the images of a content type.
pub fn upload_target(name: &str) -> Result<UploadTarget, ContentError> {
    let ct = content_type(name)?;
    ct.upload
        .map(|route| route.target())
        .ok_or_else(|| ContentError::NoUploadRoute(ct.name.to_string()))
}
