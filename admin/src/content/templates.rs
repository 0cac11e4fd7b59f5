//! New-record templates, default documents and seed data.

use chrono::{Local, Utc};
use serde_json::{json, Value};

// =============================================================================
// Collection templates
// =============================================================================

pub fn job(_: &[Value]) -> Value {
    json!({
        "title": "",
        "department": "Corporate",
        "location": "Lusaka, Zambia",
        "type": "Full-time",
        "applyLink": "",
        "active": true
    })
}

pub fn article(_: &[Value]) -> Value {
    json!({
        "title": "New Story Title",
        "category": "Corporate",
        "excerpt": "A brief summary for the grid...",
        "content": "The full story content goes here...",
        "image": "",
        "date": Local::now().format("%B %-d, %Y").to_string()
    })
}

pub fn member(_: &[Value]) -> Value {
    json!({ "name": "", "role": "", "bio": "", "imageUrl": "" })
}

/// Sector ids continue the visible numbering; the slug only has to be unique.
pub fn sector(existing: &[Value]) -> Value {
    json!({
        "id": existing.len() + 1,
        "slug": format!("new-sector-{}", Utc::now().timestamp_millis()),
        "title": "New Sector Name",
        "description": "Brief hero description...",
        "details": "Full details and capabilities...",
        "image": ""
    })
}

pub fn pillar(existing: &[Value]) -> Value {
    json!({
        "id": format!("{:02}", existing.len() + 1),
        "title": "New Pillar",
        "desc": "",
        "image": ""
    })
}

pub fn focus_area(existing: &[Value]) -> Value {
    json!({ "id": existing.len() + 1, "title": "New Focus Area", "desc": "", "icon": "" })
}

pub fn expertise(_: &[Value]) -> Value {
    json!({ "title": "", "description": "", "image": "" })
}

pub fn business(_: &[Value]) -> Value {
    json!({
        "id": format!("sector-{}", Utc::now().timestamp_millis()),
        "title": "",
        "logo": "",
        "image": ""
    })
}

pub fn message(_: &[Value]) -> Value {
    json!({ "name": "", "email": "", "subject": "", "message": "", "isRead": false })
}

// =============================================================================
// Default documents
// =============================================================================

pub fn hero(_: &[Value]) -> Value {
    json!({
        "mediaType": "video",
        "videoUrl": "",
        "imageUrl": "",
        "button1Text": "Explore Our Sectors",
        "button1Link": "/services",
        "button2Text": "Partner With Us",
        "button2Link": "/contact",
        "overlayColor": "linear-gradient(to bottom, rgba(4,64,102,0.2), rgba(4,64,102,0.8))"
    })
}

pub fn about(_: &[Value]) -> Value {
    json!({ "summaryTitle": "", "summaryText1": "", "summaryText2": "" })
}

pub fn vision(_: &[Value]) -> Value {
    json!({ "missionText": "", "visionText": "", "tagline": "", "imageUrl": "" })
}

pub fn company(_: &[Value]) -> Value {
    json!({
        "name": "Sethmo Group Limited",
        "motto": "Inspired By You",
        "vision": "",
        "mission": ""
    })
}

pub fn community(_: &[Value]) -> Value {
    json!({
        "heroTitle": "",
        "heroSubtext": "",
        "impactHeading": "",
        "impactBody1": "",
        "impactBody2": "",
        "projectsLink": "",
        "impactImage": ""
    })
}

pub fn settings(_: &[Value]) -> Value {
    json!({
        "companyEmail": "",
        "contactPhone": "",
        "officeAddress": "",
        "socialLinks": { "linkedin": "", "facebook": "", "twitter": "" },
        "siteTitle": "",
        "seoDescription": ""
    })
}

// =============================================================================
// Seeds for empty collections
// =============================================================================

pub fn seed_sectors() -> Vec<Value> {
    [
        ("branding", "Branding & Design", "Comprehensive corporate branding solutions...", "We offer branding of all kinds..."),
        ("agriculture", "Agribusiness", "Sustainable farming and agricultural solutions...", "We leverage modern farming techniques..."),
        ("manufacturing", "Manufacturing", "State-of-the-art production facilities...", "Our manufacturing plants are equipped with the latest technology..."),
        ("printing", "Commercial Printing", "Your premier destination for Large Format printing...", "Our printing division is equipped for versatility and precision..."),
        ("hospitality", "Hospitality", "Exceptional guest experiences...", "We operate premium hospitality venues..."),
        ("finance", "Finance & Capital", "Strategic financial services...", "Our financial arm provides capital solutions..."),
        ("logistics", "Shipping & Logistics", "Efficient global and regional supply chain solutions...", "With a fleet of modern vehicles..."),
        ("mining", "Mining", "Responsible extraction and resource management...", "We are committed to responsible mining practices..."),
    ]
    .iter()
    .enumerate()
    .map(|(i, (slug, title, description, details))| {
        json!({ "id": i + 1, "slug": slug, "title": title, "description": description, "details": details })
    })
    .collect()
}

pub fn seed_pillars() -> Vec<Value> {
    [
        ("Diversified Multi-Sector Strength", "Operates across multiple high-impact sectors including branding, agribusiness, manufacturing, and mining..."),
        ("Customer-Centric Philosophy", "Driven by the 'Inspired By You' motto, ensuring solutions are designed around specific needs."),
        ("Empowerment of SMEs", "Integrating local enterprises into value chains to promote entrepreneurship."),
        ("Community Impact", "Partnering with the Thapelo Foundation to give back through sustainable initiatives."),
        ("Innovation", "Continuously enhancing processes and technologies for world-class solutions."),
        ("Quality & Reliability", "Strict adherence to quality standards to build a trusted household brand."),
        ("Sustainable Value", "Focusing on long-term value creation and scalable growth."),
    ]
    .iter()
    .enumerate()
    .map(|(i, (title, desc))| json!({ "id": format!("{:02}", i + 1), "title": title, "desc": desc }))
    .collect()
}

pub fn seed_focus_areas() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Environmental Stewardship",
            "desc": "We are committed to reducing our carbon footprint across our manufacturing and logistics sectors by investing in green energy and sustainable farming practices in our agribusiness.",
            "icon": "🌱"
        }),
        json!({
            "id": 2,
            "title": "Community Upliftment",
            "desc": "Through our partnership with the Thapelo Foundation, we actively invest in rural education, healthcare, and skills development programs in Zambia.",
            "icon": "🤝"
        }),
        json!({
            "id": 3,
            "title": "Ethical Governance",
            "desc": "Transparency, safety, and accountability are the bedrock of our mining and financial operations, ensuring we create value responsibly.",
            "icon": "⚖️"
        }),
    ]
}
