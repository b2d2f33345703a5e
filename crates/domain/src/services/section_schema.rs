//! Catalog of page section schemas and content validation against them.
//!
//! A schema describes the fields the admin editor renders for a section key.
//! Sections whose key has no schema hold free-form JSON objects.

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{Map, Value};

use super::content_path::{ContentPath, Segment};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSchema {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<SectionField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkField {
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Image,
    Link {
        fields: Vec<LinkField>,
    },
    #[serde(rename_all = "camelCase")]
    Repeatable {
        #[serde(skip_serializing_if = "Option::is_none")]
        min_items: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_items: Option<usize>,
        item_fields: Vec<SectionField>,
    },
}

/// One field that does not match its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

fn text(name: &'static str, label: &'static str) -> SectionField {
    SectionField { name, label, kind: FieldKind::Text }
}

fn textarea(name: &'static str, label: &'static str) -> SectionField {
    SectionField { name, label, kind: FieldKind::Textarea }
}

fn image(name: &'static str, label: &'static str) -> SectionField {
    SectionField { name, label, kind: FieldKind::Image }
}

fn button_link(name: &'static str, label: &'static str) -> SectionField {
    SectionField {
        name,
        label,
        kind: FieldKind::Link {
            fields: vec![
                LinkField { name: "label", label: "Button Label" },
                LinkField { name: "href", label: "Link URL" },
            ],
        },
    }
}

fn repeatable(
    name: &'static str,
    label: &'static str,
    min_items: Option<usize>,
    max_items: Option<usize>,
    item_fields: Vec<SectionField>,
) -> SectionField {
    SectionField {
        name,
        label,
        kind: FieldKind::Repeatable { min_items, max_items, item_fields },
    }
}

fn bullets() -> SectionField {
    repeatable("bullets", "Bullets", None, None, vec![text("text", "Bullet Text")])
}

fn paragraphs() -> SectionField {
    repeatable("paragraphs", "Paragraphs", Some(1), None, vec![textarea("text", "Paragraph Text")])
}

fn schema(
    key: &'static str,
    title: &'static str,
    description: &'static str,
    fields: Vec<SectionField>,
) -> SectionSchema {
    SectionSchema { key, title, description, fields }
}

lazy_static! {
    static ref SECTION_SCHEMAS: Vec<SectionSchema> = vec![
        schema("hero_slides", "Hero Slides", "Slides used on the homepage hero carousel.", vec![
            repeatable("slides", "Slides", Some(1), Some(5), vec![
                text("title", "Title"),
                text("subtitle", "Subtitle"),
                textarea("description", "Description"),
                image("image", "Desktop Image"),
                image("imageMobile", "Mobile Image"),
                repeatable("buttons", "Buttons", None, Some(4), vec![
                    text("label", "Label"),
                    text("href", "Link / URL"),
                    text("style", "Style (primary | secondary | outline | ghost)"),
                    text("icon", "Icon (arrow | heart | play)"),
                ]),
            ]),
        ]),
        schema("cta", "Final Call To Action", "Bottom CTA block content.", vec![
            text("title", "Title"),
            textarea("description", "Description"),
            button_link("primaryCta", "Primary CTA"),
            button_link("secondaryCta", "Secondary CTA"),
        ]),
        schema("who_we_are", "Who We Are", "Homepage about section content.", vec![
            text("badgeLabel", "Badge Label"),
            text("highlightWord", "Highlight Word"),
            text("title", "Title"),
            textarea("intro", "Intro Paragraph"),
            textarea("mission", "Mission Paragraph"),
            image("image", "Primary Image"),
            text("imageAlt", "Image Alt Text"),
            button_link("cta", "CTA Button"),
            repeatable("stats", "Stats", None, Some(4), vec![
                text("value", "Value"),
                text("label", "Label"),
            ]),
            text("floatingBadgeTitle", "Floating Badge Title"),
            text("floatingBadgeSubtitle", "Floating Badge Subtitle"),
        ]),
        schema("impact_stats", "Impact Stats", "Homepage stats row (members, counties, programs, etc.).", vec![
            repeatable("stats", "Stats", Some(1), Some(6), vec![
                text("value", "Value"),
                text("label", "Label"),
                text("suffix", "Suffix"),
                text("icon", "Icon (users | trend | book | award)"),
            ]),
        ]),
        schema("programs", "Programs Section", "Homepage programs & initiatives grid.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            button_link("cta", "CTA Button"),
            repeatable("items", "Program Cards", Some(1), Some(6), vec![
                text("title", "Title"),
                textarea("description", "Description"),
                text("icon", "Icon (book | users | sparkles | heart)"),
                text("accent", "Accent Color (hex)"),
            ]),
        ]),
        schema("programs_hero", "Programs Hero", "Top hero banner for the programs page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            image("backgroundImage", "Background Image"),
        ]),
        schema("programs_intro", "Programs Introduction", "Executive summary and highlight bullets for the programs page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("summary", "Summary"),
            paragraphs(),
            repeatable("highlights", "Highlights", None, None, vec![
                text("title", "Title"),
                textarea("description", "Description"),
            ]),
            textarea("partnerNote", "Partner Note / Pull Quote"),
        ]),
        schema("programs_cbr", "Community-Based Rehabilitation", "CBR spotlight section content.", vec![
            text("title", "Title"),
            text("subtitle", "Subtitle"),
            image("image", "Feature Image"),
            text("originTitle", "Origin Title"),
            textarea("originDescription", "Origin Description"),
            text("expansionTitle", "Expansion Title"),
            textarea("expansionDescription", "Expansion Description"),
            text("metricsTitle", "Metrics Title"),
            repeatable("metrics", "Metrics", None, Some(4), vec![
                text("label", "Label"),
                text("value", "Value"),
            ]),
            text("partnershipTitle", "Partnership Title"),
            textarea("partnershipDescription", "Partnership Description"),
        ]),
        schema("programs_aftercare", "Critical Care & Aftercare", "Registration, rehabilitation, and aftercare pillars.", vec![
            text("title", "Title"),
            textarea("description", "Description"),
            repeatable("pillars", "Pillars", Some(1), None, vec![
                text("title", "Title"),
                textarea("summary", "Summary"),
                bullets(),
            ]),
        ]),
        schema("programs_initiatives", "Complementary Initiatives", "Additional program cards such as mediator training and youth empowerment.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            repeatable("items", "Initiative Cards", Some(1), None, vec![
                text("title", "Title"),
                textarea("description", "Description"),
                text("icon", "Icon (award|sparkles|trend|home)"),
                text("highlight", "Highlight"),
                bullets(),
            ]),
        ]),
        schema("testimonials", "Testimonials Section", "Homepage testimonials carousel content.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            repeatable("items", "Testimonials", Some(1), None, vec![
                text("name", "Name"),
                text("role", "Role / Title"),
                textarea("content", "Quote"),
                text("rating", "Rating (1-5)"),
            ]),
        ]),
        schema("news_updates", "News & Updates Section", "Homepage recent updates carousel.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            repeatable("items", "News Cards", Some(1), None, vec![
                text("title", "Title"),
                textarea("description", "Description"),
                text("date", "Date Label"),
                text("image", "Image URL"),
                text("href", "Read More Link"),
            ]),
        ]),
        schema("about_hero", "About Hero", "Top hero banner for the About page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Description"),
            image("backgroundImage", "Background Image"),
        ]),
        schema("about_story", "About Story", "History section content for the About page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            image("image", "Primary Image"),
            paragraphs(),
        ]),
        schema("about_mission_vision", "Mission & Vision", "Mission and vision cards for the About page.", vec![
            text("missionTitle", "Mission Title"),
            textarea("missionDescription", "Mission Description"),
            text("missionIcon", "Mission Icon (target|eye|heart|award)"),
            text("visionTitle", "Vision Title"),
            textarea("visionDescription", "Vision Description"),
            text("visionIcon", "Vision Icon (target|eye|heart|award)"),
        ]),
        schema("about_values", "Core Values", "Values grid on the About page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Intro Description"),
            repeatable("items", "Values", Some(1), None, vec![
                text("title", "Title"),
                textarea("description", "Description"),
                text("icon", "Icon (target|eye|heart|award)"),
                text("color", "Accent Color (#hex)"),
            ]),
        ]),
        schema("about_leadership", "Leadership Section", "Leadership cards for the About page.", vec![
            text("badgeLabel", "Badge Label"),
            text("title", "Title"),
            textarea("description", "Intro Description"),
            repeatable("leaders", "Leaders", Some(1), None, vec![
                text("name", "Name"),
                text("role", "Role"),
                textarea("description", "Description"),
                image("image", "Photo"),
            ]),
        ]),
    ];
}

pub fn all_schemas() -> &'static [SectionSchema] {
    &SECTION_SCHEMAS
}

pub fn schema_for(key: &str) -> Option<&'static SectionSchema> {
    SECTION_SCHEMAS.iter().find(|schema| schema.key == key)
}

fn default_value(field: &SectionField) -> Value {
    match &field.kind {
        FieldKind::Repeatable {
            min_items,
            item_fields,
            ..
        } => Value::Array(
            (0..min_items.unwrap_or(0))
                .map(|_| default_item(item_fields))
                .collect(),
        ),
        FieldKind::Link { fields } => Value::Object(
            fields
                .iter()
                .map(|f| (f.name.to_string(), Value::String(String::new())))
                .collect(),
        ),
        FieldKind::Text | FieldKind::Textarea | FieldKind::Image => Value::String(String::new()),
    }
}

/// An empty item for a list of fields: lists hold their minimum number of
/// empty items, links have empty labels, everything else an empty string.
pub fn default_item(fields: &[SectionField]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|field| (field.name.to_string(), default_value(field)))
            .collect::<Map<String, Value>>(),
    )
}

/// Starting content for a new section using `schema`.
pub fn default_content(schema: &SectionSchema) -> Value {
    default_item(&schema.fields)
}

/// Checks `content` against `schema`.
///
/// Absent or null fields are accepted so partially filled drafts can be
/// saved. Keys not described by the schema are left alone.
pub fn validate_content(schema: &SectionSchema, content: &Value) -> Result<(), Vec<SchemaViolation>> {
    let mut violations = Vec::new();
    if !content.is_object() {
        violations.push(SchemaViolation {
            path: String::new(),
            message: "Section content must be a JSON object".to_string(),
        });
        return Err(violations);
    }

    validate_fields(&schema.fields, content, None, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn validate_fields(
    fields: &[SectionField],
    item: &Value,
    base: Option<&ContentPath>,
    violations: &mut Vec<SchemaViolation>,
) {
    for field in fields {
        let value = match item.get(field.name) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };
        let path = match base {
            Some(base) => base.child(Segment::Key(field.name.to_string())),
            None => ContentPath::key(field.name),
        };
        validate_field(field, value, &path, violations);
    }
}

fn validate_field(
    field: &SectionField,
    value: &Value,
    path: &ContentPath,
    violations: &mut Vec<SchemaViolation>,
) {
    let mut push = |message: String| {
        violations.push(SchemaViolation {
            path: path.to_string(),
            message,
        })
    };

    match &field.kind {
        FieldKind::Text | FieldKind::Textarea | FieldKind::Image => {
            if !value.is_string() {
                push(format!("{} must be a string", field.label));
            }
        }
        FieldKind::Link { fields } => match value.as_object() {
            None => push(format!("{} must be an object", field.label)),
            Some(map) => {
                for link_field in fields {
                    if let Some(v) = map.get(link_field.name) {
                        if !v.is_string() && !v.is_null() {
                            push(format!("{} {} must be a string", field.label, link_field.label));
                        }
                    }
                }
            }
        },
        FieldKind::Repeatable {
            min_items,
            max_items,
            item_fields,
        } => {
            let Some(items) = value.as_array() else {
                push(format!("{} must be a list", field.label));
                return;
            };
            if let Some(min) = min_items {
                if items.len() < *min {
                    push(format!("{} needs at least {} item(s)", field.label, min));
                }
            }
            if let Some(max) = max_items {
                if items.len() > *max {
                    push(format!("{} allows at most {} item(s)", field.label, max));
                }
            }
            for (index, item) in items.iter().enumerate() {
                let item_path = path.child(Segment::Index(index));
                if !item.is_object() {
                    violations.push(SchemaViolation {
                        path: item_path.to_string(),
                        message: format!("{} items must be objects", field.label),
                    });
                    continue;
                }
                validate_fields(item_fields, item, Some(&item_path), violations);
            }
        }
    }
}
