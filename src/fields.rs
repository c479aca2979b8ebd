//! Field registry
//!
//! Declares the closed set of scene fields a user can fill in, their display
//! metadata, and the option lists for the enumerated ones. The registry is a
//! static table: it is built at compile time and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one scene field, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Subject,
    Action,
    Expression,
    Place,
    Time,
    CameraMovement,
    Lighting,
    VideoStyle,
    Mood,
    SoundMusic,
    SpokenLine,
    ExtraDetail,
    NegativePrompt,
}

impl FieldId {
    /// Every field, in the order the form presents them.
    pub const ALL: [FieldId; 13] = [
        FieldId::Subject,
        FieldId::Action,
        FieldId::Expression,
        FieldId::Place,
        FieldId::Time,
        FieldId::CameraMovement,
        FieldId::Lighting,
        FieldId::VideoStyle,
        FieldId::Mood,
        FieldId::SoundMusic,
        FieldId::SpokenLine,
        FieldId::ExtraDetail,
        FieldId::NegativePrompt,
    ];

    /// The camelCase key used in JSON payloads.
    pub fn key(self) -> &'static str {
        match self {
            FieldId::Subject => "subject",
            FieldId::Action => "action",
            FieldId::Expression => "expression",
            FieldId::Place => "place",
            FieldId::Time => "time",
            FieldId::CameraMovement => "cameraMovement",
            FieldId::Lighting => "lighting",
            FieldId::VideoStyle => "videoStyle",
            FieldId::Mood => "mood",
            FieldId::SoundMusic => "soundMusic",
            FieldId::SpokenLine => "spokenLine",
            FieldId::ExtraDetail => "extraDetail",
            FieldId::NegativePrompt => "negativePrompt",
        }
    }

    /// The kebab-case name used for command-line flags.
    pub fn flag(self) -> &'static str {
        match self {
            FieldId::Subject => "subject",
            FieldId::Action => "action",
            FieldId::Expression => "expression",
            FieldId::Place => "place",
            FieldId::Time => "time",
            FieldId::CameraMovement => "camera-movement",
            FieldId::Lighting => "lighting",
            FieldId::VideoStyle => "video-style",
            FieldId::Mood => "mood",
            FieldId::SoundMusic => "sound-music",
            FieldId::SpokenLine => "spoken-line",
            FieldId::ExtraDetail => "extra-detail",
            FieldId::NegativePrompt => "negative-prompt",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for FieldId {
    type Err = UnknownField;

    /// Accepts either the camelCase key or the kebab-case flag name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.key() == s || id.flag() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Current value of every field.
///
/// Every field is always present; an unset field is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldValues {
    pub subject: String,
    pub action: String,
    pub expression: String,
    pub place: String,
    pub time: String,
    pub camera_movement: String,
    pub lighting: String,
    pub video_style: String,
    pub mood: String,
    pub sound_music: String,
    pub spoken_line: String,
    pub extra_detail: String,
    pub negative_prompt: String,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: FieldId) -> &str {
        match id {
            FieldId::Subject => &self.subject,
            FieldId::Action => &self.action,
            FieldId::Expression => &self.expression,
            FieldId::Place => &self.place,
            FieldId::Time => &self.time,
            FieldId::CameraMovement => &self.camera_movement,
            FieldId::Lighting => &self.lighting,
            FieldId::VideoStyle => &self.video_style,
            FieldId::Mood => &self.mood,
            FieldId::SoundMusic => &self.sound_music,
            FieldId::SpokenLine => &self.spoken_line,
            FieldId::ExtraDetail => &self.extra_detail,
            FieldId::NegativePrompt => &self.negative_prompt,
        }
    }

    fn slot_mut(&mut self, id: FieldId) -> &mut String {
        match id {
            FieldId::Subject => &mut self.subject,
            FieldId::Action => &mut self.action,
            FieldId::Expression => &mut self.expression,
            FieldId::Place => &mut self.place,
            FieldId::Time => &mut self.time,
            FieldId::CameraMovement => &mut self.camera_movement,
            FieldId::Lighting => &mut self.lighting,
            FieldId::VideoStyle => &mut self.video_style,
            FieldId::Mood => &mut self.mood,
            FieldId::SoundMusic => &mut self.sound_music,
            FieldId::SpokenLine => &mut self.spoken_line,
            FieldId::ExtraDetail => &mut self.extra_detail,
            FieldId::NegativePrompt => &mut self.negative_prompt,
        }
    }

    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        *self.slot_mut(id) = value.into();
    }

    /// Builder-style setter, handy for tests and one-off records.
    pub fn with(mut self, id: FieldId, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    /// True when every field is blank after trimming.
    pub fn is_blank(&self) -> bool {
        FieldId::ALL.iter().all(|id| self.get(*id).trim().is_empty())
    }
}

/// How a field is edited in a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputKind {
    Text,
    MultiLine { rows: u8 },
    Select,
}

/// One selectable value of an enumerated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

/// Display metadata for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [SelectOption],
}

fn has_no_options(options: &&'static [SelectOption]) -> bool {
    options.is_empty()
}

impl FieldDefinition {
    pub fn is_select(&self) -> bool {
        matches!(self.kind, InputKind::Select)
    }

    /// Whether `value` may be stored in this field.
    ///
    /// Free-text fields accept anything; selects only accept a declared
    /// option value (the empty "no choice" value included).
    pub fn allows(&self, value: &str) -> bool {
        !self.is_select() || self.options.iter().any(|o| o.value == value)
    }

    /// Option values a user can actually pick, without the empty choice.
    pub fn choice_values(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.options
            .iter()
            .map(|o| o.value)
            .filter(|v| !v.is_empty())
    }
}

pub const TIME_OPTIONS: &[SelectOption] = &[
    opt("", "Choose a time of day"),
    opt("dawn", "Dawn"),
    opt("morning", "Morning"),
    opt("midday", "Midday"),
    opt("afternoon", "Afternoon"),
    opt("golden hour", "Golden hour"),
    opt("dusk", "Dusk"),
    opt("night", "Night"),
    opt("midnight", "Midnight"),
];

pub const CAMERA_MOVEMENT_OPTIONS: &[SelectOption] = &[
    opt("", "Choose a camera movement"),
    opt("static_shot", "Static shot"),
    opt("slow_pan_left", "Slow pan left"),
    opt("slow_pan_right", "Slow pan right"),
    opt("tilt_up", "Tilt up"),
    opt("tilt_down", "Tilt down"),
    opt("dolly_in", "Dolly in"),
    opt("dolly_out", "Dolly out"),
    opt("tracking_shot", "Tracking shot"),
    opt("crane_shot", "Crane shot"),
    opt("handheld", "Handheld"),
    opt("drone_flyover", "Drone flyover"),
    opt("orbit_around_subject", "Orbit around subject"),
    opt("slow_zoom_in", "Slow zoom in"),
];

pub const LIGHTING_OPTIONS: &[SelectOption] = &[
    opt("", "Choose lighting"),
    opt("soft natural light", "Soft natural light"),
    opt("golden hour sunlight", "Golden hour sunlight"),
    opt("dramatic chiaroscuro", "Dramatic chiaroscuro"),
    opt("neon glow", "Neon glow"),
    opt("studio lighting", "Studio lighting"),
    opt("backlit silhouette", "Backlit silhouette"),
    opt("moonlight", "Moonlight"),
    opt("candlelight", "Candlelight"),
];

pub const VIDEO_STYLE_OPTIONS: &[SelectOption] = &[
    opt("", "Choose a video style"),
    opt("cinematic", "Cinematic"),
    opt("documentary", "Documentary"),
    opt("anime", "Anime"),
    opt("3D animation", "3D animation"),
    opt("vintage film", "Vintage film"),
    opt("hyperrealistic", "Hyperrealistic"),
    opt("claymation", "Claymation"),
    opt("watercolor animation", "Watercolor animation"),
];

pub const MOOD_OPTIONS: &[SelectOption] = &[
    opt("", "Choose a mood"),
    opt("peaceful", "Peaceful"),
    opt("mysterious", "Mysterious"),
    opt("epic", "Epic"),
    opt("melancholic", "Melancholic"),
    opt("joyful", "Joyful"),
    opt("tense", "Tense"),
    opt("romantic", "Romantic"),
    opt("dreamlike", "Dreamlike"),
];

const fn text(
    id: FieldId,
    label: &'static str,
    placeholder: &'static str,
) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        kind: InputKind::Text,
        placeholder: Some(placeholder),
        options: &[],
    }
}

const fn select(
    id: FieldId,
    label: &'static str,
    options: &'static [SelectOption],
) -> FieldDefinition {
    FieldDefinition {
        id,
        label,
        kind: InputKind::Select,
        placeholder: None,
        options,
    }
}

static FIELD_REGISTRY: [FieldDefinition; 13] = [
    text(
        FieldId::Subject,
        "Main subject",
        "e.g. an orange cat, two pen pals",
    ),
    text(
        FieldId::Action,
        "Action / activity",
        "e.g. exploring an enchanted forest, reading a book in a cafe",
    ),
    text(
        FieldId::Expression,
        "Expression / emotion (optional)",
        "e.g. cheerful, curious, pensive",
    ),
    text(
        FieldId::Place,
        "Place / setting",
        "e.g. an old library, the planet Mars, a roadside cafe",
    ),
    select(FieldId::Time, "Time", TIME_OPTIONS),
    select(
        FieldId::CameraMovement,
        "Camera movement",
        CAMERA_MOVEMENT_OPTIONS,
    ),
    select(FieldId::Lighting, "Lighting", LIGHTING_OPTIONS),
    select(FieldId::VideoStyle, "Video style", VIDEO_STYLE_OPTIONS),
    select(FieldId::Mood, "Video mood", MOOD_OPTIONS),
    text(
        FieldId::SoundMusic,
        "Sound / music (optional)",
        "e.g. calm lo-fi music, crashing waves, an epic soundtrack",
    ),
    text(
        FieldId::SpokenLine,
        "Spoken line (optional)",
        "e.g. \"This is amazing!\", \"What is happening over there?\"",
    ),
    FieldDefinition {
        id: FieldId::ExtraDetail,
        label: "Additional detail (optional)",
        kind: InputKind::MultiLine { rows: 3 },
        placeholder: Some("e.g. focus on the subject's eyes, include drifting dust particles"),
        options: &[],
    },
    text(
        FieldId::NegativePrompt,
        "Negative prompt (things to avoid)",
        "e.g. blurry, low quality, text, people",
    ),
];

/// The ordered field registry.
pub fn field_registry() -> &'static [FieldDefinition] {
    &FIELD_REGISTRY
}

/// Looks up the definition of one field.
pub fn definition(id: FieldId) -> &'static FieldDefinition {
    // The registry is declared in `FieldId::ALL` order.
    &FIELD_REGISTRY[id as usize]
}
