//! Prompt assembly
//!
//! Turns a [`FieldValues`] record into one natural-language paragraph. Each
//! clause is emitted only when the field behind it is non-blank after
//! trimming, and clauses always appear in the same order:
//!
//! 1. scene core (subject, action, expression, or a generic filler)
//! 2. setting (place, optionally with time)
//! 3. visual style (video style, lighting, camera movement, mood)
//! 4. audio
//! 5. dialogue, wrapped in the `{{...}}` escape marker
//! 6. additional detail
//! 7. quality enhancer (always present)
//! 8. negative prompt
//!
//! # Example
//!
//! ```
//! use veo_prompt_crafter::{FieldId, FieldValues, assemble};
//!
//! let values = FieldValues::new()
//!     .with(FieldId::Subject, "a cat")
//!     .with(FieldId::Action, "sleeping")
//!     .with(FieldId::Place, "a sofa");
//!
//! assert_eq!(
//!     assemble(&values),
//!     "Visualize a scene featuring a cat sleeping. Set in a sofa. \
//!      Ensure the final result is high-quality, highly detailed, sharply focused, \
//!      and visually stunning."
//! );
//! ```

use crate::fields::FieldValues;

const SCENE_INTRO: &str = "Visualize a scene featuring";
const SCENE_FILLER: &str = "Visualize a stunning, richly detailed scene";

/// Fixed closing sentence, emitted for every prompt.
pub const QUALITY_ENHANCER: &str = "Ensure the final result is high-quality, highly detailed, sharply focused, and visually stunning.";

/// Opening and closing of the span the translator must leave untouched.
pub const ESCAPE_OPEN: &str = "{{";
pub const ESCAPE_CLOSE: &str = "}}";

/// Trimmed value, or `None` when the field is blank.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn scene_core(values: &FieldValues) -> String {
    let Some(subject) = present(&values.subject) else {
        return format!("{}.", SCENE_FILLER);
    };

    let mut clause = format!("{} {}", SCENE_INTRO, subject);
    if let Some(action) = present(&values.action) {
        clause.push(' ');
        clause.push_str(action);
    }
    if let Some(expression) = present(&values.expression) {
        clause.push_str(" with expression ");
        clause.push_str(expression);
    }
    clause.push('.');
    clause
}

fn setting(values: &FieldValues) -> Option<String> {
    // Time only qualifies a place; on its own it is dropped.
    let place = present(&values.place)?;
    Some(match present(&values.time) {
        Some(time) => format!("Set in {} at {}.", place, time),
        None => format!("Set in {}.", place),
    })
}

/// Camera movement option values use `_` between words.
fn humanize_camera_movement(value: &str) -> String {
    value.replace('_', " ")
}

fn visual_style(values: &FieldValues) -> Option<String> {
    let mut fragments = Vec::new();

    if let Some(style) = present(&values.video_style) {
        fragments.push(format!("in the video style {}", style));
    }
    if let Some(lighting) = present(&values.lighting) {
        fragments.push(format!("with lighting {}", lighting));
    }
    if let Some(camera) = present(&values.camera_movement) {
        fragments.push(format!(
            "using camera movement {}",
            humanize_camera_movement(camera)
        ));
    }
    if let Some(mood) = present(&values.mood) {
        fragments.push(format!("creating a mood that is {}", mood));
    }

    if fragments.is_empty() {
        None
    } else {
        Some(format!("{}.", fragments.join(", ")))
    }
}

/// Wraps `text` in the escape marker understood by the translation gateway.
pub fn escape_literal(text: &str) -> String {
    format!("{}{}{}", ESCAPE_OPEN, text, ESCAPE_CLOSE)
}

/// Builds the prompt paragraph for `values`.
///
/// Total and deterministic: blank input still yields the filler scene clause
/// followed by [`QUALITY_ENHANCER`].
pub fn assemble(values: &FieldValues) -> String {
    let clauses = [
        Some(scene_core(values)),
        setting(values),
        visual_style(values),
        present(&values.sound_music).map(|sound| format!("Accompanied by {}.", sound)),
        present(&values.spoken_line)
            .map(|line| format!("There is dialogue: {}.", escape_literal(line))),
        present(&values.extra_detail).map(|detail| format!("Additional detail: {}.", detail)),
        Some(QUALITY_ENHANCER.to_string()),
        present(&values.negative_prompt)
            .map(|negative| format!("Avoid elements such as: {}.", negative)),
    ];

    clauses
        .into_iter()
        .flatten()
        .filter(|clause| !clause.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
