use serde::Serialize;

use super::property::PropertyValue;

/// Header properties copied onto a [`Scene`] when present.
pub const SCENE_FIELDS: &[&str] = &[
    "bg",
    "music",
    "chars",
    "set_flags",
    "clear_flags",
    "set_key_flags",
    "require_flags",
    "actions",
];

/// A labeled branch from one scene to another.
///
/// Flags in `require_flags` may carry a leading `!` to mean "must not be set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_flags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_flags: Option<Vec<String>>,
}

/// One narrative unit: metadata, prose blocks in playback order, and choices.
///
/// Optional fields are `None` when the header omitted them or gave an
/// empty value, so they never appear in serialized output as nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_flags: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_flags: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_key_flags: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_flags: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<PropertyValue>,
    #[serde(rename = "textBlocks", skip_serializing_if = "Vec::is_empty")]
    pub text_blocks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl Scene {
    /// A scene with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bg: None,
            music: None,
            chars: None,
            set_flags: None,
            clear_flags: None,
            set_key_flags: None,
            require_flags: None,
            actions: None,
            text_blocks: Vec::new(),
            choices: Vec::new(),
        }
    }

    /// Mutable access to an optional field by its header name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<PropertyValue>> {
        match name {
            "bg" => Some(&mut self.bg),
            "music" => Some(&mut self.music),
            "chars" => Some(&mut self.chars),
            "set_flags" => Some(&mut self.set_flags),
            "clear_flags" => Some(&mut self.clear_flags),
            "set_key_flags" => Some(&mut self.set_key_flags),
            "require_flags" => Some(&mut self.require_flags),
            "actions" => Some(&mut self.actions),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::property::Scalar;

    #[test]
    fn every_scene_field_is_addressable() {
        let mut scene = Scene::new("intro");
        for name in SCENE_FIELDS {
            assert!(scene.field_mut(name).is_some(), "missing field {}", name);
        }
        assert!(scene.field_mut("id").is_none());
        assert!(scene.field_mut("textBlocks").is_none());
    }

    #[test]
    fn empty_scene_serializes_id_only() {
        let scene = Scene::new("intro");
        assert_eq!(serde_json::to_string(&scene).unwrap(), r#"{"id":"intro"}"#);
    }

    #[test]
    fn serialized_key_names() {
        let mut scene = Scene::new("hall");
        scene.bg = Some(Scalar::from("hall.png").into());
        scene.text_blocks.push("It is dark.".to_string());
        scene.choices.push(Choice {
            label: "Leave".to_string(),
            target: "street".to_string(),
            require_flags: None,
            set_flags: Some(vec!["left".to_string()]),
        });

        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["bg"], "hall.png");
        assert_eq!(json["textBlocks"][0], "It is dark.");
        assert_eq!(json["choices"][0]["set_flags"][0], "left");
        assert!(json["choices"][0].get("require_flags").is_none());
        assert!(json.get("music").is_none());
    }
}
