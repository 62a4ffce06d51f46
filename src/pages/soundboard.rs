//! The quote soundboard.

use serde::Deserialize;

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    // validate the embedded sound data at startup
    sound_data()?;

    Ok(ModuleInfo {
        page: PageInfo::new(
            "Känguru-Soundboard",
            "Ein Soundboard mit coolen Sprüchen aus den Känguru-Chroniken",
        )
        .with_path("/kaenguru-soundboard")
        .with_keywords(&["Soundboard", "Känguru", "Witze", "Sprüche"]),
        handlers: vec![
            RoutingRule::page("/kaenguru-soundboard/?", soundboard_page),
            RoutingRule::page("/kaenguru-soundboard/([^/]+)/?", person_page),
        ],
        sub_pages: vec![PageInfo::new(
            "Känguru-Soundboard-Personen",
            "Das Känguru-Soundboard mit Sortierung nach Personen",
        )
        .with_path("/kaenguru-soundboard/personen")
        .with_keywords(&["Personen"])],
        aliases: vec![
            "/soundboard".to_string(),
            "/kangaroo-soundboard".to_string(),
        ],
        ..Default::default()
    })
}

/// The sound inventory, embedded the same way the deployment ships it.
const SOUND_DATA: &str = r#"{
    "personen": {
        "muk": "Marc-Uwe Kling",
        "kaenguru": "Das Känguru"
    },
    "sounds": [
        {"person": "kaenguru", "text": "Nein!"},
        {"person": "kaenguru", "text": "Witzig witzig"},
        {"person": "muk", "text": "Das ist mein Abendbrot"}
    ]
}"#;

#[derive(Debug, Deserialize)]
struct SoundInventory {
    personen: std::collections::BTreeMap<String, String>,
    sounds: Vec<SoundInfo>,
}

#[derive(Debug, Deserialize)]
struct SoundInfo {
    person: String,
    text: String,
}

impl SoundInfo {
    fn file(&self) -> String {
        slugify(&self.text)
    }

    fn to_html(&self, person_name: &str) -> String {
        let file = self.file();
        format!(
            "<li><a href='/kaenguru-soundboard/{person}'>{person_name}</a>\
             : »<a href='/kaenguru-soundboard/{file}'>{text}</a>«\
             <audio controls>\
             <source src='/kaenguru-soundboard/files/{file}.mp3' \
             type='audio/mpeg'></source></audio></li>",
            person = self.person,
            text = self.text,
        )
    }
}

fn sound_data() -> Result<SoundInventory, ModuleError> {
    serde_json::from_str(SOUND_DATA)
        .map_err(|err| ModuleError::Unavailable(format!("sound inventory: {err}")))
}

/// Replace German umlauts with their ASCII transcriptions.
pub fn replace_umlauts(text: &str) -> String {
    text.replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss")
}

/// Turn a sound text into its file name: lowercase, umlauts
/// transcribed, everything outside `[a-z0-9_-]` dropped.
pub fn slugify(text: &str) -> String {
    replace_umlauts(&text.to_lowercase().replace(' ', "_"))
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

fn soundboard_page(_request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let inventory = sound_data().map_err(|_| PageError::NotFound)?;
    let items = inventory
        .sounds
        .iter()
        .map(|sound| {
            let person_name = inventory
                .personen
                .get(&sound.person)
                .map(String::as_str)
                .unwrap_or(&sound.person);
            sound.to_html(person_name)
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(PageResponse::html(format!("<ul>\n{items}\n</ul>")))
}

fn person_page(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let person = request.captures.first().map(String::as_str).unwrap_or("");
    let inventory = sound_data().map_err(|_| PageError::NotFound)?;
    let Some(person_name) = inventory.personen.get(person) else {
        return Err(PageError::NotFound);
    };
    let items = inventory
        .sounds
        .iter()
        .filter(|sound| sound.person == person)
        .map(|sound| sound.to_html(person_name))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(PageResponse::html(format!(
        "<h1>{person_name}</h1><ul>\n{items}\n</ul>"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request_with_capture(capture: &str) -> PageRequest<'static> {
        PageRequest {
            path: "/kaenguru-soundboard",
            arguments: BTreeMap::new(),
            captures: vec![capture.to_string()],
            module_info: None,
            module_infos: &[],
        }
    }

    #[test]
    fn test_descriptor_builds() {
        let info = module_info().unwrap();
        assert_eq!(info.path(), Some("/kaenguru-soundboard"));
        assert_eq!(info.aliases.len(), 2);
        assert_eq!(info.sub_pages.len(), 1);
    }

    #[test]
    fn test_replace_umlauts() {
        assert_eq!(replace_umlauts("känguru"), "kaenguru");
        assert_eq!(replace_umlauts("größe"), "groesse");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Witzig witzig"), "witzig_witzig");
        assert_eq!(slugify("Nein!"), "nein");
        assert_eq!(slugify("Das Känguru sagt's"), "das_kaenguru_sagts");
    }

    #[test]
    fn test_person_page_known_person() {
        let response = person_page(&request_with_capture("kaenguru")).unwrap();
        assert!(response.body.contains("Das Känguru"));
        assert!(response.body.contains("witzig_witzig"));
        // sounds of other persons are filtered out
        assert!(!response.body.contains("abendbrot"));
    }

    #[test]
    fn test_person_page_unknown_person() {
        let result = person_page(&request_with_capture("nobody"));
        assert!(matches!(result, Err(PageError::NotFound)));
    }

    #[test]
    fn test_soundboard_page_lists_all_sounds() {
        let response = soundboard_page(&request_with_capture("")).unwrap();
        assert!(response.body.contains("nein"));
        assert!(response.body.contains("das_ist_mein_abendbrot"));
    }
}
