// i18n.rs - runtime string tables
//
// Strings come from assets/i18n/<lang>.json, or from a single
// assets/i18n.json shaped { "<lang>": { "key": "value" } }. English is
// compiled in as the last fallback, so a missing assets directory still
// yields readable text. Lookup: tr("key") / tr_with("key", [("name", ..)])
// with {name} placeholders.
//
// Language selection: --lang <code>, then GALLERY_LANG, then "en".

use crate::config::find_asset;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

pub const FALLBACK_LANG: &str = "en";
const LANG_ENV: &str = "GALLERY_LANG";
const EMBEDDED_EN: &str = include_str!("../assets/i18n/en.json");

#[derive(Debug, Clone, Default)]
pub struct I18n {
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

impl I18n {
    pub fn lookup(&self, key: &str) -> String {
        self.map
            .get(key)
            .or_else(|| self.fallback_map.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn load_multi_lang_json(path: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut all: HashMap<String, HashMap<String, String>> = serde_json::from_str(&text).ok()?;
    all.remove(lang)
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let per_lang = find_asset(&Path::new("i18n").join(format!("{}.json", lang))).and_then(|p| load_json_map(&p));
    if let Some(m) = per_lang {
        return m;
    }
    find_asset(Path::new("i18n.json"))
        .and_then(|p| load_multi_lang_json(&p, lang))
        .unwrap_or_default()
}

fn embedded_fallback() -> HashMap<String, String> {
    serde_json::from_str(EMBEDDED_EN).unwrap_or_default()
}

/// Initialize global i18n. Later calls switch the language in place.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();

    let mut fallback_map = embedded_fallback();
    fallback_map.extend(load_lang(FALLBACK_LANG));
    let map = if lang == FALLBACK_LANG {
        HashMap::new()
    } else {
        load_lang(&lang)
    };
    if map.is_empty() && lang != FALLBACK_LANG {
        log::warn!("no strings found for language {:?}, using {}", lang, FALLBACK_LANG);
    }

    let i = I18n {
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

/// Localized text for `key`; the key itself when nothing matches.
pub fn tr(key: &str) -> String {
    match I18N.get().and_then(|l| l.read().ok()) {
        Some(i) => i.lookup(key),
        None => embedded_fallback()
            .remove(key)
            .unwrap_or_else(|| key.to_string()),
    }
}

/// Replaces `{name}` placeholders; unknown placeholders are left alone.
pub fn substitute(template: &str, args: &[(&str, String)]) -> String {
    let mut s = template.to_string();
    for (k, v) in args {
        s = s.replace(&format!("{{{}}}", k), v);
    }
    s
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(&tr(key), args)
}

/// Language from the command line, then the environment.
pub fn resolve_lang(cli: Option<&str>) -> String {
    if let Some(v) = cli.filter(|v| !v.trim().is_empty()) {
        return v.to_string();
    }
    match std::env::var(LANG_ENV) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => FALLBACK_LANG.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        let s = substitute("loaded {count} works from {path}", &[("count", "6".into()), ("path", "a.json".into())]);
        assert_eq!(s, "loaded 6 works from a.json");
        assert_eq!(substitute("{missing}", &[]), "{missing}");
    }

    #[test]
    fn embedded_english_covers_ui_keys() {
        let en = embedded_fallback();
        for key in ["app.title", "ui.auto_rotate_on", "ui.auto_rotate_off", "status.fps"] {
            assert!(en.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn lookup_falls_back_then_echoes_key() {
        let mut i = I18n::default();
        i.map.insert("a".into(), "un".into());
        i.fallback_map.insert("b".into(), "two".into());
        assert_eq!(i.lookup("a"), "un");
        assert_eq!(i.lookup("b"), "two");
        assert_eq!(i.lookup("c"), "c");
    }

    #[test]
    fn cli_language_wins() {
        assert_eq!(resolve_lang(Some("ja")), "ja");
    }
}
