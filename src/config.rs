//! Board Configuration
//!
//! Read once from the page URL: `?ranking=<id>&mode=owner|coeditor|viewer|preview`.

use crate::drag::DragOptions;

/// Delay between the last local mutation and the network write
pub const AUTOSAVE_DEBOUNCE_MS: u32 = 500;

/// How the current user may interact with the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    Owner,
    CoEditor,
    #[default]
    Viewer,
    /// Anonymous template preview: pool reorder only, nothing persisted
    Preview,
}

impl AccessMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "owner" => Some(AccessMode::Owner),
            "coeditor" | "co-editor" | "edit" => Some(AccessMode::CoEditor),
            "viewer" | "view" => Some(AccessMode::Viewer),
            "preview" => Some(AccessMode::Preview),
            _ => None,
        }
    }

    pub fn can_drag(&self) -> bool {
        !matches!(self, AccessMode::Viewer)
    }

    pub fn can_quick_edit(&self) -> bool {
        matches!(self, AccessMode::Owner | AccessMode::CoEditor)
    }

    pub fn persists(&self) -> bool {
        matches!(self, AccessMode::Owner | AccessMode::CoEditor)
    }

    pub fn drag_options(&self) -> DragOptions {
        DragOptions {
            cells_blocked: matches!(self, AccessMode::Preview),
            overlay_editing: self.can_quick_edit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub ranking_id: Option<String>,
    pub mode: AccessMode,
}

impl BoardConfig {
    /// Parse a query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Self {
        let mut ranking_id = None;
        let mut mode = None;
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_encoding::percent_decode_str(value)
                .decode_utf8_lossy()
                .into_owned();
            match key {
                "ranking" if !value.is_empty() => ranking_id = Some(value),
                "mode" => mode = AccessMode::parse(&value),
                _ => {}
            }
        }
        Self {
            ranking_id,
            mode: mode.unwrap_or_default(),
        }
    }

    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|window| window.location().search().ok())
            .unwrap_or_default();
        let config = Self::from_query(&search);
        log::info!("[CONFIG] ranking={:?} mode={:?}", config.ranking_id, config.mode);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parsing() {
        let config = BoardConfig::from_query("?ranking=r%2042&mode=coeditor");
        assert_eq!(config.ranking_id.as_deref(), Some("r 42"));
        assert_eq!(config.mode, AccessMode::CoEditor);
    }

    #[test]
    fn test_defaults_to_viewer() {
        let config = BoardConfig::from_query("ranking=abc&mode=bogus");
        assert_eq!(config.mode, AccessMode::Viewer);
        assert_eq!(BoardConfig::from_query("").ranking_id, None);
    }

    #[test]
    fn test_preview_blocks_cells() {
        let options = AccessMode::Preview.drag_options();
        assert!(options.cells_blocked);
        assert!(!options.overlay_editing);
        assert!(!AccessMode::Preview.persists());
        assert!(AccessMode::Preview.can_drag());
        assert!(!AccessMode::Viewer.can_drag());
    }
}
