use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Render-agnostic output of the panel, discriminated by the kind the host
/// declared on the payload. Concrete renderers (tree, table, chart) pick a
/// strategy off this variant instead of switching on raw command strings.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelView {
    History(HistoryView),
    Object { content: serde_json::Value },
    Table { data: serde_json::Value },
}

/// The execution-history view: one row per visible record plus control
/// enablement. Handed to the rendering collaborator as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub frames: Vec<FrameRow>,
    pub page: usize,
    pub max_page: usize,
    pub controls: ControlState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRow {
    /// Host-assigned stable record index, the toggle key for expansion.
    pub record_index: usize,
    pub name: String,
    /// Pre-joined `name=value` argument text, empty when the record has none.
    pub args_text: String,
    /// Indentation relative to the shallowest frame in the window.
    pub indent: u32,
    pub expanded: bool,
    /// Only populated while the row is expanded; collapsed rows carry no
    /// location children so large logs stay cheap to render.
    pub locations: Vec<LocationRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRow {
    pub cursor: u64,
    pub name: String,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    pub step_back_enabled: bool,
    pub step_forward_enabled: bool,
    pub prev_page_enabled: bool,
    pub next_page_enabled: bool,
    /// Set when an in-flight navigation request timed out without a fresh
    /// snapshot arriving.
    pub nav_failed: bool,
}

fn toolchain_prefixes() -> &'static [Regex; 2] {
    static PREFIXES: OnceLock<[Regex; 2]> = OnceLock::new();
    PREFIXES.get_or_init(|| {
        [
            Regex::new(r"\.rbenv/versions/\d+\.\d+\.\d+/lib/").expect("static pattern"),
            Regex::new(r"ruby/gems/\d+\.\d+\.\d+/gems/").expect("static pattern"),
        ]
    })
}

/// Strip known toolchain path prefixes from a source location for display.
pub fn display_name(raw: &str) -> String {
    let mut name = raw.to_string();
    for prefix in toolchain_prefixes() {
        if let std::borrow::Cow::Owned(stripped) = prefix.replace(&name, "") {
            name = stripped;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_rbenv_prefix() {
        let raw = "/home/u/.rbenv/versions/3.2.1/lib/ruby/3.2.0/set.rb:123";
        assert_eq!(display_name(raw), "/home/u/ruby/3.2.0/set.rb:123");
    }

    #[test]
    fn strips_gem_prefix() {
        let raw = "ruby/gems/3.2.0/gems/rake-13.0.6/lib/rake.rb:5";
        assert_eq!(display_name(raw), "rake-13.0.6/lib/rake.rb:5");
    }

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(display_name("app/models/user.rb:42"), "app/models/user.rb:42");
    }
}
