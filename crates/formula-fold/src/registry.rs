//! Mode registry: the fixed table binding mode ids to translators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FoldError;
use crate::lexer::is_cell_ref;
use crate::text::{indent_width, segments};
use crate::translator::{Translator, ANNOTATED, COMPACT, CSS, JAVASCRIPT, PLAIN, PYTHON};

/// A target notation. Serializes as its short id (`"j"`, `"a"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "j")]
    JavaScript,
    #[serde(rename = "a")]
    Annotated,
    #[serde(rename = "p")]
    Plain,
    #[serde(rename = "c")]
    Compact,
    #[serde(rename = "py")]
    Python,
    #[serde(rename = "css")]
    Css,
}

struct ModeEntry {
    mode: Mode,
    id: &'static str,
    aliases: &'static [&'static str],
    display_name: &'static str,
    translator: &'static dyn Translator,
}

static MODES: [ModeEntry; 6] = [
    ModeEntry {
        mode: Mode::JavaScript,
        id: "j",
        aliases: &["javascript", "js"],
        display_name: "JavaScript-like syntax highlighting",
        translator: &JAVASCRIPT,
    },
    ModeEntry {
        mode: Mode::Annotated,
        id: "a",
        aliases: &["annotated"],
        display_name: "Annotated Excel syntax with comments",
        translator: &ANNOTATED,
    },
    ModeEntry {
        mode: Mode::Plain,
        id: "p",
        aliases: &["plain"],
        display_name: "Plain Excel syntax with smart indenting",
        translator: &PLAIN,
    },
    ModeEntry {
        mode: Mode::Compact,
        id: "c",
        aliases: &["compact"],
        display_name: "Compact Excel syntax, minimal spacing",
        translator: &COMPACT,
    },
    ModeEntry {
        mode: Mode::Python,
        id: "py",
        aliases: &["python"],
        display_name: "Python-like syntax highlighting",
        translator: &PYTHON,
    },
    ModeEntry {
        mode: Mode::Css,
        id: "css",
        aliases: &[],
        display_name: "CSS-like syntax highlighting",
        translator: &CSS,
    },
];

const ALL_MODES: [Mode; 6] = [
    Mode::JavaScript,
    Mode::Annotated,
    Mode::Plain,
    Mode::Compact,
    Mode::Python,
    Mode::Css,
];

impl Mode {
    pub fn all() -> &'static [Mode] {
        &ALL_MODES
    }

    /// Case-insensitive lookup over ids and aliases.
    pub fn from_id(id: &str) -> Option<Mode> {
        let id = id.trim();
        MODES
            .iter()
            .find(|entry| {
                entry.id.eq_ignore_ascii_case(id)
                    || entry.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(id))
            })
            .map(|entry| entry.mode)
    }

    pub fn id(self) -> &'static str {
        self.entry().id
    }

    pub fn aliases(self) -> &'static [&'static str] {
        self.entry().aliases
    }

    pub fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    pub fn translator(self) -> &'static dyn Translator {
        self.entry().translator
    }

    /// Whether folded output in this mode carries no comments at all.
    pub fn suppresses_comments(self) -> bool {
        self.translator().section_comment("").is_none()
    }

    fn entry(self) -> &'static ModeEntry {
        match self {
            Mode::JavaScript => &MODES[0],
            Mode::Annotated => &MODES[1],
            Mode::Plain => &MODES[2],
            Mode::Compact => &MODES[3],
            Mode::Python => &MODES[4],
            Mode::Css => &MODES[5],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = FoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::from_id(s).ok_or_else(|| FoldError::InvalidMode(s.to_string()))
    }
}

/// Translator registered for `id`.
pub fn translator(id: &str) -> Result<&'static dyn Translator, FoldError> {
    Ok(id.parse::<Mode>()?.translator())
}

/// Guess which mode produced `text`. `None` when nothing identifies it.
pub fn detect_mode(text: &str) -> Option<Mode> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }
    if lines.len() == 1 {
        log::debug!("single-line input; treating it as plain Excel");
        return Some(Mode::Plain);
    }

    for line in &lines {
        let line = line.trim();
        if let Some(entry) = MODES
            .iter()
            .find(|entry| entry.translator.header_comment().as_deref() == Some(line))
        {
            log::debug!("detected mode {} from its header comment", entry.id);
            return Some(entry.mode);
        }
    }

    let starts_with = |marker: &str| {
        lines
            .iter()
            .any(|line| line.trim_start().starts_with(marker))
    };
    if starts_with("//") {
        let quoted_refs = segments(text)
            .iter()
            .any(|segment| segment.literal_content().is_some_and(is_cell_ref));
        let mode = if quoted_refs {
            Mode::JavaScript
        } else {
            Mode::Annotated
        };
        log::debug!("detected mode {mode} from `//` comments");
        return Some(mode);
    }
    if lines.iter().any(|line| {
        let line = line.trim_start();
        line == "#" || line.starts_with("# ")
    }) {
        log::debug!("detected mode py from `#` comments");
        return Some(Mode::Python);
    }
    if starts_with("/*") {
        log::debug!("detected mode css from `/*` comments");
        return Some(Mode::Css);
    }

    let indent = lines
        .iter()
        .map(|line| indent_width(line))
        .filter(|width| *width > 0)
        .min()?;
    let mode = if indent == 2 {
        Mode::Compact
    } else {
        Mode::Plain
    };
    log::debug!("detected mode {mode} from {indent}-column indentation");
    Some(mode)
}
