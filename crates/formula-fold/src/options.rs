use serde::{Deserialize, Serialize};

/// Layout knobs for the fold direction.
///
/// All fields have defaults, so a partial JSON object (or `{}`) deserializes to a usable
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoldOptions {
    /// Maximum rendered width of a single-argument call kept on one line.
    pub inline_width: usize,
    /// Maximum line width (including indentation) for `AND`/`OR` natural wrapping.
    pub wrap_width: usize,
    /// Maximum number of `AND`/`OR` arguments packed onto one continuation line.
    pub max_args_per_line: usize,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            inline_width: 40,
            wrap_width: 79,
            max_args_per_line: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: FoldOptions = serde_json::from_str(r#"{"wrapWidth": 100}"#).unwrap();
        assert_eq!(
            opts,
            FoldOptions {
                wrap_width: 100,
                ..FoldOptions::default()
            }
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(FoldOptions::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inlineWidth": 40,
                "wrapWidth": 79,
                "maxArgsPerLine": 3,
            })
        );
    }
}
