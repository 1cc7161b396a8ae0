//! Component Token Grammar
//!
//! Every entry of a track is a single token string. A token beginning with
//! `_PAUSE` names a pause kind, the exact literal `_REPEAT_PREVIOUS_WORD`
//! repeats the previous item muted, and anything else is a performed clip of
//! the form `<label> [<performer>]`.

/// Prefix that marks a token as a pause kind.
pub const PAUSE_PREFIX: &str = "_PAUSE";

/// Literal token that repeats the previous item, muted.
pub const REPEAT_TOKEN: &str = "_REPEAT_PREVIOUS_WORD";

/// A classified component token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// A timed gap; `kind` is the full token (e.g. `_PAUSE_AFTER_WORD`).
    Pause { kind: String },
    /// A muted duplicate of the previous item in the same track.
    Repeat,
    /// A performed clip; `label` is the full token.
    Clip { label: String, performer: String },
}

impl Component {
    /// Classify a raw token. Pure and deterministic: the same token always
    /// yields the same variant.
    pub fn classify(token: &str) -> Component {
        if token.starts_with(PAUSE_PREFIX) {
            Component::Pause {
                kind: token.to_string(),
            }
        } else if token == REPEAT_TOKEN {
            Component::Repeat
        } else {
            Component::Clip {
                label: token.to_string(),
                performer: performer(token).to_string(),
            }
        }
    }
}

/// Extract the performer from a clip token.
///
/// The performer is the substring between the first `[` and the first `]`
/// after it: `"Apple [Beau]"` yields `"Beau"`. Missing or malformed brackets
/// degrade to an empty performer rather than an error; such clips land on an
/// empty-named track.
pub fn performer(token: &str) -> &str {
    let open = match token.find('[') {
        Some(i) => i,
        None => return "",
    };
    let rest = &token[open + 1..];
    match rest.find(']') {
        Some(close) => &rest[..close],
        None => "",
    }
}

/// Sort key used by the availability report: performer first, then the full
/// label, so all of one performer's clips group together.
pub fn component_key(token: &str) -> String {
    format!("{}{}", performer(token), token)
}
