//! Reading a potion out of Dice Bot's purchase message.
//!
//! Dice Bot announces a potion as BBCode, roughly:
//!
//! ```text
//! Huge flask of [b]Skin Color[/b][color=orange] (...)[/color][eicon]potion11[/eicon]
//! [sub]Changes the color of your skin to dark red.[/sub]
//! ```
//!
//! The name is the first bold span, the eicon is the first `[eicon]` after
//! it, and the description is the first `[sub]` after the eicon.

use darkest_state::Potion;

/// Returns the text between `open` and the next `close`, searching from
/// byte offset `from`, and the offset just past `close`.
fn between<'a>(text: &'a str, from: usize, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let rest = text.get(from..)?;
    let start = rest.find(open)? + open.len();
    let len = rest[start..].find(close)?;
    let inner = &rest[start..start + len];
    Some((inner, from + start + len + close.len()))
}

/// Parses a potion from `message`, or `None` if any part is missing or
/// empty.
pub fn parse_potion(message: &str) -> Option<Potion> {
    let (name, after_name) = between(message, 0, "[b]", "[/b]")?;
    let (eicon, after_eicon) = between(message, after_name, "[eicon]", "[/eicon]")?;
    let (description, _) = between(message, after_eicon, "[sub]", "[/sub]")?;

    let potion = Potion::new(name.trim(), eicon.trim(), description.trim());
    if potion.is_incomplete() {
        return None;
    }
    Some(potion)
}
