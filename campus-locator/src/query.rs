//! Textual classification of search queries.
//!
//! A query is either a room reference qualified by a building
//! ("NH 110", "NH110", "Nedderman Hall B22"), a bare room token ("B22"),
//! or neither, in which case only building search applies.

use regex::Regex;
use std::sync::LazyLock;

/// `NH B22`, `NH 110`
static SPACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z]+)\s+([A-Z]?\d+[A-Z]?)$").unwrap());

/// `B22`, `110`, `112A`
static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z]?\d+[A-Z]?)$").unwrap());

/// `NH110`, `NHB22`; the letter run is split from the room later
static COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([A-Z]+)(\d+[A-Z]?)$").unwrap());

/// `Nedderman Hall B22`
static PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+([A-Z]?\d+[A-Z]?)$").unwrap());

/// A building token paired with the room token to look up in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomQuery {
    pub building: String,
    pub room: String,
}

impl RoomQuery {
    fn new(building: &str, room: &str) -> Self {
        Self {
            building: building.trim().to_string(),
            room: room.to_uppercase(),
        }
    }
}

/// Shape of a search string, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryShape {
    /// Letters, whitespace, room token
    Spaced(RoomQuery),
    /// Room token with no building; building and floor must be inferred
    BareRoom(String),
    /// Letters run directly followed by a room token. Holds every plausible
    /// split, most specific first.
    Compact(Vec<RoomQuery>),
    /// Free-text building phrase followed by a room token
    Phrase(RoomQuery),
}

impl QueryShape {
    /// Building/room splits to try, in order. Empty for bare rooms.
    pub fn candidates(&self) -> &[RoomQuery] {
        match self {
            QueryShape::Spaced(q) | QueryShape::Phrase(q) => std::slice::from_ref(q),
            QueryShape::Compact(splits) => splits,
            QueryShape::BareRoom(_) => &[],
        }
    }
}

/// Classify a query. Returns `None` for text that is not room-shaped.
///
/// Bare room tokens are recognized before the compact form, so "B22" is
/// never read as building "B" plus room "22".
pub fn classify(query: &str) -> Option<QueryShape> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }

    if let Some(caps) = SPACED.captures(q) {
        return Some(QueryShape::Spaced(RoomQuery::new(&caps[1], &caps[2])));
    }

    if BARE.is_match(q) {
        return Some(QueryShape::BareRoom(q.to_uppercase()));
    }

    if let Some(caps) = COMPACT.captures(q) {
        return Some(QueryShape::Compact(compact_splits(&caps[1], &caps[2])));
    }

    if let Some(caps) = PHRASE.captures(q) {
        return Some(QueryShape::Phrase(RoomQuery::new(&caps[1], &caps[2])));
    }

    None
}

/// Split "NHB22" into ("NH", "B22") before ("NHB", "22"): a trailing B on
/// the letter run reads as a basement marker first.
fn compact_splits(letters: &str, digits: &str) -> Vec<RoomQuery> {
    let mut splits = Vec::with_capacity(2);

    if letters.len() > 1 && letters.ends_with(['B', 'b']) {
        let building = &letters[..letters.len() - 1];
        splits.push(RoomQuery::new(building, &format!("B{}", digits)));
    }
    splits.push(RoomQuery::new(letters, digits));

    splits
}

/// Floor level implied by a room token: "B22" is on "B", "110" on "1".
pub fn floor_level(room: &str) -> Option<String> {
    match room.chars().next()? {
        'B' | 'b' => Some("B".to_string()),
        c if c.is_ascii_digit() => Some(c.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(shape: QueryShape) -> RoomQuery {
        assert_eq!(shape.candidates().len(), 1, "{:?}", shape);
        shape.candidates()[0].clone()
    }

    #[test]
    fn test_spaced_form() {
        let q = single(classify("NH 110").unwrap());
        assert_eq!(q, RoomQuery::new("NH", "110"));

        let q = single(classify("  nh   b22 ").unwrap());
        assert_eq!(q.building, "nh");
        assert_eq!(q.room, "B22");
    }

    #[test]
    fn test_bare_room_is_never_compact() {
        assert_eq!(classify("B22"), Some(QueryShape::BareRoom("B22".to_string())));
        assert_eq!(classify("b22"), Some(QueryShape::BareRoom("B22".to_string())));
        assert_eq!(classify("110"), Some(QueryShape::BareRoom("110".to_string())));
        assert_eq!(classify("112a"), Some(QueryShape::BareRoom("112A".to_string())));
    }

    #[test]
    fn test_compact_form_without_basement_marker() {
        let shape = classify("NH110").unwrap();
        assert_eq!(shape.candidates(), &[RoomQuery::new("NH", "110")]);
    }

    #[test]
    fn test_compact_form_prefers_basement_split() {
        let shape = classify("NHB22").unwrap();
        assert_eq!(
            shape.candidates(),
            &[RoomQuery::new("NH", "B22"), RoomQuery::new("NHB", "22")]
        );
    }

    #[test]
    fn test_phrase_form() {
        let q = single(classify("Nedderman Hall B22").unwrap());
        assert_eq!(q.building, "Nedderman Hall");
        assert_eq!(q.room, "B22");
    }

    #[test]
    fn test_non_room_queries() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify("NH"), None);
        assert_eq!(classify("Nedderman"), None);
        assert_eq!(classify("110 NH"), None);
    }

    #[test]
    fn test_floor_level() {
        assert_eq!(floor_level("B22").as_deref(), Some("B"));
        assert_eq!(floor_level("b05").as_deref(), Some("B"));
        assert_eq!(floor_level("110").as_deref(), Some("1"));
        assert_eq!(floor_level("312A").as_deref(), Some("3"));
        assert_eq!(floor_level("A110"), None);
        assert_eq!(floor_level(""), None);
    }
}
