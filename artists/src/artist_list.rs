use crate::errors::ArtistsError;
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};

/// Whitespace stripped from both ends of a name. Includes the byte order
/// mark, which `char::is_whitespace` does not cover.
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Trims `name` and rejects it if nothing is left.
pub fn validate_name(name: &str) -> Result<&str, ArtistsError> {
    let name = name.trim_matches(is_trimmed);
    if name.is_empty() {
        return Err(ArtistsError::MissingName);
    }
    Ok(name)
}

/// Result of applying a mutation to an [`ArtistList`].
///
/// `AlreadyExists` and `NotFound` leave the list untouched and must not be
/// written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Added(String),
    AlreadyExists,
    Removed(String),
    NotFound,
}

impl Outcome {
    /// Message returned to the caller.
    pub fn message(&self) -> String {
        match self {
            Outcome::Added(name) => format!("Added {name}"),
            Outcome::AlreadyExists => "Already exists".to_string(),
            Outcome::Removed(name) => format!("Removed {name}"),
            Outcome::NotFound => "Not found".to_string(),
        }
    }

    /// Description recorded with the write, if the outcome needs one.
    pub fn commit_message(&self) -> Option<String> {
        match self {
            Outcome::Added(name) => Some(format!("Add {name}")),
            Outcome::Removed(name) => Some(format!("Remove {name}")),
            Outcome::AlreadyExists | Outcome::NotFound => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Added(_) => "added",
            Outcome::AlreadyExists => "already_exists",
            Outcome::Removed(_) => "removed",
            Outcome::NotFound => "not_found",
        }
    }
}

/// Stable sort of `names` by their lowercase forms under root-locale
/// collation, so accented initials sort next to their base letter.
fn sort_ignoring_case(names: &mut Vec<String>) -> Result<(), ArtistsError> {
    let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(ArtistsError::Collation)?;

    let mut keyed: Vec<(String, String)> = names
        .drain(..)
        .map(|name| (name.to_lowercase(), name))
        .collect();
    keyed.sort_by(|a, b| collator.compare(&a.0, &b.0));
    names.extend(keyed.into_iter().map(|(_, name)| name));
    Ok(())
}

/// Artist names as persisted in the store file.
///
/// Entries added through [`ArtistList::add`] keep the list unique and sorted
/// ignoring case. Content read from the store is taken as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistList(Vec<String>);

impl ArtistList {
    pub fn new(names: Vec<String>) -> Self {
        ArtistList(names)
    }

    pub fn parse(text: &str) -> Result<Self, ArtistsError> {
        serde_json::from_str(text).map_err(ArtistsError::InvalidContent)
    }

    /// Pretty-printed JSON with two-space indentation, as stored in the file.
    pub fn to_stored_text(&self) -> Result<String, ArtistsError> {
        serde_json::to_string_pretty(self).map_err(ArtistsError::InvalidContent)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_ignore_case(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.0.iter().any(|a| a.to_lowercase() == name)
    }

    /// Adds `name` unless an entry already matches it ignoring case, then
    /// re-sorts the whole list.
    pub fn add(&mut self, name: &str) -> Result<Outcome, ArtistsError> {
        if self.contains_ignore_case(name) {
            return Ok(Outcome::AlreadyExists);
        }

        self.0.push(name.to_string());
        sort_ignoring_case(&mut self.0)?;
        Ok(Outcome::Added(name.to_string()))
    }

    /// Drops every entry exactly equal to `name`. Unlike [`ArtistList::add`]
    /// this comparison is case-sensitive.
    pub fn remove(&mut self, name: &str) -> Outcome {
        let before = self.0.len();
        self.0.retain(|a| a != name);

        if self.0.len() == before {
            return Outcome::NotFound;
        }
        Outcome::Removed(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> ArtistList {
        ArtistList::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Muse \n").unwrap(), "Muse");
        assert!(matches!(validate_name(""), Err(ArtistsError::MissingName)));
        assert!(matches!(
            validate_name("   "),
            Err(ArtistsError::MissingName)
        ));
        assert!(matches!(
            validate_name("\t\n"),
            Err(ArtistsError::MissingName)
        ));
        assert!(matches!(
            validate_name("\u{feff}\u{feff}"),
            Err(ArtistsError::MissingName)
        ));
        assert_eq!(validate_name("\u{feff}Muse\u{a0}").unwrap(), "Muse");
    }

    #[test]
    fn test_add_sorts_ignoring_case() {
        let mut artists = list(&["Muse", "Radiohead"]);

        assert_eq!(
            artists.add("Arcade Fire").unwrap(),
            Outcome::Added("Arcade Fire".into())
        );
        assert_eq!(artists, list(&["Arcade Fire", "Muse", "Radiohead"]));

        artists.add("blur").unwrap();
        artists.add("alt-J").unwrap();
        artists.add("Zola Jesus").unwrap();
        artists.add("beach house").unwrap();
        assert_eq!(
            artists,
            list(&[
                "alt-J",
                "Arcade Fire",
                "beach house",
                "blur",
                "Muse",
                "Radiohead",
                "Zola Jesus"
            ])
        );
    }

    #[test]
    fn test_add_sorts_accented_names_by_base_letter() {
        let mut artists = list(&["Muse", "Radiohead", "Zola Jesus"]);
        artists.add("Ólafur Arnalds").unwrap();
        artists.add("Émilie Simon").unwrap();

        assert_eq!(
            artists,
            list(&[
                "Émilie Simon",
                "Muse",
                "Ólafur Arnalds",
                "Radiohead",
                "Zola Jesus"
            ])
        );
    }

    #[test]
    fn test_add_existing_ignores_case() {
        let mut artists = list(&["Muse"]);
        assert_eq!(artists.add("Muse").unwrap(), Outcome::AlreadyExists);
        assert_eq!(artists.add("MUSE").unwrap(), Outcome::AlreadyExists);
        assert_eq!(artists.add("muse").unwrap(), Outcome::AlreadyExists);
        assert_eq!(artists, list(&["Muse"]));
    }

    #[test]
    fn test_add_existing_does_not_resort() {
        // Store content is not normalised unless something is added
        let mut artists = list(&["Radiohead", "Muse"]);
        assert_eq!(artists.add("muse").unwrap(), Outcome::AlreadyExists);
        assert_eq!(artists, list(&["Radiohead", "Muse"]));
    }

    #[test]
    fn test_add_non_ascii_case_folding() {
        let mut artists = list(&["Björk", "Sigur Rós"]);
        assert_eq!(artists.add("BJÖRK").unwrap(), Outcome::AlreadyExists);
        assert_eq!(
            artists.add("Ólafur Arnalds").unwrap(),
            Outcome::Added("Ólafur Arnalds".into())
        );
        assert!(artists.contains_ignore_case("ólafur arnalds"));
    }

    #[test]
    fn test_remove_is_case_sensitive() {
        let mut artists = list(&["Muse", "Radiohead"]);

        assert_eq!(artists.remove("muse"), Outcome::NotFound);
        assert_eq!(artists, list(&["Muse", "Radiohead"]));

        assert_eq!(artists.remove("Muse"), Outcome::Removed("Muse".into()));
        assert_eq!(artists, list(&["Radiohead"]));

        assert_eq!(artists.remove("Muse"), Outcome::NotFound);
    }

    #[test]
    fn test_remove_drops_all_exact_matches() {
        let mut artists = list(&["Muse", "Muse", "muse"]);
        assert_eq!(artists.remove("Muse"), Outcome::Removed("Muse".into()));
        assert_eq!(artists, list(&["muse"]));
    }

    #[test]
    fn test_stored_text_round_trip() {
        let artists = list(&["Arcade Fire", "Björk", "坂本龍一"]);
        let text = artists.to_stored_text().unwrap();
        assert_eq!(text, "[\n  \"Arcade Fire\",\n  \"Björk\",\n  \"坂本龍一\"\n]");
        assert_eq!(ArtistList::parse(&text).unwrap(), artists);

        assert_eq!(ArtistList::default().to_stored_text().unwrap(), "[]");
    }

    #[test]
    fn test_parse_invalid_content() {
        assert!(matches!(
            ArtistList::parse("{\"artists\": []}"),
            Err(ArtistsError::InvalidContent(_))
        ));
        assert!(matches!(
            ArtistList::parse("[1, 2]"),
            Err(ArtistsError::InvalidContent(_))
        ));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Added("Muse".into()).message(), "Added Muse");
        assert_eq!(Outcome::AlreadyExists.message(), "Already exists");
        assert_eq!(Outcome::Removed("Muse".into()).message(), "Removed Muse");
        assert_eq!(Outcome::NotFound.message(), "Not found");

        assert_eq!(
            Outcome::Added("Muse".into()).commit_message().as_deref(),
            Some("Add Muse")
        );
        assert_eq!(
            Outcome::Removed("Muse".into()).commit_message().as_deref(),
            Some("Remove Muse")
        );
        assert_eq!(Outcome::NotFound.commit_message(), None);
    }
}
