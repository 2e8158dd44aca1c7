/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// A name field contained a comma, which the ingestion format cannot represent
    #[error("Name cannot contain a comma: '{0}'")]
    Comma(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a plain string.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// A structured person name: a required first name and a possibly empty last name.
///
/// Free-text names are split by [`PersonName::parse`] using one fixed rule:
///
/// - the text is split on runs of whitespace
/// - the first token is the first name
/// - every remaining token, joined by a single space, is the last name
/// - a single token yields an empty last name
///
/// So `"Mary Ann Smith"` parses to first `Mary`, last `Ann Smith`. Nothing is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PersonName {
    first: NonEmptyText,
    last: String,
}

impl PersonName {
    /// Builds a name from already separated parts.
    ///
    /// The first name must be non-empty; the last name is trimmed and may be empty.
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Result<Self, TextError> {
        let first = NonEmptyText::new(first)?;
        let last = last.as_ref().trim();
        for part in [first.as_str(), last] {
            if part.contains(',') {
                return Err(TextError::Comma(part.to_owned()));
            }
        }
        Ok(Self {
            first,
            last: last.to_owned(),
        })
    }

    /// Splits a free-text full name into first and last name.
    pub fn parse(full_name: &str) -> Result<Self, TextError> {
        let mut tokens = full_name.split_whitespace();
        let first = tokens.next().ok_or(TextError::Empty)?;
        let last = tokens.collect::<Vec<_>>().join(" ");
        Self::new(first, last)
    }

    pub fn first(&self) -> &str {
        self.first.as_str()
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// Exact, case-sensitive match on both parts.
    pub fn matches(&self, first: &str, last: &str) -> bool {
        self.first.as_str() == first && self.last == last
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.last.is_empty() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{} {}", self.first, self.last)
        }
    }
}
