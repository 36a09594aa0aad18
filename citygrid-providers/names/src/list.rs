use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use citygrid_core::NamePool;
use serde_json::Value;
use tracing::debug;

use crate::errors::NameListError;

/// Keys under which a JSON object may list its street names.
const LIST_KEYS: [&str; 2] = ["ruas", "streets"];

/// A validated, non-empty list of candidate street names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreetNameList {
    names: Vec<String>,
}

impl StreetNameList {
    /// Parses a JSON document: `{"ruas": [...]}`, `{"streets": [...]}` or a
    /// bare array of strings.
    ///
    /// # Errors
    /// Returns [`NameListError::Json`] for malformed JSON,
    /// [`NameListError::UnexpectedShape`] when the document is not one of the
    /// accepted layouts, and [`NameListError::EmptyInput`] when no usable
    /// name remains.
    ///
    /// # Examples
    /// ```
    /// use citygrid_providers_names::StreetNameList;
    ///
    /// let list = StreetNameList::try_from_json_reader(r#"{"ruas": ["Rua A", " Rua B "]}"#.as_bytes())?;
    /// assert_eq!(list.names(), ["Rua A", "Rua B"]);
    /// # Ok::<(), citygrid_providers_names::NameListError>(())
    /// ```
    pub fn try_from_json_reader<R: Read>(reader: R) -> Result<Self, NameListError> {
        let document: Value = serde_json::from_reader(reader)?;
        let entries = match &document {
            Value::Array(entries) => entries,
            Value::Object(object) => LIST_KEYS
                .iter()
                .find_map(|key| object.get(*key))
                .and_then(Value::as_array)
                .ok_or(NameListError::UnexpectedShape {
                    reason: "object must hold a `ruas` or `streets` array",
                })?,
            _ => {
                return Err(NameListError::UnexpectedShape {
                    reason: "document must be an array or an object",
                });
            }
        };
        let names = entries
            .iter()
            .map(|entry| {
                entry.as_str().ok_or(NameListError::UnexpectedShape {
                    reason: "every entry must be a string",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_candidates(names)
    }

    /// Reads one name per line, ignoring blank lines.
    ///
    /// # Errors
    /// Returns [`NameListError::Io`] if reading fails and
    /// [`NameListError::EmptyInput`] when no usable name remains.
    ///
    /// # Examples
    /// ```
    /// use citygrid_providers_names::StreetNameList;
    ///
    /// let list = StreetNameList::try_from_text_reader("Rua A\r\n\nRua B\n".as_bytes())?;
    /// assert_eq!(list.len(), 2);
    /// # Ok::<(), citygrid_providers_names::NameListError>(())
    /// ```
    pub fn try_from_text_reader<R: BufRead>(reader: R) -> Result<Self, NameListError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::from_candidates(lines)
    }

    /// Loads a name list from disk, parsing `.json` files as JSON and
    /// anything else as text.
    ///
    /// # Errors
    /// Returns [`NameListError::Io`] if the file cannot be opened, plus the
    /// errors of the selected parser.
    pub fn try_from_path(path: impl AsRef<Path>) -> Result<Self, NameListError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let list = if is_json {
            Self::try_from_json_reader(reader)?
        } else {
            Self::try_from_text_reader(reader)?
        };
        debug!(path = %path.display(), names = list.len(), "loaded street names");
        Ok(list)
    }

    fn from_candidates<I, S>(candidates: I) -> Result<Self, NameListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = candidates
            .into_iter()
            .map(|candidate| candidate.as_ref().trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            return Err(NameListError::EmptyInput);
        }
        Ok(Self { names })
    }

    /// Names in file order, trimmed.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the list holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Builds a fresh [`NamePool`] over these names.
    #[must_use]
    pub fn to_pool(&self) -> NamePool {
        NamePool::new(self.names.iter().cloned())
    }
}

impl IntoIterator for StreetNameList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}
