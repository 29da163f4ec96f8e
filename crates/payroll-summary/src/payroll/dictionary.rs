use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Published macro disambiguation of rubric labels.
pub const DEFAULT_DICTIONARY_URL: &str =
    "https://raw.githubusercontent.com/dadosjusbr/desambiguador/refs/heads/main/desambiguacao_macro.json";

/// Read-only view over a disambiguation dictionary.
pub trait ItemDictionary {
    /// Exact match of a sanitized rubric key. Returns the macro category with
    /// `_` separators.
    fn lookup(&self, sanitized_item: &str) -> Option<&str>;
}

/// Loads a fresh dictionary snapshot for one run.
pub trait DictionaryProvider: Send + Sync {
    fn load(&self) -> Result<SynonymDictionary, DictionaryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to request dictionary from {url}: {message}")]
    Request { url: String, message: String },
    #[error("dictionary request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dictionary document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The two published layouts: `{"item": "category"}` and
/// `{"category": ["item", ...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DictionaryDocument {
    ByItem(HashMap<String, String>),
    ByCategory(BTreeMap<String, Vec<String>>),
}

/// In-memory dictionary keyed by sanitized rubric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymDictionary {
    categories: HashMap<String, String>,
}

impl SynonymDictionary {
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let categories = entries
            .into_iter()
            .map(|(item, category)| (item.into(), canonical_category(category.as_ref())))
            .collect();
        Self { categories }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DictionaryError> {
        let document: DictionaryDocument = serde_json::from_str(raw)?;
        Ok(Self::from_document(document))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DictionaryError> {
        let document: DictionaryDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(document))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Blocking download. Callers own any retry policy.
    pub fn fetch(url: &str, timeout: Duration) -> Result<Self, DictionaryError> {
        let agent: ureq::Agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        let request_error = |err: ureq::Error| DictionaryError::Request {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = agent.get(url).call().map_err(request_error)?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(DictionaryError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .into_body()
            .read_to_string()
            .map_err(request_error)?;
        Self::from_json_str(&body)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn from_document(document: DictionaryDocument) -> Self {
        match document {
            DictionaryDocument::ByItem(entries) => Self::from_entries(entries),
            DictionaryDocument::ByCategory(groups) => {
                let mut categories = HashMap::new();
                for (category, synonyms) in groups {
                    let category = canonical_category(&category);
                    for synonym in synonyms {
                        categories
                            .entry(synonym)
                            .or_insert_with(|| category.clone());
                    }
                }
                Self { categories }
            }
        }
    }
}

impl ItemDictionary for SynonymDictionary {
    fn lookup(&self, sanitized_item: &str) -> Option<&str> {
        self.categories.get(sanitized_item).map(String::as_str)
    }
}

fn canonical_category(raw: &str) -> String {
    raw.trim().replace('-', "_")
}

/// Where a run gets its dictionary from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    Remote { url: String, timeout: Duration },
    File(PathBuf),
}

impl Default for DictionarySource {
    fn default() -> Self {
        Self::Remote {
            url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionarySource::Remote { url, .. } => write!(f, "{url}"),
            DictionarySource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl DictionaryProvider for DictionarySource {
    fn load(&self) -> Result<SynonymDictionary, DictionaryError> {
        let dictionary = match self {
            DictionarySource::Remote { url, timeout } => SynonymDictionary::fetch(url, *timeout)?,
            DictionarySource::File(path) => SynonymDictionary::from_path(path)?,
        };

        info!(source = %self, entries = dictionary.len(), "disambiguation dictionary loaded");
        Ok(dictionary)
    }
}
