//! Candidate search over the configured template list, plus write-target
//! selection.

use tracing::{debug, trace};

use crate::errors::KeyError;
use crate::params::ParameterSet;
use crate::resolver::{resolve, ResolvedKey};
use crate::template::Template;

/// Ordered, immutable list of candidate templates for reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchList {
    templates: Vec<Template>,
}

impl SearchList {
    /// Build from already-parsed templates; order is preserved as given.
    pub fn new(templates: Vec<Template>) -> Result<Self, KeyError> {
        if templates.is_empty() {
            return Err(KeyError::EmptySearchList);
        }
        Ok(Self { templates })
    }

    /// Parse every pattern; the first malformed entry aborts the load.
    pub fn parse<I, S>(patterns: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let templates = patterns
            .into_iter()
            .map(|p| Template::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(templates)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Least specific template; never absent since the list is non-empty.
    pub fn last(&self) -> &Template {
        &self.templates[self.templates.len() - 1]
    }

    /// Lazily resolve candidates in list order, skipping the ones that need
    /// a parameter `params` does not bind.
    ///
    /// Callers that check existence asynchronously walk this iterator and
    /// stop at their first hit; it performs no I/O itself.
    pub fn candidates<'a>(&'a self, params: &'a ParameterSet) -> impl Iterator<Item = ResolvedKey> + 'a {
        self.templates.iter().filter_map(move |t| match resolve(t, params) {
            Ok(key) => Some(key),
            Err(e) => {
                trace!(template = %t, reason = %e, "candidate not applicable");
                None
            }
        })
    }

    /// Return the earliest candidate that resolves and for which `exists`
    /// reports true. `None` when the list is exhausted.
    pub fn find_first<F>(&self, params: &ParameterSet, mut exists: F) -> Option<ResolvedKey>
    where
        F: FnMut(&str) -> bool,
    {
        let found = self.candidates(params).find(|key| exists(key.as_str()));
        match &found {
            Some(key) => debug!(%key, "search matched"),
            None => debug!(candidates = self.len(), "search exhausted"),
        }
        found
    }
}

/// The parsed key layout of a deployment: read candidates and the single
/// template writes go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolver {
    search: SearchList,
    write: Template,
}

impl KeyResolver {
    pub fn new(search: SearchList, write: Template) -> Self {
        Self { search, write }
    }

    /// Parse configuration input. Without an explicit write template the
    /// last search entry, the least specific one, is the write target.
    pub fn from_patterns<I, S>(search: I, write: Option<&str>) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let search = SearchList::parse(search)?;
        let write = match write {
            Some(raw) => Template::parse(raw)?,
            None => search.last().clone(),
        };
        Ok(Self { search, write })
    }

    pub fn search_list(&self) -> &SearchList {
        &self.search
    }

    pub fn write_template(&self) -> &Template {
        &self.write
    }

    /// Resolve the key a write must land on. Never falls back to another
    /// template; an unbound placeholder is returned as an error.
    pub fn resolve_for_write(&self, params: &ParameterSet) -> Result<ResolvedKey, KeyError> {
        resolve(&self.write, params)
    }

    pub fn find_first<F>(&self, params: &ParameterSet, exists: F) -> Option<ResolvedKey>
    where
        F: FnMut(&str) -> bool,
    {
        self.search.find_first(params, exists)
    }
}
