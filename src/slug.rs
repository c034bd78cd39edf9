use std::future::Future;

use unicode_normalization::UnicodeNormalization;

use crate::error::AppError;

/// SlugScope
///
/// The entity type a slug must be unique within. Each scope maps to its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugScope {
    Property,
    Post,
    Category,
}

impl SlugScope {
    /// Candidate used when a title slugifies to nothing (e.g. it was only punctuation).
    pub fn fallback(&self) -> &'static str {
        match self {
            SlugScope::Property => "property",
            SlugScope::Post => "post",
            SlugScope::Category => "category",
        }
    }
}

/// slugify
///
/// Turns a human-readable title into a URL-safe candidate:
/// accents are decomposed and dropped ("Decoración" -> "decoracion"), the text is
/// lowercased, anything other than word characters, whitespace and hyphens is removed,
/// whitespace/hyphen runs collapse to a single `-`, and leading/trailing `-`/`_` are trimmed.
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        } else if c == '-' || c.is_ascii_whitespace() {
            pending_separator = true;
        }
        // Any other character is dropped without acting as a separator.
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// resolve_unique
///
/// Returns `candidate` if `exists` reports it free, otherwise the first free
/// `candidate-1`, `candidate-2`, ...
///
/// The existence check is sequential and not guarded by a transaction: two concurrent
/// creates with the same title can both observe the same free slug. The unique
/// constraints on the slug columns turn that race into a `Conflict` error.
pub async fn resolve_unique<F, Fut>(candidate: &str, mut exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    if !exists(candidate.to_string()).await? {
        return Ok(candidate.to_string());
    }

    let mut counter: u64 = 1;
    loop {
        let attempt = format!("{}-{}", candidate, counter);
        if !exists(attempt.clone()).await? {
            return Ok(attempt);
        }
        counter += 1;
    }
}

/// candidate_for
///
/// `slugify(text)`, or the scope's fallback when the title has no sluggable characters.
pub fn candidate_for(scope: SlugScope, text: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        scope.fallback().to_string()
    } else {
        slug
    }
}
