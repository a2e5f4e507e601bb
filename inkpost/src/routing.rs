use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Policy for post slugs that were not enumerated at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    /// Look the slug up in the content store while the request waits.
    Blocking,
    /// Answer with "not found" without asking the content store.
    Disabled,
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Blocking
    }
}

/// How a requested slug is going to be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The slug was enumerated at launch.
    Prebuilt,
    /// The slug is new, but the fallback allows resolving it on demand.
    OnDemand,
    /// The slug is unknown and the fallback does not allow looking it up.
    Missing,
}

/// The set of post paths enumerated once when the application starts.
///
/// This never changes after launch; posts created later are reachable only
/// through the fallback policy.
#[derive(Debug, Clone)]
pub struct StaticPaths {
    slugs: HashSet<String>,
    fallback: Fallback,
}

impl StaticPaths {
    pub fn new<I>(slugs: I, fallback: Fallback) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        StaticPaths {
            slugs: slugs.into_iter().collect(),
            fallback,
        }
    }

    pub fn resolve(&self, slug: &str) -> Resolution {
        if self.slugs.contains(slug) {
            Resolution::Prebuilt
        } else {
            match self.fallback {
                Fallback::Blocking => Resolution::OnDemand,
                Fallback::Disabled => Resolution::Missing,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

/// The page path of the post with the given slug.
pub fn post_path(slug: &str) -> String {
    format!("/post/{}", slug)
}
