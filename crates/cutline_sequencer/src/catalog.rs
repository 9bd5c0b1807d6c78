// SPDX-License-Identifier: MIT OR Apache-2.0
//! Strip catalog.
//!
//! Lists the media used on a timeline per strip kind, for documenting assets.
//! Names can be filtered through ignored substrings per kind, and copies made
//! by duplicating a strip (`clip.001`, `clip.002`) can be folded together.

use crate::error::{Result, SequencerError};
use crate::strip::{Strip, StripKind};
use crate::timeline::Timeline;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static DUPLICATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d{3}$").expect("duplicate suffix pattern should compile"));

/// Remove a trailing `.NNN` duplication suffix
pub fn strip_duplicate_suffix(name: &str) -> &str {
    match DUPLICATE_SUFFIX.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

/// What to look for
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    /// Strip kinds to list
    pub kinds: Vec<StripKind>,
    /// Substrings that exclude a strip by name, per kind
    pub ignored: HashMap<StripKind, Vec<String>>,
    /// List unique media paths instead of every strip name
    pub ignore_duplication: bool,
    /// Use full paths rather than file names
    pub full_paths: bool,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            kinds: vec![StripKind::Sound, StripKind::Movie, StripKind::Image],
            ignored: HashMap::new(),
            ignore_duplication: true,
            full_paths: true,
        }
    }
}

impl CatalogQuery {
    /// Query for the given kinds
    pub fn kinds(kinds: impl Into<Vec<StripKind>>) -> Self {
        Self {
            kinds: kinds.into(),
            ..Self::default()
        }
    }

    /// Exclude strips of `kind` whose name contains `text`
    pub fn ignore(mut self, kind: StripKind, text: impl Into<String>) -> Self {
        self.ignored.entry(kind).or_default().push(text.into());
        self
    }

    /// List every strip name, duplicates included
    pub fn with_duplicates(mut self) -> Self {
        self.ignore_duplication = false;
        self
    }

    fn ignore_pattern(&self, kind: StripKind) -> Result<Option<Regex>> {
        let Some(texts) = self.ignored.get(&kind).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let pattern = texts
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&pattern)
            .map(Some)
            .map_err(|e| SequencerError::Pattern(e.to_string()))
    }
}

/// Media found on a timeline, per strip kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripCatalog {
    entries: IndexMap<StripKind, Vec<String>>,
    ignore_duplication: bool,
}

impl StripCatalog {
    /// Search a timeline
    pub fn find(timeline: &Timeline, query: &CatalogQuery) -> Result<Self> {
        let mut entries = IndexMap::new();

        for kind in &query.kinds {
            let ignore = query.ignore_pattern(*kind)?;
            let matching = timeline
                .strips()
                .filter(|s| s.kind == *kind)
                .filter(|s| !ignore.as_ref().is_some_and(|re| re.is_match(&s.name)));

            let found: Vec<String> = if query.ignore_duplication {
                matching
                    .filter_map(|s| Self::media_name(s, query.full_paths))
                    .collect::<IndexSet<_>>()
                    .into_iter()
                    .collect()
            } else {
                matching.map(|s| s.name.clone()).collect()
            };
            entries.insert(*kind, found);
        }

        let catalog = Self {
            entries,
            ignore_duplication: query.ignore_duplication,
        };
        tracing::debug!("Catalogued {} strips in '{}'", catalog.total(), timeline.name);
        Ok(catalog)
    }

    fn media_name(strip: &Strip, full_paths: bool) -> Option<String> {
        if full_paths {
            strip.source.path.clone()
        } else {
            strip
                .source
                .file_name()
                .map(|name| strip_duplicate_suffix(name).to_string())
        }
    }

    /// Entries for one kind
    pub fn get(&self, kind: StripKind) -> &[String] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds searched, in query order
    pub fn kinds(&self) -> impl Iterator<Item = StripKind> + '_ {
        self.entries.keys().copied()
    }

    /// Entry count over all kinds
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Check if nothing was found
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for StripCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.ignore_duplication { "ignored" } else { "included" };
        let kinds: Vec<_> = self.kinds().map(|k| k.name()).collect();
        writeln!(f, "Found strips")?;
        writeln!(f, " - duplicates {mode}")?;
        writeln!(f, " - types include '{}'", kinds.join("', '"))?;

        for (kind, entries) in &self.entries {
            writeln!(f)?;
            writeln!(f, "{} strips:", kind.name())?;
            if entries.is_empty() {
                writeln!(f, "(0 strips found)")?;
            }
            for entry in entries {
                writeln!(f, "{entry}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::strip::SourceRef;

    fn timeline() -> Timeline {
        let mut timeline = Timeline::new("Edit");
        let strips = [
            ("voice", StripKind::Sound, "/audio/voice.wav", 0),
            ("voice.001", StripKind::Sound, "/audio/voice.wav", 20),
            ("audio-scratch", StripKind::Sound, "/audio/scratch.wav", 40),
            ("intro", StripKind::Movie, "/video/intro.mp4", 0),
            ("title", StripKind::Text, "", 0),
        ];
        for (i, (name, kind, path, start)) in strips.into_iter().enumerate() {
            let channel = ChannelId(i as u32 + 1);
            let mut strip = Strip::new(name, kind, channel, start, start + 10);
            if !path.is_empty() {
                strip = strip.with_source(SourceRef::file(path));
            }
            timeline.ensure_channel(channel).insert(strip).unwrap();
        }
        timeline
    }

    #[test]
    fn test_duplicate_suffix() {
        assert_eq!(strip_duplicate_suffix("voice.001"), "voice");
        assert_eq!(strip_duplicate_suffix("voice.01"), "voice.01");
        assert_eq!(strip_duplicate_suffix("take.002.wav"), "take.002.wav");
    }

    #[test]
    fn test_unique_paths_with_ignored_names() {
        let query = CatalogQuery::kinds([StripKind::Sound, StripKind::Image]).ignore(StripKind::Sound, "audio-");
        let catalog = StripCatalog::find(&timeline(), &query).unwrap();

        assert_eq!(catalog.get(StripKind::Sound), &["/audio/voice.wav".to_string()]);
        assert!(catalog.get(StripKind::Image).is_empty());
        assert!(catalog.get(StripKind::Movie).is_empty());
        assert_eq!(catalog.total(), 1);
    }

    #[test]
    fn test_names_with_duplicates() {
        let query = CatalogQuery::kinds([StripKind::Sound]).with_duplicates();
        let catalog = StripCatalog::find(&timeline(), &query).unwrap();
        assert_eq!(catalog.get(StripKind::Sound).len(), 3);
    }

    #[test]
    fn test_file_names() {
        let mut query = CatalogQuery::default();
        query.full_paths = false;
        let catalog = StripCatalog::find(&timeline(), &query).unwrap();
        assert_eq!(catalog.get(StripKind::Sound), &["voice.wav".to_string(), "scratch.wav".to_string()]);
        assert_eq!(catalog.get(StripKind::Movie), &["intro.mp4".to_string()]);
    }

    #[test]
    fn test_report() {
        let catalog = StripCatalog::find(&timeline(), &CatalogQuery::kinds([StripKind::Image])).unwrap();
        let report = catalog.to_string();
        assert!(report.contains("IMAGE strips:"));
        assert!(report.contains("(0 strips found)"));
    }
}
