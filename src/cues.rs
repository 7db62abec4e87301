/*!
 * Subtitle cues and the ordered collection the pipeline works on.
 *
 * A [`CueCollection`] is an association list sorted by [`CueKey`]. Keys are
 * derived from the cue start time, so iteration order is always ascending
 * start time and stages can reason about "the next cue" by index.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timecode::Timecode;

/// Width of the zero-padded decimal start time used in cue keys
const KEY_WIDTH: usize = 12;

/// A normalized screen coordinate, both axes in `[0, 1]`, y growing downward
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral around a piece of on-screen text.
///
/// Vertices are ordered top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub vertices: [Vertex; 4],
}

impl BoundingRegion {
    pub fn new(vertices: [Vertex; 4]) -> Self {
        Self { vertices }
    }

    /// Axis-aligned box from its edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new([
            Vertex::new(left, top),
            Vertex::new(right, top),
            Vertex::new(right, bottom),
            Vertex::new(left, bottom),
        ])
    }

    pub fn top_left(&self) -> Vertex {
        self.vertices[0]
    }

    pub fn top_right(&self) -> Vertex {
        self.vertices[1]
    }

    pub fn bottom_right(&self) -> Vertex {
        self.vertices[2]
    }

    pub fn bottom_left(&self) -> Vertex {
        self.vertices[3]
    }

    /// True when this region sits entirely above `other` on screen
    pub fn is_above(&self, other: &BoundingRegion) -> bool {
        self.bottom_left().y < other.top_left().y
    }
}

// @struct: One subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start: Timecode,
    pub end: Timecode,
    pub text: String,
    pub region: BoundingRegion,
    // @field: OCR confidence in [0, 1]
    pub confidence: f32,
}

impl Cue {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>, region: BoundingRegion, confidence: f32) -> Self {
        Self {
            start: Timecode::from_milliseconds(start_ms),
            end: Timecode::from_milliseconds(end_ms),
            text: text.into(),
            region,
            confidence,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.source.saturating_sub(self.start.source)
    }

    /// True when both intervals share some instant, or start together
    pub fn overlaps(&self, other: &Cue) -> bool {
        self.start.source == other.start.source
            || (self.start.source < other.end.source && other.start.source < self.end.source)
    }
}

/// Identity of a cue inside a collection.
///
/// Renders as the 12-digit zero-padded start time. Cues sharing a start time
/// get a letter suffix in arrival order (`a`, `b`, ... `z`, `aa`, ...); the
/// first one keeps the bare key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CueKey {
    start_ms: u64,
    occurrence: u32,
}

impl CueKey {
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn occurrence(&self) -> u32 {
        self.occurrence
    }

    fn suffix(&self) -> String {
        let mut n = self.occurrence;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push(b'a' + (n % 26) as u8);
            n /= 26;
        }
        letters.reverse();
        String::from_utf8_lossy(&letters).into_owned()
    }
}

impl fmt::Display for CueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}{}", self.start_ms, self.suffix(), width = KEY_WIDTH)
    }
}

/// Ordered association list of cues.
///
/// Every mutation keeps the entries sorted by key; removing by index
/// preserves the relative order of the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueCollection {
    entries: Vec<(CueKey, Cue)>,
}

impl CueCollection {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert a cue, disambiguating its key if the start time is taken
    pub fn insert(&mut self, cue: Cue) -> CueKey {
        let start_ms = cue.start.source;
        let first = self.entries.partition_point(|(k, _)| k.start_ms < start_ms);
        let taken = self.entries[first..]
            .iter()
            .take_while(|(k, _)| k.start_ms == start_ms)
            .count();
        let key = CueKey {
            start_ms,
            occurrence: taken as u32,
        };
        self.entries.insert(first + taken, (key, cue));
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.entries.get(index).map(|(_, cue)| cue)
    }

    /// Mutable access by position. Callers may change anything but the
    /// start time, which would break the ordering.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cue> {
        self.entries.get_mut(index).map(|(_, cue)| cue)
    }

    pub fn key_at(&self, index: usize) -> Option<CueKey> {
        self.entries.get(index).map(|(key, _)| *key)
    }

    pub fn find(&self, key: &CueKey) -> Option<&Cue> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn remove(&mut self, index: usize) -> Option<Cue> {
        if index < self.entries.len() {
            Some(self.entries.remove(index).1)
        } else {
            None
        }
    }

    /// Keep only cues for which the predicate returns true
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&CueKey, &Cue) -> bool,
    {
        self.entries.retain(|(key, cue)| keep(key, cue));
    }

    pub fn keys(&self) -> impl Iterator<Item = CueKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.entries.iter().map(|(_, cue)| cue)
    }

    pub fn cues_mut(&mut self) -> impl Iterator<Item = &mut Cue> {
        self.entries.iter_mut().map(|(_, cue)| cue)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CueKey, &Cue)> {
        self.entries.iter().map(|(key, cue)| (key, cue))
    }

    /// The cue at `index` and its successor, the first one mutable
    pub fn pair_mut(&mut self, index: usize) -> Option<(&mut Cue, &Cue)> {
        if index + 1 >= self.entries.len() {
            return None;
        }
        let (head, tail) = self.entries.split_at_mut(index + 1);
        Some((&mut head[index].1, &tail[0].1))
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.entries.into_iter().map(|(_, cue)| cue).collect()
    }
}

impl FromIterator<Cue> for CueCollection {
    fn from_iter<I: IntoIterator<Item = Cue>>(iter: I) -> Self {
        let mut collection = CueCollection::new();
        for cue in iter {
            collection.insert(cue);
        }
        collection
    }
}
