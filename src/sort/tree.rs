//! Multi-key grouping tree
//!
//! Level `i` of the tree groups files by the value of `spec[i]` in an ordered
//! map. Every level but the last maps to a child node; the last level maps to
//! the rendered lines of the files sharing that value, in insertion order.
//! Files are never compared with each other, only their extracted values.

use std::collections::BTreeMap;

use crate::file::File;
use crate::format::Renderer;
use crate::names::NameCache;

use super::key::{
    SignedKey, SortDomain, SortKey, SortSpec, TextKey, UnsignedLargeKey, UnsignedSmallKey,
};

type Lines = Box<dyn Iterator<Item = Vec<u8>>>;

/// Accumulates rendered files and yields them in multi-key order.
pub struct SortTree {
    spec: SortSpec,
    reverse: bool,
    root: Node,
    len: usize,
}

impl SortTree {
    pub fn new(spec: SortSpec, reverse: bool) -> Self {
        let root = Node::new(spec.keys());
        Self {
            spec,
            reverse,
            root,
            len: 0,
        }
    }

    pub fn spec(&self) -> &SortSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Render `file` and file it under its value at every level.
    pub fn insert(&mut self, file: &File, renderer: &mut Renderer) {
        let line = renderer.render(file);
        self.root
            .insert(file, self.spec.keys(), renderer.names_mut(), line);
        self.len += 1;
    }

    /// Consume the tree, yielding lines ascending by key 0, then key 1 among
    /// ties, and so on; insertion order among files tied on every key. With
    /// `reverse` the whole sequence comes out backwards.
    pub fn drain(self) -> Drain {
        Drain {
            lines: self.root.into_lines(self.reverse),
        }
    }
}

/// Iterator returned by [`SortTree::drain`].
pub struct Drain {
    lines: Lines,
}

impl Iterator for Drain {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.lines.next()
    }
}

enum Node {
    Internal(Level<Box<Node>>),
    Terminal(Level<Vec<Vec<u8>>>),
}

impl Node {
    /// Node for `keys[0]`, with one more level below it per remaining key.
    fn new(keys: &[SortKey]) -> Self {
        if keys.len() > 1 {
            Node::Internal(Level::new(keys[0]))
        } else {
            Node::Terminal(Level::new(keys[0]))
        }
    }

    fn insert(&mut self, file: &File, keys: &[SortKey], names: &mut NameCache, line: Vec<u8>) {
        match self {
            Node::Internal(level) => {
                let rest = &keys[1..];
                let child = level.slot(file, names, || Box::new(Node::new(rest)));
                child.insert(file, rest, names, line);
            }
            Node::Terminal(level) => level.slot(file, names, Vec::new).push(line),
        }
    }

    fn into_lines(self, reverse: bool) -> Lines {
        match self {
            Node::Internal(level) => Box::new(
                level
                    .into_ordered(reverse)
                    .flat_map(move |child| (*child).into_lines(reverse)),
            ),
            Node::Terminal(level) => Box::new(
                level
                    .into_ordered(reverse)
                    .flat_map(move |bucket| bucket_lines(bucket, reverse)),
            ),
        }
    }

    #[cfg(test)]
    fn depths(&self, depth: usize, out: &mut Vec<usize>) {
        match self {
            Node::Internal(level) => level.for_each(|child| child.depths(depth + 1, out)),
            Node::Terminal(_) => out.push(depth + 1),
        }
    }
}

fn bucket_lines(bucket: Vec<Vec<u8>>, reverse: bool) -> Lines {
    if reverse {
        Box::new(bucket.into_iter().rev())
    } else {
        Box::new(bucket.into_iter())
    }
}

/// One tree level, typed by the comparison domain of its key.
enum Level<C> {
    Text(Grouping<TextKey, C>),
    UnsignedSmall(Grouping<UnsignedSmallKey, C>),
    UnsignedLarge(Grouping<UnsignedLargeKey, C>),
    Signed(Grouping<SignedKey, C>),
}

impl<C: 'static> Level<C> {
    fn new(key: SortKey) -> Self {
        match key {
            SortKey::Text(k) => Level::Text(Grouping::new(k)),
            SortKey::UnsignedSmall(k) => Level::UnsignedSmall(Grouping::new(k)),
            SortKey::UnsignedLarge(k) => Level::UnsignedLarge(Grouping::new(k)),
            SortKey::Signed(k) => Level::Signed(Grouping::new(k)),
        }
    }

    fn slot(&mut self, file: &File, names: &mut NameCache, make: impl FnOnce() -> C) -> &mut C {
        match self {
            Level::Text(g) => g.slot(file, names, make),
            Level::UnsignedSmall(g) => g.slot(file, names, make),
            Level::UnsignedLarge(g) => g.slot(file, names, make),
            Level::Signed(g) => g.slot(file, names, make),
        }
    }

    fn into_ordered(self, reverse: bool) -> Box<dyn Iterator<Item = C>> {
        match self {
            Level::Text(g) => g.into_ordered(reverse),
            Level::UnsignedSmall(g) => g.into_ordered(reverse),
            Level::UnsignedLarge(g) => g.into_ordered(reverse),
            Level::Signed(g) => g.into_ordered(reverse),
        }
    }

    #[cfg(test)]
    fn for_each(&self, mut f: impl FnMut(&C)) {
        match self {
            Level::Text(g) => g.entries.values().for_each(&mut f),
            Level::UnsignedSmall(g) => g.entries.values().for_each(&mut f),
            Level::UnsignedLarge(g) => g.entries.values().for_each(&mut f),
            Level::Signed(g) => g.entries.values().for_each(&mut f),
        }
    }
}

struct Grouping<K: SortDomain, C> {
    key: K,
    entries: BTreeMap<K::Value, C>,
}

impl<K: SortDomain, C: 'static> Grouping<K, C> {
    fn new(key: K) -> Self {
        Self {
            key,
            entries: BTreeMap::new(),
        }
    }

    fn slot(&mut self, file: &File, names: &mut NameCache, make: impl FnOnce() -> C) -> &mut C {
        let value = self.key.extract(file, names);
        self.entries.entry(value).or_insert_with(make)
    }

    fn into_ordered(self, reverse: bool) -> Box<dyn Iterator<Item = C>> {
        let values = self.entries.into_values();
        if reverse {
            Box::new(values.rev())
        } else {
            Box::new(values)
        }
    }
}
