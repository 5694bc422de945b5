//! Insertion points ("gaps") inside a punctuation task's working text.
//!
//! A gap starts life at every space of the original sentence. Offsets are
//! character offsets into the *current* working text, so every edit that
//! changes the text length must move the gaps after it with [`HighlightSet::shift`].
//! Gaps are never added or removed while editing; each keeps a stable
//! [`HighlightId`] so callers can refer to "the same gap" across shifts.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightId(usize);

impl HighlightId {
    pub fn ordinal(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    id: HighlightId,
    pub space_index: usize,
    pub is_selected: bool,
    pub has_punctuation: bool,
}

impl Highlight {
    fn new(id: HighlightId, space_index: usize) -> Self {
        Self {
            id,
            space_index,
            is_selected: false,
            has_punctuation: false,
        }
    }

    pub fn id(&self) -> HighlightId {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
    highlights: Vec<Highlight>,
}

impl HighlightSet {
    pub fn from_sentence(sentence: &str) -> Self {
        let mut set = Self::default();
        set.initialize(sentence);
        set
    }

    /// Rebuild from scratch: one unselected, empty gap per space character.
    pub fn initialize(&mut self, sentence: &str) {
        self.highlights.clear();
        for (offset, ch) in sentence.chars().enumerate() {
            if ch == ' ' {
                let id = HighlightId(self.highlights.len());
                self.highlights.push(Highlight::new(id, offset));
            }
        }
    }

    /// Select the gap sitting at `space_index` and deselect every other one.
    /// Returns false and leaves the set untouched when no gap sits there.
    pub fn select(&mut self, space_index: usize) -> bool {
        if !self.highlights.iter().any(|h| h.space_index == space_index) {
            return false;
        }
        for h in &mut self.highlights {
            h.is_selected = h.space_index == space_index;
        }
        true
    }

    pub fn select_id(&mut self, id: HighlightId) -> bool {
        match self.get(id) {
            Some(h) => {
                let space_index = h.space_index;
                self.select(space_index)
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        for h in &mut self.highlights {
            h.is_selected = false;
        }
    }

    /// Move every gap at or after `from_inclusive` by `delta` characters.
    pub fn shift(&mut self, from_inclusive: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for h in &mut self.highlights {
            if h.space_index >= from_inclusive {
                h.space_index = h.space_index.saturating_add_signed(delta);
            }
        }
    }

    pub fn selected(&self) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.is_selected)
    }

    pub fn selected_id(&self) -> Option<HighlightId> {
        self.selected().map(Highlight::id)
    }

    pub fn selected_count(&self) -> usize {
        self.highlights.iter().filter(|h| h.is_selected).count()
    }

    pub fn get(&self, id: HighlightId) -> Option<&Highlight> {
        self.highlights.get(id.0)
    }

    pub fn get_mut(&mut self, id: HighlightId) -> Option<&mut Highlight> {
        self.highlights.get_mut(id.0)
    }

    pub fn at(&self, space_index: usize) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.space_index == space_index)
    }

    pub fn nth(&self, ordinal: usize) -> Option<&Highlight> {
        self.highlights.get(ordinal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Highlight> {
        self.highlights.iter()
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }
}
