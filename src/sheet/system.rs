//! A system: an independent spatial partition of the page.

use std::collections::BTreeMap;

use crate::glyph::{Glyph, GlyphId};

/// An independent, non-overlapping region of the sheet, and the unit of
/// parallel processing.
///
/// Each system owns its glyph population. During a step run a system is
/// mutated by at most one worker; consistency across systems comes from
/// partitioning, not synchronization.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    id: usize,
    glyphs: BTreeMap<GlyphId, Glyph>,
    next_id: GlyphId,
}

impl SystemInfo {
    /// Creates an empty system with the given id.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            glyphs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// The system id within its sheet.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of glyphs in the population.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// The glyph with the given id, if present.
    pub fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(&id)
    }

    /// Mutable access to the glyph with the given id.
    pub fn glyph_mut(&mut self, id: GlyphId) -> Option<&mut Glyph> {
        self.glyphs.get_mut(&id)
    }

    /// Iterates over the population in ascending id order.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    /// Commits a glyph into the population.
    ///
    /// A transient glyph receives the next free id; ids are never reused.
    /// A glyph that already carries an id keeps it.
    pub fn add_glyph(&mut self, mut glyph: Glyph) -> GlyphId {
        let id = match glyph.id() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                glyph.assign_id(id);
                id
            }
        };
        self.glyphs.insert(id, glyph);
        id
    }

    /// Builds a transient compound from the given population glyphs.
    ///
    /// Returns `None` when a part id is unknown or the list is empty. The
    /// result carries no id until committed with [`SystemInfo::add_glyph`].
    pub fn build_transient_compound(&self, part_ids: &[GlyphId]) -> Option<Glyph> {
        let parts: Option<Vec<(GlyphId, &Glyph)>> = part_ids
            .iter()
            .map(|&id| self.glyph(id).map(|g| (id, g)))
            .collect();
        Glyph::compound_of(&parts?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::glyph::Shape;

    fn glyph(x: i32) -> Glyph {
        Glyph::new(Rectangle::new(x, 0, 10, 10), 100, 16)
    }

    #[test]
    fn test_ids_assigned_in_sequence() {
        let mut system = SystemInfo::new(1);
        let a = system.add_glyph(glyph(0));
        let b = system.add_glyph(glyph(20));
        assert_eq!((a, b), (1, 2));
        assert_eq!(system.glyph(a).unwrap().id(), Some(a));
    }

    #[test]
    fn test_committed_glyph_keeps_its_id() {
        let mut system = SystemInfo::new(1);
        let id = system.add_glyph(glyph(0));
        let mut g = system.glyph(id).unwrap().clone();
        g.set_shape(Shape::Stem);
        assert_eq!(system.add_glyph(g), id);
        assert_eq!(system.glyph_count(), 1);
    }

    #[test]
    fn test_transient_compound_gets_id_only_on_commit() {
        let mut system = SystemInfo::new(1);
        let a = system.add_glyph(glyph(0));
        let b = system.add_glyph(glyph(8));
        let compound = system.build_transient_compound(&[a, b]).unwrap();
        assert_eq!(compound.id(), None);
        let id = system.add_glyph(compound);
        assert_eq!(id, 3);
        assert_eq!(system.glyph(id).unwrap().parts(), &[a, b]);
    }

    #[test]
    fn test_compound_with_unknown_part_is_refused() {
        let mut system = SystemInfo::new(1);
        let a = system.add_glyph(glyph(0));
        assert!(system.build_transient_compound(&[a, 99]).is_none());
    }
}
