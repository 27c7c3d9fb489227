//! # Standings
//!
//! Final placements derived from a [`Bracket`]. The champion is ranked 1 and the loser of the
//! final 2. Competitors eliminated in an earlier round share a rank: 3 for the semi-finals, 5
//! for the quarter-finals and so on.
use std::iter::FusedIterator;

use crate::Bracket;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The final rank of a competitor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement<C> {
    pub competitor: C,
    pub rank: u32,
}

impl<C> Placement<C> {
    #[inline]
    pub const fn new(competitor: C, rank: u32) -> Self {
        Self { competitor, rank }
    }
}

/// The placements of all competitors whose final rank is known, ordered by rank and then by
/// seed.
#[derive(Clone, Debug)]
pub struct Standings<C> {
    entries: Vec<Placement<C>>,
}

impl<C> Standings<C> {
    pub fn from_bracket(bracket: &Bracket<C>) -> Self
    where
        C: Clone + PartialEq,
    {
        let mut entries = Vec::new();

        if let Some(champion) = bracket.champion() {
            entries.push(Placement::new(champion.clone(), 1));
        }

        for node in bracket.nodes() {
            if let Some(loser) = node.loser() {
                let rank = (bracket.size() >> node.round) + 1;
                entries.push(Placement::new(loser.clone(), rank as u32));
            }
        }

        entries.sort_by_key(|entry| (entry.rank, bracket.entrants().seed_of(&entry.competitor)));

        log::debug!("Built standings with {} entries", entries.len());

        Self { entries }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, C> {
        Iter {
            inner: self,
            next: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the rank of `competitor`, or `None` if it is still in the bracket.
    pub fn rank_of(&self, competitor: &C) -> Option<u32>
    where
        C: PartialEq,
    {
        self.entries
            .iter()
            .find(|entry| entry.competitor == *competitor)
            .map(|entry| entry.rank)
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Placement<C>> {
        self.entries
    }
}

impl<'a, C> IntoIterator for &'a Standings<C> {
    type Item = &'a Placement<C>;
    type IntoIter = Iter<'a, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Iter<'a, C> {
    inner: &'a Standings<C>,
    next: usize,
}

impl<'a, C> Iterator for Iter<'a, C> {
    type Item = &'a Placement<C>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.entries.get(self.next)?;
        self.next += 1;
        Some(entry)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a, C> ExactSizeIterator for Iter<'a, C> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.entries.len() - self.next
    }
}

impl<'a, C> FusedIterator for Iter<'a, C> {}
