use crate::standings::{Placement, Standings};
use crate::tournament::TournamentStatus;
use crate::utils::{bracket_size, NumExt};
use crate::{Competitor, EntrantSpot, Entrants, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single match in a [`Bracket`].
///
/// `round` starts at 1, `position` starts at 0 within every round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketNode<C> {
    pub round: u32,
    pub position: u32,
    pub entrants: [EntrantSpot<C>; 2],
    pub winner: Option<C>,
}

impl<C> BracketNode<C> {
    #[inline]
    pub fn new(round: u32, position: u32, entrants: [EntrantSpot<C>; 2]) -> Self {
        Self {
            round,
            position,
            entrants,
            winner: None,
        }
    }

    /// Returns the first player, or `None` if the spot is empty or not decided yet.
    #[inline]
    pub fn player1(&self) -> Option<&C> {
        self.entrants[0].entrant()
    }

    /// Returns the second player, or `None` if the spot is empty or not decided yet.
    #[inline]
    pub fn player2(&self) -> Option<&C> {
        self.entrants[1].entrant()
    }

    /// Returns `true` if both players of the match are known.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.entrants.iter().all(EntrantSpot::is_entrant)
    }

    /// Returns `true` if the match is a bye: a single entrant without an opponent.
    pub fn is_bye(&self) -> bool {
        matches!(
            self.entrants,
            [EntrantSpot::Entrant(_), EntrantSpot::Empty]
                | [EntrantSpot::Empty, EntrantSpot::Entrant(_)]
        )
    }

    /// Returns the loser of a decided match. Byes have no loser.
    pub fn loser(&self) -> Option<&C>
    where
        C: PartialEq,
    {
        let winner = self.winner.as_ref()?;

        self.entrants
            .iter()
            .filter_map(EntrantSpot::entrant)
            .find(|entrant| *entrant != winner)
    }

    fn contains(&self, competitor: &C) -> bool
    where
        C: PartialEq,
    {
        self.entrants
            .iter()
            .any(|spot| spot.entrant() == Some(competitor))
    }
}

/// The spot the winner of a match moves to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NextMatch {
    pub round: u32,
    pub position: u32,
    /// `0` for `player1`, `1` for `player2`.
    pub slot: usize,
}

/// The changes caused by a single call to [`Bracket::advance_winner`].
///
/// The caller must apply all of them at once, usually in a single transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Advancement<C> {
    /// Every changed match in its new state, in the order they were changed.
    pub updated: Vec<BracketNode<C>>,
    /// The new status of the tournament if it changed.
    pub status: Option<TournamentStatus>,
    /// The placement of the champion once the final is decided.
    pub placement: Option<Placement<C>>,
}

/// A single elimination bracket.
///
/// All matches are stored round after round: the `size / 2` matches of the first round come
/// first, the final is the last match.
#[derive(Clone, Debug)]
pub struct Bracket<C> {
    entrants: Entrants<C>,
    nodes: Vec<BracketNode<C>>,
    size: usize,
    status: TournamentStatus,
}

impl<C> Bracket<C>
where
    C: Clone + Ord,
{
    /// Seeds `participants` by rating and generates all matches of the bracket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughParticipants`] if less than 2 participants are given.
    pub fn generate<I>(participants: I) -> Result<Self>
    where
        I: IntoIterator<Item = Competitor<C>>,
    {
        Self::from_seeded(Entrants::seeded(participants))
    }

    /// Generates the bracket for a tournament currently in `status` which already has
    /// `existing_nodes` stored matches.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if a bracket already exists, the tournament is not in
    /// [`TournamentStatus::Registration`] or less than 2 participants are given.
    pub fn generate_checked<I>(
        status: TournamentStatus,
        existing_nodes: usize,
        participants: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Competitor<C>>,
    {
        if existing_nodes != 0 {
            return Err(Error::BracketExists);
        }

        status.transition(TournamentStatus::InProgress)?;

        Self::generate(participants)
    }
}

impl<C> Bracket<C>
where
    C: Clone + PartialEq,
{
    /// Generates the bracket for `entrants` which are already in seed order.
    ///
    /// The top seed faces the lowest seed in the first round, the second seed the second lowest
    /// and so on. Spots without an entrant are byes and their opponents are moved forward
    /// before this function returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughParticipants`] if less than 2 entrants are given and
    /// [`Error::DuplicateCompetitor`] if an entrant is given twice.
    pub fn from_seeded(entrants: Entrants<C>) -> Result<Self> {
        let num_entrants = entrants.len();
        if num_entrants < 2 {
            return Err(Error::NotEnoughParticipants(num_entrants));
        }

        check_unique(&entrants)?;

        log::debug!("Creating new bracket with {} entrants", num_entrants);

        let size = bracket_size(num_entrants);
        let mut nodes = Vec::with_capacity(size - 1);

        let spot = |index: usize| EntrantSpot::new(entrants.get(index).cloned());
        for position in 0..size / 2 {
            nodes.push(BracketNode::new(
                1,
                position as u32,
                [spot(position), spot(size - 1 - position)],
            ));
        }

        for round in 2..=size.ilog2_ceil() {
            for position in 0..size >> round {
                nodes.push(BracketNode::new(
                    round as u32,
                    position as u32,
                    [EntrantSpot::TBD, EntrantSpot::TBD],
                ));
            }
        }

        let mut this = Self {
            entrants,
            nodes,
            size,
            status: TournamentStatus::Registration,
        };

        this.status = this.status.transition(TournamentStatus::InProgress)?;

        let mut changes = Changes::new();
        for index in 0..size / 2 {
            this.forward_byes(index, &mut changes)?;
        }

        log::debug!(
            "Created new bracket with {} matches and {} byes",
            this.nodes.len(),
            size - num_entrants
        );

        Ok(this)
    }

    /// Resumes the bracket from stored matches.
    ///
    /// `nodes` may be given in any order.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `entrants` contains a competitor twice, `nodes` has an
    /// invalid number of matches for `entrants`, contains a match twice or outside of the
    /// bracket, or a match refers to a competitor that is not in `entrants`. A stored winner
    /// must be a player of its match and the match must not wait for a player.
    pub fn resume<I>(entrants: Entrants<C>, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = BracketNode<C>>,
    {
        let nodes: Vec<_> = nodes.into_iter().collect();

        log::debug!(
            "Trying to resume bracket with {} entrants and {} matches",
            entrants.len(),
            nodes.len()
        );

        if entrants.len() < 2 {
            return Err(Error::NotEnoughParticipants(entrants.len()));
        }

        check_unique(&entrants)?;

        let size = bracket_size(entrants.len());
        let expected = size - 1;
        let found = nodes.len();

        if found != expected {
            return Err(Error::InvalidNumberOfMatches { expected, found });
        }

        let mut this = Self {
            entrants,
            nodes: Vec::new(),
            size,
            status: TournamentStatus::InProgress,
        };

        let mut slots = vec![None; expected];
        for node in nodes {
            let (round, position) = (node.round, node.position);

            let index = this
                .index_of(round, position)
                .ok_or(Error::UnknownNode { round, position })?;

            let unknown = node
                .entrants
                .iter()
                .filter_map(EntrantSpot::entrant)
                .chain(node.winner.as_ref())
                .any(|competitor| !this.entrants.contains(competitor));

            if unknown {
                return Err(Error::UnknownCompetitor { round, position });
            }

            if let Some(winner) = &node.winner {
                if !node.is_ready() && !node.is_bye() {
                    return Err(Error::NodeNotReady { round, position });
                }

                if !node.contains(winner) {
                    return Err(Error::InvalidWinner { round, position });
                }
            }

            if slots[index].is_some() {
                return Err(Error::DuplicateNode { round, position });
            }

            slots[index] = Some(node);
        }

        // No slot is left empty: the length matched and no match was given twice.
        this.nodes = slots.into_iter().flatten().collect();

        if this.champion().is_some() {
            this.status = TournamentStatus::Completed;
        }

        log::debug!(
            "Resumed bracket with {} matches in status {}",
            this.nodes.len(),
            this.status
        );

        Ok(this)
    }

    /// Sets `winner` as the winner of the match at `round` and `position` and moves it into
    /// the next match. Deciding the final completes the tournament.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the match does not exist, already has a winner, is still
    /// waiting for a player, `winner` is not a player of the match or the tournament is not in
    /// progress. The bracket is left untouched in that case.
    pub fn advance_winner(
        &mut self,
        round: u32,
        position: u32,
        winner: C,
    ) -> Result<Advancement<C>> {
        let index = self
            .index_of(round, position)
            .ok_or(Error::UnknownNode { round, position })?;

        let node = &self.nodes[index];

        if node.winner.is_some() {
            return Err(Error::WinnerAlreadySet { round, position });
        }

        if !node.is_ready() {
            return Err(Error::NodeNotReady { round, position });
        }

        if !node.contains(&winner) {
            return Err(Error::InvalidWinner { round, position });
        }

        if self.status != TournamentStatus::InProgress {
            return Err(Error::NotInProgress(self.status));
        }

        log::debug!(
            "Advancing winner of match at round {}, position {}",
            round,
            position
        );

        let mut changes = Changes::new();
        self.set_winner(index, winner, &mut changes)?;

        Ok(changes.into_advancement(&self.nodes))
    }

    /// Returns the final placements of all eliminated competitors and the champion.
    #[inline]
    pub fn standings(&self) -> Standings<C> {
        Standings::from_bracket(self)
    }

    fn set_winner(&mut self, index: usize, winner: C, changes: &mut Changes<C>) -> Result<()> {
        self.nodes[index].winner = Some(winner.clone());
        changes.touch(index);

        match self.next_index(index) {
            Some((next, slot)) => {
                self.nodes[next].entrants[slot] = EntrantSpot::Entrant(winner);
                changes.touch(next);

                self.forward_byes(next, changes)
            }
            None => self.complete(winner, changes),
        }
    }

    /// Decides the match at `index` and all following matches as long as they are byes.
    fn forward_byes(&mut self, mut index: usize, changes: &mut Changes<C>) -> Result<()> {
        loop {
            let node = &self.nodes[index];
            if node.winner.is_some() {
                return Ok(());
            }

            let spot = match &node.entrants {
                [EntrantSpot::Entrant(entrant), EntrantSpot::Empty]
                | [EntrantSpot::Empty, EntrantSpot::Entrant(entrant)] => {
                    EntrantSpot::Entrant(entrant.clone())
                }
                // Nobody will ever play this match; the next match gets an empty spot.
                [EntrantSpot::Empty, EntrantSpot::Empty] => EntrantSpot::Empty,
                _ => return Ok(()),
            };

            log::debug!(
                "Forwarding bye at round {}, position {}",
                node.round,
                node.position
            );

            if let EntrantSpot::Entrant(entrant) = &spot {
                self.nodes[index].winner = Some(entrant.clone());
                changes.touch(index);
            }

            match self.next_index(index) {
                Some((next, slot)) => {
                    self.nodes[next].entrants[slot] = spot;
                    changes.touch(next);
                    index = next;
                }
                None => {
                    if let EntrantSpot::Entrant(winner) = spot {
                        self.complete(winner, changes)?;
                    }

                    return Ok(());
                }
            }
        }
    }

    fn complete(&mut self, winner: C, changes: &mut Changes<C>) -> Result<()> {
        self.status = self.status.transition(TournamentStatus::Completed)?;

        log::debug!("Bracket completed");

        changes.status = Some(self.status);
        changes.placement = Some(Placement::new(winner, 1));

        Ok(())
    }
}

impl<C> Bracket<C> {
    /// Returns a reference to the entrants in seed order.
    #[inline]
    pub fn entrants(&self) -> &Entrants<C> {
        &self.entrants
    }

    /// Returns all matches, round after round.
    #[inline]
    pub fn nodes(&self) -> &[BracketNode<C>] {
        &self.nodes
    }

    /// Returns the matches from the bracket.
    #[inline]
    pub fn into_nodes(self) -> Vec<BracketNode<C>> {
        self.nodes
    }

    #[inline]
    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    /// Returns the number of slots in the first round, a power of two.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of rounds. The final is played in the last round.
    #[inline]
    pub fn rounds(&self) -> u32 {
        self.size.ilog2_ceil() as u32
    }

    /// Returns the match at `round` and `position`.
    pub fn node(&self, round: u32, position: u32) -> Option<&BracketNode<C>> {
        self.index_of(round, position).map(|index| &self.nodes[index])
    }

    /// Returns all matches of `round`. Returns an empty slice if the round does not exist.
    pub fn round(&self, round: u32) -> &[BracketNode<C>] {
        if round == 0 || round > self.rounds() {
            return &[];
        }

        let start = self.round_offset(round as usize);
        &self.nodes[start..start + (self.size >> round)]
    }

    /// Returns the winner of the final.
    #[inline]
    pub fn champion(&self) -> Option<&C> {
        self.nodes.last()?.winner.as_ref()
    }

    /// Returns the spot the winner of the match at `round` and `position` moves to. Returns
    /// `None` for the final and for matches that do not exist.
    pub fn next_match(&self, round: u32, position: u32) -> Option<NextMatch> {
        let index = self.index_of(round, position)?;
        let (next, slot) = self.next_index(index)?;

        let node = &self.nodes[next];
        Some(NextMatch {
            round: node.round,
            position: node.position,
            slot,
        })
    }

    /// Returns the index of the first match in `round`.
    #[inline]
    fn round_offset(&self, round: usize) -> usize {
        self.size - (self.size >> (round - 1))
    }

    fn index_of(&self, round: u32, position: u32) -> Option<usize> {
        if round == 0 || round > self.rounds() {
            return None;
        }

        let position = position as usize;
        if position >= self.size >> round {
            return None;
        }

        Some(self.round_offset(round as usize) + position)
    }

    /// Returns the index of the next match and the spot within it.
    #[inline]
    fn next_index(&self, index: usize) -> Option<(usize, usize)> {
        if index + 1 >= self.size - 1 {
            None
        } else {
            Some((self.size / 2 + index / 2, index % 2))
        }
    }
}

/// Returns [`Error::DuplicateCompetitor`] with the seed of the first competitor that appears a
/// second time in `entrants`.
fn check_unique<C>(entrants: &Entrants<C>) -> Result<()>
where
    C: PartialEq,
{
    for (seed, entrant) in entrants.iter().enumerate() {
        if entrants.iter().take(seed).any(|e| e == entrant) {
            return Err(Error::DuplicateCompetitor(seed));
        }
    }

    Ok(())
}

struct Changes<C> {
    touched: Vec<usize>,
    status: Option<TournamentStatus>,
    placement: Option<Placement<C>>,
}

impl<C> Changes<C> {
    fn new() -> Self {
        Self {
            touched: Vec::new(),
            status: None,
            placement: None,
        }
    }

    fn touch(&mut self, index: usize) {
        if !self.touched.contains(&index) {
            self.touched.push(index);
        }
    }

    fn into_advancement(self, nodes: &[BracketNode<C>]) -> Advancement<C>
    where
        C: Clone,
    {
        Advancement {
            updated: self
                .touched
                .into_iter()
                .map(|index| nodes[index].clone())
                .collect(),
            status: self.status,
            placement: self.placement,
        }
    }
}
