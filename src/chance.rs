//! Injectable randomness.
//!
//! Every random element of the rules (combat dice, setup distribution, card
//! draws) goes through [`Chance`]. Any `rand::Rng` is a `Chance`, so a
//! `SmallRng::seed_from_u64` pins a whole game. [`LoadedDice`] replays
//! recorded die faces, e.g. the dice listed in an `attacked` event.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

/// A source of dice rolls and uniform picks.
pub trait Chance {
    /// Rolls one six-sided die: 1..=6.
    fn roll_die(&mut self) -> u8;

    /// Returns a uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Shuffles `items` in place.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.pick(i + 1);
            items.swap(i, j);
        }
    }
}

impl<R: Rng + ?Sized> Chance for R {
    fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=6)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// Replays predetermined die faces, then defers to an inner source.
///
/// Picks and shuffles always come from the inner source.
#[derive(Debug, Clone)]
pub struct LoadedDice<C> {
    faces: VecDeque<u8>,
    inner: C,
}

impl<C: Chance> LoadedDice<C> {
    pub fn new(inner: C) -> Self {
        LoadedDice { faces: VecDeque::new(), inner }
    }

    /// Queues faces to be returned by the next rolls, in order.
    ///
    /// Faces outside 1..=6 are clamped into range.
    pub fn load(&mut self, faces: &[u8]) {
        self.faces.extend(faces.iter().map(|f| (*f).clamp(1, 6)));
    }

    /// Number of queued faces not yet rolled.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl<C: Chance> Chance for LoadedDice<C> {
    fn roll_die(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face,
            None => self.inner.roll_die(),
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        self.inner.pick(len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        self.inner.shuffle(items);
    }
}
