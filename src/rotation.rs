/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Quizdeck.
 *
 * Quizdeck is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Quizdeck is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Quizdeck.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{fmt::Display, rc::Rc};

use hashbrown::HashMap;
use log::debug;
use rand::{rngs::ThreadRng, Rng};
use thiserror::Error;

use crate::{
    question::{PoolItem, Topical},
    random::RemoveRandom,
    store::{load_pool, PoolSource, StoreError},
};

///Identifies one no-repeat cycle. Every topic gets its own cycle, and
///drawing without a topic uses the separate `All` cycle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TopicKey {
    All,
    Topic(String),
}

impl From<Option<&str>> for TopicKey {
    fn from(topic: Option<&str>) -> Self {
        match topic {
            Some(topic) => Self::Topic(topic.to_owned()),
            None => Self::All,
        }
    }
}

impl Display for TopicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all topics"),
            Self::Topic(topic) => f.write_fmt(format_args!("topic \"{topic}\"")),
        }
    }
}

#[derive(Default, Debug)]
struct Cycle {
    unused: Vec<usize>,
    last: Option<usize>,
}

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("No items found for topic: {0}")]
    EmptyTopic(String),
    #[error("The pool does not contain any items")]
    Empty,
    #[error(transparent)]
    Load(#[from] StoreError),
}

impl PoolError {
    fn no_match(topic: Option<&str>) -> Self {
        match topic {
            Some(topic) => Self::EmptyTopic(topic.to_owned()),
            None => Self::Empty,
        }
    }
}

///Random selector that never repeats an item until every item matching the
///requested topic has been drawn.
///
///The full pool is read from its [PoolSource] on first use and kept for the
///lifetime of the pool. Items are handed out as [Rc]s so callers can hold on
///to the current item while the pool keeps drawing.
pub struct RotationPool<T, R = ThreadRng> {
    source: Option<PoolSource>,
    items: Option<Vec<Rc<T>>>,
    cycles: HashMap<TopicKey, Cycle>,
    rng: R,
}

impl<T> RotationPool<T> {
    pub fn new(source: PoolSource) -> Self {
        Self {
            source: Some(source),
            items: None,
            cycles: HashMap::new(),
            rng: rand::thread_rng(),
        }
    }

    ///Pool over items that are already in memory.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            source: None,
            items: Some(items.into_iter().map(Rc::new).collect()),
            cycles: HashMap::new(),
            rng: rand::thread_rng(),
        }
    }
}

impl<T, R> RotationPool<T, R> {
    pub fn with_rng<R2: Rng>(self, rng: R2) -> RotationPool<T, R2> {
        RotationPool {
            source: self.source,
            items: self.items,
            cycles: self.cycles,
            rng,
        }
    }

    ///Items left in the current cycle for `topic`, or `None` if nothing has
    ///been drawn for it yet.
    pub fn remaining(&self, topic: Option<&str>) -> Option<usize> {
        self.cycles
            .get(&TopicKey::from(topic))
            .map(|cycle| cycle.unused.len())
    }
}

impl<T: PoolItem, R: Rng> RotationPool<T, R> {
    fn ensure_loaded(&mut self) -> Result<(), PoolError> {
        if self.items.is_none() {
            let items = match self.source.as_ref() {
                Some(source) => load_pool::<T>(source)?,
                None => vec![],
            };
            self.items = Some(items.into_iter().map(Rc::new).collect());
        }

        Ok(())
    }

    fn matching_indices(items: &[Rc<T>], topic: Option<&str>) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| topic.map_or(true, |topic| item.has_topic(topic)))
            .map(|(index, _)| index)
            .collect()
    }

    ///Every item matching `topic`, in pool order. Does not touch any cycle.
    pub fn load(&mut self, topic: Option<&str>) -> Result<Vec<Rc<T>>, PoolError> {
        self.ensure_loaded()?;
        let items = self.items.as_deref().unwrap_or_default();

        let matching = Self::matching_indices(items, topic)
            .into_iter()
            .map(|index| Rc::clone(&items[index]))
            .collect::<Vec<_>>();

        if matching.is_empty() {
            Err(PoolError::no_match(topic))
        } else {
            Ok(matching)
        }
    }

    ///Draws the next item for `topic`, starting a new cycle when the current
    ///one is used up.
    pub fn next(&mut self, topic: Option<&str>) -> Result<Rc<T>, PoolError> {
        self.ensure_loaded()?;

        let Self {
            items, cycles, rng, ..
        } = self;
        let items = items.as_deref().unwrap_or_default();
        let key = TopicKey::from(topic);

        let refill = if cycles
            .get(&key)
            .map_or(true, |cycle| cycle.unused.is_empty())
        {
            let matching = Self::matching_indices(items, topic);
            if matching.is_empty() {
                return Err(PoolError::no_match(topic));
            }
            Some(matching)
        } else {
            None
        };

        if let Some(matching) = refill.as_ref() {
            debug!("Starting new cycle of {} items for {key}", matching.len());
        }

        let cycle = cycles.entry(key).or_default();
        if let Some(matching) = refill {
            cycle.unused = matching;
        }

        let index = cycle
            .unused
            .remove_random_except(cycle.last.as_ref(), rng)
            .ok_or_else(|| PoolError::no_match(topic))?;
        cycle.last = Some(index);

        Ok(Rc::clone(&items[index]))
    }

    ///Distinct topics present in the pool, sorted.
    pub fn topics(&mut self) -> Result<Vec<String>, PoolError> {
        self.ensure_loaded()?;

        let mut topics = self
            .items
            .iter()
            .flatten()
            .filter_map(|item| item.topic().map(str::to_owned))
            .collect::<Vec<_>>();
        topics.sort();
        topics.dedup();

        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        question::{Flashcard, QuizQuestion},
        store::{PoolSource, StoreError},
    };

    use super::{PoolError, RotationPool};

    fn question(id: u32, topic: &str) -> QuizQuestion {
        QuizQuestion {
            id,
            topic: topic.to_owned(),
            question: format!("Question {id}"),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct: "a".to_owned(),
            explanation: None,
        }
    }

    fn pool(seed: u64) -> RotationPool<QuizQuestion, StdRng> {
        RotationPool::from_items(vec![
            question(1, "basics"),
            question(2, "basics"),
            question(3, "basics"),
            question(4, "functions"),
            question(5, "functions"),
            question(6, "oop"),
        ])
        .with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn next_does_not_repeat_until_exhausted() {
        for seed in 0..20 {
            let mut pool = pool(seed);
            let drawn = (0..6)
                .map(|_| pool.next(None).expect("Unable to draw").id)
                .collect::<HashSet<_>>();
            assert_eq!(drawn, (1..=6).collect::<HashSet<_>>());
            assert_eq!(pool.remaining(None), Some(0));

            // A new cycle starts transparently
            assert!(pool.next(None).is_ok());
            assert_eq!(pool.remaining(None), Some(5));
        }
    }

    #[test]
    fn next_never_repeats_back_to_back() {
        for seed in 0..20 {
            let mut pool = pool(seed);
            let mut previous = None;

            for _ in 0..60 {
                let id = pool.next(None).expect("Unable to draw").id;
                assert_ne!(Some(id), previous, "Repeated {id} with seed {seed}");
                previous = Some(id);
            }
        }
    }

    #[test]
    fn single_item_pool_repeats() {
        let mut pool = pool(1);
        for _ in 0..3 {
            assert_eq!(pool.next(Some("oop")).expect("Unable to draw").id, 6);
        }
    }

    #[test]
    fn next_stays_within_topic() {
        let mut pool = pool(4);
        for _ in 0..20 {
            assert_eq!(pool.next(Some("functions")).expect("Unable to draw").topic, "functions");
        }
    }

    #[test]
    fn topics_keep_separate_cycles() {
        let mut pool = pool(9);

        let first = pool.next(Some("basics")).expect("Unable to draw");
        assert_eq!(pool.remaining(Some("basics")), Some(2));

        // Exhaust functions twice over, basics must not move
        for _ in 0..4 {
            pool.next(Some("functions")).expect("Unable to draw");
        }
        assert_eq!(pool.remaining(Some("basics")), Some(2));
        assert_eq!(pool.remaining(None), None);

        let rest = (0..2)
            .map(|_| pool.next(Some("basics")).expect("Unable to draw").id)
            .collect::<HashSet<_>>();
        assert!(!rest.contains(&first.id));
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn unknown_topic_fails_without_touching_cycles() {
        let mut pool = pool(2);
        pool.next(Some("basics")).expect("Unable to draw");

        assert!(pool
            .load(Some("nonexistent-topic"))
            .is_err_and(|err| matches!(err, PoolError::EmptyTopic(topic) if topic == "nonexistent-topic")));
        assert!(pool
            .next(Some("nonexistent-topic"))
            .is_err_and(|err| matches!(err, PoolError::EmptyTopic(_))));

        assert_eq!(pool.remaining(Some("basics")), Some(2));
        assert_eq!(pool.remaining(Some("nonexistent-topic")), None);
    }

    #[test]
    fn load_filters_by_topic() {
        let mut pool = pool(0);
        let ids = pool
            .load(Some("functions"))
            .expect("Unable to load topic")
            .iter()
            .map(|q| q.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(pool.load(None).expect("Unable to load pool").len(), 6);
        assert_eq!(pool.remaining(None), None);
    }

    #[test]
    fn empty_pool_fails() {
        let mut pool = RotationPool::<Flashcard>::from_items(vec![]);
        assert!(pool.next(None).is_err_and(|err| matches!(err, PoolError::Empty)));
    }

    #[test]
    fn untagged_items_only_match_all() {
        let mut pool = RotationPool::from_items(vec![
            Flashcard::new("Tagged", "", Some("basics".to_owned())).expect("Invalid card"),
            Flashcard::new("Untagged", "", None).expect("Invalid card"),
        ]);
        assert_eq!(pool.load(Some("basics")).expect("Unable to load").len(), 1);
        assert_eq!(pool.load(None).expect("Unable to load").len(), 2);
    }

    #[test]
    fn topics_are_sorted_and_distinct() {
        let mut pool = pool(0);
        assert_eq!(
            pool.topics().expect("Unable to list topics"),
            vec!["basics", "functions", "oop"]
        );
    }

    #[test]
    fn source_is_loaded_lazily() {
        let mut pool = RotationPool::<QuizQuestion>::new(PoolSource::File(
            "./tests/does_not_exist.json".into(),
        ));
        assert!(pool
            .next(None)
            .is_err_and(|err| matches!(err, PoolError::Load(StoreError::Io(_, _)))));

        let mut pool =
            RotationPool::<QuizQuestion>::new(PoolSource::File("./tests/quiz_questions.json".into()));
        assert_eq!(pool.load(Some("functions")).expect("Unable to load").len(), 2);
    }
}
