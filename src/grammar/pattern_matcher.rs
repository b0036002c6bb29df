//! Backtracking matcher: satisfies a fixed [`Grammar`] against the leaves
//! observed in argv.
//!
//! Matching never mutates the grammar. Every step takes a [`MatchState`]
//! and returns a new one, so a failed branch simply drops its state and the
//! caller carries on from the state it already holds.

use tracing::{debug, trace};

use super::pattern::{Grammar, Leaf, LeafKind, Pattern, Value};

/// Leaves still to consume and leaves bound so far, in match order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pub left: Vec<Leaf>,
    pub collected: Vec<Leaf>,
}

impl MatchState {
    pub fn new(left: Vec<Leaf>) -> Self {
        Self {
            left,
            collected: Vec::new(),
        }
    }

    /// Whether every observed leaf was consumed.
    pub fn is_complete(&self) -> bool {
        self.left.is_empty()
    }
}

/// Match the whole grammar against `observed`.
pub fn match_grammar(grammar: &Grammar, observed: Vec<Leaf>) -> Option<MatchState> {
    let outcome = match_pattern(grammar, grammar.root(), &MatchState::new(observed));
    debug!(
        matched = outcome.is_some(),
        left = outcome.as_ref().map_or(0, |state| state.left.len()),
        "matched usage pattern"
    );
    outcome
}

/// Match `pattern` against `state`. `None` means the pattern failed and
/// `state` stands unchanged.
///
/// - `Required`: every child in order, all or nothing
/// - `Optional`: every child that can match; never fails
/// - `OneOrMore`: the child until it fails or stops consuming; at least once
/// - `Either`: the alternative leaving the fewest leaves, first on ties
pub fn match_pattern(grammar: &Grammar, pattern: &Pattern, state: &MatchState) -> Option<MatchState> {
    match pattern {
        Pattern::Leaf(id) => match_leaf(grammar.leaf(*id), state),
        Pattern::Required(children) => {
            let mut current = state.clone();
            for child in children {
                current = match_pattern(grammar, child, &current)?;
            }
            Some(current)
        }
        Pattern::Optional(children) => {
            let mut current = state.clone();
            for child in children {
                if let Some(next) = match_pattern(grammar, child, &current) {
                    current = next;
                }
            }
            Some(current)
        }
        Pattern::OneOrMore(child) => {
            let mut current = state.clone();
            let mut times = 0;
            while let Some(next) = match_pattern(grammar, child, &current) {
                times += 1;
                let stalled = next.left == current.left;
                current = next;
                if stalled {
                    break;
                }
            }
            trace!(times, "repetition");
            (times > 0).then_some(current)
        }
        Pattern::Either(children) => {
            let best = children
                .iter()
                .enumerate()
                .filter_map(|(i, child)| {
                    match_pattern(grammar, child, state).map(|outcome| (i, outcome))
                })
                .min_by_key(|(_, outcome)| outcome.left.len());
            if let Some((i, outcome)) = &best {
                trace!(alternative = i, left = outcome.left.len(), "either resolved");
            }
            best.map(|(_, outcome)| outcome)
        }
    }
}

/// Find the observed leaf that `pattern` binds to: its position in `left`
/// and the leaf to collect.
///
/// An argument takes the first positional. A command only looks at the
/// first positional and needs it to spell the command. An option takes the
/// first observed option with the same name.
pub fn single_match(pattern: &Leaf, left: &[Leaf]) -> Option<(usize, Leaf)> {
    match &pattern.kind {
        LeafKind::Argument(name) => {
            let pos = left.iter().position(Leaf::is_argument)?;
            let bound = Leaf {
                kind: LeafKind::Argument(name.clone()),
                value: left[pos].value.clone(),
            };
            Some((pos, bound))
        }
        LeafKind::Command(name) => {
            let pos = left.iter().position(Leaf::is_argument)?;
            if left[pos].value == Value::Text(name.clone()) {
                Some((pos, Leaf::command_with(name.as_str(), Value::Bool(true))))
            } else {
                None
            }
        }
        LeafKind::Option(_) => {
            let pos = left
                .iter()
                .position(|leaf| leaf.option_spec().is_some() && leaf.name() == pattern.name())?;
            Some((pos, left[pos].clone()))
        }
    }
}

fn match_leaf(pattern: &Leaf, state: &MatchState) -> Option<MatchState> {
    let (pos, matched) = single_match(pattern, &state.left)?;
    trace!(leaf = %pattern, observed = %matched, "leaf matched");

    let mut left = state.left.clone();
    left.remove(pos);
    let mut collected = state.collected.clone();

    match pattern.value.increment_for(matched.value.clone()) {
        Some(increment) => {
            match collected
                .iter_mut()
                .find(|leaf| leaf.name() == pattern.name())
            {
                Some(same) => same.value.absorb(increment),
                None => collected.push(Leaf {
                    kind: matched.kind,
                    value: increment,
                }),
            }
        }
        None => collected.push(matched),
    }

    Some(MatchState { left, collected })
}
