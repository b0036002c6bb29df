//! Pattern algebra: bound values, leaf patterns, the composite pattern tree,
//! and the [`Grammar`] arena that owns every leaf the tree refers to.
//!
//! Composite nodes never own leaves directly. They hold [`LeafId`] indices
//! into the arena, so several positions in the tree can share one leaf
//! after identity fixing (see [`fixer`](super::fixer)).


use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

/// Index of a leaf inside a [`Grammar`] arena.
pub type LeafId = usize;

/// Value bound to a leaf.
///
/// `Count` and `Values` mark an accumulating leaf: repeated matches add to
/// the value instead of producing separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Unset,
    Bool(bool),
    Count(u64),
    Text(String),
    Values(Vec<String>),
}

impl Value {
    /// The contribution of one match to a leaf whose declared value is
    /// `self`: `Count(1)` for counters, `Values([v])` for lists. Returns
    /// `None` when `self` does not accumulate.
    pub fn increment_for(&self, matched: Value) -> Option<Value> {
        match self {
            Value::Count(_) => Some(Value::Count(1)),
            Value::Values(_) => Some(Value::Values(matched.into_values())),
            _ => None,
        }
    }

    /// Fold an increment from [`Value::increment_for`] into `self`.
    /// Increments of a different kind are ignored.
    pub fn absorb(&mut self, increment: Value) {
        match (self, increment) {
            (Value::Count(total), Value::Count(n)) => *total += n,
            (Value::Values(values), Value::Values(more)) => values.extend(more),
            _ => {}
        }
    }

    fn into_values(self) -> Vec<String> {
        match self {
            Value::Text(text) => vec![text],
            Value::Values(values) => values,
            Value::Unset | Value::Bool(_) | Value::Count(_) => Vec::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Textual forms and arity of an option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionSpec {
    pub short: Option<String>,
    pub long: Option<String>,
    pub argcount: usize,
}

impl OptionSpec {
    /// # Panics
    ///
    /// Panics if `argcount` is not 0 or 1.
    pub fn new(short: Option<&str>, long: Option<&str>, argcount: usize) -> Self {
        assert!(argcount <= 1, "option argcount must be 0 or 1, got {argcount}");
        Self {
            short: short.map(str::to_string),
            long: long.map(str::to_string),
            argcount,
        }
    }

    /// The long form if present, otherwise the short form.
    pub fn name(&self) -> Option<&str> {
        self.long.as_deref().or(self.short.as_deref())
    }

    pub fn takes_value(&self) -> bool {
        self.argcount == 1
    }

    /// `Bool(false)` on a value-taking option means "no default".
    pub fn normalize(&self, value: Value) -> Value {
        if self.takes_value() && value == Value::Bool(false) {
            Value::Unset
        } else {
            value
        }
    }

    /// Declared value for an option with no explicit default.
    pub fn initial_value(&self) -> Value {
        if self.takes_value() {
            Value::Unset
        } else {
            Value::Bool(false)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    /// Positional value. Argv-side arguments have no name until matched.
    Argument(Option<String>),
    /// Literal word.
    Command(String),
    Option(OptionSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LeafTag {
    Argument,
    Command,
    Option,
}

/// Equality class of a leaf: its kind and name, never its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafIdentity {
    tag: LeafTag,
    name: Option<String>,
}

/// A grammar node with no children.
///
/// The derived `PartialEq` compares values too; use [`Leaf::identity`] for
/// the kind-and-name equality that deduplication relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub value: Value,
}

impl Leaf {
    pub fn argument(name: impl Into<String>) -> Self {
        Self::argument_with(name, Value::Unset)
    }

    pub fn argument_with(name: impl Into<String>, value: Value) -> Self {
        Self {
            kind: LeafKind::Argument(Some(name.into())),
            value,
        }
    }

    /// An unnamed argument as produced from a raw argv token.
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            kind: LeafKind::Argument(None),
            value: Value::Text(value.into()),
        }
    }

    pub fn command(name: impl Into<String>) -> Self {
        Self::command_with(name, Value::Bool(false))
    }

    pub fn command_with(name: impl Into<String>, value: Value) -> Self {
        Self {
            kind: LeafKind::Command(name.into()),
            value,
        }
    }

    /// Builds an option leaf. A `Bool(false)` value on a value-taking
    /// option means "no default" and is stored as `Unset`.
    ///
    /// # Panics
    ///
    /// Panics if `argcount` is not 0 or 1.
    pub fn option(short: Option<&str>, long: Option<&str>, argcount: usize, value: Value) -> Self {
        Self::from_spec(OptionSpec::new(short, long, argcount), value)
    }

    pub fn from_spec(spec: OptionSpec, value: Value) -> Self {
        Self {
            value: spec.normalize(value),
            kind: LeafKind::Option(spec),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            LeafKind::Argument(name) => name.as_deref(),
            LeafKind::Command(name) => Some(name),
            LeafKind::Option(spec) => spec.name(),
        }
    }

    pub fn identity(&self) -> LeafIdentity {
        let tag = match self.kind {
            LeafKind::Argument(_) => LeafTag::Argument,
            LeafKind::Command(_) => LeafTag::Command,
            LeafKind::Option(_) => LeafTag::Option,
        };
        LeafIdentity {
            tag,
            name: self.name().map(str::to_string),
        }
    }

    pub fn option_spec(&self) -> Option<&OptionSpec> {
        match &self.kind {
            LeafKind::Option(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.kind, LeafKind::Argument(_))
    }

    /// Whether repeated occurrences of this leaf collect values (as opposed
    /// to being counted).
    pub fn collects_values(&self) -> bool {
        match &self.kind {
            LeafKind::Argument(_) => true,
            LeafKind::Command(_) => false,
            LeafKind::Option(spec) => spec.takes_value(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_null = |s: Option<&str>| s.unwrap_or("null").to_string();
        match &self.kind {
            LeafKind::Argument(name) => {
                write!(f, "Argument({}, {})", or_null(name.as_deref()), self.value)
            }
            LeafKind::Command(name) => write!(f, "Command({name}, {})", self.value),
            LeafKind::Option(spec) => write!(
                f,
                "Option({}, {}, {}, {})",
                or_null(spec.short.as_deref()),
                or_null(spec.long.as_deref()),
                spec.argcount,
                self.value
            ),
        }
    }
}

/// A node of the grammar tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// All children, in order.
    Required(Vec<Pattern>),
    /// Each child if it can; never fails.
    Optional(Vec<Pattern>),
    /// The alternative leaving the fewest unconsumed leaves.
    Either(Vec<Pattern>),
    /// The single child, one or more times.
    OneOrMore(Box<Pattern>),
    Leaf(LeafId),
}

impl Pattern {
    /// # Panics
    ///
    /// Panics unless `children` holds exactly one pattern.
    pub fn one_or_more(mut children: Vec<Pattern>) -> Pattern {
        assert_eq!(
            children.len(),
            1,
            "OneOrMore takes exactly one child, got {}",
            children.len()
        );
        Pattern::OneOrMore(Box::new(children.remove(0)))
    }

    pub fn children(&self) -> &[Pattern] {
        match self {
            Pattern::Required(children)
            | Pattern::Optional(children)
            | Pattern::Either(children) => children,
            Pattern::OneOrMore(child) => std::slice::from_ref(child.as_ref()),
            Pattern::Leaf(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Pattern] {
        match self {
            Pattern::Required(children)
            | Pattern::Optional(children)
            | Pattern::Either(children) => children,
            Pattern::OneOrMore(child) => std::slice::from_mut(child.as_mut()),
            Pattern::Leaf(_) => &mut [],
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Pattern::Required(_) => "Required",
            Pattern::Optional(_) => "Optional",
            Pattern::Either(_) => "Either",
            Pattern::OneOrMore(_) => "OneOrMore",
            Pattern::Leaf(_) => "Leaf",
        }
    }

    /// Leaf ids in declaration order.
    pub fn flat(&self) -> Vec<LeafId> {
        let mut ids = Vec::new();
        self.collect_leaves(&mut ids);
        ids
    }

    fn collect_leaves(&self, ids: &mut Vec<LeafId>) {
        match self {
            Pattern::Leaf(id) => ids.push(*id),
            composite => {
                for child in composite.children() {
                    child.collect_leaves(ids);
                }
            }
        }
    }
}

/// Arena of leaves plus the pattern tree that indexes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    leaves: Vec<Leaf>,
    root: Pattern,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// An empty arena whose root is an empty `Required`.
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            root: Pattern::Required(Vec::new()),
        }
    }

    /// Store `leaf` and return a pattern node referring to it.
    pub fn push_leaf(&mut self, leaf: Leaf) -> Pattern {
        self.leaves.push(leaf);
        Pattern::Leaf(self.leaves.len() - 1)
    }

    pub fn leaf(&self, id: LeafId) -> &Leaf {
        &self.leaves[id]
    }

    pub fn leaf_mut(&mut self, id: LeafId) -> &mut Leaf {
        &mut self.leaves[id]
    }

    pub fn root(&self) -> &Pattern {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Pattern {
        &mut self.root
    }

    pub fn set_root(&mut self, root: Pattern) {
        self.root = root;
    }

    /// Leaf ids of the whole tree in declaration order.
    pub fn flat(&self) -> Vec<LeafId> {
        self.root.flat()
    }

    pub fn flat_leaves(&self) -> Vec<&Leaf> {
        self.flat().into_iter().map(|id| self.leaf(id)).collect()
    }

    /// Every choice-resolved path through the tree, as flat leaf lists.
    ///
    /// `Required` and `Optional` flatten into their children, `OneOrMore`
    /// contributes its child twice, and `Either` forks one group per
    /// alternative. A leaf that occurs twice within one group can repeat at
    /// match time.
    pub fn either_groups(&self) -> Vec<Vec<LeafId>> {
        let mut pending: VecDeque<Vec<&Pattern>> = VecDeque::from([vec![&self.root]]);
        let mut groups = Vec::new();

        while let Some(mut group) = pending.pop_front() {
            if let Some(alternatives) = take_first(&mut group, |p| match p {
                Pattern::Either(children) => Some(children),
                _ => None,
            }) {
                for alternative in alternatives {
                    let mut expanded = vec![alternative];
                    expanded.extend(group.iter().copied());
                    pending.push_back(expanded);
                }
                continue;
            }

            if let Some(children) = take_first(&mut group, |p| match p {
                Pattern::Required(children) | Pattern::Optional(children) => Some(children),
                _ => None,
            }) {
                let mut expanded: Vec<&Pattern> = children.iter().collect();
                expanded.extend(group);
                pending.push_back(expanded);
                continue;
            }

            if let Some(child) = take_first(&mut group, |p| match p {
                Pattern::OneOrMore(child) => Some(child.as_ref()),
                _ => None,
            }) {
                let mut expanded = vec![child, child];
                expanded.extend(group);
                pending.push_back(expanded);
                continue;
            }

            groups.push(group.into_iter().flat_map(Pattern::flat).collect());
        }

        groups
    }

    /// Render `pattern` with its leaves resolved through this arena.
    pub fn display<'a>(&'a self, pattern: &'a Pattern) -> PatternDisplay<'a> {
        PatternDisplay {
            grammar: self,
            pattern,
        }
    }
}

/// Remove and return the first pattern in `group` that `select` accepts.
fn take_first<'a, T>(
    group: &mut Vec<&'a Pattern>,
    select: impl Fn(&'a Pattern) -> Option<T>,
) -> Option<T> {
    let (pos, selected) = group
        .iter()
        .enumerate()
        .find_map(|(pos, &pattern)| select(pattern).map(|s| (pos, s)))?;
    group.remove(pos);
    Some(selected)
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(&self.root))
    }
}

pub struct PatternDisplay<'a> {
    grammar: &'a Grammar,
    pattern: &'a Pattern,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Pattern::Leaf(id) = self.pattern {
            return write!(f, "{}", self.grammar.leaf(*id));
        }
        write!(f, "{}(", self.pattern.kind_name())?;
        for (i, child) in self.pattern.children().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.grammar.display(child))?;
        }
        f.write_str(")")
    }
}
