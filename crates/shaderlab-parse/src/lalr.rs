//! Compiles the declarative production list into an LALR(1) action/goto automaton.
//!
//! The automaton is built once per process behind a [`LazyLock`] and shared
//! read-only by every compilation afterwards. Construction follows the classic
//! scheme: LR(0) item sets, then spontaneous lookahead generation plus
//! propagation to a fixpoint, then table emission. A shift/reduce conflict
//! resolves in favor of the shift (this is what binds a dangling `else` to the
//! nearest `if`); a reduce/reduce conflict is a defect in the grammar itself and
//! panics during construction, never at parse time.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::grammar::{productions, NonTerm, Production, Symbol, AUGMENTED};
use crate::token::TermKind;

/// One entry of an action table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Shift(u32),
    Reduce(u32),
    Accept,
}

/// A set of terminals, as a bitset. Bit 127 is reserved for the propagation
/// placeholder used during lookahead computation.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
struct TermSet(u128);

const DUMMY_BIT: u128 = 1 << 127;

impl TermSet {
    fn insert(&mut self, term: TermKind) {
        self.0 |= 1 << term.index();
    }
    fn insert_dummy(&mut self) {
        self.0 |= DUMMY_BIT;
    }
    fn contains(&self, term: TermKind) -> bool {
        self.0 & (1 << term.index()) != 0
    }
    fn has_dummy(&self) -> bool {
        self.0 & DUMMY_BIT != 0
    }
    fn without_dummy(self) -> TermSet {
        TermSet(self.0 & !DUMMY_BIT)
    }
    /// union in place; reports whether the set grew.
    fn union(&mut self, other: TermSet) -> bool {
        let before = self.0;
        self.0 |= other.0;
        self.0 != before
    }
}

/// A dotted production.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Item {
    prod: usize,
    dot: usize,
}

impl Item {
    fn advanced(self) -> Item {
        Item {
            prod: self.prod,
            dot: self.dot + 1,
        }
    }
}

/// The compiled parser tables: one action row and one goto row per state.
pub struct Automaton {
    pub productions: Vec<Production>,
    pub actions: Vec<HashMap<TermKind, Action>>,
    pub gotos: Vec<HashMap<NonTerm, u32>>,
}

static AUTOMATON: LazyLock<Automaton> = LazyLock::new(|| Automaton::build(productions()));

/// The process-wide automaton. Built on first use, immutable afterwards.
pub fn automaton() -> &'static Automaton {
    &AUTOMATON
}

struct GrammarInfo<'g> {
    productions: &'g [Production],
    prods_of: Vec<Vec<usize>>,
    first: Vec<TermSet>,
    nullable: Vec<bool>,
    /// all terminals mentioned by the grammar, plus end-of-file.
    terms: Vec<TermKind>,
}

impl<'g> GrammarInfo<'g> {
    fn new(productions: &'g [Production]) -> Self {
        let mut prods_of = vec![Vec::new(); NonTerm::COUNT];
        let mut terms = BTreeSet::new();
        terms.insert(TermKind::Eof);
        for (i, prod) in productions.iter().enumerate() {
            prods_of[prod.goal.index()].push(i);
            for sym in &prod.rhs {
                if let Symbol::T(t) = sym {
                    terms.insert(*t);
                }
            }
        }

        let mut first = vec![TermSet::default(); NonTerm::COUNT];
        let mut nullable = vec![false; NonTerm::COUNT];
        let mut changed = true;
        while changed {
            changed = false;
            for prod in productions {
                let goal = prod.goal.index();
                let mut all_nullable = true;
                for sym in &prod.rhs {
                    match sym {
                        Symbol::T(t) => {
                            let mut set = TermSet::default();
                            set.insert(*t);
                            changed |= first[goal].union(set);
                            all_nullable = false;
                            break;
                        }
                        Symbol::N(nt) => {
                            let set = first[nt.index()];
                            changed |= first[goal].union(set);
                            if !nullable[nt.index()] {
                                all_nullable = false;
                                break;
                            }
                        }
                    }
                }
                if all_nullable && !nullable[goal] {
                    nullable[goal] = true;
                    changed = true;
                }
            }
        }

        Self {
            productions,
            prods_of,
            first,
            nullable,
            terms: terms.into_iter().collect(),
        }
    }

    fn sym_after_dot(&self, item: &Item) -> Option<Symbol> {
        self.productions[item.prod].rhs.get(item.dot).copied()
    }

    /// FIRST of a symbol sequence followed by a lookahead set.
    fn first_of_seq(&self, seq: &[Symbol], tail: TermSet) -> TermSet {
        let mut out = TermSet::default();
        for sym in seq {
            match sym {
                Symbol::T(t) => {
                    out.insert(*t);
                    return out;
                }
                Symbol::N(nt) => {
                    out.union(self.first[nt.index()]);
                    if !self.nullable[nt.index()] {
                        return out;
                    }
                }
            }
        }
        out.union(tail);
        out
    }

    fn closure0(&self, kernel: &[Item]) -> Vec<Item> {
        let mut set: BTreeSet<Item> = kernel.iter().copied().collect();
        let mut work: Vec<Item> = kernel.to_vec();
        while let Some(item) = work.pop() {
            if let Some(Symbol::N(nt)) = self.sym_after_dot(&item) {
                for &p in &self.prods_of[nt.index()] {
                    let new = Item { prod: p, dot: 0 };
                    if set.insert(new) {
                        work.push(new);
                    }
                }
            }
        }
        set.into_iter().collect()
    }

    /// closure over items carrying lookahead sets.
    fn closure1(&self, seed: &[(Item, TermSet)]) -> BTreeMap<Item, TermSet> {
        let mut map: BTreeMap<Item, TermSet> = BTreeMap::new();
        let mut work: Vec<Item> = Vec::new();
        for (item, set) in seed {
            map.entry(*item).or_default().union(*set);
            work.push(*item);
        }
        while let Some(item) = work.pop() {
            let la = map[&item];
            let rhs = &self.productions[item.prod].rhs;
            if let Some(Symbol::N(nt)) = rhs.get(item.dot).copied() {
                let new_la = self.first_of_seq(&rhs[item.dot + 1..], la);
                for &p in &self.prods_of[nt.index()] {
                    let next = Item { prod: p, dot: 0 };
                    if map.entry(next).or_default().union(new_la) {
                        work.push(next);
                    }
                }
            }
        }
        map
    }
}

impl Automaton {
    fn build(productions: Vec<Production>) -> Self {
        let info = GrammarInfo::new(&productions);

        // LR(0) canonical collection, deduplicated by kernel.
        let start = vec![Item {
            prod: AUGMENTED,
            dot: 0,
        }];
        let mut kernels: Vec<Vec<Item>> = vec![start.clone()];
        let mut kernel_index: HashMap<Vec<Item>, usize> = HashMap::from([(start, 0)]);
        let mut transitions: Vec<BTreeMap<Symbol, usize>> = Vec::new();

        let mut s = 0;
        while s < kernels.len() {
            let items = info.closure0(&kernels[s]);
            let mut by_sym: BTreeMap<Symbol, BTreeSet<Item>> = BTreeMap::new();
            for item in &items {
                if let Some(sym) = info.sym_after_dot(item) {
                    by_sym.entry(sym).or_default().insert(item.advanced());
                }
            }
            let mut trans = BTreeMap::new();
            for (sym, kernel) in by_sym {
                let kernel: Vec<Item> = kernel.into_iter().collect();
                let target = *kernel_index.entry(kernel.clone()).or_insert_with(|| {
                    kernels.push(kernel);
                    kernels.len() - 1
                });
                trans.insert(sym, target);
            }
            transitions.push(trans);
            s += 1;
        }

        // LALR(1) lookaheads: spontaneous generation + propagation edges.
        let mut la: Vec<HashMap<Item, TermSet>> = kernels
            .iter()
            .map(|k| k.iter().map(|&it| (it, TermSet::default())).collect())
            .collect();
        la[0]
            .get_mut(&Item {
                prod: AUGMENTED,
                dot: 0,
            })
            .unwrap()
            .insert(TermKind::Eof);

        let mut props: Vec<((usize, Item), (usize, Item))> = Vec::new();
        for s in 0..kernels.len() {
            for k in 0..kernels[s].len() {
                let kitem = kernels[s][k];
                let mut seed = TermSet::default();
                seed.insert_dummy();
                let closure = info.closure1(&[(kitem, seed)]);
                for (item, set) in &closure {
                    if let Some(sym) = info.sym_after_dot(item) {
                        let target = transitions[s][&sym];
                        let titem = item.advanced();
                        la[target]
                            .get_mut(&titem)
                            .unwrap()
                            .union(set.without_dummy());
                        if set.has_dummy() {
                            props.push(((s, kitem), (target, titem)));
                        }
                    }
                }
            }
        }
        let mut changed = true;
        while changed {
            changed = false;
            for &((s, si), (t, ti)) in &props {
                let set = la[s][&si];
                if la[t].get_mut(&ti).unwrap().union(set) {
                    changed = true;
                }
            }
        }

        // table emission.
        let n = kernels.len();
        let mut actions: Vec<HashMap<TermKind, Action>> = vec![HashMap::new(); n];
        let mut gotos: Vec<HashMap<NonTerm, u32>> = vec![HashMap::new(); n];
        for s in 0..n {
            for (&sym, &target) in &transitions[s] {
                match sym {
                    Symbol::T(t) => {
                        actions[s].insert(t, Action::Shift(target as u32));
                    }
                    Symbol::N(nt) => {
                        gotos[s].insert(nt, target as u32);
                    }
                }
            }
            let seed: Vec<(Item, TermSet)> =
                kernels[s].iter().map(|&it| (it, la[s][&it])).collect();
            let closure = info.closure1(&seed);
            for (item, set) in &closure {
                if info.sym_after_dot(item).is_some() {
                    continue;
                }
                for &t in &info.terms {
                    if !set.contains(t) {
                        continue;
                    }
                    if item.prod == AUGMENTED {
                        if t == TermKind::Eof {
                            actions[s].insert(t, Action::Accept);
                        }
                        continue;
                    }
                    match actions[s].get(&t) {
                        // shift wins over reduce (dangling else)
                        Some(Action::Shift(_)) | Some(Action::Accept) => {}
                        Some(Action::Reduce(p)) if *p != item.prod as u32 => {
                            panic!(
                                "grammar is not LALR(1): reduce/reduce conflict in state {s} on {t}"
                            );
                        }
                        Some(Action::Reduce(_)) => {}
                        None => {
                            actions[s].insert(t, Action::Reduce(item.prod as u32));
                        }
                    }
                }
            }
        }

        Automaton {
            productions,
            actions,
            gotos,
        }
    }

    pub fn state_count(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automaton_builds_without_conflicts() {
        let aut = automaton();
        assert!(aut.state_count() > 100);
        // the start state must know how to shift `Shader`.
        assert!(matches!(
            aut.actions[0].get(&TermKind::Shader),
            Some(Action::Shift(_))
        ));
        // exactly one accept entry exists.
        let accepts = aut
            .actions
            .iter()
            .flat_map(|row| row.values())
            .filter(|a| matches!(a, Action::Accept))
            .count();
        assert_eq!(accepts, 1);
    }
}
