use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::result::{Reason, UnifyError};
use crate::{Eqn, Term, UnificationStrategy, Var, syntactically_equal, term_to_string, terms_to_string};

/// The raw result of [unify]: every variable that was solved, with the value it was
/// solved to at the time. Values may still mention other solved variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<T> {
    pub scalars: BTreeMap<Var, Term<T>>,
    pub packs: BTreeMap<Var, Vec<Term<T>>>,
}

impl<T> Default for Solution<T> {
    fn default() -> Self {
        Self { scalars: BTreeMap::new(), packs: BTreeMap::new() }
    }
}

/// Solve `eqns`.
///
/// `context` contains definitions of variables that are known before unification
/// starts; they are looked through but never bound.
pub fn unify<T: Clone, S: UnificationStrategy<T>>(
    eqns: Vec<Eqn<T>>,
    context: &BTreeMap<Var, Term<T>>,
    strategy: &S,
) -> Result<Solution<T>, UnifyError> {
    let mut ctx = Ctx::new(eqns, context, strategy);
    ctx.unify()?;
    Ok(ctx.solution)
}

struct Ctx<'a, T, S> {
    /// Equations that have not been processed yet
    eqns: Vec<Eqn<T>>,
    context: &'a BTreeMap<Var, Term<T>>,
    strategy: &'a S,
    /// The first term that we looked into although its equality with other terms can
    /// not be decided syntactically. From that point on every mismatch we find is
    /// only a possible mismatch.
    expanded: Option<String>,
    /// Partial solution that we have computed from solving previous equations.
    solution: Solution<T>,
}

/// A sequence consisting of just `x` or just `x...`.
enum SingleVar {
    Scalar(Var),
    Pack(Var),
}

fn single_var<T>(seq: &[Term<T>]) -> Option<SingleVar> {
    match seq {
        [Term::Var(var)] => Some(SingleVar::Scalar(var.clone())),
        [term] => term.as_expanded_var().map(|var| SingleVar::Pack(var.clone())),
        _ => None,
    }
}

/// Two elements at the same end of two sequences can be split off if they stand for
/// exactly one term each, or if they are the same expanded variable.
fn can_trim<T>(lhs: &Term<T>, rhs: &Term<T>) -> bool {
    match (lhs.is_expansion(), rhs.is_expansion()) {
        (false, false) => true,
        (true, true) => lhs.as_expanded_var().is_some() && lhs.as_expanded_var() == rhs.as_expanded_var(),
        _ => false,
    }
}

impl<'a, T: Clone, S: UnificationStrategy<T>> Ctx<'a, T, S> {
    fn new(eqns: Vec<Eqn<T>>, context: &'a BTreeMap<Var, Term<T>>, strategy: &'a S) -> Self {
        Self { eqns, context, strategy, expanded: None, solution: Solution::default() }
    }

    fn unify(&mut self) -> Result<(), UnifyError> {
        while let Some(eqn) = self.eqns.pop() {
            trace!("{} = {}", self.show_seq(&eqn.lhs), self.show_seq(&eqn.rhs));
            self.unify_eqn(eqn)?;
        }
        Ok(())
    }

    fn unify_eqn(&mut self, eqn: Eqn<T>) -> Result<(), UnifyError> {
        let Eqn { mut lhs, mut rhs } = eqn;

        if single_var(&lhs).is_none() && single_var(&rhs).is_some() {
            std::mem::swap(&mut lhs, &mut rhs);
        }

        match single_var(&lhs) {
            Some(SingleVar::Scalar(var)) => self.unify_scalar_var(var, rhs),
            Some(SingleVar::Pack(var)) => self.unify_pack_var(var, rhs),
            None => {
                if let ([Term::Node(l)], [Term::Node(r)]) = (lhs.as_slice(), rhs.as_slice()) {
                    return self.unify_nodes(l, r);
                }
                self.unify_seqs(lhs, rhs)
            }
        }
    }

    /// The value of a variable that is either solved or defined in the context.
    fn lookup(&self, var: &Var) -> Option<&Term<T>> {
        self.solution.scalars.get(var).or_else(|| self.context.get(var))
    }

    fn unify_scalar_var(&mut self, var: Var, rhs: Vec<Term<T>>) -> Result<(), UnifyError> {
        if let [Term::Var(other)] = rhs.as_slice() {
            if *other == var {
                return Ok(());
            }
        }

        if let Some(value) = self.lookup(&var) {
            let eqn = Eqn::new(vec![value.clone()], rhs);
            self.add_equation(eqn);
            return Ok(());
        }

        if let [Term::Var(other)] = rhs.as_slice() {
            if let Some(value) = self.lookup(other) {
                let eqn = Eqn::single(Term::Var(var), value.clone());
                self.add_equation(eqn);
                return Ok(());
            }
        }

        if let [term] = rhs.as_slice() {
            if let Some(values) = term.as_expanded_var().and_then(|other| self.solution.packs.get(other)) {
                let eqn = Eqn::new(vec![Term::Var(var)], values.clone());
                self.add_equation(eqn);
                return Ok(());
            }
        }

        let value = match <[Term<T>; 1]>::try_from(rhs) {
            Ok([value]) if !value.is_expansion() => value,
            Ok([value]) => {
                let reason = Reason::UnanchoredPacks {
                    lhs: var.to_string(),
                    rhs: self.show_seq(&[value]),
                };
                return Err(self.ambiguous(reason));
            }
            Err(rhs) => {
                let has_expansions = rhs.iter().any(Term::is_expansion);
                let lhs = var.to_string();
                let rhs = self.show_seq(&rhs);
                return Err(if has_expansions {
                    self.ambiguous(Reason::UnanchoredPacks { lhs, rhs })
                } else {
                    self.mismatch(Reason::LengthMismatch { lhs, rhs })
                });
            }
        };

        if self.solution.packs.contains_key(&var) {
            return Err(self.ambiguous(Reason::MixedBinding { var: var.to_string() }));
        }
        self.occurs_check(&var, &value)?;
        trace!("{var} := {}", self.show(&value));
        self.solution.scalars.insert(var, value);
        Ok(())
    }

    fn unify_pack_var(&mut self, var: Var, rhs: Vec<Term<T>>) -> Result<(), UnifyError> {
        if let [term] = rhs.as_slice() {
            if term.as_expanded_var() == Some(&var) {
                return Ok(());
            }
        }

        if let Some(values) = self.solution.packs.get(&var) {
            let eqn = Eqn::new(values.clone(), rhs);
            self.add_equation(eqn);
            return Ok(());
        }

        if let [term] = rhs.as_slice() {
            if let Some(values) = term.as_expanded_var().and_then(|other| self.solution.packs.get(other)) {
                let eqn = Eqn::new(vec![Term::expansion(Term::Var(var))], values.clone());
                self.add_equation(eqn);
                return Ok(());
            }
        }

        if self.lookup(&var).is_some() {
            return Err(self.ambiguous(Reason::MixedBinding { var: var.to_string() }));
        }
        for term in &rhs {
            self.occurs_check(&var, term)?;
        }
        trace!("{var}... := {}", self.show_seq(&rhs));
        self.solution.packs.insert(var, rhs);
        Ok(())
    }

    fn unify_nodes(&mut self, lhs: &T, rhs: &T) -> Result<(), UnifyError> {
        let strategy = self.strategy;

        let mut expanding = None;
        if !strategy.equality_requires_syntactic_equality(lhs) {
            expanding = Some(lhs);
        }
        if !strategy.equality_requires_syntactic_equality(rhs) {
            expanding = Some(rhs);
        }

        if !strategy.is_same_term_excluding_args(lhs, rhs) {
            let reason = Reason::DifferentTerms {
                lhs: strategy.term_to_string(lhs),
                rhs: strategy.term_to_string(rhs),
            };
            return Err(if expanding.is_some() && strategy.may_be_equal(lhs, rhs) {
                self.ambiguous(reason)
            } else {
                self.mismatch(reason)
            });
        }

        if self.expanded.is_none() {
            self.expanded = expanding.map(|term| strategy.term_to_string(term));
        }
        self.add_equation(Eqn::new(strategy.term_args(lhs), strategy.term_args(rhs)));
        Ok(())
    }

    fn unify_seqs(&mut self, lhs: Vec<Term<T>>, rhs: Vec<Term<T>>) -> Result<(), UnifyError> {
        let strategy = self.strategy;
        if lhs.len() == rhs.len()
            && lhs.iter().zip(rhs.iter()).all(|(l, r)| syntactically_equal(strategy, l, r))
        {
            return Ok(());
        }

        let mut start = 0;
        while start < lhs.len() && start < rhs.len() && can_trim(&lhs[start], &rhs[start]) {
            start += 1;
        }
        let (mut lhs_end, mut rhs_end) = (lhs.len(), rhs.len());
        while lhs_end > start && rhs_end > start && can_trim(&lhs[lhs_end - 1], &rhs[rhs_end - 1]) {
            lhs_end -= 1;
            rhs_end -= 1;
        }

        let trimmed = lhs[..start]
            .iter()
            .zip(rhs[..start].iter())
            .chain(lhs[lhs_end..].iter().zip(rhs[rhs_end..].iter()));
        let mut new_eqns = Vec::new();
        for (l, r) in trimmed {
            // Identical expanded variables need no equation.
            if !l.is_expansion() {
                new_eqns.push(Eqn::single(l.clone(), r.clone()));
            }
        }
        let removed_something = start > 0 || lhs_end < lhs.len();
        self.add_equations(new_eqns);

        let mut lhs_rest = lhs[start..lhs_end].to_vec();
        let mut rhs_rest = rhs[start..rhs_end].to_vec();

        if lhs_rest.is_empty() && rhs_rest.is_empty() {
            return Ok(());
        }

        if !lhs_rest.iter().chain(rhs_rest.iter()).any(Term::is_expansion) {
            let reason = Reason::LengthMismatch {
                lhs: self.show_seq(&lhs_rest),
                rhs: self.show_seq(&rhs_rest),
            };
            return Err(self.mismatch(reason));
        }

        if removed_something {
            self.add_equation(Eqn::new(lhs_rest, rhs_rest));
            return Ok(());
        }

        if rhs_rest.is_empty() {
            std::mem::swap(&mut lhs_rest, &mut rhs_rest);
        }

        if lhs_rest.is_empty() {
            // Every element must vanish, so each one must be the expansion of an empty pack.
            for term in &rhs_rest {
                if term.as_expanded_var().is_some() {
                    self.add_equation(Eqn::new(vec![term.clone()], vec![]));
                } else {
                    let lhs = self.show_seq(&lhs_rest);
                    let rhs = self.show_seq(&rhs_rest);
                    return Err(if term.is_expansion() {
                        self.ambiguous(Reason::UnanchoredPacks { lhs, rhs })
                    } else {
                        self.mismatch(Reason::LengthMismatch { lhs, rhs })
                    });
                }
            }
            return Ok(());
        }

        // Both sides still contain expansions that we can not line up with each other.
        let reason = Reason::UnanchoredPacks {
            lhs: self.show_seq(&lhs_rest),
            rhs: self.show_seq(&rhs_rest),
        };
        Err(self.ambiguous(reason))
    }

    /// Fail if `var` occurs in `term`, looking through solved and defined variables.
    fn occurs_check(&mut self, var: &Var, term: &Term<T>) -> Result<(), UnifyError> {
        let strategy = self.strategy;

        if self.expanded.is_none() {
            match term {
                Term::Expansion(_) => self.expanded = Some(self.show(term)),
                Term::Node(node) if !strategy.equality_requires_syntactic_equality(node) => {
                    self.expanded = Some(strategy.term_to_string(node))
                }
                _ => {}
            }
        }

        let mut visited: BTreeSet<(Var, bool)> = BTreeSet::new();
        // Each entry records whether the path to it passes through a term whose equality
        // is not syntactic; a self-reference below such a term may be harmless.
        let mut stack = vec![(term.clone(), false)];
        while let Some((current, through_non_syntactic)) = stack.pop() {
            match current {
                Term::Var(other) => {
                    if other == *var {
                        let reason = Reason::OccursCheck { var: var.to_string(), term: self.show(term) };
                        return Err(if through_non_syntactic {
                            self.ambiguous(reason)
                        } else {
                            self.mismatch(reason)
                        });
                    }
                    if !visited.insert((other.clone(), through_non_syntactic)) {
                        continue;
                    }
                    if let Some(value) = self.lookup(&other) {
                        stack.push((value.clone(), through_non_syntactic));
                    }
                    if let Some(values) = self.solution.packs.get(&other) {
                        stack.extend(values.iter().map(|value| (value.clone(), through_non_syntactic)));
                    }
                }
                Term::Expansion(inner) => stack.push((*inner, true)),
                Term::Node(node) => {
                    let through = through_non_syntactic
                        || !strategy.equality_requires_syntactic_equality(&node);
                    stack.extend(strategy.term_args(&node).into_iter().map(|arg| (arg, through)));
                }
            }
        }
        Ok(())
    }

    fn add_equation(&mut self, eqn: Eqn<T>) {
        self.eqns.push(eqn);
    }

    fn add_equations<I: IntoIterator<Item = Eqn<T>>>(&mut self, iter: I) {
        self.eqns.extend(iter);
    }

    /// A mismatch is definite unless we already looked into a term whose equality is not
    /// syntactic.
    fn mismatch(&self, reason: Reason) -> UnifyError {
        match self.expanded {
            None => UnifyError::Failed { reason },
            Some(_) => self.ambiguous(reason),
        }
    }

    fn ambiguous(&self, reason: Reason) -> UnifyError {
        let expanded = self.expanded.as_ref().map(|term| {
            format!("{term} was compared structurally, but its value may differ from how it looks")
        });
        UnifyError::Ambiguous { reason, expanded }
    }

    fn show(&self, term: &Term<T>) -> String {
        term_to_string(self.strategy, term)
    }

    fn show_seq(&self, terms: &[Term<T>]) -> String {
        terms_to_string(self.strategy, terms)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;

    fn solve(eqns: Vec<Eqn<Sym>>) -> Result<Solution<Sym>, UnifyError> {
        let strategy = SymStrategy::default();
        unify(eqns, &BTreeMap::new(), &strategy)
    }

    #[test]
    fn var_is_bound_to_term() {
        let solution = solve(vec![Eqn::single(var("x"), node("f", vec![var("y")]))]).unwrap();
        assert_eq!(show_scalars(&solution), vec!["x := f(y)"]);
        assert!(solution.packs.is_empty());
    }

    #[test]
    fn different_heads_fail() {
        let err = solve(vec![Eqn::single(leaf("f"), leaf("g"))]).unwrap_err();
        assert!(!err.is_ambiguous());
    }

    #[test]
    fn different_heads_below_non_syntactic_term_are_ambiguous() {
        let strategy = SymStrategy::with_non_syntactic(&["h"]);
        let lhs = node("h", vec![leaf("f")]);
        let rhs = node("h", vec![leaf("g")]);
        let err = unify(vec![Eqn::single(lhs, rhs)], &BTreeMap::new(), &strategy).unwrap_err();
        assert!(err.is_ambiguous());
    }

    #[test]
    fn same_arguments_are_unified() {
        let lhs = node("f", vec![var("x"), leaf("a")]);
        let rhs = node("f", vec![leaf("b"), var("y")]);
        let solution = solve(vec![Eqn::single(lhs, rhs)]).unwrap();
        assert_eq!(show_scalars(&solution), vec!["x := b", "y := a"]);
    }

    #[test]
    fn argument_count_mismatch_fails() {
        let lhs = node("f", vec![leaf("a")]);
        let rhs = node("f", vec![leaf("a"), leaf("b")]);
        let err = solve(vec![Eqn::single(lhs, rhs)]).unwrap_err();
        assert!(matches!(err, UnifyError::Failed { reason: Reason::LengthMismatch { .. } }));
    }

    #[test]
    fn occurs_check_fails() {
        let err = solve(vec![Eqn::single(var("x"), node("f", vec![var("x")]))]).unwrap_err();
        assert!(matches!(err, UnifyError::Failed { reason: Reason::OccursCheck { .. } }));
    }

    #[test]
    fn occurs_check_below_non_syntactic_term_is_ambiguous() {
        let strategy = SymStrategy::with_non_syntactic(&["g"]);
        let eqn = Eqn::single(var("x"), node("g", vec![var("x")]));
        let err = unify(vec![eqn], &BTreeMap::new(), &strategy).unwrap_err();
        assert!(matches!(err, UnifyError::Ambiguous { reason: Reason::OccursCheck { .. }, .. }));
    }

    #[test]
    fn occurs_check_looks_through_pack_bindings() {
        // y = g(xs...) where xs... = [f(y)]
        let eqns = vec![
            Eqn::single(var("y"), node("g", vec![expanded("xs")])),
            Eqn::new(vec![expanded("xs")], vec![node("f", vec![var("y")])]),
        ];
        let err = solve(eqns).unwrap_err();
        assert!(matches!(err.reason(), Reason::OccursCheck { .. }));
    }

    #[test]
    fn context_definitions_are_looked_through() {
        let strategy = SymStrategy::default();
        let context = BTreeMap::from([(Var::from("c"), leaf("a"))]);
        let eqns = vec![Eqn::single(var("c"), leaf("b"))];
        assert!(unify(eqns, &context, &strategy).is_err());

        let eqns = vec![Eqn::single(var("x"), var("c"))];
        let solution = unify(eqns, &context, &strategy).unwrap();
        assert_eq!(show_scalars(&solution), vec!["x := a"]);
    }

    #[test]
    fn pack_var_is_bound_to_sequence() {
        let eqn = Eqn::new(vec![expanded("xs")], vec![leaf("a"), expanded("ys"), leaf("b")]);
        let solution = solve(vec![eqn]).unwrap();
        assert_eq!(show_packs(&solution), vec!["xs... := [a, ys..., b]"]);
    }

    #[test]
    fn prefix_and_suffix_are_trimmed() {
        let lhs = vec![leaf("a"), expanded("xs"), leaf("b")];
        let rhs = vec![leaf("a"), leaf("c"), leaf("d"), leaf("b")];
        let solution = solve(vec![Eqn::new(lhs, rhs)]).unwrap();
        assert_eq!(show_packs(&solution), vec!["xs... := [c, d]"]);
    }

    #[test]
    fn empty_sequence_empties_all_packs() {
        let eqn = Eqn::new(vec![], vec![expanded("xs"), expanded("ys")]);
        let solution = solve(vec![eqn]).unwrap();
        assert_eq!(show_packs(&solution), vec!["xs... := []", "ys... := []"]);
    }

    #[test]
    fn empty_sequence_against_single_term_fails() {
        let eqn = Eqn::new(vec![], vec![expanded("xs"), leaf("a")]);
        let err = solve(vec![eqn]).unwrap_err();
        assert!(!err.is_ambiguous());
    }

    #[test]
    fn unanchored_packs_are_ambiguous() {
        let lhs = vec![expanded("xs"), leaf("f"), expanded("ys")];
        let rhs = vec![expanded("zs"), leaf("f"), expanded("ks")];
        let err = solve(vec![Eqn::new(lhs, rhs)]).unwrap_err();
        assert!(matches!(err, UnifyError::Ambiguous { reason: Reason::UnanchoredPacks { .. }, .. }));
    }

    #[test]
    fn identical_sequences_are_equal() {
        let seq = vec![expanded("xs"), leaf("f"), expanded("ys")];
        let solution = solve(vec![Eqn::new(seq.clone(), seq)]).unwrap();
        assert_eq!(solution, Solution::default());
    }

    #[test]
    fn pack_vars_are_equated() {
        let eqn = Eqn::new(vec![expanded("xs")], vec![expanded("ys")]);
        let solution = solve(vec![eqn]).unwrap();
        assert_eq!(show_packs(&solution), vec!["xs... := [ys...]"]);
    }
}
