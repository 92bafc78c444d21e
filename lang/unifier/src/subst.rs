use std::collections::{BTreeMap, BTreeSet};

use crate::result::{SubstError, comma_separated};
use crate::{CanonicalizationStrategy, Term, Var, free_vars, term_to_string};

/// Replace the bound variables in `term` by their values.
///
/// Values are inserted as they are, they are not substituted again. The result is a
/// sequence because an expansion `t...` turns into one term per element of the packs
/// that occur in `t`.
pub fn substitute<T: Clone, S: CanonicalizationStrategy<T>>(
    strategy: &S,
    term: &Term<T>,
    scalars: &BTreeMap<Var, Term<T>>,
    packs: &BTreeMap<Var, Vec<Term<T>>>,
) -> Result<Vec<Term<T>>, SubstError> {
    match term {
        Term::Var(var) => {
            if let Some(value) = scalars.get(var) {
                return Ok(vec![value.clone()]);
            }
            if packs.contains_key(var) {
                return Err(SubstError::BarePackVariable { var: var.to_string() });
            }
            Ok(vec![term.clone()])
        }
        Term::Node(node) => {
            let args = strategy.term_args(node);
            let args = substitute_all(strategy, &args, scalars, packs)?;
            let actual = args.len();
            match strategy.term_with_args(node, args) {
                Some(node) => Ok(vec![Term::Node(node)]),
                None => Err(SubstError::ArityMismatch { term: strategy.term_to_string(node), actual }),
            }
        }
        Term::Expansion(inner) => substitute_expansion(strategy, inner, scalars, packs),
    }
}

/// Like [substitute], for a term that must stay a single term.
pub fn substitute_single<T: Clone, S: CanonicalizationStrategy<T>>(
    strategy: &S,
    term: &Term<T>,
    scalars: &BTreeMap<Var, Term<T>>,
    packs: &BTreeMap<Var, Vec<Term<T>>>,
) -> Result<Term<T>, SubstError> {
    let terms = substitute(strategy, term, scalars, packs)?;
    let len = terms.len();
    match <[Term<T>; 1]>::try_from(terms) {
        Ok([term]) => Ok(term),
        Err(_) => Err(SubstError::NotSingleTerm { term: term_to_string(strategy, term), len }),
    }
}

/// [substitute] every term of a sequence and concatenate the results.
pub fn substitute_all<T: Clone, S: CanonicalizationStrategy<T>>(
    strategy: &S,
    terms: &[Term<T>],
    scalars: &BTreeMap<Var, Term<T>>,
    packs: &BTreeMap<Var, Vec<Term<T>>>,
) -> Result<Vec<Term<T>>, SubstError> {
    let mut out = Vec::with_capacity(terms.len());
    for term in terms {
        out.extend(substitute(strategy, term, scalars, packs)?);
    }
    Ok(out)
}

fn substitute_expansion<T: Clone, S: CanonicalizationStrategy<T>>(
    strategy: &S,
    inner: &Term<T>,
    scalars: &BTreeMap<Var, Term<T>>,
    packs: &BTreeMap<Var, Vec<Term<T>>>,
) -> Result<Vec<Term<T>>, SubstError> {
    let expanded: Vec<(Var, &Vec<Term<T>>)> = free_vars(strategy, inner)
        .into_iter()
        .filter_map(|var| packs.get(&var).map(|values| (var, values)))
        .collect();

    let Some(len) = expanded.first().map(|(_, values)| values.len()) else {
        let terms = substitute(strategy, inner, scalars, packs)?;
        return Ok(terms.into_iter().map(Term::expansion).collect());
    };

    let show_vars = || comma_separated(expanded.iter().map(|(var, _)| var.to_string()));
    if expanded.iter().any(|(_, values)| values.len() != len) {
        return Err(SubstError::PackLengthMismatch { vars: show_vars() });
    }

    let mut inner_packs = packs.clone();
    for (var, _) in &expanded {
        inner_packs.remove(var);
    }

    let mut out = Vec::new();
    for index in 0..len {
        let elems: Vec<(&Var, &Term<T>)> =
            expanded.iter().map(|(var, values)| (var, &values[index])).collect();
        let mut inner_scalars = scalars.clone();

        if elems.iter().all(|(_, elem)| elem.is_expansion()) {
            // The element is itself an expansion `e...`: expand the inner term with `e`
            // and keep it expanded.
            for (var, elem) in &elems {
                if let Term::Expansion(elem) = elem {
                    inner_scalars.insert((*var).clone(), elem.as_ref().clone());
                }
            }
            let terms = substitute(strategy, inner, &inner_scalars, &inner_packs)?;
            out.extend(terms.into_iter().map(Term::expansion));
        } else if elems.iter().all(|(_, elem)| !elem.is_expansion()) {
            for (var, elem) in &elems {
                inner_scalars.insert((*var).clone(), (*elem).clone());
            }
            let terms = substitute(strategy, inner, &inner_scalars, &inner_packs)?;
            let mut unexpanded = BTreeSet::new();
            for term in &terms {
                collect_unexpanded_packs(strategy, term, &mut unexpanded);
            }
            if unexpanded.is_empty() {
                out.extend(terms);
            } else if len == 1 {
                out.extend(terms.into_iter().map(Term::expansion));
            } else {
                return Err(SubstError::UnexpandedPack {
                    term: term_to_string(strategy, &Term::expansion(inner.clone())),
                    len,
                    vars: comma_separated(unexpanded.iter().map(Var::to_string)),
                });
            }
        } else {
            return Err(SubstError::MixedPackElements { vars: show_vars(), index });
        }
    }
    Ok(out)
}

/// Pack variables occurring in `term` outside of any expansion.
fn collect_unexpanded_packs<T, S: CanonicalizationStrategy<T>>(
    strategy: &S,
    term: &Term<T>,
    out: &mut BTreeSet<Var>,
) {
    match term {
        Term::Var(var) if strategy.is_pack_var(var) => {
            out.insert(var.clone());
        }
        Term::Var(_) | Term::Expansion(_) => {}
        Term::Node(node) => {
            for arg in strategy.term_args(node) {
                collect_unexpanded_packs(strategy, &arg, out);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;

    fn show(terms: &[Term<Sym>]) -> String {
        crate::terms_to_string(&SymStrategy::default(), terms)
    }

    #[test]
    fn scalars_are_replaced() {
        let strategy = SymStrategy::default();
        let scalars = BTreeMap::from([(Var::from("x"), leaf("a"))]);
        let term = node("f", vec![var("x"), var("y")]);
        let result = substitute(&strategy, &term, &scalars, &BTreeMap::new()).unwrap();
        assert_eq!(show(&result), "[f(a, y)]");
    }

    #[test]
    fn expansion_of_bound_pack_is_spliced() {
        let strategy = SymStrategy::default().packs(&["xs"]);
        let packs = BTreeMap::from([(Var::from("xs"), vec![leaf("a"), expanded("ys"), leaf("b")])]);
        let term = node("f", vec![leaf("c"), Term::expansion(node("g", vec![var("xs")]))]);
        let result = substitute(&strategy, &term, &BTreeMap::new(), &packs).unwrap();
        assert_eq!(show(&result), "[f(c, g(a), (g(ys))..., g(b))]");
    }

    #[test]
    fn packs_expanded_together_must_have_equal_lengths() {
        let strategy = SymStrategy::default().packs(&["xs", "ys"]);
        let packs = BTreeMap::from([
            (Var::from("xs"), vec![leaf("a")]),
            (Var::from("ys"), vec![leaf("b"), leaf("c")]),
        ]);
        let term = Term::expansion(node("f", vec![var("xs"), var("ys")]));
        let err = substitute(&strategy, &term, &BTreeMap::new(), &packs).unwrap_err();
        assert!(matches!(err, SubstError::PackLengthMismatch { .. }));
    }

    #[test]
    fn mixed_elements_are_rejected() {
        let strategy = SymStrategy::default().packs(&["xs", "ys"]);
        let packs = BTreeMap::from([
            (Var::from("xs"), vec![leaf("a")]),
            (Var::from("ys"), vec![expanded("zs")]),
        ]);
        let term = Term::expansion(node("f", vec![var("xs"), var("ys")]));
        let err = substitute(&strategy, &term, &BTreeMap::new(), &packs).unwrap_err();
        assert!(matches!(err, SubstError::MixedPackElements { index: 0, .. }));
    }

    #[test]
    fn unresolved_pack_stays_expanded_for_single_element() {
        let strategy = SymStrategy::default().packs(&["xs", "ys"]);
        let packs = BTreeMap::from([(Var::from("xs"), vec![leaf("a")])]);
        let term = Term::expansion(node("f", vec![var("xs"), var("ys")]));
        let result = substitute(&strategy, &term, &BTreeMap::new(), &packs).unwrap();
        assert_eq!(show(&result), "[(f(a, ys))...]");

        let packs = BTreeMap::from([(Var::from("xs"), vec![leaf("a"), leaf("b")])]);
        let err = substitute(&strategy, &term, &BTreeMap::new(), &packs).unwrap_err();
        assert!(matches!(err, SubstError::UnexpandedPack { len: 2, .. }));
    }

    #[test]
    fn bare_pack_is_rejected() {
        let strategy = SymStrategy::default().packs(&["xs"]);
        let packs = BTreeMap::from([(Var::from("xs"), vec![leaf("a")])]);
        let err = substitute(&strategy, &var("xs"), &BTreeMap::new(), &packs).unwrap_err();
        assert!(matches!(err, SubstError::BarePackVariable { .. }));
    }
}
