use crate::{AtomicTypeLiteral, Expr, ExprNode, HashSet};

pub trait FreeVars {
    /// Push every local literal occurring in `self` onto `out`, duplicates included.
    fn collect_free_vars<'a>(&'a self, out: &mut Vec<&'a AtomicTypeLiteral>);

    /// The local literals of the expression, in order of first occurrence.
    ///
    /// Two occurrences of a local literal denote the same variable iff they have the
    /// same name, so only the first one of every name is returned.
    fn free_vars(&self) -> Vec<&AtomicTypeLiteral> {
        let mut out = Vec::new();
        self.collect_free_vars(&mut out);
        let mut seen: HashSet<&str> = HashSet::default();
        out.retain(|lit| seen.insert(lit.cpp_type.as_str()));
        out
    }

    fn has_free_vars(&self) -> bool {
        let mut out = Vec::new();
        self.collect_free_vars(&mut out);
        !out.is_empty()
    }
}

impl FreeVars for Expr {
    fn collect_free_vars<'a>(&'a self, out: &mut Vec<&'a AtomicTypeLiteral>) {
        match self {
            Expr::AtomicTypeLiteral(lit) if lit.is_local => out.push(lit),
            _ => {
                for subexpr in self.subexprs() {
                    subexpr.collect_free_vars(out);
                }
            }
        }
    }
}

impl<T: FreeVars> FreeVars for [T] {
    fn collect_free_vars<'a>(&'a self, out: &mut Vec<&'a AtomicTypeLiteral>) {
        for elem in self {
            elem.collect_free_vars(out);
        }
    }
}

impl<T: FreeVars> FreeVars for Vec<T> {
    fn collect_free_vars<'a>(&'a self, out: &mut Vec<&'a AtomicTypeLiteral>) {
        self.as_slice().collect_free_vars(out)
    }
}
