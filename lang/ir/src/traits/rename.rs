use crate::{AtomicTypeLiteral, Expr, ExprNode, HashMap};

/// Rename local literals. Nonlocal literals are never renamed, even if their name is in
/// the map.
pub trait Rename {
    fn rename(&self, new_name_by_old: &HashMap<String, String>) -> Self;
}

impl Rename for Expr {
    fn rename(&self, new_name_by_old: &HashMap<String, String>) -> Self {
        match self {
            Expr::AtomicTypeLiteral(lit) => Expr::AtomicTypeLiteral(lit.rename(new_name_by_old)),
            _ => self.map_subexprs(&mut |subexpr| subexpr.rename(new_name_by_old)),
        }
    }
}

impl Rename for AtomicTypeLiteral {
    fn rename(&self, new_name_by_old: &HashMap<String, String>) -> Self {
        match new_name_by_old.get(&self.cpp_type) {
            Some(new_name) if self.is_local => {
                AtomicTypeLiteral { cpp_type: new_name.clone(), ..self.clone() }
            }
            _ => self.clone(),
        }
    }
}

impl<T: Rename> Rename for Vec<T> {
    fn rename(&self, new_name_by_old: &HashMap<String, String>) -> Self {
        self.iter().map(|elem| elem.rename(new_name_by_old)).collect()
    }
}
