use super::{Atom, List, Sexpr};

/// An in-place rewriter over a syntax tree.
///
/// Lists are walked in order, descending into each nested list as it's encountered.
pub trait VisitorMut
where
    Self: Sized,
{
    fn visit_atom(&mut self, atom: &mut Atom);

    fn visit_list(&mut self, list: &mut List) {
        for item in &mut list.items {
            self.visit_sexpr(item);
        }
    }

    fn visit_sexpr(&mut self, sexpr: &mut Sexpr) {
        match sexpr {
            Sexpr::Atom(atom) => self.visit_atom(atom),
            Sexpr::List(list) => self.visit_list(list),
        }
    }
}
