use pretty::DocAllocator;

use super::tokens::COMMA;
use super::types::*;

pub trait ParensIfExt<'a, D, A: 'a>
where
    D: ?Sized + DocAllocator<'a, A>,
{
    fn parens_if(self, cond: bool) -> pretty::DocBuilder<'a, D, A>;
}

impl<'a, D, A> ParensIfExt<'a, D, A> for pretty::DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
{
    fn parens_if(self, cond: bool) -> pretty::DocBuilder<'a, D, A> {
        if cond { self.parens() } else { self }
    }
}

/// Print a list of items separated by `, `.
pub fn comma_list<'a, I: IntoIterator<Item = Builder<'a>>>(
    alloc: &'a Alloc<'a>,
    items: I,
) -> Builder<'a> {
    alloc.intersperse(items, alloc.text(COMMA).append(alloc.space()))
}
