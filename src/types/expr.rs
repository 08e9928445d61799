/// Condition expression with all selection references resolved to indices
/// into the rule's compiled-selection table.
///
/// Resolution happens at parse time: an identifier atom becomes
/// [`Expr::Selection`] or fails, and a quantified atom captures its member
/// set once, in selection declaration order, so evaluation never re-scans the
/// selection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    Selection(usize),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    CountOf {
        quantifier: Quantifier,
        members: Vec<usize>,
    },
}

/// Quantifier of a `<quantifier> of <set>` atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quantifier {
    /// `all of` — every member must match. Vacuously true over an empty set.
    All,
    /// `N of` — at least N members must match. Always false over a set
    /// smaller than N.
    AtLeast(usize),
}
