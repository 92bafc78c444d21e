/// Generates fresh identifiers `X_0`, `X_1`, ...
///
/// Two generators that start from the same counter generate the same identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierGenerator {
    next: usize,
}

impl IdentifierGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }

    pub fn fresh(&mut self) -> String {
        let id = format!("X_{}", self.next);
        self.next += 1;
        id
    }

    /// The counter of the next identifier.
    pub fn counter(&self) -> usize {
        self.next
    }
}

impl Iterator for IdentifierGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.fresh())
    }
}
