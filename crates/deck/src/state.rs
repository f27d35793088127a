use deck_parser::ast::Style;

/// Formatting inherited from ancestor tokens: how many strong, emphasis and
/// strikethrough containers enclose the current node, and how deep inside
/// nested lists it sits (`None` outside any list).
///
/// States are derived, never mutated: entering a styling container produces
/// a copy with exactly one counter incremented, and returning from recursion
/// restores the caller's copy by value semantics. There is no exit
/// operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleState {
    strong_depth: u32,
    em_depth: u32,
    del_depth: u32,
    list_depth: Option<u32>,
}

impl StyleState {
    /// Derive the state for the children of a styled container.
    pub fn styled(self, style: Style) -> Self {
        let mut derived = self;
        match style {
            Style::Strong => derived.strong_depth += 1,
            Style::Emphasis => derived.em_depth += 1,
            Style::Strikethrough => derived.del_depth += 1,
        }
        derived
    }

    /// Derive the state for the items of a list one level deeper.
    pub fn enter_list(self) -> Self {
        Self {
            list_depth: Some(self.list_depth.map_or(0, |d| d + 1)),
            ..self
        }
    }

    pub fn bold(&self) -> bool {
        self.strong_depth > 0
    }

    pub fn italic(&self) -> bool {
        self.em_depth > 0
    }

    pub fn struck(&self) -> bool {
        self.del_depth > 0
    }

    /// Indent level for bullet runs; `None` outside lists.
    pub fn indent(&self) -> Option<u32> {
        self.list_depth
    }
}

#[cfg(test)]
mod tests {
    use super::StyleState;
    use deck_parser::ast::Style;

    #[test]
    fn default_state_is_unstyled() {
        let state = StyleState::default();
        assert!(!state.bold());
        assert!(!state.italic());
        assert!(!state.struck());
        assert_eq!(None, state.indent());
    }

    #[test]
    fn derivation_increments_exactly_one_counter() {
        let state = StyleState::default().styled(Style::Strong);
        assert!(state.bold());
        assert!(!state.italic());
        assert!(!state.struck());

        let deeper = state.styled(Style::Emphasis);
        assert!(deeper.bold());
        assert!(deeper.italic());
        // the parent state is untouched
        assert!(!state.italic());
    }

    #[test]
    fn list_depth_counts_from_zero() {
        let first = StyleState::default().enter_list();
        assert_eq!(Some(0), first.indent());
        assert_eq!(Some(1), first.enter_list().indent());
        assert_eq!(Some(0), first.indent());
    }
}
