use outreach_model::BlockId;

/// An in-flight drag: the block picked up and the block currently hovered.
///
/// Hovering is visual only. The document changes once, when the gesture
/// ends over a different block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub active: BlockId,
    pub over: Option<BlockId>,
}

impl DragGesture {
    pub fn new(active: impl Into<BlockId>) -> Self {
        Self {
            active: active.into(),
            over: None,
        }
    }

    /// Target of the drop, if it differs from the dragged block
    pub fn target(&self) -> Option<&str> {
        self.over.as_deref().filter(|over| *over != self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ignores_self() {
        let mut gesture = DragGesture::new("a");
        assert_eq!(gesture.target(), None);

        gesture.over = Some("a".to_string());
        assert_eq!(gesture.target(), None);

        gesture.over = Some("b".to_string());
        assert_eq!(gesture.target(), Some("b"));
    }
}
