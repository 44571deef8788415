//! # Reordering
//!
//! Move semantics over the block sequence: the element at `from` is
//! relocated to `to` and everything in between shifts by one. Identity and
//! relative order of all other elements are preserved.

use crate::block::Block;
use serde::{Deserialize, Serialize};

/// Whether moves may displace locked blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderPolicy {
    /// Any block may move anywhere, locked or not
    #[default]
    Free,
    /// Locked blocks keep their index: they cannot be moved, and no move
    /// may shift them
    PinLocked,
}

/// Return `items` with the element at `from` moved to `to`.
///
/// No-op when `from == to` or either index is out of bounds.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    move_in_place(&mut moved, from, to);
    moved
}

/// In-place form of [`move_item`]. Returns whether anything moved.
pub fn move_in_place<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Whether moving `from` to `to` is allowed for `blocks` under `policy`
pub fn move_allowed(blocks: &[Block], from: usize, to: usize, policy: ReorderPolicy) -> bool {
    match policy {
        ReorderPolicy::Free => true,
        ReorderPolicy::PinLocked => {
            if from >= blocks.len() || to >= blocks.len() {
                return true;
            }
            let (lo, hi) = if from < to { (from, to) } else { (to, from) };
            !blocks[lo..=hi].iter().any(Block::is_locked)
        }
    }
}

/// Move a block under `policy`. Returns whether the sequence changed.
pub fn move_block(blocks: &mut Vec<Block>, from: usize, to: usize, policy: ReorderPolicy) -> bool {
    if !move_allowed(blocks, from, to, policy) {
        return false;
    }
    move_in_place(blocks, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use proptest::prelude::*;

    fn ids(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(Block::id).collect()
    }

    #[test]
    fn test_move_forward_and_back() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(move_item(&items, 0, 2), vec!['b', 'c', 'a', 'd']);
        assert_eq!(move_item(&items, 3, 1), vec!['a', 'd', 'b', 'c']);
    }

    #[test]
    fn test_noop_cases() {
        let items = vec![1, 2, 3];
        assert_eq!(move_item(&items, 1, 1), items);
        assert_eq!(move_item(&items, 5, 0), items);
        assert_eq!(move_item(&items, 0, 3), items);
    }

    #[test]
    fn test_free_policy_moves_locked_blocks() {
        let mut blocks = vec![
            Block::new("a", BlockType::Text),
            Block::new("sig", BlockType::Signature),
        ];
        assert!(move_block(&mut blocks, 1, 0, ReorderPolicy::Free));
        assert_eq!(ids(&blocks), vec!["sig", "a"]);
    }

    #[test]
    fn test_pin_locked_refuses_displacing_locked_blocks() {
        let mut blocks = vec![
            Block::new("a", BlockType::Text),
            Block::new("b", BlockType::Button),
            Block::new("sig", BlockType::Signature),
        ];

        assert!(!move_block(&mut blocks, 2, 0, ReorderPolicy::PinLocked));
        assert!(!move_block(&mut blocks, 0, 2, ReorderPolicy::PinLocked));
        assert!(move_block(&mut blocks, 0, 1, ReorderPolicy::PinLocked));
        assert_eq!(ids(&blocks), vec!["b", "a", "sig"]);
    }

    proptest! {
        #[test]
        fn prop_move_is_a_permutation(len in 1usize..12, from in 0usize..14, to in 0usize..14) {
            let items: Vec<usize> = (0..len).collect();
            let moved = move_item(&items, from, to);

            let mut sorted = moved.clone();
            sorted.sort();
            prop_assert_eq!(sorted, items.clone());

            if from < len && to < len {
                prop_assert_eq!(moved[to], items[from]);
                let rest_before: Vec<_> = items.iter().filter(|&&x| x != items[from]).collect();
                let rest_after: Vec<_> = moved.iter().filter(|&&x| x != items[from]).collect();
                prop_assert_eq!(rest_before, rest_after);
            } else {
                prop_assert_eq!(moved, items);
            }
        }
    }
}
