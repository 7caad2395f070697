/// Move the element at `from` to `to`, shifting the ones in between by one.
/// Returns `false` (and leaves `items` alone) when either index is out of range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Transient drag-and-drop state of one list.
///
/// The list reorders live while hovering: every `over` on a new index performs one
/// incremental move from the last known position of the dragged element and then
/// tracks it at its new position. `end` only clears the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    dragging: Option<usize>,
}

impl DragState {
    pub fn start(&mut self, index: usize) {
        self.dragging = Some(index);
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// The move the list should perform for a hover over `target`, if any.
    /// Updates the tracked position to `target` when a move is returned.
    pub fn over(&mut self, target: usize) -> Option<(usize, usize)> {
        match self.dragging {
            Some(from) if from != target => {
                self.dragging = Some(target);
                Some((from, target))
            }
            _ => None,
        }
    }

    pub fn end(&mut self) {
        self.dragging = None;
    }
}
