use crate::consts::MAX_ACTIVE_LAYERS;
use crate::core_types::LayerIndex;
use std::iter;
use tracing::debug;

/// Layers active above the base layer, in activation order.
///
/// Layer 0 is implicit: it is never stored and is always the last
/// (lowest precedence) entry of [`LayerStack::active_layers_highest_first`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStack {
    order: [LayerIndex; MAX_ACTIVE_LAYERS],
    len: usize,
}

impl LayerStack {
    pub const fn new() -> Self {
        Self {
            order: [LayerIndex::BASE; MAX_ACTIVE_LAYERS],
            len: 0,
        }
    }

    /// Pushes `layer` on top. Returns false when nothing changed (base layer,
    /// or already active). Re-activation keeps the existing precedence.
    ///
    /// # Panics
    /// Panics if the stack is full, which the no-duplicates invariant rules out.
    pub fn activate(&mut self, layer: LayerIndex) -> bool {
        if layer.is_base() || self.is_active(layer) {
            return false;
        }
        assert!(
            self.len < MAX_ACTIVE_LAYERS,
            "layer stack overflow activating layer {}",
            layer
        );
        self.order[self.len] = layer;
        self.len += 1;
        debug!("layer {} activated (depth {})", layer, self.len);
        true
    }

    /// Removes `layer` wherever it sits. Returns false if it was not active.
    pub fn deactivate(&mut self, layer: LayerIndex) -> bool {
        if layer.is_base() {
            return false;
        }
        let Some(pos) = self.position(layer) else {
            return false;
        };
        self.order.copy_within(pos + 1..self.len, pos);
        self.len -= 1;
        debug!("layer {} deactivated (depth {})", layer, self.len);
        true
    }

    pub fn is_active(&self, layer: LayerIndex) -> bool {
        layer.is_base() || self.position(layer).is_some()
    }

    /// Most recently activated first, always ending with layer 0.
    pub fn active_layers_highest_first(&self) -> impl Iterator<Item = LayerIndex> + '_ {
        self.order[..self.len]
            .iter()
            .rev()
            .copied()
            .chain(iter::once(LayerIndex::BASE))
    }

    /// Highest-precedence active layer.
    pub fn top(&self) -> LayerIndex {
        if self.len == 0 {
            LayerIndex::BASE
        } else {
            self.order[self.len - 1]
        }
    }

    /// Number of layers above the base layer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    fn position(&self, layer: LayerIndex) -> Option<usize> {
        self.order[..self.len].iter().position(|&l| l == layer)
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers(stack: &LayerStack) -> Vec<usize> {
        stack.active_layers_highest_first().map(|l| l.get()).collect()
    }

    #[test]
    fn test_empty_stack_yields_base() {
        let stack = LayerStack::new();
        assert_eq!(layers(&stack), vec![0]);
        assert_eq!(stack.top(), LayerIndex::BASE);
    }

    #[test]
    fn test_deactivate_from_middle() {
        let mut stack = LayerStack::new();
        for l in [1, 2, 3] {
            stack.activate(LayerIndex::new(l));
        }
        assert!(stack.deactivate(LayerIndex::new(2)));
        assert_eq!(layers(&stack), vec![3, 1, 0]);
    }

    #[test]
    fn test_fill_all_layers() {
        let mut stack = LayerStack::new();
        for layer in LayerIndex::all() {
            stack.activate(layer);
        }
        assert_eq!(stack.len(), MAX_ACTIVE_LAYERS);
        assert_eq!(layers(&stack).last(), Some(&0));
    }
}
