use crate::media::Slot;

/// Arrangement of the two video surfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Side by side, left and right.
    #[default]
    Horizontal,
    /// Stacked, top and bottom.
    Vertical,
}

impl LayoutMode {
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Horizontal => LayoutMode::Vertical,
            LayoutMode::Vertical => LayoutMode::Horizontal,
        }
    }

    /// Position name of a slot in this arrangement.
    pub fn slot_name(self, slot: Slot) -> &'static str {
        match (self, slot) {
            (LayoutMode::Horizontal, Slot::Left) => "Left",
            (LayoutMode::Horizontal, Slot::Right) => "Right",
            (LayoutMode::Vertical, Slot::Left) => "Top",
            (LayoutMode::Vertical, Slot::Right) => "Bottom",
        }
    }

    pub fn load_label(self, slot: Slot) -> String {
        format!("Select {} Video", self.slot_name(slot))
    }

    /// Label of the toggle button: names the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            LayoutMode::Horizontal => "Vertical",
            LayoutMode::Vertical => "Horizontal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_two_modes() {
        let mut mode = LayoutMode::default();
        assert_eq!(mode, LayoutMode::Horizontal);
        mode.toggle();
        assert_eq!(mode, LayoutMode::Vertical);
        mode.toggle();
        assert_eq!(mode, LayoutMode::Horizontal);
    }

    #[test]
    fn labels_follow_orientation() {
        assert_eq!(LayoutMode::Horizontal.load_label(Slot::Left), "Select Left Video");
        assert_eq!(LayoutMode::Horizontal.load_label(Slot::Right), "Select Right Video");
        assert_eq!(LayoutMode::Vertical.load_label(Slot::Left), "Select Top Video");
        assert_eq!(LayoutMode::Vertical.load_label(Slot::Right), "Select Bottom Video");
    }

    #[test]
    fn toggle_label_names_the_other_mode() {
        assert_eq!(LayoutMode::Horizontal.toggle_label(), "Vertical");
        assert_eq!(LayoutMode::Vertical.toggle_label(), "Horizontal");
    }
}
