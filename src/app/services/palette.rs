//! Keyword position to highlight class, and the stylesheet backing it.

/// Class carried by every highlight span.
pub const HIGHLIGHT_CLASS: &str = "keyword-highlight";

/// Maps a keyword's index in the keyword list onto the cyclic palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAssigner {
    palette_size: usize,
}

impl ColorAssigner {
    /// `palette_size` is clamped to at least one.
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
        }
    }

    /// Color class for the keyword at `index`, e.g. `keyword-highlight-3`.
    pub fn class_for(&self, index: usize) -> String {
        class_for(index, self.palette_size)
    }
}

pub fn class_for(index: usize, palette_size: usize) -> String {
    format!("{}-{}", HIGHLIGHT_CLASS, index % palette_size.max(1))
}

/// One background-color rule per palette slot.
pub fn build_stylesheet(colors: &[String]) -> String {
    let mut css = String::new();
    for (index, color) in colors.iter().enumerate() {
        css.push_str(&format!(
            ".{}-{} {{ background-color: {}; }}\n",
            HIGHLIGHT_CLASS, index, color
        ));
    }
    css
}
