//! Drawing tool selection.

/// Drawing tool selection.
///
/// The tool is baked into each segment when it is created; changing tools
/// never alters segments already in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand ink in the current color
    #[default]
    Pen,
    /// Removes ink along the pointer path
    Eraser,
}

impl Tool {
    /// The other tool (toolbar pen/eraser toggle).
    pub fn toggled(self) -> Self {
        match self {
            Tool::Pen => Tool::Eraser,
            Tool::Eraser => Tool::Pen,
        }
    }

    pub fn is_eraser(self) -> bool {
        self == Tool::Eraser
    }
}
