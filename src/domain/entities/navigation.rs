use serde::{Deserialize, Serialize};

/// Logical location of the trash view: the root listing or inside a
/// specific deleted folder. Always derived from the navigation stack,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Root,
    InFolder(i64),
}

/// One entered deleted folder on the navigation stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationFrame {
    pub folder_id: i64,
    pub folder_name: String,
}

/// Stack of entered deleted folders. Empty means trash root. The stack can
/// grow as deep as the actual folder nesting; leaving is just truncation.
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    frames: Vec<NavigationFrame>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame for an opened folder
    pub fn push(&mut self, folder_id: i64, folder_name: impl Into<String>) {
        self.frames.push(NavigationFrame {
            folder_id,
            folder_name: folder_name.into(),
        });
    }

    /// Truncates the stack to its first `len` frames. `len = 0` returns to
    /// root; `len >= depth` leaves the stack untouched.
    pub fn truncate_to(&mut self, len: usize) {
        if len < self.frames.len() {
            self.frames.truncate(len);
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn is_root(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Topmost frame, i.e. the folder currently being browsed
    pub fn current(&self) -> Option<&NavigationFrame> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[NavigationFrame] {
        &self.frames
    }

    /// Scope derived from the stack top
    pub fn scope(&self) -> Scope {
        match self.frames.last() {
            Some(frame) => Scope::InFolder(frame.folder_id),
            None => Scope::Root,
        }
    }

    /// Breadcrumb labels: the root label followed by every entered folder
    /// name, recomputed from the stack on demand.
    pub fn breadcrumbs(&self, root_label: &str) -> Vec<String> {
        let mut crumbs = Vec::with_capacity(self.frames.len() + 1);
        crumbs.push(root_label.to_string());
        crumbs.extend(self.frames.iter().map(|f| f.folder_name.clone()));
        crumbs
    }
}
