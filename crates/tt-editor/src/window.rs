//! Window tree — recursive split layout.
//!
//! A window is either a *leaf* owning one [`Screen`] or an *inner* node
//! with a split direction and children. Children of a `Right` split sit
//! side by side with a one-column `|` splitter between neighbors; `Down`
//! splits stack children with a one-row `-` splitter.
//!
//! There are no parent pointers. Windows are addressed by *paths* — the
//! child indices from the root — and every operation (split, close, jump,
//! resize) takes a path and returns the path of the window that should be
//! active afterwards. Ownership runs strictly parent → children, which is
//! exactly the tree the borrow checker wants.

use std::io::{self, Write};

use log::debug;

use tt_term::ansi;
use tt_term::output::OutputBuffer;

use crate::screen::Screen;
use crate::Direction;

/// Which way an inner node lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDir {
    /// Children side by side, `|` splitters.
    Right,
    /// Children stacked, `-` splitters.
    Down,
}

/// A rectangle on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

enum Node {
    Leaf(Box<Screen>),
    Inner { dir: SplitDir, children: Vec<Window> },
}

/// One node of the layout tree.
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    node: Node,
}

impl Window {
    /// A leaf window holding `screen` at the given rectangle.
    #[must_use]
    pub fn leaf(mut screen: Screen, x: usize, y: usize, width: usize, height: usize) -> Self {
        screen.set_placement(x, y, width, height);
        Self {
            x,
            y,
            width,
            height,
            node: Node::Leaf(Box::new(screen)),
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    // -- Path navigation ----------------------------------------------------

    /// The window at `path`. An invalid path is a bookkeeping bug.
    #[must_use]
    pub fn get(&self, path: &[usize]) -> &Self {
        let mut w = self;
        for &i in path {
            match &w.node {
                Node::Inner { children, .. } => w = &children[i],
                Node::Leaf(_) => unreachable!("path descends into a leaf"),
            }
        }
        w
    }

    pub fn get_mut(&mut self, path: &[usize]) -> &mut Self {
        let mut w = self;
        for &i in path {
            match &mut w.node {
                Node::Inner { children, .. } => w = &mut children[i],
                Node::Leaf(_) => unreachable!("path descends into a leaf"),
            }
        }
        w
    }

    /// The screen of the leaf at `path`.
    #[must_use]
    pub fn screen_at(&self, path: &[usize]) -> &Screen {
        match &self.get(path).node {
            Node::Leaf(screen) => screen,
            Node::Inner { .. } => unreachable!("active path is not a leaf"),
        }
    }

    pub fn screen_at_mut(&mut self, path: &[usize]) -> &mut Screen {
        match &mut self.get_mut(path).node {
            Node::Leaf(screen) => screen,
            Node::Inner { .. } => unreachable!("active path is not a leaf"),
        }
    }

    /// Extend `path` down first children until it names a leaf.
    #[must_use]
    pub fn first_leaf_path(&self, mut path: Vec<usize>) -> Vec<usize> {
        while !self.get(&path).is_leaf() {
            path.push(0);
        }
        path
    }

    /// Every leaf, as `(path, rectangle)`, depth-first.
    #[must_use]
    pub fn leaves(&self) -> Vec<(Vec<usize>, Rect)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves(&self, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, Rect)>) {
        match &self.node {
            Node::Leaf(_) => out.push((path.clone(), self.rect())),
            Node::Inner { children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    path.push(i);
                    child.collect_leaves(path, out);
                    path.pop();
                }
            }
        }
    }

    // -- Split --------------------------------------------------------------

    /// Split the leaf at `path`, adding a new leaf for `screen` after it.
    ///
    /// When the leaf's parent already splits in `dir`, the new leaf becomes
    /// a sibling. Otherwise the leaf is converted into an inner node whose
    /// first child keeps the old screen. Returns the new leaf's path.
    pub fn split(&mut self, path: &[usize], dir: SplitDir, screen: Screen) -> Vec<usize> {
        if let Some((&last, parent_path)) = path.split_last() {
            let parent = self.get_mut(parent_path);
            let same_dir = matches!(&parent.node, Node::Inner { dir: d, .. } if *d == dir);
            if same_dir {
                if let Node::Inner { children, .. } = &mut parent.node {
                    children.insert(last + 1, Self::leaf(screen, 0, 0, 0, 0));
                }
                parent.resize_children();
                let mut next = parent_path.to_vec();
                next.push(last + 1);
                debug!("split sibling at {next:?}");
                return next;
            }
        }

        // Convert the leaf into an inner node; the old screen moves into
        // the first child.
        let target = self.get_mut(path);
        let rect = target.rect();
        let old = std::mem::replace(
            &mut target.node,
            Node::Inner { dir, children: Vec::new() },
        );
        let Node::Leaf(old_screen) = old else {
            unreachable!("split target is not a leaf");
        };
        if let Node::Inner { children, .. } = &mut target.node {
            children.push(Self {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                node: Node::Leaf(old_screen),
            });
            children.push(Self::leaf(screen, 0, 0, 0, 0));
        }
        target.resize_children();

        let mut next = path.to_vec();
        next.push(1);
        debug!("split new inner at {path:?}, active {next:?}");
        next
    }

    // -- Resize -------------------------------------------------------------

    /// Move this window (and its whole subtree) to a new rectangle.
    pub fn change_size(&mut self, x: usize, y: usize, width: usize, height: usize) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;

        if let Node::Leaf(screen) = &mut self.node {
            screen.set_placement(x, y, width, height);
        } else {
            self.resize_children();
        }
    }

    /// Re-divide this inner node's extent among its children, reserving one
    /// cell between neighbors for the splitter.
    fn resize_children(&mut self) {
        let Rect { x, y, width, height } = self.rect();
        let Node::Inner { dir, children } = &mut self.node else {
            return;
        };
        let dir = *dir;
        let lens = distribute(
            match dir {
                SplitDir::Right => width,
                SplitDir::Down => height,
            },
            children.len(),
        );

        let mut acc = 0;
        for (i, child) in children.iter_mut().enumerate() {
            match dir {
                SplitDir::Right => child.change_size(x + acc + i, y, lens[i], height),
                SplitDir::Down => child.change_size(x, y + acc + i, width, lens[i]),
            }
            acc += lens[i];
        }
    }

    // -- Close --------------------------------------------------------------

    /// Close the leaf at `path`, dropping its screen (which closes the
    /// file).
    ///
    /// Returns the path of the next active leaf, or `None` when `path` is
    /// the root — the caller exits the editor. A parent left with one child
    /// is replaced by that child's entire subtree.
    pub fn close(&mut self, path: &[usize]) -> Option<Vec<usize>> {
        let (&last, parent_path) = path.split_last()?;

        let collapse;
        {
            let parent = self.get_mut(parent_path);
            let Node::Inner { children, .. } = &mut parent.node else {
                unreachable!("close path has no inner parent");
            };
            drop(children.remove(last));
            collapse = children.len() == 1;
        }

        if collapse {
            let parent = self.get_mut(parent_path);
            let rect = parent.rect();
            let Node::Inner { children, .. } = &mut parent.node else {
                unreachable!();
            };
            let survivor = children.remove(0);
            parent.node = survivor.node;
            parent.change_size(rect.x, rect.y, rect.width, rect.height);
            return Some(self.first_leaf_path(parent_path.to_vec()));
        }

        let parent = self.get_mut(parent_path);
        parent.resize_children();
        let focus = last.saturating_sub(1);
        let mut next = parent_path.to_vec();
        next.push(focus);
        Some(self.first_leaf_path(next))
    }

    // -- Window navigation --------------------------------------------------

    /// Find the leaf to focus when jumping from `active` in `dir`.
    ///
    /// Candidates are leaves whose rectangle spans the active cursor's row
    /// (for left/right) or column (for up/down); among them the nearest in
    /// the travel direction wins.
    #[must_use]
    pub fn jump_target(&self, active: &[usize], dir: Direction) -> Option<Vec<usize>> {
        let (cx, cy) = self.screen_at(active).actual_cursor();

        let mut best: Option<(Vec<usize>, Rect)> = None;
        for (path, r) in self.leaves() {
            if path == active {
                continue;
            }
            let replace = match dir {
                Direction::Left => {
                    if cx < r.x || cy < r.y || r.y + r.height < cy {
                        continue;
                    }
                    best.as_ref().is_none_or(|(_, b)| b.x < r.x)
                }
                Direction::Right => {
                    if r.x + r.width < cx || cy < r.y || r.y + r.height < cy {
                        continue;
                    }
                    best.as_ref().is_none_or(|(_, b)| r.x < b.x)
                }
                Direction::Up => {
                    if cy < r.y || cx < r.x || r.x + r.width < cx {
                        continue;
                    }
                    best.as_ref().is_none_or(|(_, b)| b.y < r.y)
                }
                Direction::Down => {
                    if r.y + r.height < cy || cx < r.x || r.x + r.width < cx {
                        continue;
                    }
                    best.as_ref().is_none_or(|(_, b)| r.y < b.y)
                }
            };
            if replace {
                best = Some((path, r));
            }
        }

        best.map(|(path, _)| path)
    }

    // -- Rendering ----------------------------------------------------------

    /// Render the subtree, drawing splitters between siblings.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the frame buffer fails.
    pub fn render(&mut self, out: &mut OutputBuffer, first: bool) -> io::Result<()> {
        match &mut self.node {
            Node::Leaf(screen) => screen.render(out, first),
            Node::Inner { dir, children } => {
                let n = children.len();
                let dir = *dir;
                for i in 0..n {
                    children[i].render(out, first)?;
                    if i == n - 1 {
                        continue;
                    }
                    let child = &children[i];
                    match dir {
                        SplitDir::Right => {
                            for row in 0..child.height {
                                ansi::cursor_to(out, child.x + child.width, child.y + row)?;
                                write!(out, "|")?;
                            }
                        }
                        SplitDir::Down => {
                            for col in 0..child.width {
                                ansi::cursor_to(out, child.x + col, child.y + child.height)?;
                                write!(out, "-")?;
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Divide `total` cells among `count` children, reserving one cell between
/// each pair for the splitter. Earlier children receive the remainder.
fn distribute(total: usize, count: usize) -> Vec<usize> {
    let mut total = total.saturating_sub(count - 1);
    let mut out = vec![0; count];
    for i in 0..count {
        let rem = count - i;
        let each = total / rem;
        let len = if total % rem == 0 { each } else { each + 1 };
        out[i] = len;
        total -= len;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
