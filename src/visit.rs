// NesmakerDarkmode — Dark Theme Layer for the NESMaker Editor
// Copyright (C) 2026  The NesmakerDarkmode Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Breadth-first walk over a live control tree.

use std::collections::VecDeque;

use crate::host::NodeRef;

/// Calls `f` on `root` and then on every descendant, each exactly once,
/// level by level. `None` is a no-op.
///
/// Children are re-read from the host at the moment a node is expanded.
/// The containment tree is assumed acyclic.
pub fn for_each<F>(root: Option<&NodeRef>, mut f: F)
where
    F: FnMut(&NodeRef),
{
    let Some(root) = root else { return };

    f(root);
    let mut queue: VecDeque<NodeRef> = VecDeque::new();
    queue.push_back(root.clone());

    while let Some(current) = queue.pop_front() {
        for child in current.children() {
            f(&child);
            queue.push_back(child);
        }
    }
}

/// Number of nodes a walk from `root` would visit.
pub fn count(root: Option<&NodeRef>) -> usize {
    let mut n = 0;
    for_each(root, |_| n += 1);
    n
}
