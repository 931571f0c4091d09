//! Broad-phase pair manager.
//!
//! Tracks which proxies moved since the last step in a move buffer, re-queries
//! the dynamic tree for each of them, and reports every distinct overlapping
//! pair exactly once per [`BroadPhase::update_pairs`] call. Pairs are
//! canonicalized (smaller proxy id first) and sorted so duplicates land next
//! to each other.

use crate::aabb::Aabb;
use crate::tree::DynamicTree;
use crate::types::Vec2;

const NULL_PROXY: i32 = -1;

#[derive(Clone, Debug, Default)]
pub struct BroadPhase {
    tree: DynamicTree,
    proxy_count: usize,
    move_buffer: Vec<i32>,
    pair_buffer: Vec<(i32, i32)>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self {
            tree: DynamicTree::new(),
            proxy_count: 0,
            move_buffer: Vec::with_capacity(16),
            pair_buffer: Vec::with_capacity(16),
        }
    }

    pub fn create_proxy(&mut self, aabb: Aabb, user_data: i32) -> i32 {
        let proxy_id = self.tree.insert_proxy(aabb, user_data);
        self.proxy_count += 1;
        self.buffer_move(proxy_id);
        proxy_id
    }

    pub fn destroy_proxy(&mut self, proxy_id: i32) {
        self.unbuffer_move(proxy_id);
        self.proxy_count -= 1;
        self.tree.destroy_proxy(proxy_id);
    }

    pub fn move_proxy(&mut self, proxy_id: i32, aabb: Aabb, displacement: Vec2) {
        if self.tree.move_proxy(proxy_id, aabb, displacement) {
            self.buffer_move(proxy_id);
        }
    }

    /// Force a re-query for a proxy even without geometric change.
    pub fn touch_proxy(&mut self, proxy_id: i32) {
        self.buffer_move(proxy_id);
    }

    pub fn fat_aabb(&self, proxy_id: i32) -> Aabb {
        self.tree.fat_aabb(proxy_id)
    }

    pub fn user_data(&self, proxy_id: i32) -> i32 {
        self.tree.user_data(proxy_id)
    }

    pub fn proxy_count(&self) -> usize {
        self.proxy_count
    }

    pub fn tree(&self) -> &DynamicTree {
        &self.tree
    }

    pub fn query<F: FnMut(i32) -> bool>(&self, aabb: Aabb, callback: F) {
        self.tree.query(aabb, callback);
    }

    pub fn shift_origin(&mut self, origin: Vec2) {
        self.tree.shift_origin(origin);
    }

    fn buffer_move(&mut self, proxy_id: i32) {
        self.move_buffer.push(proxy_id);
    }

    /// Sentinel-mark a destroyed proxy without shifting the buffer.
    fn unbuffer_move(&mut self, proxy_id: i32) {
        for entry in &mut self.move_buffer {
            if *entry == proxy_id {
                *entry = NULL_PROXY;
            }
        }
    }

    /// Re-query the tree for every buffered proxy and report each distinct
    /// overlapping pair once. The callback receives the user data of both
    /// proxies, canonical order (smaller proxy id's side first).
    pub fn update_pairs<F: FnMut(i32, i32)>(&mut self, mut callback: F) {
        self.pair_buffer.clear();

        let tree = &self.tree;
        let pair_buffer = &mut self.pair_buffer;
        for &query_id in &self.move_buffer {
            if query_id == NULL_PROXY {
                continue;
            }

            // Query with the fat AABB so a pair that may touch soon is not
            // missed.
            let fat_aabb = tree.fat_aabb(query_id);
            tree.query(fat_aabb, |proxy_id| {
                // A proxy cannot form a pair with itself.
                if proxy_id != query_id {
                    pair_buffer.push((proxy_id.min(query_id), proxy_id.max(query_id)));
                }
                true
            });
        }

        self.move_buffer.clear();

        // Sort so duplicates are adjacent, then walk reporting each pair once.
        self.pair_buffer.sort_unstable();

        let mut i = 0;
        while i < self.pair_buffer.len() {
            let primary = self.pair_buffer[i];
            callback(self.tree.user_data(primary.0), self.tree.user_data(primary.1));
            i += 1;
            while i < self.pair_buffer.len() && self.pair_buffer[i] == primary {
                i += 1;
            }
        }
    }
}
