use rstar::{RTree, RTreeObject, AABB};

/// Lightweight position-only record for spatial indexing, so the full
/// flock entities stay borrowable while the tree is queried.
#[derive(Clone, Debug)]
pub struct EntityLocation {
    pub id: u64,
    pub position: [f64; 2],
}

impl RTreeObject for EntityLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Build an R*-tree from (id, position) pairs via bulk_load (O(n log n)).
pub fn build_index(entities: impl Iterator<Item = (u64, [f64; 2])>) -> RTree<EntityLocation> {
    let locations: Vec<EntityLocation> = entities
        .map(|(id, position)| EntityLocation { id, position })
        .collect();
    RTree::bulk_load(locations)
}

/// Visit every entity within `radius` of `center`, excluding `self_id` and
/// excluding exact zero-distance coincidences (degenerate for separation
/// math). AABB envelope query first, then Euclidean distance filter.
/// The tank is bounded, not toroidal, so a single envelope suffices.
pub fn for_each_neighbor(
    tree: &RTree<EntityLocation>,
    center: [f64; 2],
    radius: f64,
    self_id: u64,
    mut visitor: impl FnMut(&EntityLocation, f64),
) {
    let envelope = AABB::from_corners(
        [center[0] - radius, center[1] - radius],
        [center[0] + radius, center[1] + radius],
    );
    let r_sq = radius * radius;
    for loc in tree.locate_in_envelope(&envelope) {
        if loc.id == self_id {
            continue;
        }
        let dx = loc.position[0] - center[0];
        let dy = loc.position[1] - center[1];
        let d_sq = dx * dx + dy * dy;
        if d_sq > 0.0 && d_sq <= r_sq {
            visitor(loc, d_sq.sqrt());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tree(points: &[(u64, f64, f64)]) -> RTree<EntityLocation> {
        build_index(points.iter().map(|&(id, x, y)| (id, [x, y])))
    }

    fn neighbor_ids(tree: &RTree<EntityLocation>, center: [f64; 2], radius: f64, id: u64) -> Vec<u64> {
        let mut ids = Vec::new();
        for_each_neighbor(tree, center, radius, id, |loc, _| ids.push(loc.id));
        ids.sort_unstable();
        ids
    }

    #[test]
    fn finds_neighbors_within_radius_only() {
        let tree = make_tree(&[(0, 10.0, 10.0), (1, 12.0, 10.0), (2, 40.0, 40.0)]);
        assert_eq!(neighbor_ids(&tree, [10.0, 10.0], 5.0, 0), vec![1]);
    }

    #[test]
    fn excludes_self_and_zero_distance() {
        // Entity 1 sits exactly on the query center; both it and the
        // querying entity are skipped.
        let tree = make_tree(&[(0, 10.0, 10.0), (1, 10.0, 10.0), (2, 11.0, 10.0)]);
        assert_eq!(neighbor_ids(&tree, [10.0, 10.0], 5.0, 0), vec![2]);
    }

    #[test]
    fn reports_euclidean_distance() {
        let tree = make_tree(&[(0, 0.0, 0.0), (1, 3.0, 4.0)]);
        let mut seen = Vec::new();
        for_each_neighbor(&tree, [0.0, 0.0], 10.0, 0, |loc, d| seen.push((loc.id, d)));
        assert_eq!(seen.len(), 1);
        assert!((seen[0].1 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn corner_of_envelope_outside_radius_is_filtered() {
        let tree = make_tree(&[(0, 0.0, 0.0), (1, 4.0, 4.0)]);
        // Inside the 5x5 AABB but at distance ~5.66.
        assert!(neighbor_ids(&tree, [0.0, 0.0], 5.0, 0).is_empty());
    }
}
