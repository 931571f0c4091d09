use shardd::DynamicTree;
use shardd::Aabb;
use shardd::types::Vec2;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn unit_box(x: f32, y: f32) -> Aabb {
    Aabb::new(Vec2::new(x, y), Vec2::new(x + 1.0, y + 1.0))
}

#[test]
fn insert_creates_fattened_leaf() {
    let mut tree = DynamicTree::new();
    let id = tree.insert_proxy(unit_box(0.0, 0.0), 7);
    assert_eq!(tree.user_data(id), 7);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.height(), 0);

    let fat = tree.fat_aabb(id);
    assert!(fat.contains(unit_box(0.0, 0.0)));
    assert!(approx(fat.lower.x, -0.1, 1.0e-5) && approx(fat.lower.y, -0.1, 1.0e-5));
    assert!(approx(fat.upper.x, 1.1, 1.0e-5) && approx(fat.upper.y, 1.1, 1.0e-5));
}

#[test]
fn insert_then_destroy_restores_tree() {
    let mut tree = DynamicTree::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(tree.insert_proxy(unit_box(i as f32 * 3.0, 0.0), i));
    }
    tree.validate();

    let node_count = tree.node_count();
    let height = tree.height();

    let extra = tree.insert_proxy(unit_box(20.0, 20.0), 99);
    tree.validate();
    assert_eq!(tree.node_count(), node_count + 2); // leaf + new internal parent

    tree.destroy_proxy(extra);
    tree.validate();
    assert_eq!(tree.node_count(), node_count);
    assert_eq!(tree.height(), height);
}

#[test]
fn move_within_fat_aabb_is_a_no_op() {
    let mut tree = DynamicTree::new();
    let id = tree.insert_proxy(unit_box(0.0, 0.0), 0);
    let fat_before = tree.fat_aabb(id);

    // Slightly shrunken box is still inside the fat AABB.
    let inner = Aabb::new(Vec2::new(0.05, 0.05), Vec2::new(0.95, 0.95));
    assert!(!tree.move_proxy(id, inner, Vec2::ZERO));
    assert_eq!(tree.fat_aabb(id), fat_before);
}

#[test]
fn move_extends_along_displacement() {
    let mut tree = DynamicTree::new();
    let id = tree.insert_proxy(unit_box(0.0, 0.0), 0);

    assert!(tree.move_proxy(id, unit_box(5.0, 0.0), Vec2::new(5.0, 0.0)));
    let fat = tree.fat_aabb(id);
    // Fatten on both axes plus twice the displacement ahead of the motion.
    assert!(approx(fat.lower.x, 4.9, 1.0e-5) && approx(fat.lower.y, -0.1, 1.0e-5));
    assert!(approx(fat.upper.x, 16.1, 1.0e-5) && approx(fat.upper.y, 1.1, 1.0e-5));
    tree.validate();
}

#[test]
fn bulk_insertion_stays_balanced() {
    let mut tree = DynamicTree::new();
    for i in 0..64 {
        tree.insert_proxy(unit_box(i as f32 * 2.0, 0.0), i);
    }
    tree.validate();
    assert_eq!(tree.height(), tree.compute_height());
    // AVL-style balancing keeps sequential insertion logarithmic.
    assert!(tree.height() <= 12, "height {}", tree.height());
    assert!(tree.max_balance() <= 2);
    assert!(tree.area_ratio() > 1.0);
}

#[test]
fn query_visits_overlapping_leaves_only() {
    let mut tree = DynamicTree::new();
    let a = tree.insert_proxy(unit_box(0.0, 0.0), 1);
    let _b = tree.insert_proxy(unit_box(10.0, 0.0), 2);
    let c = tree.insert_proxy(unit_box(0.5, 0.5), 3);

    let mut hits = Vec::new();
    tree.query(Aabb::new(Vec2::new(-0.5, -0.5), Vec2::new(1.5, 1.5)), |id| {
        hits.push(id);
        true
    });
    hits.sort_unstable();
    let mut expected = vec![a, c];
    expected.sort_unstable();
    assert_eq!(hits, expected);

    // Early abort.
    let mut count = 0;
    tree.query(Aabb::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0)), |_| {
        count += 1;
        false
    });
    assert_eq!(count, 1);
}

#[test]
fn shift_origin_translates_all_nodes() {
    let mut tree = DynamicTree::new();
    let id = tree.insert_proxy(unit_box(3.0, 4.0), 0);
    tree.shift_origin(Vec2::new(3.0, 4.0));
    let fat = tree.fat_aabb(id);
    assert!(approx(fat.lower.x, -0.1, 1.0e-5) && approx(fat.lower.y, -0.1, 1.0e-5));
    tree.validate();
}
