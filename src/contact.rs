//! Persistent contact graph.
//!
//! A contact exists for every shape pair whose fat AABBs overlap in the
//! broad-phase, so a live contact may carry zero manifold points. Each
//! contact owns two edges, one per body; the edges are stitched into doubly
//! linked lists on the bodies, keyed by `(contact_index << 1) | side`, which
//! lets body removal walk and tear down everything it touches.

use log::trace;

use crate::distance::SimplexCache;
use crate::manifold::{Manifold, collide_polygons};
use crate::types::NULL_INDEX;
use crate::world::World;

/// One side of a contact, linked into the owning body's contact list.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ContactEdge {
    pub body: i32,
    pub prev_key: i32,
    pub next_key: i32,
}

impl Default for ContactEdge {
    fn default() -> Self {
        Self {
            body: NULL_INDEX,
            prev_key: NULL_INDEX,
            next_key: NULL_INDEX,
        }
    }
}

/// A persistent contact between two shapes.
#[derive(Clone, Debug, Default)]
pub(crate) struct Contact {
    pub edges: [ContactEdge; 2],
    pub shape_a: i32,
    pub shape_b: i32,
    /// Warm-start cache for the GJK query between the two shapes.
    pub cache: SimplexCache,
    pub manifold: Manifold,
    /// Mixed friction: `sqrt(friction_a · friction_b)`.
    pub friction: f32,
    /// Mixed restitution: `max(restitution_a, restitution_b)`.
    pub restitution: f32,
}

#[inline]
pub(crate) fn edge_key(contact_index: i32, side: i32) -> i32 {
    (contact_index << 1) | side
}

#[inline]
pub(crate) fn key_contact(key: i32) -> i32 {
    key >> 1
}

#[inline]
pub(crate) fn key_side(key: i32) -> usize {
    (key & 1) as usize
}

/// Allocate a contact for a shape pair and stitch its edges into both bodies'
/// contact lists. The pair is registered in the world's pair set.
pub(crate) fn create_contact(world: &mut World, shape_a: i32, shape_b: i32) {
    let body_a = world.shapes[shape_a].body;
    let body_b = world.shapes[shape_b].body;
    let friction = (world.shapes[shape_a].friction * world.shapes[shape_b].friction).sqrt();
    let restitution = world.shapes[shape_a]
        .restitution
        .max(world.shapes[shape_b].restitution);

    let contact_index = world.contacts.alloc();
    {
        let contact = &mut world.contacts[contact_index];
        contact.shape_a = shape_a;
        contact.shape_b = shape_b;
        contact.friction = friction;
        contact.restitution = restitution;
        contact.cache = SimplexCache::default();
        contact.manifold = Manifold::default();
    }

    // Connect to body A.
    let key_a = edge_key(contact_index, 0);
    let head_a = world.bodies[body_a].contact_list;
    {
        let contact = &mut world.contacts[contact_index];
        contact.edges[0] = ContactEdge {
            body: body_a,
            prev_key: NULL_INDEX,
            next_key: head_a,
        };
    }
    if head_a != NULL_INDEX {
        let head_contact = key_contact(head_a);
        let head_side = key_side(head_a);
        world.contacts[head_contact].edges[head_side].prev_key = key_a;
    }
    world.bodies[body_a].contact_list = key_a;
    world.bodies[body_a].contact_count += 1;

    // Connect to body B.
    let key_b = edge_key(contact_index, 1);
    let head_b = world.bodies[body_b].contact_list;
    {
        let contact = &mut world.contacts[contact_index];
        contact.edges[1] = ContactEdge {
            body: body_b,
            prev_key: NULL_INDEX,
            next_key: head_b,
        };
    }
    if head_b != NULL_INDEX {
        let head_contact = key_contact(head_b);
        let head_side = key_side(head_b);
        world.contacts[head_contact].edges[head_side].prev_key = key_b;
    }
    world.bodies[body_b].contact_list = key_b;
    world.bodies[body_b].contact_count += 1;

    world.pair_set.insert(shape_a, shape_b);
    trace!("created contact {contact_index} for shapes ({shape_a}, {shape_b})");
}

/// Unlink one edge of a contact from its body's doubly linked list.
pub(crate) fn unlink_edge(world: &mut World, contact_index: i32, side: usize) {
    let edge = world.contacts[contact_index].edges[side];
    let body = edge.body;

    if edge.prev_key != NULL_INDEX {
        let prev_contact = key_contact(edge.prev_key);
        let prev_side = key_side(edge.prev_key);
        world.contacts[prev_contact].edges[prev_side].next_key = edge.next_key;
    }
    if edge.next_key != NULL_INDEX {
        let next_contact = key_contact(edge.next_key);
        let next_side = key_side(edge.next_key);
        world.contacts[next_contact].edges[next_side].prev_key = edge.prev_key;
    }

    let key = edge_key(contact_index, side as i32);
    if world.bodies[body].contact_list == key {
        world.bodies[body].contact_list = edge.next_key;
    }
    debug_assert!(world.bodies[body].contact_count > 0);
    world.bodies[body].contact_count -= 1;
}

/// Tear a contact out of both bodies' lists, erase it from the pair set, and
/// free its pool slot.
pub(crate) fn destroy_contact(world: &mut World, contact_index: i32) {
    let (shape_a, shape_b) = {
        let contact = &world.contacts[contact_index];
        (contact.shape_a, contact.shape_b)
    };
    world.pair_set.remove(shape_a, shape_b);

    unlink_edge(world, contact_index, 0);
    unlink_edge(world, contact_index, 1);

    world.contacts.free(contact_index);
    trace!("destroyed contact {contact_index} for shapes ({shape_a}, {shape_b})");
}

/// Recompute the manifold for a contact and match new points against the old
/// manifold by feature id, carrying over the accumulated impulses so the
/// solver can warm-start.
pub(crate) fn update_contact(world: &mut World, contact_index: i32) {
    let (shape_a, shape_b) = {
        let contact = &world.contacts[contact_index];
        (contact.shape_a, contact.shape_b)
    };

    let poly_a = world.shapes[shape_a].polygon;
    let poly_b = world.shapes[shape_b].polygon;
    let xf_a = world.bodies[world.shapes[shape_a].body].transform();
    let xf_b = world.bodies[world.shapes[shape_b].body].transform();

    let contact = &mut world.contacts[contact_index];
    let old_manifold = contact.manifold;

    contact.manifold = collide_polygons(&poly_a, &poly_b, xf_a, xf_b, &mut contact.cache);

    for point in &mut contact.manifold.points[..contact.manifold.point_count] {
        point.normal_impulse = 0.0;
        point.tangent_impulse = 0.0;
        point.persisted = false;

        for old_point in old_manifold.points() {
            if old_point.id == point.id {
                point.normal_impulse = old_point.normal_impulse;
                point.tangent_impulse = old_point.tangent_impulse;
                point.persisted = true;
                break;
            }
        }
    }
}
