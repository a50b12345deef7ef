use carrom_core::body::Body;
use carrom_core::geometry::{Vec2, distance};

/// Two overlapping discs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first disc's center toward the second's.
    pub normal: Vec2,
    /// How far the discs interpenetrate.
    pub overlap: f32,
}

/// Detect contact between two discs. Coincident centers use +x as the
/// normal so resolution never divides by zero.
pub fn contact(a: &Body, b: &Body) -> Option<Contact> {
    let reach = a.radius + b.radius;
    let dist = distance(a.position, b.position);
    if dist >= reach {
        return None;
    }
    let normal = (b.position - a.position).normalized_or(Vec2::UNIT_X);
    Some(Contact {
        normal,
        overlap: reach - dist,
    })
}

/// Exchange the normal components of velocity as a 1D elastic collision.
/// Tangential components are untouched.
pub fn resolve_velocities(a: &mut Body, b: &mut Body, normal: Vec2) {
    let total = a.mass + b.mass;
    if total <= 0.0 {
        return;
    }
    let u1 = a.velocity.dot(normal);
    let u2 = b.velocity.dot(normal);
    let v1 = (u1 * (a.mass - b.mass) + 2.0 * b.mass * u2) / total;
    let v2 = (u2 * (b.mass - a.mass) + 2.0 * a.mass * u1) / total;
    a.velocity += normal * (v1 - u1);
    b.velocity += normal * (v2 - u2);
}

/// Push `pushed` out along `normal` so it clears the other disc by `epsilon`.
/// Used for striker contacts, where only the coin moves.
pub fn push_out(pushed: &mut Body, contact: Contact, epsilon: f32) {
    pushed.position += contact.normal * (contact.overlap + epsilon);
}

/// Move both discs apart by half the overlap each.
pub fn separate(a: &mut Body, b: &mut Body, contact: Contact) {
    let half = contact.normal * (contact.overlap * 0.5);
    a.position -= half;
    b.position += half;
}

/// Full striker-coin response: exchange velocity, then move the coin clear.
pub fn striker_hits_coin(striker: &mut Body, coin: &mut Body, epsilon: f32) -> bool {
    let Some(hit) = contact(striker, coin) else {
        return false;
    };
    resolve_velocities(striker, coin, hit.normal);
    push_out(coin, hit, epsilon);
    true
}

/// Full coin-coin response.
pub fn coin_hits_coin(a: &mut Body, b: &mut Body) -> bool {
    let Some(hit) = contact(a, b) else {
        return false;
    };
    resolve_velocities(a, b, hit.normal);
    separate(a, b, hit);
    true
}
